//! # Boundary Tagger
//!
//! Flags mesh vertices that carry a boundary condition. The policy is a
//! [`BoundaryCondition`] strategy evaluated against the bounding box of all
//! mesh points.

use config::{BoundaryConditionMode, ConfigError, MeshingArguments};
use glam::DVec3;
use tracing::info;

use crate::mesh::{Aabb, TetMesh};

/// Decides whether a vertex is fixed.
pub trait BoundaryCondition: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Whether `point` is constrained, given the mesh bounding box.
    fn is_boundary(&self, point: DVec3, bounds: &Aabb) -> bool;
}

/// Fixes every vertex strictly below `min.z + thickness`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinZSlab {
    thickness: f64,
}

impl MinZSlab {
    pub fn new(thickness: f64) -> Result<Self, ConfigError> {
        if !(thickness.is_finite() && thickness > 0.0) {
            return Err(ConfigError::InvalidThickness {
                mode: BoundaryConditionMode::MinZSlab,
                thickness,
            });
        }
        Ok(Self { thickness })
    }

    #[inline]
    pub fn thickness(&self) -> f64 {
        self.thickness
    }
}

impl BoundaryCondition for MinZSlab {
    fn name(&self) -> &'static str {
        "CT"
    }

    fn is_boundary(&self, point: DVec3, bounds: &Aabb) -> bool {
        point.z < bounds.min.z + self.thickness
    }
}

/// Builds the strategy selected by the configuration.
pub fn boundary_condition_for(
    args: &MeshingArguments,
) -> Result<Box<dyn BoundaryCondition>, ConfigError> {
    match args.bc_mode {
        BoundaryConditionMode::MinZSlab => Ok(Box::new(MinZSlab::new(args.bc_thickness)?)),
    }
}

/// One flag (0 or 1) per mesh point, in point order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundaryFlags {
    flags: Vec<u8>,
    bounds: Option<Aabb>,
}

impl BoundaryFlags {
    #[inline]
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.flags
    }

    /// Number of flagged points.
    pub fn fixed_count(&self) -> usize {
        self.flags.iter().filter(|&&f| f == 1).count()
    }

    /// Bounding box the flags were computed against, `None` for an empty
    /// mesh.
    pub fn bounds(&self) -> Option<Aabb> {
        self.bounds
    }
}

/// Evaluates `condition` at every point of `mesh`.
///
/// # Example
///
/// ```rust
/// use ct_mesh::boundary::{tag_boundary, MinZSlab};
/// use ct_mesh::TetMesh;
/// use glam::DVec3;
///
/// let mesh = TetMesh::from_parts(
///     vec![DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::Z],
///     vec![[0, 1, 2, 3]],
/// );
/// let flags = tag_boundary(&mesh, &MinZSlab::new(0.5).unwrap());
/// assert_eq!(flags.as_slice(), &[1, 1, 1, 0]);
/// ```
pub fn tag_boundary(mesh: &TetMesh, condition: &dyn BoundaryCondition) -> BoundaryFlags {
    let Some(bounds) = mesh.bounding_box() else {
        return BoundaryFlags::default();
    };
    info!(
        min = %bounds.min,
        max = %bounds.max,
        "mesh bounding box"
    );

    let flags: Vec<u8> = mesh
        .points()
        .iter()
        .map(|&p| u8::from(condition.is_boundary(p, &bounds)))
        .collect();

    let result = BoundaryFlags {
        flags,
        bounds: Some(bounds),
    };
    info!(
        condition = condition.name(),
        fixed = result.fixed_count(),
        points = result.len(),
        "tagged boundary points"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Unit cube corners plus a point at z = 0.3 exactly.
    fn cube() -> TetMesh {
        let mut points = Vec::new();
        for z in [0.0, 1.0] {
            for y in [0.0, 1.0] {
                for x in [0.0, 1.0] {
                    points.push(DVec3::new(x, y, z));
                }
            }
        }
        points.push(DVec3::new(0.5, 0.5, 0.3));
        points.push(DVec3::new(0.5, 0.5, 0.29));
        TetMesh::from_parts(points, vec![[0, 1, 2, 4], [7, 6, 5, 3], [8, 9, 0, 7]])
    }

    #[test]
    fn test_cube_slab_counts() {
        let mesh = cube();
        let flags = tag_boundary(&mesh, &MinZSlab::new(0.3).unwrap());
        assert_eq!(flags.len(), mesh.point_count());
        // z = 0 corners and z = 0.29 are inside, z = 0.3 is not (strict)
        assert_eq!(flags.fixed_count(), 5);
        assert_eq!(flags.as_slice(), &[1, 1, 1, 1, 0, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_slab_is_relative_to_mesh_minimum() {
        let points = [DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::Z].map(|p| p + DVec3::splat(-10.0));
        let mesh = TetMesh::from_parts(points.to_vec(), vec![[0, 1, 2, 3]]);
        let flags = tag_boundary(&mesh, &MinZSlab::new(0.5).unwrap());
        assert_eq!(flags.as_slice(), &[1, 1, 1, 0]);
        assert_eq!(flags.bounds().map(|b| b.min.z), Some(-10.0));
    }

    #[test]
    fn test_empty_mesh_has_no_flags() {
        let flags = tag_boundary(&TetMesh::default(), &MinZSlab::new(1.0).unwrap());
        assert!(flags.is_empty());
        assert!(flags.bounds().is_none());
    }

    #[test]
    fn test_thickness_must_be_positive() {
        assert!(MinZSlab::new(0.0).is_err());
        assert!(MinZSlab::new(-1.0).is_err());
        assert!(MinZSlab::new(f64::NAN).is_err());
    }

    #[test]
    fn test_condition_from_arguments() {
        let args = MeshingArguments {
            bc_thickness: 2.0,
            ..MeshingArguments::default()
        };
        let condition = boundary_condition_for(&args).unwrap();
        assert_eq!(condition.name(), "CT");

        let bounds = Aabb {
            min: DVec3::ZERO,
            max: DVec3::splat(10.0),
        };
        assert!(condition.is_boundary(DVec3::new(5.0, 5.0, 1.99), &bounds));
        assert!(!condition.is_boundary(DVec3::new(5.0, 5.0, 2.0), &bounds));

        let args = MeshingArguments {
            bc_thickness: 0.0,
            ..MeshingArguments::default()
        };
        assert!(boundary_condition_for(&args).is_err());
    }
}
