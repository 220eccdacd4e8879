//! Immutable argument bundle fixed at process start.
//!
//! Every stage of the pipeline receives a [`MeshingArguments`] explicitly, so
//! tests can build arbitrary configurations without touching process-wide
//! defaults.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BC_THICKNESS, DEFAULT_CELL_RADIUS_EDGE_RATIO, DEFAULT_CELL_SIZE,
    DEFAULT_FACET_ANGLE, DEFAULT_FACET_DISTANCE, DEFAULT_FACET_SIZE, DEFAULT_FALLBACK_MATERIAL,
    DEFAULT_VOXEL_SPACING, MATERIAL_RANGE, POINT_MERGE_TOLERANCE, VALUE_OUTSIDE,
};

/// Quality criteria handed to the external mesh generator.
///
/// # Examples
/// ```
/// use config::MeshQuality;
/// let quality = MeshQuality::default();
/// assert_eq!(quality.facet_angle, 30.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshQuality {
    /// Lower bound for surface facet angles, in degrees.
    pub facet_angle: f64,
    /// Upper bound for facet edge size at feature edges.
    pub facet_size: f64,
    /// Upper bound for the facet to surface distance.
    pub facet_distance: f64,
    /// Upper bound for the circumradius to shortest edge ratio.
    pub cell_radius_edge_ratio: f64,
    /// Upper bound for the cell circumradius.
    pub cell_size: f64,
}

impl Default for MeshQuality {
    fn default() -> Self {
        Self {
            facet_angle: DEFAULT_FACET_ANGLE,
            facet_size: DEFAULT_FACET_SIZE,
            facet_distance: DEFAULT_FACET_DISTANCE,
            cell_radius_edge_ratio: DEFAULT_CELL_RADIUS_EDGE_RATIO,
            cell_size: DEFAULT_CELL_SIZE,
        }
    }
}

impl MeshQuality {
    fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("facet_angle", self.facet_angle),
            ("facet_size", self.facet_size),
            ("facet_distance", self.facet_distance),
            ("cell_radius_edge_ratio", self.cell_radius_edge_ratio),
            ("cell_size", self.cell_size),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidQuality { name, value });
            }
        }
        Ok(())
    }
}

/// Boundary-condition policy applied to mesh vertices.
///
/// Only the slab at the minimum-Z face is implemented. It is spelled `CT`
/// in configuration files and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BoundaryConditionMode {
    /// Fix every vertex closer than `bc_thickness` to the minimum-Z face.
    #[default]
    #[serde(rename = "CT")]
    MinZSlab,
}

impl BoundaryConditionMode {
    /// Whether the mode needs a positive `bc_thickness`.
    pub fn requires_thickness(self) -> bool {
        match self {
            BoundaryConditionMode::MinZSlab => true,
        }
    }
}

impl fmt::Display for BoundaryConditionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryConditionMode::MinZSlab => f.write_str("CT"),
        }
    }
}

/// Complete configuration of a meshing run.
///
/// # Examples
/// ```
/// use config::MeshingArguments;
/// let args = MeshingArguments::default();
/// assert!(args.validate().is_ok());
///
/// let broken = MeshingArguments { bc_thickness: 0.0, ..MeshingArguments::default() };
/// assert!(broken.validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshingArguments {
    /// Criteria forwarded to the mesh generator.
    pub quality: MeshQuality,
    /// Voxel spacing (x, y, z) the mesh generator works with.
    pub voxel_spacing: [f64; 3],
    /// Label value of voxels outside the object.
    pub value_outside: u16,
    /// Thickness of the boundary-condition slab.
    pub bc_thickness: f64,
    /// Boundary-condition policy.
    pub bc_mode: BoundaryConditionMode,
    /// Absolute distance under which mesh points are merged.
    pub merge_tolerance: f64,
    /// Material for cells whose centroid samples outside the volume.
    pub fallback_material: u8,
}

impl Default for MeshingArguments {
    fn default() -> Self {
        Self {
            quality: MeshQuality::default(),
            voxel_spacing: DEFAULT_VOXEL_SPACING,
            value_outside: VALUE_OUTSIDE,
            bc_thickness: DEFAULT_BC_THICKNESS,
            bc_mode: BoundaryConditionMode::default(),
            merge_tolerance: POINT_MERGE_TOLERANCE,
            fallback_material: DEFAULT_FALLBACK_MATERIAL,
        }
    }
}

impl MeshingArguments {
    /// Checks every invariant of the bundle.
    ///
    /// Must run before any file is touched: an invalid configuration is
    /// fatal.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bc_mode.requires_thickness()
            && !(self.bc_thickness.is_finite() && self.bc_thickness > 0.0)
        {
            return Err(ConfigError::InvalidThickness {
                mode: self.bc_mode,
                thickness: self.bc_thickness,
            });
        }
        if self.voxel_spacing.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(ConfigError::InvalidSpacing(self.voxel_spacing));
        }
        self.quality.validate()?;
        if !self.merge_tolerance.is_finite() || self.merge_tolerance < 0.0 {
            return Err(ConfigError::InvalidTolerance(self.merge_tolerance));
        }
        if !MATERIAL_RANGE.contains(&self.fallback_material) {
            return Err(ConfigError::InvalidFallbackMaterial(self.fallback_material));
        }
        Ok(())
    }

    /// Returns the arguments after validation.
    pub fn validated(self) -> Result<Self, ConfigError> {
        self.validate().map(|()| self)
    }
}

/// Error returned when invalid configuration values are provided.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The boundary-condition mode needs a positive thickness.
    InvalidThickness {
        /// Mode that requires the thickness.
        mode: BoundaryConditionMode,
        /// Rejected value.
        thickness: f64,
    },
    /// A voxel spacing component is zero, negative or not finite.
    InvalidSpacing([f64; 3]),
    /// A mesh quality criterion is zero, negative or not finite.
    InvalidQuality {
        /// Name of the criterion.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// The merge tolerance is negative or not finite.
    InvalidTolerance(f64),
    /// The fallback material is not one of the output materials.
    InvalidFallbackMaterial(u8),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidThickness { mode, thickness } => write!(
                f,
                "check BC conditions: BC thickness must be positive for {mode} mode: {thickness}"
            ),
            ConfigError::InvalidSpacing(spacing) => {
                write!(f, "voxel spacing must be positive: {spacing:?}")
            }
            ConfigError::InvalidQuality { name, value } => {
                write!(f, "{name} must be positive: {value}")
            }
            ConfigError::InvalidTolerance(value) => {
                write!(f, "merge tolerance must be non-negative: {value}")
            }
            ConfigError::InvalidFallbackMaterial(value) => {
                write!(f, "fallback material must be 1, 2 or 3: {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
