//! # Coordinate Mapper
//!
//! Converts physical (mesh space) points to voxel indices of the label
//! volume.
//!
//! Each axis of the continuous index is rounded to the nearest integer with
//! ties rounded away from zero (`f64::round`). The mapper never bounds
//! checks; that is the sampler's job.

use std::fmt;

use glam::{DMat3, DVec3};

use crate::error::{MeshError, MeshResult};

/// Integer voxel index, possibly outside the volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VoxelIndex {
    pub i: i64,
    pub j: i64,
    pub k: i64,
}

impl VoxelIndex {
    pub const fn new(i: i64, j: i64, k: i64) -> Self {
        Self { i, j, k }
    }

    /// Rounds a continuous index to the nearest voxel.
    ///
    /// Huge values saturate to `i64::MIN`/`i64::MAX`; NaN maps to
    /// `i64::MIN`, which is never in range.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ct_mesh::volume::VoxelIndex;
    /// use glam::DVec3;
    ///
    /// let index = VoxelIndex::from_continuous(DVec3::new(0.5, -0.5, 1.49));
    /// assert_eq!(index, VoxelIndex::new(1, -1, 1));
    /// ```
    pub fn from_continuous(continuous: DVec3) -> Self {
        Self {
            i: round_axis(continuous.x),
            j: round_axis(continuous.y),
            k: round_axis(continuous.z),
        }
    }
}

impl fmt::Display for VoxelIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.i, self.j, self.k)
    }
}

fn round_axis(value: f64) -> i64 {
    if value.is_nan() {
        i64::MIN
    } else {
        // float to int `as` casts saturate
        value.round() as i64
    }
}

/// Maps a point to a voxel index for an axis-aligned volume.
///
/// # Example
///
/// ```rust
/// use ct_mesh::volume::{to_voxel_index, VoxelIndex};
/// use glam::DVec3;
///
/// let spacing = DVec3::splat(0.5);
/// let index = to_voxel_index(DVec3::new(1.0, 0.2, -0.1), spacing, DVec3::ZERO);
/// assert_eq!(index, VoxelIndex::new(2, 0, 0));
/// ```
pub fn to_voxel_index(point: DVec3, spacing: DVec3, origin: DVec3) -> VoxelIndex {
    VoxelIndex::from_continuous((point - origin) / spacing)
}

/// Spatial metadata of a label volume.
///
/// Index (i, j, k) addresses the x, y and z axes. The physical position of
/// a voxel centre is `origin + direction * (index * spacing)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageGeometry {
    dimensions: [usize; 3],
    spacing: DVec3,
    origin: DVec3,
    direction: DMat3,
    inverse_direction: DMat3,
}

impl ImageGeometry {
    /// Creates an axis-aligned geometry with its origin at (0, 0, 0).
    pub fn new(dimensions: [usize; 3], spacing: DVec3) -> MeshResult<Self> {
        if dimensions.iter().any(|&d| d == 0) {
            return Err(MeshError::invalid_volume(format!(
                "dimensions must be non-zero: {dimensions:?}"
            )));
        }
        if dimensions.iter().try_fold(1usize, |n, &d| n.checked_mul(d)).is_none() {
            return Err(MeshError::invalid_volume(format!(
                "voxel count of {dimensions:?} overflows"
            )));
        }
        if !spacing.is_finite() || spacing.min_element() <= 0.0 {
            return Err(MeshError::invalid_volume(format!(
                "spacing must be positive: {spacing}"
            )));
        }
        Ok(Self {
            dimensions,
            spacing,
            origin: DVec3::ZERO,
            direction: DMat3::IDENTITY,
            inverse_direction: DMat3::IDENTITY,
        })
    }

    /// Sets the physical position of voxel (0, 0, 0).
    pub fn with_origin(mut self, origin: DVec3) -> MeshResult<Self> {
        if !origin.is_finite() {
            return Err(MeshError::invalid_volume(format!(
                "origin must be finite: {origin}"
            )));
        }
        self.origin = origin;
        Ok(self)
    }

    /// Sets the orientation of the index axes in physical space.
    pub fn with_direction(mut self, direction: DMat3) -> MeshResult<Self> {
        let determinant = direction.determinant();
        if !determinant.is_finite() || determinant.abs() < 1e-12 {
            return Err(MeshError::invalid_volume(format!(
                "direction matrix is singular: {direction}"
            )));
        }
        self.direction = direction;
        self.inverse_direction = direction.inverse();
        Ok(self)
    }

    #[inline]
    pub fn dimensions(&self) -> [usize; 3] {
        self.dimensions
    }

    #[inline]
    pub fn spacing(&self) -> DVec3 {
        self.spacing
    }

    #[inline]
    pub fn origin(&self) -> DVec3 {
        self.origin
    }

    #[inline]
    pub fn direction(&self) -> DMat3 {
        self.direction
    }

    /// Total number of voxels; `new` rejects dimensions whose product
    /// overflows.
    pub fn voxel_count(&self) -> usize {
        self.dimensions.iter().product()
    }

    /// Computes the continuous index of a physical point.
    pub fn physical_to_continuous_index(&self, point: DVec3) -> DVec3 {
        let offset = point - self.origin;
        let local = if self.direction == DMat3::IDENTITY {
            offset
        } else {
            self.inverse_direction * offset
        };
        local / self.spacing
    }

    /// Maps a physical point to the nearest voxel index.
    pub fn physical_to_index(&self, point: DVec3) -> VoxelIndex {
        VoxelIndex::from_continuous(self.physical_to_continuous_index(point))
    }

    /// Returns the physical position of a voxel centre.
    pub fn index_to_physical(&self, index: [usize; 3]) -> DVec3 {
        let scaled = DVec3::new(index[0] as f64, index[1] as f64, index[2] as f64) * self.spacing;
        self.origin + self.direction * scaled
    }

    /// Returns the x-fastest storage offset of an in-range index.
    pub fn linear_index(&self, index: VoxelIndex) -> Option<usize> {
        let [nx, ny, nz] = self.dimensions;
        let i = axis_offset(index.i, nx)?;
        let j = axis_offset(index.j, ny)?;
        let k = axis_offset(index.k, nz)?;
        Some(i + nx * (j + ny * k))
    }
}

fn axis_offset(value: i64, dimension: usize) -> Option<usize> {
    usize::try_from(value).ok().filter(|&v| v < dimension)
}
