//! # Label Volume
//!
//! Segmented CT volume: one `u16` label per voxel plus its spatial metadata.
//!
//! ## Module Structure
//!
//! - `geometry` - Coordinate mapping from physical points to voxel indices
//! - `sampler` - Bounds-checked label lookup with label validation

pub mod geometry;
pub mod sampler;

use std::collections::BTreeMap;

use config::constants::ALLOWED_LABELS;

use crate::error::{MeshError, MeshResult};

pub use geometry::{to_voxel_index, ImageGeometry, VoxelIndex};
pub use sampler::{sample, sample_point, Sample, UnexpectedLabel};

/// Tissue class of a voxel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum Label {
    Background = 0,
    Class1 = 1,
    Class2 = 2,
    Class3 = 3,
}

impl Label {
    /// Returns the stored voxel value.
    pub fn value(self) -> u16 {
        self as u16
    }
}

impl TryFrom<u16> for Label {
    /// The rejected value.
    type Error = u16;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Label::Background),
            1 => Ok(Label::Class1),
            2 => Ok(Label::Class2),
            3 => Ok(Label::Class3),
            other => Err(other),
        }
    }
}

/// 3D label image in x-fastest order.
///
/// Values are stored unvalidated; the sampler rejects anything outside
/// {0, 1, 2, 3} when it is read.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelVolume {
    geometry: ImageGeometry,
    data: Vec<u16>,
}

impl LabelVolume {
    /// Wraps voxel data; `data.len()` must match the geometry.
    pub fn new(geometry: ImageGeometry, data: Vec<u16>) -> MeshResult<Self> {
        if data.len() != geometry.voxel_count() {
            return Err(MeshError::invalid_volume(format!(
                "expected {} voxels for dimensions {:?}, got {}",
                geometry.voxel_count(),
                geometry.dimensions(),
                data.len()
            )));
        }
        Ok(Self { geometry, data })
    }

    /// Creates a volume with every voxel set to `value`.
    pub fn filled(geometry: ImageGeometry, value: u16) -> Self {
        Self {
            data: vec![value; geometry.voxel_count()],
            geometry,
        }
    }

    /// Creates a volume by evaluating `f` at every (i, j, k).
    pub fn from_fn(geometry: ImageGeometry, mut f: impl FnMut([usize; 3]) -> u16) -> Self {
        let [nx, ny, nz] = geometry.dimensions();
        let mut data = Vec::with_capacity(geometry.voxel_count());
        for k in 0..nz {
            for j in 0..ny {
                for i in 0..nx {
                    data.push(f([i, j, k]));
                }
            }
        }
        Self { geometry, data }
    }

    #[inline]
    pub fn geometry(&self) -> &ImageGeometry {
        &self.geometry
    }

    #[inline]
    pub fn dimensions(&self) -> [usize; 3] {
        self.geometry.dimensions()
    }

    /// Raw voxel values in x-fastest order.
    #[inline]
    pub fn data(&self) -> &[u16] {
        &self.data
    }

    /// Returns the stored value, `None` when out of range.
    pub fn get(&self, index: VoxelIndex) -> Option<u16> {
        self.geometry
            .linear_index(index)
            .map(|offset| self.data[offset])
    }

    /// Overwrites one voxel; returns false when out of range.
    pub fn set(&mut self, index: VoxelIndex, value: u16) -> bool {
        match self.geometry.linear_index(index) {
            Some(offset) => {
                self.data[offset] = value;
                true
            }
            None => false,
        }
    }

    /// Counts voxels per stored value.
    pub fn value_counts(&self) -> BTreeMap<u16, usize> {
        let mut counts = BTreeMap::new();
        for &value in &self.data {
            *counts.entry(value).or_insert(0) += 1;
        }
        counts
    }

    /// Values present in the volume that are not valid labels.
    pub fn unexpected_values(&self) -> Vec<u16> {
        self.value_counts()
            .into_keys()
            .filter(|value| !ALLOWED_LABELS.contains(value))
            .collect()
    }
}
