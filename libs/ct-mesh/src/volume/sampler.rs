//! # Voxel Sampler
//!
//! Nearest-neighbour lookup of a label with strict validation of the
//! four-class label scheme.

use glam::DVec3;
use thiserror::Error;

use super::geometry::VoxelIndex;
use super::{Label, LabelVolume};

/// Outcome of sampling the volume at an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sample {
    /// The index is inside the volume and holds a valid label.
    Label(Label),
    /// The index lies outside the volume; the caller decides the fallback.
    OutOfBounds,
}

/// The volume holds a value outside {0, 1, 2, 3} at the sampled voxel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unexpected label {value} at voxel {index}")]
pub struct UnexpectedLabel {
    pub value: u16,
    pub index: VoxelIndex,
}

/// Returns the label at `index`, or [`Sample::OutOfBounds`].
///
/// # Example
///
/// ```rust
/// use ct_mesh::volume::{sample, ImageGeometry, Label, LabelVolume, Sample, VoxelIndex};
/// use glam::DVec3;
///
/// let geometry = ImageGeometry::new([2, 2, 2], DVec3::ONE).unwrap();
/// let volume = LabelVolume::filled(geometry, 2);
/// assert_eq!(sample(&volume, VoxelIndex::new(1, 1, 1)), Ok(Sample::Label(Label::Class2)));
/// assert_eq!(sample(&volume, VoxelIndex::new(2, 0, 0)), Ok(Sample::OutOfBounds));
/// ```
pub fn sample(volume: &LabelVolume, index: VoxelIndex) -> Result<Sample, UnexpectedLabel> {
    let Some(value) = volume.get(index) else {
        return Ok(Sample::OutOfBounds);
    };
    Label::try_from(value)
        .map(Sample::Label)
        .map_err(|value| UnexpectedLabel { value, index })
}

/// Maps a physical point through the volume geometry and samples it.
pub fn sample_point(volume: &LabelVolume, point: DVec3) -> Result<Sample, UnexpectedLabel> {
    sample(volume, volume.geometry().physical_to_index(point))
}
