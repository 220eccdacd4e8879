//! # Material Labeler
//!
//! Assigns one material per tetrahedron by sampling the label volume at the
//! cell centroid.
//!
//! ## Policy
//!
//! | Sample                 | Material              |
//! |------------------------|-----------------------|
//! | label 1, 2, 3          | same value            |
//! | label 0 (background)   | 3                     |
//! | outside the volume     | fallback (default 3)  |
//! | any other value        | fatal integrity error |
//!
//! Cells are labeled independently in parallel; the output has exactly one
//! material per cell, in cell order.

use std::fmt;

use config::constants::{BACKGROUND_MATERIAL, DEFAULT_FALLBACK_MATERIAL, MATERIAL_RANGE};
use config::{ConfigError, MeshingArguments};
use rayon::prelude::*;
use tracing::{info, warn};

use crate::error::{MeshError, MeshResult};
use crate::mesh::TetMesh;
use crate::volume::{sample, Label, LabelVolume, Sample};

/// Material identifier written to the output mesh (1, 2 or 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Material(u8);

impl Material {
    pub const ONE: Material = Material(1);
    pub const TWO: Material = Material(2);
    pub const THREE: Material = Material(3);

    /// Material assigned to sampled background voxels.
    pub const BACKGROUND: Material = Material(BACKGROUND_MATERIAL);

    /// Creates a material, `None` when `id` is not 1, 2 or 3.
    pub fn new(id: u8) -> Option<Self> {
        MATERIAL_RANGE.contains(&id).then_some(Self(id))
    }

    /// Maps a voxel label to its material.
    pub fn from_label(label: Label) -> Self {
        match label {
            Label::Background => Material::BACKGROUND,
            Label::Class1 => Material::ONE,
            Label::Class2 => Material::TWO,
            Label::Class3 => Material::THREE,
        }
    }

    #[inline]
    pub fn id(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parameters of the labeling pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelingOptions {
    /// Material for cells whose centroid falls outside the volume.
    pub fallback: Material,
}

impl Default for LabelingOptions {
    fn default() -> Self {
        Self {
            fallback: Material(DEFAULT_FALLBACK_MATERIAL),
        }
    }
}

impl LabelingOptions {
    pub fn from_arguments(args: &MeshingArguments) -> Result<Self, ConfigError> {
        Material::new(args.fallback_material)
            .map(|fallback| Self { fallback })
            .ok_or(ConfigError::InvalidFallbackMaterial(args.fallback_material))
    }
}

/// Diagnostic counts of a labeling pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelingReport {
    pub cells: usize,
    /// Cells whose centroid sampled a background voxel.
    pub background_remapped: usize,
    /// Cells whose centroid fell outside the volume.
    pub out_of_bounds: usize,
    /// Number of cells per material 1, 2, 3.
    pub per_material: [usize; 3],
}

/// Per-cell materials plus diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct Labeling {
    pub materials: Vec<Material>,
    pub report: LabelingReport,
}

#[derive(Clone, Copy)]
enum CellSample {
    Sampled(Label),
    OutOfBounds,
}

/// Labels every cell of `mesh` from `volume`.
///
/// Returns [`MeshError::LabelIntegrity`] for the lowest-index cell whose
/// centroid samples a value outside {0, 1, 2, 3}, and
/// [`MeshError::InvalidMesh`] when a cell index is out of range or repeated.
///
/// # Example
///
/// ```rust
/// use ct_mesh::labeling::{label_cells, LabelingOptions, Material};
/// use ct_mesh::volume::{ImageGeometry, LabelVolume};
/// use ct_mesh::TetMesh;
/// use glam::DVec3;
///
/// let geometry = ImageGeometry::new([2, 2, 2], DVec3::ONE).unwrap();
/// let volume = LabelVolume::filled(geometry, 0);
/// let mesh = TetMesh::from_parts(
///     vec![DVec3::ZERO, DVec3::X * 0.4, DVec3::Y * 0.4, DVec3::Z * 0.4],
///     vec![[0, 1, 2, 3]],
/// );
/// let labeling = label_cells(&mesh, &volume, &LabelingOptions::default()).unwrap();
/// assert_eq!(labeling.materials, vec![Material::THREE]);
/// ```
pub fn label_cells(
    mesh: &TetMesh,
    volume: &LabelVolume,
    options: &LabelingOptions,
) -> MeshResult<Labeling> {
    if !mesh.validate() {
        return Err(MeshError::invalid_mesh(
            "cells must reference four distinct existing points",
        ));
    }
    info!(cells = mesh.cell_count(), "labeling elements");
    let geometry = volume.geometry();

    let samples: Vec<Result<CellSample, MeshError>> = (0..mesh.cell_count())
        .into_par_iter()
        .map(|cell| {
            let index = geometry.physical_to_index(mesh.centroid(cell));
            match sample(volume, index) {
                Ok(Sample::Label(label)) => Ok(CellSample::Sampled(label)),
                Ok(Sample::OutOfBounds) => Ok(CellSample::OutOfBounds),
                Err(err) => Err(MeshError::LabelIntegrity {
                    cell,
                    value: err.value,
                    index: err.index,
                }),
            }
        })
        .collect();

    let mut report = LabelingReport {
        cells: mesh.cell_count(),
        ..LabelingReport::default()
    };
    let mut materials = Vec::with_capacity(samples.len());
    for sample in samples {
        let material = match sample? {
            CellSample::Sampled(label) => {
                if label == Label::Background {
                    report.background_remapped += 1;
                }
                Material::from_label(label)
            }
            CellSample::OutOfBounds => {
                report.out_of_bounds += 1;
                options.fallback
            }
        };
        report.per_material[usize::from(material.id() - 1)] += 1;
        materials.push(material);
    }

    if report.out_of_bounds > 0 {
        warn!(
            cells = report.out_of_bounds,
            fallback = %options.fallback,
            "cell centroids outside the label volume"
        );
    }
    info!(
        material_1 = report.per_material[0],
        material_2 = report.per_material[1],
        material_3 = report.per_material[2],
        background_remapped = report.background_remapped,
        "completed labeling elements"
    );

    Ok(Labeling { materials, report })
}

#[cfg(test)]
mod tests;
