//! # Pipeline Orchestrator
//!
//! Sequences the stages of a meshing run:
//!
//! ```text
//! LabelVolume → MeshGenerator → clean → label_cells → tag_boundary → LabeledMesh
//! ```
//!
//! Every stage fully materializes its output before the next one starts.
//! Configuration is validated in [`Pipeline::new`], before any input is
//! touched.

use config::MeshingArguments;
use glam::DVec3;
use tracing::{info, warn};

use crate::boundary::{boundary_condition_for, tag_boundary, BoundaryCondition, BoundaryFlags};
use crate::clean::{clean, CleanOptions, CleanReport};
use crate::error::MeshResult;
use crate::labeling::{label_cells, LabelingOptions, LabelingReport, Material};
use crate::mesh::{RawMesh, TetMesh};
use crate::volume::LabelVolume;

/// Produces a raw volume mesh from a label volume.
///
/// Delaunay refinement itself is external; implementations wrap a mesher
/// or import its output.
pub trait MeshGenerator {
    fn generate(&self, volume: &LabelVolume, args: &MeshingArguments) -> MeshResult<RawMesh>;
}

impl<F> MeshGenerator for F
where
    F: Fn(&LabelVolume, &MeshingArguments) -> MeshResult<RawMesh>,
{
    fn generate(&self, volume: &LabelVolume, args: &MeshingArguments) -> MeshResult<RawMesh> {
        self(volume, args)
    }
}

/// Final product of a run: a clean tetrahedral mesh with one material per
/// cell and one boundary flag per point.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledMesh {
    pub mesh: TetMesh,
    pub materials: Vec<Material>,
    pub boundary: BoundaryFlags,
    pub clean_report: CleanReport,
    pub labeling_report: LabelingReport,
}

impl LabeledMesh {
    /// Whether the attribute arrays match the mesh.
    pub fn is_consistent(&self) -> bool {
        self.materials.len() == self.mesh.cell_count()
            && self.boundary.len() == self.mesh.point_count()
    }
}

/// A validated meshing run.
pub struct Pipeline {
    args: MeshingArguments,
    clean: CleanOptions,
    labeling: LabelingOptions,
    boundary: Box<dyn BoundaryCondition>,
}

impl Pipeline {
    /// Validates `args` and prepares the stages.
    pub fn new(args: MeshingArguments) -> MeshResult<Self> {
        let args = args.validated()?;
        Ok(Self {
            clean: CleanOptions::from_arguments(&args),
            labeling: LabelingOptions::from_arguments(&args)?,
            boundary: boundary_condition_for(&args)?,
            args,
        })
    }

    #[inline]
    pub fn arguments(&self) -> &MeshingArguments {
        &self.args
    }

    /// Logs the run parameters.
    pub fn log_parameters(&self) {
        let quality = &self.args.quality;
        info!(
            facet_angle = quality.facet_angle,
            facet_size = quality.facet_size,
            facet_distance = quality.facet_distance,
            cell_radius_edge_ratio = quality.cell_radius_edge_ratio,
            cell_size = quality.cell_size,
            "mesh quality"
        );
        info!(
            voxel_spacing = ?self.args.voxel_spacing,
            value_outside = self.args.value_outside,
            "image parameters"
        );
        if self.args.bc_mode.requires_thickness() {
            info!(
                mode = %self.args.bc_mode,
                thickness = self.args.bc_thickness,
                "boundary conditions"
            );
        } else {
            info!(mode = %self.args.bc_mode, "boundary conditions");
        }
    }

    /// Runs every stage against `volume`.
    ///
    /// Stops at the first fatal error; a label integrity violation aborts
    /// before any boundary tagging.
    pub fn run(
        &self,
        volume: &LabelVolume,
        generator: &dyn MeshGenerator,
    ) -> MeshResult<LabeledMesh> {
        self.log_parameters();
        self.check_spacing(volume);

        info!("generating mesh");
        let raw = generator.generate(volume, &self.args)?;

        info!("cleaning mesh");
        let cleaned = clean(raw, &self.clean);

        let labeling = label_cells(&cleaned.mesh, volume, &self.labeling)?;

        info!("tagging boundary conditions");
        let boundary = tag_boundary(&cleaned.mesh, self.boundary.as_ref());

        Ok(LabeledMesh {
            mesh: cleaned.mesh,
            materials: labeling.materials,
            boundary,
            clean_report: cleaned.report,
            labeling_report: labeling.report,
        })
    }

    /// Meshing uses the configured spacing, sampling uses the volume's own.
    fn check_spacing(&self, volume: &LabelVolume) {
        let configured = DVec3::from_array(self.args.voxel_spacing);
        let actual = volume.geometry().spacing();
        // volume files store spacing in single precision
        if !configured.abs_diff_eq(actual, 1e-6 * actual.max_element()) {
            warn!(
                configured = %configured,
                volume = %actual,
                "configured voxel spacing differs from the volume spacing"
            );
        }
    }
}
