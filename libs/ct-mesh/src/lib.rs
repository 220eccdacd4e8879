//! # CT Mesh
//!
//! Turns a segmented CT label volume into a labeled, boundary-tagged
//! tetrahedral mesh for finite-element analysis.
//!
//! ## Architecture
//!
//! ```text
//! LabelVolume → MeshGenerator (external) → clean → label_cells → tag_boundary → VTK
//! ```
//!
//! ## Stages
//!
//! - **Coordinate Mapper**: physical point → voxel index ([`volume::geometry`])
//! - **Voxel Sampler**: voxel index → label or out-of-bounds ([`volume::sampler`])
//! - **Mesh Cleaner**: point merging and cell filtering ([`clean`])
//! - **Material Labeler**: one material per cell from its centroid ([`labeling`])
//! - **Boundary Tagger**: per-vertex boundary flags ([`boundary`])
//! - **Pipeline Orchestrator**: runs the stages in order ([`pipeline`])
//!
//! ## Usage
//!
//! ```rust
//! use ct_mesh::mesh::RawMesh;
//! use ct_mesh::volume::{ImageGeometry, LabelVolume};
//! use ct_mesh::{MeshResult, Pipeline};
//! use config::MeshingArguments;
//! use glam::DVec3;
//!
//! let geometry = ImageGeometry::new([4, 4, 4], DVec3::ONE).unwrap();
//! let volume = LabelVolume::filled(geometry, 1);
//!
//! let mesher = |_: &LabelVolume, _: &MeshingArguments| -> MeshResult<RawMesh> {
//!     let mut raw = RawMesh::new();
//!     for p in [DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::Z] {
//!         raw.add_point(p * 2.0);
//!     }
//!     raw.add_tetra([0, 1, 2, 3]);
//!     Ok(raw)
//! };
//!
//! let pipeline = Pipeline::new(MeshingArguments::default()).unwrap();
//! let labeled = pipeline.run(&volume, &mesher).unwrap();
//! assert_eq!(labeled.materials.len(), 1);
//! assert_eq!(labeled.boundary.len(), 4);
//! ```

pub mod boundary;
pub mod clean;
pub mod error;
pub mod labeling;
pub mod mesh;
pub mod pipeline;
pub mod volume;
pub mod vtk;

pub use error::{MeshError, MeshResult};
pub use mesh::{RawMesh, TetMesh};
pub use pipeline::{LabeledMesh, MeshGenerator, Pipeline};
