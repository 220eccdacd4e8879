//! # VTK I/O
//!
//! Legacy VTK files at the edges of the pipeline, read and written through
//! `vtkio`:
//!
//! - `STRUCTURED_POINTS` label volumes (input)
//! - `UNSTRUCTURED_GRID` meshes from the external mesher (input)
//! - `UNSTRUCTURED_GRID` labeled meshes with `materials` cell data and
//!   `boundaryConditions` point data (output)
//!
//! Files are written in ASCII. Readers accept ASCII and big-endian binary.
//!
//! ## Module Structure
//!
//! - `structured` - Label volume adapter
//! - `unstructured` - Mesh adapters

pub mod structured;
pub mod unstructured;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use config::MeshingArguments;
use tracing::info;
use vtkio::model::{ByteOrder, DataSet, IOBuffer, Piece, Version, Vtk};

use crate::error::{MeshError, MeshResult};
use crate::mesh::RawMesh;
use crate::pipeline::{LabeledMesh, MeshGenerator};
use crate::volume::LabelVolume;

pub use structured::{read_structured_points, write_structured_points};
pub use unstructured::{
    read_unstructured_grid, write_labeled_mesh, write_raw_mesh, DataArray, ScalarValues,
    UnstructuredGrid, BOUNDARY_ARRAY, MATERIALS_ARRAY,
};

/// Loads a label volume file.
pub fn load_label_volume(path: impl AsRef<Path>) -> MeshResult<LabelVolume> {
    let path = path.as_ref();
    let volume = read_structured_points(&fs::read(path)?)?;
    let geometry = volume.geometry();
    let [nx, ny, nz] = geometry.dimensions();
    info!(
        path = %path.display(),
        dimensions = ?geometry.dimensions(),
        spacing = %geometry.spacing(),
        origin = %geometry.origin(),
        far_corner = %geometry.index_to_physical([nx - 1, ny - 1, nz - 1]),
        "loaded label volume"
    );
    Ok(volume)
}

/// Loads an unstructured grid file.
pub fn load_unstructured_grid(path: impl AsRef<Path>) -> MeshResult<UnstructuredGrid> {
    let path = path.as_ref();
    let grid = read_unstructured_grid(&fs::read(path)?)?;
    info!(
        path = %path.display(),
        points = grid.mesh.point_count(),
        cells = grid.mesh.cell_count(),
        "loaded unstructured grid"
    );
    Ok(grid)
}

/// Writes the labeled mesh to `path`.
pub fn save_labeled_mesh(path: impl AsRef<Path>, labeled: &LabeledMesh) -> MeshResult<()> {
    let path = path.as_ref();
    let mut file = fs::File::create(path)?;
    write_labeled_mesh(&mut file, labeled)?;
    info!(path = %path.display(), "wrote labeled mesh");
    Ok(())
}

/// Mesh generator that imports the output file of an external mesher.
///
/// The mesher is run beforehand with the configured quality criteria; its
/// result may contain any cell kinds and is cleaned like any other raw mesh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VtkMeshImport {
    path: PathBuf,
}

impl VtkMeshImport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl MeshGenerator for VtkMeshImport {
    fn generate(&self, _volume: &LabelVolume, _args: &MeshingArguments) -> MeshResult<RawMesh> {
        Ok(load_unstructured_grid(&self.path)?.mesh)
    }
}

// =============================================================================
// SHARED ADAPTERS
// =============================================================================

fn legacy_file(title: &str, data: DataSet) -> Vtk {
    Vtk {
        version: Version::new((4, 2)),
        title: title.to_string(),
        byte_order: ByteOrder::BigEndian,
        file_path: None,
        data,
    }
}

/// Serializes `vtk` as legacy ASCII into `writer`.
fn write_ascii<W: Write>(writer: &mut W, vtk: Vtk) -> MeshResult<()> {
    let mut text = String::new();
    vtk.write_legacy_ascii(&mut text)?;
    writer.write_all(text.as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Returns the single inline piece of a legacy dataset.
fn inline_piece<P>(pieces: Vec<Piece<P>>) -> MeshResult<P> {
    let mut pieces = pieces.into_iter();
    match (pieces.next(), pieces.next()) {
        (Some(Piece::Inline(piece)), None) => Ok(*piece),
        (None, _) => Err(MeshError::malformed("dataset has no data")),
        _ => Err(MeshError::unsupported(
            "datasets split into several or external pieces",
        )),
    }
}

/// Widens any numeric buffer, keeping the integer/float distinction.
fn scalar_values(buffer: IOBuffer) -> MeshResult<ScalarValues> {
    fn ints<T: Into<i64>>(values: Vec<T>) -> ScalarValues {
        ScalarValues::Int(values.into_iter().map(Into::into).collect())
    }

    Ok(match buffer {
        IOBuffer::U8(v) => ints(v),
        IOBuffer::I8(v) => ints(v),
        IOBuffer::U16(v) => ints(v),
        IOBuffer::I16(v) => ints(v),
        IOBuffer::U32(v) => ints(v),
        IOBuffer::I32(v) => ints(v),
        IOBuffer::I64(v) => ScalarValues::Int(v),
        IOBuffer::U64(v) => ScalarValues::Int(
            v.into_iter()
                .map(i64::try_from)
                .collect::<Result<_, _>>()
                .map_err(|_| MeshError::malformed("unsigned 64-bit value out of range"))?,
        ),
        IOBuffer::F32(v) => ScalarValues::Float(v.into_iter().map(f64::from).collect()),
        IOBuffer::F64(v) => ScalarValues::Float(v),
        _ => return Err(MeshError::unsupported("bit arrays")),
    })
}
