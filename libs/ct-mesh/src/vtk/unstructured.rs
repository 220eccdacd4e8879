//! `UNSTRUCTURED_GRID` adapters between `vtkio` and [`RawMesh`].

use std::io::Write;

use glam::DVec3;
use tracing::debug;
use vtkio::model::{
    Attribute, Attributes, CellType, Cells, DataArrayBase, DataSet, ElementType, IOBuffer,
    UnstructuredGridPiece, VertexNumbers, Vtk,
};

use crate::error::{MeshError, MeshResult};
use crate::mesh::{CellKind, RawCell, RawMesh, TetMesh};
use crate::pipeline::LabeledMesh;

use super::{inline_piece, legacy_file, scalar_values, write_ascii};

/// Name of the per-cell material array.
pub const MATERIALS_ARRAY: &str = "materials";

/// Name of the per-point boundary flag array.
pub const BOUNDARY_ARRAY: &str = "boundaryConditions";

/// Values of a data array.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValues {
    Int(Vec<i64>),
    Float(Vec<f64>),
}

impl ScalarValues {
    pub fn len(&self) -> usize {
        match self {
            ScalarValues::Int(v) => v.len(),
            ScalarValues::Float(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Named point or cell attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct DataArray {
    pub name: String,
    pub components: usize,
    pub values: ScalarValues,
}

/// Parsed unstructured grid with its attribute arrays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnstructuredGrid {
    pub mesh: RawMesh,
    pub cell_data: Vec<DataArray>,
    pub point_data: Vec<DataArray>,
}

impl UnstructuredGrid {
    pub fn cell_array(&self, name: &str) -> Option<&DataArray> {
        self.cell_data.iter().find(|a| a.name == name)
    }

    pub fn point_array(&self, name: &str) -> Option<&DataArray> {
        self.point_data.iter().find(|a| a.name == name)
    }
}

// =============================================================================
// READER
// =============================================================================

/// Parses a legacy unstructured grid.
///
/// Scalar and field arrays are kept; vectors, normals, tensors, texture
/// coordinates and color scalars are skipped.
pub fn read_unstructured_grid(bytes: &[u8]) -> MeshResult<UnstructuredGrid> {
    let vtk = Vtk::parse_legacy_be(bytes)?;
    debug!(version = ?vtk.version, title = %vtk.title, "reading unstructured grid");
    let DataSet::UnstructuredGrid { pieces, .. } = vtk.data else {
        return Err(MeshError::unsupported(
            "dataset kind (expected UNSTRUCTURED_GRID)",
        ));
    };
    grid_from_piece(inline_piece(pieces)?)
}

fn grid_from_piece(piece: UnstructuredGridPiece) -> MeshResult<UnstructuredGrid> {
    let points = points_from_buffer(piece.points)?;
    let connectivity = cell_connectivity(piece.cells.cell_verts)?;
    let types = piece.cells.types;
    if connectivity.len() != types.len() {
        return Err(MeshError::malformed(format!(
            "{} cells but {} cell types",
            connectivity.len(),
            types.len()
        )));
    }
    let cells: Vec<RawCell> = connectivity
        .into_iter()
        .zip(types)
        .map(|(points, cell_type)| RawCell {
            kind: CellKind::from_vtk(cell_type as u8),
            points,
        })
        .collect();

    let cell_data = attribute_arrays(piece.data.cell, cells.len())?;
    let point_data = attribute_arrays(piece.data.point, points.len())?;
    Ok(UnstructuredGrid {
        mesh: RawMesh { points, cells },
        cell_data,
        point_data,
    })
}

fn points_from_buffer(buffer: IOBuffer) -> MeshResult<Vec<DVec3>> {
    let coords: Vec<f64> = match scalar_values(buffer)? {
        ScalarValues::Float(v) => v,
        ScalarValues::Int(v) => v.into_iter().map(|c| c as f64).collect(),
    };
    if coords.len() % 3 != 0 {
        return Err(MeshError::malformed(format!(
            "{} coordinates do not form 3D points",
            coords.len()
        )));
    }
    Ok(coords
        .chunks_exact(3)
        .map(|c| DVec3::new(c[0], c[1], c[2]))
        .collect())
}

/// Splits cell connectivity into one index list per cell.
///
/// Accepts the classic count-prefixed list and the offsets layout, where
/// each offset is the end of its cell in the connectivity array. Every
/// entry must belong to exactly one non-empty cell.
pub(super) fn cell_connectivity(numbers: VertexNumbers) -> MeshResult<Vec<Vec<u32>>> {
    match numbers {
        VertexNumbers::Legacy {
            num_cells,
            vertices,
        } => {
            let mut cells = Vec::new();
            let mut rest = vertices.as_slice();
            while let Some((&n, tail)) = rest.split_first() {
                let n = n as usize;
                if n == 0 || n > tail.len() {
                    return Err(MeshError::malformed(format!(
                        "cell {} lists {n} points with {} values left",
                        cells.len(),
                        tail.len()
                    )));
                }
                let (ids, tail) = tail.split_at(n);
                cells.push(ids.to_vec());
                rest = tail;
            }
            if cells.len() != num_cells as usize {
                return Err(MeshError::malformed(format!(
                    "{num_cells} cells declared but {} listed",
                    cells.len()
                )));
            }
            Ok(cells)
        }
        VertexNumbers::XML {
            connectivity,
            offsets,
        } => {
            let mut cells = Vec::with_capacity(offsets.len());
            let mut start = 0;
            for &offset in &offsets {
                let end = usize::try_from(offset).unwrap_or(usize::MAX);
                if end <= start || end > connectivity.len() {
                    return Err(MeshError::malformed(format!(
                        "invalid offset {offset} for cell {} starting at {start}",
                        cells.len()
                    )));
                }
                let ids = connectivity[start..end]
                    .iter()
                    .map(|&id| {
                        u32::try_from(id).map_err(|_| {
                            MeshError::malformed(format!("point index {id} out of range"))
                        })
                    })
                    .collect::<MeshResult<Vec<u32>>>()?;
                cells.push(ids);
                start = end;
            }
            if start != connectivity.len() {
                return Err(MeshError::malformed(format!(
                    "{} connectivity entries after the last cell",
                    connectivity.len() - start
                )));
            }
            Ok(cells)
        }
    }
}

/// Converts scalar and field attributes holding `tuples` tuples each.
pub(super) fn attribute_arrays(
    attributes: Vec<Attribute>,
    tuples: usize,
) -> MeshResult<Vec<DataArray>> {
    let mut arrays = Vec::new();
    for attribute in attributes {
        match attribute {
            Attribute::DataArray(array) => match array.elem {
                ElementType::Scalars { num_comp, .. } => {
                    arrays.push(data_array(array.name, num_comp, array.data, tuples)?);
                }
                _ => debug!(name = %array.name, "skipping non-scalar attribute"),
            },
            Attribute::Field {
                data_array: fields, ..
            } => {
                for field in fields {
                    arrays.push(data_array(field.name, field.elem, field.data, tuples)?);
                }
            }
        }
    }
    Ok(arrays)
}

fn data_array(
    name: String,
    components: u32,
    data: IOBuffer,
    tuples: usize,
) -> MeshResult<DataArray> {
    let components = components as usize;
    let values = scalar_values(data)?;
    if values.len() != tuples.saturating_mul(components) {
        return Err(MeshError::malformed(format!(
            "array {name} has {} values, expected {tuples} tuples of {components}",
            values.len()
        )));
    }
    Ok(DataArray {
        name,
        components,
        values,
    })
}

// =============================================================================
// WRITER
// =============================================================================

fn int_scalars(name: &str, values: Vec<i32>) -> Attribute {
    Attribute::DataArray(DataArrayBase {
        name: name.to_string(),
        elem: ElementType::Scalars {
            num_comp: 1,
            lookup_table: None,
        },
        data: IOBuffer::I32(values),
    })
}

fn cell_type(kind: CellKind) -> MeshResult<CellType> {
    Ok(match kind.vtk_code() {
        1 => CellType::Vertex,
        2 => CellType::PolyVertex,
        3 => CellType::Line,
        4 => CellType::PolyLine,
        5 => CellType::Triangle,
        6 => CellType::TriangleStrip,
        7 => CellType::Polygon,
        8 => CellType::Pixel,
        9 => CellType::Quad,
        10 => CellType::Tetra,
        11 => CellType::Voxel,
        12 => CellType::Hexahedron,
        13 => CellType::Wedge,
        14 => CellType::Pyramid,
        code => {
            return Err(MeshError::unsupported(format!(
                "writing VTK cell type {code}"
            )))
        }
    })
}

fn grid_piece<'c>(
    points: &[DVec3],
    cells: impl Iterator<Item = (CellKind, &'c [u32])>,
    data: Attributes,
) -> MeshResult<UnstructuredGridPiece> {
    let mut vertices = Vec::new();
    let mut types = Vec::new();
    for (kind, ids) in cells {
        let n = u32::try_from(ids.len())
            .map_err(|_| MeshError::invalid_mesh("cell with too many points"))?;
        vertices.push(n);
        vertices.extend_from_slice(ids);
        types.push(cell_type(kind)?);
    }
    let num_cells = u32::try_from(types.len())
        .map_err(|_| MeshError::invalid_mesh("too many cells for a VTK file"))?;

    Ok(UnstructuredGridPiece {
        points: IOBuffer::F64(points.iter().flat_map(|p| p.to_array()).collect()),
        cells: Cells {
            cell_verts: VertexNumbers::Legacy {
                num_cells,
                vertices,
            },
            types,
        },
        data,
    })
}

/// Writes the labeled mesh with `materials` cell data and
/// `boundaryConditions` point data.
pub fn write_labeled_mesh<W: Write>(writer: &mut W, labeled: &LabeledMesh) -> MeshResult<()> {
    if !labeled.is_consistent() {
        return Err(MeshError::invalid_mesh(
            "attribute arrays do not match the mesh",
        ));
    }
    let mesh = &labeled.mesh;
    let data = Attributes {
        point: vec![int_scalars(
            BOUNDARY_ARRAY,
            labeled.boundary.as_slice().iter().map(|&f| i32::from(f)).collect(),
        )],
        cell: vec![int_scalars(
            MATERIALS_ARRAY,
            labeled.materials.iter().map(|m| i32::from(m.id())).collect(),
        )],
    };
    let piece = grid_piece(mesh.points(), tet_cells(mesh), data)?;
    write_ascii(
        writer,
        legacy_file("ct-mesh labeled tetrahedral mesh", DataSet::inline(piece)),
    )
}

/// Writes a raw mesh without attributes, as an external mesher would.
pub fn write_raw_mesh<W: Write>(writer: &mut W, mesh: &RawMesh) -> MeshResult<()> {
    let cells = mesh.cells.iter().map(|c| (c.kind, c.points.as_slice()));
    let piece = grid_piece(&mesh.points, cells, Attributes::new())?;
    write_ascii(writer, legacy_file("ct-mesh raw mesh", DataSet::inline(piece)))
}

fn tet_cells(mesh: &TetMesh) -> impl Iterator<Item = (CellKind, &[u32])> {
    mesh.cells().iter().map(|c| (CellKind::Tetra, c.as_slice()))
}
