//! # Mesh Data Structures
//!
//! Raw mesher output ([`RawMesh`]) and the cleaned tetrahedral cell complex
//! ([`TetMesh`]) the labeling stages work on.

use glam::DVec3;

/// Cell kind, following the VTK cell type numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    Vertex,
    Line,
    Triangle,
    Quad,
    Tetra,
    /// Any other VTK cell type code.
    Other(u8),
}

impl CellKind {
    /// Maps a VTK cell type code to a kind.
    pub fn from_vtk(code: u8) -> Self {
        match code {
            1 => CellKind::Vertex,
            3 => CellKind::Line,
            5 => CellKind::Triangle,
            9 => CellKind::Quad,
            10 => CellKind::Tetra,
            other => CellKind::Other(other),
        }
    }

    /// Returns the VTK cell type code.
    pub fn vtk_code(self) -> u8 {
        match self {
            CellKind::Vertex => 1,
            CellKind::Line => 3,
            CellKind::Triangle => 5,
            CellKind::Quad => 9,
            CellKind::Tetra => 10,
            CellKind::Other(code) => code,
        }
    }
}

/// A cell of arbitrary kind as emitted by the mesh generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCell {
    pub kind: CellKind,
    pub points: Vec<u32>,
}

impl RawCell {
    /// Creates a tetrahedral cell.
    pub fn tetra(points: [u32; 4]) -> Self {
        Self {
            kind: CellKind::Tetra,
            points: points.to_vec(),
        }
    }
}

/// Unprocessed mesh produced by the external mesh generator.
///
/// Points may be duplicated and cells may be of any kind. Consumed by value
/// by the mesh cleaner.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawMesh {
    pub points: Vec<DVec3>,
    pub cells: Vec<RawCell>,
}

impl RawMesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a point and returns its index.
    pub fn add_point(&mut self, position: DVec3) -> u32 {
        let index = self.points.len() as u32;
        self.points.push(position);
        index
    }

    /// Adds a tetrahedron by point indices.
    pub fn add_tetra(&mut self, points: [u32; 4]) {
        self.cells.push(RawCell::tetra(points));
    }

    /// Adds a cell of any kind.
    pub fn add_cell(&mut self, kind: CellKind, points: Vec<u32>) {
        self.cells.push(RawCell { kind, points });
    }

    #[inline]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}

impl From<TetMesh> for RawMesh {
    fn from(mesh: TetMesh) -> Self {
        Self {
            points: mesh.points,
            cells: mesh.cells.into_iter().map(RawCell::tetra).collect(),
        }
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Aabb {
    /// Computes the bounding box of a point set, `None` when empty.
    pub fn from_points(points: &[DVec3]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut min = *first;
        let mut max = *first;
        for p in rest {
            min = min.min(*p);
            max = max.max(*p);
        }
        Some(Self { min, max })
    }
}

/// Tetrahedral cell complex.
///
/// Meshes returned by [`crate::clean::clean`] hold only unique points, every
/// point is used by a cell, and every cell has four distinct in-range
/// indices.
///
/// # Example
///
/// ```rust
/// use ct_mesh::TetMesh;
/// use glam::DVec3;
///
/// let mesh = TetMesh::from_parts(
///     vec![DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::Z],
///     vec![[0, 1, 2, 3]],
/// );
/// assert_eq!(mesh.centroid(0), DVec3::splat(0.25));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TetMesh {
    points: Vec<DVec3>,
    cells: Vec<[u32; 4]>,
}

impl TetMesh {
    /// Creates a mesh from points and tetrahedra.
    ///
    /// Indices are not checked here; see [`TetMesh::validate`].
    pub fn from_parts(points: Vec<DVec3>, cells: Vec<[u32; 4]>) -> Self {
        Self { points, cells }
    }

    #[inline]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn points(&self) -> &[DVec3] {
        &self.points
    }

    #[inline]
    pub fn cells(&self) -> &[[u32; 4]] {
        &self.cells
    }

    /// Returns the arithmetic mean of the cell's four vertices.
    pub fn centroid(&self, cell: usize) -> DVec3 {
        let [a, b, c, d] = self.cells[cell];
        (self.points[a as usize]
            + self.points[b as usize]
            + self.points[c as usize]
            + self.points[d as usize])
            / 4.0
    }

    /// Computes the axis-aligned bounding box over all points.
    pub fn bounding_box(&self) -> Option<Aabb> {
        Aabb::from_points(&self.points)
    }

    /// Checks that all cell indices are in range and distinct within each
    /// cell.
    pub fn validate(&self) -> bool {
        let point_count = self.points.len();
        self.cells.iter().all(|cell| {
            cell.iter().all(|&i| (i as usize) < point_count)
                && cell[0] != cell[1]
                && cell[0] != cell[2]
                && cell[0] != cell[3]
                && cell[1] != cell[2]
                && cell[1] != cell[3]
                && cell[2] != cell[3]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_kind_vtk_codes() {
        for code in [1u8, 3, 5, 9, 10, 12, 42] {
            assert_eq!(CellKind::from_vtk(code).vtk_code(), code);
        }
        assert_eq!(CellKind::from_vtk(10), CellKind::Tetra);
        assert_eq!(CellKind::from_vtk(12), CellKind::Other(12));
    }

    #[test]
    fn test_raw_mesh_add() {
        let mut raw = RawMesh::new();
        let a = raw.add_point(DVec3::ZERO);
        let b = raw.add_point(DVec3::X);
        assert_eq!((a, b), (0, 1));
        raw.add_tetra([0, 1, 0, 1]);
        raw.add_cell(CellKind::Triangle, vec![0, 1, 1]);
        assert_eq!(raw.point_count(), 2);
        assert_eq!(raw.cell_count(), 2);
        assert_eq!(raw.cells[0].kind, CellKind::Tetra);
    }

    #[test]
    fn test_bounding_box() {
        let mesh = TetMesh::from_parts(
            vec![DVec3::new(-1.0, -2.0, -3.0), DVec3::new(4.0, 5.0, 6.0)],
            Vec::new(),
        );
        let bounds = mesh.bounding_box().unwrap();
        assert_eq!(bounds.min, DVec3::new(-1.0, -2.0, -3.0));
        assert_eq!(bounds.max, DVec3::new(4.0, 5.0, 6.0));
        assert_eq!(bounds.max - bounds.min, DVec3::new(5.0, 7.0, 9.0));
    }

    #[test]
    fn test_empty_bounding_box() {
        assert!(TetMesh::default().bounding_box().is_none());
    }

    #[test]
    fn test_centroid() {
        let mesh = TetMesh::from_parts(
            vec![
                DVec3::new(0.0, 0.0, 0.0),
                DVec3::new(4.0, 0.0, 0.0),
                DVec3::new(0.0, 4.0, 0.0),
                DVec3::new(0.0, 0.0, 4.0),
            ],
            vec![[3, 2, 1, 0]],
        );
        assert_eq!(mesh.centroid(0), DVec3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_validate() {
        let points = vec![DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::Z];
        assert!(TetMesh::from_parts(points.clone(), vec![[0, 1, 2, 3]]).validate());
        assert!(!TetMesh::from_parts(points.clone(), vec![[0, 1, 2, 2]]).validate());
        assert!(!TetMesh::from_parts(points, vec![[0, 1, 2, 4]]).validate());
    }

    #[test]
    fn test_tet_mesh_into_raw() {
        let mesh = TetMesh::from_parts(
            vec![DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::Z],
            vec![[0, 1, 2, 3]],
        );
        let raw = RawMesh::from(mesh);
        assert_eq!(raw.cells, vec![RawCell::tetra([0, 1, 2, 3])]);
    }
}
