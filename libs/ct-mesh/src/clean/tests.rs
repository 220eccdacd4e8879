//! # Mesh Cleaner Tests

use super::*;
use crate::mesh::RawCell;

/// Two tetrahedra sharing a face, with the shared points duplicated.
fn duplicated_pair() -> RawMesh {
    let mut raw = RawMesh::new();
    // first tetrahedron
    raw.add_point(DVec3::new(0.0, 0.0, 0.0));
    raw.add_point(DVec3::new(1.0, 0.0, 0.0));
    raw.add_point(DVec3::new(0.0, 1.0, 0.0));
    raw.add_point(DVec3::new(0.0, 0.0, 1.0));
    // second tetrahedron, shared face repeated
    raw.add_point(DVec3::new(1.0, 0.0, 0.0));
    raw.add_point(DVec3::new(0.0, 1.0, 0.0));
    raw.add_point(DVec3::new(0.0, 0.0, 1.0));
    raw.add_point(DVec3::new(1.0, 1.0, 1.0));
    raw.add_tetra([0, 1, 2, 3]);
    raw.add_tetra([4, 5, 6, 7]);
    raw
}

#[test]
fn test_duplicate_points_are_merged() {
    let outcome = clean(duplicated_pair(), &CleanOptions::default());
    assert_eq!(outcome.mesh.point_count(), 5);
    assert_eq!(outcome.mesh.cell_count(), 2);
    assert_eq!(outcome.mesh.cells()[1], [1, 2, 3, 4]);
    assert_eq!(outcome.report.merged_points, 3);
    assert!(outcome.mesh.validate());
    assert!(outcome.report.is_consistent());
}

#[test]
fn test_points_within_tolerance_are_merged() {
    let mut raw = duplicated_pair();
    raw.points[4] += DVec3::splat(1e-9);
    raw.points[5] -= DVec3::new(0.0, 5e-7, 0.0);
    let outcome = clean(raw, &CleanOptions { tolerance: 1e-6 });
    assert_eq!(outcome.mesh.point_count(), 5);
    // kept points are never moved
    assert_eq!(outcome.mesh.points()[1], DVec3::new(1.0, 0.0, 0.0));
    assert_eq!(outcome.mesh.points()[2], DVec3::new(0.0, 1.0, 0.0));
}

#[test]
fn test_points_beyond_tolerance_are_kept() {
    let mut raw = duplicated_pair();
    raw.points[4] += DVec3::new(1e-3, 0.0, 0.0);
    let outcome = clean(raw, &CleanOptions { tolerance: 1e-6 });
    assert_eq!(outcome.mesh.point_count(), 6);
    assert_eq!(outcome.report.merged_points, 2);
}

#[test]
fn test_zero_tolerance_merges_exact_copies_only() {
    let mut raw = duplicated_pair();
    raw.points[4] += DVec3::splat(1e-12);
    raw.points[5] = DVec3::new(-0.0, 1.0, 0.0);
    let outcome = clean(raw, &CleanOptions { tolerance: 0.0 });
    assert_eq!(outcome.report.merged_points, 2);
    assert_eq!(outcome.mesh.point_count(), 6);
}

#[test]
fn test_non_tetrahedral_cells_are_dropped() {
    let mut raw = duplicated_pair();
    raw.add_cell(CellKind::Triangle, vec![0, 1, 2]);
    raw.add_cell(CellKind::Vertex, vec![7]);
    raw.add_cell(CellKind::Other(12), vec![0, 1, 2, 3, 4, 5, 6, 7]);
    let outcome = clean(raw, &CleanOptions::default());
    assert_eq!(outcome.report.cells_before, 5);
    assert_eq!(outcome.report.cells_after, 2);
    assert_eq!(outcome.report.non_tetra_dropped, 3);
    assert!(outcome.report.is_consistent());
}

#[test]
fn test_collapsed_tetrahedra_are_dropped() {
    let mut raw = duplicated_pair();
    // points 1 and 4 coincide, so this cell collapses after merging
    raw.add_tetra([1, 4, 2, 3]);
    let outcome = clean(raw, &CleanOptions::default());
    assert_eq!(outcome.report.degenerate_dropped, 1);
    assert_eq!(outcome.mesh.cell_count(), 2);
}

#[test]
fn test_repeated_tetrahedra_are_dropped() {
    let mut raw = duplicated_pair();
    raw.add_tetra([3, 2, 1, 0]);
    raw.add_tetra([7, 6, 1, 2]); // same as the second cell once merged
    let outcome = clean(raw, &CleanOptions::default());
    assert_eq!(outcome.report.duplicate_dropped, 2);
    assert_eq!(outcome.mesh.cell_count(), 2);
}

#[test]
fn test_invalid_cells_are_dropped() {
    let mut raw = duplicated_pair();
    raw.add_tetra([0, 1, 2, 99]);
    raw.cells.push(RawCell {
        kind: CellKind::Tetra,
        points: vec![0, 1, 2],
    });
    let outcome = clean(raw, &CleanOptions::default());
    assert_eq!(outcome.report.invalid_dropped, 2);
    assert!(outcome.report.is_consistent());
}

#[test]
fn test_unused_points_are_removed_in_order() {
    let mut raw = RawMesh::new();
    raw.add_point(DVec3::new(9.0, 9.0, 9.0)); // orphan
    raw.add_point(DVec3::ZERO);
    raw.add_point(DVec3::X);
    raw.add_point(DVec3::new(5.0, 5.0, 5.0)); // only used by a triangle
    raw.add_point(DVec3::Y);
    raw.add_point(DVec3::Z);
    raw.add_tetra([5, 4, 2, 1]);
    raw.add_cell(CellKind::Triangle, vec![3, 1, 2]);

    let outcome = clean(raw, &CleanOptions::default());
    assert_eq!(
        outcome.mesh.points(),
        &[DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::Z]
    );
    assert_eq!(outcome.mesh.cells(), &[[3, 2, 1, 0]]);
    assert_eq!(outcome.report.unused_points_removed, 2);
    assert!(outcome.report.is_consistent());
}

#[test]
fn test_counts_never_grow() {
    let mut raw = duplicated_pair();
    raw.add_cell(CellKind::Line, vec![0, 1]);
    raw.add_tetra([0, 0, 0, 0]);
    let before = (raw.point_count(), raw.cell_count());
    let outcome = clean(raw, &CleanOptions::default());
    assert!(outcome.mesh.point_count() <= before.0);
    assert!(outcome.mesh.cell_count() <= before.1);
    assert!(outcome.report.is_consistent());
}

#[test]
fn test_cleaning_is_idempotent() {
    let mut raw = duplicated_pair();
    raw.add_cell(CellKind::Triangle, vec![0, 1, 2]);
    raw.add_tetra([1, 4, 2, 3]);
    raw.points[6] += DVec3::splat(4e-7);

    let options = CleanOptions::default();
    let first = clean(raw, &options);
    let second = clean_tet_mesh(&first.mesh, &options);
    assert_eq!(second.mesh, first.mesh);
    assert!(second.report.is_noop());
    assert_eq!(second.report.cells_dropped(), 0);
}

#[test]
fn test_chain_merges_into_first_point_only() {
    // 0 and 1 are within tolerance, 1 and 2 are too, but 0 and 2 are not
    let mut raw = RawMesh::new();
    raw.add_point(DVec3::new(0.0, 0.0, 0.0));
    raw.add_point(DVec3::new(0.6e-6, 0.0, 0.0));
    raw.add_point(DVec3::new(1.2e-6, 0.0, 0.0));
    raw.add_point(DVec3::new(1.0, 0.0, 0.0));
    raw.add_point(DVec3::new(0.0, 1.0, 0.0));
    raw.add_point(DVec3::new(0.0, 0.0, 1.0));
    raw.add_tetra([0, 3, 4, 5]);
    raw.add_tetra([2, 3, 4, 5]);
    raw.add_tetra([1, 3, 4, 5]);

    let options = CleanOptions { tolerance: 1e-6 };
    let first = clean(raw, &options);
    assert_eq!(first.report.merged_points, 1);
    assert_eq!(first.mesh.point_count(), 5);
    assert_eq!(first.report.duplicate_dropped, 1);

    let second = clean_tet_mesh(&first.mesh, &options);
    assert!(second.report.is_noop());
}

#[test]
fn test_empty_mesh() {
    let outcome = clean(RawMesh::new(), &CleanOptions::default());
    assert!(outcome.mesh.is_empty());
    assert_eq!(outcome.report, CleanReport::default());
}
