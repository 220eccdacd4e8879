//! # Mesh Cleaner
//!
//! Turns raw mesher output into a canonical tetrahedral cell complex:
//!
//! 1. Points closer than the merge tolerance are merged (spatial hash,
//!    3×3×3 neighbourhood scan). The lowest-index point of a cluster is kept
//!    with its coordinates unchanged.
//! 2. Non-tetrahedral cells, tetrahedra with out-of-range indices,
//!    tetrahedra that collapse after merging and repeated tetrahedra are
//!    dropped and counted.
//! 3. Points no longer used by any cell are removed; survivors keep their
//!    relative order.
//!
//! Geometry of retained points is never modified.

use std::collections::{HashMap, HashSet};

use config::MeshingArguments;
use glam::DVec3;
use tracing::{debug, info};

use crate::mesh::{CellKind, RawMesh, TetMesh};

/// Parameters of the cleaning pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CleanOptions {
    /// Absolute merge distance. Zero merges exactly coincident points only.
    pub tolerance: f64,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            tolerance: config::constants::POINT_MERGE_TOLERANCE,
        }
    }
}

impl CleanOptions {
    pub fn from_arguments(args: &MeshingArguments) -> Self {
        Self {
            tolerance: args.merge_tolerance,
        }
    }
}

/// Diagnostic counts of a cleaning pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanReport {
    pub points_before: usize,
    pub points_after: usize,
    pub cells_before: usize,
    pub cells_after: usize,
    /// Cells whose kind is not tetrahedron.
    pub non_tetra_dropped: usize,
    /// Tetrahedra with out-of-range indices or a wrong point count.
    pub invalid_dropped: usize,
    /// Tetrahedra with repeated points after merging.
    pub degenerate_dropped: usize,
    /// Tetrahedra spanning the same point set as an earlier one.
    pub duplicate_dropped: usize,
    /// Points merged into an earlier coincident point.
    pub merged_points: usize,
    /// Points removed because no retained cell uses them.
    pub unused_points_removed: usize,
}

impl CleanReport {
    /// Total number of dropped cells.
    pub fn cells_dropped(&self) -> usize {
        self.non_tetra_dropped + self.invalid_dropped + self.degenerate_dropped + self.duplicate_dropped
    }

    /// Whether the counts agree with each other.
    pub fn is_consistent(&self) -> bool {
        self.cells_after <= self.cells_before
            && self.points_after <= self.points_before
            && self.cells_before == self.cells_after + self.cells_dropped()
            && self.points_before
                == self.points_after + self.merged_points + self.unused_points_removed
    }

    /// Whether the pass changed nothing.
    pub fn is_noop(&self) -> bool {
        self.cells_dropped() == 0 && self.merged_points == 0 && self.unused_points_removed == 0
    }
}

/// Cleaned mesh plus its diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanOutcome {
    pub mesh: TetMesh,
    pub report: CleanReport,
}

/// Cleans a raw mesh.
///
/// # Example
///
/// ```rust
/// use ct_mesh::clean::{clean, CleanOptions};
/// use ct_mesh::mesh::{CellKind, RawMesh};
/// use glam::DVec3;
///
/// let mut raw = RawMesh::new();
/// for p in [DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::Z, DVec3::X] {
///     raw.add_point(p);
/// }
/// raw.add_tetra([0, 4, 2, 3]);
/// raw.add_cell(CellKind::Triangle, vec![0, 1, 2]);
///
/// let outcome = clean(raw, &CleanOptions::default());
/// assert_eq!(outcome.mesh.point_count(), 4);
/// assert_eq!(outcome.mesh.cell_count(), 1);
/// assert_eq!(outcome.report.non_tetra_dropped, 1);
/// ```
pub fn clean(raw: RawMesh, options: &CleanOptions) -> CleanOutcome {
    let RawMesh { points, cells } = raw;
    let mut report = CleanReport {
        points_before: points.len(),
        cells_before: cells.len(),
        ..CleanReport::default()
    };

    let (representative, merged) = merge_points(&points, options.tolerance);
    report.merged_points = merged;

    let mut seen: HashSet<[u32; 4]> = HashSet::with_capacity(cells.len());
    let mut tetrahedra: Vec<[u32; 4]> = Vec::with_capacity(cells.len());

    for cell in &cells {
        if cell.kind != CellKind::Tetra {
            report.non_tetra_dropped += 1;
            continue;
        }
        let Some(mapped) = remap_tetra(&cell.points, &representative) else {
            report.invalid_dropped += 1;
            continue;
        };
        if !all_distinct(mapped) {
            report.degenerate_dropped += 1;
            continue;
        }
        let mut key = mapped;
        key.sort_unstable();
        if !seen.insert(key) {
            report.duplicate_dropped += 1;
            continue;
        }
        tetrahedra.push(mapped);
    }

    let (points, tetrahedra) = compact(points, tetrahedra);
    report.points_after = points.len();
    report.cells_after = tetrahedra.len();
    report.unused_points_removed = report.points_before - report.merged_points - report.points_after;

    log_report(&report);

    CleanOutcome {
        mesh: TetMesh::from_parts(points, tetrahedra),
        report,
    }
}

/// Runs the cleaning pass again over an already tetrahedral mesh.
pub fn clean_tet_mesh(mesh: &TetMesh, options: &CleanOptions) -> CleanOutcome {
    clean(RawMesh::from(mesh.clone()), options)
}

fn log_report(report: &CleanReport) {
    info!(
        points = report.points_before,
        cells = report.cells_before,
        "raw mesh"
    );
    info!(
        non_tetra = report.non_tetra_dropped,
        degenerate = report.degenerate_dropped,
        duplicate = report.duplicate_dropped,
        invalid = report.invalid_dropped,
        "dropped cells"
    );
    info!(
        points = report.points_after,
        tetrahedra = report.cells_after,
        merged_points = report.merged_points,
        unused_points = report.unused_points_removed,
        "clean mesh"
    );
    debug!(consistent = report.is_consistent(), "clean report");
}

fn remap_tetra(indices: &[u32], representative: &[u32]) -> Option<[u32; 4]> {
    let [a, b, c, d] = <[u32; 4]>::try_from(indices).ok()?;
    let map = |i: u32| representative.get(i as usize).copied();
    Some([map(a)?, map(b)?, map(c)?, map(d)?])
}

fn all_distinct(t: [u32; 4]) -> bool {
    t[0] != t[1] && t[0] != t[2] && t[0] != t[3] && t[1] != t[2] && t[1] != t[3] && t[2] != t[3]
}

/// Drops unused points and renumbers cells in original point order.
fn compact(points: Vec<DVec3>, mut tetrahedra: Vec<[u32; 4]>) -> (Vec<DVec3>, Vec<[u32; 4]>) {
    let mut used = vec![false; points.len()];
    for tet in &tetrahedra {
        for &p in tet {
            used[p as usize] = true;
        }
    }

    let mut new_index = vec![u32::MAX; points.len()];
    let mut kept = Vec::with_capacity(points.len());
    for (i, point) in points.into_iter().enumerate() {
        if used[i] {
            new_index[i] = kept.len() as u32;
            kept.push(point);
        }
    }

    for tet in &mut tetrahedra {
        for p in tet.iter_mut() {
            *p = new_index[*p as usize];
        }
    }
    (kept, tetrahedra)
}

// =============================================================================
// POINT MERGING
// =============================================================================

/// Maps every point to the index of the point it is merged into.
///
/// Returns the mapping and the number of merged points. Representatives are
/// pairwise at least `tolerance` apart, so a second pass merges nothing.
fn merge_points(points: &[DVec3], tolerance: f64) -> (Vec<u32>, usize) {
    if tolerance > 0.0 {
        merge_within_tolerance(points, tolerance)
    } else {
        merge_exact(points)
    }
}

fn merge_exact(points: &[DVec3]) -> (Vec<u32>, usize) {
    let mut first: HashMap<[u64; 3], u32> = HashMap::with_capacity(points.len());
    let mut representative = Vec::with_capacity(points.len());
    let mut merged = 0;

    for (idx, p) in points.iter().enumerate() {
        // +0.0 normalizes negative zero
        let key = [(p.x + 0.0).to_bits(), (p.y + 0.0).to_bits(), (p.z + 0.0).to_bits()];
        let rep = *first.entry(key).or_insert(idx as u32);
        if rep != idx as u32 {
            merged += 1;
        }
        representative.push(rep);
    }
    (representative, merged)
}

fn merge_within_tolerance(points: &[DVec3], tolerance: f64) -> (Vec<u32>, usize) {
    let cell_size = tolerance * 2.0;

    let mut spatial_hash: HashMap<(i64, i64, i64), Vec<u32>> = HashMap::new();
    for (idx, p) in points.iter().enumerate() {
        spatial_hash
            .entry(hash_cell(*p, cell_size))
            .or_default()
            .push(idx as u32);
    }

    let mut representative: Vec<u32> = (0..points.len() as u32).collect();
    let mut merged = 0;

    for (idx, p) in points.iter().enumerate() {
        let idx = idx as u32;
        if representative[idx as usize] != idx {
            continue;
        }

        let cell = hash_cell(*p, cell_size);
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let neighbor = (
                        cell.0.saturating_add(dx),
                        cell.1.saturating_add(dy),
                        cell.2.saturating_add(dz),
                    );
                    let Some(candidates) = spatial_hash.get(&neighbor) else {
                        continue;
                    };
                    for &other in candidates {
                        if other <= idx || representative[other as usize] != other {
                            continue;
                        }
                        if p.distance(points[other as usize]) < tolerance {
                            representative[other as usize] = idx;
                            merged += 1;
                        }
                    }
                }
            }
        }
    }
    (representative, merged)
}

fn hash_cell(p: DVec3, cell_size: f64) -> (i64, i64, i64) {
    (
        (p.x / cell_size).floor() as i64,
        (p.y / cell_size).floor() as i64,
        (p.z / cell_size).floor() as i64,
    )
}

#[cfg(test)]
mod tests;
