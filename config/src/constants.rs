//! # Configuration Constants
//!
//! Centralized defaults for the CT meshing pipeline. Mesh quality criteria,
//! image spacing, boundary-condition parameters and cleaning tolerances are
//! defined here.
//!
//! ## Categories
//!
//! - **Mesh quality**: Criteria forwarded to the external mesh generator
//! - **Image**: Voxel spacing and the value outside the segmented object
//! - **Boundary conditions**: Slab thickness for the fixed support
//! - **Cleaning**: Point merge tolerance
//! - **Labels**: The fixed four-class label scheme

// =============================================================================
// MESH QUALITY CONSTANTS
// =============================================================================

/// Default lower bound for facet angles, in degrees.
///
/// # Example
///
/// ```rust
/// use config::constants::DEFAULT_FACET_ANGLE;
///
/// assert_eq!(DEFAULT_FACET_ANGLE, 30.0);
/// ```
pub const DEFAULT_FACET_ANGLE: f64 = 30.0;

/// Default upper bound for surface facet edge size at feature edges.
pub const DEFAULT_FACET_SIZE: f64 = 2.5;

/// Default upper bound for the distance between a facet and the surface.
pub const DEFAULT_FACET_DISTANCE: f64 = 2.0;

/// Default upper bound for the tetrahedron circumradius to shortest edge
/// ratio.
pub const DEFAULT_CELL_RADIUS_EDGE_RATIO: f64 = 2.0;

/// Default upper bound for the tetrahedron circumradius.
pub const DEFAULT_CELL_SIZE: f64 = 3.0;

// =============================================================================
// IMAGE CONSTANTS
// =============================================================================

/// Default voxel spacing (x, y, z) in millimetres.
///
/// # Example
///
/// ```rust
/// use config::constants::DEFAULT_VOXEL_SPACING;
///
/// assert!(DEFAULT_VOXEL_SPACING.iter().all(|s| *s > 0.0));
/// ```
pub const DEFAULT_VOXEL_SPACING: [f64; 3] = [0.273, 0.273, 0.273];

/// Label value of voxels outside the segmented object.
pub const VALUE_OUTSIDE: u16 = 0;

// =============================================================================
// BOUNDARY CONDITION CONSTANTS
// =============================================================================

/// Default thickness of the fixed slab above the minimum-Z face of the mesh.
///
/// # Example
///
/// ```rust
/// use config::constants::DEFAULT_BC_THICKNESS;
///
/// assert!(DEFAULT_BC_THICKNESS > 0.0);
/// ```
pub const DEFAULT_BC_THICKNESS: f64 = 1.5;

// =============================================================================
// CLEANING CONSTANTS
// =============================================================================

/// Absolute distance below which two mesh points are merged into one.
///
/// Expressed in mesh units (millimetres for CT data). Well below the voxel
/// spacing so that distinct mesher vertices never collapse.
///
/// # Example
///
/// ```rust
/// use config::constants::{POINT_MERGE_TOLERANCE, DEFAULT_VOXEL_SPACING};
///
/// assert!(POINT_MERGE_TOLERANCE < DEFAULT_VOXEL_SPACING[0] * 1e-3);
/// ```
pub const POINT_MERGE_TOLERANCE: f64 = 1e-6;

// =============================================================================
// LABEL CONSTANTS
// =============================================================================

/// The only label values a segmented volume may contain.
pub const ALLOWED_LABELS: [u16; 4] = [0, 1, 2, 3];

/// Material assigned to background voxels sampled inside the mesh.
pub const BACKGROUND_MATERIAL: u8 = 3;

/// Material assigned to cells whose centroid falls outside the volume.
///
/// # Example
///
/// ```rust
/// use config::constants::{DEFAULT_FALLBACK_MATERIAL, MATERIAL_RANGE};
///
/// assert!(MATERIAL_RANGE.contains(&DEFAULT_FALLBACK_MATERIAL));
/// ```
pub const DEFAULT_FALLBACK_MATERIAL: u8 = 3;

/// Material identifiers written to the output mesh.
pub const MATERIAL_RANGE: std::ops::RangeInclusive<u8> = 1..=3;
