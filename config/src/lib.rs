//! # Config Crate
//!
//! Centralized configuration for the CT labeled tetrahedral meshing
//! pipeline. Defaults live in [`constants`]; the validated run configuration
//! is [`MeshingArguments`].
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::DEFAULT_BC_THICKNESS;
//! use config::MeshingArguments;
//!
//! let args = MeshingArguments::default();
//! assert_eq!(args.bc_thickness, DEFAULT_BC_THICKNESS);
//! assert!(args.validate().is_ok());
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All defaults defined once, used everywhere
//! - **Explicit**: Arguments are passed into each stage, never read globally
//! - **Fail Fast**: Invalid bundles are rejected before any file is read

pub mod arguments;
pub mod constants;

pub use arguments::{BoundaryConditionMode, ConfigError, MeshQuality, MeshingArguments};
