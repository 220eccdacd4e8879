//! Command-line arguments and their merge with the configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use config::{BoundaryConditionMode, MeshingArguments};

#[derive(Parser, Debug)]
#[command(name = "ct-mesh")]
#[command(about = "Label and boundary-tag a tetrahedral mesh from a segmented CT volume", long_about = None)]
pub struct Cli {
    /// Segmented label volume (legacy VTK STRUCTURED_POINTS)
    #[arg(long)]
    pub volume: PathBuf,

    /// Raw tetrahedral mesh produced by the external mesher (legacy VTK UNSTRUCTURED_GRID)
    #[arg(long)]
    pub mesh: PathBuf,

    /// Output labeled mesh (legacy VTK UNSTRUCTURED_GRID)
    #[arg(short, long)]
    pub output: PathBuf,

    /// TOML configuration file; command-line values take precedence
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Lower bound for facet angles, in degrees
    #[arg(long)]
    pub facet_angle: Option<f64>,

    /// Upper bound for facet size
    #[arg(long)]
    pub facet_size: Option<f64>,

    /// Upper bound for facet to surface distance
    #[arg(long)]
    pub facet_distance: Option<f64>,

    /// Upper bound for the cell radius-edge ratio
    #[arg(long)]
    pub cell_radius_edge_ratio: Option<f64>,

    /// Upper bound for cell size
    #[arg(long)]
    pub cell_size: Option<f64>,

    /// Voxel spacing used for meshing (x y z)
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"])]
    pub voxel_spacing: Option<Vec<f64>>,

    /// Label value outside the object
    #[arg(long)]
    pub value_outside: Option<u16>,

    /// Boundary-condition mode
    #[arg(long, value_parser = parse_bc_mode)]
    pub bc_mode: Option<BoundaryConditionMode>,

    /// Thickness of the boundary-condition slab
    #[arg(long, allow_negative_numbers = true)]
    pub bc_thickness: Option<f64>,

    /// Absolute distance under which mesh points are merged
    #[arg(long)]
    pub merge_tolerance: Option<f64>,

    /// Material for cells whose centroid lies outside the volume
    #[arg(long)]
    pub fallback_material: Option<u8>,
}

fn parse_bc_mode(value: &str) -> Result<BoundaryConditionMode, String> {
    if value.eq_ignore_ascii_case("CT") {
        Ok(BoundaryConditionMode::MinZSlab)
    } else {
        Err(format!("unknown boundary-condition mode '{value}' (expected CT)"))
    }
}

impl Cli {
    /// Builds the run configuration: defaults, then the file, then flags.
    pub fn meshing_arguments(&self) -> Result<MeshingArguments> {
        let mut args = match &self.config {
            Some(path) => load_config(path)?,
            None => MeshingArguments::default(),
        };
        self.apply_overrides(&mut args);
        Ok(args)
    }

    fn apply_overrides(&self, args: &mut MeshingArguments) {
        let quality = &mut args.quality;
        if let Some(v) = self.facet_angle {
            quality.facet_angle = v;
        }
        if let Some(v) = self.facet_size {
            quality.facet_size = v;
        }
        if let Some(v) = self.facet_distance {
            quality.facet_distance = v;
        }
        if let Some(v) = self.cell_radius_edge_ratio {
            quality.cell_radius_edge_ratio = v;
        }
        if let Some(v) = self.cell_size {
            quality.cell_size = v;
        }
        // clap guarantees three values
        if let Some(&[x, y, z]) = self.voxel_spacing.as_deref() {
            args.voxel_spacing = [x, y, z];
        }
        if let Some(v) = self.value_outside {
            args.value_outside = v;
        }
        if let Some(v) = self.bc_mode {
            args.bc_mode = v;
        }
        if let Some(v) = self.bc_thickness {
            args.bc_thickness = v;
        }
        if let Some(v) = self.merge_tolerance {
            args.merge_tolerance = v;
        }
        if let Some(v) = self.fallback_material {
            args.fallback_material = v;
        }
    }
}

fn load_config(path: &Path) -> Result<MeshingArguments> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
}
