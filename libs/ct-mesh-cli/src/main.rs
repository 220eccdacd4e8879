mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use ct_mesh::vtk::{load_label_volume, save_labeled_mesh, VtkMeshImport};
use ct_mesh::Pipeline;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // configuration errors must surface before any input is read
    let pipeline = Pipeline::new(cli.meshing_arguments()?)?;

    let volume = load_label_volume(&cli.volume)
        .with_context(|| format!("failed to load volume {}", cli.volume.display()))?;
    let unexpected = volume.unexpected_values();
    if !unexpected.is_empty() {
        warn!(values = ?unexpected, "volume holds values outside the label scheme");
    }

    let labeled = pipeline.run(&volume, &VtkMeshImport::new(&cli.mesh))?;

    save_labeled_mesh(&cli.output, &labeled)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;

    info!(
        points = labeled.mesh.point_count(),
        tetrahedra = labeled.mesh.cell_count(),
        fixed_points = labeled.boundary.fixed_count(),
        "done"
    );
    Ok(())
}
