use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;
use viscomp_cli::{snapshot, TerminalApp};
use viscomp_core::{load_mesh, Mesh};

#[derive(Args, Debug, Clone)]
#[command(about = "View a mesh in the terminal")]
pub struct ViewArgs {
    /// Mesh to view; a cube is shown when omitted
    #[arg(value_name = "MESH", value_hint = clap::ValueHint::FilePath)]
    pub mesh: Option<PathBuf>,

    /// Print a single frame to stdout instead of starting the viewer
    #[arg(long)]
    pub once: bool,

    /// Columns and rows of the single frame printed by --once
    #[arg(
        long,
        num_args = 2,
        value_names = ["COLUMNS", "ROWS"],
        value_parser = clap::value_parser!(u16).range(1..),
        default_values_t = [80, 40]
    )]
    pub size: Vec<u16>,
}

pub fn execute(args: ViewArgs) -> Result<()> {
    let (mesh, title) = match &args.mesh {
        Some(path) => {
            let mesh =
                load_mesh(path).with_context(|| format!("Failed to load {}", path.display()))?;
            info!("Loaded {} faces from {}", mesh.faces.len(), path.display());
            (mesh, path.display().to_string())
        }
        None => (Mesh::cube(2.0), "cube".to_string()),
    };
    let mesh = mesh.normalized();

    if args.once {
        let (columns, rows) = match args.size.as_slice() {
            [columns, rows] => (*columns, *rows),
            _ => (80, 40),
        };
        for line in snapshot(&mesh, columns, rows) {
            println!("{}", line.trim_end());
        }
        return Ok(());
    }

    let mut app = TerminalApp::new(mesh, title).context("Failed to query the terminal size")?;
    app.run().context("Terminal viewer failed")?;
    Ok(())
}
