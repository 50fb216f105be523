use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use viscomp_core::{load_mesh, MeshStats};
use viscomp_render::{encode_gif, turntable_frames, TurntableConfig};

#[derive(Args, Debug, Clone)]
#[command(about = "Render a rotating view of a mesh into a GIF")]
pub struct TurntableArgs {
    /// Mesh to render (.obj, .stl, .gltf, .glb)
    #[arg(value_name = "MESH", value_hint = clap::ValueHint::FilePath)]
    pub mesh: PathBuf,

    #[arg(long, default_value_t = 40)]
    pub frames: usize,

    #[arg(long, default_value_t = 25)]
    pub fps: u32,

    /// Output GIF path
    #[arg(short, long, default_value = "turntable.gif")]
    pub output: PathBuf,

    /// Frame width and height in pixels
    #[arg(long, default_value_t = 480)]
    pub size: u32,
}

pub fn execute(args: TurntableArgs) -> Result<()> {
    anyhow::ensure!(args.frames > 0, "--frames must be at least 1");
    anyhow::ensure!(args.size > 0, "--size must be at least 1");

    let mesh = load_mesh(&args.mesh)
        .with_context(|| format!("Failed to load {}", args.mesh.display()))?;
    println!("Model loaded");

    let stats = MeshStats::compute(args.mesh.display().to_string(), &mesh);
    println!("\n--- Model information ---");
    println!("Model:    {}", stats.name);
    println!("Vertices: {}", stats.vertices);
    println!("Faces:    {}", stats.faces);
    println!("Edges:    {}", stats.unique_edges);

    let config = TurntableConfig {
        frames: args.frames,
        fps: args.fps,
        size: args.size,
        ..Default::default()
    };
    encode_gif(turntable_frames(&mesh, &config), config.fps, &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    println!("GIF saved as '{}'", args.output.display());
    Ok(())
}
