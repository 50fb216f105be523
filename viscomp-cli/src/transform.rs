use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::{debug, info};
use viscomp_core::affine::{apply, format_matrix};
use viscomp_core::{AnimationConfig, Frame, PointSet};
use viscomp_render::{render_transform_frame, FrameStore, PanelStyle};

#[derive(Args, Debug, Clone)]
pub struct TransformArgs {
    /// Number of frames in one loop
    #[arg(long, default_value_t = 60)]
    pub frames: usize,

    /// Playback rate of the GIF
    #[arg(long, default_value_t = 20)]
    pub fps: u32,

    /// Print the combined matrix every K frames (0 disables)
    #[arg(long, value_name = "K", default_value_t = 20)]
    pub print_every: usize,

    /// Output GIF path
    #[arg(short, long, default_value = "transformations.gif")]
    pub output: PathBuf,

    /// Keep the PNG frames in this directory instead of a temporary one
    #[arg(long, value_name = "DIR")]
    pub keep_frames: Option<PathBuf>,
}

impl From<&TransformArgs> for AnimationConfig {
    fn from(args: &TransformArgs) -> Self {
        Self {
            frames: args.frames,
            fps: args.fps,
            print_every: args.print_every,
            output: args.output.clone(),
        }
    }
}

pub fn execute(args: TransformArgs) -> Result<()> {
    let config = AnimationConfig::from(&args);
    anyhow::ensure!(config.frames > 0, "--frames must be at least 1");

    let mut store = match &args.keep_frames {
        Some(dir) => FrameStore::keep_in(dir)
            .with_context(|| format!("Failed to create frame directory {}", dir.display()))?,
        None => FrameStore::temporary().context("Failed to create temporary frame directory")?,
    };

    let style = PanelStyle::default();
    let original = PointSet::cat();

    for frame in config.frames() {
        let matrix = frame.matrix();
        if config.should_print(frame.index) {
            println!("{}", matrix_report(&frame));
        }

        let transformed = apply(&matrix, &original);
        let image = render_transform_frame(&original, &transformed, &style);
        let path = store
            .push(&image)
            .with_context(|| format!("Failed to write frame {}", frame.index))?;
        debug!(frame = frame.index, path = %path.display(), "frame written");
    }

    info!("Exporting GIF...");
    store
        .write_gif(&config.output, config.fps)
        .with_context(|| format!("Failed to write {}", config.output.display()))?;
    println!("GIF saved as '{}'", config.output.display());

    if args.keep_frames.is_none() {
        drop(store);
        info!("Temporary frames removed");
    }
    Ok(())
}

/// Console block for one frame: header, parameters and the combined matrix.
fn matrix_report(frame: &Frame) -> String {
    let params = frame.params();
    format!(
        "\n── Frame {} (t={:.2}) ──\ntx={:.1}  angle={:.0}°  s={:.2}\nCombined matrix M = T·R·S:\n{}",
        frame.index,
        frame.t(),
        params.tx,
        params.angle.to_degrees(),
        params.scale,
        format_matrix(&frame.matrix(), 3)
    )
}
