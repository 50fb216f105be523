/// Frame staging on disk and looping GIF assembly.
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info};

use crate::error::{RenderError, RenderResult};

/// Quantization effort passed to the GIF encoder, 1 (best) to 30 (fastest).
const ENCODER_SPEED: i32 = 10;

enum Storage {
    /// Removed when the store is dropped.
    Temporary(TempDir),
    Kept(PathBuf),
}

/// Numbered PNG frames written one by one and collected at the end.
pub struct FrameStore {
    storage: Storage,
    paths: Vec<PathBuf>,
}

impl FrameStore {
    /// Stage frames in a fresh temporary directory.
    pub fn temporary() -> RenderResult<Self> {
        let dir = tempfile::Builder::new().prefix("viscomp-frames-").tempdir()?;
        debug!(dir = %dir.path().display(), "staging frames");
        Ok(Self {
            storage: Storage::Temporary(dir),
            paths: Vec::new(),
        })
    }

    /// Stage frames in `dir` and leave them there.
    pub fn keep_in(dir: impl Into<PathBuf>) -> RenderResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            storage: Storage::Kept(dir),
            paths: Vec::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        match &self.storage {
            Storage::Temporary(dir) => dir.path(),
            Storage::Kept(dir) => dir,
        }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Write the next frame as `frame_NNN.png`.
    pub fn push(&mut self, frame: &RgbaImage) -> RenderResult<&Path> {
        let path = self.dir().join(format!("frame_{:03}.png", self.paths.len()));
        frame.save(&path)?;
        self.paths.push(path);
        Ok(&self.paths[self.paths.len() - 1])
    }

    /// Read every staged frame back and encode them into one looping GIF.
    pub fn write_gif(&self, output: &Path, fps: u32) -> RenderResult<()> {
        let frames = self
            .paths
            .iter()
            .map(|path| Ok(image::open(path)?.to_rgba8()))
            .collect::<RenderResult<Vec<_>>>()?;
        encode_gif(frames, fps, output)
    }
}

/// Encode frames as an infinitely looping GIF at `fps` frames per second.
pub fn encode_gif(
    frames: impl IntoIterator<Item = RgbaImage>,
    fps: u32,
    output: &Path,
) -> RenderResult<()> {
    let mut frames = frames.into_iter().peekable();
    if frames.peek().is_none() {
        return Err(RenderError::NoFrames);
    }
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let writer = BufWriter::new(File::create(output)?);
    let mut encoder = GifEncoder::new_with_speed(writer, ENCODER_SPEED);
    encoder.set_repeat(Repeat::Infinite)?;

    let delay = Delay::from_numer_denom_ms(1000, fps.max(1));
    let mut count = 0;
    for image in frames {
        encoder.encode_frame(Frame::from_parts(image, 0, 0, delay))?;
        count += 1;
    }
    // the trailer is written when the encoder goes away
    drop(encoder);

    info!(path = %output.display(), frames = count, fps, "GIF saved");
    Ok(())
}
