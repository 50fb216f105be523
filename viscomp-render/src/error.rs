/// Rendering and encoding errors.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("No frames to encode")]
    NoFrames,
}

pub type RenderResult<T> = Result<T, RenderError>;
