/// Error types for mesh loading and export.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("STL parse error: {0}")]
    Stl(String),

    #[error("OBJ parse error at line {line}: {message}")]
    Obj { line: usize, message: String },

    #[error("glTF error: {0}")]
    Gltf(#[from] gltf::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),

    #[error("Unsupported mesh format: {0}")]
    UnsupportedFormat(String),

    #[error("No geometry found in {}", .0.display())]
    EmptyMesh(PathBuf),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn stl(msg: impl Into<String>) -> Self {
        Self::Stl(msg.into())
    }

    pub fn obj(line: usize, msg: impl Into<String>) -> Self {
        Self::Obj {
            line,
            message: msg.into(),
        }
    }
}
