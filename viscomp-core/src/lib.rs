/// viscomp core library - transformation math and mesh handling
///
/// This library provides the stateless core of the workshop tools: 2D
/// homogeneous transforms and the animation schedule built on them, plus
/// mesh loading, inspection, conversion and the 3D camera used to render
/// meshes.

pub mod affine;
pub mod analysis;
pub mod animation;
pub mod error;
pub mod format;
pub mod geometry;
pub mod gltf_io;
pub mod obj;
pub mod projection;
pub mod shape;
pub mod stl;
pub mod transform;

// Re-export commonly used types
pub use analysis::MeshStats;
pub use animation::{AnimationConfig, Frame};
pub use error::{Error, Result};
pub use format::{export_mesh, load_mesh, MeshFormat};
pub use geometry::{Mesh, Triangle};
pub use projection::{Camera, ProjectionMode, ScreenPoint};
pub use shape::PointSet;
pub use transform::{RotationState, Transform};
