/// viscomp rendering - software rasterization into RGBA frames
///
/// Draws the two-panel transformation frames and depth-buffered mesh
/// views, stages frames on disk and assembles them into looping GIFs.

pub mod canvas;
pub mod error;
pub mod gif;
pub mod mesh_renderer;
pub mod panels;
pub mod raster;
pub mod turntable;

pub use canvas::{rgb, Canvas, Stroke, Viewport};
pub use error::{RenderError, RenderResult};
pub use gif::{encode_gif, FrameStore};
pub use mesh_renderer::{MeshRenderer, MeshStyle};
pub use panels::{render_transform_frame, PanelStyle};
pub use turntable::{turntable_frames, TurntableConfig};
