/// Rotating mesh animation.
use image::RgbaImage;
use viscomp_core::{Camera, Mesh, RotationState, Transform};

use crate::mesh_renderer::{MeshRenderer, MeshStyle};

#[derive(Debug, Clone)]
pub struct TurntableConfig {
    pub frames: usize,
    pub fps: u32,
    /// Width and height of every frame in pixels.
    pub size: u32,
    /// Degrees added about Z, then about Y, before each frame.
    pub step_z_deg: f32,
    pub step_y_deg: f32,
    pub zoom: f32,
    pub style: MeshStyle,
}

impl Default for TurntableConfig {
    fn default() -> Self {
        Self {
            frames: 40,
            fps: 25,
            size: 480,
            step_z_deg: 2.0,
            step_y_deg: 7.0,
            zoom: 0.9,
            style: MeshStyle::default(),
        }
    }
}

/// Lazily render the turntable frames of `mesh`.
///
/// The mesh is centered and scaled to a 2-unit box first so any model fits
/// the same camera. Rotation accumulates, so frame `i` has turned `i + 1`
/// steps.
pub fn turntable_frames<'a>(
    mesh: &Mesh,
    config: &'a TurntableConfig,
) -> impl Iterator<Item = RgbaImage> + 'a {
    let mesh = mesh.normalized();
    let mut camera = Camera::new(config.size, config.size);
    camera.zoom(config.zoom);
    let mut renderer = MeshRenderer::new(config.size as usize, config.size as usize);
    let mut rotation = RotationState::zero();

    (0..config.frames).map(move |_| {
        rotation.rotate_z(config.step_z_deg.to_radians());
        rotation.rotate_y(config.step_y_deg.to_radians());
        let model = Transform::rotation_matrix(&rotation);
        renderer.render(&mesh, &model, &camera, &config.style)
    })
}
