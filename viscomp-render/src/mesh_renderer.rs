/// Depth-buffered, flat-shaded mesh rendering into RGBA images.
use image::{Rgba, RgbaImage};
use nalgebra::{Matrix4, Vector3};
use viscomp_core::{Camera, Mesh, ScreenPoint};

use crate::canvas::{rgb, Canvas};
use crate::raster::{self, Bounds};

/// Colors of faces, edges and vertex dots.
#[derive(Debug, Clone)]
pub struct MeshStyle {
    pub background: Rgba<u8>,
    pub face: Rgba<u8>,
    pub edge: Option<Rgba<u8>>,
    pub edge_width: f32,
    pub vertex: Option<Rgba<u8>>,
    pub vertex_radius: f32,
    /// Fraction of the face color kept for faces turned away from the light.
    pub ambient: f32,
    pub light_dir: Vector3<f32>,
}

impl Default for MeshStyle {
    fn default() -> Self {
        Self {
            background: rgb(0xffffff),
            face: rgb(0x8acce5),
            edge: Some(rgb(0x172291)),
            edge_width: 1.0,
            vertex: Some(rgb(0x493db8)),
            vertex_radius: 2.5,
            ambient: 0.35,
            light_dir: Vector3::new(0.3, 0.5, 1.0),
        }
    }
}

/// Lines and dots are drawn over faces they belong to; this much depth slack
/// keeps them from z-fighting with their own surface.
const OVERLAY_BIAS: f32 = 1e-3;

pub struct MeshRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
}

impl MeshRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; width * height],
        }
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
    }

    pub fn render(
        &mut self,
        mesh: &Mesh,
        model_matrix: &Matrix4<f32>,
        camera: &Camera,
        style: &MeshStyle,
    ) -> RgbaImage {
        self.clear();
        let mut canvas = Canvas::new(self.width as u32, self.height as u32, style.background);
        let bounds = Bounds::surface(self.width, self.height);
        let mvp = camera.projection_matrix() * camera.view_matrix() * model_matrix;
        let light = style.light_dir.normalize();

        let projected: Vec<Option<ScreenPoint>> = mesh
            .vertices
            .iter()
            .map(|v| camera.project_with(&mvp, v, self.width as u32, self.height as u32))
            .collect();

        for (face_index, face) in mesh.faces.iter().enumerate() {
            let Some(screen) = resolve_face(face, &projected) else {
                continue; // Triangle is clipped
            };

            let normal = model_matrix
                .transform_vector(&mesh.triangle(face_index).calculate_normal())
                .normalize();
            // double-sided: a face seen from behind is lit like its front
            let brightness = normal.dot(&light).abs();
            let color = shade(style.face, style.ambient + (1.0 - style.ambient) * brightness);

            let coords = screen.map(|p| (p.x, p.y));
            raster::fill_triangle(coords, bounds, |x, y, (w0, w1, w2)| {
                let depth = w0 * screen[0].depth + w1 * screen[1].depth + w2 * screen[2].depth;
                let idx = y as usize * self.width + x as usize;
                if depth < self.depth_buffer[idx] {
                    self.depth_buffer[idx] = depth;
                    canvas.set_pixel(x, y, color);
                }
            });
        }

        if let Some(edge_color) = style.edge {
            for face in &mesh.faces {
                let Some(screen) = resolve_face(face, &projected) else {
                    continue;
                };
                for (a, b) in [(0, 1), (1, 2), (2, 0)] {
                    self.overlay_segment(
                        &mut canvas,
                        screen[a],
                        screen[b],
                        style.edge_width,
                        edge_color,
                    );
                }
            }
        }

        if let Some(vertex_color) = style.vertex {
            for p in projected.iter().flatten() {
                self.overlay_segment(&mut canvas, *p, *p, style.vertex_radius * 2.0, vertex_color);
            }
        }

        canvas.into_image()
    }

    fn overlay_segment(
        &self,
        canvas: &mut Canvas,
        a: ScreenPoint,
        b: ScreenPoint,
        width: f32,
        color: Rgba<u8>,
    ) {
        let bounds = Bounds::surface(self.width, self.height);
        raster::stroke_segment((a.x, a.y), (b.x, b.y), width, bounds, |x, y, t, _| {
            let depth = a.depth + (b.depth - a.depth) * t;
            let idx = y as usize * self.width + x as usize;
            if depth <= self.depth_buffer[idx] + OVERLAY_BIAS {
                canvas.set_pixel(x, y, color);
            }
        });
    }
}

fn resolve_face(face: &[u32; 3], projected: &[Option<ScreenPoint>]) -> Option<[ScreenPoint; 3]> {
    Some([
        projected[face[0] as usize]?,
        projected[face[1] as usize]?,
        projected[face[2] as usize]?,
    ])
}

fn shade(color: Rgba<u8>, factor: f32) -> Rgba<u8> {
    let f = factor.clamp(0.0, 1.0);
    Rgba([
        (color.0[0] as f32 * f).round() as u8,
        (color.0[1] as f32 * f).round() as u8,
        (color.0[2] as f32 * f).round() as u8,
        255,
    ])
}
