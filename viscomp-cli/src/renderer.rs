/// ASCII rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Vector3};
use std::io::Write;
use viscomp_core::{Camera, Mesh, ScreenPoint};
use viscomp_render::raster::{self, Bounds};

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// ASCII renderer that converts 3D meshes to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
    }

    pub fn render_mesh(&mut self, mesh: &Mesh, model_matrix: &Matrix4<f32>, camera: &Camera) {
        let mvp = camera.projection_matrix() * camera.view_matrix() * model_matrix;
        let projected: Vec<Option<ScreenPoint>> = mesh
            .vertices
            .iter()
            .map(|v| camera.project_with(&mvp, v, self.width as u32, self.height as u32))
            .collect();

        // light comes from the viewer's side
        let light_dir = (camera.position - camera.target).normalize();

        for (face_index, face) in mesh.faces.iter().enumerate() {
            let screen = match face.map(|i| projected[i as usize]) {
                [Some(a), Some(b), Some(c)] => [a, b, c],
                _ => continue, // Triangle is clipped
            };

            let normal: Vector3<f32> = model_matrix
                .transform_vector(&mesh.triangle(face_index).calculate_normal())
                .normalize();
            let brightness = normal.dot(&light_dir).max(0.0);
            self.rasterize_triangle(&screen, shade_char(brightness));
        }
    }

    fn rasterize_triangle(&mut self, screen: &[ScreenPoint; 3], character: char) {
        let coords = screen.map(|p| (p.x, p.y));
        let bounds = Bounds::surface(self.width, self.height);
        raster::fill_triangle(coords, bounds, |x, y, (w0, w1, w2)| {
            let depth = w0 * screen[0].depth + w1 * screen[1].depth + w2 * screen[2].depth;
            let idx = y as usize * self.width + x as usize;
            if depth < self.depth_buffer[idx] {
                self.depth_buffer[idx] = depth;
                self.char_buffer[idx] = character;
            }
        });
    }

    /// Rendered rows as plain text, without color codes.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.char_buffer
            .chunks(self.width.max(1))
            .map(|row| row.iter().collect())
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for (y, row) in self.char_buffer.chunks(self.width.max(1)).enumerate() {
            for &c in row {
                // Color based on character intensity
                let color = match c {
                    ' ' | '.' | ':' => Color::DarkGrey,
                    '-' | '=' => Color::Grey,
                    '+' | '*' => Color::White,
                    '#' | '%' | '@' => Color::Cyan,
                    _ => Color::White,
                };

                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Pick the ramp character for a brightness in `[0, 1]`. Lit faces never
/// get the blank, so they stay distinguishable from the background.
fn shade_char(brightness: f32) -> char {
    let last = LUMINOSITY_RAMP.len() - 1;
    let index = (brightness.clamp(0.0, 1.0) * last as f32).round() as usize;
    LUMINOSITY_RAMP[index.clamp(1, last)]
}
