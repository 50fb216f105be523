/// RGBA drawing surface with world-space viewports.
use image::{Rgba, RgbaImage};
use std::collections::HashSet;

use crate::raster::{self, Bounds};

/// Opaque color from a `0xRRGGBB` literal.
pub const fn rgb(hex: u32) -> Rgba<u8> {
    Rgba([(hex >> 16) as u8, (hex >> 8) as u8, hex as u8, 255])
}

/// Dash pattern in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dash {
    pub on: f32,
    pub off: f32,
}

impl Dash {
    fn covers(&self, distance: f32) -> bool {
        distance.rem_euclid(self.on + self.off) < self.on
    }
}

/// Stroke parameters for polylines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Rgba<u8>,
    pub width: f32,
    pub alpha: f32,
    pub dash: Option<Dash>,
}

impl Stroke {
    pub fn solid(color: Rgba<u8>, width: f32) -> Self {
        Self {
            color,
            width,
            alpha: 1.0,
            dash: None,
        }
    }

    pub fn dashed(mut self, on: f32, off: f32) -> Self {
        self.dash = Some(Dash { on, off });
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }
}

pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Rgba<u8>) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, background),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::surface(self.width() as usize, self.height() as usize)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.image.get_pixel(x, y)
    }

    /// Source-over blend of `color` at `alpha`; out-of-range pixels are ignored.
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Rgba<u8>, alpha: f32) {
        if x < 0 || y < 0 || x as u32 >= self.width() || y as u32 >= self.height() || alpha <= 0.0 {
            return;
        }
        let alpha = alpha.min(1.0);
        let dst = self.image.get_pixel_mut(x as u32, y as u32);
        for c in 0..3 {
            let blended = color.0[c] as f32 * alpha + dst.0[c] as f32 * (1.0 - alpha);
            dst.0[c] = blended.round().clamp(0.0, 255.0) as u8;
        }
        dst.0[3] = 255;
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgba<u8>) {
        self.blend_pixel(x, y, color, 1.0);
    }

    pub fn fill_rect(&mut self, bounds: Bounds, color: Rgba<u8>) {
        for y in bounds.min_y..=bounds.max_y {
            for x in bounds.min_x..=bounds.max_x {
                self.set_pixel(x, y, color);
            }
        }
    }

    /// Stroke a polyline given in pixel coordinates.
    pub fn stroke_polyline(&mut self, points: &[(f32, f32)], stroke: &Stroke, clip: Bounds) {
        let mut travelled = 0.0;
        // a pixel near a joint is reached by both segments; paint it once
        let mut seen = HashSet::new();
        for pair in points.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            raster::stroke_segment(a, b, stroke.width, clip, |x, y, _, along| {
                let on = stroke.dash.map_or(true, |d| d.covers(travelled + along));
                if on && seen.insert((x, y)) {
                    self.blend_pixel(x, y, stroke.color, stroke.alpha);
                }
            });
            travelled += ((b.0 - a.0).powi(2) + (b.1 - a.1).powi(2)).sqrt();
        }
    }

    /// Fill a polygon given in pixel coordinates (even-odd rule).
    pub fn fill_polygon(
        &mut self,
        points: &[(f32, f32)],
        color: Rgba<u8>,
        alpha: f32,
        clip: Bounds,
    ) {
        raster::fill_polygon(points, clip, |x, y| self.blend_pixel(x, y, color, alpha));
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

/// Maps a square world window onto a pixel rectangle, y pointing up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub pixels: Bounds,
    pub world_min: f64,
    pub world_max: f64,
}

impl Viewport {
    pub fn new(pixels: Bounds, world_min: f64, world_max: f64) -> Self {
        Self {
            pixels,
            world_min,
            world_max,
        }
    }

    pub fn to_pixel(&self, (x, y): (f64, f64)) -> (f32, f32) {
        let span = self.world_max - self.world_min;
        let w = (self.pixels.max_x - self.pixels.min_x + 1) as f64;
        let h = (self.pixels.max_y - self.pixels.min_y + 1) as f64;
        let px = self.pixels.min_x as f64 + (x - self.world_min) / span * w;
        let py = self.pixels.min_y as f64 + (self.world_max - y) / span * h;
        (px as f32, py as f32)
    }

    pub fn map(&self, points: impl IntoIterator<Item = (f64, f64)>) -> Vec<(f32, f32)> {
        points.into_iter().map(|p| self.to_pixel(p)).collect()
    }
}
