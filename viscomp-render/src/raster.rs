// Pixel coverage for triangles, thick segments and polygons. The routines
// only decide which pixels a primitive touches; what to write there
// (characters, colors, depth) is up to the caller.

/// Inclusive pixel rectangle that coverage is clipped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl Bounds {
    /// Whole `width` x `height` surface.
    pub fn surface(width: usize, height: usize) -> Self {
        Self {
            min_x: 0,
            min_y: 0,
            max_x: width as i32 - 1,
            max_y: height as i32 - 1,
        }
    }

    pub fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    fn clip(&self, min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Option<Self> {
        let clipped = Self {
            min_x: (min_x.floor() as i32).max(self.min_x),
            min_y: (min_y.floor() as i32).max(self.min_y),
            max_x: (max_x.ceil() as i32).min(self.max_x),
            max_y: (max_y.ceil() as i32).min(self.max_y),
        };
        (clipped.min_x <= clipped.max_x && clipped.min_y <= clipped.max_y).then_some(clipped)
    }
}

/// Calculate barycentric coordinates for a point in a triangle
pub fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

/// Visit every pixel whose center lies inside the triangle, with its barycentric weights.
pub fn fill_triangle(
    coords: [(f32, f32); 3],
    bounds: Bounds,
    mut visit: impl FnMut(i32, i32, (f32, f32, f32)),
) {
    let [v0, v1, v2] = coords;

    let Some(b) = bounds.clip(
        v0.0.min(v1.0).min(v2.0),
        v0.1.min(v1.1).min(v2.1),
        v0.0.max(v1.0).max(v2.0),
        v0.1.max(v1.1).max(v2.1),
    ) else {
        return;
    };

    for y in b.min_y..=b.max_y {
        for x in b.min_x..=b.max_x {
            let p = (x as f32 + 0.5, y as f32 + 0.5);
            if let Some((w0, w1, w2)) = barycentric(v0, v1, v2, p) {
                if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                    visit(x, y, (w0, w1, w2));
                }
            }
        }
    }
}

/// Visit every pixel within `thickness / 2` of the segment, with the position
/// along it (`0` at `a`, `1` at `b`) and the distance travelled in pixels.
pub fn stroke_segment(
    a: (f32, f32),
    b: (f32, f32),
    thickness: f32,
    bounds: Bounds,
    mut visit: impl FnMut(i32, i32, f32, f32),
) {
    let radius = (thickness / 2.0).max(0.5);
    let Some(clip) = bounds.clip(
        a.0.min(b.0) - radius,
        a.1.min(b.1) - radius,
        a.0.max(b.0) + radius,
        a.1.max(b.1) + radius,
    ) else {
        return;
    };

    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len_sq = dx * dx + dy * dy;
    let len = len_sq.sqrt();

    for y in clip.min_y..=clip.max_y {
        for x in clip.min_x..=clip.max_x {
            let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
            let t = if len_sq > 0.0 {
                (((px - a.0) * dx + (py - a.1) * dy) / len_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let (cx, cy) = (a.0 + t * dx, a.1 + t * dy);
            let dist_sq = (px - cx).powi(2) + (py - cy).powi(2);
            if dist_sq <= radius * radius {
                visit(x, y, t, t * len);
            }
        }
    }
}

/// Visit the pixels inside a closed polygon under the even-odd rule.
pub fn fill_polygon(points: &[(f32, f32)], bounds: Bounds, mut visit: impl FnMut(i32, i32)) {
    if points.len() < 3 {
        return;
    }

    let (mut min_y, mut max_y) = (f32::INFINITY, f32::NEG_INFINITY);
    let (mut min_x, mut max_x) = (f32::INFINITY, f32::NEG_INFINITY);
    for &(x, y) in points {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    let Some(clip) = bounds.clip(min_x, min_y, max_x, max_y) else {
        return;
    };

    let mut crossings = Vec::new();
    for y in clip.min_y..=clip.max_y {
        let scan = y as f32 + 0.5;
        crossings.clear();
        for i in 0..points.len() {
            let (x0, y0) = points[i];
            let (x1, y1) = points[(i + 1) % points.len()];
            // half-open so shared vertices are counted once
            if (y0 <= scan && scan < y1) || (y1 <= scan && scan < y0) {
                crossings.push(x0 + (scan - y0) / (y1 - y0) * (x1 - x0));
            }
        }
        crossings.sort_by(f32::total_cmp);

        for span in crossings.chunks_exact(2) {
            let start = ((span[0] - 0.5).ceil() as i32).max(clip.min_x);
            let end = ((span[1] - 0.5).floor() as i32).min(clip.max_x);
            for x in start..=end {
                visit(x, y);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_barycentric_degenerate() {
        assert!(barycentric((0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (0.5, 0.5)).is_none());
    }

    #[test]
    fn test_fill_triangle_covers_half_square() {
        let mut count = 0;
        fill_triangle(
            [(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)],
            Bounds::surface(20, 20),
            |_, _, _| count += 1,
        );
        // 45 strictly inside plus the 10 centers on the hypotenuse
        assert_eq!(count, 55);
    }

    #[test]
    fn test_fill_triangle_clips_to_bounds() {
        let mut max_x = 0;
        fill_triangle(
            [(-50.0, -50.0), (100.0, -50.0), (-50.0, 100.0)],
            Bounds::surface(8, 8),
            |x, y, _| {
                assert!((0..8).contains(&x) && (0..8).contains(&y));
                max_x = max_x.max(x);
            },
        );
        assert_eq!(max_x, 7);
    }

    #[test]
    fn test_stroke_horizontal_segment() {
        let mut pixels = Vec::new();
        stroke_segment((0.0, 5.5), (10.0, 5.5), 1.0, Bounds::surface(20, 20), |x, y, _, _| {
            pixels.push((x, y))
        });
        assert!(pixels.iter().all(|&(_, y)| y == 5));
        assert_eq!(pixels.len(), 11);
    }

    #[test]
    fn test_fill_square_polygon() {
        let square = [(2.0, 2.0), (6.0, 2.0), (6.0, 6.0), (2.0, 6.0)];
        let mut count = 0;
        fill_polygon(&square, Bounds::surface(10, 10), |_, _| count += 1);
        assert_eq!(count, 16);
    }

    #[test]
    fn test_fill_polygon_needs_three_points() {
        let mut count = 0;
        fill_polygon(&[(0.0, 0.0), (5.0, 5.0)], Bounds::surface(10, 10), |_, _| count += 1);
        assert_eq!(count, 0);
    }
}
