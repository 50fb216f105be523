/// Side-by-side rendering of the original and transformed shape.
use image::{Rgba, RgbaImage};
use viscomp_core::PointSet;

use crate::canvas::{rgb, Canvas, Stroke, Viewport};
use crate::raster::Bounds;

/// Colors and sizes of the two-panel transformation frame.
#[derive(Debug, Clone)]
pub struct PanelStyle {
    pub width: u32,
    pub height: u32,
    /// Gap between a panel's edge and its plot area.
    pub margin: i32,
    /// Half the side of the square world window, centered on the origin.
    pub world_extent: f64,
    pub background: Rgba<u8>,
    pub axis: Stroke,
    pub border: Rgba<u8>,
    pub original: Stroke,
    pub original_fill: f32,
    pub ghost: Stroke,
    pub transformed: Stroke,
    pub transformed_fill: f32,
}

impl Default for PanelStyle {
    fn default() -> Self {
        // line widths are the plotting widths in points at 80 dpi
        let px = |pt: f32| pt * 80.0 / 72.0;
        Self {
            width: 800,
            height: 400,
            margin: 30,
            world_extent: 6.0,
            background: rgb(0x1e1e2e),
            axis: Stroke::solid(rgb(0x555555), px(0.8)),
            border: rgb(0x444444),
            original: Stroke::solid(rgb(0x555577), px(2.0)),
            original_fill: 0.15,
            ghost: Stroke::solid(rgb(0x444466), px(1.0))
                .dashed(px(3.7), px(1.6))
                .with_alpha(0.4),
            transformed: Stroke::solid(rgb(0x89b4fa), px(2.5)),
            transformed_fill: 0.25,
        }
    }
}

impl PanelStyle {
    /// Plot areas of the left and right panels.
    pub fn viewports(&self) -> [Viewport; 2] {
        let panel_width = self.width as i32 / 2;
        let side = (panel_width - 2 * self.margin).min(self.height as i32 - 2 * self.margin);
        let top = (self.height as i32 - side) / 2;
        [0, 1].map(|i| {
            let left = i * panel_width + (panel_width - side) / 2;
            Viewport::new(
                Bounds::new(left, top, left + side - 1, top + side - 1),
                -self.world_extent,
                self.world_extent,
            )
        })
    }
}

/// Draw one animation frame: the untouched shape on the left, the transformed
/// shape over a dashed ghost of the original on the right.
pub fn render_transform_frame(
    original: &PointSet,
    transformed: &PointSet,
    style: &PanelStyle,
) -> RgbaImage {
    let mut canvas = Canvas::new(style.width, style.height, style.background);
    let [left, right] = style.viewports();

    for viewport in [&left, &right] {
        draw_axes(&mut canvas, viewport, style);
    }

    let base_left = left.map(original.xy());
    canvas.stroke_polyline(&base_left, &style.original, left.pixels);
    canvas.fill_polygon(&base_left, style.original.color, style.original_fill, left.pixels);

    let ghost = right.map(original.xy());
    canvas.stroke_polyline(&ghost, &style.ghost, right.pixels);

    let moved = right.map(transformed.xy());
    canvas.stroke_polyline(&moved, &style.transformed, right.pixels);
    canvas.fill_polygon(&moved, style.transformed.color, style.transformed_fill, right.pixels);

    canvas.into_image()
}

fn draw_axes(canvas: &mut Canvas, viewport: &Viewport, style: &PanelStyle) {
    let e = style.world_extent;
    let horizontal = viewport.map([(-e, 0.0), (e, 0.0)]);
    let vertical = viewport.map([(0.0, -e), (0.0, e)]);
    canvas.stroke_polyline(&horizontal, &style.axis, viewport.pixels);
    canvas.stroke_polyline(&vertical, &style.axis, viewport.pixels);

    let b = viewport.pixels;
    let frame = [
        (b.min_x - 1, b.min_y - 1, b.max_x + 1, b.min_y - 1),
        (b.min_x - 1, b.max_y + 1, b.max_x + 1, b.max_y + 1),
        (b.min_x - 1, b.min_y - 1, b.min_x - 1, b.max_y + 1),
        (b.max_x + 1, b.min_y - 1, b.max_x + 1, b.max_y + 1),
    ];
    for (x0, y0, x1, y1) in frame {
        canvas.fill_rect(Bounds::new(x0, y0, x1, y1), style.border);
    }
}
