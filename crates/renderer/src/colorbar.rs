//! Vertical colour bars with extension triangles, ticks and a unit label.

use crate::canvas::Canvas;
use crate::color::Color;
use crate::figure::FigureStyle;
use crate::projection::PixelRect;
use crate::scale::{ColorScale, Tick};
use crate::text::TextRenderer;

/// Length of each extension triangle as a fraction of the bar length.
const EXTEND_FRACTION: f32 = 0.05;

/// Bar length / bar width.
const ASPECT: f32 = 20.0;

#[derive(Debug, Clone)]
pub struct ColorBar {
    pub scale: ColorScale,
    pub ticks: Vec<Tick>,
    pub label: String,
    /// Bar length as a fraction of the height it is placed against.
    pub shrink: f32,
}

impl ColorBar {
    pub fn new(scale: ColorScale, ticks: Vec<Tick>, label: impl Into<String>) -> Self {
        Self {
            scale,
            ticks,
            label: label.into(),
            shrink: 1.0,
        }
    }

    pub fn with_shrink(mut self, shrink: f32) -> Self {
        self.shrink = shrink;
        self
    }

    /// Bar body for a region the bar may occupy: `shrink` of the region's
    /// height including extensions, vertically centred, at the region's
    /// left edge.
    pub fn body_rect(&self, region: PixelRect) -> PixelRect {
        let height = region.height * self.shrink.clamp(0.05, 1.0) / (1.0 + 2.0 * EXTEND_FRACTION);
        let width = (height / ASPECT).max(2.0);
        PixelRect::new(
            region.x,
            region.y + (region.height - height) / 2.0,
            width,
            height,
        )
    }

    /// Horizontal space needed right of the bar body for ticks and labels.
    pub fn label_width(&self, style: &FigureStyle, text: &TextRenderer) -> f32 {
        let tick_px = style.px(style.tick_pt);
        let widest = self
            .ticks
            .iter()
            .map(|t| text.measure(&t.label, tick_px).0)
            .max()
            .unwrap_or(0) as f32;
        let (_, label_height) = text.measure(&self.label, style.px(style.colorbar_label_pt));
        style.px(style.tick_length_pt)
            + style.px(style.label_pad_pt) * 2.0
            + widest
            + label_height as f32
    }

    /// Y coordinate of a value along the body.
    fn value_y(&self, body: PixelRect, value: f32) -> f32 {
        body.bottom() - self.scale.normalize(value) * body.height
    }

    pub fn draw(
        &self,
        canvas: &mut Canvas,
        body: PixelRect,
        style: &FigureStyle,
        text: &TextRenderer,
    ) {
        let levels = self.scale.levels();
        let band_height = body.height / levels as f32;
        let ext = body.height * EXTEND_FRACTION;
        let mid_x = body.x + body.width / 2.0;

        for (i, &color) in self.scale.band_colors().iter().enumerate() {
            let bottom = body.bottom() - band_height * i as f32;
            // Overlap by a pixel so bands do not show seams.
            let top = (bottom - band_height - 0.5).max(body.y);
            canvas.fill_rect(PixelRect::new(body.x, top, body.width, bottom - top), color);
        }

        canvas.fill_polygon(
            &[(body.x, body.y), (body.right(), body.y), (mid_x, body.y - ext)],
            self.scale.over_color(),
        );
        canvas.fill_polygon(
            &[
                (body.x, body.bottom()),
                (body.right(), body.bottom()),
                (mid_x, body.bottom() + ext),
            ],
            self.scale.under_color(),
        );

        let outline_px = style.px(style.frame_pt);
        canvas.stroke_polyline(
            &[
                (body.x, body.y),
                (mid_x, body.y - ext),
                (body.right(), body.y),
                (body.right(), body.bottom()),
                (mid_x, body.bottom() + ext),
                (body.x, body.bottom()),
            ],
            true,
            outline_px,
            Color::BLACK,
        );

        let tick_len = style.px(style.tick_length_pt);
        let pad = style.px(style.label_pad_pt);
        let tick_px = style.px(style.tick_pt);
        let mut widest = 0u32;
        for tick in &self.ticks {
            let y = self.value_y(body, tick.value);
            canvas.stroke_line(
                (body.right(), y),
                (body.right() + tick_len, y),
                outline_px,
                Color::BLACK,
            );

            let label = text.render(&tick.label, tick_px, Color::BLACK);
            widest = widest.max(label.width());
            canvas.draw_image(
                &label,
                (body.right() + tick_len + pad).round() as i32,
                (y - label.height() as f32 / 2.0).round() as i32,
            );
        }

        if !self.label.is_empty() {
            let unit =
                text.render_vertical(&self.label, style.px(style.colorbar_label_pt), Color::BLACK);
            let x = body.right() + tick_len + pad * 2.0 + widest as f32;
            let y = body.y + (body.height - unit.height() as f32) / 2.0;
            canvas.draw_image(&unit, x.round() as i32, y.round() as i32);
        }
    }
}
