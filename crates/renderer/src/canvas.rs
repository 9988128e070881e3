//! Raster drawing surface backed by a `tiny_skia::Pixmap`.

use image::RgbaImage;
use tiny_skia::{
    FillRule, IntRect, LineCap, LineJoin, Paint, PathBuilder, Pixmap, PremultipliedColorU8, Rect,
    Stroke, Transform,
};

use crate::color::Color;
use crate::error::{RenderError, RenderResult};
use crate::projection::PixelRect;

/// Figure canvas. Pixels are stored premultiplied.
#[derive(Clone)]
pub struct Canvas {
    pixmap: Pixmap,
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

fn paint(color: Color, anti_alias: bool) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color.to_skia());
    paint.anti_alias = anti_alias;
    paint
}

fn path_from(points: &[(f32, f32)], close: bool) -> Option<tiny_skia::Path> {
    let (&(x0, y0), rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(x0, y0);
    for &(x, y) in rest {
        pb.line_to(x, y);
    }
    if close {
        pb.close();
    }
    pb.finish()
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Color) -> RenderResult<Self> {
        let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
            RenderError::InvalidLayout(format!("cannot allocate a {}x{} canvas", width, height))
        })?;
        pixmap.fill(background.to_skia());
        Ok(Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }

    pub fn fill_rect(&mut self, rect: PixelRect, color: Color) {
        if let Some(r) = Rect::from_xywh(rect.x, rect.y, rect.width, rect.height) {
            self.pixmap
                .fill_rect(r, &paint(color, false), Transform::identity(), None);
        }
    }

    pub fn stroke_rect(&mut self, rect: PixelRect, width: f32, color: Color) {
        let corners = [
            (rect.x, rect.y),
            (rect.right(), rect.y),
            (rect.right(), rect.bottom()),
            (rect.x, rect.bottom()),
        ];
        self.stroke_polyline(&corners, true, width, color);
    }

    pub fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), width: f32, color: Color) {
        self.stroke_polyline(&[from, to], false, width, color);
    }

    pub fn stroke_polyline(
        &mut self,
        points: &[(f32, f32)],
        close: bool,
        width: f32,
        color: Color,
    ) {
        if points.len() < 2 || width <= 0.0 {
            return;
        }
        let Some(path) = path_from(points, close) else {
            return;
        };
        let stroke = Stroke {
            width,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(&path, &paint(color, true), &stroke, Transform::identity(), None);
    }

    pub fn fill_polygon(&mut self, points: &[(f32, f32)], color: Color) {
        if points.len() < 3 {
            return;
        }
        if let Some(path) = path_from(points, true) {
            self.pixmap.fill_path(
                &path,
                &paint(color, true),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
    }

    /// Overwrite one pixel with an opaque colour. Out-of-bounds is ignored.
    pub fn put_pixel(&mut self, x: u32, y: u32, color: Color) {
        if x >= self.width() || y >= self.height() {
            return;
        }
        let idx = (y * self.width() + x) as usize;
        if let Some(c) = PremultipliedColorU8::from_rgba(color.r, color.g, color.b, 255) {
            self.pixmap.pixels_mut()[idx] = c;
        }
    }

    /// Source-over composite a straight-alpha image with its top-left at
    /// `(x, y)`.
    pub fn draw_image(&mut self, image: &RgbaImage, x: i32, y: i32) {
        let width = self.width() as i32;
        let height = self.height() as i32;
        let stride = self.width() as usize;
        let pixels = self.pixmap.pixels_mut();

        for (ix, iy, px) in image.enumerate_pixels() {
            let [r, g, b, a] = px.0;
            if a == 0 {
                continue;
            }
            let cx = x + ix as i32;
            let cy = y + iy as i32;
            if cx < 0 || cy < 0 || cx >= width || cy >= height {
                continue;
            }

            let idx = cy as usize * stride + cx as usize;
            let dst = pixels[idx];
            let sa = a as f32 / 255.0;
            let blend = |s: u8, d: u8| (s as f32 * sa + d as f32 * (1.0 - sa)).round() as u8;
            let out_a = blend(255, dst.alpha());
            let out = PremultipliedColorU8::from_rgba(
                blend(r, dst.red()).min(out_a),
                blend(g, dst.green()).min(out_a),
                blend(b, dst.blue()).min(out_a),
                out_a,
            );
            if let Some(out) = out {
                pixels[idx] = out;
            }
        }
    }

    /// Bounding box `(x, y, width, height)` of pixels that differ from
    /// `background`, or `None` for a blank canvas.
    pub fn content_bounds(&self, background: Color) -> Option<(u32, u32, u32, u32)> {
        let Color { r, g, b, a } = background;
        let bg = PremultipliedColorU8::from_rgba(r, g, b, a)?;
        let width = self.width();
        let mut min_x = u32::MAX;
        let mut min_y = u32::MAX;
        let mut max_x = 0u32;
        let mut max_y = 0u32;

        for (idx, px) in self.pixmap.pixels().iter().enumerate() {
            if *px == bg {
                continue;
            }
            let x = idx as u32 % width;
            let y = idx as u32 / width;
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }

        (min_x <= max_x).then(|| (min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
    }

    /// Crop to the content bounding box grown by `pad` pixels on each side.
    ///
    /// A blank canvas is returned unchanged.
    pub fn crop_to_content(&self, background: Color, pad: u32) -> RenderResult<Canvas> {
        let Some((x, y, w, h)) = self.content_bounds(background) else {
            return Ok(self.clone());
        };
        let x0 = x.saturating_sub(pad);
        let y0 = y.saturating_sub(pad);
        let x1 = (x + w + pad).min(self.width());
        let y1 = (y + h + pad).min(self.height());

        let rect = IntRect::from_xywh(x0 as i32, y0 as i32, x1 - x0, y1 - y0)
            .ok_or_else(|| RenderError::InvalidLayout("empty crop rectangle".to_string()))?;
        let pixmap = self
            .pixmap
            .clone_rect(rect)
            .ok_or_else(|| RenderError::InvalidLayout("crop outside canvas".to_string()))?;
        Ok(Canvas { pixmap })
    }

    /// Straight-alpha RGBA bytes.
    pub fn to_rgba(&self) -> Vec<u8> {
        self.pixmap
            .pixels()
            .iter()
            .flat_map(|px| {
                let c = px.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect()
    }

    /// Straight-alpha RGBA value at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let px = self.pixmap.pixel(x, y)?.demultiply();
        Some(Color::new(px.red(), px.green(), px.blue(), px.alpha()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_fill_rect_and_bounds() {
        let mut canvas = Canvas::new(20, 10, Color::WHITE).unwrap();
        assert!(canvas.content_bounds(Color::WHITE).is_none());

        canvas.fill_rect(PixelRect::new(4.0, 2.0, 3.0, 5.0), Color::BLACK);
        assert_eq!(canvas.content_bounds(Color::WHITE), Some((4, 2, 3, 5)));
        assert_eq!(canvas.pixel(5, 3), Some(Color::BLACK));
    }

    #[test]
    fn test_crop_with_padding() {
        let mut canvas = Canvas::new(20, 10, Color::WHITE).unwrap();
        canvas.put_pixel(10, 5, Color::BLACK);
        let cropped = canvas.crop_to_content(Color::WHITE, 2).unwrap();
        assert_eq!((cropped.width(), cropped.height()), (5, 5));
        assert_eq!(cropped.pixel(2, 2), Some(Color::BLACK));
    }

    #[test]
    fn test_draw_image_blends() {
        let mut canvas = Canvas::new(4, 4, Color::WHITE).unwrap();
        let mut img = RgbaImage::new(2, 2);
        img.put_pixel(0, 0, Rgba([0, 0, 0, 255]));
        img.put_pixel(1, 0, Rgba([0, 0, 0, 0]));
        canvas.draw_image(&img, 1, 1);
        assert_eq!(canvas.pixel(1, 1), Some(Color::BLACK));
        assert_eq!(canvas.pixel(2, 1), Some(Color::WHITE));
    }
}
