//! Text rasterization.
//!
//! Labels are rendered with a TrueType font through `rusttype` and
//! `imageproc`. When no font file can be loaded, a small set of stroked
//! glyphs (digits, sign, decimal point, degree sign and compass letters)
//! keeps numeric labels readable.

use std::path::{Path, PathBuf};
use std::sync::Once;

use image::{imageops, Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use rusttype::{point, Font, Scale};
use tiny_skia::{LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};
use tracing::{debug, warn};

use crate::color::Color;
use crate::error::{RenderError, RenderResult};

/// Fonts tried, in order, when no font path is configured.
pub const DEFAULT_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

static FALLBACK_WARNING: Once = Once::new();

/// Horizontal alignment of the lines of a multi-line label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Renders text to straight-alpha RGBA images.
#[derive(Clone)]
pub struct TextRenderer {
    font: Option<Font<'static>>,
    source: Option<PathBuf>,
}

impl std::fmt::Debug for TextRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextRenderer")
            .field("source", &self.source)
            .field("fallback", &self.font.is_none())
            .finish()
    }
}

impl TextRenderer {
    /// Load the configured font, or the first available default.
    ///
    /// Never fails: without a usable font the stroke glyphs are used and a
    /// warning is logged once per process.
    pub fn load(configured: Option<&Path>) -> Self {
        if let Some(path) = configured {
            match Self::from_file(path) {
                Ok(renderer) => return renderer,
                Err(e) => warn!(path = %path.display(), error = %e, "Configured font unusable"),
            }
        }

        for candidate in DEFAULT_FONT_PATHS {
            let path = Path::new(candidate);
            if !path.is_file() {
                continue;
            }
            match Self::from_file(path) {
                Ok(renderer) => return renderer,
                Err(e) => debug!(path = %candidate, error = %e, "Skipping font"),
            }
        }

        Self::fallback()
    }

    pub fn from_file(path: &Path) -> RenderResult<Self> {
        let bytes = std::fs::read(path)?;
        let mut renderer = Self::from_bytes(bytes)?;
        debug!(path = %path.display(), "Loaded font");
        renderer.source = Some(path.to_path_buf());
        Ok(renderer)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> RenderResult<Self> {
        let font = Font::try_from_vec(bytes)
            .ok_or_else(|| RenderError::Font("not a TrueType/OpenType font".to_string()))?;
        Ok(Self {
            font: Some(font),
            source: None,
        })
    }

    /// Stroke glyphs only.
    pub fn fallback() -> Self {
        FALLBACK_WARNING.call_once(|| {
            warn!("No TrueType font available, labels use built-in stroke glyphs");
        });
        Self {
            font: None,
            source: None,
        }
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Size in pixels of a single line of text.
    pub fn measure(&self, text: &str, px: f32) -> (u32, u32) {
        match &self.font {
            Some(font) => {
                let scale = Scale::uniform(px);
                let v = font.v_metrics(scale);
                let width = font
                    .layout(text, scale, point(0.0, v.ascent))
                    .last()
                    .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
                    .unwrap_or(0.0);
                (width.ceil() as u32, (v.ascent - v.descent).ceil() as u32)
            }
            None => {
                let (advance, _) = stroke_metrics(px);
                let n = text.chars().count() as f32;
                ((n * advance).ceil() as u32, px.ceil() as u32)
            }
        }
    }

    /// Size in pixels of a (possibly multi-line) block.
    pub fn measure_block(&self, text: &str, px: f32) -> (u32, u32) {
        let line_height = self.line_height(px);
        let mut width = 0;
        let mut lines = 0;
        for line in text.lines() {
            width = width.max(self.measure(line, px).0);
            lines += 1;
        }
        (width, lines * line_height)
    }

    fn line_height(&self, px: f32) -> u32 {
        match &self.font {
            Some(font) => {
                let v = font.v_metrics(Scale::uniform(px));
                (v.ascent - v.descent + v.line_gap).ceil() as u32
            }
            None => (px * 1.2).ceil() as u32,
        }
    }

    /// Render one line of text.
    pub fn render(&self, text: &str, px: f32, color: Color) -> RgbaImage {
        let (width, height) = self.measure(text, px);
        let mut img = RgbaImage::new(width.max(1), height.max(1));
        match &self.font {
            Some(font) => {
                // Draw white coverage, then recolour so the result is
                // straight alpha regardless of how imageproc blends.
                draw_text_mut(
                    &mut img,
                    Rgba([255, 255, 255, 255]),
                    0,
                    0,
                    Scale::uniform(px),
                    font,
                    text,
                );
                for pixel in img.pixels_mut() {
                    let coverage = pixel.0[3] as u32;
                    *pixel = Rgba([
                        color.r,
                        color.g,
                        color.b,
                        (coverage * color.a as u32 / 255) as u8,
                    ]);
                }
            }
            None => draw_stroke_text(&mut img, text, px, color),
        }
        img
    }

    /// Render a multi-line block, each line aligned within the block.
    pub fn render_block(&self, text: &str, px: f32, color: Color, align: Align) -> RgbaImage {
        let (width, height) = self.measure_block(text, px);
        let line_height = self.line_height(px);
        let mut block = RgbaImage::new(width.max(1), height.max(1));

        for (i, line) in text.lines().enumerate() {
            let rendered = self.render(line, px, color);
            let x = match align {
                Align::Left => 0,
                Align::Center => (width.saturating_sub(rendered.width())) / 2,
                Align::Right => width.saturating_sub(rendered.width()),
            };
            imageops::overlay(&mut block, &rendered, x as i64, (i as u32 * line_height) as i64);
        }
        block
    }

    /// Render one line rotated 90° counter-clockwise (reads bottom to top).
    pub fn render_vertical(&self, text: &str, px: f32, color: Color) -> RgbaImage {
        imageops::rotate270(&self.render(text, px, color))
    }
}

/// (advance, glyph width) for stroke glyphs at a pixel size.
fn stroke_metrics(px: f32) -> (f32, f32) {
    let width = px * 0.55;
    (width + px * 0.15, width)
}

type GlyphStroke = ((f32, f32), (f32, f32));

/// Line segments of a stroke glyph in a unit box centred on the origin,
/// `x` and `y` in `[-0.5, 0.5]`, `y` down.
fn glyph_segments(ch: char) -> Vec<GlyphStroke> {
    const L: f32 = -0.5;
    const R: f32 = 0.5;
    const T: f32 = -0.5;
    const B: f32 = 0.5;
    const M: f32 = 0.0;
    match ch {
        '0' => vec![((L, T), (R, T)), ((R, T), (R, B)), ((R, B), (L, B)), ((L, B), (L, T))],
        '1' => vec![((M, T), (M, B))],
        '2' => vec![((L, T), (R, T)), ((R, T), (R, M)), ((R, M), (L, M)), ((L, M), (L, B)), ((L, B), (R, B))],
        '3' => vec![((L, T), (R, T)), ((R, T), (R, B)), ((R, B), (L, B)), ((L, M), (R, M))],
        '4' => vec![((L, T), (L, M)), ((L, M), (R, M)), ((R, T), (R, B))],
        '5' | 'S' => vec![((R, T), (L, T)), ((L, T), (L, M)), ((L, M), (R, M)), ((R, M), (R, B)), ((R, B), (L, B))],
        '6' => vec![((R, T), (L, T)), ((L, T), (L, B)), ((L, B), (R, B)), ((R, B), (R, M)), ((R, M), (L, M))],
        '7' => vec![((L, T), (R, T)), ((R, T), (M, B))],
        '8' => vec![((L, T), (R, T)), ((R, T), (R, B)), ((R, B), (L, B)), ((L, B), (L, T)), ((L, M), (R, M))],
        '9' => vec![((L, M), (R, M)), ((R, M), (R, T)), ((R, T), (L, T)), ((L, T), (L, M)), ((R, M), (R, B))],
        '-' => vec![((L, M), (R, M))],
        '.' => vec![((M, 0.35), (M, B))],
        '°' => vec![((-0.2, T), (0.2, T)), ((0.2, T), (0.2, -0.2)), ((0.2, -0.2), (-0.2, -0.2)), ((-0.2, -0.2), (-0.2, T))],
        'N' => vec![((L, B), (L, T)), ((L, T), (R, B)), ((R, B), (R, T))],
        'E' => vec![((R, T), (L, T)), ((L, T), (L, B)), ((L, B), (R, B)), ((L, M), (R, M))],
        'W' => vec![((L, T), (-0.25, B)), ((-0.25, B), (M, M)), ((M, M), (0.25, B)), ((0.25, B), (R, T))],
        _ => vec![],
    }
}

fn draw_stroke_text(img: &mut RgbaImage, text: &str, px: f32, color: Color) {
    let Some(mut pixmap) = Pixmap::new(img.width(), img.height()) else {
        return;
    };
    let (advance, glyph_width) = stroke_metrics(px);
    let glyph_height = px * 0.7;
    let centre_y = px * 0.5;

    let mut paint = Paint::default();
    paint.set_color(color.to_skia());
    paint.anti_alias = true;
    let stroke = Stroke {
        width: (px * 0.1).max(1.0),
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Stroke::default()
    };

    for (i, ch) in text.chars().enumerate() {
        let centre_x = i as f32 * advance + glyph_width / 2.0;
        for ((x1, y1), (x2, y2)) in glyph_segments(ch) {
            let mut pb = PathBuilder::new();
            pb.move_to(centre_x + x1 * glyph_width, centre_y + y1 * glyph_height);
            pb.line_to(centre_x + x2 * glyph_width, centre_y + y2 * glyph_height);
            if let Some(path) = pb.finish() {
                pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
            }
        }
    }

    for (pixel, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *pixel = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_measures_per_char() {
        let text = TextRenderer::fallback();
        assert!(!text.has_font());
        let (w1, h) = text.measure("1", 20.0);
        let (w3, _) = text.measure("123", 20.0);
        assert_eq!(h, 20);
        assert!(w3 > w1 * 2);
    }

    #[test]
    fn test_fallback_draws_digits() {
        let text = TextRenderer::fallback();
        let img = text.render("18", 24.0, Color::BLACK);
        assert!(img.pixels().any(|p| p.0[3] > 0));
    }

    #[test]
    fn test_vertical_swaps_dimensions() {
        let text = TextRenderer::fallback();
        let line = text.render("0.5", 12.0, Color::BLACK);
        let vertical = text.render_vertical("0.5", 12.0, Color::BLACK);
        assert_eq!(line.width(), vertical.height());
        assert_eq!(line.height(), vertical.width());
    }

    #[test]
    fn test_block_stacks_lines() {
        let text = TextRenderer::fallback();
        let (_, one) = text.measure_block("10", 10.0);
        let (_, two) = text.measure_block("10\n20", 10.0);
        assert_eq!(two, one * 2);
    }

    #[test]
    fn test_invalid_font_bytes() {
        assert!(TextRenderer::from_bytes(vec![0u8; 16]).is_err());
    }
}
