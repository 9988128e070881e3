//! Multi-panel figures: layout, figure title, colour bars and export.

use tracing::debug;

use crate::canvas::Canvas;
use crate::color::Color;
use crate::colorbar::ColorBar;
use crate::error::{RenderError, RenderResult};
use crate::panel::MapPanel;
use crate::png::create_png_auto;
use crate::projection::PixelRect;
use crate::text::{Align, TextRenderer};

/// Physical sizes of a figure and its decorations.
///
/// Lengths ending in `_pt` are typographic points, converted to pixels at
/// the figure's DPI.
#[derive(Debug, Clone, PartialEq)]
pub struct FigureStyle {
    pub width_in: f32,
    pub height_in: f32,
    pub dpi: u32,
    pub title_pt: f32,
    pub title_pad_pt: f32,
    pub suptitle_pt: f32,
    pub tick_pt: f32,
    pub tick_length_pt: f32,
    pub colorbar_label_pt: f32,
    pub graticule_label_pt: f32,
    pub label_pad_pt: f32,
    pub coastline_pt: f32,
    pub graticule_pt: f32,
    pub frame_pt: f32,
    /// Outer margin of the layout area.
    pub margin_pt: f32,
    /// Gap around each panel cell.
    pub panel_pad_pt: f32,
    /// Gap between a map and its colour bar.
    pub colorbar_pad_pt: f32,
    /// Whitespace kept around the content when cropping.
    pub crop_pad_in: f32,
    pub background: Color,
}

impl Default for FigureStyle {
    fn default() -> Self {
        Self {
            width_in: 6.4,
            height_in: 4.8,
            dpi: 300,
            title_pt: 5.0,
            title_pad_pt: 6.0,
            suptitle_pt: 5.0,
            tick_pt: 3.0,
            tick_length_pt: 2.0,
            colorbar_label_pt: 5.0,
            graticule_label_pt: 2.0,
            label_pad_pt: 1.5,
            coastline_pt: 0.25,
            graticule_pt: 0.1,
            frame_pt: 0.5,
            margin_pt: 18.0,
            panel_pad_pt: 6.0,
            colorbar_pad_pt: 6.0,
            crop_pad_in: 0.1,
            background: Color::WHITE,
        }
    }
}

impl FigureStyle {
    /// Points to pixels.
    pub fn px(&self, pt: f32) -> f32 {
        pt * self.dpi as f32 / 72.0
    }

    pub fn canvas_size(&self) -> (u32, u32) {
        let dpi = self.dpi as f32;
        (
            (self.width_in * dpi).round() as u32,
            (self.height_in * dpi).round() as u32,
        )
    }
}

#[derive(Debug, Clone)]
struct Cell {
    panel: MapPanel,
    colorbar: Option<ColorBar>,
}

/// A grid of map panels with optional figure title and shared colour bar.
#[derive(Debug, Clone)]
pub struct Figure {
    style: FigureStyle,
    rows: usize,
    cols: usize,
    cells: Vec<Option<Cell>>,
    shared_colorbar: Option<ColorBar>,
    suptitle: Option<String>,
}

impl Figure {
    pub fn new(style: FigureStyle, rows: usize, cols: usize) -> RenderResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(RenderError::InvalidLayout(format!(
                "figure needs at least one row and column, got {}x{}",
                rows, cols
            )));
        }
        let (w, h) = style.canvas_size();
        if w == 0 || h == 0 {
            return Err(RenderError::InvalidLayout(format!(
                "figure size {}x{} in at {} dpi is empty",
                style.width_in, style.height_in, style.dpi
            )));
        }
        Ok(Self {
            style,
            rows,
            cols,
            cells: vec![None; rows * cols],
            shared_colorbar: None,
            suptitle: None,
        })
    }

    pub fn style(&self) -> &FigureStyle {
        &self.style
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Place a panel, optionally with its own colour bar on its right.
    pub fn set_panel(
        &mut self,
        row: usize,
        col: usize,
        panel: MapPanel,
        colorbar: Option<ColorBar>,
    ) -> RenderResult<()> {
        if row >= self.rows || col >= self.cols {
            return Err(RenderError::InvalidLayout(format!(
                "panel ({}, {}) outside a {}x{} figure",
                row, col, self.rows, self.cols
            )));
        }
        self.cells[row * self.cols + col] = Some(Cell { panel, colorbar });
        Ok(())
    }

    /// One colour bar right of the whole panel grid.
    pub fn set_shared_colorbar(&mut self, colorbar: ColorBar) {
        self.shared_colorbar = Some(colorbar);
    }

    pub fn set_suptitle(&mut self, title: impl Into<String>) {
        self.suptitle = Some(title.into());
    }

    pub fn panel_count(&self) -> usize {
        self.cells.iter().flatten().count()
    }

    /// Width reserved right of a map for a colour bar with its labels.
    fn colorbar_reserve(&self, colorbar: &ColorBar, height: f32, text: &TextRenderer) -> f32 {
        let body = colorbar.body_rect(PixelRect::new(0.0, 0.0, 0.0, height));
        self.style.px(self.style.colorbar_pad_pt)
            + body.width
            + colorbar.label_width(&self.style, text)
    }

    /// Draw the full-size figure.
    pub fn render(&self, text: &TextRenderer) -> RenderResult<Canvas> {
        let style = &self.style;
        let (width, height) = style.canvas_size();
        let mut canvas = Canvas::new(width, height, style.background)?;

        let margin = style.px(style.margin_pt);
        let mut area = PixelRect::new(
            margin,
            margin,
            width as f32 - 2.0 * margin,
            height as f32 - 2.0 * margin,
        );

        if let Some(title) = self.suptitle.as_deref().filter(|t| !t.is_empty()) {
            let block =
                text.render_block(title, style.px(style.suptitle_pt), Color::BLACK, Align::Center);
            let x = (width as f32 - block.width() as f32) / 2.0;
            canvas.draw_image(&block, x.round() as i32, area.y.round() as i32);
            let used = block.height() as f32 + style.px(style.title_pad_pt);
            area = PixelRect::new(area.x, area.y + used, area.width, area.height - used);
        }

        if let Some(cb) = &self.shared_colorbar {
            let reserve = self.colorbar_reserve(cb, area.height, text);
            area.width -= reserve;
        }

        if area.width < 1.0 || area.height < 1.0 {
            return Err(RenderError::InvalidLayout(
                "no room left for panels after titles and colour bar".to_string(),
            ));
        }

        let cell_w = area.width / self.cols as f32;
        let cell_h = area.height / self.rows as f32;
        let pad = style.px(style.panel_pad_pt);
        let mut maps: Vec<PixelRect> = Vec::with_capacity(self.panel_count());

        for (idx, cell) in self.cells.iter().enumerate() {
            let Some(cell) = cell else {
                continue;
            };
            let (row, col) = (idx / self.cols, idx % self.cols);
            let inner = PixelRect::new(
                area.x + col as f32 * cell_w + pad,
                area.y + row as f32 * cell_h + pad,
                cell_w - 2.0 * pad,
                cell_h - 2.0 * pad,
            );

            let (_, title_h) = cell.panel.title_size(style, text);
            let (label_w, label_h) = cell.panel.label_margins(style, text);
            let mut avail = PixelRect::new(
                inner.x + label_w,
                inner.y + title_h,
                inner.width - label_w,
                inner.height - title_h - label_h,
            );
            if let Some(cb) = &cell.colorbar {
                avail.width -= self.colorbar_reserve(cb, avail.height, text);
            }

            let map = avail.fit_aspect(cell.panel.extent().aspect() as f32);
            if map.width < 1.0 || map.height < 1.0 {
                return Err(RenderError::InvalidLayout(format!(
                    "panel ({}, {}) has no room for its map",
                    row, col
                )));
            }
            debug!(row, col, x = map.x, y = map.y, w = map.width, h = map.height, "Panel layout");

            cell.panel.draw(&mut canvas, map, style, text);
            if let Some(cb) = &cell.colorbar {
                let region = PixelRect::new(
                    map.right() + style.px(style.colorbar_pad_pt),
                    map.y,
                    0.0,
                    map.height,
                );
                cb.draw(&mut canvas, cb.body_rect(region), style, text);
            }
            maps.push(map);
        }

        if let Some(cb) = &self.shared_colorbar {
            let top = maps.iter().map(|m| m.y).fold(f32::INFINITY, f32::min);
            let bottom = maps.iter().map(|m| m.bottom()).fold(f32::NEG_INFINITY, f32::max);
            let right = maps.iter().map(|m| m.right()).fold(f32::NEG_INFINITY, f32::max);
            let region = if maps.is_empty() {
                PixelRect::new(area.right(), area.y, 0.0, area.height)
            } else {
                PixelRect::new(right, top, 0.0, bottom - top)
            };
            let region = PixelRect::new(
                region.x + style.px(style.colorbar_pad_pt),
                region.y,
                0.0,
                region.height,
            );
            cb.draw(&mut canvas, cb.body_rect(region), style, text);
        }

        Ok(canvas)
    }

    /// Render, crop to content ("tight" bounding box) and encode as PNG.
    pub fn to_png(&self, text: &TextRenderer) -> RenderResult<Vec<u8>> {
        let canvas = self.render(text)?;
        let pad = (self.style.crop_pad_in * self.style.dpi as f32).round() as u32;
        let cropped = canvas.crop_to_content(self.style.background, pad)?;
        debug!(
            width = cropped.width(),
            height = cropped.height(),
            "Cropped figure"
        );
        create_png_auto(
            &cropped.to_rgba(),
            cropped.width() as usize,
            cropped.height() as usize,
            self.style.dpi,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_to_pixels() {
        let style = FigureStyle::default();
        assert_eq!(style.px(72.0), 300.0);
        assert_eq!(style.canvas_size(), (1920, 1440));
    }

    #[test]
    fn test_layout_validation() {
        assert!(Figure::new(FigureStyle::default(), 0, 2).is_err());
        let style = FigureStyle {
            width_in: 0.0,
            ..FigureStyle::default()
        };
        assert!(Figure::new(style, 1, 1).is_err());
    }

    #[test]
    fn test_empty_figure_renders_blank() {
        let style = FigureStyle {
            dpi: 50,
            ..FigureStyle::default()
        };
        let figure = Figure::new(style, 2, 1).unwrap();
        let canvas = figure.render(&TextRenderer::fallback()).unwrap();
        assert_eq!((canvas.width(), canvas.height()), (320, 240));
        assert!(canvas.content_bounds(Color::WHITE).is_none());
    }
}
