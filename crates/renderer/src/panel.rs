//! Geographic map panels: banded fill, land, coastline, graticule and title.

use ocean_common::grid::axis_position;
use ocean_common::{GeoExtent, GridField};

use crate::canvas::Canvas;
use crate::color::Color;
use crate::contour::trace_mask_boundaries;
use crate::error::{RenderError, RenderResult};
use crate::figure::FigureStyle;
use crate::projection::{MapProjection, PixelRect};
use crate::scale::ColorScale;
use crate::text::{Align, TextRenderer};

/// Spacing of graticule lines in degrees.
pub const GRATICULE_STEP: f64 = 5.0;

/// One map with its fill, land mask and title.
#[derive(Debug, Clone)]
pub struct MapPanel {
    field: GridField,
    land: Vec<bool>,
    scale: ColorScale,
    title: String,
    axes: bool,
    smoothing: u32,
    land_color: Color,
}

impl MapPanel {
    /// `land` flags the cells missing in the raw (unmasked) data; it must
    /// match the field's shape.
    pub fn new(
        field: GridField,
        land: Vec<bool>,
        scale: ColorScale,
        title: impl Into<String>,
    ) -> RenderResult<Self> {
        if land.len() != field.values().len() {
            return Err(RenderError::InvalidLayout(format!(
                "land mask has {} cells, field has {}",
                land.len(),
                field.values().len()
            )));
        }
        Ok(Self {
            field,
            land,
            scale,
            title: title.into(),
            axes: true,
            smoothing: 0,
            land_color: Color::WHITE,
        })
    }

    /// Draw graticule, labels and frame (default on).
    pub fn with_axes(mut self, axes: bool) -> Self {
        self.axes = axes;
        self
    }

    /// Chaikin passes applied to coastlines.
    pub fn with_coastline_smoothing(mut self, passes: u32) -> Self {
        self.smoothing = passes;
        self
    }

    pub fn with_land_color(mut self, color: Color) -> Self {
        self.land_color = color;
        self
    }

    pub fn extent(&self) -> GeoExtent {
        self.field.extent()
    }

    pub fn scale(&self) -> &ColorScale {
        &self.scale
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn has_axes(&self) -> bool {
        self.axes
    }

    /// Space (left, bottom) reserved for graticule labels.
    pub fn label_margins(&self, style: &FigureStyle, text: &TextRenderer) -> (f32, f32) {
        if !self.axes {
            return (0.0, 0.0);
        }
        let px = style.px(style.graticule_label_pt);
        let pad = style.px(style.label_pad_pt);
        let (w, h) = text.measure("00°N", px);
        (w as f32 + pad * 2.0, h as f32 + pad * 2.0)
    }

    /// Title block size in pixels.
    pub fn title_size(&self, style: &FigureStyle, text: &TextRenderer) -> (f32, f32) {
        if self.title.is_empty() {
            return (0.0, 0.0);
        }
        let (w, h) = text.measure_block(&self.title, style.px(style.title_pt));
        (w as f32, h as f32 + style.px(style.title_pad_pt))
    }

    /// Draw into `map`, the rectangle the projected extent fills.
    pub fn draw(
        &self,
        canvas: &mut Canvas,
        map: PixelRect,
        style: &FigureStyle,
        text: &TextRenderer,
    ) {
        let projection = MapProjection::new(self.extent(), map);

        canvas.fill_rect(map, self.land_color);
        self.fill_bands(canvas, &projection);
        self.draw_coastline(canvas, &projection, style);
        if self.axes {
            self.draw_graticule(canvas, &projection, style, text);
            canvas.stroke_rect(map, style.px(style.frame_pt), Color::BLACK);
        }
        self.draw_title(canvas, map, style, text);
    }

    fn fill_bands(&self, canvas: &mut Canvas, projection: &MapProjection) {
        let rect = *projection.rect();
        let x0 = rect.x.floor().max(0.0) as u32;
        let y0 = rect.y.floor().max(0.0) as u32;
        let x1 = (rect.right().ceil() as u32).min(canvas.width());
        let y1 = (rect.bottom().ceil() as u32).min(canvas.height());
        let lats = self.field.lats();
        let lons = self.field.lons();

        // Column positions depend only on x.
        let cols: Vec<Option<f64>> = (x0..x1)
            .map(|px| {
                let (lon, _) = projection.pixel_to_geo(px as f32 + 0.5, rect.y);
                axis_position(lons, lon)
            })
            .collect();

        for py in y0..y1 {
            let (_, lat) = projection.pixel_to_geo(rect.x, py as f32 + 0.5);
            let Some(row) = axis_position(lats, lat) else {
                continue;
            };
            for (px, col) in (x0..x1).zip(&cols) {
                let Some(col) = *col else {
                    continue;
                };
                if let Some(color) = self.scale.color_for(self.field.sample(row, col)) {
                    canvas.put_pixel(px, py, color);
                }
            }
        }
    }

    fn draw_coastline(&self, canvas: &mut Canvas, projection: &MapProjection, style: &FigureStyle) {
        let width = style.px(style.coastline_pt);
        let lats = self.field.lats();
        let lons = self.field.lons();

        let (cols, rows) = (self.field.cols(), self.field.rows());
        for contour in trace_mask_boundaries(&self.land, cols, rows, self.smoothing) {
            let points: Vec<(f32, f32)> = contour
                .points
                .iter()
                .map(|p| {
                    projection.geo_to_pixel(
                        axis_value(lons, p.x as f64),
                        axis_value(lats, p.y as f64),
                    )
                })
                .collect();
            canvas.stroke_polyline(&points, contour.closed, width, Color::BLACK);
        }
    }

    fn draw_graticule(
        &self,
        canvas: &mut Canvas,
        projection: &MapProjection,
        style: &FigureStyle,
        text: &TextRenderer,
    ) {
        let extent = *projection.extent();
        let rect = *projection.rect();
        let line = style.px(style.graticule_pt);
        let label_px = style.px(style.graticule_label_pt);
        let pad = style.px(style.label_pad_pt);

        for lat in graticule_values(0.0, 90.0, extent.min_lat, extent.max_lat) {
            let (_, y) = projection.geo_to_pixel(extent.min_lon, lat);
            canvas.stroke_line((rect.x, y), (rect.right(), y), line, Color::BLACK);

            let label = text.render(&format_latitude(lat), label_px, Color::BLACK);
            canvas.draw_image(
                &label,
                (rect.x - pad - label.width() as f32).round() as i32,
                (y - label.height() as f32 / 2.0).round() as i32,
            );
        }

        for lon in graticule_values(-90.0, 90.0, extent.min_lon, extent.max_lon) {
            let (x, _) = projection.geo_to_pixel(lon, extent.min_lat);
            canvas.stroke_line((x, rect.y), (x, rect.bottom()), line, Color::BLACK);

            let label = text.render(&format_longitude(lon), label_px, Color::BLACK);
            canvas.draw_image(
                &label,
                (x - label.width() as f32 / 2.0).round() as i32,
                (rect.bottom() + pad).round() as i32,
            );
        }
    }

    fn draw_title(
        &self,
        canvas: &mut Canvas,
        map: PixelRect,
        style: &FigureStyle,
        text: &TextRenderer,
    ) {
        if self.title.is_empty() {
            return;
        }
        let block =
            text.render_block(&self.title, style.px(style.title_pt), Color::BLACK, Align::Center);
        let x = map.x + (map.width - block.width() as f32) / 2.0;
        let y = map.y - style.px(style.title_pad_pt) - block.height() as f32;
        canvas.draw_image(&block, x.round() as i32, y.round() as i32);
    }
}

/// Coordinate at a fractional index, extrapolating linearly past the ends.
pub fn axis_value(axis: &[f64], index: f64) -> f64 {
    match axis.len() {
        0 => f64::NAN,
        1 => axis[0],
        n => {
            let i0 = (index.floor().max(0.0) as usize).min(n - 2);
            let t = index - i0 as f64;
            axis[i0] + t * (axis[i0 + 1] - axis[i0])
        }
    }
}

/// Multiples of [`GRATICULE_STEP`] in `[start, stop)` that fall inside
/// `[lo, hi]`.
pub fn graticule_values(start: f64, stop: f64, lo: f64, hi: f64) -> Vec<f64> {
    let count = ((stop - start) / GRATICULE_STEP).ceil() as usize;
    (0..count)
        .map(|i| start + GRATICULE_STEP * i as f64)
        .filter(|&v| v >= lo - 1e-9 && v <= hi + 1e-9)
        .collect()
}

pub fn format_latitude(lat: f64) -> String {
    let deg = lat.abs().round() as i64;
    match lat {
        l if l > 0.0 => format!("{}°N", deg),
        l if l < 0.0 => format!("{}°S", deg),
        _ => "0°".to_string(),
    }
}

pub fn format_longitude(lon: f64) -> String {
    let deg = lon.abs().round() as i64;
    match lon {
        l if l > 0.0 => format!("{}°E", deg),
        l if l < 0.0 => format!("{}°W", deg),
        _ => "0°".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colormap::ColorMap;
    use crate::scale::Band;
    use std::sync::Arc;

    fn panel(values: Vec<f32>) -> MapPanel {
        let lats: Arc<[f64]> = vec![40.0, 45.0].into();
        let lons: Arc<[f64]> = vec![30.0, 35.0, 40.0].into();
        let field = GridField::new(lats, lons, values).unwrap();
        let land = field.missing_mask();
        let scale = ColorScale::new(ColorMap::named("jet").unwrap(), 0.0, 10.0, 10).unwrap();
        MapPanel::new(field, land, scale, "Member 0").unwrap()
    }

    #[test]
    fn test_graticule_values() {
        assert_eq!(graticule_values(0.0, 90.0, 40.0, 47.0), vec![40.0, 45.0]);
        assert_eq!(graticule_values(-90.0, 90.0, 27.0, 42.0), vec![30.0, 35.0, 40.0]);
        assert!(graticule_values(0.0, 90.0, -20.0, -10.0).is_empty());
    }

    #[test]
    fn test_coordinate_labels() {
        assert_eq!(format_latitude(45.0), "45°N");
        assert_eq!(format_latitude(-5.0), "5°S");
        assert_eq!(format_longitude(30.0), "30°E");
        assert_eq!(format_longitude(-10.0), "10°W");
        assert_eq!(format_longitude(0.0), "0°");
    }

    #[test]
    fn test_axis_value() {
        let axis = [10.0, 20.0, 40.0];
        assert_eq!(axis_value(&axis, 0.5), 15.0);
        assert_eq!(axis_value(&axis, 1.5), 30.0);
        assert_eq!(axis_value(&axis, 2.0), 40.0);
    }

    #[test]
    fn test_land_mask_shape_checked() {
        let lats: Arc<[f64]> = vec![40.0, 45.0].into();
        let lons: Arc<[f64]> = vec![30.0, 35.0].into();
        let field = GridField::new(lats, lons, vec![1.0; 4]).unwrap();
        let scale = ColorScale::new(ColorMap::named("jet").unwrap(), 0.0, 1.0, 4).unwrap();
        assert!(MapPanel::new(field, vec![false; 3], scale, "").is_err());
    }

    #[test]
    fn test_fill_uses_band_colours() {
        let p = panel(vec![5.5; 6]).with_axes(false);
        let style = FigureStyle::default();
        let text = TextRenderer::fallback();
        let mut canvas = Canvas::new(200, 150, Color::WHITE).unwrap();
        p.draw(&mut canvas, PixelRect::new(20.0, 50.0, 100.0, 50.0), &style, &text);

        let expected = p.scale().color_for(5.5);
        assert_eq!(canvas.pixel(70, 75), expected);
    }

    #[test]
    fn test_single_valid_cell_is_painted_in_its_band() {
        let lats: Arc<[f64]> = vec![40.0, 41.0, 42.0, 43.0, 44.0].into();
        let lons: Arc<[f64]> = vec![30.0, 31.0, 32.0, 33.0, 34.0].into();
        let mut values = vec![f32::NAN; 25];
        values[12] = 25.0;
        let field = GridField::new(lats, lons, values).unwrap();
        let scale = ColorScale::new(ColorMap::named("jet").unwrap(), 10.0, 40.0, 30).unwrap();
        assert_eq!(scale.band(25.0), Band::Index(15));
        let expected = scale.color_for(25.0);

        let p = MapPanel::new(field, vec![false; 25], scale, "")
            .unwrap()
            .with_axes(false);
        let mut canvas = Canvas::new(240, 240, Color::WHITE).unwrap();
        let map = PixelRect::new(20.0, 20.0, 200.0, 200.0);
        p.draw(&mut canvas, map, &FigureStyle::default(), &TextRenderer::fallback());

        let painted = (0..240u32)
            .flat_map(|y| (0..240u32).map(move |x| (x, y)))
            .filter(|&(x, y)| canvas.pixel(x, y) == expected)
            .count();
        // The centre cell's footprint is a 50x50 pixel square.
        assert!(painted >= 40 * 40, "only {} pixels painted", painted);
        assert_eq!(canvas.pixel(120, 120), expected);
        assert_eq!(canvas.pixel(40, 40), Some(Color::WHITE));
    }

    #[test]
    fn test_all_missing_panel_is_blank() {
        let p = panel(vec![f32::NAN; 6]).with_axes(false);
        let style = FigureStyle::default();
        let text = TextRenderer::fallback();
        let mut canvas = Canvas::new(200, 150, Color::WHITE).unwrap();
        p.draw(&mut canvas, PixelRect::new(20.0, 50.0, 100.0, 50.0), &style, &text);
        assert_eq!(canvas.pixel(70, 75), Some(Color::WHITE));
    }
}
