//! Equidistant cylindrical (plate carrée) projection onto a pixel rectangle.

use ocean_common::GeoExtent;

/// Axis-aligned rectangle in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PixelRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.right() && py >= self.y && py <= self.bottom()
    }

    /// Largest rectangle of the given aspect ratio (width / height) centred
    /// inside this one.
    pub fn fit_aspect(&self, aspect: f32) -> PixelRect {
        if aspect <= 0.0 || !aspect.is_finite() {
            return *self;
        }
        if self.width / self.height > aspect {
            let w = self.height * aspect;
            PixelRect::new(self.x + (self.width - w) / 2.0, self.y, w, self.height)
        } else {
            let h = self.width / aspect;
            PixelRect::new(self.x, self.y + (self.height - h) / 2.0, self.width, h)
        }
    }
}

/// Maps longitude/latitude linearly onto a pixel rectangle, north up.
#[derive(Debug, Clone, Copy)]
pub struct MapProjection {
    extent: GeoExtent,
    rect: PixelRect,
}

impl MapProjection {
    pub fn new(extent: GeoExtent, rect: PixelRect) -> Self {
        Self { extent, rect }
    }

    pub fn extent(&self) -> &GeoExtent {
        &self.extent
    }

    pub fn rect(&self) -> &PixelRect {
        &self.rect
    }

    /// Canvas position of a geographic point.
    pub fn geo_to_pixel(&self, lon: f64, lat: f64) -> (f32, f32) {
        let fx = if self.extent.width() > 0.0 {
            (lon - self.extent.min_lon) / self.extent.width()
        } else {
            0.5
        };
        let fy = if self.extent.height() > 0.0 {
            (self.extent.max_lat - lat) / self.extent.height()
        } else {
            0.5
        };
        (
            self.rect.x + (fx as f32) * self.rect.width,
            self.rect.y + (fy as f32) * self.rect.height,
        )
    }

    /// Geographic position of a canvas point (pixel centres at `+0.5`).
    pub fn pixel_to_geo(&self, px: f32, py: f32) -> (f64, f64) {
        let fx = ((px - self.rect.x) / self.rect.width) as f64;
        let fy = ((py - self.rect.y) / self.rect.height) as f64;
        (
            self.extent.min_lon + fx * self.extent.width(),
            self.extent.max_lat - fy * self.extent.height(),
        )
    }
}
