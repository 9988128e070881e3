//! Latitude/longitude grids and the 2-D fields defined on them.

use std::sync::Arc;

use crate::error::{OceanError, OceanResult};

/// Geographic extent of a regular or curvilinear grid, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoExtent {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl GeoExtent {
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// Extent spanned by the first and last entries of each axis.
    ///
    /// Works for ascending and descending axes alike.
    pub fn from_axes(lons: &[f64], lats: &[f64]) -> OceanResult<Self> {
        let (lon0, lon1) = first_last(lons).ok_or(OceanError::EmptyAxis("longitude"))?;
        let (lat0, lat1) = first_last(lats).ok_or(OceanError::EmptyAxis("latitude"))?;
        Ok(Self {
            min_lon: lon0.min(lon1),
            min_lat: lat0.min(lat1),
            max_lon: lon0.max(lon1),
            max_lat: lat0.max(lat1),
        })
    }

    /// Longitude span in degrees.
    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Latitude span in degrees.
    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Aspect ratio (width / height) in an equidistant cylindrical projection.
    pub fn aspect(&self) -> f64 {
        if self.height() <= 0.0 {
            1.0
        } else {
            self.width() / self.height()
        }
    }

    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.min_lon && lon <= self.max_lon && lat >= self.min_lat && lat <= self.max_lat
    }
}

fn first_last(axis: &[f64]) -> Option<(f64, f64)> {
    Some((*axis.first()?, *axis.last()?))
}

/// A 2-D field of a physical quantity indexed by (latitude, longitude).
///
/// Values are stored row-major: row `j` holds latitude `lats[j]`, column `i`
/// holds longitude `lons[i]`. Missing cells are NaN.
#[derive(Debug, Clone)]
pub struct GridField {
    lats: Arc<[f64]>,
    lons: Arc<[f64]>,
    values: Vec<f32>,
}

impl GridField {
    /// Create a field, checking that `values` has shape `(len(lats), len(lons))`.
    pub fn new(lats: Arc<[f64]>, lons: Arc<[f64]>, values: Vec<f32>) -> OceanResult<Self> {
        if lats.is_empty() {
            return Err(OceanError::EmptyAxis("latitude"));
        }
        if lons.is_empty() {
            return Err(OceanError::EmptyAxis("longitude"));
        }
        if values.len() != lats.len() * lons.len() {
            return Err(OceanError::ShapeMismatch {
                expected_rows: lats.len(),
                expected_cols: lons.len(),
                actual: values.len(),
            });
        }
        Ok(Self { lats, lons, values })
    }

    /// Same axes, new values.
    pub fn with_values(&self, values: Vec<f32>) -> OceanResult<Self> {
        Self::new(self.lats.clone(), self.lons.clone(), values)
    }

    pub fn rows(&self) -> usize {
        self.lats.len()
    }

    pub fn cols(&self) -> usize {
        self.lons.len()
    }

    pub fn lats(&self) -> &[f64] {
        &self.lats
    }

    pub fn lons(&self) -> &[f64] {
        &self.lons
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn into_values(self) -> Vec<f32> {
        self.values
    }

    /// Value at (row, col), NaN when out of range.
    pub fn get(&self, row: usize, col: usize) -> f32 {
        if row >= self.rows() || col >= self.cols() {
            return f32::NAN;
        }
        self.values[row * self.cols() + col]
    }

    /// Build a new field on the same axes by mapping every cell.
    ///
    /// The closure receives `(lat, lon, value)`.
    pub fn map_cells<F>(&self, mut f: F) -> GridField
    where
        F: FnMut(f64, f64, f32) -> f32,
    {
        let cols = self.cols();
        let values = self
            .values
            .iter()
            .enumerate()
            .map(|(idx, &v)| f(self.lats[idx / cols], self.lons[idx % cols], v))
            .collect();
        GridField {
            lats: self.lats.clone(),
            lons: self.lons.clone(),
            values,
        }
    }

    /// Number of non-missing cells.
    pub fn valid_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_finite()).count()
    }

    /// Per-cell flag, true where the value is missing.
    pub fn missing_mask(&self) -> Vec<bool> {
        self.values.iter().map(|v| !v.is_finite()).collect()
    }

    pub fn extent(&self) -> GeoExtent {
        // Axes are non-empty by construction.
        GeoExtent::from_axes(&self.lons, &self.lats)
            .unwrap_or_else(|_| GeoExtent::new(0.0, 0.0, 0.0, 0.0))
    }

    /// Bilinear sample at a fractional (row, col) position.
    ///
    /// When a surrounding cell is missing the nearest cell's value is used
    /// instead, so a valid cell always covers its own footprint. NaN when
    /// that nearest cell is missing too.
    pub fn sample(&self, row: f64, col: f64) -> f32 {
        let rows = self.rows();
        let cols = self.cols();
        if row < 0.0 || col < 0.0 || row > (rows - 1) as f64 || col > (cols - 1) as f64 {
            return f32::NAN;
        }

        let r0 = row.floor() as usize;
        let c0 = col.floor() as usize;
        let r1 = (r0 + 1).min(rows - 1);
        let c1 = (c0 + 1).min(cols - 1);
        let dr = (row - r0 as f64) as f32;
        let dc = (col - c0 as f64) as f32;

        let v00 = self.get(r0, c0);
        let v01 = self.get(r0, c1);
        let v10 = self.get(r1, c0);
        let v11 = self.get(r1, c1);
        if v00.is_nan() || v01.is_nan() || v10.is_nan() || v11.is_nan() {
            return self.get(row.round() as usize, col.round() as usize);
        }

        let top = v00 * (1.0 - dc) + v01 * dc;
        let bottom = v10 * (1.0 - dc) + v11 * dc;
        top * (1.0 - dr) + bottom * dr
    }
}

/// Fractional index of `value` along a monotonic coordinate axis.
///
/// Handles ascending and descending axes; returns `None` outside the axis.
pub fn axis_position(axis: &[f64], value: f64) -> Option<f64> {
    match axis.len() {
        0 => return None,
        1 => return ((axis[0] - value).abs() < f64::EPSILON).then_some(0.0),
        _ => {}
    }

    let ascending = axis[axis.len() - 1] >= axis[0];
    let (lo, hi) = if ascending {
        (axis[0], axis[axis.len() - 1])
    } else {
        (axis[axis.len() - 1], axis[0])
    };
    if value < lo || value > hi || value.is_nan() {
        return None;
    }

    // First index whose coordinate is past `value` in axis order.
    let upper = if ascending {
        axis.partition_point(|&c| c <= value)
    } else {
        axis.partition_point(|&c| c >= value)
    };
    let i1 = upper.clamp(1, axis.len() - 1);
    let i0 = i1 - 1;
    let (c0, c1) = (axis[i0], axis[i1]);
    if (c1 - c0).abs() < f64::EPSILON {
        return Some(i0 as f64);
    }
    Some(i0 as f64 + (value - c0) / (c1 - c0))
}

/// Coordinate mesh built from the outer product of the longitude and
/// latitude axes: `x[j][i] = lons[i]`, `y[j][i] = lats[j]`.
#[derive(Debug, Clone)]
pub struct Mesh {
    lats: Arc<[f64]>,
    lons: Arc<[f64]>,
    x: Vec<f64>,
    y: Vec<f64>,
}

impl Mesh {
    pub fn new(lons: Arc<[f64]>, lats: Arc<[f64]>) -> OceanResult<Self> {
        if lons.is_empty() {
            return Err(OceanError::EmptyAxis("longitude"));
        }
        if lats.is_empty() {
            return Err(OceanError::EmptyAxis("latitude"));
        }

        let mut x = Vec::with_capacity(lats.len() * lons.len());
        let mut y = Vec::with_capacity(lats.len() * lons.len());
        for &lat in lats.iter() {
            for &lon in lons.iter() {
                x.push(lon);
                y.push(lat);
            }
        }

        Ok(Self { lats, lons, x, y })
    }

    /// (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        (self.lats.len(), self.lons.len())
    }

    pub fn lats(&self) -> &Arc<[f64]> {
        &self.lats
    }

    pub fn lons(&self) -> &Arc<[f64]> {
        &self.lons
    }

    /// Longitude of cell (row, col).
    pub fn x(&self, row: usize, col: usize) -> f64 {
        self.x[row * self.lons.len() + col]
    }

    /// Latitude of cell (row, col).
    pub fn y(&self, row: usize, col: usize) -> f64 {
        self.y[row * self.lons.len() + col]
    }

    /// Iterate `(lon, lat)` pairs in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }

    pub fn extent(&self) -> GeoExtent {
        GeoExtent::from_axes(&self.lons, &self.lats)
            .unwrap_or_else(|_| GeoExtent::new(0.0, 0.0, 0.0, 0.0))
    }

    /// True when the field has the same shape as this mesh.
    pub fn matches(&self, field: &GridField) -> bool {
        self.shape() == (field.rows(), field.cols())
    }

    /// Wrap raw values in a field that shares this mesh's axes.
    pub fn field(&self, values: Vec<f32>) -> OceanResult<GridField> {
        GridField::new(self.lats.clone(), self.lons.clone(), values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axes() -> (Arc<[f64]>, Arc<[f64]>) {
        let lats: Arc<[f64]> = vec![30.0, 35.0, 40.0].into();
        let lons: Arc<[f64]> = vec![-5.0, 0.0, 5.0, 10.0].into();
        (lats, lons)
    }

    #[test]
    fn test_field_shape_checked() {
        let (lats, lons) = axes();
        assert!(GridField::new(lats.clone(), lons.clone(), vec![0.0; 12]).is_ok());
        let err = GridField::new(lats, lons, vec![0.0; 11]).unwrap_err();
        assert!(matches!(err, OceanError::ShapeMismatch { actual: 11, .. }));
    }

    #[test]
    fn test_mesh_outer_product() {
        let (lats, lons) = axes();
        let mesh = Mesh::new(lons, lats).unwrap();
        assert_eq!(mesh.shape(), (3, 4));
        assert_eq!(mesh.x(2, 1), 0.0);
        assert_eq!(mesh.y(2, 1), 40.0);
        assert_eq!(mesh.coords().count(), 12);
    }

    #[test]
    fn test_extent_descending_lat() {
        let extent = GeoExtent::from_axes(&[-5.0, 10.0], &[45.0, 30.0]).unwrap();
        assert_eq!(extent.min_lat, 30.0);
        assert_eq!(extent.max_lat, 45.0);
        assert_eq!(extent.width(), 15.0);
    }

    #[test]
    fn test_axis_position() {
        let axis = [0.0, 1.0, 2.0, 4.0];
        assert_eq!(axis_position(&axis, 0.0), Some(0.0));
        assert_eq!(axis_position(&axis, 3.0), Some(2.5));
        assert_eq!(axis_position(&axis, 4.0), Some(3.0));
        assert_eq!(axis_position(&axis, 5.0), None);

        let descending = [4.0, 2.0, 0.0];
        assert_eq!(axis_position(&descending, 3.0), Some(0.5));
        assert_eq!(axis_position(&descending, 0.0), Some(2.0));
    }

    #[test]
    fn test_sample_falls_back_to_nearest_cell() {
        let (lats, lons) = axes();
        let mut values: Vec<f32> = (0..12).map(|v| v as f32).collect();
        values[5] = f32::NAN;
        let field = GridField::new(lats, lons, values).unwrap();
        assert!((field.sample(0.0, 2.5) - 2.5).abs() < 1e-6);
        // Cell (1, 1) is missing: nearest cells win, the missing one stays blank.
        assert_eq!(field.sample(0.2, 1.8), 2.0);
        assert_eq!(field.sample(0.6, 1.6), 6.0);
        assert!(field.sample(0.9, 1.1).is_nan());
    }

    #[test]
    fn test_sample_isolated_cell_covers_its_footprint() {
        let (lats, lons) = axes();
        let mut values = vec![f32::NAN; 12];
        values[6] = 25.0;
        let field = GridField::new(lats, lons, values).unwrap();
        assert_eq!(field.sample(1.0, 2.0), 25.0);
        assert_eq!(field.sample(1.4, 1.6), 25.0);
        assert!(field.sample(0.4, 2.0).is_nan());
    }
}
