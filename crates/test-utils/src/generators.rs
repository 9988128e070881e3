//! Test data generators for creating synthetic ocean-like data.
//!
//! These generators create predictable, verifiable test data patterns
//! that can be used across the test suite. Grids are row-major with
//! `height` rows (latitudes) and `width` columns (longitudes).

/// Creates an evenly spaced coordinate axis.
///
/// # Example
///
/// ```
/// use test_utils::create_axis;
///
/// assert_eq!(create_axis(40.0, 0.5, 3), vec![40.0, 40.5, 41.0]);
/// ```
pub fn create_axis(start: f64, step: f64, len: usize) -> Vec<f64> {
    (0..len).map(|i| start + step * i as f64).collect()
}

/// Creates a test grid with predictable values.
///
/// Each cell value is calculated as: `col * 1000 + row`
///
/// # Example
///
/// ```
/// use test_utils::create_test_grid;
///
/// let grid = create_test_grid(10, 5);
/// assert_eq!(grid.len(), 50);
/// assert_eq!(grid[1], 1000.0); // col=1, row=0
/// assert_eq!(grid[10], 1.0);   // col=0, row=1
/// ```
pub fn create_test_grid(width: usize, height: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push((col * 1000 + row) as f32);
        }
    }
    data
}

/// True for the cells treated as land by the synthetic generators.
///
/// Land occupies the left quarter of the top quarter of rows, so both
/// the mask and its coastline are easy to predict.
pub fn is_synthetic_land(col: usize, row: usize, width: usize, height: usize) -> bool {
    col < width.div_ceil(4) && row >= height - height.div_ceil(4)
}

/// Creates a salinity-like grid in PSU with land cells set to NaN.
///
/// Sea values increase from 17 PSU (west) to 22 PSU (east) with a
/// slight north-south gradient, similar to a brackish enclosed sea.
pub fn create_salinity_grid(width: usize, height: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            if is_synthetic_land(col, row, width, height) {
                data.push(f32::NAN);
                continue;
            }
            let x = col as f32 / width.max(1) as f32;
            let y = row as f32 / height.max(1) as f32;
            data.push(17.0 + x * 5.0 - y * 0.5);
        }
    }
    data
}

/// Creates an ensemble-spread-like grid: small positive values with land NaN.
pub fn create_spread_grid(width: usize, height: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            if is_synthetic_land(col, row, width, height) {
                data.push(f32::NAN);
                continue;
            }
            let x = col as f32 / width.max(1) as f32;
            let y = row as f32 / height.max(1) as f32;
            data.push(0.05 + 0.4 * x * y);
        }
    }
    data
}

/// Creates a sea-surface-height grid in metres for one ensemble member.
///
/// A smooth wave pattern in `[-0.4, 0.4]`, shifted by `0.01 * member`.
pub fn create_ssh_grid(width: usize, height: usize, member: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            if is_synthetic_land(col, row, width, height) {
                data.push(f32::NAN);
                continue;
            }
            let x = col as f32 / width.max(1) as f32 * std::f32::consts::TAU;
            let y = row as f32 / height.max(1) as f32 * std::f32::consts::PI;
            data.push(0.4 * x.sin() * y.cos() + 0.01 * member as f32);
        }
    }
    data
}

/// Creates a grid filled with a constant value.
pub fn create_constant_grid(width: usize, height: usize, value: f32) -> Vec<f32> {
    vec![value; width * height]
}

/// Creates a grid where only the given cells hold values, everything else NaN.
///
/// `cells` are `(col, row, value)` triples.
pub fn create_sparse_grid(width: usize, height: usize, cells: &[(usize, usize, f32)]) -> Vec<f32> {
    let mut data = vec![f32::NAN; width * height];
    for &(col, row, value) in cells {
        if col < width && row < height {
            data[row * width + col] = value;
        }
    }
    data
}
