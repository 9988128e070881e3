//! Writers for small NetCDF files shaped like ocean-model output.
//!
//! Files are created at test time inside a temporary directory, so no
//! binary fixtures need to be checked in.

use std::path::Path;

use crate::fixtures::grid::GridSpec;

/// Fill value written in place of NaN cells.
pub const FILL_VALUE: f32 = 1.0e20;

/// Layout of a synthetic ocean dataset.
#[derive(Debug, Clone)]
pub struct OceanFileSpec<'a> {
    /// Data variable name, e.g. `vosaline`.
    pub variable: &'a str,
    pub grid: GridSpec,
    /// `time` or `time_counter`.
    pub time_name: &'a str,
    pub time_units: &'a str,
    pub times: &'a [f64],
    /// Optional depth axis as `(name, values)`.
    pub depth: Option<(&'a str, &'a [f64])>,
    /// Write 2-D `nav_lat`/`nav_lon` instead of 1-D `lat`/`lon`.
    pub curvilinear: bool,
}

impl<'a> OceanFileSpec<'a> {
    /// Salinity-like layout: `vosaline(time, deptht, lat, lon)`.
    pub fn salinity(grid: GridSpec, times: &'a [f64], depths: &'a [f64]) -> Self {
        Self {
            variable: "vosaline",
            grid,
            time_name: "time",
            time_units: crate::fixtures::time::HOURS_UNITS,
            times,
            depth: Some(("deptht", depths)),
            curvilinear: false,
        }
    }

    /// SSH-like layout: `sossheig(time_counter, y, x)` on a curvilinear grid.
    pub fn ssh(grid: GridSpec, times: &'a [f64]) -> Self {
        Self {
            variable: "sossheig",
            grid,
            time_name: "time_counter",
            time_units: crate::fixtures::time::HOURS_UNITS,
            times,
            depth: None,
            curvilinear: true,
        }
    }

    /// Number of 2-D slices the file holds.
    pub fn slice_count(&self) -> usize {
        self.times.len() * self.depth.map(|(_, d)| d.len()).unwrap_or(1)
    }
}

/// Write a dataset whose data variable holds `slices`, ordered time-major
/// then depth. NaN cells are stored as [`FILL_VALUE`].
pub fn write_ocean_file(
    path: &Path,
    spec: &OceanFileSpec<'_>,
    slices: &[Vec<f32>],
) -> Result<(), netcdf::Error> {
    assert_eq!(slices.len(), spec.slice_count(), "slice count mismatch");
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create fixture directory");
    }

    let grid = spec.grid;
    let mut file = netcdf::create(path)?;
    file.add_attribute("title", "Synthetic ensemble output")?;

    file.add_dimension(spec.time_name, spec.times.len())?;
    if let Some((name, depths)) = spec.depth {
        file.add_dimension(name, depths.len())?;
    }
    let (y_dim, x_dim) = if spec.curvilinear { ("y", "x") } else { ("lat", "lon") };
    file.add_dimension(y_dim, grid.height)?;
    file.add_dimension(x_dim, grid.width)?;

    {
        let mut var = file.add_variable::<f64>(spec.time_name, &[spec.time_name])?;
        var.put_attribute("units", spec.time_units)?;
        var.put_attribute("calendar", "gregorian")?;
        var.put_values(spec.times, ..)?;
    }

    if let Some((name, depths)) = spec.depth {
        let mut var = file.add_variable::<f32>(name, &[name])?;
        var.put_attribute("units", "m")?;
        let values: Vec<f32> = depths.iter().map(|&d| d as f32).collect();
        var.put_values(&values, ..)?;
    }

    let lats = grid.lats();
    let lons = grid.lons();
    if spec.curvilinear {
        let mut nav_lat = Vec::with_capacity(grid.size());
        let mut nav_lon = Vec::with_capacity(grid.size());
        for &lat in &lats {
            for &lon in &lons {
                nav_lat.push(lat as f32);
                nav_lon.push(lon as f32);
            }
        }
        write_coordinate(&mut file, "nav_lat", &["y", "x"], "degrees_north", &nav_lat)?;
        write_coordinate(&mut file, "nav_lon", &["y", "x"], "degrees_east", &nav_lon)?;
    } else {
        let lats: Vec<f32> = lats.iter().map(|&v| v as f32).collect();
        let lons: Vec<f32> = lons.iter().map(|&v| v as f32).collect();
        write_coordinate(&mut file, "lat", &["lat"], "degrees_north", &lats)?;
        write_coordinate(&mut file, "lon", &["lon"], "degrees_east", &lons)?;
    }

    let mut dims = vec![spec.time_name];
    if let Some((name, _)) = spec.depth {
        dims.push(name);
    }
    dims.extend([y_dim, x_dim]);

    let data: Vec<f32> = slices
        .iter()
        .flat_map(|slice| {
            assert_eq!(slice.len(), grid.size(), "slice size mismatch");
            slice
                .iter()
                .map(|&v| if v.is_nan() { FILL_VALUE } else { v })
        })
        .collect();

    let mut var = file.add_variable::<f32>(spec.variable, &dims)?;
    var.put_attribute("_FillValue", FILL_VALUE)?;
    var.put_values(&data, ..)?;

    Ok(())
}

fn write_coordinate(
    file: &mut netcdf::FileMut,
    name: &str,
    dims: &[&str],
    units: &str,
    values: &[f32],
) -> Result<(), netcdf::Error> {
    let mut var = file.add_variable::<f32>(name, dims)?;
    var.put_attribute("units", units)?;
    var.put_values(values, ..)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::grid;

    #[test]
    fn test_slice_count() {
        let depths = [1.0, 5.0];
        let times = [0.0, 12.0, 24.0];
        assert_eq!(OceanFileSpec::salinity(grid::TINY, &times, &depths).slice_count(), 6);
        assert_eq!(OceanFileSpec::ssh(grid::TINY, &times).slice_count(), 3);
    }
}
