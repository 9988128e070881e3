//! Ocean-model datasets: coordinate detection, time/depth axes and 2-D slices.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ocean_common::{GeoExtent, GridField, Mesh, Timestep};
use tracing::{debug, warn};

use crate::cf_time::CfTimeUnits;
use crate::error::{NetCdfError, NetCdfResult};
use crate::native::{get_string_attr, silence_hdf5_errors, Packing};

/// Candidate latitude variable names, in lookup order.
pub const LATITUDE_NAMES: [&str; 3] = ["lat", "nav_lat", "latitude"];
/// Candidate longitude variable names, in lookup order.
pub const LONGITUDE_NAMES: [&str; 3] = ["lon", "nav_lon", "longitude"];
/// Candidate time variable names, in lookup order.
pub const TIME_NAMES: [&str; 2] = ["time", "time_counter"];
/// Candidate depth variable names, in lookup order.
pub const DEPTH_NAMES: [&str; 2] = ["depth", "deptht"];

const STANDARD_CALENDARS: [&str; 3] = ["standard", "gregorian", "proleptic_gregorian"];

#[derive(Debug, Clone, Copy)]
enum Axis {
    Latitude,
    Longitude,
}

/// An open NetCDF file with its decoded coordinate axes.
pub struct OceanDataset {
    path: PathBuf,
    file: netcdf::File,
    lats: Arc<[f64]>,
    lons: Arc<[f64]>,
    timesteps: Vec<Timestep>,
    depths: Option<Vec<f64>>,
}

impl std::fmt::Debug for OceanDataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OceanDataset")
            .field("path", &self.path)
            .field("rows", &self.lats.len())
            .field("cols", &self.lons.len())
            .field("timesteps", &self.timesteps.len())
            .field("depths", &self.depths.as_ref().map(Vec::len))
            .finish()
    }
}

impl OceanDataset {
    /// Open a dataset and decode its latitude, longitude, time and depth axes.
    pub fn open(path: impl AsRef<Path>) -> NetCdfResult<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.is_file() {
            return Err(NetCdfError::NotFound(path));
        }

        silence_hdf5_errors();

        let file = netcdf::open(&path).map_err(|source| NetCdfError::Library {
            path: path.clone(),
            source,
        })?;

        let lats = read_axis(&file, &path, &LATITUDE_NAMES, Axis::Latitude)?;
        let lons = read_axis(&file, &path, &LONGITUDE_NAMES, Axis::Longitude)?;
        let timesteps = read_time_axis(&file, &path)?;
        let depths = read_depth_axis(&file, &path)?;

        debug!(
            path = %path.display(),
            rows = lats.len(),
            cols = lons.len(),
            timesteps = timesteps.len(),
            depths = depths.as_ref().map(Vec::len).unwrap_or(0),
            "Opened dataset"
        );

        Ok(Self {
            path,
            file,
            lats: lats.into(),
            lons: lons.into(),
            timesteps,
            depths,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lats(&self) -> Arc<[f64]> {
        self.lats.clone()
    }

    pub fn lons(&self) -> Arc<[f64]> {
        self.lons.clone()
    }

    /// (rows, cols) of the horizontal grid.
    pub fn shape(&self) -> (usize, usize) {
        (self.lats.len(), self.lons.len())
    }

    pub fn timesteps(&self) -> &[Timestep] {
        &self.timesteps
    }

    /// Depth values in metres, `None` for surface-only datasets.
    pub fn depths(&self) -> Option<&[f64]> {
        self.depths.as_deref()
    }

    pub fn extent(&self) -> NetCdfResult<GeoExtent> {
        Ok(GeoExtent::from_axes(&self.lons, &self.lats)?)
    }

    /// Coordinate mesh of this dataset's grid.
    pub fn mesh(&self) -> NetCdfResult<Mesh> {
        Ok(Mesh::new(self.lons.clone(), self.lats.clone())?)
    }

    pub fn has_variable(&self, name: &str) -> bool {
        self.file.variable(name).is_some()
    }

    /// Read `variable[time_index, depth_index, :, :]` on this dataset's grid.
    pub fn read_field(
        &self,
        variable: &str,
        time_index: usize,
        depth_index: Option<usize>,
    ) -> NetCdfResult<GridField> {
        let mesh = self.mesh()?;
        self.read_field_on(variable, time_index, depth_index, &mesh)
    }

    /// Read a 2-D slice and attach it to a reference mesh.
    ///
    /// Fails with [`NetCdfError::DimensionMismatch`] when the slice's
    /// horizontal shape differs from the mesh.
    pub fn read_field_on(
        &self,
        variable: &str,
        time_index: usize,
        depth_index: Option<usize>,
        mesh: &Mesh,
    ) -> NetCdfResult<GridField> {
        let var = self.file.variable(variable).ok_or_else(|| {
            NetCdfError::MissingData(format!(
                "variable '{}' in {}",
                variable,
                self.path.display()
            ))
        })?;

        let dims: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
        if dims.len() < 2 {
            return Err(NetCdfError::InvalidFormat(format!(
                "variable '{}' has {} dimensions, expected at least 2",
                variable,
                dims.len()
            )));
        }
        let found = (dims[dims.len() - 2], dims[dims.len() - 1]);
        if found != mesh.shape() {
            return Err(NetCdfError::DimensionMismatch {
                variable: variable.to_string(),
                expected: mesh.shape(),
                found,
            });
        }

        let raw: Vec<f32> = match dims.len() {
            4 => {
                let depth_index = depth_index.unwrap_or(0);
                check_index("time", time_index, dims[0])?;
                check_index("depth", depth_index, dims[1])?;
                var.get_values::<f32, _>((time_index, depth_index, .., ..))
            }
            3 => {
                if depth_index.unwrap_or(0) != 0 {
                    return Err(NetCdfError::InvalidFormat(format!(
                        "variable '{}' has no depth dimension",
                        variable
                    )));
                }
                check_index("time", time_index, dims[0])?;
                var.get_values::<f32, _>((time_index, .., ..))
            }
            2 => var.get_values::<f32, _>(..),
            n => {
                return Err(NetCdfError::InvalidFormat(format!(
                    "variable '{}' has {} dimensions, expected 2 to 4",
                    variable, n
                )))
            }
        }
        .map_err(|source| self.library_error(source))?;

        let values = Packing::from_variable(&var).unpack(raw);
        Ok(mesh.field(values)?)
    }

    fn library_error(&self, source: netcdf::Error) -> NetCdfError {
        NetCdfError::Library {
            path: self.path.clone(),
            source,
        }
    }
}

fn check_index(axis: &'static str, index: usize, len: usize) -> NetCdfResult<()> {
    if index >= len {
        return Err(NetCdfError::IndexOutOfRange { axis, index, len });
    }
    Ok(())
}

fn find_variable<'f>(
    file: &'f netcdf::File,
    names: &[&str],
) -> Option<(String, netcdf::Variable<'f>)> {
    names
        .iter()
        .find_map(|name| file.variable(name).map(|var| (name.to_string(), var)))
}

/// Read a latitude or longitude axis.
///
/// 2-D curvilinear coordinates are reduced to their first column
/// (latitude) or first row (longitude).
fn read_axis(
    file: &netcdf::File,
    path: &Path,
    names: &[&str],
    axis: Axis,
) -> NetCdfResult<Vec<f64>> {
    let (name, var) = find_variable(file, names).ok_or_else(|| {
        NetCdfError::MissingData(format!(
            "{:?} coordinate (tried {}) in {}",
            axis,
            names.join(", "),
            path.display()
        ))
    })?;

    let library_error = |source| NetCdfError::Library {
        path: path.to_path_buf(),
        source,
    };

    let values = match (var.dimensions().len(), axis) {
        (1, _) => var.get_values::<f64, _>(..),
        (2, Axis::Latitude) => var.get_values::<f64, _>((.., 0usize)),
        (2, Axis::Longitude) => var.get_values::<f64, _>((0usize, ..)),
        (n, _) => {
            return Err(NetCdfError::InvalidFormat(format!(
                "coordinate '{}' has {} dimensions",
                name, n
            )))
        }
    }
    .map_err(library_error)?;

    if values.is_empty() {
        return Err(NetCdfError::MissingData(format!("empty coordinate '{}'", name)));
    }
    Ok(values)
}

fn read_time_axis(file: &netcdf::File, path: &Path) -> NetCdfResult<Vec<Timestep>> {
    let (name, var) = find_variable(file, &TIME_NAMES).ok_or_else(|| {
        NetCdfError::MissingData(format!("time coordinate in {}", path.display()))
    })?;

    let units = get_string_attr(&var, "units")
        .ok_or_else(|| NetCdfError::MissingData(format!("units of '{}'", name)))?;
    if let Some(calendar) = get_string_attr(&var, "calendar") {
        if !STANDARD_CALENDARS.contains(&calendar.to_ascii_lowercase().as_str()) {
            warn!(calendar = %calendar, "Unsupported calendar, decoding as standard");
        }
    }

    let values = var
        .get_values::<f64, _>(..)
        .map_err(|source| NetCdfError::Library {
            path: path.to_path_buf(),
            source,
        })?;

    CfTimeUnits::parse(&units)?.decode_all(&values)
}

fn read_depth_axis(file: &netcdf::File, path: &Path) -> NetCdfResult<Option<Vec<f64>>> {
    let Some((_, var)) = find_variable(file, &DEPTH_NAMES) else {
        return Ok(None);
    };
    var.get_values::<f64, _>(..)
        .map(Some)
        .map_err(|source| NetCdfError::Library {
            path: path.to_path_buf(),
            source,
        })
}
