//! NetCDF reader for ensemble ocean-model output.
//!
//! Opens NEMO-style datasets (salinity, sea-surface height) with the native
//! netcdf library, detects the coordinate variables (1-D `lat`/`lon` or 2-D
//! `nav_lat`/`nav_lon`), decodes the CF time axis and reads 2-D slices as
//! [`ocean_common::GridField`]s with fill values replaced by NaN.

pub mod cf_time;
pub mod dataset;
pub mod error;
pub mod native;

pub use cf_time::{CfTimeUnits, TimeUnit};
pub use dataset::OceanDataset;
pub use error::{NetCdfError, NetCdfResult};
pub use native::silence_hdf5_errors;
