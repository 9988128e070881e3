//! Error types for NetCDF reading operations.

use std::path::PathBuf;

use ocean_common::OceanError;
use thiserror::Error;

/// Result type for NetCDF parser operations.
pub type NetCdfResult<T> = Result<T, NetCdfError>;

/// Error types for NetCDF reading.
#[derive(Error, Debug)]
pub enum NetCdfError {
    /// Dataset file does not exist
    #[error("Dataset not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Error reported by the netcdf library
    #[error("NetCDF error in {}: {source}", path.display())]
    Library {
        path: PathBuf,
        #[source]
        source: netcdf::Error,
    },

    /// Missing required variable, dimension or attribute
    #[error("Missing required data: {0}")]
    MissingData(String),

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// Slice shape does not match the reference grid
    #[error("Dimension mismatch for '{variable}': expected {expected:?}, found {found:?}")]
    DimensionMismatch {
        variable: String,
        expected: (usize, usize),
        found: (usize, usize),
    },

    /// Index outside an axis
    #[error("Index {index} out of range for {axis} axis of length {len}")]
    IndexOutOfRange {
        axis: &'static str,
        index: usize,
        len: usize,
    },

    /// Unparseable CF time units
    #[error("Invalid time units '{0}'")]
    InvalidTimeUnits(String),

    /// Grid construction error
    #[error(transparent)]
    Grid(#[from] OceanError),
}
