//! Error types for the ensemble plotting crates.

use thiserror::Error;

/// Result type alias using OceanError.
pub type OceanResult<T> = Result<T, OceanError>;

/// Errors raised while building grids, frames or templated names.
#[derive(Debug, Error)]
pub enum OceanError {
    #[error("Field shape mismatch: expected {expected_rows}x{expected_cols} values, got {actual}")]
    ShapeMismatch {
        expected_rows: usize,
        expected_cols: usize,
        actual: usize,
    },

    #[error("Empty coordinate axis: {0}")]
    EmptyAxis(&'static str),

    #[error("Invalid time specification: {0}")]
    InvalidTime(String),

    #[error("Invalid template '{template}': {message}")]
    InvalidTemplate { template: String, message: String },

    #[error("Unknown placeholder '{{{placeholder}}}' in template '{template}'")]
    UnknownPlaceholder { template: String, placeholder: String },
}
