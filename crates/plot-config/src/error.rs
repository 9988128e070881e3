//! Error types for configuration loading.

use std::path::PathBuf;

use ocean_common::OceanError;
use thiserror::Error;

/// Result type alias using ConfigError.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },

    #[error("Cannot parse config: {0}")]
    Parse(#[from] ini::ParseError),

    #[error("Missing section [{0}]")]
    MissingSection(String),

    #[error("Missing key '{key}' in section [{section}]")]
    MissingKey { section: String, key: String },

    #[error("Invalid value '{value}' for '{key}' in section [{section}]: {message}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        message: String,
    },

    #[error(transparent)]
    Template(#[from] OceanError),
}
