//! INI configuration for the ensemble plotting tools.
//!
//! Each product reads a `[default]` section with paths shared by the run
//! and a product section (`[salinity]` or `[postcardSsh]`) with file names
//! and styling. Keys are case-insensitive.

pub mod document;
pub mod error;
pub mod postage;
pub mod resolution;
pub mod salinity;
pub mod settings;

pub use document::{ConfigDocument, Section};
pub use error::{ConfigError, ConfigResult};
pub use postage::{OutOfRange, PostageConfig};
pub use resolution::Resolution;
pub use salinity::SalinityConfig;
pub use settings::{OutputSettings, ScaleSettings};
