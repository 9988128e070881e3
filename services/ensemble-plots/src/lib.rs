//! Ensemble plotting pipelines.
//!
//! Both programs share the same flow: load the INI configuration, open the
//! NetCDF datasets, plan the frames of the requested day, then mask, render
//! and write one PNG per frame.

pub mod cli;
pub mod postage;
pub mod salinity;
pub mod writer;

pub use cli::RunRequest;
