//! plot-salinity
//!
//! Ensemble mean and spread salinity maps, one image per timestep and depth.

use std::process::ExitCode;

use ensemble_plots::{cli, salinity};

fn main() -> ExitCode {
    cli::main_with("plot-salinity", salinity::run)
}
