//! plot-postage-ssh
//!
//! Sea-surface-height postage stamps of every ensemble member, one image per
//! timestep.

use std::process::ExitCode;

use ensemble_plots::{cli, postage};

fn main() -> ExitCode {
    cli::main_with("plot-postage-ssh", postage::run)
}
