//! Command line shared by both binaries.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{CommandFactory, FromArgMatches, Parser};
use ocean_common::time::{parse_input_date, today_string};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

/// Printed when the config file argument is missing.
pub const MISSING_CONFIG_MESSAGE: &str = "[ERROR] -- Config file not provided!";

/// Render ensemble ocean maps for one run date.
#[derive(Parser, Debug)]
#[command(version)]
pub struct Args {
    /// INI configuration file
    pub config: Option<PathBuf>,

    /// Run date as YYYYMMDD (default: today)
    pub date: Option<String>,

    /// Which calendar day of the run to render, counted from 0
    pub day_index: Option<usize>,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    pub log_level: String,
}

/// Validated inputs of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub config: PathBuf,
    /// `YYYYMMDD`
    pub date: String,
    pub day_index: usize,
}

impl Args {
    /// Fill in defaults and validate the date. `None` when no config file
    /// was given.
    pub fn into_request(self) -> Result<Option<RunRequest>> {
        let Some(config) = self.config else {
            return Ok(None);
        };
        let date = self.date.unwrap_or_else(today_string);
        parse_input_date(&date).with_context(|| format!("Invalid run date '{}'", date))?;
        Ok(Some(RunRequest {
            config,
            date,
            day_index: self.day_index.unwrap_or(0),
        }))
    }
}

pub fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .init();
}

/// Parse the command line, set up logging and run one pipeline.
///
/// Every failure, including argument errors, exits with status 1.
pub fn main_with<F>(name: &'static str, run: F) -> ExitCode
where
    F: FnOnce(&RunRequest) -> Result<()>,
{
    // Load .env file if present
    dotenvy::dotenv().ok();

    let matches = match Args::command().name(name).try_get_matches() {
        Ok(matches) => matches,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };
    let args = match Args::from_arg_matches(&matches) {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&args.log_level);

    let request = match args.into_request() {
        Ok(Some(request)) => request,
        Ok(None) => {
            println!("{}", MISSING_CONFIG_MESSAGE);
            return ExitCode::FAILURE;
        }
        Err(e) => {
            error!("{:#}", e);
            return ExitCode::FAILURE;
        }
    };

    info!(
        config = %request.config.display(),
        date = %request.date,
        day_index = request.day_index,
        "Starting {}",
        name
    );

    match run(&request) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
