// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::Parser;

use crate::types::Mode;

/// Command-line arguments for `svcrun`.
///
/// The config file location is taken from `SVCRUN_CONFIG` (default
/// `Svcrun.toml`) and the log level from `SVCRUN_LOG`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "svcrun",
    version,
    about = "Start a group of services, watch them, and stop them together.",
    long_about = None
)]
pub struct CliArgs {
    /// Launch mode: `dev` uses each service's dev command, `production`
    /// (default) its plain start command.
    #[arg(value_enum, value_name = "MODE", default_value_t = Mode::Production)]
    pub mode: Mode,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
