//! CLI module for ubeers
//!
//! Provides command-line interface for:
//! - api: serve the resource API
//! - bridge: serve the aggregation bridge
//! - serve: both in one process
//! - probe: one-shot bridge request
//! - config: print the effective configuration

mod args;
mod commands;
mod config;
mod errors;

pub use args::{Cli, Command};
pub use commands::{api, bridge, print_config, probe, run, run_command, serve};
pub use config::AppConfig;
pub use errors::{CliError, CliErrorCode, CliResult};
