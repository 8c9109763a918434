//! CLI argument definitions using clap
//!
//! Commands:
//! - ubeers api --config <path>
//! - ubeers bridge --config <path>
//! - ubeers serve --config <path>
//! - ubeers probe --url <ws-url> --event <name> [--id <n>]
//! - ubeers config --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ubeers - brewery resource API and real-time aggregation bridge
#[derive(Parser, Debug)]
#[command(name = "ubeers")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the resource API only
    Api {
        /// Path to configuration file
        #[arg(long, default_value = "./ubeers.json")]
        config: PathBuf,
    },

    /// Serve the aggregation bridge only
    Bridge {
        /// Path to configuration file
        #[arg(long, default_value = "./ubeers.json")]
        config: PathBuf,
    },

    /// Serve the resource API and the bridge in one process
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./ubeers.json")]
        config: PathBuf,
    },

    /// Send one request to a bridge and print the first reply
    Probe {
        /// Bridge WebSocket URL
        #[arg(long, default_value = "ws://127.0.0.1:3100/socket")]
        url: String,

        /// Event name (getBreweries, getBreweryById, deleteBrewery)
        #[arg(long)]
        event: String,

        /// Brewery id for getBreweryById and deleteBrewery
        #[arg(long)]
        id: Option<u64>,

        /// Seconds to wait for the reply
        #[arg(long, default_value_t = 10)]
        timeout_secs: u64,
    },

    /// Print the effective configuration as JSON
    Config {
        /// Path to configuration file
        #[arg(long, default_value = "./ubeers.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
