//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// ipwatch: External IP Address Monitor
///
/// Polls a public lookup service for this host's external IP address and
/// appends every change to a CSV log.
#[derive(Debug, Parser)]
#[command(name = "ipwatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run (default: monitor)
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Check interval in seconds (10-3600)
    #[arg(long)]
    pub interval: Option<u64>,

    /// Start with monitoring stopped; type `start` to begin
    #[arg(long)]
    pub paused: bool,

    /// URL of the address lookup service (must return the address as plain text)
    #[arg(long = "provider-url", value_name = "URL")]
    pub provider_url: Option<String>,

    /// Path to the change log
    #[arg(long = "log-file", global = true)]
    pub log_file: Option<PathBuf>,

    /// Do not ring the terminal bell on change
    #[arg(long = "no-bell")]
    pub no_bell: bool,

    /// Path to configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for ipwatch
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = "ipwatch.toml")]
        output: PathBuf,
    },

    /// Print the change log, most recent first, and the per-address table
    Show {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Delete the change log
    Clear,
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Some(Command::Init { .. }))
    }
}
