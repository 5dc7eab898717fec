//! ipwatch: External IP Address Monitor
//!
//! Entry point for the ipwatch application.

use ipwatch::config::{Cli, Command, ValidatedConfig, write_default_config};
use std::process::ExitCode;
use std::time::Duration;

mod app;
mod report;
mod run;

use app::{exit_code, print_config_hint, setup_tracing};

/// Time given to the stdin reader thread after the monitor stops.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(200);

/// Main entry point.
///
/// Excluded from coverage as it's the thin wrapper around testable components.
#[cfg(not(tarpaulin_include))]
fn main() -> ExitCode {
    let cli = Cli::parse_args();

    // Handle init subcommand
    if let Some(Command::Init { output }) = &cli.command {
        return handle_init(output);
    }

    // Load and validate configuration
    let config = match ValidatedConfig::load(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            print_config_hint(&e);
            return exit_code::CONFIG_ERROR;
        }
    };

    setup_tracing(config.verbose);

    let Some(runtime) = create_runtime() else {
        return exit_code::runtime_error();
    };

    let result = match cli.command {
        Some(Command::Show { json }) => runtime.block_on(run::show(&config, json)),
        Some(Command::Clear) => runtime.block_on(run::clear(&config)),
        Some(Command::Init { .. }) | None => return run_application(runtime, config),
    };

    match result {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            exit_code::runtime_error()
        }
    }
}

/// Handles the `init` subcommand.
fn handle_init(output: &std::path::Path) -> ExitCode {
    match write_default_config(output) {
        Ok(()) => {
            println!("Configuration template written to: {}", output.display());
            exit_code::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            exit_code::CONFIG_ERROR
        }
    }
}

/// Creates the multi-threaded runtime shared by every subcommand.
fn create_runtime() -> Option<tokio::runtime::Runtime> {
    match tokio::runtime::Runtime::new() {
        Ok(runtime) => Some(runtime),
        Err(e) => {
            eprintln!("Failed to create Tokio runtime: {e}");
            None
        }
    }
}

/// Runs the monitor with the given configuration.
///
/// Excluded from coverage - requires async runtime.
#[cfg(not(tarpaulin_include))]
fn run_application(runtime: tokio::runtime::Runtime, config: ValidatedConfig) -> ExitCode {
    tracing::info!("{config}");

    let result = runtime.block_on(run::execute(config));
    // A pending stdin read cannot be cancelled; don't wait for it.
    runtime.shutdown_timeout(SHUTDOWN_GRACE);

    match result {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            tracing::error!("Application error: {e}");
            exit_code::runtime_error()
        }
    }
}
