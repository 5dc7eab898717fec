//! Application execution logic.
//!
//! This module wires the monitor to its production parts, reads operator
//! commands from stdin and prints check results until shutdown.

use std::sync::Arc;

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::LinesStream;

use ipwatch::changelog::{ChangeLog, CsvChangeLog, LogError, TIMESTAMP_FORMAT};
use ipwatch::config::ValidatedConfig;
use ipwatch::monitor::{
    CheckInterval, CheckOutcome, MonitorCommand, MonitorEvent, MonitorHandle, MonitorStatus,
    Runner, Scheduler,
};
use ipwatch::notify::{Notifiers, TerminalBell, TracingNotifier};
use ipwatch::provider::HttpAddressProvider;
use ipwatch::transport::ReqwestClient;

use crate::report::Report;

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// The change log could not be read or cleared.
    #[error(transparent)]
    Log(#[from] LogError),

    /// The JSON report could not be rendered.
    #[error("Failed to render report: {0}")]
    Report(#[from] serde_json::Error),
}

/// Operator command typed on stdin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConsoleCommand {
    /// Forwarded to the runner as is.
    Monitor(MonitorCommand),
    /// Shorten the interval by one step.
    Faster,
    /// Lengthen the interval by one step.
    Slower,
    /// Print the change log.
    Show,
    /// Print the monitor status.
    Status,
    /// Print the command list.
    Help,
}

/// Rejected console input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
enum ParseCommandError {
    #[error("Unknown command '{0}', type 'help' for a list")]
    Unknown(String),

    #[error("Usage: interval <seconds>")]
    MissingSeconds,

    #[error("Invalid interval '{0}': expected whole seconds")]
    InvalidSeconds(String),
}

const HELP: &str = "\
Commands:
  start            start monitoring
  stop             stop monitoring
  refresh          check now
  interval <secs>  set the check interval (10-3600)
  faster, slower   change the interval by 10s
  show             print the change log
  status           print the monitor status
  clear            delete the change log
  quit             exit";

/// Runs the monitor until a shutdown signal or a `quit` command.
///
/// This function:
/// 1. Opens the change log and reports how many records it holds
/// 2. Builds the scheduler from the provider, log and notification hooks
/// 3. Starts monitoring unless configured paused
/// 4. Reads commands from stdin and prints every check result
///
/// # Errors
///
/// Returns an error if the existing change log cannot be read.
///
/// # Coverage Note
///
/// This function is excluded from coverage because it requires:
/// - Network access to the lookup service
/// - Real async runtime with signal handling and stdin
#[cfg(not(tarpaulin_include))]
pub async fn execute(config: ValidatedConfig) -> Result<(), RunError> {
    let log = Arc::new(CsvChangeLog::new(config.log_file.clone()));
    let existing = log.read_all().await?;
    tracing::info!(
        "Change log: {} ({} record(s))",
        log.path().display(),
        existing.len()
    );

    let provider = HttpAddressProvider::new(ReqwestClient::new(), config.provider_url.clone());
    let scheduler = Scheduler::new(
        provider,
        Arc::clone(&log),
        create_notifier(config.bell),
        config.interval,
    );
    let (runner, handle) = Runner::new(scheduler);

    let printer = tokio::spawn(print_events(handle.subscribe()));

    if config.paused {
        tracing::info!("Monitoring paused, type 'start' to begin");
    } else {
        handle.start().await;
    }
    println!("Type 'help' for a list of commands.");

    let controller = tokio::spawn(control_from_stdin(handle, log));

    runner.run(shutdown_signal()).await;
    tracing::info!("Shutting down");

    controller.abort();
    printer.abort();
    Ok(())
}

/// Prints the change log, most recent first, with the per-address table.
///
/// # Errors
///
/// Returns an error if the log cannot be read.
pub async fn show(config: &ValidatedConfig, json: bool) -> Result<(), RunError> {
    let log = CsvChangeLog::new(config.log_file.clone());
    print!("{}", render_log(&log, json).await?);
    Ok(())
}

/// Deletes the change log.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be removed.
pub async fn clear(config: &ValidatedConfig) -> Result<(), RunError> {
    let log = CsvChangeLog::new(config.log_file.clone());
    log.clear().await?;
    println!("Change log cleared: {}", log.path().display());
    Ok(())
}

async fn render_log(log: &impl ChangeLog, json: bool) -> Result<String, RunError> {
    let report = Report::new(&log.read_all().await?);
    if json {
        Ok(format!("{}\n", report.to_json()?))
    } else {
        Ok(report.to_text())
    }
}

/// Creates the change notification hooks from configuration.
fn create_notifier(bell: bool) -> Notifiers {
    let notifiers = Notifiers::new().with(TracingNotifier);
    if bell {
        notifiers.with(TerminalBell::new())
    } else {
        notifiers
    }
}

/// Feeds stdin lines to the runner until stdin closes or `quit`.
///
/// Closing stdin does not stop monitoring.
#[cfg(not(tarpaulin_include))]
async fn control_from_stdin(handle: MonitorHandle, log: Arc<CsvChangeLog>) {
    let mut lines = LinesStream::new(BufReader::new(tokio::io::stdin()).lines());

    while let Some(line) = lines.next().await {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!("Failed to read stdin: {e}");
                break;
            }
        };

        match parse_command(&line) {
            Ok(Some(command)) => {
                if !dispatch(command, &handle, log.as_ref()).await {
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => println!("{e}"),
        }
    }

    tracing::debug!("Console input closed");
}

/// Executes one console command. Returns false once the runner is gone.
async fn dispatch(command: ConsoleCommand, handle: &MonitorHandle, log: &impl ChangeLog) -> bool {
    match command {
        ConsoleCommand::Monitor(command) => handle.send(command).await,
        ConsoleCommand::Faster => {
            let interval = current_interval(&handle.status()).step_down();
            handle.set_interval(interval.as_secs()).await
        }
        ConsoleCommand::Slower => {
            let interval = current_interval(&handle.status()).step_up();
            handle.set_interval(interval.as_secs()).await
        }
        ConsoleCommand::Show => {
            match render_log(log, false).await {
                Ok(text) => print!("{text}"),
                Err(e) => tracing::error!("{e}"),
            }
            true
        }
        ConsoleCommand::Status => {
            println!("{}", describe_status(&handle.status()));
            true
        }
        ConsoleCommand::Help => {
            println!("{HELP}");
            true
        }
    }
}

fn current_interval(status: &MonitorStatus) -> CheckInterval {
    CheckInterval::from_secs(status.interval_secs).unwrap_or_default()
}

/// Parses one console line. Blank lines yield `None`.
fn parse_command(line: &str) -> Result<Option<ConsoleCommand>, ParseCommandError> {
    let mut words = line.split_whitespace();
    let Some(word) = words.next() else {
        return Ok(None);
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "start" => ConsoleCommand::Monitor(MonitorCommand::Start),
        "stop" => ConsoleCommand::Monitor(MonitorCommand::Stop),
        "refresh" => ConsoleCommand::Monitor(MonitorCommand::Refresh),
        "clear" => ConsoleCommand::Monitor(MonitorCommand::Clear),
        "quit" | "exit" => ConsoleCommand::Monitor(MonitorCommand::Shutdown),
        "interval" => {
            let secs = words.next().ok_or(ParseCommandError::MissingSeconds)?;
            let secs = secs
                .parse()
                .map_err(|_| ParseCommandError::InvalidSeconds(secs.to_string()))?;
            ConsoleCommand::Monitor(MonitorCommand::SetInterval(secs))
        }
        "faster" => ConsoleCommand::Faster,
        "slower" => ConsoleCommand::Slower,
        "show" => ConsoleCommand::Show,
        "status" => ConsoleCommand::Status,
        "help" | "?" => ConsoleCommand::Help,
        _ => return Err(ParseCommandError::Unknown(word.to_string())),
    };

    Ok(Some(command))
}

/// Prints check results as they are published.
#[cfg(not(tarpaulin_include))]
async fn print_events(mut events: broadcast::Receiver<MonitorEvent>) {
    loop {
        match events.recv().await {
            Ok(MonitorEvent::Check(outcome)) => println!("{}", describe_check(&outcome)),
            Ok(_) => {}
            Err(RecvError::Lagged(skipped)) => {
                tracing::debug!("Skipped {skipped} monitor event(s)");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

/// Renders a check result as one line for the terminal.
fn describe_check(outcome: &CheckOutcome) -> String {
    let at = outcome.timestamp().format(TIMESTAMP_FORMAT);
    match outcome {
        CheckOutcome::Changed {
            address,
            previous: Some(previous),
            ..
        } => format!("[{at}] IP changed: {previous} -> {address}"),
        CheckOutcome::Changed {
            address,
            previous: None,
            ..
        } => format!("[{at}] Current IP: {address}"),
        CheckOutcome::Unchanged { address, .. } => format!("[{at}] IP unchanged: {address}"),
        CheckOutcome::FetchFailed { reason, .. } => format!("[{at}] Could not fetch IP: {reason}"),
        CheckOutcome::LogFailed {
            address, reason, ..
        } => format!("[{at}] IP changed to {address} but was not recorded: {reason}"),
    }
}

/// Renders the monitor status as one line.
fn describe_status(status: &MonitorStatus) -> String {
    let state = if status.enabled { "active" } else { "stopped" };
    let address = status.last_address.as_deref().unwrap_or("unknown");
    let checked = status.last_checked.map_or_else(
        || "never".to_string(),
        |at| at.format(TIMESTAMP_FORMAT).to_string(),
    );

    format!(
        "Monitoring {state}, every {}s; last IP: {address}; last check: {checked}",
        status.interval_secs
    )
}

/// Returns a future that completes when a shutdown signal is received.
///
/// A handler that cannot be installed is logged and never fires.
///
/// Excluded from coverage - requires OS signal handling.
#[cfg(not(tarpaulin_include))]
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
