//! Monitor layer: periodic checks and change detection.
//!
//! This module provides:
//! - The bounded check interval ([`CheckInterval`])
//! - In-memory monitor state ([`MonitorState`], [`MonitorStatus`])
//! - The tick protocol ([`Scheduler`]) and its results ([`TickOutcome`], [`CheckOutcome`])
//! - A background loop with operator controls ([`Runner`], [`MonitorHandle`], [`MonitorCommand`])
//! - Events broadcast to observers ([`MonitorEvent`])

mod event;
mod interval;
mod runner;
mod scheduler;
mod state;

#[cfg(test)]
mod test_fixtures;

pub use event::{CheckOutcome, MonitorEvent, TickOutcome};
pub use interval::{CheckInterval, IntervalError};
pub use runner::{MonitorCommand, MonitorHandle, Runner};
pub use scheduler::Scheduler;
pub use state::{MonitorState, MonitorStatus};
