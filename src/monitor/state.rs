//! In-memory monitor state.

use chrono::NaiveDateTime;
use std::time::Duration;
use tokio::time::Instant;

use super::CheckInterval;

/// When the last check ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LastCheck {
    /// Monotonic time, used for interval gating.
    at: Instant,
    /// Local wall-clock time, used for display.
    wall: NaiveDateTime,
}

/// State owned by a [`super::Scheduler`].
///
/// Lives only for the process; after a restart the first successful
/// check is treated as a change. Only the scheduler mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorState {
    last_address: Option<String>,
    last_check: Option<LastCheck>,
    enabled: bool,
    interval: CheckInterval,
}

impl MonitorState {
    /// Creates an idle, never-checked state.
    #[must_use]
    pub const fn new(interval: CheckInterval) -> Self {
        Self {
            last_address: None,
            last_check: None,
            enabled: false,
            interval,
        }
    }

    /// Returns the most recently observed address, if any.
    #[must_use]
    pub fn last_address(&self) -> Option<&str> {
        self.last_address.as_deref()
    }

    /// Returns the monotonic time of the last check, if any.
    #[must_use]
    pub fn last_check_at(&self) -> Option<Instant> {
        self.last_check.map(|c| c.at)
    }

    /// Returns the wall-clock time of the last check, if any.
    #[must_use]
    pub fn last_checked(&self) -> Option<NaiveDateTime> {
        self.last_check.map(|c| c.wall)
    }

    /// Returns true while monitoring is active.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the configured interval.
    #[must_use]
    pub const fn interval(&self) -> CheckInterval {
        self.interval
    }

    /// Returns true if the interval has elapsed since the last check.
    ///
    /// A state that was never checked is always due. The enabled flag is
    /// not consulted.
    #[must_use]
    pub fn is_due(&self, now: Instant) -> bool {
        self.remaining(now).is_zero()
    }

    /// Returns how long until the next check is due, zero if it already is.
    #[must_use]
    pub fn remaining(&self, now: Instant) -> Duration {
        self.last_check.map_or(Duration::ZERO, |c| {
            self.interval
                .as_duration()
                .saturating_sub(now.saturating_duration_since(c.at))
        })
    }

    /// Returns when the next check is due, or `None` while idle.
    #[must_use]
    pub fn next_due(&self) -> Option<Instant> {
        if !self.enabled {
            return None;
        }
        Some(
            self.last_check
                .map_or_else(Instant::now, |c| c.at + self.interval.as_duration()),
        )
    }

    /// Returns a cloneable snapshot for display.
    #[must_use]
    pub fn status(&self) -> MonitorStatus {
        MonitorStatus {
            enabled: self.enabled,
            interval_secs: self.interval.as_secs(),
            last_address: self.last_address.clone(),
            last_checked: self.last_checked(),
        }
    }

    pub(super) const fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub(super) const fn set_interval(&mut self, interval: CheckInterval) {
        self.interval = interval;
    }

    pub(super) const fn record_check(&mut self, at: Instant, wall: NaiveDateTime) {
        self.last_check = Some(LastCheck { at, wall });
    }

    /// Stores `address` and returns the address it replaced.
    pub(super) fn replace_address(&mut self, address: String) -> Option<String> {
        self.last_address.replace(address)
    }
}

impl Default for MonitorState {
    fn default() -> Self {
        Self::new(CheckInterval::default())
    }
}

/// Display snapshot of a [`MonitorState`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorStatus {
    /// Whether monitoring is active.
    pub enabled: bool,
    /// Configured interval in seconds.
    pub interval_secs: u64,
    /// Most recently observed address.
    pub last_address: Option<String>,
    /// Local time of the last check.
    pub last_checked: Option<NaiveDateTime>,
}
