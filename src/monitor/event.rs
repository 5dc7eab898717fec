//! Observable results of ticks and operator commands.

use std::time::Duration;

use chrono::NaiveDateTime;

use super::CheckInterval;

/// Result of a single check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// A new address was observed and written to the change log.
    Changed {
        /// The new address
        address: String,
        /// The address it replaced, `None` on the first observation
        previous: Option<String>,
        /// When the check ran
        timestamp: NaiveDateTime,
    },

    /// The address matches the previous observation; nothing was written.
    Unchanged {
        /// The observed address
        address: String,
        /// When the check ran
        timestamp: NaiveDateTime,
    },

    /// The address could not be fetched.
    FetchFailed {
        /// Rendered fetch error
        reason: String,
        /// When the check ran
        timestamp: NaiveDateTime,
    },

    /// A new address was observed but could not be written.
    ///
    /// The address is not adopted, so the next check retries the write.
    LogFailed {
        /// The address that was not recorded
        address: String,
        /// Rendered log error
        reason: String,
        /// When the check ran
        timestamp: NaiveDateTime,
    },
}

impl CheckOutcome {
    /// Returns the time the check ran.
    #[must_use]
    pub const fn timestamp(&self) -> NaiveDateTime {
        match self {
            Self::Changed { timestamp, .. }
            | Self::Unchanged { timestamp, .. }
            | Self::FetchFailed { timestamp, .. }
            | Self::LogFailed { timestamp, .. } => *timestamp,
        }
    }

    /// Returns true if a record was appended.
    #[must_use]
    pub const fn is_changed(&self) -> bool {
        matches!(self, Self::Changed { .. })
    }

    /// Returns true if the check failed for any reason.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::FetchFailed { .. } | Self::LogFailed { .. })
    }
}

/// Result of one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Monitoring is stopped; nothing happened.
    Idle,

    /// The interval has not elapsed yet; nothing happened.
    NotDue {
        /// Time left until the next check is due
        remaining: Duration,
    },

    /// A check ran.
    Checked(CheckOutcome),
}

impl TickOutcome {
    /// Returns the check outcome if a check ran.
    #[must_use]
    pub const fn check(&self) -> Option<&CheckOutcome> {
        match self {
            Self::Checked(outcome) => Some(outcome),
            Self::Idle | Self::NotDue { .. } => None,
        }
    }
}

/// Event broadcast by a [`super::Runner`] to its subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorEvent {
    /// Monitoring was started.
    Started {
        /// Active interval
        interval: CheckInterval,
    },

    /// Monitoring was stopped.
    Stopped,

    /// A check ran.
    Check(CheckOutcome),

    /// The interval was changed.
    IntervalChanged {
        /// New interval
        interval: CheckInterval,
    },

    /// A requested interval was out of range and ignored.
    IntervalRejected {
        /// Rendered validation error
        reason: String,
    },

    /// The change log was cleared.
    Cleared,

    /// Clearing the change log failed.
    ClearFailed {
        /// Rendered log error
        reason: String,
    },
}
