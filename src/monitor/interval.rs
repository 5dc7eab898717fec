//! Bounded check interval.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Rejected interval value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error(
    "Check interval {secs}s is out of range ({min}..={max}s)",
    min = CheckInterval::MIN_SECS,
    max = CheckInterval::MAX_SECS
)]
pub struct IntervalError {
    /// The rejected value in seconds
    pub secs: u64,
}

/// Minimum time between two effective checks, in whole seconds.
///
/// Always within [`MIN_SECS`](Self::MIN_SECS)..=[`MAX_SECS`](Self::MAX_SECS).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CheckInterval(u64);

impl CheckInterval {
    /// Shortest accepted interval.
    pub const MIN_SECS: u64 = 10;

    /// Longest accepted interval.
    pub const MAX_SECS: u64 = 3600;

    /// Interval used when nothing is configured.
    pub const DEFAULT_SECS: u64 = 60;

    /// Increment used by [`step_up`](Self::step_up) and [`step_down`](Self::step_down).
    pub const STEP_SECS: u64 = 10;

    /// Creates an interval, rejecting values outside the accepted range.
    ///
    /// # Errors
    ///
    /// Returns [`IntervalError`] if `secs` is below 10 or above 3600.
    pub const fn from_secs(secs: u64) -> Result<Self, IntervalError> {
        if secs < Self::MIN_SECS || secs > Self::MAX_SECS {
            return Err(IntervalError { secs });
        }
        Ok(Self(secs))
    }

    /// Returns the interval in seconds.
    #[must_use]
    pub const fn as_secs(self) -> u64 {
        self.0
    }

    /// Returns the interval as a [`Duration`].
    #[must_use]
    pub const fn as_duration(self) -> Duration {
        Duration::from_secs(self.0)
    }

    /// Returns the interval one step longer, capped at the maximum.
    #[must_use]
    pub const fn step_up(self) -> Self {
        let next = self.0.saturating_add(Self::STEP_SECS);
        if next > Self::MAX_SECS {
            Self(Self::MAX_SECS)
        } else {
            Self(next)
        }
    }

    /// Returns the interval one step shorter, floored at the minimum.
    #[must_use]
    pub const fn step_down(self) -> Self {
        let next = self.0.saturating_sub(Self::STEP_SECS);
        if next < Self::MIN_SECS {
            Self(Self::MIN_SECS)
        } else {
            Self(next)
        }
    }
}

impl Default for CheckInterval {
    fn default() -> Self {
        Self(Self::DEFAULT_SECS)
    }
}

impl fmt::Display for CheckInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

impl TryFrom<u64> for CheckInterval {
    type Error = IntervalError;

    fn try_from(secs: u64) -> Result<Self, Self::Error> {
        Self::from_secs(secs)
    }
}
