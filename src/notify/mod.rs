//! Notification hooks fired when the external address changes.
//!
//! This module provides:
//! - The hook abstraction ([`Notifier`])
//! - An audible terminal bell ([`TerminalBell`])
//! - A log-line notifier ([`TracingNotifier`])
//! - Fan-out over several hooks ([`Notifiers`])
//!
//! The monitor calls the hook once per detected change and only logs a
//! failure; a broken hook never affects the change log or monitor state.

mod bell;


pub use bell::TerminalBell;

use std::io;

use thiserror::Error;

use crate::changelog::ObservationRecord;

/// Error type for notification delivery.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Writing the notification failed.
    #[error("Failed to deliver notification: {0}")]
    Io(#[from] io::Error),

    /// One or more hooks of a [`Notifiers`] set failed.
    #[error("{failed} of {total} notifiers failed: {first}")]
    Partial {
        /// Number of failed hooks
        failed: usize,
        /// Number of hooks invoked
        total: usize,
        /// The first failure, rendered
        first: String,
    },
}

/// Hook invoked when a new address is recorded.
pub trait Notifier: Send + Sync {
    /// Announces that `current` replaced `previous`.
    ///
    /// `previous` is `None` for the first observation of a session.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] if the notification could not be delivered.
    fn notify(
        &self,
        current: &ObservationRecord,
        previous: Option<&str>,
    ) -> Result<(), NotifyError>;
}

/// Notifier that emits a warning-level log line.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(
        &self,
        current: &ObservationRecord,
        previous: Option<&str>,
    ) -> Result<(), NotifyError> {
        match previous {
            Some(previous) => tracing::warn!(
                "External IP changed: {previous} -> {address} ({timestamp})",
                address = current.address,
                timestamp = current.formatted_timestamp(),
            ),
            None => tracing::warn!(
                "External IP is {address} ({timestamp})",
                address = current.address,
                timestamp = current.formatted_timestamp(),
            ),
        }
        Ok(())
    }
}

/// A set of notifiers invoked in order.
///
/// Every hook is called even if an earlier one fails.
#[derive(Default)]
pub struct Notifiers {
    hooks: Vec<Box<dyn Notifier>>,
}

impl Notifiers {
    /// Creates an empty set; notifying it does nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a hook to the set.
    #[must_use]
    pub fn with(mut self, hook: impl Notifier + 'static) -> Self {
        self.hooks.push(Box::new(hook));
        self
    }

    /// Returns the number of hooks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Returns true if no hooks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl std::fmt::Debug for Notifiers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifiers")
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

impl Notifier for Notifiers {
    fn notify(
        &self,
        current: &ObservationRecord,
        previous: Option<&str>,
    ) -> Result<(), NotifyError> {
        let errors: Vec<NotifyError> = self
            .hooks
            .iter()
            .filter_map(|hook| hook.notify(current, previous).err())
            .collect();

        match errors.first() {
            None => Ok(()),
            Some(first) => Err(NotifyError::Partial {
                failed: errors.len(),
                total: self.hooks.len(),
                first: first.to_string(),
            }),
        }
    }
}
