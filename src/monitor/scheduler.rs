//! Check scheduling and change detection.
//!
//! This module provides [`Scheduler`], which owns the [`MonitorState`]
//! and implements the tick protocol: gate on the interval, fetch the
//! address, compare it with the last observation, record changes.

use chrono::NaiveDateTime;
use tokio::time::Instant;

use crate::changelog::{ChangeLog, LogError, ObservationRecord, local_timestamp};
use crate::notify::Notifier;
use crate::provider::AddressProvider;
use crate::time::{Clock, SystemClock};

use super::{CheckInterval, CheckOutcome, MonitorState, TickOutcome};

/// Drives periodic address checks against a change log.
///
/// A tick takes `&mut self`, so checks on one scheduler can never
/// overlap. Ticks do nothing while the scheduler is stopped and do
/// nothing until the interval has elapsed since the previous check.
///
/// # Type Parameters
///
/// * `P` - The [`AddressProvider`] queried on each check
/// * `L` - The [`ChangeLog`] receiving new observations
/// * `N` - The [`Notifier`] invoked once per change
/// * `C` - The [`Clock`] used for record timestamps (defaults to [`SystemClock`])
///
/// # Example
///
/// ```ignore
/// use ipwatch::changelog::CsvChangeLog;
/// use ipwatch::monitor::{CheckInterval, Scheduler};
/// use ipwatch::notify::TerminalBell;
///
/// let mut scheduler = Scheduler::new(provider, CsvChangeLog::new("ip_log.csv"),
///     TerminalBell::new(), CheckInterval::default());
/// scheduler.start();
/// let outcome = scheduler.tick().await;
/// ```
pub struct Scheduler<P, L, N, C = SystemClock> {
    provider: P,
    log: L,
    notifier: N,
    clock: C,
    state: MonitorState,
}

impl<P, L, N> Scheduler<P, L, N, SystemClock>
where
    P: AddressProvider,
    L: ChangeLog,
    N: Notifier,
{
    /// Creates an idle scheduler using the system clock.
    #[must_use]
    pub const fn new(provider: P, log: L, notifier: N, interval: CheckInterval) -> Self {
        Self::with_clock(provider, log, notifier, SystemClock, interval)
    }
}

impl<P, L, N, C> Scheduler<P, L, N, C>
where
    P: AddressProvider,
    L: ChangeLog,
    N: Notifier,
    C: Clock,
{
    /// Creates an idle scheduler with a custom clock.
    #[must_use]
    pub const fn with_clock(
        provider: P,
        log: L,
        notifier: N,
        clock: C,
        interval: CheckInterval,
    ) -> Self {
        Self {
            provider,
            log,
            notifier,
            clock,
            state: MonitorState::new(interval),
        }
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> &MonitorState {
        &self.state
    }

    /// Returns the change log.
    #[must_use]
    pub const fn log(&self) -> &L {
        &self.log
    }

    /// Activates monitoring. Does not check by itself.
    ///
    /// Returns false if monitoring was already active.
    pub fn start(&mut self) -> bool {
        if self.state.is_enabled() {
            return false;
        }
        self.state.set_enabled(true);
        tracing::info!("Monitoring started (interval: {})", self.state.interval());
        true
    }

    /// Deactivates monitoring. Later ticks do nothing.
    ///
    /// Returns false if monitoring was already stopped.
    pub fn stop(&mut self) -> bool {
        if !self.state.is_enabled() {
            return false;
        }
        self.state.set_enabled(false);
        tracing::info!("Monitoring stopped");
        true
    }

    /// Changes the interval; takes effect for the next gating decision.
    pub fn set_interval(&mut self, interval: CheckInterval) {
        self.state.set_interval(interval);
        tracing::info!("Check interval set to {interval}");
    }

    /// Deletes every record from the change log.
    ///
    /// The last observed address is kept, so an unchanged address is not
    /// re-recorded after a clear.
    ///
    /// # Errors
    ///
    /// Returns [`LogError`] if the log could not be cleared.
    pub async fn clear_log(&self) -> Result<(), LogError> {
        self.log.clear().await?;
        tracing::info!("Change log cleared");
        Ok(())
    }

    /// Evaluates the tick protocol once.
    ///
    /// Runs a check only if monitoring is active and the interval has
    /// elapsed since the previous check (or no check ran yet).
    pub async fn tick(&mut self) -> TickOutcome {
        if !self.state.is_enabled() {
            return TickOutcome::Idle;
        }

        let remaining = self.state.remaining(Instant::now());
        if !remaining.is_zero() {
            return TickOutcome::NotDue { remaining };
        }

        TickOutcome::Checked(self.check().await)
    }

    /// Evaluates the tick protocol once, ignoring the interval.
    ///
    /// This is the manual refresh: it still does nothing while stopped.
    pub async fn refresh(&mut self) -> TickOutcome {
        if !self.state.is_enabled() {
            return TickOutcome::Idle;
        }
        TickOutcome::Checked(self.check().await)
    }

    /// Performs one check and records its time, whatever the result.
    async fn check(&mut self) -> CheckOutcome {
        let fetched = self.provider.fetch().await;
        let at = Instant::now();
        let timestamp = local_timestamp(self.clock.now());

        let outcome = match fetched {
            Ok(address) => self.observe(address, timestamp).await,
            Err(e) => {
                tracing::warn!("Failed to fetch external IP: {e}");
                CheckOutcome::FetchFailed {
                    reason: e.to_string(),
                    timestamp,
                }
            }
        };

        self.state.record_check(at, timestamp);
        outcome
    }

    /// Compares a fetched address with the last observation.
    async fn observe(&mut self, address: String, timestamp: NaiveDateTime) -> CheckOutcome {
        if self.state.last_address() == Some(address.as_str()) {
            tracing::debug!("External IP unchanged: {address}");
            return CheckOutcome::Unchanged { address, timestamp };
        }

        let record = ObservationRecord::new(timestamp, address);
        if let Err(e) = self.log.append(&record).await {
            tracing::error!("Failed to record IP change to {}: {e}", record.address);
            return CheckOutcome::LogFailed {
                address: record.address,
                reason: e.to_string(),
                timestamp,
            };
        }

        let previous = self.state.replace_address(record.address.clone());
        tracing::info!(
            "External IP changed: {} -> {}",
            previous.as_deref().unwrap_or("none"),
            record.address
        );

        if let Err(e) = self.notifier.notify(&record, previous.as_deref()) {
            tracing::warn!("Change notification failed: {e}");
        }

        CheckOutcome::Changed {
            address: record.address,
            previous,
            timestamp,
        }
    }
}

impl<P, L, N, C> std::fmt::Debug for Scheduler<P, L, N, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
