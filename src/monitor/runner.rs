//! Background loop around a [`Scheduler`].
//!
//! This module provides:
//! - [`Runner`]: owns the scheduler and sleeps until the next check is due
//! - [`MonitorHandle`]: cloneable control surface for operator commands
//! - [`MonitorCommand`]: the commands a handle can send

use std::future::{Future, pending};

use tokio::sync::{broadcast, mpsc, watch};
use tokio::time::sleep_until;

use crate::changelog::ChangeLog;
use crate::notify::Notifier;
use crate::provider::AddressProvider;
use crate::time::Clock;

use super::{CheckInterval, MonitorEvent, MonitorStatus, Scheduler, TickOutcome};

/// Pending commands a handle may queue before the runner catches up.
const COMMAND_BUFFER: usize = 16;

/// Events kept for slow subscribers before they start lagging.
const EVENT_BUFFER: usize = 64;

/// Operator command sent to a [`Runner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorCommand {
    /// Activate monitoring.
    Start,
    /// Deactivate monitoring.
    Stop,
    /// Check now, ignoring the interval.
    Refresh,
    /// Delete the change log.
    Clear,
    /// Change the interval, in seconds.
    SetInterval(u64),
    /// Leave the loop.
    Shutdown,
}

/// Runs a [`Scheduler`] as a long-lived task.
///
/// While monitoring is active the loop sleeps until the next check is
/// due, then ticks. Commands are applied between checks; a `Stop`
/// received during the sleep cancels the pending check. A check that is
/// already fetching runs to completion before the next command is read.
pub struct Runner<P, L, N, C> {
    scheduler: Scheduler<P, L, N, C>,
    commands: mpsc::Receiver<MonitorCommand>,
    events: broadcast::Sender<MonitorEvent>,
    status: watch::Sender<MonitorStatus>,
}

/// Cloneable control surface of a running [`Runner`].
#[derive(Debug, Clone)]
pub struct MonitorHandle {
    commands: mpsc::Sender<MonitorCommand>,
    events: broadcast::Sender<MonitorEvent>,
    status: watch::Receiver<MonitorStatus>,
}

impl<P, L, N, C> Runner<P, L, N, C>
where
    P: AddressProvider,
    L: ChangeLog,
    N: Notifier,
    C: Clock,
{
    /// Wraps a scheduler and returns the runner with its handle.
    #[must_use]
    pub fn new(scheduler: Scheduler<P, L, N, C>) -> (Self, MonitorHandle) {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (event_tx, _) = broadcast::channel(EVENT_BUFFER);
        let (status_tx, status_rx) = watch::channel(scheduler.state().status());

        let runner = Self {
            scheduler,
            commands: command_rx,
            events: event_tx.clone(),
            status: status_tx,
        };
        let handle = MonitorHandle {
            commands: command_tx,
            events: event_tx,
            status: status_rx,
        };
        (runner, handle)
    }

    /// Runs until `shutdown` completes or a [`MonitorCommand::Shutdown`]
    /// arrives, then returns the scheduler.
    ///
    /// Dropping every handle does not end the loop; monitoring continues
    /// with the last applied settings until `shutdown`.
    pub async fn run(mut self, shutdown: impl Future<Output = ()>) -> Scheduler<P, L, N, C> {
        tokio::pin!(shutdown);
        let mut commands_open = true;

        loop {
            let next_due = self.scheduler.state().next_due();
            let due = async {
                match next_due {
                    Some(at) => sleep_until(at).await,
                    None => pending().await,
                }
            };

            tokio::select! {
                biased;

                () = &mut shutdown => break,

                command = self.commands.recv(), if commands_open => {
                    match command {
                        Some(MonitorCommand::Shutdown) => break,
                        Some(command) => self.apply(command).await,
                        None => {
                            tracing::debug!("All monitor handles dropped");
                            commands_open = false;
                        }
                    }
                }

                () = due => {
                    let outcome = self.scheduler.tick().await;
                    self.publish_tick(outcome);
                }
            }
        }

        tracing::debug!("Monitor loop finished");
        self.scheduler
    }

    async fn apply(&mut self, command: MonitorCommand) {
        match command {
            MonitorCommand::Start => {
                if self.scheduler.start() {
                    let interval = self.scheduler.state().interval();
                    self.publish(MonitorEvent::Started { interval });
                }
            }
            MonitorCommand::Stop => {
                if self.scheduler.stop() {
                    self.publish(MonitorEvent::Stopped);
                }
            }
            MonitorCommand::Refresh => {
                let outcome = self.scheduler.refresh().await;
                self.publish_tick(outcome);
            }
            MonitorCommand::Clear => match self.scheduler.clear_log().await {
                Ok(()) => self.publish(MonitorEvent::Cleared),
                Err(e) => {
                    tracing::error!("{e}");
                    self.publish(MonitorEvent::ClearFailed {
                        reason: e.to_string(),
                    });
                }
            },
            MonitorCommand::SetInterval(secs) => match CheckInterval::from_secs(secs) {
                Ok(interval) => {
                    self.scheduler.set_interval(interval);
                    self.publish(MonitorEvent::IntervalChanged { interval });
                }
                Err(e) => {
                    tracing::warn!("Ignoring interval change: {e}");
                    self.publish(MonitorEvent::IntervalRejected {
                        reason: e.to_string(),
                    });
                }
            },
            MonitorCommand::Shutdown => {}
        }
        self.status.send_replace(self.scheduler.state().status());
    }

    fn publish_tick(&self, outcome: TickOutcome) {
        if let TickOutcome::Checked(check) = outcome {
            self.publish(MonitorEvent::Check(check));
            self.status.send_replace(self.scheduler.state().status());
        }
    }

    /// Having no subscribers is not an error.
    fn publish(&self, event: MonitorEvent) {
        let _ = self.events.send(event);
    }
}

impl MonitorHandle {
    /// Sends a command to the runner.
    ///
    /// Returns false if the runner has already stopped.
    pub async fn send(&self, command: MonitorCommand) -> bool {
        self.commands.send(command).await.is_ok()
    }

    /// Activates monitoring.
    pub async fn start(&self) -> bool {
        self.send(MonitorCommand::Start).await
    }

    /// Deactivates monitoring.
    pub async fn stop(&self) -> bool {
        self.send(MonitorCommand::Stop).await
    }

    /// Requests an immediate check.
    pub async fn refresh(&self) -> bool {
        self.send(MonitorCommand::Refresh).await
    }

    /// Requests the change log be cleared.
    pub async fn clear(&self) -> bool {
        self.send(MonitorCommand::Clear).await
    }

    /// Requests a new interval; out-of-range values are rejected by the runner.
    pub async fn set_interval(&self, secs: u64) -> bool {
        self.send(MonitorCommand::SetInterval(secs)).await
    }

    /// Asks the runner to leave its loop.
    pub async fn shutdown(&self) -> bool {
        self.send(MonitorCommand::Shutdown).await
    }

    /// Subscribes to events published after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<MonitorEvent> {
        self.events.subscribe()
    }

    /// Returns the latest published status.
    #[must_use]
    pub fn status(&self) -> MonitorStatus {
        self.status.borrow().clone()
    }
}
