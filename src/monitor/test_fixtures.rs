//! Shared mocks for scheduler and runner tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::changelog::ObservationRecord;
use crate::changelog::mock::MockChangeLog;
use crate::notify::{Notifier, NotifyError};
use crate::provider::{AddressProvider, FetchError};
use crate::time::mock::MockClock;

use super::{CheckInterval, Scheduler};

/// Scripted provider result; `FetchError` is not `Clone`, so failures are
/// described and built on demand.
#[derive(Debug, Clone)]
pub enum Step {
    Address(&'static str),
    Fail,
}

/// Provider replaying a script, then repeating its fallback.
///
/// Clones share the script and the call counter.
#[derive(Debug, Clone, Default)]
pub struct ScriptedProvider {
    steps: Arc<Mutex<VecDeque<Step>>>,
    fallback: Option<&'static str>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedProvider {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: Arc::new(Mutex::new(steps.into_iter().collect())),
            ..Self::default()
        }
    }

    pub fn addresses(addresses: &[&'static str]) -> Self {
        Self::new(addresses.iter().copied().map(Step::Address))
    }

    pub fn always(address: &'static str) -> Self {
        Self {
            fallback: Some(address),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl AddressProvider for ScriptedProvider {
    async fn fetch(&self) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let step = self.steps.lock().unwrap().pop_front();
        match step {
            Some(Step::Address(address)) => Ok(address.to_string()),
            Some(Step::Fail) => Err(FetchError::EmptyResponse),
            None => self
                .fallback
                .map(str::to_string)
                .ok_or(FetchError::EmptyResponse),
        }
    }
}

/// Notifier recording every call; can be told to fail.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    calls: Arc<Mutex<Vec<(String, Option<String>)>>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<(String, Option<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(
        &self,
        current: &ObservationRecord,
        previous: Option<&str>,
    ) -> Result<(), NotifyError> {
        self.calls
            .lock()
            .unwrap()
            .push((current.address.clone(), previous.map(str::to_string)));
        if self.fail {
            return Err(std::io::Error::other("no audio device").into());
        }
        Ok(())
    }
}

pub type TestScheduler =
    Scheduler<ScriptedProvider, Arc<MockChangeLog>, RecordingNotifier, MockClock>;

/// Handles kept by a test after the scheduler takes ownership of its parts.
pub struct Parts {
    pub provider: ScriptedProvider,
    pub log: Arc<MockChangeLog>,
    pub notifier: RecordingNotifier,
    pub clock: MockClock,
}

pub fn scheduler_with(
    provider: ScriptedProvider,
    notifier: RecordingNotifier,
    interval_secs: u64,
) -> (TestScheduler, Parts) {
    let log = Arc::new(MockChangeLog::new());
    let clock = MockClock::new(1_704_110_400);
    let scheduler = Scheduler::with_clock(
        provider.clone(),
        Arc::clone(&log),
        notifier.clone(),
        clock.clone(),
        CheckInterval::from_secs(interval_secs).unwrap(),
    );
    let parts = Parts {
        provider,
        log,
        notifier,
        clock,
    };
    (scheduler, parts)
}

pub fn scheduler(provider: ScriptedProvider) -> (TestScheduler, Parts) {
    scheduler_with(provider, RecordingNotifier::default(), 60)
}

pub fn addresses_of(records: &[ObservationRecord]) -> Vec<&str> {
    records.iter().map(|r| r.address.as_str()).collect()
}
