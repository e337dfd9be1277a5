//! Mock implementations for testing
//!
//! [`MockRegisters`] implements [`RegisterInterface`] and journals every
//! write with a virtual timestamp. [`MockDelay`] implements
//! [`DelayNs`](embedded_hal_async::delay::DelayNs) by advancing the same
//! [`VirtualClock`], so tests can check settle times without sleeping.
//!
//! Both mocks are cheap handles over shared state: clone one before moving it
//! into the code under test and inspect the clone afterwards.

#![cfg(any(test, feature = "std"))]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::vec::Vec;

use crate::clock::{DomainId, FieldId, RegisterField};
use crate::register::{HardwareError, RegisterInterface, RegisterValue};

/// Shared virtual time base in nanoseconds.
#[derive(Debug, Clone, Default)]
pub struct VirtualClock(Arc<AtomicU64>);

impl VirtualClock {
    /// Create a clock at t = 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time in microseconds.
    pub fn now_us(&self) -> u64 {
        self.0.load(Ordering::SeqCst) / 1_000
    }

    fn advance_ns(&self, ns: u64) {
        self.0.fetch_add(ns, Ordering::SeqCst);
    }
}

/// One attempted register write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JournalEntry {
    /// Target register field
    pub target: RegisterField,
    /// Value written
    pub value: RegisterValue,
    /// Virtual time of the write, in microseconds
    pub at_us: u64,
    /// `false` if the write was rejected by an injected failure
    pub accepted: bool,
}

#[derive(Debug, Clone, Copy)]
enum FailRule {
    /// Reject the nth write (0-based, counted over all writes)
    Nth(usize, HardwareError),
    /// Reject every write to this field
    Field(RegisterField, HardwareError),
}

#[derive(Debug, Default)]
struct MockState {
    journal: Vec<JournalEntry>,
    rules: Vec<FailRule>,
}

/// Mock codec register file — records all writes for test assertions.
#[derive(Debug, Clone)]
pub struct MockRegisters {
    state: Arc<Mutex<MockState>>,
    clock: VirtualClock,
}

impl MockRegisters {
    /// Create a mock with its own virtual clock.
    pub fn new() -> Self {
        Self::with_clock(VirtualClock::new())
    }

    /// Create a mock that timestamps writes on `clock`.
    pub fn with_clock(clock: VirtualClock) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState::default())),
            clock,
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The virtual clock writes are stamped with.
    pub fn clock(&self) -> &VirtualClock {
        &self.clock
    }

    /// Reject the `nth` write from now on (0-based over the whole journal).
    pub fn fail_nth_write(&self, nth: usize, error: HardwareError) {
        self.lock().rules.push(FailRule::Nth(nth, error));
    }

    /// Reject every write to `target`.
    pub fn fail_field(&self, target: RegisterField, error: HardwareError) {
        self.lock().rules.push(FailRule::Field(target, error));
    }

    /// Remove all injected failures.
    pub fn clear_failures(&self) {
        self.lock().rules.clear();
    }

    /// Snapshot of every attempted write, oldest first.
    pub fn journal(&self) -> Vec<JournalEntry> {
        self.lock().journal.clone()
    }

    /// Number of attempted writes.
    pub fn write_count(&self) -> usize {
        self.lock().journal.len()
    }

    /// Attempted writes to `target`, oldest first.
    pub fn writes_to(&self, target: RegisterField) -> Vec<JournalEntry> {
        self.lock()
            .journal
            .iter()
            .filter(|e| e.target == target)
            .copied()
            .collect()
    }

    /// Forget all recorded writes.
    pub fn clear_journal(&self) {
        self.lock().journal.clear();
    }
}

impl Default for MockRegisters {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterInterface for MockRegisters {
    type Error = HardwareError;

    async fn write(
        &mut self,
        domain: DomainId,
        field: FieldId,
        value: RegisterValue,
    ) -> Result<(), Self::Error> {
        // Give concurrent callers a chance to run mid-sequence.
        embassy_futures::yield_now().await;

        let target = RegisterField { domain, field };
        let at_us = self.clock.now_us();
        let mut state = self.lock();
        let index = state.journal.len();
        let failure = state.rules.iter().find_map(|rule| match *rule {
            FailRule::Nth(n, err) if n == index => Some(err),
            FailRule::Field(f, err) if f == target => Some(err),
            _ => None,
        });
        state.journal.push(JournalEntry {
            target,
            value,
            at_us,
            accepted: failure.is_none(),
        });
        drop(state);

        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Mock delay provider — advances a [`VirtualClock`] instead of sleeping.
#[derive(Debug, Clone)]
pub struct MockDelay {
    clock: VirtualClock,
    calls: Arc<Mutex<Vec<u64>>>,
}

impl MockDelay {
    /// Create a delay provider driving `clock`.
    pub fn new(clock: VirtualClock) -> Self {
        Self {
            clock,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Requested delays in nanoseconds, oldest first.
    pub fn calls_ns(&self) -> Vec<u64> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Sum of all requested delays in microseconds.
    pub fn total_us(&self) -> u64 {
        self.calls_ns().iter().copied().fold(0u64, u64::saturating_add) / 1_000
    }

    fn record(&self, ns: u64) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(ns);
        self.clock.advance_ns(ns);
    }
}

impl embedded_hal_async::delay::DelayNs for MockDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.record(u64::from(ns));
    }

    async fn delay_us(&mut self, us: u32) {
        self.record(u64::from(us).saturating_mul(1_000));
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.record(u64::from(ms).saturating_mul(1_000_000));
    }
}
