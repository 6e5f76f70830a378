//! Identity and time sources injected into the task store.
//!
//! # Invariants
//! - An `IdGenerator` never returns the same id twice within one process
//!   lifetime, and never an id at or below one it has observed.

use crate::model::task::TaskId;
use chrono::{DateTime, Utc};

/// Source of fresh task ids.
pub trait IdGenerator {
    fn next_id(&mut self) -> TaskId;

    /// Informs the generator that `id` is already taken.
    fn observe(&mut self, id: TaskId);
}

/// Time-derived ids (epoch milliseconds) that stay strictly increasing even
/// when several tasks are created within one clock tick.
#[derive(Debug, Default)]
pub struct MonotonicIdGenerator {
    last: TaskId,
}

impl MonotonicIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for MonotonicIdGenerator {
    fn next_id(&mut self) -> TaskId {
        let now_ms = TaskId::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        self.last = now_ms.max(self.last.saturating_add(1));
        self.last
    }

    fn observe(&mut self, id: TaskId) {
        self.last = self.last.max(id);
    }
}

/// Deterministic counter, handy for tests and reproducible fixtures.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    next: TaskId,
}

impl SequentialIdGenerator {
    pub fn starting_at(first: TaskId) -> Self {
        Self { next: first }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&mut self) -> TaskId {
        let id = self.next;
        self.next = self.next.saturating_add(1);
        id
    }

    fn observe(&mut self, id: TaskId) {
        if id >= self.next {
            self.next = id.saturating_add(1);
        }
    }
}

/// Source of creation timestamps.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::{IdGenerator, MonotonicIdGenerator, SequentialIdGenerator};

    #[test]
    fn monotonic_ids_strictly_increase_within_one_tick() {
        let mut ids = MonotonicIdGenerator::new();
        let first = ids.next_id();
        let second = ids.next_id();
        let third = ids.next_id();
        assert!(first < second && second < third);
    }

    #[test]
    fn monotonic_ids_skip_past_observed_values() {
        let mut ids = MonotonicIdGenerator::new();
        ids.observe(u64::MAX - 10);
        assert_eq!(ids.next_id(), u64::MAX - 9);
    }

    #[test]
    fn sequential_ids_respect_observed_values() {
        let mut ids = SequentialIdGenerator::starting_at(1);
        assert_eq!(ids.next_id(), 1);
        ids.observe(40);
        assert_eq!(ids.next_id(), 41);
        ids.observe(3);
        assert_eq!(ids.next_id(), 42);
    }
}
