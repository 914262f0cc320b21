//! Wall-clock source injected into containers that stamp records.

use std::cell::Cell;
use std::time::{SystemTime, UNIX_EPOCH};

pub trait Clock {
    /// Current time as Unix epoch milliseconds.
    fn now_ms(&self) -> i64;
}

/// System wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
            .unwrap_or(0)
    }
}

/// Deterministic clock that advances by a fixed step on every read.
#[derive(Debug, Clone)]
pub struct ManualClock {
    next: Cell<i64>,
    step: i64,
}

impl ManualClock {
    pub fn new(start_ms: i64, step_ms: i64) -> Self {
        Self {
            next: Cell::new(start_ms),
            step: step_ms,
        }
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        let value = self.next.get();
        self.next.set(value.saturating_add(self.step));
        value
    }
}
