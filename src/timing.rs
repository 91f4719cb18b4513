// Monotonic clock used by every time-bounded engine

use std::time::{Duration, Instant};

/// Wall-clock budget for one decision.
///
/// Budgets are polled, never preemptive: engines call `is_time_over` before
/// starting new work and stop once it returns true.
#[derive(Debug, Clone, Copy)]
pub struct TimeKeeper {
    start: Instant,
    budget: Option<Duration>,
}

impl TimeKeeper {
    /// A threshold of zero or less disables the clock entirely.
    pub fn new(threshold_ms: i64) -> Self {
        let budget = if threshold_ms > 0 {
            Some(Duration::from_millis(threshold_ms as u64))
        } else {
            None
        };
        TimeKeeper {
            start: Instant::now(),
            budget,
        }
    }

    pub fn is_limited(&self) -> bool {
        self.budget.is_some()
    }

    pub fn is_time_over(&self) -> bool {
        match self.budget {
            Some(budget) => self.start.elapsed() >= budget,
            None => false,
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}
