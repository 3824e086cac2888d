use crate::common::constants::MAX_WAIT_MS;
use std::time::{Duration, Instant};

// Stand-in for deadlines too large to represent.
const FAR_FUTURE_SECS: u64 = 100 * 365 * 24 * 60 * 60;

/// Absolute point in time after which a wait is over.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    pub fn after(timeout: Duration) -> Self {
        let now = Instant::now();
        let at = now
            .checked_add(timeout)
            .unwrap_or_else(|| now + Duration::from_secs(FAR_FUTURE_SECS));
        Self { at }
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.at
    }

    /// Time left, or `None` once the deadline has passed.
    pub fn remaining(&self) -> Option<Duration> {
        self.at.checked_duration_since(Instant::now()).filter(|d| !d.is_zero())
    }
}

/// Convert a wait budget into `poll(2)` milliseconds, rounding up so a wait
/// never returns before its budget.
pub fn budget_to_millis(budget: Duration) -> i32 {
    let nanos = budget.as_nanos();
    let millis = nanos.div_ceil(1_000_000);
    millis.min(MAX_WAIT_MS as u128) as i32
}
