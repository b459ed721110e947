use chrono::{DateTime, Utc};

/// Lifetime assumed for a login code when the server sends no expiry
pub const DEFAULT_CODE_SECONDS: u64 = 30;

/// Time left on a generated login code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeCountdown {
    initial: u64,
    deadline_ms: i64,
}

impl CodeCountdown {
    /// Start a countdown for a code expiring at `expires_at` (unix seconds),
    /// or [`DEFAULT_CODE_SECONDS`] from `now` when the expiry is unknown
    pub fn start(expires_at: Option<i64>, now: DateTime<Utc>) -> Self {
        let default_ms = i64::try_from(DEFAULT_CODE_SECONDS * 1000).unwrap_or(i64::MAX);
        let deadline_ms = expires_at.map_or_else(
            || now.timestamp_millis().saturating_add(default_ms),
            |secs| secs.saturating_mul(1000),
        );
        let mut countdown = Self {
            initial: 0,
            deadline_ms,
        };
        countdown.initial = countdown.remaining_at(now);
        countdown
    }

    pub const fn initial(&self) -> u64 {
        self.initial
    }

    /// Whole seconds left at `now`, rounded up and never negative
    pub fn remaining_at(&self, now: DateTime<Utc>) -> u64 {
        let left_ms = self.deadline_ms.saturating_sub(now.timestamp_millis());
        u64::try_from(left_ms.max(0)).unwrap_or_default().div_ceil(1000)
    }

    /// Share of the initial lifetime still left, from 0.0 to 1.0
    pub fn progress(&self, remaining: u64) -> f64 {
        if self.initial == 0 {
            return 0.0;
        }
        (remaining.min(self.initial) as f64) / (self.initial as f64)
    }
}
