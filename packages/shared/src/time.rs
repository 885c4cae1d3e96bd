//! Time-related utilities with clock abstraction for testability.
//!
//! Timestamps are Unix epoch milliseconds. They are only converted to a
//! calendar representation (JST) when rendered for a human.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, FixedOffset, Utc};

const JST_OFFSET_SECS: i32 = 9 * 3600;

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Current Unix timestamp (milliseconds)
    fn now_millis(&self) -> i64;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        now_millis()
    }
}

/// Clock for tests: returns a fixed instant until moved with [`FixedClock::advance`].
#[derive(Debug, Default)]
pub struct FixedClock {
    now: AtomicI64,
}

impl FixedClock {
    pub fn new(fixed_time_millis: i64) -> Self {
        Self {
            now: AtomicI64::new(fixed_time_millis),
        }
    }

    /// Move the clock forward by `millis`.
    pub fn advance(&self, millis: i64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Current Unix timestamp (milliseconds)
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Render a Unix timestamp (milliseconds) as RFC 3339 in JST.
///
/// Out-of-range values fall back to the raw number.
pub fn to_jst_rfc3339(timestamp_millis: i64) -> String {
    let Some(jst) = FixedOffset::east_opt(JST_OFFSET_SECS) else {
        return timestamp_millis.to_string();
    };
    match DateTime::from_timestamp_millis(timestamp_millis) {
        Some(utc) => utc.with_timezone(&jst).to_rfc3339(),
        None => timestamp_millis.to_string(),
    }
}
