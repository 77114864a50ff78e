//! Injectable time source
//!
//! Every scheduling computation takes "now" from a `Clock` instead of the
//! ambient system time, so tests can pin arbitrary instants and debug builds
//! can simulate day jumps without global state.

use chrono::{DateTime, Duration, Utc};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time, optionally shifted by a whole number of days.
///
/// The day offset is a debugging knob for exercising leniency/decay behavior
/// ("what would tomorrow's queue look like") without waiting.
#[derive(Debug, Clone, Default)]
pub struct SystemClock {
    day_offset: i64,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { day_offset: 0 }
    }

    pub fn with_day_offset(day_offset: i64) -> Self {
        Self { day_offset }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now() + Duration::days(self.day_offset)
    }
}

/// A clock pinned to a single instant, for deterministic tests.
#[derive(Debug, Clone)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
