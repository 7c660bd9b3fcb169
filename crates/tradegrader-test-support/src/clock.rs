//! Pinned clock for trade history and catalog cache tests.

use chrono::{DateTime, Utc};
use tradegrader_core::clock::Clock;

/// Returns the same instant on every call.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
