//! Clock port for expiry checks and entry timestamps.

use chrono::{DateTime, Utc};

/// Source of the current time.
///
/// Cache expiry and TTL derivation both read the clock through this trait
/// so tests can age entries without sleeping.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock reading `Utc::now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
