//! Injectable clock for expiry evaluation.

use chrono::{DateTime, Utc};

/// A source of the current time.
///
/// Expiry checks take the clock as an injected dependency so that tests
/// can pin "now" to a fixed instant instead of racing the wall clock.
pub trait Clock: Send + Sync + std::fmt::Debug + 'static {
    /// Return the current timestamp.
    fn now(&self) -> DateTime<Utc>;
}

/// The production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
