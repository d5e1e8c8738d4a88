//! Time source for cache expiry and round-age calculations.
//!
//! Both the cache TTL checks and the proportional scoring model need "now" as unix seconds.
//! Routing every read through a [`Clock`] lets tests pin time and step it forward without
//! sleeping.

use chrono::Utc;
use parking_lot::Mutex;

/// A source of the current unix time in (fractional) seconds.
pub trait Clock: Send + Sync {
    /// Returns the current unix timestamp in seconds.
    fn now(&self) -> f64;
}

/// Wall clock backed by the system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[allow(clippy::cast_precision_loss)]
    fn now(&self) -> f64 {
        Utc::now().timestamp_micros() as f64 / 1_000_000.0
    }
}

/// Manually driven clock for tests and replays.
///
/// # Example
///
/// ```
/// use hopper_core::clock::{Clock, ManualClock};
///
/// let clock = ManualClock::new(1_000.0);
/// clock.advance(120.5);
/// assert!((clock.now() - 1_120.5).abs() < f64::EPSILON);
/// ```
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<f64>,
}

impl ManualClock {
    #[must_use]
    pub fn new(start: f64) -> Self {
        Self { now: Mutex::new(start) }
    }

    /// Moves the clock forward by `seconds`.
    pub fn advance(&self, seconds: f64) {
        *self.now.lock() += seconds;
    }

    /// Jumps the clock to an absolute timestamp.
    pub fn set(&self, timestamp: f64) {
        *self.now.lock() = timestamp;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        *self.now.lock()
    }
}
