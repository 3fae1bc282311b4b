//! Defines the clock abstraction used to make time-based behavior testable.

use time::OffsetDateTime;

/// A source of the current wall-clock time.
///
/// The guest provider checks its 24 hour session expiry against this clock,
/// so tests can advance time without sleeping.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> OffsetDateTime;
}

/// Real-time clock backed by the system UTC time source.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}
