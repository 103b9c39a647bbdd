//! Timer resource contract consumed by the ticker.
//!
//! A timer resource is a periodic OS timer that can be read for the number
//! of intervals elapsed since the previous read. The ticker never looks
//! inside one; it creates it through a [`TimerFactory`], arms it, hands it to
//! a read loop, and closes it.

use std::time::Duration;

use crate::config::ClockKind;
use crate::error::TickerResult;

/// A live periodic timer.
///
/// Implementations are shared between the thread that owns the ticker and
/// the read-loop thread, so every method takes `&self`.
pub trait TimerResource: Send + Sync + 'static {
    /// Arm the timer to fire every `interval`, first after `first_fire_after`.
    ///
    /// # Errors
    ///
    /// Returns [`TickerError::ResourceCreation`](crate::TickerError::ResourceCreation)
    /// if the timer cannot be armed.
    fn arm(&self, interval: Duration, first_fire_after: Duration) -> TickerResult<()>;

    /// Block until at least one interval has elapsed and return how many did.
    ///
    /// # Errors
    ///
    /// Returns [`TickerError::Closed`](crate::TickerError::Closed) once the
    /// resource is closed, including when `close()` is called while a read
    /// is blocked, or [`TickerError::Read`](crate::TickerError::Read) on OS
    /// failure.
    fn read(&self) -> TickerResult<u64>;

    /// Release the timer. Best-effort and idempotent; wakes a blocked `read`.
    fn close(&self);
}

/// Creates timer resources for a ticker.
pub trait TimerFactory: Send + Sync {
    /// Resource type produced by this factory.
    type Resource: TimerResource;

    /// Create a disarmed timer resource against `clock`.
    ///
    /// # Errors
    ///
    /// Returns [`TickerError::ResourceCreation`](crate::TickerError::ResourceCreation)
    /// if the OS refuses to create the timer.
    fn create(&self, clock: ClockKind) -> TickerResult<Self::Resource>;
}
