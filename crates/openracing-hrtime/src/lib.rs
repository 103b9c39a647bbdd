//! # openracing-hrtime
//!
//! Periodic tick source backed by a Linux `timerfd` monotonic timer.
//!
//! A [`Ticker`] delivers tick *counts* instead of individual wake-ups: every
//! value received is the number of intervals that elapsed since the consumer
//! last took one. When the consumer is busy, ticks are coalesced rather than
//! queued, so a slow reader loses resolution but never the total.
//!
//! ## Architecture
//!
//! - [`ticker`] - Start/stop state machine owning the current handle bundle
//! - [`resource`] - Timer resource contract (`TimerFactory`, `TimerResource`)
//! - `timerfd` - Linux `timerfd` implementation of the resource contract
//! - [`config`] - Ticker configuration and builder
//! - [`error`] - Ticker error types
//!
//! Each `start()` pairs a new timer with a new channel in a handle bundle
//! that is closed exactly once, by `stop()` or by the bundle's own read loop,
//! whichever comes first. Read loops from earlier cycles only ever see their
//! own bundle.
//!
//! ## Example
//!
//! ```no_run
//! # #[cfg(target_os = "linux")]
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use openracing_hrtime::prelude::*;
//! use std::time::Duration;
//!
//! let ticker = MonotonicTicker::new(Duration::from_millis(500));
//! ticker.start()?;
//!
//! let ticks = ticker.receiver().ok_or("ticker has no channel")?;
//! let elapsed = ticks.recv()?;
//! assert!(elapsed >= 1);
//!
//! ticker.stop()?;
//! assert!(ticks.recv().is_err());
//! # Ok(())
//! # }
//! # #[cfg(not(target_os = "linux"))]
//! # fn main() {}
//! ```

#![deny(
    unsafe_op_in_unsafe_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::panic,
    missing_docs,
    missing_debug_implementations
)]
#![warn(clippy::pedantic)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod bundle;
mod read_loop;

pub mod config;
pub mod error;
pub mod resource;
pub mod ticker;

#[cfg(target_os = "linux")]
pub mod timerfd;


pub mod prelude;

pub use config::{ClockKind, TickerConfig, TickerConfigBuilder};
pub use error::{TickerError, TickerResult};
pub use resource::{TimerFactory, TimerResource};
pub use ticker::{Ticker, TickerState};

#[cfg(target_os = "linux")]
pub use ticker::MonotonicTicker;
#[cfg(target_os = "linux")]
pub use timerfd::{TimerFd, TimerFdFactory};
