//! Prelude for openracing-hrtime.
//!
//! ```rust
//! use openracing_hrtime::prelude::*;
//!
//! let config = TickerConfig::default();
//! assert_eq!(config.clock, ClockKind::Monotonic);
//! ```

pub use crate::config::{ClockKind, TickerConfig, TickerConfigBuilder};
pub use crate::error::{TickerError, TickerResult};
pub use crate::resource::{TimerFactory, TimerResource};
pub use crate::ticker::{Ticker, TickerState};

#[cfg(target_os = "linux")]
pub use crate::ticker::MonotonicTicker;
#[cfg(target_os = "linux")]
pub use crate::timerfd::{TimerFd, TimerFdFactory};
