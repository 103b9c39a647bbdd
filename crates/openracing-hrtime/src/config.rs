//! Ticker configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{TickerError, TickerResult};

/// Clock a timer resource counts against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockKind {
    /// Monotonic clock; does not advance while the system is suspended.
    #[default]
    Monotonic,
    /// Monotonic clock that keeps counting through suspend.
    Boottime,
}

/// Configuration for a [`Ticker`](crate::Ticker).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerConfig {
    /// Duration between ticks. Must be non-zero.
    pub interval: Duration,
    /// Clock the timer resource is created against.
    pub clock: ClockKind,
    /// Name prefix for read-loop threads; the bundle generation is appended.
    pub thread_name: String,
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            clock: ClockKind::Monotonic,
            thread_name: "hrtime-ticker".to_string(),
        }
    }
}

impl TickerConfig {
    /// Default configuration with the given interval.
    #[must_use]
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            ..Self::default()
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the interval is zero or the thread name is empty
    /// or contains a NUL byte.
    pub fn validate(&self) -> TickerResult<()> {
        if self.interval.is_zero() {
            return Err(TickerError::invalid_configuration(
                "interval must be greater than 0",
            ));
        }
        validate_thread_name(&self.thread_name)
    }

    /// Create a configuration builder.
    #[must_use]
    pub fn builder() -> TickerConfigBuilder {
        TickerConfigBuilder::default()
    }
}

/// Check a read-loop thread name prefix.
///
/// Thread names are handed to the OS as C strings, so an interior NUL cannot
/// be represented.
pub(crate) fn validate_thread_name(name: &str) -> TickerResult<()> {
    if name.is_empty() {
        return Err(TickerError::invalid_configuration(
            "thread_name must not be empty",
        ));
    }
    if name.contains('\0') {
        return Err(TickerError::invalid_configuration(
            "thread_name must not contain NUL bytes",
        ));
    }
    Ok(())
}

/// Builder for `TickerConfig`.
#[derive(Debug, Default)]
pub struct TickerConfigBuilder {
    config: TickerConfig,
}

impl TickerConfigBuilder {
    /// Set the tick interval.
    #[must_use]
    pub fn interval(mut self, interval: Duration) -> Self {
        self.config.interval = interval;
        self
    }

    /// Set the clock.
    #[must_use]
    pub fn clock(mut self, clock: ClockKind) -> Self {
        self.config.clock = clock;
        self
    }

    /// Set the read-loop thread name prefix.
    #[must_use]
    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.config.thread_name = name.into();
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> TickerResult<TickerConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
