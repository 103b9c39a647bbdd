//! Error types for the ticker crate.
//!
//! Only `start()` and configuration validation surface errors to callers.
//! Read-loop failures are absorbed by the loop and show up to the consumer
//! as the delivery channel disconnecting.

use std::io;
use thiserror::Error;

use crate::ticker::TickerState;

/// Errors produced by the ticker and its timer resources.
#[derive(Debug, Error)]
pub enum TickerError {
    /// `start()` was called while the ticker was not stopped.
    #[error("Ticker is {state:?}; stop it before starting again")]
    InvalidState {
        /// State the ticker was in when the call was rejected.
        state: TickerState,
    },

    /// The timer resource could not be created, armed, or handed to a read loop.
    #[error("Failed to {operation}: {source}")]
    ResourceCreation {
        /// The step that failed.
        operation: &'static str,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },

    /// The timer resource has been closed.
    #[error("Timer resource is closed")]
    Closed,

    /// Reading the elapsed tick count failed.
    #[error("Timer read failed: {0}")]
    Read(#[source] io::Error),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl TickerError {
    /// Create an invalid state error.
    #[must_use]
    pub fn invalid_state(state: TickerState) -> Self {
        Self::InvalidState { state }
    }

    /// Create a resource creation error for the given operation.
    #[must_use]
    pub fn resource_creation(operation: &'static str, source: io::Error) -> Self {
        Self::ResourceCreation { operation, source }
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_configuration(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration(reason.into())
    }

    /// Whether the error means the resource was closed rather than faulted.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }
}

/// A specialized `Result` type for ticker operations.
pub type TickerResult<T> = std::result::Result<T, TickerError>;
