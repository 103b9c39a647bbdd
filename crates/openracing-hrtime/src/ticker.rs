//! Ticker state machine.
//!
//! A [`Ticker`] is either stopped or running. Each successful
//! [`start`](Ticker::start) allocates a fresh [`HandleBundle`] and spawns a
//! read loop that owns a reference to that bundle alone; [`stop`](Ticker::stop)
//! closes whichever bundle is current. A read loop left over from an earlier
//! cycle can only ever close its own bundle, so a quick stop/start never lets
//! a stale loop touch the new timer or channel.

use std::fmt;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam::channel::{Receiver, bounded};
use parking_lot::Mutex;
use tracing::{info, warn};

use crate::bundle::HandleBundle;
use crate::config::{TickerConfig, validate_thread_name};
use crate::error::{TickerError, TickerResult};
use crate::read_loop;
use crate::resource::{TimerFactory, TimerResource};

#[cfg(target_os = "linux")]
use crate::timerfd::TimerFdFactory;

/// Lifecycle state of a ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TickerState {
    /// No bundle is current. Initial state.
    #[default]
    Stopped,
    /// A bundle is current and its read loop has been spawned.
    Running,
}

struct TickerInner<R> {
    state: TickerState,
    bundle: Option<Arc<HandleBundle<R>>>,
    /// Kept after `stop()` so late consumers observe the disconnect.
    receiver: Option<Receiver<u64>>,
    generation: u64,
}

/// Periodic tick source delivering coalesced tick counts over a channel.
///
/// Each value received is the number of intervals that elapsed since the
/// previous value was taken. Delivery never blocks the timer: when the
/// consumer is not waiting, ticks accumulate and arrive together with the
/// next successful delivery.
///
/// The receiver is replaced on every successful `start()`; fetch it again
/// with [`receiver`](Self::receiver) after each start.
pub struct Ticker<F: TimerFactory> {
    config: TickerConfig,
    factory: F,
    inner: Mutex<TickerInner<F::Resource>>,
}

/// Ticker driven by a monotonic `timerfd`.
#[cfg(target_os = "linux")]
pub type MonotonicTicker = Ticker<TimerFdFactory>;

#[cfg(target_os = "linux")]
impl Ticker<TimerFdFactory> {
    /// Create a stopped ticker firing every `interval` on the monotonic clock.
    ///
    /// `interval` must be non-zero; a zero interval is rejected when the
    /// timer is armed in [`start`](Self::start).
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self::with_factory(TickerConfig::with_interval(interval), TimerFdFactory)
    }

    /// Create a stopped `timerfd` ticker from a configuration.
    ///
    /// The timer runs on `config.clock`, so despite the `MonotonicTicker`
    /// alias this may be `CLOCK_BOOTTIME`, which keeps counting through
    /// suspend.
    #[must_use]
    pub fn from_config(config: TickerConfig) -> Self {
        Self::with_factory(config, TimerFdFactory)
    }
}

impl<F: TimerFactory> Ticker<F> {
    /// Create a stopped ticker whose timers come from `factory`.
    #[must_use]
    pub fn with_factory(config: TickerConfig, factory: F) -> Self {
        Self {
            config,
            factory,
            inner: Mutex::new(TickerInner {
                state: TickerState::Stopped,
                bundle: None,
                receiver: None,
                generation: 0,
            }),
        }
    }

    /// Start delivering ticks on a new channel.
    ///
    /// # Errors
    ///
    /// - [`TickerError::InvalidState`] if the ticker is already running.
    ///   Nothing is changed.
    /// - [`TickerError::InvalidConfiguration`] if the thread name cannot be
    ///   given to the OS. Nothing is created.
    /// - [`TickerError::ResourceCreation`] if the timer cannot be created or
    ///   armed, or the read loop cannot be spawned. Anything created so far
    ///   is released and the ticker stays stopped.
    pub fn start(&self) -> TickerResult<()> {
        let mut inner = self.inner.lock();
        if inner.state != TickerState::Stopped {
            return Err(TickerError::invalid_state(inner.state));
        }

        // Builder::spawn panics on a name it cannot pass to the OS.
        validate_thread_name(&self.config.thread_name)?;

        let resource = self.factory.create(self.config.clock)?;
        if let Err(e) = resource.arm(self.config.interval, self.config.interval) {
            resource.close();
            return Err(e);
        }

        let generation = inner.generation.wrapping_add(1);
        let (tx, rx) = bounded(0);
        let bundle = Arc::new(HandleBundle::new(generation, resource, tx));

        let loop_bundle = Arc::clone(&bundle);
        let spawned = thread::Builder::new()
            .name(format!("{}-{generation}", self.config.thread_name))
            .spawn(move || read_loop::run(loop_bundle));
        if let Err(e) = spawned {
            bundle.close();
            return Err(TickerError::resource_creation("spawn read loop", e));
        }

        inner.generation = generation;
        inner.bundle = Some(bundle);
        inner.receiver = Some(rx);
        inner.state = TickerState::Running;

        info!(generation, interval = ?self.config.interval, "Ticker started");
        Ok(())
    }

    /// Stop the ticker and close its current channel.
    ///
    /// Safe to call in any state. Returns once the timer is released and the
    /// channel is closed; the read loop exits on its own shortly after.
    ///
    /// # Errors
    ///
    /// Currently never fails.
    pub fn stop(&self) -> TickerResult<()> {
        let bundle = {
            let mut inner = self.inner.lock();
            inner.state = TickerState::Stopped;
            inner.bundle.take()
        };

        if let Some(bundle) = bundle {
            bundle.close();
            info!(generation = bundle.generation(), "Ticker stopped");
        }

        Ok(())
    }

    /// Receiving side of the current channel.
    ///
    /// `None` before the first `start()`. After `stop()` this is the last
    /// channel, which is closed.
    #[must_use]
    pub fn receiver(&self) -> Option<Receiver<u64>> {
        self.inner.lock().receiver.clone()
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> TickerState {
        self.inner.lock().state
    }

    /// Whether the ticker is running.
    ///
    /// A running ticker whose read loop hit a timer fault stays running
    /// until `stop()`; its channel is already closed.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state() == TickerState::Running
    }

    /// Interval between ticks.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.config.interval
    }

    /// Ticker configuration.
    #[must_use]
    pub fn config(&self) -> &TickerConfig {
        &self.config
    }
}

impl<F: TimerFactory> fmt::Debug for Ticker<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ticker")
            .field("config", &self.config)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl<F: TimerFactory> Drop for Ticker<F> {
    fn drop(&mut self) {
        let inner = self.inner.get_mut();
        if inner.state == TickerState::Running {
            warn!("Ticker dropped while still running - stopping");
        }
        inner.state = TickerState::Stopped;
        if let Some(bundle) = inner.bundle.take() {
            bundle.close();
        }
    }
}
