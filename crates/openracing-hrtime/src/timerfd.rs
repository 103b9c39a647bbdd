//! Linux `timerfd` timer resource.
//!
//! The timer is created blocking, so `read` parks the read-loop thread in the
//! kernel until the next expiration. Closing a descriptor does not wake a
//! thread already blocked reading it, so `close` marks the resource closed and
//! re-arms it as a 1 ns one-shot instead; the blocked read returns, sees the
//! flag, and reports [`TickerError::Closed`]. The descriptor itself is released
//! when the last owner drops the `TimerFd`, which keeps a stale read loop from
//! ever reading a descriptor number reused by a later `start()`.

#![expect(
    unsafe_code,
    reason = "timerfd_create and timerfd_settime have no std wrapper"
)]

use std::fs::File;
use std::io::{self, Read};
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::debug;

use crate::config::ClockKind;
use crate::error::{TickerError, TickerResult};
use crate::resource::{TimerFactory, TimerResource};

/// Size of the expiration counter the kernel hands back on each read.
const EXPIRATION_COUNT_SIZE: usize = 8;

/// One-shot delay used to kick a blocked reader out of `read(2)` on close.
const WAKE_DELAY: Duration = Duration::from_nanos(1);

/// A `timerfd` owned by one handle bundle.
#[derive(Debug)]
pub struct TimerFd {
    file: File,
    closed: AtomicBool,
}

impl TimerFd {
    /// Create a disarmed timer against `clock`.
    ///
    /// # Errors
    ///
    /// Returns [`TickerError::ResourceCreation`] if `timerfd_create` fails.
    pub fn new(clock: ClockKind) -> TickerResult<Self> {
        let clock_id = match clock {
            ClockKind::Monotonic => libc::CLOCK_MONOTONIC,
            ClockKind::Boottime => libc::CLOCK_BOOTTIME,
        };

        // SAFETY: timerfd_create takes no pointers; the result is checked below.
        let fd = unsafe { libc::timerfd_create(clock_id, libc::TFD_CLOEXEC) };
        if fd < 0 {
            return Err(TickerError::resource_creation(
                "create timerfd",
                io::Error::last_os_error(),
            ));
        }

        // SAFETY: `fd` was just returned by timerfd_create and has no other owner.
        let owned = unsafe { OwnedFd::from_raw_fd(fd) };

        Ok(Self {
            file: File::from(owned),
            closed: AtomicBool::new(false),
        })
    }

    /// Whether `close` has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn settime(&self, interval: Duration, value: Duration) -> io::Result<()> {
        let spec = libc::itimerspec {
            it_interval: to_timespec(interval)?,
            it_value: to_timespec(value)?,
        };

        // SAFETY: `spec` outlives the call, the old-value pointer may be null,
        // and the descriptor stays open for as long as `self.file` lives.
        let rc = unsafe {
            libc::timerfd_settime(self.file.as_raw_fd(), 0, &spec, std::ptr::null_mut())
        };
        if rc < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

impl TimerResource for TimerFd {
    fn arm(&self, interval: Duration, first_fire_after: Duration) -> TickerResult<()> {
        // A zero it_value disarms the timer instead of firing immediately.
        if interval.is_zero() || first_fire_after.is_zero() {
            return Err(TickerError::resource_creation(
                "arm timerfd",
                io::Error::new(io::ErrorKind::InvalidInput, "interval must be non-zero"),
            ));
        }

        self.settime(interval, first_fire_after)
            .map_err(|e| TickerError::resource_creation("arm timerfd", e))
    }

    fn read(&self) -> TickerResult<u64> {
        if self.is_closed() {
            return Err(TickerError::Closed);
        }

        let mut buf = [0u8; EXPIRATION_COUNT_SIZE];
        let mut file = &self.file;
        file.read_exact(&mut buf).map_err(TickerError::Read)?;

        if self.is_closed() {
            return Err(TickerError::Closed);
        }

        Ok(u64::from_ne_bytes(buf))
    }

    fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }

        if let Err(e) = self.settime(Duration::ZERO, WAKE_DELAY) {
            debug!(error = %e, "Failed to wake timerfd reader on close");
        }
    }
}

fn to_timespec(duration: Duration) -> io::Result<libc::timespec> {
    let tv_sec = libc::time_t::try_from(duration.as_secs())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let tv_nsec = libc::c_long::try_from(duration.subsec_nanos())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    Ok(libc::timespec { tv_sec, tv_nsec })
}

/// Factory producing [`TimerFd`] resources.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimerFdFactory;

impl TimerFactory for TimerFdFactory {
    type Resource = TimerFd;

    fn create(&self, clock: ClockKind) -> TickerResult<TimerFd> {
        TimerFd::new(clock)
    }
}
