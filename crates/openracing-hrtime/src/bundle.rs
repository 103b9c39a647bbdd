//! Handle bundle: one timer resource paired with one delivery channel.
//!
//! A bundle is created by every successful `start()` and shared between the
//! ticker and the read loop spawned for it. Either side may close it; the
//! first close wins and every later one is a no-op.

use crossbeam::channel::{Sender, TrySendError};
use parking_lot::Mutex;
use tracing::debug;

use crate::resource::TimerResource;

/// Outcome of a non-blocking delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Delivery {
    /// The consumer was waiting and took the count.
    Delivered,
    /// Nobody was waiting; the count should be carried forward.
    Skipped,
    /// The bundle has been closed.
    Closed,
}

/// A timer resource and the producer side of its delivery channel.
#[derive(Debug)]
pub(crate) struct HandleBundle<R> {
    generation: u64,
    resource: R,
    /// `None` once closed.
    sender: Mutex<Option<Sender<u64>>>,
}

impl<R: TimerResource> HandleBundle<R> {
    pub(crate) fn new(generation: u64, resource: R, sender: Sender<u64>) -> Self {
        Self {
            generation,
            resource,
            sender: Mutex::new(Some(sender)),
        }
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn resource(&self) -> &R {
        &self.resource
    }

    #[cfg(test)]
    pub(crate) fn is_closed(&self) -> bool {
        self.sender.lock().is_none()
    }

    /// Close the resource and the channel. Only the first call has an effect.
    pub(crate) fn close(&self) {
        let mut sender = self.sender.lock();
        let Some(tx) = sender.take() else {
            return;
        };

        self.resource.close();
        drop(tx);
        debug!(generation = self.generation, "Closed ticker handle bundle");
    }

    /// Offer `count` to the consumer without blocking.
    pub(crate) fn try_deliver(&self, count: u64) -> Delivery {
        let sender = self.sender.lock();
        let Some(tx) = sender.as_ref() else {
            return Delivery::Closed;
        };

        match tx.try_send(count) {
            Ok(()) => Delivery::Delivered,
            // A dropped receiver is treated like a busy one; the bundle stays
            // open until stop() or a read failure closes it.
            Err(TrySendError::Full(_) | TrySendError::Disconnected(_)) => Delivery::Skipped,
        }
    }
}
