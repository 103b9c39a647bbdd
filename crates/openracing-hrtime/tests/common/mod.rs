//! Scripted timer backend shared by the integration tests.

#![expect(dead_code, reason = "each test binary uses a different subset")]

use crossbeam::channel::{Receiver, Sender, unbounded};
use openracing_hrtime::prelude::*;
use parking_lot::Mutex;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Time given to a read loop or a consumer thread to reach its blocking call.
pub const SETTLE: Duration = Duration::from_millis(50);

#[derive(Debug)]
enum Event {
    Fire(u64),
    Fail,
    Wake,
}

#[derive(Debug, Default)]
struct Shared {
    live: AtomicUsize,
    created: AtomicUsize,
    fail_next_create: AtomicBool,
    fail_next_arm: AtomicBool,
    timers: Mutex<Vec<Sender<Event>>>,
}

/// Factory whose timers only expire when the test says so.
#[derive(Debug, Clone, Default)]
pub struct ManualFactory {
    shared: Arc<Shared>,
}

impl ManualFactory {
    /// Timers created and not yet dropped.
    pub fn live(&self) -> usize {
        self.shared.live.load(Ordering::SeqCst)
    }

    /// Timers created so far, including failed starts.
    pub fn created(&self) -> usize {
        self.shared.created.load(Ordering::SeqCst)
    }

    pub fn fail_next_create(&self) {
        self.shared.fail_next_create.store(true, Ordering::SeqCst);
    }

    pub fn fail_next_arm(&self) {
        self.shared.fail_next_arm.store(true, Ordering::SeqCst);
    }

    /// Report `expirations` on the most recently created timer.
    pub fn fire(&self, expirations: u64) {
        self.send_latest(Event::Fire(expirations));
    }

    /// Report `expirations` on the timer created `index`-th.
    pub fn fire_on(&self, index: usize, expirations: u64) {
        self.send_to(index, Event::Fire(expirations));
    }

    /// Make the next read of the most recent timer fail with an OS error.
    pub fn fail_read(&self) {
        self.send_latest(Event::Fail);
    }

    /// Poll until every timer has been dropped.
    pub fn wait_for_release(&self, timeout: Duration) -> bool {
        wait_until(timeout, || self.live() == 0)
    }

    fn send_latest(&self, event: Event) {
        if let Some(tx) = self.shared.timers.lock().last() {
            let _sent = tx.send(event).is_ok();
        }
    }

    fn send_to(&self, index: usize, event: Event) {
        if let Some(tx) = self.shared.timers.lock().get(index) {
            let _sent = tx.send(event).is_ok();
        }
    }
}

impl TimerFactory for ManualFactory {
    type Resource = ManualTimer;

    fn create(&self, _clock: ClockKind) -> TickerResult<ManualTimer> {
        if self.shared.fail_next_create.swap(false, Ordering::SeqCst) {
            return Err(TickerError::resource_creation(
                "create timer",
                io::Error::other("injected create failure"),
            ));
        }

        let (events_tx, events_rx) = unbounded();
        self.shared.timers.lock().push(events_tx.clone());
        self.shared.created.fetch_add(1, Ordering::SeqCst);
        self.shared.live.fetch_add(1, Ordering::SeqCst);

        Ok(ManualTimer {
            shared: Arc::clone(&self.shared),
            closed: AtomicBool::new(false),
            events_tx,
            events_rx,
        })
    }
}

/// Timer handed out by [`ManualFactory`].
#[derive(Debug)]
pub struct ManualTimer {
    shared: Arc<Shared>,
    closed: AtomicBool,
    events_tx: Sender<Event>,
    events_rx: Receiver<Event>,
}

impl TimerResource for ManualTimer {
    fn arm(&self, _interval: Duration, _first_fire_after: Duration) -> TickerResult<()> {
        if self.shared.fail_next_arm.swap(false, Ordering::SeqCst) {
            return Err(TickerError::resource_creation(
                "arm timer",
                io::Error::other("injected arm failure"),
            ));
        }
        Ok(())
    }

    fn read(&self) -> TickerResult<u64> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(TickerError::Closed);
        }
        match self.events_rx.recv() {
            Ok(Event::Fire(n)) if !self.closed.load(Ordering::SeqCst) => Ok(n),
            Ok(Event::Fail) => Err(TickerError::Read(io::Error::other("injected read failure"))),
            _ => Err(TickerError::Closed),
        }
    }

    fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            let _woken = self.events_tx.send(Event::Wake).is_ok();
        }
    }
}

impl Drop for ManualTimer {
    fn drop(&mut self) {
        self.shared.live.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Build a stopped ticker over a fresh manual factory.
pub fn manual_ticker() -> (Ticker<ManualFactory>, ManualFactory) {
    let factory = ManualFactory::default();
    let config = TickerConfig::with_interval(Duration::from_millis(10));
    (Ticker::with_factory(config, factory.clone()), factory)
}

/// Block in `recv` on another thread, fire once it is waiting, and return
/// what arrived.
pub fn fire_and_receive(
    factory: &ManualFactory,
    rx: &Receiver<u64>,
    expirations: u64,
) -> Result<u64, Box<dyn std::error::Error>> {
    let consumer = {
        let rx = rx.clone();
        thread::spawn(move || rx.recv_timeout(Duration::from_secs(2)))
    };
    thread::sleep(SETTLE);
    factory.fire(expirations);

    match consumer.join() {
        Ok(received) => Ok(received?),
        Err(_) => Err("consumer thread panicked".into()),
    }
}

pub fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    condition()
}
