use std::cell::Cell;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, RecvError, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, MouseEvent};
use tracing::{debug, trace};

/// Display refresh period while the stopwatch is running
pub const REFRESH_CADENCE: Duration = Duration::from_millis(10);

/// Unified event type consumed by the app runner
#[derive(Clone, Debug, PartialEq)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize,
    Tick,
    /// The event source hung up; nothing more will arrive.
    Closed,
}

/// Source of terminal events (keyboard, mouse, resize)
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError>;

    /// Block until the next event.
    fn recv(&self) -> Result<AppEvent, RecvError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<AppEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let forwarded = match event::read() {
                Ok(CtEvent::Key(key)) => Some(AppEvent::Key(key)),
                Ok(CtEvent::Mouse(mouse)) => Some(AppEvent::Mouse(mouse)),
                Ok(CtEvent::Resize(_, _)) => Some(AppEvent::Resize),
                Ok(_) => None,
                Err(err) => {
                    debug!(%err, "terminal event reader stopped");
                    break;
                }
            };

            if let Some(ev) = forwarded {
                if tx.send(ev).is_err() {
                    break;
                }
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    fn recv(&self) -> Result<AppEvent, RecvError> {
        self.rx.recv()
    }
}

/// Decides whether the runner should tick, and how often.
pub trait Ticker {
    /// `None` means no tick is due and the runner blocks on the next event.
    fn interval(&self) -> Option<Duration>;
}

/// Hands out refresh registrations; ticks only while one is alive.
///
/// Clones share the same registrations, so the runner and the stopwatch can
/// each hold one.
#[derive(Clone, Debug)]
pub struct RefreshScheduler {
    cadence: Duration,
    live: Rc<Cell<usize>>,
}

impl RefreshScheduler {
    pub fn new(cadence: Duration) -> Self {
        Self {
            cadence,
            live: Rc::new(Cell::new(0)),
        }
    }

    /// Register a periodic refresh that lasts until the guard is dropped.
    pub fn start(&self) -> RefreshGuard {
        self.live.set(self.live.get() + 1);
        trace!(cadence_ms = self.cadence.as_millis() as u64, "refresh started");
        RefreshGuard {
            live: Rc::clone(&self.live),
        }
    }

    pub fn is_live(&self) -> bool {
        self.live.get() > 0
    }
}

impl Default for RefreshScheduler {
    fn default() -> Self {
        Self::new(REFRESH_CADENCE)
    }
}

impl Ticker for RefreshScheduler {
    fn interval(&self) -> Option<Duration> {
        self.is_live().then_some(self.cadence)
    }
}

/// A live refresh registration; dropping it cancels the refresh.
#[derive(Debug)]
#[must_use = "the refresh stops as soon as the guard is dropped"]
pub struct RefreshGuard {
    live: Rc<Cell<usize>>,
}

impl Drop for RefreshGuard {
    fn drop(&mut self) {
        self.live.set(self.live.get().saturating_sub(1));
        trace!("refresh cancelled");
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<AppEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<AppEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    fn recv(&self) -> Result<AppEvent, RecvError> {
        self.rx.recv()
    }
}

/// Runner that advances the application one event/tick at a time
pub struct Runner<E: EventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: EventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Returns the next event. While the ticker has an interval, a Tick is
    /// returned when nothing arrives within it.
    pub fn step(&self) -> AppEvent {
        match self.ticker.interval() {
            Some(interval) => match self.event_source.recv_timeout(interval) {
                Ok(ev) => ev,
                Err(RecvTimeoutError::Timeout) => AppEvent::Tick,
                Err(RecvTimeoutError::Disconnected) => AppEvent::Closed,
            },
            None => self.event_source.recv().unwrap_or(AppEvent::Closed),
        }
    }
}
