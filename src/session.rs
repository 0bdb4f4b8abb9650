use tracing::info;

use crate::clock::{Clock, MonotonicClock};
use crate::format::format_duration;
use crate::history::{History, Stats};
use crate::runtime::RefreshScheduler;
use crate::stopwatch::{PhaseKind, Stopwatch, Transition};

/// The one timing session of a run: the stopwatch plus every solve it has
/// produced. Built once at startup and handed around by reference.
#[derive(Debug)]
pub struct Session<C: Clock = MonotonicClock> {
    stopwatch: Stopwatch<C>,
    history: History,
}

impl Session<MonotonicClock> {
    pub fn with_monotonic_clock(scheduler: RefreshScheduler) -> Self {
        Self::new(MonotonicClock::new(), scheduler)
    }
}

impl<C: Clock> Session<C> {
    pub fn new(clock: C, scheduler: RefreshScheduler) -> Self {
        Self {
            stopwatch: Stopwatch::new(clock, scheduler),
            history: History::new(),
        }
    }

    pub fn key_down(&mut self, repeat: bool) -> Transition {
        self.stopwatch.key_down(repeat)
    }

    pub fn key_up(&mut self) -> Transition {
        let transition = self.stopwatch.key_up();
        if let Transition::Stopped { elapsed } = transition {
            let stats = self.history.record_completed_duration(elapsed);
            info!(
                solve = self.history.len(),
                time = %format_duration(elapsed),
                best = %stats.best_text(),
                average = %stats.average_text(),
                "solve recorded"
            );
        }
        transition
    }

    /// A press and release in one go, for terminals that never report
    /// releases. Returns what the release did.
    pub fn tap(&mut self) -> Transition {
        match self.key_down(false) {
            Transition::Ignored => Transition::Ignored,
            _ => self.key_up(),
        }
    }

    pub fn phase(&self) -> PhaseKind {
        self.stopwatch.phase()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn stats(&self) -> Stats {
        self.history.stats()
    }

    /// Live elapsed time while running, else the last solve, else zero.
    /// The attempt in progress never counts towards the stats.
    pub fn timer_text(&self) -> String {
        let ms = self
            .stopwatch
            .elapsed_ms()
            .or_else(|| self.history.last())
            .unwrap_or(0.0);
        format_duration(ms)
    }
}
