use tracing::debug;

use crate::clock::Clock;
use crate::runtime::{RefreshGuard, RefreshScheduler};

/// Observable phase of the stopwatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum PhaseKind {
    Idle,
    Armed,
    Running,
}

#[derive(Debug)]
enum Phase {
    Idle,
    Armed,
    /// The refresh registration lives exactly as long as this variant.
    Running {
        started_at: f64,
        _refresh: RefreshGuard,
    },
}

impl Phase {
    fn kind(&self) -> PhaseKind {
        match self {
            Phase::Idle => PhaseKind::Idle,
            Phase::Armed => PhaseKind::Armed,
            Phase::Running { .. } => PhaseKind::Running,
        }
    }
}

/// What a key edge did to the stopwatch
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    Ignored,
    Armed,
    Started,
    /// Key went down while running; the clock keeps going.
    Held,
    Stopped { elapsed: f64 },
}

/// Control-key state machine: Idle -> Armed -> Running -> Idle.
///
/// Only key edges move it. Auto-repeat and presses while the key is already
/// held are no-ops, so one press/release cycle can stop at most one solve.
#[derive(Debug)]
pub struct Stopwatch<C: Clock> {
    clock: C,
    scheduler: RefreshScheduler,
    phase: Phase,
    holding: bool,
}

impl<C: Clock> Stopwatch<C> {
    pub fn new(clock: C, scheduler: RefreshScheduler) -> Self {
        Self {
            clock,
            scheduler,
            phase: Phase::Idle,
            holding: false,
        }
    }

    pub fn phase(&self) -> PhaseKind {
        self.phase.kind()
    }

    pub fn is_holding(&self) -> bool {
        self.holding
    }

    /// Time since start while running.
    pub fn elapsed_ms(&self) -> Option<f64> {
        match self.phase {
            Phase::Running { started_at, .. } => Some(self.clock.now_ms() - started_at),
            _ => None,
        }
    }

    pub fn key_down(&mut self, repeat: bool) -> Transition {
        if repeat || self.holding {
            return Transition::Ignored;
        }
        self.holding = true;

        let transition = match self.phase {
            Phase::Idle => {
                self.phase = Phase::Armed;
                Transition::Armed
            }
            Phase::Armed => Transition::Ignored,
            Phase::Running { .. } => Transition::Held,
        };
        debug!(?transition, phase = %self.phase(), "key down");
        transition
    }

    pub fn key_up(&mut self) -> Transition {
        self.holding = false;

        let transition = match std::mem::replace(&mut self.phase, Phase::Idle) {
            // a release with no matching press (e.g. held before launch)
            Phase::Idle => Transition::Ignored,
            Phase::Armed => {
                self.phase = Phase::Running {
                    started_at: self.clock.now_ms(),
                    _refresh: self.scheduler.start(),
                };
                Transition::Started
            }
            Phase::Running { started_at, .. } => Transition::Stopped {
                elapsed: self.clock.now_ms() - started_at,
            },
        };
        debug!(?transition, phase = %self.phase(), "key up");
        transition
    }
}
