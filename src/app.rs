use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};
use tracing::debug;

use crate::clock::{Clock, MonotonicClock};
use crate::config::key_name;
use crate::graph::{self, GraphFrame, GraphPoint, PixelPoint};
use crate::runtime::AppEvent;
use crate::session::Session;
use crate::stopwatch::{PhaseKind, Transition};
use crate::ui::canvas::{pointer_in, viewport_for};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum View {
    Timer,
    Graph,
}

/// How the terminal reports the control key
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum ReleaseMode {
    /// Press, repeat and release arrive as separate events.
    Events,
    /// Only presses arrive; each one is a full press and release.
    Tap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

#[derive(Debug)]
pub struct App<C: Clock = MonotonicClock> {
    pub session: Session<C>,
    pub view: View,
    pub control_key: char,
    pub release_mode: ReleaseMode,
    /// Pointer position inside the graph, in graph pixels
    pub pointer: Option<PixelPoint>,
    pub hover: Option<GraphPoint>,
    /// Where the graph canvas was last drawn
    pub graph_area: Option<Rect>,
}

impl<C: Clock> App<C> {
    pub fn new(session: Session<C>, control_key: char, release_mode: ReleaseMode) -> Self {
        Self {
            session,
            view: View::Timer,
            control_key,
            release_mode,
            pointer: None,
            hover: None,
            graph_area: None,
        }
    }

    pub fn on_event(&mut self, event: AppEvent) -> Control {
        match event {
            AppEvent::Key(key) => self.on_key(key),
            AppEvent::Mouse(mouse) => {
                self.on_mouse(mouse);
                Control::Continue
            }
            AppEvent::Resize => {
                // old coordinates are meaningless on the new surface
                self.graph_area = None;
                self.pointer = None;
                self.hover = None;
                Control::Continue
            }
            AppEvent::Tick => Control::Continue,
            AppEvent::Closed => Control::Quit,
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Control {
        if key.code == KeyCode::Char(self.control_key)
            && !key.modifiers.contains(KeyModifiers::CONTROL)
        {
            self.on_control_key(key.kind);
            return Control::Continue;
        }

        if key.kind != KeyEventKind::Press {
            return Control::Continue;
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Control::Quit,
            KeyCode::Esc => Control::Quit,
            KeyCode::Char('g') => {
                self.show_graph();
                Control::Continue
            }
            KeyCode::Char('b') | KeyCode::Backspace => {
                self.show_timer();
                Control::Continue
            }
            KeyCode::Tab => {
                match self.view {
                    View::Timer => self.show_graph(),
                    View::Graph => self.show_timer(),
                }
                Control::Continue
            }
            _ => Control::Continue,
        }
    }

    fn on_control_key(&mut self, kind: KeyEventKind) -> Transition {
        let transition = match (self.release_mode, kind) {
            (ReleaseMode::Events, KeyEventKind::Press) => self.session.key_down(false),
            (ReleaseMode::Events, KeyEventKind::Repeat) => self.session.key_down(true),
            (ReleaseMode::Events, KeyEventKind::Release) => self.session.key_up(),
            (ReleaseMode::Tap, KeyEventKind::Press) => self.session.tap(),
            (ReleaseMode::Tap, _) => Transition::Ignored,
        };
        if matches!(transition, Transition::Stopped { .. }) {
            self.refresh_hover();
        }
        transition
    }

    pub fn on_mouse(&mut self, mouse: MouseEvent) {
        if self.view != View::Graph {
            return;
        }
        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                self.pointer = self.graph_area.and_then(|area| {
                    area.contains(Position::new(mouse.column, mouse.row))
                        .then(|| pointer_in(area, mouse.column, mouse.row))
                });
                self.refresh_hover();
            }
            _ => {}
        }
    }

    /// Activating the graph always lays it out afresh.
    pub fn show_graph(&mut self) {
        debug!(from = %self.view, "graph view activated");
        self.view = View::Graph;
        self.pointer = None;
        self.hover = None;
        self.graph_area = None;
    }

    pub fn show_timer(&mut self) {
        self.view = View::Timer;
        self.pointer = None;
        self.hover = None;
    }

    /// Lay out the graph for `area` and remember the area and hover result.
    pub fn graph_frame(&mut self, area: Rect) -> GraphFrame {
        let frame = graph::layout(
            self.session.history().durations(),
            viewport_for(area),
            self.pointer,
        );
        self.graph_area = Some(area);
        self.hover = frame.hover;
        frame
    }

    fn refresh_hover(&mut self) {
        self.hover = match self.graph_area {
            Some(area) => self.graph_frame(area).hover,
            None => None,
        };
    }

    pub fn hint(&self) -> String {
        let key = key_name(self.control_key);
        match self.session.phase() {
            PhaseKind::Idle => match self.release_mode {
                ReleaseMode::Events => format!("Hold {key} to get ready"),
                ReleaseMode::Tap => format!("Tap {key} to start"),
            },
            PhaseKind::Armed => "Release to start".to_string(),
            PhaseKind::Running => format!("Press {key} to stop"),
        }
    }
}
