use ratatui::Frame;

use crate::{
    app::{App, View},
    clock::Clock,
    ui::{render_graph_view, render_timer_view},
};

/// A UI Screen boundary: responsible for rendering one view
pub trait Screen<C: Clock> {
    fn render(&self, app: &mut App<C>, f: &mut Frame);
}

/// Timer screen - live timer, summary and solve log
pub struct TimerScreen;

impl<C: Clock> Screen<C> for TimerScreen {
    fn render(&self, app: &mut App<C>, f: &mut Frame) {
        render_timer_view(app, f);
    }
}

/// Graph screen - solve times over solve number
pub struct GraphScreen;

impl<C: Clock> Screen<C> for GraphScreen {
    fn render(&self, app: &mut App<C>, f: &mut Frame) {
        render_graph_view(app, f);
    }
}

/// Helper to construct the appropriate screen for the current view
pub fn current_screen<C: Clock>(view: View) -> Box<dyn Screen<C>> {
    match view {
        View::Timer => Box::new(TimerScreen),
        View::Graph => Box::new(GraphScreen),
    }
}
