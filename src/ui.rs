pub mod canvas;
pub mod screen;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::{
    app::{App, ReleaseMode},
    clock::Clock,
    stopwatch::PhaseKind,
    ui::canvas::GraphCanvas,
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

/// Draw the active view
pub fn draw<C: Clock>(app: &mut App<C>, f: &mut Frame) {
    screen::current_screen::<C>(app.view).render(app, f);
}

pub(crate) fn render_timer_view<C: Clock>(app: &mut App<C>, f: &mut Frame) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_style = Style::default().add_modifier(Modifier::DIM);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1), // timer
            Constraint::Length(1), // hint
            Constraint::Length(1), // padding
            Constraint::Length(1), // best / average
            Constraint::Length(1), // padding
            Constraint::Min(0),    // log
            Constraint::Length(1), // legend
        ])
        .split(f.area());

    // "ready" look while armed, like a held start pad
    let timer_style = match app.session.phase() {
        PhaseKind::Armed => bold_style.fg(Color::Green),
        PhaseKind::Running => bold_style,
        PhaseKind::Idle => bold_style.fg(Color::Gray),
    };
    let timer = Paragraph::new(Span::styled(app.session.timer_text(), timer_style))
        .alignment(Alignment::Center);
    f.render_widget(timer, chunks[0]);

    let hint = Paragraph::new(Span::styled(app.hint(), dim_style)).alignment(Alignment::Center);
    f.render_widget(hint, chunks[1]);

    let stats = app.session.stats();
    let summary = Paragraph::new(Line::from(vec![
        Span::styled("best ", dim_style),
        Span::styled(stats.best_text(), bold_style),
        Span::raw("   "),
        Span::styled("average ", dim_style),
        Span::styled(stats.average_text(), bold_style),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(summary, chunks[3]);

    let entries: Vec<Line> = app
        .session
        .history()
        .log_entries()
        .into_iter()
        .map(Line::from)
        .collect();
    let log = Paragraph::new(entries)
        .block(Block::default().borders(Borders::TOP).title("solves"))
        .alignment(Alignment::Center);
    f.render_widget(log, chunks[5]);

    f.render_widget(legend("(g)raph / (esc)ape", app.release_mode, italic_style), chunks[6]);
}

pub(crate) fn render_graph_view<C: Clock>(app: &mut App<C>, f: &mut Frame) {
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // timer status
            Constraint::Min(0),    // graph
            Constraint::Length(1), // legend
        ])
        .split(f.area());

    let status = Paragraph::new(Line::from(vec![
        Span::styled(
            app.session.timer_text(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(app.hint(), Style::default().add_modifier(Modifier::DIM)),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(status, chunks[0]);

    let block = Block::default().borders(Borders::ALL).title("solve times");
    let inner = block.inner(chunks[1]);
    f.render_widget(block, chunks[1]);

    let frame = app.graph_frame(inner);
    f.render_widget(GraphCanvas::new(&frame), inner);

    f.render_widget(legend("(b)ack / (esc)ape", app.release_mode, italic_style), chunks[2]);
}

fn legend(keys: &str, mode: ReleaseMode, style: Style) -> Paragraph<'static> {
    let text = match mode {
        ReleaseMode::Events => keys.to_string(),
        ReleaseMode::Tap => format!("{keys}   [tap mode]"),
    };
    Paragraph::new(Span::styled(text, style))
}
