//! Surface writer: executes graph [`DrawCommand`]s on a ratatui braille
//! canvas.
//!
//! Graph pixels map onto the cell grid at 4x8 px per cell, so one braille
//! dot covers 2x2 px and the centre of any cell is within the hover radius
//! of a point drawn in it.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    symbols::Marker,
    text::Span,
    widgets::{
        canvas::{Canvas, Context, Line as CanvasLine, Points},
        Widget,
    },
};
use unicode_width::UnicodeWidthChar;

use crate::graph::{DrawCommand, GraphFrame, Ink, Orientation, PixelPoint, Stroke, Viewport};

pub const CELL_WIDTH_PX: f64 = 4.0;
pub const CELL_HEIGHT_PX: f64 = 8.0;
/// One braille dot, also the step used when rasterising filled markers
const DOT_PX: f64 = 2.0;

pub const GRID_COLOR: Color = Color::Rgb(0x1f, 0x29, 0x37);
pub const LABEL_COLOR: Color = Color::Rgb(0x9c, 0xa3, 0xaf);
pub const TREND_COLOR: Color = Color::White;
pub const AVERAGE_COLOR: Color = Color::Rgb(0x00, 0xff, 0x9c);
pub const MARKER_COLOR: Color = Color::Rgb(0x3b, 0x82, 0xf6);
pub const TOOLTIP_BACKGROUND: Color = Color::Black;
pub const TOOLTIP_TEXT: Color = Color::White;

pub fn viewport_for(area: Rect) -> Viewport {
    Viewport::new(
        f64::from(area.width) * CELL_WIDTH_PX,
        f64::from(area.height) * CELL_HEIGHT_PX,
    )
}

/// Centre of the terminal cell `(column, row)` in graph pixels.
pub fn pointer_in(area: Rect, column: u16, row: u16) -> PixelPoint {
    PixelPoint::new(
        (f64::from(column.saturating_sub(area.x)) + 0.5) * CELL_WIDTH_PX,
        (f64::from(row.saturating_sub(area.y)) + 0.5) * CELL_HEIGHT_PX,
    )
}

fn color(ink: Ink) -> Color {
    match ink {
        Ink::Grid => GRID_COLOR,
        Ink::Label => LABEL_COLOR,
        Ink::Trend => TREND_COLOR,
        Ink::Average => AVERAGE_COLOR,
        Ink::Marker => MARKER_COLOR,
        Ink::TooltipBackground => TOOLTIP_BACKGROUND,
        Ink::TooltipText => TOOLTIP_TEXT,
    }
}

/// Widget drawing one laid-out [`GraphFrame`]
pub struct GraphCanvas<'a> {
    frame: &'a GraphFrame,
}

impl<'a> GraphCanvas<'a> {
    pub fn new(frame: &'a GraphFrame) -> Self {
        Self { frame }
    }
}

impl Widget for GraphCanvas<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let viewport = viewport_for(area);
        if !viewport.has_area() {
            return;
        }
        // ratatui scales by (dots - 1) / span, so one dot short of the
        // viewport makes every dot exactly DOT_PX wide and keeps pixel
        // (x, y) in cell (x / 4, y / 8)
        let right = viewport.width - DOT_PX;
        let height = viewport.height - DOT_PX;

        Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([0.0, right])
            .y_bounds([0.0, height])
            .paint(|ctx| {
                for command in &self.frame.commands {
                    paint(ctx, command, height);
                }
            })
            .render(area, buf);
    }
}

fn paint(ctx: &mut Context<'_>, command: &DrawCommand, height: f64) {
    // graph pixels grow downward, the canvas grows upward
    let flip = |p: PixelPoint| (p.x, height - p.y);

    match command {
        // nothing is carried over between frames
        DrawCommand::Clear => {}
        DrawCommand::Line {
            from,
            to,
            stroke,
            ink,
        } => {
            for (a, b) in segments(*from, *to, *stroke) {
                let ((x1, y1), (x2, y2)) = (flip(a), flip(b));
                ctx.draw(&CanvasLine::new(x1, y1, x2, y2, color(*ink)));
            }
        }
        DrawCommand::Polyline { points, ink } => {
            for pair in points.windows(2) {
                let ((x1, y1), (x2, y2)) = (flip(pair[0]), flip(pair[1]));
                ctx.draw(&CanvasLine::new(x1, y1, x2, y2, color(*ink)));
            }
        }
        DrawCommand::Marker {
            center,
            radius,
            ink,
        } => {
            let coords: Vec<(f64, f64)> = disc(*center, *radius).into_iter().map(flip).collect();
            ctx.draw(&Points {
                coords: &coords,
                color: color(*ink),
            });
        }
        DrawCommand::Text {
            at,
            text,
            orientation,
            ink,
        } => {
            let style = Style::default().fg(color(*ink));
            match orientation {
                Orientation::Horizontal => {
                    let (x, y) = flip(*at);
                    ctx.print(x, y, Span::styled(text.clone(), style));
                }
                Orientation::Vertical => {
                    let glyphs: Vec<char> = text.chars().filter(|c| c.width() == Some(1)).collect();
                    let top = at.y - glyphs.len() as f64 * CELL_HEIGHT_PX / 2.0;
                    for (row, glyph) in glyphs.iter().enumerate() {
                        let (x, y) = flip(PixelPoint::new(at.x, top + row as f64 * CELL_HEIGHT_PX));
                        ctx.print(x, y, Span::styled(glyph.to_string(), style));
                    }
                }
            }
        }
        DrawCommand::LabelBox {
            origin,
            width,
            height: box_height,
            ink,
        } => {
            let columns = (width / CELL_WIDTH_PX).round().max(1.0) as usize;
            let rows = (box_height / CELL_HEIGHT_PX).round().max(1.0) as usize;
            let style = Style::default().bg(color(*ink));
            for row in 0..rows {
                let (x, y) = flip(PixelPoint::new(
                    origin.x,
                    origin.y + row as f64 * CELL_HEIGHT_PX,
                ));
                ctx.print(x, y, Span::styled(" ".repeat(columns), style));
            }
        }
    }
}

/// Split a line into the pieces its stroke actually draws.
fn segments(from: PixelPoint, to: PixelPoint, stroke: Stroke) -> Vec<(PixelPoint, PixelPoint)> {
    let Stroke::Dashed { on, off } = stroke else {
        return vec![(from, to)];
    };
    let length = from.distance(to);
    if length == 0.0 || on <= 0.0 {
        return vec![(from, to)];
    }

    let along = |d: f64| {
        let t = d / length;
        PixelPoint::new(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t)
    };

    let mut pieces = Vec::new();
    let mut start = 0.0;
    while start < length {
        let end = (start + on).min(length);
        pieces.push((along(start), along(end)));
        start += on + off.max(0.0);
    }
    pieces
}

/// Dot positions covering a filled circle.
fn disc(center: PixelPoint, radius: f64) -> Vec<PixelPoint> {
    let steps = (radius / DOT_PX).floor() as i64;
    let mut dots = Vec::new();
    for dy in -steps..=steps {
        for dx in -steps..=steps {
            let offset = PixelPoint::new(dx as f64 * DOT_PX, dy as f64 * DOT_PX);
            if offset.distance(PixelPoint::new(0.0, 0.0)) <= radius {
                dots.push(PixelPoint::new(center.x + offset.x, center.y + offset.y));
            }
        }
    }
    dots
}
