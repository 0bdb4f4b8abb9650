//! Solve-time graph as a pure function.
//!
//! [`layout`] maps the history onto a pixel viewport and returns the draw
//! commands for one frame together with the points it placed and the point
//! under the pointer, if any. Nothing is cached between calls: every frame,
//! and every hit test, works on coordinates computed for the current
//! viewport.

use crate::format::format_duration;
use crate::util::{bounds, mean};

/// Margin reserved on every side for axis labels and captions.
pub const PADDING_PX: f64 = 48.0;
/// A pointer strictly closer than this to a point hovers it.
pub const HIT_RADIUS_PX: f64 = 6.0;
pub const MARKER_RADIUS_PX: f64 = 4.0;
pub const HOVER_MARKER_RADIUS_PX: f64 = 6.0;
/// Dash pattern of the average line, drawn then skipped.
pub const AVERAGE_DASH_PX: (f64, f64) = (6.0, 4.0);

const Y_LABEL_X_PX: f64 = 6.0;
const Y_LABEL_DROP_PX: f64 = 4.0;
const AVERAGE_LABEL_INSET_PX: f64 = 90.0;
const AVERAGE_LABEL_RISE_PX: f64 = 6.0;
const TIME_CAPTION_X_PX: f64 = 16.0;
const SOLVE_CAPTION_OFFSET_PX: (f64, f64) = (25.0, 10.0);
const TOOLTIP_OFFSET_PX: (f64, f64) = (8.0, 24.0);
const TOOLTIP_SIZE_PX: (f64, f64) = (84.0, 18.0);
const TOOLTIP_TEXT_OFFSET_PX: (f64, f64) = (12.0, 10.0);

pub const TIME_CAPTION: &str = "Time (mm:ss)";
pub const SOLVE_CAPTION: &str = "Solve #";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: PixelPoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Size of the drawable surface in pixels; y grows downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// A history entry placed in pixel space for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphPoint {
    pub x: f64,
    pub y: f64,
    pub duration: f64,
    pub index: usize,
}

impl GraphPoint {
    pub fn position(&self) -> PixelPoint {
        PixelPoint::new(self.x, self.y)
    }
}

/// Paint role; the surface writer picks the actual colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ink {
    Grid,
    Label,
    Trend,
    Average,
    Marker,
    TooltipBackground,
    TooltipText,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stroke {
    Solid,
    Dashed { on: f64, off: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    /// Centred on the anchor along the vertical axis.
    Vertical,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Line {
        from: PixelPoint,
        to: PixelPoint,
        stroke: Stroke,
        ink: Ink,
    },
    Polyline {
        points: Vec<PixelPoint>,
        ink: Ink,
    },
    /// Filled circle.
    Marker {
        center: PixelPoint,
        radius: f64,
        ink: Ink,
    },
    Text {
        at: PixelPoint,
        text: String,
        orientation: Orientation,
        ink: Ink,
    },
    /// Filled rectangle anchored at its top-left corner.
    LabelBox {
        origin: PixelPoint,
        width: f64,
        height: f64,
        ink: Ink,
    },
}

/// Output of one layout pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GraphFrame {
    pub commands: Vec<DrawCommand>,
    pub points: Vec<GraphPoint>,
    pub hover: Option<GraphPoint>,
}

impl GraphFrame {
    fn cleared() -> Self {
        Self {
            commands: vec![DrawCommand::Clear],
            ..Self::default()
        }
    }
}

/// Maps seconds and solve indices into the padded drawable span.
#[derive(Debug, Clone, Copy)]
struct Scale {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    min_sec: f64,
    range_sec: f64,
}

impl Scale {
    fn new(viewport: Viewport, min_ms: f64, max_ms: f64) -> Option<Self> {
        let width = viewport.width - PADDING_PX * 2.0;
        let height = viewport.height - PADDING_PX * 2.0;
        if !(width > 0.0 && height > 0.0) {
            return None;
        }

        let min_sec = (min_ms / 1000.0).floor();
        let max_sec = (max_ms / 1000.0).ceil();

        Some(Self {
            left: PADDING_PX,
            top: PADDING_PX,
            width,
            height,
            min_sec,
            range_sec: (max_sec - min_sec).max(1.0),
        })
    }

    fn y_for_ms(&self, ms: f64) -> f64 {
        self.y_for_step((ms / 1000.0 - self.min_sec) / self.range_sec)
    }

    /// `fraction` 0 is the bottom of the span, 1 the top.
    fn y_for_step(&self, fraction: f64) -> f64 {
        self.top + self.height - fraction * self.height
    }

    fn x_for_index(&self, index: usize, count: usize) -> f64 {
        if count == 1 {
            self.left + self.width / 2.0
        } else {
            self.left + index as f64 / (count - 1) as f64 * self.width
        }
    }

    fn right(&self) -> f64 {
        self.left + self.width
    }
}

/// Lay out one frame of the graph.
///
/// An empty history, or a viewport with no room left inside the padding,
/// produces a frame holding only [`DrawCommand::Clear`].
pub fn layout(history: &[f64], viewport: Viewport, pointer: Option<PixelPoint>) -> GraphFrame {
    if !viewport.has_area() {
        return GraphFrame::cleared();
    }
    let Some((min_ms, max_ms)) = bounds(history) else {
        return GraphFrame::cleared();
    };
    let Some(scale) = Scale::new(viewport, min_ms, max_ms) else {
        return GraphFrame::cleared();
    };

    let points: Vec<GraphPoint> = history
        .iter()
        .enumerate()
        .map(|(index, &duration)| GraphPoint {
            x: scale.x_for_index(index, history.len()),
            y: scale.y_for_ms(duration),
            duration,
            index,
        })
        .collect();
    let hover = pointer.and_then(|p| hit_test(&points, p));

    let mut commands = vec![DrawCommand::Clear];

    let steps = scale.range_sec as usize;
    for step in 0..=steps {
        let y = scale.y_for_step(step as f64 / scale.range_sec);
        commands.push(DrawCommand::Text {
            at: PixelPoint::new(Y_LABEL_X_PX, y + Y_LABEL_DROP_PX),
            text: format!("{}s", scale.min_sec as i64 + step as i64),
            orientation: Orientation::Horizontal,
            ink: Ink::Label,
        });
        commands.push(DrawCommand::Line {
            from: PixelPoint::new(scale.left, y),
            to: PixelPoint::new(scale.right(), y),
            stroke: Stroke::Solid,
            ink: Ink::Grid,
        });
    }

    commands.push(DrawCommand::Polyline {
        points: points.iter().map(GraphPoint::position).collect(),
        ink: Ink::Trend,
    });

    if let Some(average) = mean(history) {
        let y = scale.y_for_ms(average);
        commands.push(DrawCommand::Line {
            from: PixelPoint::new(scale.left, y),
            to: PixelPoint::new(scale.right(), y),
            stroke: Stroke::Dashed {
                on: AVERAGE_DASH_PX.0,
                off: AVERAGE_DASH_PX.1,
            },
            ink: Ink::Average,
        });
        commands.push(DrawCommand::Text {
            at: PixelPoint::new(
                scale.right() - AVERAGE_LABEL_INSET_PX,
                y - AVERAGE_LABEL_RISE_PX,
            ),
            text: format!("Avg: {}", format_duration(average)),
            orientation: Orientation::Horizontal,
            ink: Ink::Average,
        });
    }

    for point in &points {
        let hovered = hover.is_some_and(|h| h.index == point.index);
        commands.push(DrawCommand::Marker {
            center: point.position(),
            radius: if hovered {
                HOVER_MARKER_RADIUS_PX
            } else {
                MARKER_RADIUS_PX
            },
            ink: Ink::Marker,
        });
    }

    commands.push(DrawCommand::Text {
        at: PixelPoint::new(TIME_CAPTION_X_PX, viewport.height / 2.0),
        text: TIME_CAPTION.to_string(),
        orientation: Orientation::Vertical,
        ink: Ink::Label,
    });
    commands.push(DrawCommand::Text {
        at: PixelPoint::new(
            viewport.width / 2.0 - SOLVE_CAPTION_OFFSET_PX.0,
            viewport.height - SOLVE_CAPTION_OFFSET_PX.1,
        ),
        text: SOLVE_CAPTION.to_string(),
        orientation: Orientation::Horizontal,
        ink: Ink::Label,
    });

    if let Some(target) = hover {
        commands.push(DrawCommand::LabelBox {
            origin: PixelPoint::new(
                target.x + TOOLTIP_OFFSET_PX.0,
                target.y - TOOLTIP_OFFSET_PX.1,
            ),
            width: TOOLTIP_SIZE_PX.0,
            height: TOOLTIP_SIZE_PX.1,
            ink: Ink::TooltipBackground,
        });
        commands.push(DrawCommand::Text {
            at: PixelPoint::new(
                target.x + TOOLTIP_TEXT_OFFSET_PX.0,
                target.y - TOOLTIP_TEXT_OFFSET_PX.1,
            ),
            text: format_duration(target.duration),
            orientation: Orientation::Horizontal,
            ink: Ink::TooltipText,
        });
    }

    GraphFrame {
        commands,
        points,
        hover,
    }
}

/// First point, in layout order, strictly within [`HIT_RADIUS_PX`].
pub fn hit_test(points: &[GraphPoint], pointer: PixelPoint) -> Option<GraphPoint> {
    points
        .iter()
        .find(|p| p.position().distance(pointer) < HIT_RADIUS_PX)
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEW: Viewport = Viewport {
        width: 496.0,
        height: 296.0,
    };
    // drawable span is 400 x 200 starting at (48, 48)

    fn markers(frame: &GraphFrame) -> Vec<(PixelPoint, f64)> {
        frame
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Marker { center, radius, .. } => Some((*center, *radius)),
                _ => None,
            })
            .collect()
    }

    fn texts(frame: &GraphFrame) -> Vec<String> {
        frame
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_empty_history_only_clears() {
        let frame = layout(&[], VIEW, Some(PixelPoint::new(10.0, 10.0)));

        assert_eq!(frame.commands, vec![DrawCommand::Clear]);
        assert!(frame.points.is_empty());
        assert_eq!(frame.hover, None);
    }

    #[test]
    fn test_zero_area_viewport_only_clears() {
        let frame = layout(&[1000.0], Viewport::new(0.0, 300.0), None);
        assert_eq!(frame.commands, vec![DrawCommand::Clear]);

        let frame = layout(&[1000.0], Viewport::new(300.0, 0.0), None);
        assert_eq!(frame.commands, vec![DrawCommand::Clear]);
    }

    #[test]
    fn test_viewport_inside_padding_only_clears() {
        let frame = layout(&[1000.0], Viewport::new(96.0, 200.0), None);
        assert_eq!(frame.commands, vec![DrawCommand::Clear]);
    }

    #[test]
    fn test_single_point_is_centered() {
        let frame = layout(&[12345.0], VIEW, None);

        assert_eq!(frame.points.len(), 1);
        assert_eq!(frame.points[0].x, 48.0 + 200.0);
    }

    #[test]
    fn test_points_spread_evenly() {
        let history = [12345.0, 10000.0, 15500.0, 11000.0, 9000.0];
        let frame = layout(&history, VIEW, None);

        let n = history.len();
        for (i, point) in frame.points.iter().enumerate() {
            let expected = 48.0 + i as f64 / (n - 1) as f64 * 400.0;
            assert!((point.x - expected).abs() < 1e-9);
            assert_eq!(point.index, i);
            assert_eq!(point.duration, history[i]);
        }
        assert_eq!(frame.points[0].x, 48.0);
        assert_eq!(frame.points[n - 1].x, 448.0);
    }

    #[test]
    fn test_y_axis_is_inverted_seconds() {
        // 10.0s .. 16s, range 6
        let frame = layout(&[10000.0, 16000.0, 13000.0], VIEW, None);

        let bottom = 48.0 + 200.0;
        assert_eq!(frame.points[0].y, bottom);
        assert_eq!(frame.points[1].y, 48.0);
        assert!((frame.points[2].y - (bottom - 0.5 * 200.0)).abs() < 1e-9);
    }

    #[test]
    fn test_gridlines_one_per_second() {
        let frame = layout(&[10000.0, 12500.0], VIEW, None);

        let labels: Vec<String> = texts(&frame)
            .into_iter()
            .filter(|t| t.ends_with('s') && !t.starts_with("Avg"))
            .collect();
        assert_eq!(labels, vec!["10s", "11s", "12s", "13s"]);

        let grid_lines = frame
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { ink: Ink::Grid, .. }))
            .count();
        assert_eq!(grid_lines, 4);
    }

    #[test]
    fn test_zero_range_is_treated_as_one_second() {
        let frame = layout(&[12000.0, 12000.0], VIEW, None);

        for point in &frame.points {
            assert!(point.y.is_finite());
            assert_eq!(point.y, 48.0 + 200.0);
        }
        let labels: Vec<String> = texts(&frame)
            .into_iter()
            .filter(|t| t.ends_with('s') && !t.starts_with("Avg"))
            .collect();
        assert_eq!(labels, vec!["12s", "13s"]);
    }

    #[test]
    fn test_polyline_follows_history_order() {
        let history = [3000.0, 1000.0, 2000.0];
        let frame = layout(&history, VIEW, None);

        let polyline = frame
            .commands
            .iter()
            .find_map(|c| match c {
                DrawCommand::Polyline { points, .. } => Some(points.clone()),
                _ => None,
            })
            .expect("polyline");
        let expected: Vec<PixelPoint> = frame.points.iter().map(GraphPoint::position).collect();
        assert_eq!(polyline, expected);
    }

    #[test]
    fn test_average_line_and_label() {
        let frame = layout(&[12345.0, 10000.0, 15500.0], VIEW, None);

        let dashed = frame.commands.iter().find_map(|c| match c {
            DrawCommand::Line {
                from,
                to,
                stroke: Stroke::Dashed { on, off },
                ink: Ink::Average,
            } => Some((*from, *to, *on, *off)),
            _ => None,
        });
        let (from, to, on, off) = dashed.expect("average line");
        assert_eq!(from.y, to.y);
        assert_eq!((from.x, to.x), (48.0, 448.0));
        assert_eq!((on, off), AVERAGE_DASH_PX);

        assert!(texts(&frame).contains(&"Avg: 0:12.61".to_string()));
    }

    #[test]
    fn test_captions_present() {
        let frame = layout(&[5000.0], VIEW, None);

        assert!(frame.commands.iter().any(|c| matches!(
            c,
            DrawCommand::Text { text, orientation: Orientation::Vertical, .. } if text == TIME_CAPTION
        )));
        assert!(texts(&frame).contains(&SOLVE_CAPTION.to_string()));
    }

    #[test]
    fn test_pointer_on_point_hovers_it() {
        let history = [12345.0, 10000.0, 15500.0];
        let plain = layout(&history, VIEW, None);

        for point in &plain.points {
            let frame = layout(&history, VIEW, Some(point.position()));
            assert_eq!(frame.hover.map(|h| h.index), Some(point.index));
        }
    }

    #[test]
    fn test_hovered_marker_is_larger() {
        let history = [12345.0, 10000.0, 15500.0];
        let target = layout(&history, VIEW, None).points[1];

        let frame = layout(&history, VIEW, Some(target.position()));
        let radii: Vec<f64> = markers(&frame).into_iter().map(|(_, r)| r).collect();
        assert_eq!(
            radii,
            vec![MARKER_RADIUS_PX, HOVER_MARKER_RADIUS_PX, MARKER_RADIUS_PX]
        );
    }

    #[test]
    fn test_tooltip_shows_hovered_duration() {
        let history = [12345.0, 10000.0];
        let target = layout(&history, VIEW, None).points[0];

        let frame = layout(&history, VIEW, Some(target.position()));
        assert!(frame.commands.iter().any(|c| matches!(
            c,
            DrawCommand::LabelBox { origin, .. } if *origin == PixelPoint::new(target.x + 8.0, target.y - 24.0)
        )));
        assert_eq!(texts(&frame).last().map(String::as_str), Some("0:12.34"));
    }

    #[test]
    fn test_pointer_far_away_hovers_nothing() {
        let frame = layout(&[12345.0, 10000.0], VIEW, Some(PixelPoint::new(0.0, 0.0)));

        assert_eq!(frame.hover, None);
        assert!(markers(&frame).iter().all(|(_, r)| *r == MARKER_RADIUS_PX));
        assert!(!frame
            .commands
            .iter()
            .any(|c| matches!(c, DrawCommand::LabelBox { .. })));
    }

    #[test]
    fn test_hit_radius_is_strict() {
        let point = GraphPoint {
            x: 100.0,
            y: 100.0,
            duration: 1.0,
            index: 0,
        };

        assert!(hit_test(&[point], PixelPoint::new(105.9, 100.0)).is_some());
        assert!(hit_test(&[point], PixelPoint::new(106.0, 100.0)).is_none());
        assert!(hit_test(&[point], PixelPoint::new(103.0, 104.0)).is_some());
    }

    #[test]
    fn test_hit_test_prefers_first_point() {
        let first = GraphPoint {
            x: 10.0,
            y: 10.0,
            duration: 1.0,
            index: 0,
        };
        let second = GraphPoint {
            x: 12.0,
            y: 10.0,
            duration: 2.0,
            index: 1,
        };

        let hit = hit_test(&[first, second], PixelPoint::new(12.0, 10.0));
        assert_eq!(hit, Some(first));
    }

    #[test]
    fn test_resize_never_uses_stale_points() {
        let history = [12345.0, 10000.0, 15500.0];
        let old = layout(&history, VIEW, None).points[2];

        // Same pointer on a much smaller surface: points moved away
        let frame = layout(&history, Viewport::new(200.0, 150.0), Some(old.position()));
        assert_eq!(frame.hover, None);
    }
}
