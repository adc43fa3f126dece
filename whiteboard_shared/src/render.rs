//! Turns strokes into canvas drawing instructions.
//!
//! Nothing here talks to a real canvas, so the web client only has to replay
//! [`PathCommand`]s against a 2D context.

use crate::shared_types::{Point, Stroke, Tool};

/// Spline tension applied to every stroke.
pub const STROKE_TENSION: f64 = 0.5;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CompositeOp {
    SourceOver,
    /// Removes the pixels underneath instead of painting color.
    DestinationOut,
}

impl CompositeOp {
    /// The name a 2D canvas context expects for `globalCompositeOperation`.
    pub fn as_canvas_str(self) -> &'static str {
        match self {
            CompositeOp::SourceOver => "source-over",
            CompositeOp::DestinationOut => "destination-out",
        }
    }
}

impl From<Tool> for CompositeOp {
    fn from(tool: Tool) -> Self {
        match tool {
            Tool::Pen => CompositeOp::SourceOver,
            Tool::Eraser => CompositeOp::DestinationOut,
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct StrokeStyle<'a> {
    pub color: &'a str,
    pub width: f64,
    pub composite: CompositeOp,
}

impl<'a> StrokeStyle<'a> {
    pub fn of(stroke: &'a Stroke) -> Self {
        Self {
            color: &stroke.color,
            width: stroke.effective_width(),
            composite: stroke.tool.into(),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    QuadTo { control: Point, to: Point },
    CubicTo { c1: Point, c2: Point, to: Point },
}

/// Builds the path for `points`, smoothed as a cardinal spline with `tension`.
///
/// A single point yields a zero-length line so round caps draw a dot. Two
/// points, or a zero tension, yield a plain polyline.
pub fn path_commands(points: &[Point], tension: f64) -> Vec<PathCommand> {
    let Some((&first, rest)) = points.split_first() else {
        return Vec::new();
    };

    let mut commands = Vec::with_capacity(points.len() + 1);
    commands.push(PathCommand::MoveTo(first));

    if rest.is_empty() {
        commands.push(PathCommand::LineTo(first));
        return commands;
    }

    if points.len() == 2 || tension == 0.0 {
        commands.extend(rest.iter().copied().map(PathCommand::LineTo));
        return commands;
    }

    // One (incoming, outgoing) control pair per interior point.
    let controls: Vec<(Point, Point)> = points
        .windows(3)
        .map(|w| control_points(w[0], w[1], w[2], tension))
        .collect();

    commands.push(PathCommand::QuadTo {
        control: controls[0].0,
        to: points[1],
    });
    for (i, pair) in controls.windows(2).enumerate() {
        commands.push(PathCommand::CubicTo {
            c1: pair[0].1,
            c2: pair[1].0,
            to: points[i + 2],
        });
    }
    let last = controls[controls.len() - 1].1;
    commands.push(PathCommand::QuadTo {
        control: last,
        to: points[points.len() - 1],
    });

    commands
}

/// Control points around `p1`, scaled by the distance to each neighbour.
fn control_points(p0: Point, p1: Point, p2: Point, tension: f64) -> (Point, Point) {
    let d01 = (p1.x - p0.x).hypot(p1.y - p0.y);
    let d12 = (p2.x - p1.x).hypot(p2.y - p1.y);
    let total = d01 + d12;
    if total == 0.0 {
        return (p1, p1);
    }

    let fa = tension * d01 / total;
    let fb = tension * d12 / total;
    let dx = p2.x - p0.x;
    let dy = p2.y - p0.y;
    (
        Point::new(p1.x - fa * dx, p1.y - fa * dy),
        Point::new(p1.x + fb * dx, p1.y + fb * dy),
    )
}

/// Path for a stroke at the standard tension.
pub fn stroke_path(stroke: &Stroke) -> Vec<PathCommand> {
    let points: Vec<Point> = stroke.iter_points().collect();
    path_commands(&points, STROKE_TENSION)
}
