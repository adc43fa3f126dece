use serde::{Deserialize, Serialize};

use crate::error::WireError;

/// Width used for a pen stroke that carries no usable width.
pub const DEFAULT_PEN_WIDTH: f64 = 5.0;
/// Width used for an eraser stroke that carries no usable width.
pub const DEFAULT_ERASER_WIDTH: f64 = 20.0;

/// A position on the canvas, in canvas pixels.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The drawing tool a stroke was made with.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Pen,
    Eraser,
}

impl Tool {
    pub fn default_width(self) -> f64 {
        match self {
            Tool::Pen => DEFAULT_PEN_WIDTH,
            Tool::Eraser => DEFAULT_ERASER_WIDTH,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tool::Pen => "pen",
            Tool::Eraser => "eraser",
        }
    }
}

impl std::fmt::Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Tool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pen" => Ok(Tool::Pen),
            "eraser" => Ok(Tool::Eraser),
            other => Err(format!("unknown tool '{other}', expected 'pen' or 'eraser'")),
        }
    }
}

// A single freehand stroke. `points` is flattened as x0, y0, x1, y1, ...
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Stroke {
    pub points: Vec<f64>,
    pub color: String,
    pub tool: Tool,
    #[serde(default)]
    pub stroke_width: f64,
}

impl Stroke {
    pub fn new(start: Point, tool: Tool, color: impl Into<String>, stroke_width: f64) -> Self {
        Self {
            points: vec![start.x, start.y],
            color: color.into(),
            tool,
            stroke_width,
        }
    }

    pub(crate) fn push(&mut self, point: Point) {
        self.points.push(point.x);
        self.points.push(point.y);
    }

    /// Number of complete coordinate pairs. A dangling trailing scalar is not counted.
    pub fn point_count(&self) -> usize {
        self.points.len() / 2
    }

    pub fn is_committed(&self) -> bool {
        self.point_count() > 0
    }

    /// Complete coordinate pairs in drawing order.
    pub fn iter_points(&self) -> impl Iterator<Item = Point> + '_ {
        self.points
            .chunks_exact(2)
            .map(|pair| Point::new(pair[0], pair[1]))
    }

    /// The width to render with: the stroke's own width when it is a usable
    /// positive number, otherwise the tool default.
    pub fn effective_width(&self) -> f64 {
        if self.stroke_width.is_finite() && self.stroke_width > 0.0 {
            self.stroke_width
        } else {
            self.tool.default_width()
        }
    }
}

/// Message format for WebSocket communication.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(tag = "event", content = "data")]
pub enum WsMessage {
    #[serde(rename = "drawing")]
    Drawing(Stroke),
    #[serde(rename = "clearWhiteboard")]
    ClearWhiteboard,
}

impl WsMessage {
    pub fn kind(&self) -> EventKind {
        match self {
            WsMessage::Drawing(_) => EventKind::Drawing,
            WsMessage::ClearWhiteboard => EventKind::ClearWhiteboard,
        }
    }

    pub fn to_frame(&self) -> Result<String, WireError> {
        serde_json::to_string(self).map_err(WireError::Encode)
    }

    pub fn from_frame(frame: &str) -> Result<Self, WireError> {
        serde_json::from_str(frame).map_err(WireError::Decode)
    }
}

/// Event names carried on the channel.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EventKind {
    Drawing,
    ClearWhiteboard,
}

impl EventKind {
    pub fn name(self) -> &'static str {
        match self {
            EventKind::Drawing => "drawing",
            EventKind::ClearWhiteboard => "clearWhiteboard",
        }
    }

    /// Classifies a text frame by its `event` field only, leaving the payload untouched.
    pub fn of_frame(frame: &str) -> Result<Self, WireError> {
        #[derive(Deserialize)]
        struct Envelope {
            event: String,
        }

        let envelope: Envelope = serde_json::from_str(frame).map_err(WireError::Decode)?;
        match envelope.event.as_str() {
            "drawing" => Ok(EventKind::Drawing),
            "clearWhiteboard" => Ok(EventKind::ClearWhiteboard),
            _ => Err(WireError::UnknownEvent(envelope.event)),
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn drawing_frame_uses_wire_field_names() {
        let stroke = Stroke {
            points: vec![10.0, 10.0, 10.0, 50.0],
            color: "#ff0000".into(),
            tool: Tool::Pen,
            stroke_width: 5.0,
        };
        let frame = WsMessage::Drawing(stroke).to_frame().unwrap();
        let value: serde_json::Value = serde_json::from_str(&frame).unwrap();

        assert_eq!(value["event"], "drawing");
        assert_eq!(value["data"]["color"], "#ff0000");
        assert_eq!(value["data"]["tool"], "pen");
        assert_eq!(value["data"]["strokeWidth"].as_f64(), Some(5.0));
        assert_eq!(value["data"]["points"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn clear_frame_has_no_payload() {
        let frame = WsMessage::ClearWhiteboard.to_frame().unwrap();
        assert_eq!(frame, r#"{"event":"clearWhiteboard"}"#);
        assert_eq!(
            WsMessage::from_frame(&frame).unwrap(),
            WsMessage::ClearWhiteboard
        );
    }

    #[test]
    fn decodes_integer_coordinates_from_browser_clients() {
        let frame = json!({
            "event": "drawing",
            "data": {"points": [1, 2, 3, 4], "color": "#00ff00", "tool": "eraser", "strokeWidth": 12}
        })
        .to_string();

        match WsMessage::from_frame(&frame).unwrap() {
            WsMessage::Drawing(stroke) => {
                assert_eq!(stroke.points, vec![1.0, 2.0, 3.0, 4.0]);
                assert_eq!(stroke.tool, Tool::Eraser);
                assert_eq!(stroke.effective_width(), 12.0);
            }
            other => panic!("expected a drawing, got {other:?}"),
        }
    }

    #[test]
    fn missing_width_falls_back_to_tool_default() {
        let frame = r##"{"event":"drawing","data":{"points":[0,0],"color":"#fff","tool":"eraser"}}"##;
        let WsMessage::Drawing(stroke) = WsMessage::from_frame(frame).unwrap() else {
            panic!("expected a drawing");
        };
        assert_eq!(stroke.stroke_width, 0.0);
        assert_eq!(stroke.effective_width(), DEFAULT_ERASER_WIDTH);

        let pen = Stroke::new(Point::new(0.0, 0.0), Tool::Pen, "#000", f64::NAN);
        assert_eq!(pen.effective_width(), DEFAULT_PEN_WIDTH);
    }

    #[test]
    fn classifies_frames_without_touching_payload() {
        assert_eq!(
            EventKind::of_frame(r#"{"event":"drawing","data":{"anything":true}}"#).unwrap(),
            EventKind::Drawing
        );
        assert_eq!(
            EventKind::of_frame(r#"{"event":"drawing"}"#).unwrap(),
            EventKind::Drawing
        );
        assert_eq!(
            EventKind::of_frame(r#"{"data":1,"event":"clearWhiteboard"}"#).unwrap(),
            EventKind::ClearWhiteboard
        );
        assert!(matches!(
            EventKind::of_frame(r#"{"event":"cursor"}"#),
            Err(WireError::UnknownEvent(name)) if name == "cursor"
        ));
        assert!(matches!(
            EventKind::of_frame("not json"),
            Err(WireError::Decode(_))
        ));
    }

    #[test]
    fn odd_trailing_scalar_is_ignored() {
        let stroke = Stroke {
            points: vec![1.0, 2.0, 3.0],
            color: "#000000".into(),
            tool: Tool::Pen,
            stroke_width: 1.0,
        };
        assert_eq!(stroke.point_count(), 1);
        assert_eq!(stroke.iter_points().collect::<Vec<_>>(), vec![Point::new(1.0, 2.0)]);
    }

    #[test]
    fn tool_parses_from_cli_names() {
        assert_eq!("pen".parse::<Tool>(), Ok(Tool::Pen));
        assert_eq!("eraser".parse::<Tool>(), Ok(Tool::Eraser));
        assert!("brush".parse::<Tool>().is_err());
    }
}
