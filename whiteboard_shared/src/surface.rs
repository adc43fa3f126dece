//! Client-side canvas state and the pointer gesture that feeds it.
//!
//! [`DrawingSurface`] never touches the network. Operations that have to
//! reach the relay hand back the [`WsMessage`] to send, and the caller owns
//! the channel.

use crate::shared_types::{Point, Stroke, Tool, WsMessage};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct DrawingSurface {
    strokes: Vec<Stroke>,
    /// Index of the stroke the current gesture is extending.
    active: Option<usize>,
}

impl DrawingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// All strokes in arrival order, own and remote.
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn is_drawing(&self) -> bool {
        self.active.is_some()
    }

    /// Starts a stroke at `position`.
    ///
    /// A gesture that was never ended (a lost pointer-up) is committed first,
    /// and its outbound message is returned so it still reaches the relay.
    pub fn begin_stroke(
        &mut self,
        position: Point,
        tool: Tool,
        color: impl Into<String>,
        stroke_width: f64,
    ) -> Option<WsMessage> {
        let pending = self.end_stroke();
        self.strokes
            .push(Stroke::new(position, tool, color, stroke_width));
        self.active = Some(self.strokes.len() - 1);
        pending
    }

    /// Appends `position` to the active stroke. Returns whether anything changed.
    pub fn extend_stroke(&mut self, position: Point) -> bool {
        match self.active.and_then(|index| self.strokes.get_mut(index)) {
            Some(stroke) => {
                stroke.push(position);
                true
            }
            None => false,
        }
    }

    /// Ends the gesture, yielding the finished stroke for transmission.
    ///
    /// Returns `None` when no gesture was active, so a stroke goes out at most once.
    pub fn end_stroke(&mut self) -> Option<WsMessage> {
        let index = self.active.take()?;
        self.strokes
            .get(index)
            .filter(|stroke| stroke.is_committed())
            .cloned()
            .map(WsMessage::Drawing)
    }

    pub fn on_remote_stroke(&mut self, stroke: Stroke) {
        self.strokes.push(stroke);
    }

    pub fn on_remote_clear(&mut self) {
        self.strokes.clear();
        self.active = None;
    }

    /// Clears locally right away and returns the clear-signal for the relay.
    pub fn request_clear(&mut self) -> WsMessage {
        self.on_remote_clear();
        WsMessage::ClearWhiteboard
    }

    /// Applies a message that arrived from the relay.
    pub fn apply_remote(&mut self, message: WsMessage) {
        match message {
            WsMessage::Drawing(stroke) => self.on_remote_stroke(stroke),
            WsMessage::ClearWhiteboard => self.on_remote_clear(),
        }
    }
}
