use serde::{Deserialize, Serialize};

use crate::theme::ThemeToken;
use crate::types::{Point, Rect};

/// A single, stateless render instruction.
///
/// The core emits a `Vec<RenderCommand>` for a chart. Renderers consume
/// this list sequentially; each command carries all the data it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderCommand {
    /// Draw a filled rectangle, optionally with a text label and a reference
    /// to the record it represents (for hit-testing / activation).
    DrawRect {
        rect: Rect,
        color: ThemeToken,
        opacity: f32,
        corner_radius: f64,
        label: Option<String>,
        record: Option<RecordRef>,
    },

    /// Draw a text string at a position.
    DrawText {
        position: Point,
        text: String,
        color: ThemeToken,
        font_size: f64,
        bold: bool,
        align: TextAlign,
    },

    /// Draw a line segment. `dash` is `(on, off)` in pixels; `None` is solid.
    DrawLine {
        from: Point,
        to: Point,
        color: ThemeToken,
        width: f64,
        dash: Option<(f64, f64)>,
    },

    /// Push a translation (applied to all subsequent commands until the
    /// matching `PopTransform`).
    PushTransform { translate: Point },

    /// Pop the most recent transform.
    PopTransform,

    /// Begin a logical group (e.g. a chart layer). Renderers may use this for
    /// batching or layer separation.
    BeginGroup { id: String, label: Option<String> },

    /// End the current group.
    EndGroup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Which kind of timed record a bar was projected from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    Status,
    Order,
    Maintenance,
}

/// Identifies the record behind a drawn bar. Ids are only unique within a
/// kind, so both halves are needed to look the record up again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordRef {
    pub kind: RecordKind,
    pub id: u64,
}

impl RecordRef {
    pub fn new(kind: RecordKind, id: u64) -> Self {
        Self { kind, id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_serializes_with_record_ref() {
        let cmd = RenderCommand::DrawRect {
            rect: Rect::new(1.0, 2.0, 3.0, 4.0),
            color: ThemeToken::OrderCompleted,
            opacity: 1.0,
            corner_radius: 4.0,
            label: Some("P-100 (5/10)".into()),
            record: Some(RecordRef::new(RecordKind::Order, 7)),
        };
        let json = serde_json::to_string(&cmd).unwrap_or_default();
        assert!(json.contains("\"DrawRect\""));
        assert!(json.contains("\"kind\":\"Order\""));
        let back: Option<RenderCommand> = serde_json::from_str(&json).ok();
        assert_eq!(back, Some(cmd));
    }
}
