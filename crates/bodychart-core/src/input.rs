//! Pointer input for the annotation surface.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Pointer event in on-screen display coordinates.
///
/// Mouse, pen and touch input are all reduced to this; the surface maps
/// positions into native canvas space itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerEvent {
    Down { position: Point },
    Move { position: Point },
    Up { position: Point },
    /// The pointer left the canvas.
    Leave,
}

impl PointerEvent {
    /// Display-space position carried by the event, if any.
    pub fn position(&self) -> Option<Point> {
        match self {
            PointerEvent::Down { position }
            | PointerEvent::Move { position }
            | PointerEvent::Up { position } => Some(*position),
            PointerEvent::Leave => None,
        }
    }
}

/// Pointer state machine phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerPhase {
    #[default]
    Idle,
    /// A stroke is in progress.
    Drawing,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position() {
        let p = Point::new(3.0, 4.0);
        assert_eq!(PointerEvent::Down { position: p }.position(), Some(p));
        assert_eq!(PointerEvent::Leave.position(), None);
    }

    #[test]
    fn test_event_json() {
        let event: PointerEvent =
            serde_json::from_str(r#"{ "type": "move", "position": { "x": 1.5, "y": 2.0 } }"#).unwrap();
        assert_eq!(event, PointerEvent::Move { position: Point::new(1.5, 2.0) });

        let leave: PointerEvent = serde_json::from_str(r#"{ "type": "leave" }"#).unwrap();
        assert_eq!(leave, PointerEvent::Leave);
    }
}
