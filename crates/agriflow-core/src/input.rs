//! Pointer input consumed by the drawing session.

use crate::shapes::Shape;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Pointer event with a surface-local position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point },
    Move { position: Point },
    Up { position: Point },
    /// The pointer left the drawing surface.
    Leave { position: Point },
}

impl PointerEvent {
    pub fn position(&self) -> Point {
        match *self {
            PointerEvent::Down { position }
            | PointerEvent::Move { position }
            | PointerEvent::Up { position }
            | PointerEvent::Leave { position } => position,
        }
    }
}

/// What the caller has to do after an event was handled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionResponse {
    /// The surface must be redrawn.
    pub redraw: bool,
    /// Shape appended to the store by this event.
    pub committed: Option<Shape>,
}

impl SessionResponse {
    pub(crate) fn none() -> Self {
        Self::default()
    }

    pub(crate) fn redraw() -> Self {
        Self {
            redraw: true,
            committed: None,
        }
    }

    pub(crate) fn committed(shape: Shape) -> Self {
        Self {
            redraw: true,
            committed: Some(shape),
        }
    }
}
