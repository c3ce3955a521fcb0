//! Tool system and the drag-to-draw session.

use crate::input::{PointerEvent, SessionResponse};
use crate::shapes::{SerializableColor, Shape, ShapeKind, ShapeStyle, SymbolVariant};
use crate::store::ShapeStore;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    /// Pipe run.
    #[default]
    Line,
    /// Field outline.
    Rectangle,
    /// Sprinkler or valve glyph.
    Symbol,
    /// No-draw mode.
    Pan,
}

impl ToolKind {
    /// Shape kind this tool produces, or `None` for the no-draw tool.
    pub fn shape_kind(self, variant: SymbolVariant) -> Option<ShapeKind> {
        match self {
            ToolKind::Line => Some(ShapeKind::Line),
            ToolKind::Rectangle => Some(ShapeKind::Rectangle),
            ToolKind::Symbol => Some(ShapeKind::Symbol(variant)),
            ToolKind::Pan => None,
        }
    }
}

/// Session-scoped tool and style selection.
///
/// Applied when a gesture starts; committed shapes never change when these
/// settings do.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ToolSettings {
    pub tool: ToolKind,
    pub style: ShapeStyle,
    pub symbol_variant: SymbolVariant,
}

/// State of the drawing gesture.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DrawState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Pointer is held down; the candidate follows the pointer.
    Dragging { candidate: Shape },
}

/// Interprets pointer drags into shapes and commits them to the store.
#[derive(Debug, Clone, Default)]
pub struct DrawSession {
    settings: ToolSettings,
    state: DrawState,
    store: ShapeStore,
}

impl DrawSession {
    /// Create a session with default settings and an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session over an existing store (e.g. a restored layout).
    pub fn with_store(store: ShapeStore) -> Self {
        Self {
            store,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> &ToolSettings {
        &self.settings
    }

    pub fn state(&self) -> &DrawState {
        &self.state
    }

    /// Committed shapes.
    pub fn store(&self) -> &ShapeStore {
        &self.store
    }

    /// The uncommitted shape being dragged, if any.
    pub fn candidate(&self) -> Option<&Shape> {
        match &self.state {
            DrawState::Dragging { candidate } => Some(candidate),
            DrawState::Idle => None,
        }
    }

    /// Check if a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DrawState::Dragging { .. })
    }

    /// Set the current tool.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.settings.tool = tool;
    }

    pub fn set_stroke_color(&mut self, color: SerializableColor) {
        self.settings.style.stroke_color = color;
    }

    /// Set the stroke width (clamped to 1..=6).
    pub fn set_stroke_width(&mut self, width: f64) {
        self.settings.style.set_stroke_width(width);
    }

    pub fn set_symbol_variant(&mut self, variant: SymbolVariant) {
        self.settings.symbol_variant = variant;
    }

    /// Dispatch a pointer event.
    pub fn handle(&mut self, event: PointerEvent) -> SessionResponse {
        match event {
            PointerEvent::Down { position } => {
                if self.pointer_down(position) {
                    SessionResponse::redraw()
                } else {
                    SessionResponse::none()
                }
            }
            PointerEvent::Move { position } => {
                if self.pointer_move(position) {
                    SessionResponse::redraw()
                } else {
                    SessionResponse::none()
                }
            }
            PointerEvent::Up { position } => self.finish(position),
            PointerEvent::Leave { position } => self.finish(position),
        }
    }

    /// Begin a gesture. Returns `false` when the active tool does not draw.
    ///
    /// A pointer-down during an unfinished drag restarts the gesture.
    pub fn pointer_down(&mut self, position: Point) -> bool {
        let Some(kind) = self
            .settings
            .tool
            .shape_kind(self.settings.symbol_variant)
        else {
            return false;
        };
        if self.is_dragging() {
            log::debug!("Restarting unfinished drag at {position:?}");
        }
        self.state = DrawState::Dragging {
            candidate: Shape::new(kind, self.settings.style, position, position),
        };
        true
    }

    /// Move the candidate's end point. Returns `true` when a redraw is needed.
    pub fn pointer_move(&mut self, position: Point) -> bool {
        match &mut self.state {
            DrawState::Dragging { candidate } => {
                *candidate = candidate.with_end(position);
                true
            }
            DrawState::Idle => false,
        }
    }

    /// Release the pointer at `position`, committing the candidate.
    pub fn pointer_up(&mut self, position: Point) -> Option<Shape> {
        self.finish(position).committed
    }

    /// The pointer left the surface; same effect as releasing it there.
    pub fn pointer_leave(&mut self, position: Point) -> Option<Shape> {
        self.finish(position).committed
    }

    fn finish(&mut self, position: Point) -> SessionResponse {
        match std::mem::take(&mut self.state) {
            DrawState::Dragging { candidate } => {
                let shape = candidate.with_end(position);
                log::debug!("Committing {:?} shape {}", shape.kind(), shape.id());
                self.store = self.store.append(shape.clone());
                SessionResponse::committed(shape)
            }
            DrawState::Idle => SessionResponse::none(),
        }
    }

    /// Remove the most recently committed shape.
    pub fn undo(&mut self) -> SessionResponse {
        self.store = self.store.undo();
        SessionResponse::redraw()
    }

    /// Remove every committed shape.
    pub fn clear(&mut self) -> SessionResponse {
        self.store = ShapeStore::clear();
        SessionResponse::redraw()
    }
}
