//! Shape definitions for the layout surface.

mod line;
mod rectangle;
mod symbol;

pub use line::{ARROW_HEAD_ANGLE, ARROW_HEAD_LENGTH, arrowhead};
pub use rectangle::normalized_rect;
pub use symbol::{SymbolGlyph, symbol_glyph};

use kurbo::{Point, Rect};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    /// Default pipe ink (`#111827`).
    pub const fn ink() -> Self {
        Self::new(0x11, 0x18, 0x27, 255)
    }

    /// Parse a `#rrggbb` or `#rrggbbaa` color as produced by a color picker.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().strip_prefix('#')?;
        let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
        match digits.len() {
            6 => Some(Self::new(channel(0)?, channel(2)?, channel(4)?, 255)),
            8 => Some(Self::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    /// Format as `#rrggbb` (alpha is dropped when opaque).
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Style properties for shapes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Stroke color.
    pub stroke_color: SerializableColor,
    /// Stroke width in pixels, always within [`ShapeStyle::MIN_WIDTH`, `ShapeStyle::MAX_WIDTH`].
    #[serde(deserialize_with = "deserialize_width")]
    stroke_width: f64,
}

impl ShapeStyle {
    pub const MIN_WIDTH: f64 = 1.0;
    pub const MAX_WIDTH: f64 = 6.0;

    pub fn new(stroke_color: SerializableColor, stroke_width: f64) -> Self {
        Self {
            stroke_color,
            stroke_width: Self::clamp_width(stroke_width),
        }
    }

    pub fn stroke_width(&self) -> f64 {
        self.stroke_width
    }

    /// Set the stroke width, clamped to the slider range.
    pub fn set_stroke_width(&mut self, width: f64) {
        self.stroke_width = Self::clamp_width(width);
    }

    /// Get the stroke color as a peniko Color.
    pub fn stroke(&self) -> Color {
        self.stroke_color.into()
    }

    fn clamp_width(width: f64) -> f64 {
        if width.is_finite() {
            width.clamp(Self::MIN_WIDTH, Self::MAX_WIDTH)
        } else {
            log::warn!("Non-finite stroke width {width}, using minimum");
            Self::MIN_WIDTH
        }
    }
}

fn deserialize_width<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    f64::deserialize(deserializer).map(ShapeStyle::clamp_width)
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self::new(SerializableColor::ink(), 2.0)
    }
}

/// Field equipment drawn as a fixed-size glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolVariant {
    /// "Y" glyph.
    #[default]
    Sprinkler,
    /// Small square outline.
    Valve,
}

/// The primitive a shape draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Pipe run with a direction arrowhead at `end`.
    Line,
    /// Field boundary outline.
    Rectangle,
    /// Equipment glyph anchored at `end`.
    Symbol(SymbolVariant),
}

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// One drawn primitive.
///
/// Fields are read-only once constructed; an edit produces a new `Shape`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    id: ShapeId,
    kind: ShapeKind,
    style: ShapeStyle,
    start: Point,
    end: Point,
}

impl Shape {
    /// Create a new shape.
    pub fn new(kind: ShapeKind, style: ShapeStyle, start: Point, end: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            style,
            start,
            end,
        }
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn style(&self) -> &ShapeStyle {
        &self.style
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    /// The same shape with a different end point.
    pub fn with_end(&self, end: Point) -> Self {
        Self { end, ..self.clone() }
    }

    /// Check whether start and end coincide.
    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }

    /// Get the bounding box of the drawn geometry (stroke width excluded).
    pub fn bounds(&self) -> Rect {
        match self.kind {
            ShapeKind::Line => {
                let [a, b] = arrowhead(self.start, self.end, ARROW_HEAD_LENGTH, ARROW_HEAD_ANGLE);
                [a.p1, b.p1]
                    .into_iter()
                    .fold(normalized_rect(self.start, self.end), |r, p| r.union_pt(p))
            }
            ShapeKind::Rectangle => normalized_rect(self.start, self.end),
            ShapeKind::Symbol(variant) => symbol_glyph(variant, self.end).bounds(),
        }
    }
}
