//! Equipment glyph geometry.
//!
//! Glyphs have a fixed pixel size and are centred on their anchor; only the
//! stroke thickness follows the shape style.

use super::SymbolVariant;
use kurbo::{Line, Point, Rect, Vec2};

/// Half-length of the sprinkler stem.
const STEM_HALF: f64 = 11.0;
/// Offset of the arm fork above the anchor.
const FORK_RISE: f64 = 3.0;
/// Horizontal and vertical reach of each sprinkler arm.
const ARM_REACH: f64 = 8.0;
/// Half-side of the valve square.
const VALVE_HALF: f64 = 6.0;

/// Resolved geometry of a symbol glyph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SymbolGlyph {
    /// Stem plus two arms forming a "Y".
    Sprinkler { stem: Line, arms: [Line; 2] },
    /// Square outline.
    Valve { square: Rect },
}

impl SymbolGlyph {
    /// Bounding box of the glyph strokes.
    pub fn bounds(&self) -> Rect {
        match self {
            SymbolGlyph::Sprinkler { stem, arms } => arms
                .iter()
                .flat_map(|arm| [arm.p0, arm.p1])
                .fold(Rect::from_points(stem.p0, stem.p1), |r, p| r.union_pt(p)),
            SymbolGlyph::Valve { square } => *square,
        }
    }

    /// The point the glyph is centred on.
    pub fn anchor(&self) -> Point {
        self.bounds().center()
    }
}

/// Build the glyph for `variant` centred on `anchor`.
pub fn symbol_glyph(variant: SymbolVariant, anchor: Point) -> SymbolGlyph {
    match variant {
        SymbolVariant::Sprinkler => {
            let fork = anchor - Vec2::new(0.0, FORK_RISE);
            let arm = |dx: f64| {
                Line::new(fork, Point::new(fork.x + dx, fork.y + ARM_REACH))
            };
            SymbolGlyph::Sprinkler {
                stem: Line::new(
                    anchor - Vec2::new(0.0, STEM_HALF),
                    anchor + Vec2::new(0.0, STEM_HALF),
                ),
                arms: [arm(-ARM_REACH), arm(ARM_REACH)],
            }
        }
        SymbolVariant::Valve => SymbolGlyph::Valve {
            square: Rect::from_center_size(anchor, (VALVE_HALF * 2.0, VALVE_HALF * 2.0)),
        },
    }
}
