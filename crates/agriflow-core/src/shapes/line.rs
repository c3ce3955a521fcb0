//! Pipe line geometry.

use kurbo::{Line, Point};
use std::f64::consts::PI;

/// Arrowhead stroke length in pixels.
pub const ARROW_HEAD_LENGTH: f64 = 8.0;

/// Angle between each arrowhead stroke and the reversed line direction.
pub const ARROW_HEAD_ANGLE: f64 = PI / 6.0;

/// The two strokes of a direction arrowhead at `end`.
///
/// Each stroke starts at `end` and points back along the line, rotated by
/// `±angle`. Its length is fixed in pixels. A zero-length line points the
/// head along the negative x axis.
pub fn arrowhead(start: Point, end: Point, length: f64, angle: f64) -> [Line; 2] {
    let direction = (end.y - start.y).atan2(end.x - start.x);
    let barb = |offset: f64| {
        let theta = direction + offset;
        Line::new(
            end,
            Point::new(end.x - length * theta.cos(), end.y - length * theta.sin()),
        )
    };
    [barb(-angle), barb(angle)]
}
