//! Field rectangle geometry.

use kurbo::{Point, Rect};

/// Axis-aligned rectangle spanned by two drag corners.
///
/// The top-left corner is the component-wise minimum, so the drag direction
/// never inverts the rectangle.
pub fn normalized_rect(p1: Point, p2: Point) -> Rect {
    let min_x = p1.x.min(p2.x);
    let min_y = p1.y.min(p2.y);
    let width = (p2.x - p1.x).abs();
    let height = (p2.y - p1.y).abs();
    Rect::new(min_x, min_y, min_x + width, min_y + height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_any_drag_direction() {
        let corners = [
            (Point::new(10.0, 20.0), Point::new(60.0, 90.0)),
            (Point::new(60.0, 90.0), Point::new(10.0, 20.0)),
            (Point::new(60.0, 20.0), Point::new(10.0, 90.0)),
            (Point::new(10.0, 90.0), Point::new(60.0, 20.0)),
        ];
        for (a, b) in corners {
            let rect = normalized_rect(a, b);
            assert_eq!(rect.origin(), Point::new(10.0, 20.0));
            assert_eq!(rect.width(), 50.0);
            assert_eq!(rect.height(), 70.0);
        }
    }

    #[test]
    fn test_rect_degenerate() {
        let p = Point::new(5.0, 5.0);
        let rect = normalized_rect(p, p);
        assert_eq!(rect.origin(), p);
        assert_eq!(rect.area(), 0.0);
    }
}
