//! Geometry primitives for hit testing and scrolling.
//!
//! All values are logical pixels. Positions are either in viewport space
//! (relative to the host's drawing surface) or in content space (relative
//! to the grid's top-left corner, before scrolling).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True when either side is zero or negative.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// An axis-aligned rectangle.
///
/// Containment is half-open, so adjacent cells never both claim the point on
/// their shared edge.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point { x, y },
            size: Size { width, height },
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.origin.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.origin.y
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.origin.x + self.size.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.origin.y + self.size.height
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size.width
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size.height
    }

    #[inline]
    pub fn bottom_right(&self) -> Point {
        Point::new(self.right(), self.bottom())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size.is_empty()
    }

    /// Whether `point` lies inside, counting the left and top edges only.
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        (self.left()..self.right()).contains(&point.x)
            && (self.top()..self.bottom()).contains(&point.y)
    }

    /// The same rectangle moved by `dx`, `dy`.
    #[inline]
    pub fn translate(&self, dx: f32, dy: f32) -> Rect {
        Rect::new(self.left() + dx, self.top() + dy, self.width(), self.height())
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &Rect) -> Rect {
        let left = self.left().min(other.left());
        let top = self.top().min(other.top());
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(left, top, right - left, bottom - top)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjacent_cells_share_no_point() {
        let left = Rect::new(40.0, 40.0, 100.0, 40.0);
        let right = Rect::new(140.0, 40.0, 100.0, 40.0);
        let edge = Point::new(140.0, 60.0);
        assert!(!left.contains(edge));
        assert!(right.contains(edge));
        assert!(left.contains(Point::new(40.0, 40.0)));
        assert!(!left.contains(Point::new(90.0, 80.0)));
    }

    #[test]
    fn test_union_covers_selection_corners() {
        let first = Rect::new(40.0, 40.0, 100.0, 40.0);
        let last = Rect::new(240.0, 120.0, 100.0, 40.0);
        let covered = first.union(&last);
        assert_eq!(covered, Rect::new(40.0, 40.0, 300.0, 120.0));
        assert_eq!(covered.bottom_right(), Point::new(340.0, 160.0));
        assert_eq!(covered.translate(-40.0, 10.0).origin, Point::new(0.0, 50.0));
    }

    #[test]
    fn test_empty_sizes() {
        assert!(Size::default().is_empty());
        assert!(Size::new(0.0, 10.0).is_empty());
        assert!(!Rect::new(0.0, 0.0, 1.0, 1.0).is_empty());
    }
}
