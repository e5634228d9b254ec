use super::Point2D;
use std::ops::{Add, Mul};

/// A rectangle given by two diagonally opposite corners.
///
/// The corners are stored as given; every accessor normalizes with min/max, so
/// `left() <= right()` and `bottom() <= top()` hold whatever the construction order.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rectangle {
    first: Point2D,
    second: Point2D,
}

impl Rectangle {
    pub fn new(first: impl Into<Point2D>, second: impl Into<Point2D>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }

    pub fn with_size(origin: impl Into<Point2D>, width: f64, height: f64) -> Self {
        let origin = origin.into();
        Self {
            first: origin,
            second: Point2D::new(origin.x + width, origin.y + height),
        }
    }

    pub fn left(&self) -> f64 {
        self.first.x.min(self.second.x)
    }

    pub fn right(&self) -> f64 {
        self.first.x.max(self.second.x)
    }

    pub fn bottom(&self) -> f64 {
        self.first.y.min(self.second.y)
    }

    pub fn top(&self) -> f64 {
        self.first.y.max(self.second.y)
    }

    pub fn bottom_left(&self) -> Point2D {
        Point2D::new(self.left(), self.bottom())
    }

    pub fn top_right(&self) -> Point2D {
        Point2D::new(self.right(), self.top())
    }

    pub fn width(&self) -> f64 {
        self.right() - self.left()
    }

    pub fn height(&self) -> f64 {
        self.top() - self.bottom()
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn center_x(&self) -> f64 {
        (self.right() + self.left()) * 0.5
    }

    pub fn center_y(&self) -> f64 {
        (self.top() + self.bottom()) * 0.5
    }

    pub fn center(&self) -> Point2D {
        Point2D::new(self.center_x(), self.center_y())
    }

    /// Width over height. Infinite or NaN for degenerate rectangles.
    pub fn aspect_ratio(&self) -> f64 {
        self.width() / self.height()
    }

    /// True when both extents are strictly positive and finite, and so is every coordinate.
    pub fn is_proper(&self) -> bool {
        let (width, height) = (self.width(), self.height());
        self.first.is_finite()
            && self.second.is_finite()
            && width.is_finite()
            && height.is_finite()
            && width > 0.0
            && height > 0.0
    }

    /// Inclusive on all edges.
    pub fn contains(&self, point: Point2D) -> bool {
        !(point.x < self.left()
            || self.right() < point.x
            || point.y < self.bottom()
            || self.top() < point.y)
    }

    pub fn offset(&mut self, dx: f64, dy: f64) {
        self.first.offset(dx, dy);
        self.second.offset(dx, dy);
    }
}

/// Translation by a point.
impl Add<Point2D> for Rectangle {
    type Output = Rectangle;

    fn add(self, rhs: Point2D) -> Rectangle {
        Rectangle::new(self.first + rhs, self.second + rhs)
    }
}

/// Componentwise scaling of both corners.
impl Mul<Point2D> for Rectangle {
    type Output = Rectangle;

    fn mul(self, rhs: Point2D) -> Rectangle {
        Rectangle::new(self.first * rhs, self.second * rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_corner_order() {
        let r = Rectangle::new((10.0, -5.0), (2.0, 7.0));
        assert_eq!(r.left(), 2.0);
        assert_eq!(r.right(), 10.0);
        assert_eq!(r.bottom(), -5.0);
        assert_eq!(r.top(), 7.0);
        assert_eq!(r.width(), 8.0);
        assert_eq!(r.height(), 12.0);
        assert_eq!(r.center(), Point2D::new(6.0, 1.0));
    }

    #[test]
    fn test_with_size_and_negative_extents() {
        let r = Rectangle::with_size((10.0, 10.0), -4.0, 6.0);
        assert_eq!(r.bottom_left(), Point2D::new(6.0, 10.0));
        assert_eq!(r.top_right(), Point2D::new(10.0, 16.0));
        assert_eq!(r.area(), 24.0);
    }

    #[test]
    fn test_contains_is_inclusive() {
        let r = Rectangle::new((0.0, 0.0), (1.0, 1.0));
        assert!(r.contains(Point2D::new(0.0, 1.0)));
        assert!(r.contains(Point2D::new(0.5, 0.5)));
        assert!(!r.contains(Point2D::new(1.0001, 0.5)));
    }

    #[test]
    fn test_is_proper() {
        assert!(Rectangle::new((0.0, 0.0), (1.0, 1.0)).is_proper());
        assert!(!Rectangle::new((0.0, 0.0), (0.0, 1.0)).is_proper());
        assert!(!Rectangle::new((0.0, 0.0), (f64::INFINITY, 1.0)).is_proper());
        // finite corners whose difference overflows
        assert!(!Rectangle::new((-1e308, 0.0), (1e308, 1.0)).is_proper());
        assert!(!Rectangle::new((0.0, -f64::MAX), (1.0, f64::MAX)).is_proper());
    }

    #[test]
    fn test_translate_and_scale() {
        let mut r = Rectangle::new((0.0, 0.0), (2.0, 4.0));
        r.offset(1.0, 1.0);
        assert_eq!(r.bottom_left(), Point2D::new(1.0, 1.0));

        let moved = r + Point2D::new(-1.0, -1.0);
        assert_eq!(moved.top_right(), Point2D::new(2.0, 4.0));

        let scaled = moved * Point2D::new(2.0, 0.5);
        assert_eq!(scaled.top_right(), Point2D::new(4.0, 2.0));
    }
}
