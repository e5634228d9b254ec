use std::ops::{Add, AddAssign, Mul, MulAssign, Sub, SubAssign};

/// A two-dimensional point in Cartesian coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const ORIGIN: Point2D = Point2D { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Move the point in the x and y directions.
    pub fn offset(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn distance(&self, other: Point2D) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Single precision copy for vertex data.
    pub fn to_f32(self) -> [f32; 2] {
        [self.x as f32, self.y as f32]
    }
}

impl From<(f64, f64)> for Point2D {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<[f64; 2]> for Point2D {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl Add for Point2D {
    type Output = Point2D;

    fn add(self, rhs: Point2D) -> Point2D {
        Point2D::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point2D {
    fn add_assign(&mut self, rhs: Point2D) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point2D {
    type Output = Point2D;

    fn sub(self, rhs: Point2D) -> Point2D {
        Point2D::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Point2D {
    fn sub_assign(&mut self, rhs: Point2D) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

/// Componentwise product.
impl Mul for Point2D {
    type Output = Point2D;

    fn mul(self, rhs: Point2D) -> Point2D {
        Point2D::new(self.x * rhs.x, self.y * rhs.y)
    }
}

impl MulAssign for Point2D {
    fn mul_assign(&mut self, rhs: Point2D) {
        self.x *= rhs.x;
        self.y *= rhs.y;
    }
}

impl Mul<f64> for Point2D {
    type Output = Point2D;

    fn mul(self, rhs: f64) -> Point2D {
        Point2D::new(self.x * rhs, self.y * rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic() {
        let a = Point2D::new(1.0, 2.0);
        let b = Point2D::new(3.0, -4.0);

        assert_eq!(a + b, Point2D::new(4.0, -2.0));
        assert_eq!(a - b, Point2D::new(-2.0, 6.0));
        assert_eq!(a * b, Point2D::new(3.0, -8.0));
        assert_eq!(a * 2.0, Point2D::new(2.0, 4.0));
    }

    #[test]
    fn test_assign_operators() {
        let mut p = Point2D::new(1.0, 1.0);
        p += Point2D::new(2.0, 3.0);
        p -= Point2D::new(1.0, 1.0);
        p *= Point2D::new(2.0, 0.5);
        assert_eq!(p, Point2D::new(4.0, 1.5));

        p.offset(-4.0, 0.5);
        assert_eq!(p, Point2D::new(0.0, 2.0));
    }

    #[test]
    fn test_distance() {
        let d = Point2D::new(0.0, 0.0).distance(Point2D::new(3.0, 4.0));
        assert!((d - 5.0).abs() < 1e-12);
    }
}
