//! Plain 2D value types shared by the tracker, the particle pool and the
//! effect registry.
//!
//! All coordinates are CSS pixels. Viewport (client) coordinates come from
//! pointer events; document coordinates add the current scroll offset.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// A 2D point or offset in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Linear interpolation toward `other` by factor `t`.
    ///
    /// Written as `self + t * (other - self)` so that `t = 0` returns `self`
    /// exactly.
    pub fn lerp(self, other: Point, t: f64) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    /// Direction from `self` to `other` in radians (`atan2(dy, dx)`).
    pub fn angle_to(self, other: Point) -> f64 {
        let dy = other.y - self.y;
        let dx = other.x - self.x;
        if dx.is_finite() && dy.is_finite() {
            dy.atan2(dx)
        } else {
            0.0
        }
    }

    /// Point reached by travelling `distance` along `angle`.
    pub fn offset_polar(self, angle: f64, distance: f64) -> Point {
        Point::new(
            self.x + angle.cos() * distance,
            self.y + angle.sin() * distance,
        )
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// Axis-aligned rectangle, as returned by `getBoundingClientRect()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_lerp_endpoints() {
        let a = Point::new(10.0, -4.0);
        let b = Point::new(30.0, 16.0);
        assert_eq!(a.lerp(b, 0.0), a);
        let end = a.lerp(b, 1.0);
        assert!((end.x - b.x).abs() < EPS);
        assert!((end.y - b.y).abs() < EPS);

        let step = a.lerp(b, 0.2);
        assert!((step.x - 14.0).abs() < EPS);
        assert!((step.y - 0.0).abs() < EPS);
    }

    #[test]
    fn test_angle_to() {
        let origin = Point::ZERO;
        assert!((origin.angle_to(Point::new(5.0, 0.0))).abs() < EPS);
        let down = origin.angle_to(Point::new(0.0, 3.0));
        assert!((down - std::f64::consts::FRAC_PI_2).abs() < EPS);
        // Zero delta yields a zero angle rather than NaN
        assert_eq!(origin.angle_to(origin), 0.0);
        assert_eq!(origin.angle_to(Point::new(f64::NAN, 1.0)), 0.0);
    }

    #[test]
    fn test_offset_polar() {
        let p = Point::new(1.0, 1.0).offset_polar(std::f64::consts::PI, 2.0);
        assert!((p.x + 1.0).abs() < EPS);
        assert!((p.y - 1.0).abs() < EPS);
    }

    #[test]
    fn test_rect_center() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(rect.center(), Point::new(25.0, 40.0));
    }
}
