//! Core geometry types shared by every editor crate.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// 2D vector in whichever coordinate space the caller is working in
/// (global pixels, viewport pixels, or curve space).
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance(self, other: Self) -> f64 {
        (self - other).length()
    }

    /// Linear interpolation toward `other`; `t = 0` is `self`, `t = 1` is `other`.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self::new(self.x + (other.x - self.x) * t, self.y + (other.y - self.y) * t)
    }

    /// Unit vector in the same direction, or `None` for a zero-length vector.
    pub fn normalized(self) -> Option<Self> {
        let len = self.length();
        if len <= f64::EPSILON {
            return None;
        }
        Some(Self::new(self.x / len, self.y / len))
    }

    /// Angle from the positive x axis, in radians.
    pub fn angle(self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Component-wise scale.
    pub fn scale(self, sx: f64, sy: f64) -> Self {
        Self::new(self.x * sx, self.y * sy)
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl From<[f64; 2]> for Vec2 {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<(f64, f64)> for Vec2 {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

/// Axis-aligned rectangle. `left`/`top` is the minimum corner.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
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

    /// Build the rectangle spanned by two arbitrary corners.
    pub fn from_points(a: Vec2, b: Vec2) -> Self {
        let left = a.x.min(b.x);
        let top = a.y.min(b.y);
        Self::new(left, top, (a.x - b.x).abs(), (a.y - b.y).abs())
    }

    pub fn right(self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(self) -> f64 {
        self.top + self.height
    }

    pub fn origin(self) -> Vec2 {
        Vec2::new(self.left, self.top)
    }

    /// Inclusive containment test.
    pub fn contains(self, p: Vec2) -> bool {
        p.x >= self.left && p.x <= self.right() && p.y >= self.top && p.y <= self.bottom()
    }

    /// Grow the rectangle by `amount` on every side.
    pub fn expand(self, amount: f64) -> Self {
        Self::new(
            self.left - amount,
            self.top - amount,
            self.width + amount * 2.0,
            self.height + amount * 2.0,
        )
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{}@({}, {})",
            self.width, self.height, self.left, self.top
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec2_lerp_and_length() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(3.0, 4.0);
        assert!((a.distance(b) - 5.0).abs() < 1e-12);
        assert_eq!(a.lerp(b, 0.5), Vec2::new(1.5, 2.0));
    }

    #[test]
    fn zero_vector_has_no_direction() {
        assert!(Vec2::ZERO.normalized().is_none());
        let n = Vec2::new(0.0, -2.0).normalized().unwrap();
        assert!((n.y + 1.0).abs() < 1e-12);
    }

    #[test]
    fn rect_from_points_normalizes_corners() {
        let r = Rect::from_points(Vec2::new(10.0, 5.0), Vec2::new(2.0, 8.0));
        assert_eq!(r, Rect::new(2.0, 5.0, 8.0, 3.0));
        assert!(r.contains(Vec2::new(2.0, 5.0)));
        assert!(!r.contains(Vec2::new(11.0, 5.0)));
    }

    #[test]
    fn rect_expand_grows_every_side() {
        let r = Rect::new(10.0, 10.0, 4.0, 2.0).expand(1.0);
        assert_eq!(r, Rect::new(9.0, 9.0, 6.0, 4.0));
        assert!((r.right() - 15.0).abs() < 1e-12);
        assert!((r.bottom() - 13.0).abs() < 1e-12);
    }
}
