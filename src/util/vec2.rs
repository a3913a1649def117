use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// 2D vector in world units (screen convention: +y points down)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit vector a ship with the given heading points along.
    /// Heading 0 faces -y; positive headings turn clockwise on screen.
    #[inline]
    pub fn from_heading(heading: f32) -> Self {
        Self {
            x: heading.sin(),
            y: -heading.cos(),
        }
    }

    /// Heading that would point a ship along this vector
    #[inline]
    pub fn heading(&self) -> f32 {
        self.y.atan2(self.x) + PI / 2.0
    }

    #[inline]
    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self {
                x: self.x / len,
                y: self.y / len,
            }
        } else {
            Self::ZERO
        }
    }

    #[inline]
    pub fn distance_to(&self, other: Vec2) -> f32 {
        (*self - other).length()
    }

    pub fn clamp_length(&self, max: f32) -> Self {
        let len = self.length();
        if len > max && len > 0.0 {
            *self * (max / len)
        } else {
            *self
        }
    }

    /// Perpendicular vector (rotated 90 degrees counter-clockwise)
    pub fn perpendicular(&self) -> Self {
        Self {
            x: -self.y,
            y: self.x,
        }
    }

    /// Component-wise clamp into `[min, max]`
    pub fn clamp_components(&self, min: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            x: self.x.clamp(min, max_x),
            y: self.y.clamp(min, max_y),
        }
    }
}

/// Wraps an angle into `(-PI, PI]`
pub fn wrap_angle(angle: f32) -> f32 {
    let mut a = angle % TAU;
    if a > PI {
        a -= TAU;
    } else if a <= -PI {
        a += TAU;
    }
    a
}

/// Rotates `current` toward `target` by at most `max_step` radians, taking the short way round
pub fn turn_toward(current: f32, target: f32, max_step: f32) -> f32 {
    let diff = wrap_angle(target - current);
    if diff.abs() <= max_step {
        target
    } else {
        current + max_step * diff.signum()
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

impl Neg for Vec2 {
    type Output = Self;
    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl MulAssign<f32> for Vec2 {
    fn mul_assign(&mut self, rhs: f32) {
        self.x *= rhs;
        self.y *= rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_heading_zero_faces_up() {
        let v = Vec2::from_heading(0.0);
        assert!(approx_eq(v.x, 0.0));
        assert!(approx_eq(v.y, -1.0));
    }

    #[test]
    fn test_heading_quarter_turn_faces_right() {
        let v = Vec2::from_heading(PI / 2.0);
        assert!(approx_eq(v.x, 1.0));
        assert!(approx_eq(v.y, 0.0));
    }

    #[test]
    fn test_heading_inverts_from_heading() {
        for h in [0.3_f32, 1.2, 2.9, -0.7, -2.5] {
            let back = Vec2::from_heading(h).heading();
            assert!(approx_eq(wrap_angle(back - h), 0.0), "heading {h} came back as {back}");
        }
    }

    #[test]
    fn test_normalize_zero() {
        assert_eq!(Vec2::ZERO.normalize(), Vec2::ZERO);
    }

    #[test]
    fn test_distance() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(3.0, 4.0);
        assert!(approx_eq(a.distance_to(b), 5.0));
    }

    #[test]
    fn test_clamp_length() {
        let v = Vec2::new(30.0, 40.0).clamp_length(5.0);
        assert!(approx_eq(v.length(), 5.0));
        let short = Vec2::new(1.0, 1.0);
        assert_eq!(short.clamp_length(5.0), short);
    }

    #[test]
    fn test_wrap_angle() {
        assert!(approx_eq(wrap_angle(TAU + 0.5), 0.5));
        assert!(approx_eq(wrap_angle(-3.0 * PI / 2.0), PI / 2.0));
        assert!(approx_eq(wrap_angle(0.5), 0.5));
    }

    #[test]
    fn test_turn_toward_takes_short_way() {
        // From just below +PI to just above -PI is a small clockwise step
        let next = turn_toward(PI - 0.05, -PI + 0.05, 0.01);
        assert!(next > PI - 0.05);
    }

    #[test]
    fn test_turn_toward_snaps_when_close() {
        assert!(approx_eq(turn_toward(1.0, 1.005, 0.01), 1.005));
    }
}
