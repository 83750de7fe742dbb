//! 2D vector type

use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// A 2D vector / point
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };
    pub const X: Vec2 = Vec2 { x: 1.0, y: 0.0 };
    pub const Y: Vec2 = Vec2 { x: 0.0, y: 1.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit vector at `radians` from the positive x-axis.
    pub fn from_angle(radians: f32) -> Self {
        Self::new(radians.cos(), radians.sin())
    }

    pub fn length_sq(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    pub fn length(self) -> f32 {
        self.length_sq().sqrt()
    }

    pub fn dot(self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Perp-dot product (z component of the 3D cross product).
    pub fn cross(self, other: Vec2) -> f32 {
        self.x * other.y - self.y * other.x
    }

    /// Component-wise scale, used to stretch unit circles into ellipses.
    pub fn scale(self, factor: Vec2) -> Self {
        Self::new(self.x * factor.x, self.y * factor.y)
    }

    /// Same direction, magnitude `len`. `len` is expected to be non-negative;
    /// the zero vector is returned unchanged.
    pub fn with_length(self, len: f32) -> Self {
        let current = self.length();
        if current == 0.0 {
            self
        } else {
            self * (len / current)
        }
    }

    pub fn rotate(self, radians: f32) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    /// Counter-clockwise perpendicular: `(-y, x)`.
    pub fn perp_ccw(self) -> Self {
        Self::new(-self.y, self.x)
    }

    /// Clockwise perpendicular: `(y, -x)`.
    pub fn perp_cw(self) -> Self {
        Self::new(self.y, -self.x)
    }

    /// Signed angle from `self` to `other` in `(-pi, pi]`.
    pub fn angle_to(self, other: Vec2) -> f32 {
        self.cross(other).atan2(self.dot(other))
    }

    pub fn fuzzy_eq(self, other: Vec2, epsilon: f32) -> bool {
        (self.x - other.x).abs() <= epsilon && (self.y - other.y).abs() <= epsilon
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Vec2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}
