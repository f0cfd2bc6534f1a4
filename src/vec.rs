use std::ops::{Add, AddAssign, Mul, Sub};

/// A point or displacement on the field, in feet.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
    /// Unit vector along a field heading given in degrees.
    /// 0 points along +x, 90 along +y.
    pub fn from_heading_degrees(heading: f64) -> Self {
        let (s, c) = heading.to_radians().sin_cos();
        Self::new(c, s)
    }
    pub fn mag(self) -> f64 {
        self.x.hypot(self.y)
    }
    pub fn distance_to(self, other: Self) -> f64 {
        (other - self).mag()
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self::Output {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn heading_unit_vectors() {
        let east = Vec2::from_heading_degrees(0.0);
        assert_relative_eq!(east.x, 1.0);
        assert_relative_eq!(east.y, 0.0);

        let north = Vec2::from_heading_degrees(90.0);
        assert_relative_eq!(north.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(north.y, 1.0);

        let back = Vec2::from_heading_degrees(-135.0);
        assert_relative_eq!(back.mag(), 1.0);
        assert!(back.x < 0.0 && back.y < 0.0);
    }

    #[test]
    fn distance_between_points() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(4.0, 6.0);
        assert_relative_eq!(a.distance_to(b), 5.0);
    }
}
