//! 3-D Points

use super::*;
use std::ops::{Add, AddAssign, Sub};

/// A 3-D point containing `Float` values.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point3f {
    /// X-coordinate.
    pub x: Float,

    /// Y-coordinate.
    pub y: Float,

    /// Z-coordinate.
    pub z: Float,
}

impl Point3f {
    /// Origin.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Creates a new 3-D point.
    ///
    /// * `x` - X-coordinate.
    /// * `y` - Y-coordinate.
    /// * `z` - Z-coordinate.
    pub const fn new(x: Float, y: Float, z: Float) -> Self {
        Self { x, y, z }
    }

    /// Returns true if either coordinate is NaN.
    pub fn has_nans(&self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }

    /// Returns the distance to another point.
    ///
    /// * `p` - The other point.
    pub fn distance(&self, p: Self) -> Float {
        (*self - p).length()
    }

    /// Returns the square of the distance to another point.
    ///
    /// * `p` - The other point.
    pub fn distance_squared(&self, p: Self) -> Float {
        (*self - p).length_squared()
    }

    /// Return the component-wise minimum coordinate values with another point.
    ///
    /// * `p` - The other point.
    pub fn min(&self, p: &Self) -> Self {
        Self::new(min(self.x, p.x), min(self.y, p.y), min(self.z, p.z))
    }

    /// Return the component-wise maximum coordinate values with another point.
    ///
    /// * `p` - The other point.
    pub fn max(&self, p: &Self) -> Self {
        Self::new(max(self.x, p.x), max(self.y, p.y), max(self.z, p.z))
    }

    /// Returns the component-wise floor of the point.
    pub fn floor(&self) -> Self {
        Self::new(self.x.floor(), self.y.floor(), self.z.floor())
    }
}

tuple3_ops!(Point3f);

impl Add<Vector3f> for Point3f {
    type Output = Self;

    fn add(self, v: Vector3f) -> Self {
        Self::new(self.x + v.x, self.y + v.y, self.z + v.z)
    }
}

impl AddAssign<Vector3f> for Point3f {
    fn add_assign(&mut self, v: Vector3f) {
        *self = *self + v;
    }
}

/// Used for weighted sums such as barycentric interpolation.
impl Add for Point3f {
    type Output = Self;

    fn add(self, p: Self) -> Self {
        Self::new(self.x + p.x, self.y + p.y, self.z + p.z)
    }
}

impl Sub<Vector3f> for Point3f {
    type Output = Self;

    fn sub(self, v: Vector3f) -> Self {
        Self::new(self.x - v.x, self.y - v.y, self.z - v.z)
    }
}

impl Sub for Point3f {
    type Output = Vector3f;

    fn sub(self, p: Self) -> Vector3f {
        Vector3f::new(self.x - p.x, self.y - p.y, self.z - p.z)
    }
}

impl From<Vector3f> for Point3f {
    fn from(v: Vector3f) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Point3f> for [f32; 3] {
    fn from(p: Point3f) -> Self {
        [p.x, p.y, p.z]
    }
}
