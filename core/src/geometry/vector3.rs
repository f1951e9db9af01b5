//! 3-D Vectors

use super::*;
use std::ops::{Add, AddAssign, Sub};

/// A 3-D vector containing `Float` values.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vector3f {
    /// X-coordinate.
    pub x: Float,

    /// Y-coordinate.
    pub y: Float,

    /// Z-coordinate.
    pub z: Float,
}

impl Vector3f {
    /// Zero vector.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Creates a new 3-D vector.
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

    /// Returns the square of the vector's length.
    pub fn length_squared(&self) -> Float {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Returns the vector's length.
    pub fn length(&self) -> Float {
        self.length_squared().sqrt()
    }

    /// Returns the unit vector.
    pub fn normalize(&self) -> Self {
        *self / self.length()
    }

    /// Returns the dot product with another vector.
    ///
    /// * `v` - The other vector.
    pub fn dot(&self, v: &Self) -> Float {
        self.x * v.x + self.y * v.y + self.z * v.z
    }

    /// Returns the absolute value of the dot product with another vector.
    ///
    /// * `v` - The other vector.
    pub fn abs_dot(&self, v: &Self) -> Float {
        self.dot(v).abs()
    }

    /// Returns the dot product with a normal.
    ///
    /// * `n` - The normal.
    pub fn dot_n(&self, n: &Normal3f) -> Float {
        self.x * n.x + self.y * n.y + self.z * n.z
    }

    /// Returns the absolute value of the dot product with a normal.
    ///
    /// * `n` - The normal.
    pub fn abs_dot_n(&self, n: &Normal3f) -> Float {
        self.dot_n(n).abs()
    }

    /// Returns the cross product with another vector.
    ///
    /// * `v` - The other vector.
    pub fn cross(&self, v: &Self) -> Self {
        Self::new(
            self.y * v.z - self.z * v.y,
            self.z * v.x - self.x * v.z,
            self.x * v.y - self.y * v.x,
        )
    }

    /// Returns a new vector containing absolute values of the components.
    pub fn abs(&self) -> Self {
        Self::new(self.x.abs(), self.y.abs(), self.z.abs())
    }

    /// Returns the largest coordinate value.
    pub fn max_component(&self) -> Float {
        max(self.x, max(self.y, self.z))
    }
}

tuple3_ops!(Vector3f);

impl Add for Vector3f {
    type Output = Self;

    fn add(self, v: Self) -> Self {
        Self::new(self.x + v.x, self.y + v.y, self.z + v.z)
    }
}

impl AddAssign for Vector3f {
    fn add_assign(&mut self, v: Self) {
        *self = *self + v;
    }
}

impl Sub for Vector3f {
    type Output = Self;

    fn sub(self, v: Self) -> Self {
        Self::new(self.x - v.x, self.y - v.y, self.z - v.z)
    }
}

impl From<Normal3f> for Vector3f {
    fn from(n: Normal3f) -> Self {
        Self::new(n.x, n.y, n.z)
    }
}

impl From<Point3f> for Vector3f {
    fn from(p: Point3f) -> Self {
        Self::new(p.x, p.y, p.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    prop_range!(range_f32, f32, -100.0..100.0f32);
    prop_vector3f!(
        vector3f,
        -100.0..100.0f32,
        -100.0..100.0f32,
        -100.0..100.0f32
    );

    proptest! {
        #[test]
        fn cross_product_is_orthogonal(a in vector3f(), b in vector3f()) {
            let c = a.cross(&b);
            let tol = 1e-3 * (a.length() * b.length()).max(1.0) * c.length().max(1.0);
            prop_assert!(c.dot(&a).abs() <= tol);
            prop_assert!(c.dot(&b).abs() <= tol);
        }

        #[test]
        fn scaling_scales_length(v in vector3f(), s in range_f32()) {
            let l = (v * s).length();
            prop_assert!(approx_eq!(f32, l, v.length() * s.abs(), epsilon = 1e-2 * l.max(1.0)));
        }
    }
}
