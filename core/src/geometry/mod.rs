//! Geometry

use crate::pbrt::*;

// Define macros for property based testing.
#[cfg(test)]
#[macro_export]
macro_rules! prop_range {
    ($name: ident, $t: ty, $r: expr) => {
        prop_compose! {
            fn $name()(f in $r) -> $t {
                f
            }
        }
    };
}

#[cfg(test)]
#[macro_export]
macro_rules! prop_point2 {
    ($name: ident, $t: ty, $xr: expr, $yr: expr) => {
        prop_compose! {
            fn $name()(x in $xr, y in $yr) -> Point2<$t> {
                Point2 { x, y }
            }
        }
    };
}

#[cfg(test)]
#[macro_export]
macro_rules! prop_vector3f {
    ($name: ident, $xr: expr, $yr: expr, $zr: expr) => {
        prop_compose! {
            fn $name()(x in $xr, y in $yr, z in $zr) -> Vector3f {
                Vector3f { x, y, z }
            }
        }
    };
}

/// Implements the component-wise arithmetic shared by the 3-D tuple types.
macro_rules! tuple3_ops {
    ($t: ident) => {
        impl std::ops::Mul<Float> for $t {
            type Output = $t;

            fn mul(self, s: Float) -> $t {
                $t::new(self.x * s, self.y * s, self.z * s)
            }
        }

        impl std::ops::Mul<$t> for Float {
            type Output = $t;

            fn mul(self, v: $t) -> $t {
                v * self
            }
        }

        impl std::ops::MulAssign<Float> for $t {
            fn mul_assign(&mut self, s: Float) {
                *self = *self * s;
            }
        }

        impl std::ops::Div<Float> for $t {
            type Output = $t;

            fn div(self, s: Float) -> $t {
                debug_assert!(s != 0.0);
                let inv = 1.0 / s;
                self * inv
            }
        }

        impl std::ops::Neg for $t {
            type Output = $t;

            fn neg(self) -> $t {
                $t::new(-self.x, -self.y, -self.z)
            }
        }

        impl std::ops::Index<usize> for $t {
            type Output = Float;

            fn index(&self, i: usize) -> &Float {
                match i {
                    0 => &self.x,
                    1 => &self.y,
                    2 => &self.z,
                    _ => panic!("index {i} out of range for {}", stringify!($t)),
                }
            }
        }

        impl std::fmt::Display for $t {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "[{}, {}, {}]", self.x, self.y, self.z)
            }
        }
    };
}

mod bounds2;
mod bounds3;
mod coordinate_system;
mod normal;
mod point2;
mod point3;
mod ray;
mod vector2;
mod vector3;

// Re-export
pub use bounds2::*;
pub use bounds3::*;
pub use coordinate_system::*;
pub use normal::*;
pub use point2::*;
pub use point3::*;
pub use ray::*;
pub use vector2::*;
pub use vector3::*;
