//! Rays

use super::*;
use std::fmt;

/// A semi-infinite line with an origin and a direction.
#[derive(Copy, Clone, Debug)]
pub struct Ray {
    /// Origin.
    pub o: Point3f,

    /// Direction.
    pub d: Vector3f,

    /// Maximum extent of the ray.
    pub t_max: Float,

    /// Time value.
    pub time: Float,
}

impl Ray {
    /// Returns a new ray.
    ///
    /// * `o`     - Origin.
    /// * `d`     - Direction.
    /// * `t_max` - Maximum extent of the ray.
    /// * `time`  - Time value.
    pub fn new(o: Point3f, d: Vector3f, t_max: Float, time: Float) -> Self {
        Self { o, d, t_max, time }
    }

    /// Returns true if either coordinate is NaN.
    pub fn has_nans(&self) -> bool {
        self.o.has_nans() || self.d.has_nans() || self.t_max.is_nan()
    }

    /// Get position along the ray at given parameter.
    ///
    /// * `t` - Parameter to evaluate.
    pub fn at(&self, t: Float) -> Point3f {
        self.o + self.d * t
    }

    /// Offset ray origin along the surface normal so the spawned ray does not
    /// re-intersect the surface it leaves.
    ///
    /// `p` - Intersection point.
    /// `n` - Surface normal at the point `p`.
    /// `w` - The direction.
    pub fn offset_origin(p: &Point3f, n: &Normal3f, w: &Vector3f) -> Point3f {
        let offset = Vector3f::from(*n) * RAY_OFFSET_EPSILON;
        if n.dot(w) < 0.0 {
            *p - offset
        } else {
            *p + offset
        }
    }
}

impl fmt::Display for Ray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[o={}, d={}, t_max={}]", self.o, self.d, self.t_max)
    }
}
