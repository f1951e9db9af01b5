//! Interactions

use crate::geometry::*;
use crate::pbrt::*;

mod surface_interaction;

// Re-export
pub use surface_interaction::*;

/// Hit provides the data common to all interaction points.
#[derive(Copy, Clone, Debug, Default)]
pub struct Hit {
    /// Point of interaction.
    pub p: Point3f,

    /// Time when interaction occurred.
    pub time: Float,

    /// The negative ray direction (outgoing direction used when computing
    /// lighting at points).
    pub wo: Vector3f,

    /// Surface normal at the point `p`. Zero for points that are not on a
    /// surface.
    pub n: Normal3f,
}

impl Hit {
    /// Create a new hit.
    ///
    /// * `p`    - Point of interaction.
    /// * `time` - Time when interaction occurred.
    /// * `wo`   - The negative ray direction.
    /// * `n`    - Surface normal at the point `p`.
    pub fn new(p: Point3f, time: Float, wo: Vector3f, n: Normal3f) -> Self {
        Self { p, time, wo, n }
    }

    /// Create a hit for a point in space with no surface normal.
    ///
    /// * `p`    - Point of interaction.
    /// * `time` - Time when interaction occurred.
    pub fn new_minimal(p: Point3f, time: Float) -> Self {
        Self {
            p,
            time,
            ..Default::default()
        }
    }

    /// Returns `true` if the interaction lies on a surface.
    pub fn is_surface_interaction(&self) -> bool {
        self.n != Normal3f::ZERO
    }

    /// Returns a ray leaving the interaction point in a given direction.
    ///
    /// * `d` - The direction.
    pub fn spawn_ray(&self, d: &Vector3f) -> Ray {
        let o = Ray::offset_origin(&self.p, &self.n, d);
        Ray::new(o, *d, INFINITY, self.time)
    }

    /// Returns a ray from the interaction point that stops just short of
    /// another point.
    ///
    /// * `p2` - The target point.
    pub fn spawn_ray_to(&self, p2: &Point3f) -> Ray {
        let o = Ray::offset_origin(&self.p, &self.n, &(*p2 - self.p));
        let d = *p2 - o;
        Ray::new(o, d, 1.0 - SHADOW_EPSILON, self.time)
    }

    /// Returns a ray between two interaction points, offset at both ends.
    ///
    /// * `it` - The target interaction.
    pub fn spawn_ray_to_hit(&self, it: &Hit) -> Ray {
        let p0 = Ray::offset_origin(&self.p, &self.n, &(it.p - self.p));
        let p1 = Ray::offset_origin(&it.p, &it.n, &(p0 - it.p));
        Ray::new(p0, p1 - p0, 1.0 - SHADOW_EPSILON, self.time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn spawned_rays_leave_the_surface() {
        let hit = Hit::new(
            Point3f::new(0.0, 0.0, 0.0),
            0.0,
            Vector3f::new(0.0, 0.0, 1.0),
            Normal3f::new(0.0, 0.0, 1.0),
        );
        let up = hit.spawn_ray(&Vector3f::new(0.0, 0.0, 1.0));
        assert!(up.o.z > 0.0);
        let down = hit.spawn_ray(&Vector3f::new(0.0, 0.0, -1.0));
        assert!(down.o.z < 0.0);
    }

    #[test]
    fn spawn_ray_to_stops_before_target() {
        let hit = Hit::new_minimal(Point3f::new(0.0, 0.0, 0.0), 0.0);
        assert!(!hit.is_surface_interaction());
        let target = Point3f::new(0.0, 2.0, 0.0);
        let r = hit.spawn_ray_to(&target);
        assert!(approx_eq!(f32, r.at(1.0).y, 2.0));
        assert!(r.t_max < 1.0);
    }
}
