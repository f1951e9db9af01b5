//! Visibility Tester

use crate::interaction::*;
use crate::scene::*;

/// Endpoints of a shadow ray. Lights return radiance assuming the two points
/// see each other; the integrator checks that with `unoccluded()`.
#[derive(Copy, Clone, Debug)]
pub struct VisibilityTester {
    /// Reference point.
    pub p0: Hit,

    /// Point on the light.
    pub p1: Hit,
}

impl VisibilityTester {
    /// Create a new `VisibilityTester`.
    ///
    /// * `p0` - Reference point.
    /// * `p1` - Point on the light.
    pub fn new(p0: Hit, p1: Hit) -> Self {
        Self { p0, p1 }
    }

    /// Returns true if nothing in the scene blocks the segment.
    ///
    /// * `scene` - The scene.
    pub fn unoccluded(&self, scene: &Scene) -> bool {
        !scene.intersect_p(&self.p0.spawn_ray_to_hit(&self.p1))
    }
}
