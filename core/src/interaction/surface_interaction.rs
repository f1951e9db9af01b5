//! Surface Interactions

use super::Hit;
use crate::geometry::*;
use crate::pbrt::*;
use crate::primitive::*;
use crate::spectrum::*;

/// Shading geometry, possibly perturbed from the true surface geometry by
/// per-vertex normals.
#[derive(Copy, Clone, Debug, Default)]
pub struct Shading {
    /// Shading normal.
    pub n: Normal3f,

    /// Shading tangent.
    pub dpdu: Vector3f,
}

/// SurfaceInteraction represents geometry of a particular point on a surface.
///
/// The lifetime specifiers:
/// * `'scene` - Shared reference to the scene containing primitive.
#[derive(Clone)]
pub struct SurfaceInteraction<'scene> {
    /// The common interaction data.
    pub hit: Hit,

    /// The uv coordinates from surface parametrization.
    pub uv: Point2f,

    /// Parametric partial derivative of the point ∂p/∂u.
    pub dpdu: Vector3f,

    /// Shading geometry.
    pub shading: Shading,

    /// The primitive that was hit.
    pub primitive: Option<&'scene GeometricPrimitive>,
}

impl<'scene> SurfaceInteraction<'scene> {
    /// Create a new surface interaction. The shading geometry starts out equal
    /// to the true geometry.
    ///
    /// * `p`    - Point of interaction.
    /// * `uv`   - The uv coordinates from surface parametrization.
    /// * `wo`   - The negative ray direction.
    /// * `n`    - Geometric normal.
    /// * `dpdu` - Parametric partial derivative of the point ∂p/∂u.
    /// * `time` - Time when interaction occurred.
    pub fn new(
        p: Point3f,
        uv: Point2f,
        wo: Vector3f,
        n: Normal3f,
        dpdu: Vector3f,
        time: Float,
    ) -> Self {
        Self {
            hit: Hit::new(p, time, wo, n),
            uv,
            dpdu,
            shading: Shading { n, dpdu },
            primitive: None,
        }
    }

    /// Update the shading geometry. The geometric normal is flipped to lie in
    /// the same hemisphere as the shading normal.
    ///
    /// * `ns`   - Shading normal.
    /// * `dpdu` - Shading tangent.
    pub fn set_shading_geometry(&mut self, ns: Normal3f, dpdu: Vector3f) {
        self.shading.n = ns;
        self.shading.dpdu = dpdu;
        self.hit.n = self.hit.n.face_forward(&Vector3f::from(ns));
    }

    /// Returns the emitted radiance at a surface point intersected by a ray
    /// if the surface is an area light.
    ///
    /// * `w` - Outgoing direction.
    pub fn le(&self, w: &Vector3f) -> Spectrum {
        self.primitive
            .and_then(|primitive| primitive.area_light.as_ref())
            .map_or(Spectrum::ZERO, |area_light| area_light.l(&self.hit, w))
    }
}
