//! Mirror Material

use bumpalo::Bump;
use nlos_core::interaction::*;
use nlos_core::material::*;
use nlos_core::paramset::*;
use nlos_core::reflection::*;
use nlos_core::spectrum::*;

/// Implements a simple mirror, modeled with perfect specular reflection.
pub struct MirrorMaterial {
    /// Reflectivity of the mirror.
    kr: Spectrum,
}

impl MirrorMaterial {
    /// Create a new `MirrorMaterial`.
    ///
    /// * `kr` - Reflectivity of the mirror.
    pub fn new(kr: Spectrum) -> Self {
        Self { kr }
    }
}

impl Material for MirrorMaterial {
    fn get_name(&self) -> &'static str {
        "mirror"
    }

    /// Initializes representations of the light-scattering properties of the
    /// material at the intersection point on the surface.
    ///
    /// * `arena` - The arena for memory allocations.
    /// * `si`    - The surface interaction at the intersection.
    /// * `mode`  - Transport mode (ignored).
    fn compute_scattering_functions<'arena>(
        &self,
        arena: &'arena Bump,
        si: &SurfaceInteraction,
        _mode: TransportMode,
    ) -> Option<&'arena BSDF<'arena>> {
        let bsdf = BSDF::alloc(arena, si, 1.0);
        let r = self.kr.clamp_default();
        if !r.is_black() {
            bsdf.add(SpecularReflection::alloc(arena, r, Fresnel::NoOp));
        }
        Some(bsdf)
    }
}

impl From<&ParamSet> for MirrorMaterial {
    /// Create a mirror material from given parameter set.
    ///
    /// * `params` - Parameter set.
    fn from(params: &ParamSet) -> Self {
        Self::new(params.find_one_spectrum("Kr", Spectrum::new(0.9)))
    }
}
