//! Matte Material

use bumpalo::Bump;
use nlos_core::interaction::*;
use nlos_core::material::*;
use nlos_core::paramset::*;
use nlos_core::reflection::*;
use nlos_core::spectrum::*;

/// Implements a purely diffuse surface.
pub struct MatteMaterial {
    /// Spectral diffuse reflection.
    kd: Spectrum,
}

impl MatteMaterial {
    /// Create a new `MatteMaterial`.
    ///
    /// * `kd` - Spectral diffuse reflection.
    pub fn new(kd: Spectrum) -> Self {
        Self { kd }
    }
}

impl Material for MatteMaterial {
    fn get_name(&self) -> &'static str {
        "matte"
    }

    fn compute_scattering_functions<'arena>(
        &self,
        arena: &'arena Bump,
        si: &SurfaceInteraction,
        _mode: TransportMode,
    ) -> Option<&'arena BSDF<'arena>> {
        let bsdf = BSDF::alloc(arena, si, 1.0);
        let r = self.kd.clamp_default();
        if !r.is_black() {
            bsdf.add(LambertianReflection::alloc(arena, r));
        }
        Some(bsdf)
    }
}

impl From<&ParamSet> for MatteMaterial {
    /// Create a matte material from given parameter set.
    ///
    /// * `params` - Parameter set.
    fn from(params: &ParamSet) -> Self {
        Self::new(params.find_one_spectrum("Kd", Spectrum::new(0.5)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::surface;
    use float_cmp::*;
    use nlos_core::geometry::*;
    use nlos_core::pbrt::*;

    #[test]
    fn lambertian_value() {
        let arena = Bump::new();
        let si = surface(Vector3f::new(0.0, 0.0, 1.0));
        let matte = MatteMaterial::new(Spectrum::new(0.5));
        let bsdf = matte
            .compute_scattering_functions(&arena, &si, TransportMode::Radiance)
            .expect("matte scatters");
        assert_eq!(bsdf.num_components(BxDFType::ALL), 1);
        assert!(!bsdf.is_purely_specular());

        let wo = Vector3f::new(0.0, 0.0, 1.0);
        let wi = Vector3f::new(0.6, 0.0, 0.8);
        let f = bsdf.f(&wo, &wi, BxDFType::ALL);
        assert!(approx_eq!(f32, f[0], 0.5 * INV_PI, epsilon = 1e-6));
        assert!(bsdf.f(&wo, &-wi, BxDFType::ALL).is_black());
    }

    #[test]
    fn black_kd_has_no_lobes() {
        let arena = Bump::new();
        let si = surface(Vector3f::new(0.0, 0.0, 1.0));
        let bsdf = MatteMaterial::new(Spectrum::ZERO)
            .compute_scattering_functions(&arena, &si, TransportMode::Radiance)
            .expect("bsdf is still allocated");
        assert_eq!(bsdf.num_components(BxDFType::ALL), 0);
    }
}
