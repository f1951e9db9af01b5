//! Glass Material

use bumpalo::Bump;
use nlos_core::interaction::*;
use nlos_core::material::*;
use nlos_core::paramset::*;
use nlos_core::pbrt::*;
use nlos_core::reflection::*;
use nlos_core::spectrum::*;

/// Implements a smooth dielectric with specular reflection and transmission.
pub struct GlassMaterial {
    /// Reflectivity of the surface.
    kr: Spectrum,

    /// Transmissivity of the surface.
    kt: Spectrum,

    /// Index of refraction of the inside of the object.
    eta: Float,
}

impl GlassMaterial {
    /// Create a new `GlassMaterial`.
    ///
    /// * `kr`  - Reflectivity of the surface.
    /// * `kt`  - Transmissivity of the surface.
    /// * `eta` - Index of refraction of the inside of the object.
    pub fn new(kr: Spectrum, kt: Spectrum, eta: Float) -> Self {
        Self { kr, kt, eta }
    }
}

impl Material for GlassMaterial {
    fn get_name(&self) -> &'static str {
        "glass"
    }

    /// Initializes representations of the light-scattering properties of the
    /// material at the intersection point on the surface.
    ///
    /// * `arena` - The arena for memory allocations.
    /// * `si`    - The surface interaction at the intersection.
    /// * `mode`  - Transport mode.
    fn compute_scattering_functions<'arena>(
        &self,
        arena: &'arena Bump,
        si: &SurfaceInteraction,
        mode: TransportMode,
    ) -> Option<&'arena BSDF<'arena>> {
        let bsdf = BSDF::alloc(arena, si, self.eta);

        let r = self.kr.clamp_default();
        let t = self.kt.clamp_default();
        if r.is_black() && t.is_black() {
            return Some(bsdf);
        }

        if !r.is_black() {
            let fresnel = Fresnel::Dielectric(FresnelDielectric::new(1.0, self.eta));
            bsdf.add(SpecularReflection::alloc(arena, r, fresnel));
        }
        if !t.is_black() {
            bsdf.add(SpecularTransmission::alloc(arena, t, 1.0, self.eta, mode));
        }
        Some(bsdf)
    }
}

impl From<&ParamSet> for GlassMaterial {
    /// Create a glass material from given parameter set.
    ///
    /// * `params` - Parameter set.
    fn from(params: &ParamSet) -> Self {
        let kr = params.find_one_spectrum("Kr", Spectrum::new(1.0));
        let kt = params.find_one_spectrum("Kt", Spectrum::new(1.0));
        let mut eta = params.find_one_float("eta", params.find_one_float("index", 1.5));
        if eta <= 0.0 {
            warn!("Glass index of refraction {eta} is invalid. Using 1.5.");
            eta = 1.5;
        }
        Self::new(kr, kt, eta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::surface;
    use float_cmp::*;
    use nlos_core::geometry::*;

    #[test]
    fn reflection_and_transmission_lobes() {
        let arena = Bump::new();
        let wo = Vector3f::new(0.0, 0.0, 1.0);
        let si = surface(wo);
        let glass = GlassMaterial::from(&ParamSet::new());
        let bsdf = glass
            .compute_scattering_functions(&arena, &si, TransportMode::Radiance)
            .expect("glass scatters");

        assert!(bsdf.is_purely_specular());
        assert_eq!(bsdf.num_components(BxDFType::ALL), 2);
        assert_eq!(bsdf.eta, 1.5);

        let reflect = BxDFType::REFLECTION | BxDFType::SPECULAR;
        let r = bsdf.sample_f(&wo, &Point2f::new(0.5, 0.5), reflect);
        assert!(approx_eq!(f32, r.f[0] * r.wi.z.abs(), 0.04, epsilon = 1e-4));

        let transmit = BxDFType::TRANSMISSION | BxDFType::SPECULAR;
        let t = bsdf.sample_f(&wo, &Point2f::new(0.5, 0.5), transmit);
        assert!(t.wi.z < 0.0);
        assert!(t.bxdf_type.contains(BxDFType::TRANSMISSION));
    }

    #[test]
    fn factory_names() {
        let params = ParamSet::new();
        assert!(crate::create_material("none", &params).is_none());
        let m = crate::create_material("glass", &params).expect("glass exists");
        assert_eq!(m.get_name(), "glass");
        let m = crate::create_material("velvet", &params).expect("falls back");
        assert_eq!(m.get_name(), "matte");
    }
}
