//! Specular Transmission

use super::*;

/// BTDF for physically plausible specular transmission using a dielectric
/// Fresnel interface.
pub struct SpecularTransmission {
    /// Spectrum used to scale the transmitted colour.
    t: Spectrum,

    /// Index of refraction above the surface (same side as surface normal).
    eta_a: Float,

    /// Index of refraction below the surface (opposite side as surface normal).
    eta_b: Float,

    /// Fresnel interface for the two indices.
    fresnel: FresnelDielectric,

    /// Indicates whether incident ray started from a light source or from camera.
    mode: TransportMode,
}

impl SpecularTransmission {
    /// Allocate a new `SpecularTransmission` in the arena.
    ///
    /// * `arena` - The arena for memory allocations.
    /// * `t`     - Spectrum used to scale the transmitted colour.
    /// * `eta_a` - Index of refraction above the surface.
    /// * `eta_b` - Index of refraction below the surface.
    /// * `mode`  - Transport mode.
    pub fn alloc(
        arena: &Bump,
        t: Spectrum,
        eta_a: Float,
        eta_b: Float,
        mode: TransportMode,
    ) -> BxDF<'_> {
        BxDF::SpecularTransmission(arena.alloc(Self {
            t,
            eta_a,
            eta_b,
            fresnel: FresnelDielectric::new(eta_a, eta_b),
            mode,
        }))
    }

    /// Returns the BxDF type.
    pub fn get_type(&self) -> BxDFType {
        BxDFType::TRANSMISSION | BxDFType::SPECULAR
    }

    /// A delta distribution scatters no light for arbitrary direction pairs.
    pub fn f(&self, _wo: &Vector3f, _wi: &Vector3f) -> Spectrum {
        Spectrum::ZERO
    }

    /// Returns the refracted direction of `wo`, or a failed sample on total
    /// internal reflection.
    ///
    /// * `wo` - Outgoing direction.
    /// * `u`  - Unused.
    pub fn sample_f(&self, wo: &Vector3f, _u: &Point2f) -> BxDFSample {
        // Figure out which η is incident and which is transmitted.
        let entering = cos_theta(wo) > 0.0;
        let (eta_i, eta_t) = if entering {
            (self.eta_a, self.eta_b)
        } else {
            (self.eta_b, self.eta_a)
        };

        let n = Normal3f::new(0.0, 0.0, 1.0).face_forward(wo);
        match refract(wo, &n, eta_i / eta_t) {
            Some(wi) => {
                let cos_i = abs_cos_theta(&wi);
                if cos_i == 0.0 {
                    return BxDFSample::from(self.get_type());
                }
                let mut ft = self.t * (Spectrum::ONE - self.fresnel.evaluate(cos_theta(&wi)));

                // Account for non-symmetry with transmission to different medium.
                if self.mode == TransportMode::Radiance {
                    ft *= (eta_i * eta_i) / (eta_t * eta_t);
                }
                BxDFSample::new(ft / cos_i, 1.0, wi, self.get_type())
            }
            None => BxDFSample::from(self.get_type()),
        }
    }

    /// The PDF of a delta distribution is zero for arbitrary direction pairs.
    pub fn pdf(&self, _wo: &Vector3f, _wi: &Vector3f) -> Float {
        0.0
    }
}
