//! Specular Reflection

use super::*;

/// BRDF for physically plausible specular reflection using a Fresnel
/// interface.
pub struct SpecularReflection {
    /// Spectrum used to scale the reflected colour.
    r: Spectrum,

    /// Fresnel interface.
    fresnel: Fresnel,
}

impl SpecularReflection {
    /// Allocate a new `SpecularReflection` in the arena.
    ///
    /// * `arena`   - The arena for memory allocations.
    /// * `r`       - Spectrum used to scale the reflected colour.
    /// * `fresnel` - Fresnel interface.
    pub fn alloc(arena: &Bump, r: Spectrum, fresnel: Fresnel) -> BxDF<'_> {
        BxDF::SpecularReflection(arena.alloc(Self { r, fresnel }))
    }

    /// Returns the BxDF type.
    pub fn get_type(&self) -> BxDFType {
        BxDFType::REFLECTION | BxDFType::SPECULAR
    }

    /// A delta distribution scatters no light for arbitrary direction pairs.
    pub fn f(&self, _wo: &Vector3f, _wi: &Vector3f) -> Spectrum {
        Spectrum::ZERO
    }

    /// Returns the mirror direction of `wo`.
    ///
    /// * `wo` - Outgoing direction.
    /// * `u`  - Unused.
    pub fn sample_f(&self, wo: &Vector3f, _u: &Point2f) -> BxDFSample {
        let wi = Vector3f::new(-wo.x, -wo.y, wo.z);
        let cos_i = cos_theta(&wi);
        if cos_i == 0.0 {
            return BxDFSample::from(self.get_type());
        }
        let f = self.fresnel.evaluate(cos_i) * self.r / abs(cos_i);
        BxDFSample::new(f, 1.0, wi, self.get_type())
    }

    /// The PDF of a delta distribution is zero for arbitrary direction pairs.
    pub fn pdf(&self, _wo: &Vector3f, _wi: &Vector3f) -> Float {
        0.0
    }
}
