//! Reflection and surface scattering models

use crate::geometry::*;
use crate::pbrt::*;
use crate::sampling::*;
use crate::spectrum::*;
use bitflags::bitflags;
use bumpalo::Bump;

mod bsdf;
mod fresnel;
mod lambertian_reflection;
mod specular_reflection;
mod specular_transmission;

// Re-export
pub use bsdf::*;
pub use fresnel::*;
pub use lambertian_reflection::*;
pub use specular_reflection::*;
pub use specular_transmission::*;

bitflags! {
    /// Stores combinations of reflection models.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    pub struct BxDFType: u8 {
        const REFLECTION = 1 << 0;
        const TRANSMISSION = 1 << 1;
        const DIFFUSE = 1 << 2;
        const GLOSSY = 1 << 3;
        const SPECULAR = 1 << 4;
        const ALL = Self::REFLECTION.bits()
            | Self::TRANSMISSION.bits()
            | Self::DIFFUSE.bits()
            | Self::GLOSSY.bits()
            | Self::SPECULAR.bits();
    }
}

/// Light transport mode enumeration.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TransportMode {
    /// Indicates incident ray that intersected a point started at the camera.
    Radiance,

    /// Indicates incident ray that intersected a point started at the light
    /// source.
    Importance,
}

/// Stores evaluation of BxDF samples.
#[derive(Copy, Clone, Debug, Default)]
pub struct BxDFSample {
    /// The sample value.
    pub f: Spectrum,

    /// The value of the PDF.
    pub pdf: Float,

    /// The sampled inbound direction.
    pub wi: Vector3f,

    /// The type of BxDF that was sampled.
    pub bxdf_type: BxDFType,
}

impl BxDFSample {
    /// Create a new `BxDFSample`.
    ///
    /// * `f`         - The sample value.
    /// * `pdf`       - The value of the PDF.
    /// * `wi`        - The sampled inbound direction.
    /// * `bxdf_type` - The type of BxDF.
    pub fn new(f: Spectrum, pdf: Float, wi: Vector3f, bxdf_type: BxDFType) -> Self {
        Self {
            f,
            pdf,
            wi,
            bxdf_type,
        }
    }
}

impl From<BxDFType> for BxDFSample {
    /// Create a failed sample carrying only the BxDF type.
    ///
    /// * `bxdf_type` - The type of BxDF.
    fn from(bxdf_type: BxDFType) -> Self {
        Self {
            bxdf_type,
            ..Default::default()
        }
    }
}

/// BxDF for BRDFs and BTDFs. The models live in the per-sample memory arena.
#[derive(Copy, Clone)]
pub enum BxDF<'arena> {
    LambertianReflection(&'arena LambertianReflection),
    SpecularReflection(&'arena SpecularReflection),
    SpecularTransmission(&'arena SpecularTransmission),
}

impl<'arena> BxDF<'arena> {
    /// Returns the BxDF type.
    pub fn get_type(&self) -> BxDFType {
        match self {
            BxDF::LambertianReflection(bxdf) => bxdf.get_type(),
            BxDF::SpecularReflection(bxdf) => bxdf.get_type(),
            BxDF::SpecularTransmission(bxdf) => bxdf.get_type(),
        }
    }

    /// Returns true if all of this BxDF's type flags are in `t`.
    ///
    /// * `t` - The reflection model to compare.
    pub fn matches_flags(&self, t: BxDFType) -> bool {
        t.contains(self.get_type())
    }

    /// Returns the value of the distribution function for the given pair of
    /// directions.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    pub fn f(&self, wo: &Vector3f, wi: &Vector3f) -> Spectrum {
        match self {
            BxDF::LambertianReflection(bxdf) => bxdf.f(wo, wi),
            BxDF::SpecularReflection(bxdf) => bxdf.f(wo, wi),
            BxDF::SpecularTransmission(bxdf) => bxdf.f(wo, wi),
        }
    }

    /// Samples an incident direction for the outgoing direction.
    ///
    /// * `wo` - Outgoing direction.
    /// * `u`  - The 2D uniform random values.
    pub fn sample_f(&self, wo: &Vector3f, u: &Point2f) -> BxDFSample {
        match self {
            BxDF::LambertianReflection(bxdf) => bxdf.sample_f(wo, u),
            BxDF::SpecularReflection(bxdf) => bxdf.sample_f(wo, u),
            BxDF::SpecularTransmission(bxdf) => bxdf.sample_f(wo, u),
        }
    }

    /// Evaluates the PDF for the sampling method.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    pub fn pdf(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        match self {
            BxDF::LambertianReflection(bxdf) => bxdf.pdf(wo, wi),
            BxDF::SpecularReflection(bxdf) => bxdf.pdf(wo, wi),
            BxDF::SpecularTransmission(bxdf) => bxdf.pdf(wo, wi),
        }
    }

    /// Returns true if `other` refers to the same model instance.
    ///
    /// * `other` - The other BxDF.
    fn is_same(&self, other: &Self) -> bool {
        match (self, other) {
            (BxDF::LambertianReflection(a), BxDF::LambertianReflection(b)) => std::ptr::eq(*a, *b),
            (BxDF::SpecularReflection(a), BxDF::SpecularReflection(b)) => std::ptr::eq(*a, *b),
            (BxDF::SpecularTransmission(a), BxDF::SpecularTransmission(b)) => std::ptr::eq(*a, *b),
            _ => false,
        }
    }
}

/// Returns cos(θ) of a direction in the shading coordinate system.
///
/// * `w` - The direction.
#[inline]
pub fn cos_theta(w: &Vector3f) -> Float {
    w.z
}

/// Returns |cos(θ)| of a direction in the shading coordinate system.
///
/// * `w` - The direction.
#[inline]
pub fn abs_cos_theta(w: &Vector3f) -> Float {
    w.z.abs()
}

/// Returns true if two directions lie in the same hemisphere of the shading
/// coordinate system.
///
/// * `w`  - First direction.
/// * `wp` - Second direction.
#[inline]
pub fn same_hemisphere(w: &Vector3f, wp: &Vector3f) -> bool {
    w.z * wp.z > 0.0
}

/// Reflect a direction about the normal.
///
/// * `wo` - The direction.
/// * `n`  - The normal.
#[inline]
pub fn reflect(wo: &Vector3f, n: &Vector3f) -> Vector3f {
    -*wo + *n * (2.0 * wo.dot(n))
}

/// Refract a direction through an interface. Returns `None` on total internal
/// reflection.
///
/// * `wi`  - Incident direction.
/// * `n`   - Normal in the same hemisphere as `wi`.
/// * `eta` - Ratio of the indices of refraction, incident over transmitted.
pub fn refract(wi: &Vector3f, n: &Normal3f, eta: Float) -> Option<Vector3f> {
    // Compute cos(θt) using Snell's law.
    let cos_theta_i = n.dot(wi);
    let sin2_theta_i = max(0.0, 1.0 - cos_theta_i * cos_theta_i);
    let sin2_theta_t = eta * eta * sin2_theta_i;

    // Handle total internal reflection for transmission.
    if sin2_theta_t >= 1.0 {
        return None;
    }

    let cos_theta_t = (1.0 - sin2_theta_t).sqrt();
    Some(-*wi * eta + Vector3f::from(*n) * (eta * cos_theta_i - cos_theta_t))
}
