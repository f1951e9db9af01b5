//! Point Light Source

use nlos_core::geometry::*;
use nlos_core::interaction::*;
use nlos_core::light::*;
use nlos_core::paramset::*;
use nlos_core::pbrt::*;
use nlos_core::spectrum::*;

/// Implements an isotropic point light source that emits the same amount of
/// light in all directions.
#[derive(Clone)]
pub struct PointLight {
    /// Light source type.
    pub light_type: LightType,

    /// Position.
    pub p_light: Point3f,

    /// Intensity.
    pub intensity: Spectrum,
}

impl PointLight {
    /// Returns a new `PointLight`.
    ///
    /// * `p_light`   - Position.
    /// * `intensity` - Intensity.
    pub fn new(p_light: Point3f, intensity: Spectrum) -> Self {
        Self {
            light_type: LightType::DELTA_POSITION_LIGHT,
            p_light,
            intensity,
        }
    }
}

impl Light for PointLight {
    /// Returns the type of light.
    fn get_type(&self) -> LightType {
        self.light_type
    }

    /// Return the radiance arriving at an interaction point.
    ///
    /// * `hit` - The interaction hit point.
    /// * `u`   - Sample value for Monte Carlo integration.
    fn sample_li(&self, hit: &Hit, _u: &Point2f) -> Li {
        let d2 = self.p_light.distance_squared(hit.p);
        if d2 == 0.0 {
            return Li::default();
        }
        let wi = (self.p_light - hit.p).normalize();
        let p1 = Hit::new_minimal(self.p_light, hit.time);
        let vis = VisibilityTester::new(*hit, p1);
        Li::new(wi, 1.0, Some(vis), self.intensity / d2)
    }

    /// Return the total emitted power.
    fn power(&self) -> Spectrum {
        FOUR_PI * self.intensity
    }

    /// A point light cannot be hit by an arbitrary direction.
    fn pdf_li(&self, _hit: &Hit, _wi: &Vector3f) -> Float {
        0.0
    }
}

impl From<&ParamSet> for PointLight {
    /// Create a `PointLight` from given parameter set.
    ///
    /// * `params` - The parameter set.
    fn from(params: &ParamSet) -> Self {
        let intensity = params.find_one_spectrum("I", Spectrum::new(1.0));
        let sc = params.find_one_spectrum("scale", Spectrum::new(1.0));
        let p = params.find_one_point3f("from", Point3f::default());
        if intensity.is_black() {
            warn!("Point light at {p} has zero intensity.");
        }
        Self::new(p, intensity * sc)
    }
}
