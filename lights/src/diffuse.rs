//! Diffuse Area Light Source

use nlos_core::geometry::*;
use nlos_core::interaction::*;
use nlos_core::light::*;
use nlos_core::paramset::*;
use nlos_core::pbrt::*;
use nlos_core::shape::*;
use nlos_core::spectrum::*;
use std::sync::Arc;

/// Implements a basic area light source with uniform spatial and directional
/// radiance distribution.
#[derive(Clone)]
pub struct DiffuseAreaLight {
    /// Light source type.
    pub light_type: LightType,

    /// Emitted radiance.
    pub l_emit: Spectrum,

    /// Shape describing surface of the light source.
    pub shape: ArcShape,

    /// Surface area of the shape.
    pub area: Float,

    /// Indicates whether light source 2-sided.
    pub two_sided: bool,
}

impl DiffuseAreaLight {
    /// Returns a new `DiffuseAreaLight`.
    ///
    /// * `l_emit`    - Emitted radiance.
    /// * `shape`     - Shape describing surface of the light source.
    /// * `two_sided` - Indicates whether light source 2-sided.
    pub fn new(l_emit: Spectrum, shape: ArcShape, two_sided: bool) -> Self {
        let area = shape.area();
        Self {
            light_type: LightType::AREA_LIGHT,
            l_emit,
            shape: Arc::clone(&shape),
            two_sided,
            area,
        }
    }
}

impl AreaLight for DiffuseAreaLight {
    /// Returns emitted radiance based on `two_sided` flag.
    ///
    /// * `hit` - The interaction point.
    /// * `w`   - Direction.
    fn l(&self, hit: &Hit, w: &Vector3f) -> Spectrum {
        if self.two_sided || hit.n.dot(w) > 0.0 {
            self.l_emit
        } else {
            Spectrum::ZERO
        }
    }
}

impl Light for DiffuseAreaLight {
    /// Returns the type of light.
    fn get_type(&self) -> LightType {
        self.light_type
    }

    /// Return the radiance arriving at an interaction point.
    ///
    /// * `hit` - The interaction hit point.
    /// * `u`   - Sample value for Monte Carlo integration.
    fn sample_li(&self, hit: &Hit, u: &Point2f) -> Li {
        let (mut p_shape_hit, pdf) = self.shape.sample_solid_angle(hit, u);
        p_shape_hit.time = hit.time;

        let wi = p_shape_hit.p - hit.p;
        if pdf == 0.0 || wi.length_squared() == 0.0 {
            Li::new(wi, 0.0, None, Spectrum::ZERO)
        } else {
            let wi = wi.normalize();
            let visibility = Some(VisibilityTester::new(*hit, p_shape_hit));
            let value = self.l(&p_shape_hit, &(-wi));
            Li::new(wi, pdf, visibility, value)
        }
    }

    /// Return the total emitted power.
    fn power(&self) -> Spectrum {
        if self.two_sided {
            2.0 * self.l_emit * self.area * PI
        } else {
            self.l_emit * self.area * PI
        }
    }

    /// Returns the probability density with respect to solid angle for the light’s
    /// `sample_li()`.
    ///
    /// * `hit` - The interaction hit point.
    /// * `wi`  - The incident direction.
    fn pdf_li(&self, hit: &Hit, wi: &Vector3f) -> Float {
        self.shape.pdf_solid_angle(hit, wi)
    }
}

impl From<(&ParamSet, ArcShape)> for DiffuseAreaLight {
    /// Create a `DiffuseAreaLight` from given parameter set and shape.
    ///
    /// * `p` - A tuple containing the parameter set and shape.
    fn from(p: (&ParamSet, ArcShape)) -> Self {
        let (params, shape) = p;

        let l = params.find_one_spectrum("L", Spectrum::new(1.0));
        let sc = params.find_one_spectrum("scale", Spectrum::new(1.0));
        let two_sided = params.find_one_bool("twosided", false);
        if shape.area() == 0.0 {
            warn!("Area light attached to a degenerate shape.");
        }

        Self::new(l * sc, shape, two_sided)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use shapes::TriangleMesh;

    /// Unit right triangle in the z = 1 plane facing -z.
    fn ceiling() -> ArcShape {
        let mut shapes = TriangleMesh::create(
            false,
            vec![0, 2, 1],
            vec![
                Point3f::new(0.0, 0.0, 1.0),
                Point3f::new(1.0, 0.0, 1.0),
                Point3f::new(0.0, 1.0, 1.0),
            ],
            vec![],
            vec![],
        );
        shapes.remove(0)
    }

    fn floor_hit() -> Hit {
        Hit::new(
            Point3f::new(0.25, 0.25, 0.0),
            0.0,
            Vector3f::new(0.0, 0.0, 1.0),
            Normal3f::new(0.0, 0.0, 1.0),
        )
    }

    #[test]
    fn one_sided_emission() {
        let light = DiffuseAreaLight::new(Spectrum::new(3.0), ceiling(), false);
        let (on_light, _) = light.shape.sample_area(&Point2f::new(0.5, 0.5));
        assert_eq!(on_light.n, Normal3f::new(0.0, 0.0, -1.0));
        assert_eq!(
            light.l(&on_light, &Vector3f::new(0.0, 0.0, -1.0)),
            Spectrum::new(3.0)
        );
        assert!(light.l(&on_light, &Vector3f::new(0.0, 0.0, 1.0)).is_black());

        let two_sided = DiffuseAreaLight::new(Spectrum::new(3.0), ceiling(), true);
        assert!(!two_sided.l(&on_light, &Vector3f::new(0.0, 0.0, 1.0)).is_black());
        assert!(approx_eq!(
            f32,
            two_sided.power()[0],
            2.0 * light.power()[0],
            epsilon = 1e-5
        ));
    }

    #[test]
    fn sample_li_matches_pdf_li() {
        let light = DiffuseAreaLight::new(Spectrum::new(1.0), ceiling(), false);
        let hit = floor_hit();
        let li = light.sample_li(&hit, &Point2f::new(0.3, 0.6));
        assert!(li.pdf > 0.0);
        assert_eq!(li.value, Spectrum::new(1.0));
        assert!(li.visibility.is_some());

        let pdf = light.pdf_li(&hit, &li.wi);
        assert!(approx_eq!(f32, pdf, li.pdf, epsilon = 1e-3 * li.pdf));
        assert!(approx_eq!(f32, li.wi.length(), 1.0, epsilon = 1e-5));
    }

    #[test]
    fn miss_has_zero_pdf() {
        let light = DiffuseAreaLight::new(Spectrum::new(1.0), ceiling(), false);
        let pdf = light.pdf_li(&floor_hit(), &Vector3f::new(0.0, 0.0, -1.0));
        assert_eq!(pdf, 0.0);
    }
}
