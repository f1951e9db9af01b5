//! Direct lighting estimates shared by the transient integrators.

use nlos_core::geometry::*;
use nlos_core::interaction::*;
use nlos_core::light::*;
use nlos_core::pbrt::*;
use nlos_core::reflection::*;
use nlos_core::sampler::*;
use nlos_core::sampling::*;
use nlos_core::scene::*;
use nlos_core::spectrum::*;
use std::sync::Arc;

/// One direct lighting contribution and the distance the light travelled
/// from the light source to the surface point.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct DirectSample {
    /// Reflected radiance.
    pub ld: Spectrum,

    /// Distance from the point on the light to the surface point.
    pub distance: Float,
}

/// Direct illumination at a surface point. The light sampling and the BSDF
/// sampling strategies generally reach the light at different points, so each
/// keeps its own distance.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct DirectLighting {
    /// Contribution of the light source sample.
    pub light_sample: Option<DirectSample>,

    /// Contribution of the BSDF sample that hit the light.
    pub bsdf_sample: Option<DirectSample>,
}

impl DirectLighting {
    /// Returns the contributions that were found.
    pub fn samples(&self) -> impl Iterator<Item = &DirectSample> {
        self.light_sample.iter().chain(self.bsdf_sample.iter())
    }

    /// Returns the sum of the contributions.
    pub fn total(&self) -> Spectrum {
        self.samples().fold(Spectrum::ZERO, |acc, s| acc + s.ld)
    }

    fn scale(self, inv_pdf: Float) -> Self {
        let scale = |s: DirectSample| DirectSample {
            ld: s.ld * inv_pdf,
            distance: s.distance,
        };
        Self {
            light_sample: self.light_sample.map(scale),
            bsdf_sample: self.bsdf_sample.map(scale),
        }
    }
}

/// Sample one light, chosen uniformly or from `light_distrib`, and return
/// its direct lighting contributions divided by the selection probability.
/// Returns `None` when no light could be selected.
///
/// * `si`            - The surface interaction.
/// * `bsdf`          - The BSDF at the surface interaction.
/// * `scene`         - The scene.
/// * `sampler`       - The sampler.
/// * `light_distrib` - Distribution over `scene.lights`.
pub fn uniform_sample_one_light(
    si: &SurfaceInteraction,
    bsdf: &BSDF,
    scene: &Scene,
    sampler: &mut dyn Sampler,
    light_distrib: Option<&Distribution1D>,
) -> Option<DirectLighting> {
    // Randomly choose a single light to sample, `light`.
    let n_lights = scene.lights.len();
    if n_lights == 0 {
        return None;
    }
    let (light_num, light_pdf) = match light_distrib {
        Some(ld) => {
            let (ln, pdf, _) = ld.sample_discrete(sampler.get_1d());
            if pdf == 0.0 {
                return None;
            }
            (ln, pdf)
        }
        None => {
            let u = sampler.get_1d();
            let ln = min((u * n_lights as Float) as usize, n_lights - 1);
            (ln, 1.0 / n_lights as Float)
        }
    };

    let light = &scene.lights[light_num];
    let u_light = sampler.get_2d();
    let u_scattering = sampler.get_2d();
    let estimate = estimate_direct(si, bsdf, &u_scattering, light, &u_light, scene);
    Some(estimate.scale(1.0 / light_pdf))
}

/// Compute a direct lighting estimate for a light source sample by applying
/// multiple importance sampling. Specular lobes are ignored. Each strategy
/// that reaches the light unoccluded yields its own contribution, tagged with
/// the distance to the point where it reached the light.
///
/// * `si`           - The surface interaction.
/// * `bsdf`         - The BSDF at the surface interaction.
/// * `u_scattering` - Scattering sample.
/// * `light`        - The light.
/// * `u_light`      - Light sample.
/// * `scene`        - The scene.
pub fn estimate_direct(
    si: &SurfaceInteraction,
    bsdf: &BSDF,
    u_scattering: &Point2f,
    light: &ArcLight,
    u_light: &Point2f,
    scene: &Scene,
) -> DirectLighting {
    let bsdf_flags = BxDFType::ALL & !BxDFType::SPECULAR;
    let hit = &si.hit;
    let mut direct = DirectLighting::default();

    // Sample light source with multiple importance sampling.
    let li = light.sample_li(hit, u_light);
    if li.pdf > 0.0 && !li.value.is_black() {
        let f = bsdf.f(&hit.wo, &li.wi, bsdf_flags) * li.wi.abs_dot_n(&si.shading.n);
        let scattering_pdf = bsdf.pdf(&hit.wo, &li.wi, bsdf_flags);
        debug!("  surf f*dot : {f}, scatteringPdf: {scattering_pdf}");

        if !f.is_black() && li.visibility.map_or(true, |vis| vis.unoccluded(scene)) {
            let ld = if light.is_delta_light() {
                f * li.value / li.pdf
            } else {
                let weight = power_heuristic(1, li.pdf, 1, scattering_pdf);
                f * li.value * weight / li.pdf
            };
            direct.light_sample = Some(DirectSample {
                ld,
                distance: li.distance(),
            });
        } else {
            debug!("  light sample blocked or outside the BSDF lobes");
        }
    }

    // Sample BSDF with multiple importance sampling.
    if !light.is_delta_light() {
        let sample = bsdf.sample_f(&hit.wo, u_scattering, bsdf_flags);
        let f = sample.f * sample.wi.abs_dot_n(&si.shading.n);
        if !f.is_black() && sample.pdf > 0.0 {
            let light_pdf = light.pdf_li(hit, &sample.wi);
            if light_pdf == 0.0 {
                return direct;
            }
            let weight = power_heuristic(1, sample.pdf, 1, light_pdf);

            // Add light contribution from material sampling if the BSDF ray
            // reaches this light.
            let ray = hit.spawn_ray(&sample.wi);
            if let Some(light_isect) = scene.intersect(&ray) {
                let reaches_light = light_isect
                    .primitive
                    .and_then(|p| p.area_light.as_ref())
                    .map_or(false, |area_light| {
                        Arc::as_ptr(area_light) as *const () == Arc::as_ptr(light) as *const ()
                    });
                if reaches_light {
                    let le = light_isect.le(&(-sample.wi));
                    if !le.is_black() {
                        direct.bsdf_sample = Some(DirectSample {
                            ld: f * le * weight / sample.pdf,
                            distance: hit.p.distance(light_isect.hit.p),
                        });
                    }
                }
            }
        }
    }

    direct
}

#[cfg(test)]
mod tests {
    use super::*;
    use bumpalo::Bump;
    use float_cmp::*;
    use lights::DiffuseAreaLight;
    use materials::MatteMaterial;
    use nlos_core::material::*;
    use nlos_core::primitive::*;
    use nlos_core::shape::ArcShape;
    use shapes::TriangleMesh;

    fn triangle(indices: Vec<usize>, p: Vec<Point3f>) -> ArcShape {
        let mut shapes = TriangleMesh::create(false, indices, p, vec![], vec![]);
        shapes.remove(0)
    }

    /// Small floor around the origin facing +z, lit by a large emitter in the
    /// z = 2 plane facing -z.
    fn lit_floor() -> Scene {
        let floor = triangle(
            vec![0, 1, 2],
            vec![
                Point3f::new(-1.0, -1.0, 0.0),
                Point3f::new(1.0, -1.0, 0.0),
                Point3f::new(0.0, 1.0, 0.0),
            ],
        );
        let emitter = triangle(
            vec![0, 2, 1],
            vec![
                Point3f::new(-20.0, -20.0, 2.0),
                Point3f::new(40.0, -20.0, 2.0),
                Point3f::new(-20.0, 40.0, 2.0),
            ],
        );

        let matte = Arc::new(MatteMaterial::new(Spectrum::new(0.5)));
        let area_light = Arc::new(DiffuseAreaLight::new(
            Spectrum::new(1.0),
            Arc::clone(&emitter),
            false,
        ));
        let primitives: Vec<ArcPrimitive> = vec![
            Arc::new(GeometricPrimitive::new(
                floor,
                Some(matte as ArcMaterial),
                None,
                ObjectSemantic::Default,
            )),
            Arc::new(GeometricPrimitive::new(
                emitter,
                None,
                Some(area_light.clone() as ArcAreaLight),
                ObjectSemantic::Default,
            )),
        ];
        Scene::new(primitives, vec![area_light as ArcLight])
    }

    #[test]
    fn each_strategy_keeps_its_own_distance() {
        let scene = lit_floor();
        let ray = Ray::new(
            Point3f::new(0.0, 0.0, 1.0),
            Vector3f::new(0.0, 0.0, -1.0),
            INFINITY,
            0.0,
        );
        let si = scene.intersect(&ray).unwrap();
        let arena = Bump::new();
        let bsdf = si
            .primitive
            .and_then(|p| p.material.as_ref())
            .and_then(|m| m.compute_scattering_functions(&arena, &si, TransportMode::Radiance))
            .unwrap();

        let light = &scene.lights[0];
        let u_light = Point2f::new(0.1, 0.1);
        let u_scattering = Point2f::new(0.6, 0.5);
        let direct = estimate_direct(&si, bsdf, &u_scattering, light, &u_light, &scene);

        let li = light.sample_li(&si.hit, &u_light);
        let light_sample = direct.light_sample.unwrap();
        assert!(approx_eq!(f32, light_sample.distance, li.distance(), epsilon = 1e-4));

        let flags = BxDFType::ALL & !BxDFType::SPECULAR;
        let wi = bsdf.sample_f(&si.hit.wo, &u_scattering, flags).wi;
        let bsdf_sample = direct.bsdf_sample.unwrap();
        assert!(approx_eq!(f32, bsdf_sample.distance, 2.0 / wi.z, epsilon = 1e-4));
        assert!((light_sample.distance - bsdf_sample.distance).abs() > 1.0);

        assert_eq!(direct.samples().count(), 2);
        assert_eq!(direct.total(), light_sample.ld + bsdf_sample.ld);
    }

    #[test]
    fn selection_pdf_scales_every_contribution() {
        let scene = lit_floor();
        let ray = Ray::new(
            Point3f::new(0.0, 0.0, 1.0),
            Vector3f::new(0.0, 0.0, -1.0),
            INFINITY,
            0.0,
        );
        let si = scene.intersect(&ray).unwrap();
        let arena = Bump::new();
        let bsdf = si
            .primitive
            .and_then(|p| p.material.as_ref())
            .and_then(|m| m.compute_scattering_functions(&arena, &si, TransportMode::Radiance))
            .unwrap();

        let s = DirectSample {
            ld: Spectrum::new(1.0),
            distance: 3.0,
        };
        let direct = DirectLighting {
            light_sample: Some(s),
            bsdf_sample: None,
        }
        .scale(4.0);
        assert_eq!(direct.light_sample.unwrap().ld, Spectrum::new(4.0));
        assert_eq!(direct.light_sample.unwrap().distance, 3.0);
        assert!(direct.bsdf_sample.is_none());

        // A single light is always selected.
        let mut sampler = samplers::RandomSampler::new(1, 5);
        assert!(uniform_sample_one_light(&si, bsdf, &scene, &mut sampler, None).is_some());
    }
}
