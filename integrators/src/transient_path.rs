//! Transient Path Integrator

use super::*;
use bumpalo::Bump;
use nlos_core::camera::*;
use nlos_core::geometry::*;
use nlos_core::integrator::*;
use nlos_core::light_distrib::*;
use nlos_core::material::*;
use nlos_core::paramset::*;
use nlos_core::pbrt::*;
use nlos_core::reflection::*;
use nlos_core::sampler::*;
use nlos_core::scene::*;
use nlos_core::spectrum::*;

/// Path tracer that reports every light path it finds together with the
/// distance the light travelled along it.
pub struct TransientPathIntegrator {
    /// Common data for integrators.
    pub data: IntegratorData,

    /// Maximum number of bounces.
    max_depth: usize,

    /// Russian roulette threshold used to terminate path sampling.
    rr_threshold: Float,

    /// Light sampling strategy.
    light_sample_strategy: LightSampleStrategy,

    /// Leave the segment from the camera to the first hit out of the
    /// path length.
    ignore_distance_to_camera: bool,

    /// Light distribution. Set in `preprocess()`.
    light_distribution: Option<ArcLightDistribution>,
}

impl TransientPathIntegrator {
    /// Create a new `TransientPathIntegrator`.
    ///
    /// * `data`                      - Camera, sampler and pixel bounds.
    /// * `max_depth`                 - Maximum number of bounces.
    /// * `rr_threshold`              - Russian roulette threshold used to
    ///                                 terminate path sampling.
    /// * `light_sample_strategy`     - Light sampling strategy.
    /// * `ignore_distance_to_camera` - Leave the camera segment out of the
    ///                                 path length.
    pub fn new(
        data: IntegratorData,
        max_depth: usize,
        rr_threshold: Float,
        light_sample_strategy: LightSampleStrategy,
        ignore_distance_to_camera: bool,
    ) -> Self {
        Self {
            data,
            max_depth,
            rr_threshold,
            light_sample_strategy,
            ignore_distance_to_camera,
            light_distribution: None,
        }
    }
}

/// Applies Russian roulette to the path throughput. Radiance scaling due to
/// refraction is factored out before comparing with the threshold. Returns
/// the new throughput, or `None` if the path is terminated.
///
/// * `beta`         - Path throughput.
/// * `eta_scale`    - Accumulated radiance scaling from refraction.
/// * `rr_threshold` - Throughput below which paths may be terminated.
/// * `u`            - Uniform sample in [0, 1).
pub fn russian_roulette(
    beta: Spectrum,
    eta_scale: Float,
    rr_threshold: Float,
    u: Float,
) -> Option<Spectrum> {
    let rr_beta = beta * eta_scale;
    let max_component = rr_beta.max_component_value();
    if max_component >= rr_threshold {
        return Some(beta);
    }

    let q = max(0.05, 1.0 - max_component);
    if u < q {
        None
    } else {
        Some(beta / (1.0 - q))
    }
}

impl Integrator for TransientPathIntegrator {
    /// Returns the common data.
    fn get_data(&self) -> &IntegratorData {
        &self.data
    }

    /// Builds the light distribution.
    ///
    /// * `scene` - The scene
    fn preprocess(&mut self, scene: &Scene) {
        self.light_distribution = Some(create_light_sample_distribution(
            self.light_sample_strategy,
            scene,
        ));

        match &scene.nlos {
            Some(catalog) => info!(
                "NLOS catalog: {} hidden triangles ({} culled), total area {}",
                catalog.len(),
                catalog.culled_count(),
                catalog.total_area()
            ),
            None => debug!("Scene has no NLOS catalog"),
        }
    }

    /// Traces a camera ray and records one sample per emission and direct
    /// lighting event along the path.
    ///
    /// * `ray`     - The camera ray.
    /// * `scene`   - The scene.
    /// * `sampler` - The sampler.
    /// * `arena`   - Scratch memory for BSDFs.
    /// * `samples` - Output for the time-tagged radiance samples.
    fn li(
        &self,
        ray: &Ray,
        scene: &Scene,
        sampler: &mut dyn Sampler,
        arena: &Bump,
        samples: &mut Vec<TransientSample>,
    ) {
        let mut ray = *ray;
        let mut beta = Spectrum::ONE;
        let mut specular_bounce = false;
        let mut eta_scale: Float = 1.0;
        let mut path_length: Float = 0.0;
        let mut last_position = ray.o;
        let mut on_camera_segment = true;

        let mut bounces = 0_usize;
        loop {
            debug!("Transient path bounce {bounces}, beta = {beta}, length = {path_length}");

            // Find closest ray intersection. Escaping rays carry nothing.
            let isect = match scene.intersect(&ray) {
                Some(isect) => isect,
                None => break,
            };

            if !(on_camera_segment && self.ignore_distance_to_camera) {
                path_length += last_position.distance(isect.hit.p);
            }
            last_position = isect.hit.p;

            // Possibly add emitted light at intersection.
            if bounces == 0 || specular_bounce {
                let le = isect.le(&(-ray.d));
                if !le.is_black() {
                    samples.push(TransientSample::new(beta * le, path_length));
                    debug!("Added Le {le} at length {path_length}");
                }
            }

            if bounces >= self.max_depth {
                break;
            }

            // Compute scattering functions and skip over boundaries.
            let bsdf = isect.primitive.and_then(|p| p.material.as_ref()).and_then(|m| {
                m.compute_scattering_functions(arena, &isect, TransportMode::Radiance)
            });
            let bsdf = match bsdf {
                Some(bsdf) => bsdf,
                None => {
                    debug!("Skipping intersection due to null bsdf");
                    ray = isect.hit.spawn_ray(&ray.d);
                    continue; // No need to update bounces for skips.
                }
            };
            on_camera_segment = false;

            // Sample illumination from lights to find path contribution. (But
            // skip this for perfectly specular BSDFs).
            if !bsdf.is_purely_specular() {
                let distrib = self
                    .light_distribution
                    .as_ref()
                    .and_then(|d| d.lookup(&isect.hit.p));
                if let Some(direct) =
                    uniform_sample_one_light(&isect, bsdf, scene, sampler, distrib.as_deref())
                {
                    debug!("Sampled direct lighting Ld = {}", direct.total());
                    samples.extend(direct.samples().map(|d| {
                        TransientSample::new(beta * d.ld, path_length + d.distance)
                    }));
                }
            }

            // Sample BSDF to get new path direction.
            let wo = -ray.d;
            let BxDFSample {
                f,
                pdf,
                wi,
                bxdf_type: flags,
            } = bsdf.sample_f(&wo, &sampler.get_2d(), BxDFType::ALL);
            debug!("Sampled BSDF, f = {f}, pdf = {pdf}");

            if f.is_black() || pdf == 0.0 {
                break;
            }
            beta *= f * wi.abs_dot_n(&isect.shading.n) / pdf;
            specular_bounce = flags.contains(BxDFType::SPECULAR);

            if flags.contains(BxDFType::SPECULAR | BxDFType::TRANSMISSION) {
                let eta = bsdf.eta;
                // Track radiance scaling for refraction depending on whether
                // the ray is entering or leaving the medium.
                eta_scale *= if wo.dot_n(&isect.hit.n) > 0.0 {
                    eta * eta
                } else {
                    1.0 / (eta * eta)
                };
            }
            ray = isect.hit.spawn_ray(&wi);

            // Possibly terminate the path with Russian roulette.
            if bounces > 3 {
                match russian_roulette(beta, eta_scale, self.rr_threshold, sampler.get_1d()) {
                    Some(b) => beta = b,
                    None => break,
                }
            }

            bounces += 1;
        }
    }
}

impl From<(&ParamSet, ArcSampler, ArcCamera)> for TransientPathIntegrator {
    /// Create a `TransientPathIntegrator` from given parameter set, sampler and
    /// camera.
    ///
    /// * `p` - A tuple containing parameter set, sampler and camera.
    fn from(p: (&ParamSet, ArcSampler, ArcCamera)) -> Self {
        let (params, sampler, camera) = p;

        let max_depth = params.find_one_int("maxdepth", 5);
        if max_depth < 0 {
            warn!("maxdepth {max_depth} is negative. Using 0.");
        }

        let pb = params.find_int("pixelbounds");
        let mut pixel_bounds = camera.get_data().film.get_sample_bounds();
        match pb.len() {
            0 => {}
            4 => {
                pixel_bounds = pixel_bounds.intersect(&Bounds2i::new(
                    Point2i::new(pb[0], pb[2]),
                    Point2i::new(pb[1], pb[3]),
                ));
                if pixel_bounds.area() == 0 {
                    error!("Degenerate 'pixelbounds' specified.");
                }
            }
            np => error!("Expected 4 values for 'pixelbounds' parameter. Got {np}."),
        }

        let rr_threshold = params.find_one_float("rrthreshold", 1.0);
        let light_strategy =
            params.find_one_string("lightsamplestrategy", String::from("spatial"));
        let ignore_distance_to_camera = params.find_one_bool("ignoreDistanceToCamera", false);

        Self::new(
            IntegratorData::new(camera, sampler, pixel_bounds),
            max(max_depth, 0) as usize,
            rr_threshold,
            LightSampleStrategy::from(light_strategy.as_str()),
            ignore_distance_to_camera,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cameras::PerspectiveCamera;
    use filters::BoxFilter;
    use float_cmp::*;
    use lights::{DiffuseAreaLight, PointLight};
    use materials::MatteMaterial;
    use nlos_core::film::TransientFilm;
    use nlos_core::filter::ArcFilter;
    use nlos_core::light::*;
    use nlos_core::primitive::*;
    use nlos_core::rng::RNG;
    use nlos_core::shape::ArcShape;
    use samplers::RandomSampler;
    use nlos_core::transient_image::TransientImage;
    use shapes::TriangleMesh;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn new_integrator(params: &ParamSet) -> TransientPathIntegrator {
        let mut film_params = ParamSet::new();
        film_params.add_int("xresolution", &[4]);
        film_params.add_int("yresolution", &[4]);
        film_params.add_int("tresolution", &[8]);
        let filter: ArcFilter = Arc::new(BoxFilter::new(Vector2f::new(0.5, 0.5)));
        let film = TransientFilm::from((&film_params, filter));
        let camera: ArcCamera = Arc::new(PerspectiveCamera::from((&ParamSet::new(), film)));
        let sampler: ArcSampler = Arc::new(RandomSampler::new(1, 0));
        TransientPathIntegrator::from((params, sampler, camera))
    }

    /// Triangle in the plane `z` that faces +z.
    fn facing_up(z: Float) -> ArcShape {
        let mut shapes = TriangleMesh::create(
            false,
            vec![0, 1, 2],
            vec![
                Point3f::new(-1.0, -1.0, z),
                Point3f::new(1.0, -1.0, z),
                Point3f::new(0.0, 1.0, z),
            ],
            vec![],
            vec![],
        );
        shapes.remove(0)
    }

    fn trace(integrator: &TransientPathIntegrator, scene: &Scene, ray: &Ray) -> Vec<TransientSample> {
        let mut sampler = RandomSampler::new(1, 3);
        let arena = Bump::new();
        let mut samples = vec![];
        integrator.li(ray, scene, &mut sampler, &arena, &mut samples);
        samples
    }

    #[test]
    fn russian_roulette_is_unbiased() {
        let mut rng = RNG::new(7);
        let beta = Spectrum::new(0.3);
        let n = 100_000;
        for eta_scale in [1.0, 2.25, 1.0 / 2.25] {
            let mut sum = 0.0;
            for _ in 0..n {
                if let Some(b) = russian_roulette(beta, eta_scale, 1.0, rng.uniform_float()) {
                    sum += b[0];
                }
            }
            let mean = sum / n as Float;
            assert!(
                approx_eq!(f32, mean, 0.3, epsilon = 0.01),
                "eta_scale = {eta_scale}, mean = {mean}"
            );
        }

        // Bright paths are never touched, including paths that are only
        // bright once refraction scaling is factored out.
        assert_eq!(russian_roulette(Spectrum::new(2.0), 1.0, 1.0, 0.0), Some(Spectrum::new(2.0)));
        assert_eq!(russian_roulette(beta, 4.0, 1.0, 0.0), Some(beta));
        assert_eq!(russian_roulette(beta, 1.0, 1.0, 0.0), None);
    }

    #[test]
    fn emitter_time_of_flight_is_distance() {
        let shape = facing_up(-3.0);
        let area_light = Arc::new(DiffuseAreaLight::new(Spectrum::new(2.0), Arc::clone(&shape), false));
        let primitive = Arc::new(GeometricPrimitive::new(
            shape,
            None,
            Some(area_light.clone() as ArcAreaLight),
            ObjectSemantic::Default,
        ));
        let scene = Scene::new(vec![primitive], vec![area_light as ArcLight]);

        let mut integrator = new_integrator(&ParamSet::new());
        integrator.preprocess(&scene);
        let ray = Ray::new(Point3f::ZERO, Vector3f::new(0.0, 0.0, -1.0), INFINITY, 0.0);
        let samples = trace(&integrator, &scene, &ray);
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].l, Spectrum::new(2.0));
        assert!(approx_eq!(f32, samples[0].distance, 3.0, epsilon = 1e-5));

        let mut params = ParamSet::new();
        params.add_bool("ignoreDistanceToCamera", &[true]);
        let mut integrator = new_integrator(&params);
        integrator.preprocess(&scene);
        let samples = trace(&integrator, &scene, &ray);
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].distance, 0.0);
    }

    #[test]
    fn direct_lighting_adds_light_distance() {
        let matte = Arc::new(MatteMaterial::new(Spectrum::new(0.5)));
        let floor = Arc::new(GeometricPrimitive::new(
            facing_up(0.0),
            Some(matte as ArcMaterial),
            None,
            ObjectSemantic::Default,
        ));
        let light: ArcLight = Arc::new(PointLight::new(
            Point3f::new(0.0, 0.0, 2.0),
            Spectrum::new(4.0),
        ));
        let scene = Scene::new(vec![floor], vec![light]);

        let mut params = ParamSet::new();
        params.add_int("maxdepth", &[1]);
        let mut integrator = new_integrator(&params);
        integrator.preprocess(&scene);

        let ray = Ray::new(
            Point3f::new(0.0, 0.0, 1.0),
            Vector3f::new(0.0, 0.0, -1.0),
            INFINITY,
            0.0,
        );
        let samples = trace(&integrator, &scene, &ray);
        assert_eq!(samples.len(), 1);
        assert!(approx_eq!(f32, samples[0].l[0], 0.5 * INV_PI, epsilon = 1e-5));
        assert!(approx_eq!(f32, samples[0].distance, 3.0, epsilon = 1e-5));
    }

    #[test]
    fn max_depth_zero_only_sees_emission() {
        let matte = Arc::new(MatteMaterial::new(Spectrum::new(0.5)));
        let floor = Arc::new(GeometricPrimitive::new(
            facing_up(0.0),
            Some(matte as ArcMaterial),
            None,
            ObjectSemantic::Default,
        ));
        let light: ArcLight = Arc::new(PointLight::new(
            Point3f::new(0.0, 0.0, 2.0),
            Spectrum::new(4.0),
        ));
        let scene = Scene::new(vec![floor], vec![light]);

        let mut params = ParamSet::new();
        params.add_int("maxdepth", &[0]);
        let mut integrator = new_integrator(&params);
        integrator.preprocess(&scene);

        let ray = Ray::new(
            Point3f::new(0.0, 0.0, 1.0),
            Vector3f::new(0.0, 0.0, -1.0),
            INFINITY,
            0.0,
        );
        assert!(trace(&integrator, &scene, &ray).is_empty());
    }

    /// Camera with a 1x1 pixel, 8 unit time bins starting at 0.5 and a
    /// narrow field of view down -z.
    fn single_pixel_camera(filename: &str) -> ArcCamera {
        let mut film_params = ParamSet::new();
        film_params.add_int("xresolution", &[1]);
        film_params.add_int("yresolution", &[1]);
        film_params.add_int("tresolution", &[8]);
        film_params.add_float("t_min", &[0.5]);
        film_params.add_float("t_max", &[8.5]);
        film_params.add_string("filename", &[String::from(filename)]);
        let filter: ArcFilter = Arc::new(BoxFilter::new(Vector2f::new(0.5, 0.5)));
        let film = TransientFilm::from((&film_params, filter));

        let mut camera_params = ParamSet::new();
        camera_params.add_float("fov", &[1.0]);
        Arc::new(PerspectiveCamera::from((&camera_params, film)))
    }

    fn temp_file(name: &str) -> String {
        std::env::temp_dir().join(name).to_string_lossy().into_owned()
    }

    fn quiet_scheduler() -> TileScheduler {
        let mut scheduler = TileScheduler::new(16, 1, 0, "test");
        scheduler.quiet = true;
        scheduler
    }

    /// Pushes `per_ray` unit samples at time 3 for one camera ray out of
    /// `every`.
    struct FixedSamples {
        data: IntegratorData,
        calls: AtomicUsize,
        every: usize,
        per_ray: usize,
    }

    impl FixedSamples {
        fn new(filename: &str, every: usize, per_ray: usize) -> Self {
            let camera = single_pixel_camera(filename);
            let pixel_bounds = camera.get_data().film.get_sample_bounds();
            let sampler: ArcSampler = Arc::new(RandomSampler::new(64, 0));
            Self {
                data: IntegratorData::new(camera, sampler, pixel_bounds),
                calls: AtomicUsize::new(0),
                every,
                per_ray,
            }
        }
    }

    impl Integrator for FixedSamples {
        fn get_data(&self) -> &IntegratorData {
            &self.data
        }

        fn preprocess(&mut self, _scene: &Scene) {}

        fn li(
            &self,
            _ray: &Ray,
            _scene: &Scene,
            _sampler: &mut dyn Sampler,
            _arena: &Bump,
            samples: &mut Vec<TransientSample>,
        ) {
            if self.calls.fetch_add(1, Ordering::Relaxed) % self.every == 0 {
                for _ in 0..self.per_ray {
                    samples.push(TransientSample::new(Spectrum::new(1.0), 3.0));
                }
            }
        }
    }

    fn steady_state(integrator: &dyn Integrator) -> Float {
        integrator.get_data().camera.get_data().film.steady_state_image()[0]
    }

    #[test]
    fn rays_without_samples_darken_the_pixel() {
        let integ = FixedSamples::new(&temp_file("nlos_every_other_ray.ti"), 2, 1);
        let result = quiet_scheduler().render(&integ, &Scene::new(vec![], vec![])).unwrap();
        assert_eq!(result.samples_per_pixel, 64);
        assert!(approx_eq!(f32, steady_state(&integ), 0.5, epsilon = 1e-5));
    }

    #[test]
    fn samples_of_one_ray_add_up() {
        let integ = FixedSamples::new(&temp_file("nlos_two_per_ray.ti"), 1, 2);
        quiet_scheduler().render(&integ, &Scene::new(vec![], vec![])).unwrap();
        assert!(approx_eq!(f32, steady_state(&integ), 2.0, epsilon = 1e-5));
    }

    #[test]
    fn rendered_emitter_lands_in_its_time_bin() {
        let shape = {
            let mut shapes = TriangleMesh::create(
                false,
                vec![0, 1, 2],
                vec![
                    Point3f::new(-100.0, -100.0, -3.0),
                    Point3f::new(100.0, -100.0, -3.0),
                    Point3f::new(0.0, 100.0, -3.0),
                ],
                vec![],
                vec![],
            );
            shapes.remove(0)
        };
        let area_light = Arc::new(DiffuseAreaLight::new(Spectrum::new(2.0), Arc::clone(&shape), false));
        let primitive = Arc::new(GeometricPrimitive::new(
            shape,
            None,
            Some(area_light.clone() as ArcAreaLight),
            ObjectSemantic::Default,
        ));
        let scene = Scene::new(vec![primitive], vec![area_light as ArcLight]);

        let filename = temp_file("nlos_rendered_emitter.ti");
        let sampler: ArcSampler = Arc::new(RandomSampler::new(4, 0));
        let mut integ = TransientPathIntegrator::from((
            &ParamSet::new(),
            sampler,
            single_pixel_camera(&filename),
        ));
        integ.preprocess(&scene);

        let result = quiet_scheduler().render(&integ, &scene).unwrap();
        assert_eq!(result.tile_count, 1);
        assert_eq!(result.rejected_samples, 0);
        assert_eq!(result.discarded_samples, 0);
        assert_eq!(result.output_file, filename);

        // Time of flight 3 is the center of bin 2, [2.5, 3.5).
        let img = TransientImage::read_file(&filename).unwrap();
        assert_eq!(img.header.num_bins, 8);
        assert!(approx_eq!(f32, img.header.t_delta, 1.0, epsilon = 1e-6));
        for t in 0..8 {
            let expected = if t == 2 { 2.0 } else { 0.0 };
            assert!(
                approx_eq!(f32, img.pixel(t, 0, 0), expected, epsilon = 1e-4),
                "bin {t} = {}",
                img.pixel(t, 0, 0)
            );
        }
        let _ = std::fs::remove_file(&filename);
    }

    #[test]
    fn pixel_bounds_are_clipped_to_film() {
        let mut params = ParamSet::new();
        params.add_int("pixelbounds", &[1, 3, 0, 2]);
        let integrator = new_integrator(&params);
        assert_eq!(
            integrator.get_data().pixel_bounds,
            Bounds2i::new(Point2i::new(1, 0), Point2i::new(3, 2))
        );
    }
}
