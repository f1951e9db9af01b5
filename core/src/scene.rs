//! Scene

use crate::geometry::*;
use crate::interaction::*;
use crate::light::*;
use crate::nlos::*;
use crate::primitive::*;
use std::sync::Arc;

/// Scene geometry, lights and the NLOS object catalog.
pub struct Scene {
    /// All primitives in the scene.
    pub primitives: Vec<ArcPrimitive>,

    /// All light sources in the scene.
    pub lights: Vec<ArcLight>,

    /// Infinite light sources in the scene.
    pub infinite_lights: Vec<ArcLight>,

    /// The bounding box of the scene geometry.
    pub world_bound: Bounds3f,

    /// Hidden objects visible from the reflector. `None` when the scene has
    /// no NLOS objects or the catalog could not be built.
    pub nlos: Option<NlosObjectCatalog>,
}

impl Scene {
    /// Creates a new `Scene`. Problems building the NLOS catalog are logged
    /// and leave the scene without one.
    ///
    /// * `primitives` - All primitives in the scene.
    /// * `lights`     - All light sources in the scene.
    pub fn new(primitives: Vec<ArcPrimitive>, lights: Vec<ArcLight>) -> Self {
        let world_bound = primitives
            .iter()
            .fold(Bounds3f::empty(), |b, p| b.union(&p.world_bound()));

        let nlos = match NlosObjectCatalog::new(&primitives) {
            Ok(catalog) => catalog,
            Err(e) => {
                error!("{e}. Rendering without NLOS objects.");
                None
            }
        };

        let infinite_lights = lights
            .iter()
            .filter(|l| l.get_type().contains(LightType::INFINITE_LIGHT))
            .map(Arc::clone)
            .collect();

        let scene = Self {
            primitives,
            lights,
            infinite_lights,
            world_bound,
            nlos,
        };

        for light in scene.lights.iter() {
            light.preprocess(&scene);
        }

        scene
    }

    /// Traces the ray into the scene and returns the closest surface hit.
    ///
    /// * `ray` - The ray to trace.
    pub fn intersect(&self, ray: &Ray) -> Option<SurfaceInteraction<'_>> {
        let mut r = *ray;
        let mut closest = None;
        for primitive in self.primitives.iter() {
            if let Some(it) = primitive.intersect(&r) {
                r.t_max = it.t;
                closest = Some(it.isect);
            }
        }
        closest
    }

    /// Returns `true` if the ray hits anything.
    ///
    /// * `ray` - The ray to trace.
    pub fn intersect_p(&self, ray: &Ray) -> bool {
        self.primitives.iter().any(|p| p.intersect_p(ray))
    }
}
