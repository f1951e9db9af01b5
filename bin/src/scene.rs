//! Built-in NLOS Scene
//!
//! A square relay wall in the `z = 0` plane seen head on by the camera, a
//! point light next to the camera and a small hidden object outside the
//! camera's field of view. The object has a second, back facing triangle that
//! the wall cannot see.

use lights::PointLight;
use materials::create_material;
use nlos_core::geometry::*;
use nlos_core::light::ArcLight;
use nlos_core::paramset::ParamSet;
use nlos_core::pbrt::*;
use nlos_core::primitive::*;
use nlos_core::transient_image::PixelInterpretationBlock;
use shapes::TriangleMesh;
use std::sync::Arc;

/// Scene name recorded in the image properties.
pub const SCENE_NAME: &str = "builtin-nlos";

/// Distance from the camera to the relay wall.
pub const CAMERA_DISTANCE: Float = 2.0;

/// Half the edge length of the relay wall.
pub const WALL_HALF_SIZE: Float = 1.0;

/// Geometry, lights and pixel layout of the built-in scene.
pub struct NlosScene {
    /// All primitives.
    pub primitives: Vec<ArcPrimitive>,

    /// All light sources.
    pub lights: Vec<ArcLight>,

    /// Camera position.
    pub eye: Point3f,

    /// Pixel layout on the relay wall.
    pub pixel_interpretation: PixelInterpretationBlock,
}

impl NlosScene {
    /// Builds the scene.
    pub fn new() -> Result<Self, String> {
        let h = WALL_HALF_SIZE;
        let eye = Point3f::new(0.0, 0.0, CAMERA_DISTANCE);
        let light_position = Point3f::new(0.25, 0.0, CAMERA_DISTANCE);

        let mut wall_material = ParamSet::new();
        wall_material.add_rgb_spectrum("Kd", &[0.8, 0.8, 0.8]);
        let mut object_material = ParamSet::new();
        object_material.add_rgb_spectrum("Kd", &[0.6, 0.6, 0.6]);

        let mut primitives = vec![];
        add_mesh(
            &mut primitives,
            &[
                Point3f::new(-h, -h, 0.0),
                Point3f::new(h, -h, 0.0),
                Point3f::new(h, h, 0.0),
                Point3f::new(-h, h, 0.0),
            ],
            &[0, 1, 2, 0, 2, 3],
            Point3f::new(0.0, 0.0, 1.0),
            &wall_material,
            ObjectSemantic::NlosReflector,
        )?;

        // Front face of the hidden object, turned towards the wall.
        add_mesh(
            &mut primitives,
            &[
                Point3f::new(1.5, -0.5, 1.0),
                Point3f::new(2.0, 0.5, 1.0),
                Point3f::new(2.5, -0.5, 1.0),
            ],
            &[0, 1, 2],
            Point3f::new(0.0, 0.0, -1.0),
            &object_material,
            ObjectSemantic::NlosObject,
        )?;

        // Back face.
        add_mesh(
            &mut primitives,
            &[
                Point3f::new(1.5, -0.5, 1.05),
                Point3f::new(2.5, -0.5, 1.05),
                Point3f::new(2.0, 0.5, 1.05),
            ],
            &[0, 1, 2],
            Point3f::new(0.0, 0.0, 1.0),
            &object_material,
            ObjectSemantic::NlosObject,
        )?;

        let mut light_params = ParamSet::new();
        light_params.add_rgb_spectrum("I", &[4.0, 4.0, 4.0]);
        light_params.add_point3f("from", &[light_position]);
        let lights: Vec<ArcLight> = vec![Arc::new(PointLight::from(&light_params))];

        let pixel_interpretation = PixelInterpretationBlock {
            top_left: [-h, h, 0.0],
            top_right: [h, h, 0.0],
            bottom_left: [-h, -h, 0.0],
            bottom_right: [h, -h, 0.0],
            laser_position: [light_position.x, light_position.y, light_position.z],
            ..Default::default()
        };

        Ok(Self {
            primitives,
            lights,
            eye,
            pixel_interpretation,
        })
    }

    /// Returns camera parameters framing the relay wall exactly.
    pub fn camera_params(&self) -> ParamSet {
        let fov = 2.0 * (WALL_HALF_SIZE / CAMERA_DISTANCE).atan().to_degrees();
        let mut params = ParamSet::new();
        params.add_point3f("eye", &[self.eye]);
        params.add_point3f("look", &[Point3f::ZERO]);
        params.add_point3f("up", &[Point3f::new(0.0, 1.0, 0.0)]);
        params.add_float("fov", &[fov]);
        params
    }
}

/// Returns the default film parameters. The time window covers the longest
/// three bounce path of the scene.
pub fn film_params() -> ParamSet {
    let mut params = ParamSet::new();
    params.add_int("xresolution", &[32]);
    params.add_int("yresolution", &[32]);
    params.add_int("tresolution", &[256]);
    params.add_float("t_min", &[0.0]);
    params.add_float("t_max", &[12.0]);
    params
}

/// Returns the default integrator parameters.
pub fn integrator_params() -> ParamSet {
    let mut params = ParamSet::new();
    params.add_int("maxdepth", &[4]);
    params
}

/// Returns the default sampler parameters.
pub fn sampler_params() -> ParamSet {
    let mut params = ParamSet::new();
    params.add_int("pixelsamples", &[16]);
    params
}

/// Adds a matte triangle mesh with a constant vertex normal.
///
/// * `primitives` - Receives the mesh triangles.
/// * `p`          - Vertex positions.
/// * `indices`    - Vertex indices.
/// * `n`          - Vertex normal.
/// * `material`   - Matte material parameters.
/// * `semantic`   - NLOS role of the mesh.
fn add_mesh(
    primitives: &mut Vec<ArcPrimitive>,
    p: &[Point3f],
    indices: &[Int],
    n: Point3f,
    material: &ParamSet,
    semantic: ObjectSemantic,
) -> Result<(), String> {
    let mut params = ParamSet::new();
    params.add_point3f("P", p);
    params.add_int("indices", indices);
    params.add_point3f("N", &vec![n; p.len()]);

    let shapes = TriangleMesh::from_props(&params);
    if shapes.is_empty() {
        return Err(format!("Built-in {semantic:?} mesh has no triangles"));
    }

    let material = create_material("matte", material);
    primitives.extend(shapes.into_iter().map(|shape| {
        Arc::new(GeometricPrimitive::new(shape, material.clone(), None, semantic)) as ArcPrimitive
    }));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use nlos_core::scene::Scene;

    #[test]
    fn wall_sees_front_face_only() {
        let nlos = NlosScene::new().unwrap();
        assert_eq!(nlos.primitives.len(), 4);

        let scene = Scene::new(nlos.primitives, nlos.lights);
        let catalog = scene.nlos.as_ref().unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.culled_count(), 1);
        assert!(approx_eq!(f32, catalog.total_area(), 0.5, epsilon = 1e-5));
    }

    #[test]
    fn camera_ray_hits_wall() {
        let nlos = NlosScene::new().unwrap();
        let eye = nlos.eye;
        let scene = Scene::new(nlos.primitives, nlos.lights);

        let ray = Ray::new(eye, Point3f::new(0.3, -0.2, 0.0) - eye, INFINITY, 0.0);
        let si = scene.intersect(&ray).unwrap();
        assert!(approx_eq!(f32, si.hit.p.z, 0.0, epsilon = 1e-5));
        assert_eq!(
            si.primitive.map(|p| p.semantic),
            Some(ObjectSemantic::NlosReflector)
        );
    }

    #[test]
    fn camera_frames_the_wall() {
        let nlos = NlosScene::new().unwrap();
        let fov = nlos.camera_params().find_one_float("fov", 0.0);
        assert!(approx_eq!(f32, (fov.to_radians() / 2.0).tan(), 0.5, epsilon = 1e-5));
        assert_eq!(nlos.pixel_interpretation.laser_position, [0.25, 0.0, 2.0]);
    }
}
