//! Perspective Camera

use nlos_core::camera::*;
use nlos_core::film::*;
use nlos_core::geometry::*;
use nlos_core::paramset::*;
use nlos_core::pbrt::*;

/// Pinhole perspective camera placed with a look-at frame.
pub struct PerspectiveCamera {
    /// Common camera parameters.
    pub data: CameraData,

    /// Camera position.
    pub eye: Point3f,

    /// Unit viewing direction.
    pub forward: Vector3f,

    /// Unit vector pointing towards increasing raster x.
    pub right: Vector3f,

    /// Unit vector pointing towards decreasing raster y.
    pub up: Vector3f,

    /// Bounds of the image plane at unit distance, scaled by the field of view.
    pub screen_window: Bounds2f,
}

impl PerspectiveCamera {
    /// Create a new perspective camera.
    ///
    /// * `eye`           - Camera position.
    /// * `look`          - Point the camera looks at.
    /// * `up`            - Up direction; need not be orthogonal to the view.
    /// * `screen_window` - Bounds of screen space.
    /// * `fov`           - The field-of-view angle in degrees of the shorter
    ///                     image axis.
    /// * `shutter_open`  - Time when shutter is open.
    /// * `shutter_close` - Time when shutter is closed.
    /// * `film`          - The film to capture the rendered image.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        eye: Point3f,
        look: Point3f,
        up: Vector3f,
        screen_window: Bounds2f,
        fov: Float,
        shutter_open: Float,
        shutter_close: Float,
        film: TransientFilm,
    ) -> Self {
        let mut forward = look - eye;
        if forward.length_squared() == 0.0 {
            warn!("Camera eye and look point coincide. Looking down -z.");
            forward = Vector3f::new(0.0, 0.0, -1.0);
        }
        let forward = forward.normalize();

        let mut right = forward.cross(&up.normalize());
        if right.length_squared() < 1e-12 {
            warn!("Camera up vector {up} is parallel to the view direction.");
            right = coordinate_system(&forward).0;
        }
        let right = right.normalize();
        let up = right.cross(&forward);

        let tan_half_fov = (0.5 * radians(clamp(fov, 1e-3, 179.0))).tan();
        let screen_window = Bounds2f::new(
            Point2f::new(
                screen_window.p_min.x * tan_half_fov,
                screen_window.p_min.y * tan_half_fov,
            ),
            Point2f::new(
                screen_window.p_max.x * tan_half_fov,
                screen_window.p_max.y * tan_half_fov,
            ),
        );

        Self {
            data: CameraData::new(shutter_open, shutter_close, film),
            eye,
            forward,
            right,
            up,
            screen_window,
        }
    }

    /// Returns the screen space position of a raster position.
    ///
    /// * `p_film` - Raster position.
    fn raster_to_screen(&self, p_film: &Point2f) -> Point2f {
        let res = self.data.film.full_resolution;
        let fx = p_film.x / res.x as Float;
        let fy = p_film.y / res.y as Float;
        let sw = &self.screen_window;
        Point2f::new(
            lerp(fx, sw.p_min.x, sw.p_max.x),
            lerp(fy, sw.p_max.y, sw.p_min.y),
        )
    }
}

impl Camera for PerspectiveCamera {
    /// Returns the camera data.
    fn get_data(&self) -> &CameraData {
        &self.data
    }

    /// Returns a ray corresponding to a given sample. Every ray of a pinhole
    /// camera carries the full weight.
    ///
    /// * `sample` - The sample.
    fn generate_ray(&self, sample: &CameraSample) -> (Ray, Float) {
        let s = self.raster_to_screen(&sample.p_film);
        let d = (self.forward + self.right * s.x + self.up * s.y).normalize();
        let time = lerp(sample.time, self.data.shutter_open, self.data.shutter_close);
        (Ray::new(self.eye, d, INFINITY, time), 1.0)
    }
}

impl From<(&ParamSet, TransientFilm)> for PerspectiveCamera {
    /// Create a `PerspectiveCamera` from given parameter set and film.
    ///
    /// * `p` - A tuple containing the parameter set and film.
    fn from(p: (&ParamSet, TransientFilm)) -> Self {
        let (params, film) = p;

        let shutter_open = params.find_one_float("shutteropen", 0.0);
        let shutter_close = params.find_one_float("shutterclose", 1.0);

        let eye = params.find_one_point3f("eye", Point3f::new(0.0, 0.0, 0.0));
        let look = params.find_one_point3f("look", Point3f::new(0.0, 0.0, -1.0));
        let up = Vector3f::from(params.find_one_point3f("up", Point3f::new(0.0, 1.0, 0.0)));

        let frame = params.find_one_float(
            "frameaspectratio",
            film.full_resolution.x as Float / film.full_resolution.y as Float,
        );
        let mut screen = if frame > 1.0 {
            Bounds2f::new(Point2f::new(-frame, -1.0), Point2f::new(frame, 1.0))
        } else {
            Bounds2f::new(
                Point2f::new(-1.0, -1.0 / frame),
                Point2f::new(1.0, 1.0 / frame),
            )
        };

        let sw = params.find_float("screenwindow");
        match sw.len() {
            0 => {}
            4 => {
                screen.p_min.x = sw[0];
                screen.p_max.x = sw[1];
                screen.p_min.y = sw[2];
                screen.p_max.y = sw[3];
            }
            _ => error!("'screenwindow' should have four values"),
        }

        let fov = params.find_one_float("fov", 90.0);

        Self::new(eye, look, up, screen, fov, shutter_open, shutter_close, film)
    }
}
