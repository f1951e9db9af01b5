//! Camera

use crate::film::*;
use crate::geometry::*;
use crate::pbrt::*;
use std::fmt;
use std::sync::Arc;

/// Camera interface.
pub trait Camera {
    /// Returns the common camera data.
    fn get_data(&self) -> &CameraData;

    /// Returns a ray corresponding to a given sample together with a weight
    /// for how much the radiance arriving along it contributes to the image.
    ///
    /// * `sample` - The sample.
    fn generate_ray(&self, sample: &CameraSample) -> (Ray, Float);
}

/// Atomic reference counted `Camera`.
pub type ArcCamera = Arc<dyn Camera + Send + Sync>;

/// Stores the data shared by all cameras.
pub struct CameraData {
    /// Shutter open time.
    pub shutter_open: Float,

    /// Shutter close time.
    pub shutter_close: Float,

    /// The film that captures the rendered image.
    pub film: TransientFilm,
}

impl CameraData {
    /// Create a new `CameraData`.
    ///
    /// * `shutter_open`  - Shutter open time.
    /// * `shutter_close` - Shutter close time.
    /// * `film`          - The film.
    pub fn new(shutter_open: Float, shutter_close: Float, film: TransientFilm) -> Self {
        let (shutter_open, shutter_close) = if shutter_close < shutter_open {
            warn!(
                "Shutter close time {shutter_close} < shutter open {shutter_open}. \
                 Swapping them."
            );
            (shutter_close, shutter_open)
        } else {
            (shutter_open, shutter_close)
        };
        Self {
            shutter_open,
            shutter_close,
            film,
        }
    }
}

/// Holds all of the sample values needed to generate a camera ray.
#[derive(Copy, Clone, Debug, Default)]
pub struct CameraSample {
    /// Point on the film to which the generated ray carries radiance.
    pub p_film: Point2f,

    /// The point on the lens the ray passes through.
    pub p_lens: Point2f,

    /// The time at which the ray should sample the scene.
    pub time: Float,
}

impl CameraSample {
    /// Create a new `CameraSample`.
    ///
    /// * `p_film` - Point on the film.
    /// * `p_lens` - Point on the lens.
    /// * `time`   - Time at which the ray samples the scene.
    pub fn new(p_film: Point2f, p_lens: Point2f, time: Float) -> Self {
        Self { p_film, p_lens, time }
    }
}

impl fmt::Display for CameraSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[ pFilm: {}, pLens: {}, time {} ]",
            self.p_film, self.p_lens, self.time
        )
    }
}
