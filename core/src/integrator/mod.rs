//! Integrator

mod progress;
mod tile_scheduler;

use crate::camera::*;
use crate::geometry::*;
use crate::pbrt::*;
use crate::sampler::*;
use crate::scene::Scene;
use crate::spectrum::*;
use crate::transient_image::TransientImageError;
use bumpalo::Bump;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

// Re-export.
pub use progress::*;
pub use tile_scheduler::*;

/// Radiance arriving at the camera together with the distance the light
/// travelled, which the film uses as the time of flight.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TransientSample {
    /// Radiance weighted by the path throughput.
    pub l: Spectrum,

    /// Length of the light path.
    pub distance: Float,
}

impl TransientSample {
    /// Create a new `TransientSample`.
    ///
    /// * `l`        - Radiance weighted by the path throughput.
    /// * `distance` - Length of the light path.
    pub fn new(l: Spectrum, distance: Float) -> Self {
        Self { l, distance }
    }
}

/// Common data for integrators driven by camera samples.
pub struct IntegratorData {
    /// The camera.
    pub camera: ArcCamera,

    /// Prototype sampler cloned for every tile.
    pub sampler: ArcSampler,

    /// Pixels to render. Samples outside are skipped.
    pub pixel_bounds: Bounds2i,
}

impl IntegratorData {
    /// Create a new `IntegratorData`.
    ///
    /// * `camera`       - The camera.
    /// * `sampler`      - Prototype sampler.
    /// * `pixel_bounds` - Pixels to render.
    pub fn new(camera: ArcCamera, sampler: ArcSampler, pixel_bounds: Bounds2i) -> Self {
        Self {
            camera,
            sampler,
            pixel_bounds,
        }
    }
}

/// Integrator interface for transient rendering. A single camera ray yields
/// any number of time-tagged samples.
pub trait Integrator: Send + Sync {
    /// Returns the common data.
    fn get_data(&self) -> &IntegratorData;

    /// Prepare for rendering once the scene is complete.
    ///
    /// * `scene` - The scene.
    fn preprocess(&mut self, scene: &Scene);

    /// Traces a camera ray and pushes the radiance arriving along it, one
    /// entry per light path, into `samples`.
    ///
    /// * `ray`     - The camera ray.
    /// * `scene`   - The scene.
    /// * `sampler` - The sampler.
    /// * `arena`   - Scratch memory for BSDFs, reset after the sample.
    /// * `samples` - Output for the time-tagged radiance samples.
    fn li(
        &self,
        ray: &Ray,
        scene: &Scene,
        sampler: &mut dyn Sampler,
        arena: &Bump,
        samples: &mut Vec<TransientSample>,
    );
}

/// Errors that abort a render.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The finished image could not be written.
    #[error(transparent)]
    Write(#[from] TransientImageError),

    /// A worker thread panicked.
    #[error("render worker thread panicked")]
    WorkerPanicked,
}

/// Summary of a finished render.
#[derive(Clone, Debug)]
pub struct RenderResult {
    /// Name of the rendered scene.
    pub scene_name: String,

    /// Wall clock time spent rendering and writing.
    pub elapsed: Duration,

    /// Camera samples taken per pixel.
    pub samples_per_pixel: usize,

    /// Number of tiles rendered.
    pub tile_count: usize,

    /// Samples replaced with black because of NaN, negative or infinite
    /// luminance.
    pub rejected_samples: usize,

    /// Samples dropped because their time of flight is outside the time
    /// axis.
    pub discarded_samples: usize,

    /// The transient image written.
    pub output_file: String,
}

impl fmt::Display for RenderResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' -> {}: {} tiles, {} spp, {} rejected, {} outside time window, {:.2}s",
            self.scene_name,
            self.output_file,
            self.tile_count,
            self.samples_per_pixel,
            self.rejected_samples,
            self.discarded_samples,
            self.elapsed.as_secs_f64()
        )
    }
}

/// Returns the radiance if it is usable, or `None` after logging why it is
/// not.
///
/// * `l`      - The radiance.
/// * `pixel`  - Pixel the sample belongs to.
/// * `sample` - Sample number within the pixel.
pub fn validate_sample(l: Spectrum, pixel: &Point2i, sample: usize) -> Option<Spectrum> {
    if l.has_nans() {
        error!(
            "Not-a-number radiance value returned for pixel ({}, {}), sample {}. Setting to black.",
            pixel.x, pixel.y, sample
        );
        None
    } else if l.y() < -1e-5 {
        error!(
            "Negative luminance value, {}, returned for pixel ({}, {}), sample {}. Setting to black.",
            l.y(),
            pixel.x,
            pixel.y,
            sample
        );
        None
    } else if l.y().is_infinite() {
        error!(
            "Infinite luminance value returned for pixel ({}, {}), sample {}. Setting to black.",
            pixel.x, pixel.y, sample
        );
        None
    } else {
        Some(l)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anomalous_luminance_is_rejected() {
        let p = Point2i::new(1, 2);
        assert!(validate_sample(Spectrum::new(Float::NAN), &p, 0).is_none());
        assert!(validate_sample(Spectrum::new(-1.0), &p, 0).is_none());
        assert!(validate_sample(Spectrum::new(INFINITY), &p, 0).is_none());
        assert_eq!(
            validate_sample(Spectrum::new(-1e-7), &p, 0),
            Some(Spectrum::new(-1e-7))
        );
        assert_eq!(validate_sample(Spectrum::ONE, &p, 0), Some(Spectrum::ONE));
    }
}
