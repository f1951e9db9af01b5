//! Sampler

use crate::camera::*;
use crate::geometry::*;
use crate::pbrt::*;

/// Sampler interface.
pub trait Sampler {
    /// Returns the number of samples generated for each pixel.
    fn samples_per_pixel(&self) -> usize;

    /// Generates a new instance of an initial `Sampler` for use by a rendering
    /// thread. The same seed always produces the same sample stream.
    ///
    /// * `seed` - The seed for the random number generator.
    fn clone_sampler(&self, seed: u64) -> Box<dyn Sampler + Send>;

    /// This should be called when the rendering algorithm is ready to start
    /// working on a given pixel.
    ///
    /// * `p` - The pixel.
    fn start_pixel(&mut self, p: &Point2i);

    /// Advances to the next sample of the current pixel. Returns `false` once
    /// all samples of the pixel have been taken.
    fn start_next_sample(&mut self) -> bool;

    /// Returns the sample value for the next dimension of the current sample
    /// vector.
    fn get_1d(&mut self) -> Float;

    /// Returns the sample value for the next two dimensions of the current
    /// sample vector.
    fn get_2d(&mut self) -> Point2f;

    /// Returns the index of the current sample in the current pixel.
    fn current_sample_number(&self) -> usize;

    /// Returns an initialized `CameraSample` for a given pixel.
    ///
    /// * `p_raster` - The pixel.
    fn get_camera_sample(&mut self, p_raster: &Point2i) -> CameraSample {
        let film_sample = self.get_2d();
        let p_film = Point2f::new(
            p_raster.x as Float + film_sample.x,
            p_raster.y as Float + film_sample.y,
        );
        let time = self.get_1d();
        let p_lens = self.get_2d();
        CameraSample::new(p_film, p_lens, time)
    }
}

/// Heap allocated `Sampler` owned by one rendering task.
pub type BoxSampler = Box<dyn Sampler + Send>;

/// Sampler prototype shared by the scheduler.
pub type ArcSampler = std::sync::Arc<dyn Sampler + Send + Sync>;
