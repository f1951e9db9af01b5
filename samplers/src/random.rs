//! Random Sampler.

use nlos_core::geometry::*;
use nlos_core::paramset::*;
use nlos_core::pbrt::*;
use nlos_core::rng::*;
use nlos_core::sampler::*;

/// Generates independent uniform samples from a PCG32 stream.
pub struct RandomSampler {
    /// Number of samples to generate for each pixel.
    samples_per_pixel: usize,

    /// Index of the current sample in the current pixel.
    current_pixel_sample_index: usize,

    /// The random number generator.
    rng: RNG,
}

impl RandomSampler {
    /// Create a new `RandomSampler`.
    ///
    /// * `samples_per_pixel` - Number of samples to generate for each pixel.
    /// * `seed`              - Sequence selected in the random number generator.
    pub fn new(samples_per_pixel: usize, seed: u64) -> Self {
        Self {
            samples_per_pixel: max(1, samples_per_pixel),
            current_pixel_sample_index: 0,
            rng: RNG::new(seed),
        }
    }
}

impl Sampler for RandomSampler {
    fn samples_per_pixel(&self) -> usize {
        self.samples_per_pixel
    }

    fn clone_sampler(&self, seed: u64) -> Box<dyn Sampler + Send> {
        Box::new(Self::new(self.samples_per_pixel, seed))
    }

    fn start_pixel(&mut self, _p: &Point2i) {
        self.current_pixel_sample_index = 0;
    }

    fn start_next_sample(&mut self) -> bool {
        self.current_pixel_sample_index += 1;
        self.current_pixel_sample_index < self.samples_per_pixel
    }

    fn get_1d(&mut self) -> Float {
        self.rng.uniform_float()
    }

    fn get_2d(&mut self) -> Point2f {
        let x = self.rng.uniform_float();
        let y = self.rng.uniform_float();
        Point2f::new(x, y)
    }

    fn current_sample_number(&self) -> usize {
        self.current_pixel_sample_index
    }
}

impl From<&ParamSet> for RandomSampler {
    /// Create a `RandomSampler` from a parameter set.
    ///
    /// * `params` - Sampler parameters.
    fn from(params: &ParamSet) -> Self {
        let spp = params.find_one_int("pixelsamples", 4);
        if spp < 1 {
            warn!("pixelsamples {spp} is invalid. Using 1.");
        }
        Self::new(max(1, spp) as usize, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn pixel_takes_requested_samples() {
        let mut sampler = RandomSampler::new(3, 0);
        sampler.start_pixel(&Point2i::new(0, 0));
        let mut n = 1;
        while sampler.start_next_sample() {
            n += 1;
        }
        assert_eq!(n, 3);
        assert_eq!(sampler.current_sample_number(), 3);

        sampler.start_pixel(&Point2i::new(1, 0));
        assert_eq!(sampler.current_sample_number(), 0);
    }

    #[test]
    fn paramset_reads_pixel_samples() {
        let mut params = ParamSet::new();
        params.add_int("pixelsamples", &[16]);
        assert_eq!(RandomSampler::from(&params).samples_per_pixel(), 16);
        params.add_int("pixelsamples", &[-2]);
        assert_eq!(RandomSampler::from(&params).samples_per_pixel(), 1);
    }

    proptest! {
        #[test]
        fn clones_with_same_seed_agree(seed in any::<u64>()) {
            let proto = RandomSampler::new(1, 99);
            let mut a = proto.clone_sampler(seed);
            let mut b = proto.clone_sampler(seed);
            for _ in 0..8 {
                let (pa, pb) = (a.get_2d(), b.get_2d());
                prop_assert_eq!(pa, pb);
                prop_assert!(pa.x >= 0.0 && pa.x < 1.0);
            }
        }
    }
}
