//! 1D Distribution.

use crate::pbrt::*;

/// Piecewise-constant 1D function with its CDF, used for sampling in
/// proportion to the function values.
#[derive(Clone, Debug)]
pub struct Distribution1D {
    /// Piecewise-constant function.
    pub func: Vec<Float>,

    /// CDF for `func`.
    pub cdf: Vec<Float>,

    /// Integral of `func`.
    pub func_int: Float,
}

impl Distribution1D {
    /// Returns a new `Distribution1D` for given piecewise-constant function.
    /// Negative values are treated as zero.
    ///
    /// * `f` - Piecewise-constant 1D function.
    pub fn new(f: Vec<Float>) -> Self {
        let func: Vec<Float> = f.into_iter().map(|v| max(v, 0.0)).collect();
        let n = func.len();

        // Compute integral of step function at `x_i`.
        let mut cdf: Vec<Float> = Vec::with_capacity(n + 1);
        cdf.push(0.0);
        for i in 1..=n {
            cdf.push(cdf[i - 1] + func[i - 1] / n as Float);
        }

        // Transform step function integral into CDF.
        let func_int = cdf[n];
        if func_int == 0.0 {
            for (i, v) in cdf.iter_mut().enumerate().skip(1) {
                *v = i as Float / n as Float;
            }
        } else {
            for v in cdf.iter_mut().skip(1) {
                *v /= func_int;
            }
        }

        Self { func, cdf, func_int }
    }

    /// Returns the number of sample points for the piecewise-constant function.
    pub fn count(&self) -> usize {
        self.func.len()
    }

    /// Return a sample in [0, 1), PDF and offset from the distribution given a
    /// random sample.
    ///
    /// * `u` - The random sample.
    pub fn sample_continuous(&self, u: Float) -> (Float, Float, usize) {
        let offset = find_interval(self.cdf.len(), |index| self.cdf[index] <= u);

        // Compute offset along CDF segment.
        let mut du = u - self.cdf[offset];
        let width = self.cdf[offset + 1] - self.cdf[offset];
        if width > 0.0 {
            du /= width;
        }

        let pdf = if self.func_int > 0.0 {
            self.func[offset] / self.func_int
        } else {
            0.0
        };

        ((offset as Float + du) / self.count() as Float, pdf, offset)
    }

    /// Return an index from the discrete distribution, its probability and the
    /// sample remapped to [0, 1).
    ///
    /// * `u` - The random sample.
    pub fn sample_discrete(&self, u: Float) -> (usize, Float, Float) {
        let offset = find_interval(self.cdf.len(), |index| self.cdf[index] <= u);
        let pdf = self.discrete_pdf(offset);
        let width = self.cdf[offset + 1] - self.cdf[offset];
        let u_remapped = if width > 0.0 {
            clamp((u - self.cdf[offset]) / width, 0.0, 1.0)
        } else {
            0.0
        };
        (offset, pdf, u_remapped)
    }

    /// Return an index and its probability.
    ///
    /// * `u` - The random sample.
    pub fn sample(&self, u: Float) -> (usize, Float) {
        let (index, pdf, _) = self.sample_discrete(u);
        (index, pdf)
    }

    /// Return the probability of sampling a given index.
    ///
    /// * `index` - Sample index.
    pub fn discrete_pdf(&self, index: usize) -> Float {
        if self.func_int > 0.0 {
            self.func[index] / (self.func_int * self.count() as Float)
        } else {
            1.0 / self.count() as Float
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    #[test]
    fn discrete_pdf_is_proportional_to_function() {
        let d = Distribution1D::new(vec![1.0, 3.0, 0.0, 4.0]);
        assert!(approx_eq!(f32, d.discrete_pdf(0), 0.125));
        assert!(approx_eq!(f32, d.discrete_pdf(1), 0.375));
        assert_eq!(d.discrete_pdf(2), 0.0);
        assert!(approx_eq!(f32, d.discrete_pdf(3), 0.5));

        assert_eq!(d.sample(0.0).0, 0);
        assert_eq!(d.sample(0.2).0, 1);
        assert_eq!(d.sample(0.49).0, 1);
        assert_eq!(d.sample(0.51).0, 3);
        assert_eq!(d.sample(0.999).0, 3);
    }

    #[test]
    fn zero_function_samples_uniformly() {
        let d = Distribution1D::new(vec![0.0, 0.0]);
        assert_eq!(d.sample(0.25), (0, 0.5));
        assert_eq!(d.sample(0.75), (1, 0.5));
    }

    #[test]
    fn sample_frequencies_match_pdf() {
        let d = Distribution1D::new(vec![2.0, 1.0, 1.0]);
        let mut counts = [0_usize; 3];
        let n = 30_000;
        for i in 0..n {
            let u = (i as Float + 0.5) / n as Float;
            counts[d.sample(u).0] += 1;
        }
        assert!((counts[0] as Float / n as Float - 0.5).abs() < 1e-3);
        assert!((counts[1] as Float / n as Float - 0.25).abs() < 1e-3);
    }

    proptest! {
        #[test]
        fn continuous_samples_are_in_unit_interval(u in 0.0..1.0f32) {
            let d = Distribution1D::new(vec![0.5, 2.0, 1.0]);
            let (x, pdf, offset) = d.sample_continuous(u);
            prop_assert!((0.0..=1.0).contains(&x));
            prop_assert!(pdf > 0.0);
            prop_assert!(offset < 3);
        }
    }
}
