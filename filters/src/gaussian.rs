//! Gaussian Filter

use nlos_core::filter::*;
use nlos_core::geometry::*;
use nlos_core::paramset::*;
use nlos_core::pbrt::*;

/// Radially symmetric Gaussian bump, shifted down so it reaches zero at the
/// filter radius.
pub struct GaussianFilter {
    /// Filter data.
    pub data: FilterData,

    /// Falloff rate.
    pub alpha: Float,

    /// Gaussian value at the x radius.
    exp_x: Float,

    /// Gaussian value at the y radius.
    exp_y: Float,
}

impl GaussianFilter {
    /// Returns a new instance of `GaussianFilter`.
    ///
    /// * `radius` - Radius of the filter in x and y directions.
    /// * `alpha`  - Falloff rate.
    pub fn new(radius: Vector2f, alpha: Float) -> Self {
        Self {
            data: FilterData::new(radius),
            alpha,
            exp_x: (-alpha * radius.x * radius.x).exp(),
            exp_y: (-alpha * radius.y * radius.y).exp(),
        }
    }

    /// Evaluates the shifted 1D Gaussian.
    ///
    /// * `d`    - Distance from the center along one axis.
    /// * `expv` - Gaussian value at the radius along that axis.
    fn gaussian(&self, d: Float, expv: Float) -> Float {
        max(0.0, (-self.alpha * d * d).exp() - expv)
    }
}

impl Filter for GaussianFilter {
    fn get_data(&self) -> &FilterData {
        &self.data
    }

    fn evaluate(&self, p: &Point2f) -> Float {
        self.gaussian(p.x, self.exp_x) * self.gaussian(p.y, self.exp_y)
    }
}

impl From<&ParamSet> for GaussianFilter {
    /// Create a `GaussianFilter` from `ParamSet`.
    ///
    /// * `params` - Parameter set.
    fn from(params: &ParamSet) -> Self {
        let xw = params.find_one_float("xwidth", 2.0);
        let yw = params.find_one_float("ywidth", 2.0);
        let alpha = params.find_one_float("alpha", 2.0);
        Self::new(Vector2f::new(xw, yw), alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn gaussian_peaks_at_center_and_vanishes_at_radius() {
        let f = GaussianFilter::new(Vector2f::new(1.5, 1.5), 2.0);
        let e = (-2.0_f32 * 1.5 * 1.5).exp();
        let center = f.evaluate(&Point2f::new(0.0, 0.0));
        assert!(approx_eq!(f32, center, (1.0 - e) * (1.0 - e), epsilon = 1e-6));
        assert!(f.evaluate(&Point2f::new(0.5, 0.0)) < center);
        assert!(approx_eq!(f32, f.evaluate(&Point2f::new(1.5, 0.0)), 0.0, epsilon = 1e-6));
        assert_eq!(f.evaluate(&Point2f::new(2.0, 0.0)), 0.0);
    }
}
