//! Triangle Filter

use nlos_core::filter::*;
use nlos_core::geometry::*;
use nlos_core::paramset::*;
use nlos_core::pbrt::*;

/// Tent filter. The weight falls off linearly with the distance from the
/// center along each axis and reaches zero at the radius.
pub struct TriangleFilter {
    /// Filter data.
    pub data: FilterData,
}

impl TriangleFilter {
    /// Returns a new instance of `TriangleFilter`.
    ///
    /// * `radius` - Radius of the filter in x and y directions.
    pub fn new(radius: Vector2f) -> Self {
        Self {
            data: FilterData::new(radius),
        }
    }
}

impl Filter for TriangleFilter {
    fn get_data(&self) -> &FilterData {
        &self.data
    }

    fn evaluate(&self, p: &Point2f) -> Float {
        let r = self.data.radius;
        let tent = |d: Float, r: Float| max(0.0, r - abs(d));
        tent(p.x, r.x) * tent(p.y, r.y)
    }
}

impl From<&ParamSet> for TriangleFilter {
    /// Create a `TriangleFilter` from `ParamSet`. The radius defaults to 2
    /// pixels.
    ///
    /// * `params` - Parameter set.
    fn from(params: &ParamSet) -> Self {
        Self::new(Vector2f::new(
            params.find_one_float("xwidth", 2.0),
            params.find_one_float("ywidth", 2.0),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn tent_falls_off_linearly() {
        let f = TriangleFilter::new(Vector2f::new(2.0, 1.0));
        assert!(approx_eq!(f32, f.evaluate(&Point2f::new(0.0, 0.0)), 2.0, ulps = 1));
        assert!(approx_eq!(f32, f.evaluate(&Point2f::new(1.0, 0.5)), 0.5, ulps = 1));
        assert_eq!(f.evaluate(&Point2f::new(2.5, 0.0)), 0.0);
        assert_eq!(f.evaluate(&Point2f::new(0.0, -1.0)), 0.0);
    }
}
