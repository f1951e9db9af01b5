//! Box Filter

use nlos_core::filter::*;
use nlos_core::geometry::*;
use nlos_core::paramset::*;
use nlos_core::pbrt::*;

/// Weights every sample inside the filter extent equally.
pub struct BoxFilter {
    /// Filter data.
    pub data: FilterData,
}

impl BoxFilter {
    /// Returns a new instance of `BoxFilter`.
    ///
    /// * `radius` - Radius of the filter in x and y directions; beyond this
    ///              filter is 0.
    pub fn new(radius: Vector2f) -> Self {
        Self {
            data: FilterData::new(radius),
        }
    }
}

impl Filter for BoxFilter {
    fn get_data(&self) -> &FilterData {
        &self.data
    }

    fn evaluate(&self, _p: &Point2f) -> Float {
        1.0
    }
}

impl From<&ParamSet> for BoxFilter {
    /// Create a `BoxFilter` from `ParamSet`. The radius defaults to half a
    /// pixel.
    ///
    /// * `params` - Parameter set.
    fn from(params: &ParamSet) -> Self {
        let xw = params.find_one_float("xwidth", 0.5);
        let yw = params.find_one_float("ywidth", 0.5);
        Self::new(Vector2f::new(xw, yw))
    }
}
