//! Time Axis

use crate::pbrt::*;
use std::fmt;

/// Discretization of the time-of-flight axis into equally sized bins.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TimeAxis {
    /// Number of time bins.
    pub num_bins: usize,

    /// Start of the time range.
    pub t_min: Float,

    /// End of the time range.
    pub t_max: Float,
}

impl TimeAxis {
    /// Returns a new time axis.
    ///
    /// * `num_bins` - Number of time bins; must be non-zero.
    /// * `t_min`    - Start of the time range.
    /// * `t_max`    - End of the time range; must exceed `t_min`.
    pub fn new(num_bins: usize, t_min: Float, t_max: Float) -> Result<Self, String> {
        if num_bins == 0 {
            return Err(String::from("time axis needs at least one bin"));
        }
        if !(t_max > t_min) || !t_min.is_finite() || !t_max.is_finite() {
            return Err(format!("invalid time range [{t_min}, {t_max})"));
        }
        Ok(Self {
            num_bins,
            t_min,
            t_max,
        })
    }

    /// Width of a single bin in time units.
    pub fn bin_width(&self) -> Float {
        (self.t_max - self.t_min) / self.num_bins as Float
    }

    /// Number of bins per time unit.
    pub fn bins_per_unit_time(&self) -> Float {
        self.num_bins as Float / (self.t_max - self.t_min)
    }

    /// Returns the continuous bin position of a time value, or `None` when it
    /// falls outside `[0, num_bins)`.
    ///
    /// * `t` - Time of flight.
    pub fn bin_position(&self, t: Float) -> Option<Float> {
        let pos = (t - self.t_min) * self.bins_per_unit_time();
        if pos >= 0.0 && pos < self.num_bins as Float {
            Some(pos)
        } else {
            None
        }
    }
}

impl fmt::Display for TimeAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bins in [{}, {})", self.num_bins, self.t_min, self.t_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn bin_position_discards_out_of_range_times() {
        let axis = TimeAxis::new(10, 2.0, 7.0).unwrap();
        assert!(approx_eq!(f32, axis.bin_width(), 0.5));
        assert_eq!(axis.bin_position(1.99), None);
        assert_eq!(axis.bin_position(7.0), None);
        assert_eq!(axis.bin_position(Float::NAN), None);
        assert!(approx_eq!(f32, axis.bin_position(2.0).unwrap(), 0.0));
        assert!(approx_eq!(f32, axis.bin_position(3.25).unwrap(), 2.5));
    }

    #[test]
    fn invalid_axes_are_rejected() {
        assert!(TimeAxis::new(0, 0.0, 1.0).is_err());
        assert!(TimeAxis::new(4, 1.0, 1.0).is_err());
        assert!(TimeAxis::new(4, 0.0, INFINITY).is_err());
    }
}
