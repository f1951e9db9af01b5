//! Filter Table

use super::*;

/// Filter table width.
pub const FILTER_TABLE_WIDTH: usize = 16;

/// Filter table size.
pub const FILTER_TABLE_SIZE: usize = FILTER_TABLE_WIDTH * FILTER_TABLE_WIDTH;

/// Precomputed filter weights.
///
/// The spatial axes use a 2D table over the positive quadrant of the filter.
/// The time axis reuses the filter's 1D profile along x, measured in time
/// bins instead of pixels.
#[derive(Clone)]
pub struct FilterTable {
    /// Spatial filter radius in pixels.
    pub radius: Vector2f,

    /// Reciprocal of `radius`.
    pub inv_radius: Vector2f,

    /// Temporal filter radius in time bins.
    pub temporal_radius: Float,

    /// Reciprocal of `temporal_radius`.
    pub inv_temporal_radius: Float,

    spatial: [Float; FILTER_TABLE_SIZE],
    temporal: [Float; FILTER_TABLE_WIDTH],
}

impl FilterTable {
    /// Evaluates the filter once per table cell.
    ///
    /// * `filter` - The reconstruction filter.
    pub fn new(filter: &dyn Filter) -> Self {
        let FilterData { radius, inv_radius } = *filter.get_data();
        let w = FILTER_TABLE_WIDTH as Float;

        let mut spatial = [0.0; FILTER_TABLE_SIZE];
        for y in 0..FILTER_TABLE_WIDTH {
            for x in 0..FILTER_TABLE_WIDTH {
                let p = Point2f::new(
                    (x as Float + 0.5) * radius.x / w,
                    (y as Float + 0.5) * radius.y / w,
                );
                spatial[y * FILTER_TABLE_WIDTH + x] = filter.evaluate(&p);
            }
        }

        let mut temporal = [0.0; FILTER_TABLE_WIDTH];
        for (t, v) in temporal.iter_mut().enumerate() {
            let p = Point2f::new((t as Float + 0.5) * radius.x / w, 0.0);
            *v = filter.evaluate(&p);
        }

        Self {
            radius,
            inv_radius,
            temporal_radius: radius.x,
            inv_temporal_radius: inv_radius.x,
            spatial,
            temporal,
        }
    }

    /// Maps a distance from the filter center to a table column.
    ///
    /// * `d`       - Distance from the filter center.
    /// * `inv_rad` - Reciprocal of the filter radius along that axis.
    #[inline]
    pub fn offset(d: Float, inv_rad: Float) -> usize {
        let fo = (d * inv_rad * FILTER_TABLE_WIDTH as Float).abs().floor();
        min(fo as usize, FILTER_TABLE_WIDTH - 1)
    }

    /// Returns the spatial weight for table offsets `(ix, iy)`.
    ///
    /// * `ix` - Column offset.
    /// * `iy` - Row offset.
    #[inline]
    pub fn spatial_weight(&self, ix: usize, iy: usize) -> Float {
        self.spatial[iy * FILTER_TABLE_WIDTH + ix]
    }

    /// Returns the temporal weight for table offset `it`.
    ///
    /// * `it` - Table offset.
    #[inline]
    pub fn temporal_weight(&self, it: usize) -> Float {
        self.temporal[it]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TentFilter {
        data: FilterData,
    }

    impl Filter for TentFilter {
        fn get_data(&self) -> &FilterData {
            &self.data
        }

        fn evaluate(&self, p: &Point2f) -> Float {
            max(0.0, self.data.radius.x - p.x.abs()) * max(0.0, self.data.radius.y - p.y.abs())
        }
    }

    #[test]
    fn weights_decrease_away_from_center() {
        let f = TentFilter {
            data: FilterData::new(Vector2f::new(2.0, 2.0)),
        };
        let table = FilterTable::new(&f);
        for i in 1..FILTER_TABLE_WIDTH {
            assert!(table.spatial_weight(i, 0) < table.spatial_weight(i - 1, 0));
            assert!(table.temporal_weight(i) < table.temporal_weight(i - 1));
        }
        assert_eq!(table.temporal_radius, 2.0);
    }

    #[test]
    fn offset_clamps_to_last_column() {
        assert_eq!(FilterTable::offset(0.0, 1.0), 0);
        assert_eq!(FilterTable::offset(-0.99, 1.0), FILTER_TABLE_WIDTH - 1);
        assert_eq!(FilterTable::offset(0.5, 1.0), FILTER_TABLE_WIDTH / 2);
        assert_eq!(FilterTable::offset(5.0, 1.0), FILTER_TABLE_WIDTH - 1);
    }
}
