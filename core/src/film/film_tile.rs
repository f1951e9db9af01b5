//! Film Tile

use super::*;

/// Per-pixel storage of the time histogram.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TimeBinnedPixel {
    /// Filtered intensity per time bin.
    pub intensity: Vec<Float>,

    /// Sum of spatial filter weights of all camera rays touching this pixel;
    /// the same for every time bin.
    pub filter_weight_sum: Float,
}

impl TimeBinnedPixel {
    /// Returns a zeroed pixel.
    ///
    /// * `num_bins` - Number of time bins.
    pub fn new(num_bins: usize) -> Self {
        Self {
            intensity: vec![0.0; num_bins],
            filter_weight_sum: 0.0,
        }
    }

    /// Adds another pixel's accumulators to this one.
    ///
    /// * `other` - The other pixel.
    pub fn add(&mut self, other: &Self) {
        debug_assert_eq!(self.intensity.len(), other.intensity.len());
        for (a, b) in self.intensity.iter_mut().zip(other.intensity.iter()) {
            *a += *b;
        }
        self.filter_weight_sum += other.filter_weight_sum;
    }
}

/// Thread-local accumulator for the samples of an image tile across the full
/// time axis.
pub struct TransientFilmTile<'film> {
    /// Bounds of the pixels in the tile.
    pixel_bounds: Bounds2i,

    /// Time discretization.
    time_axis: TimeAxis,

    /// Precomputed filter weights, owned by the film.
    filter_table: &'film FilterTable,

    /// Pixels in the tile.
    pixels: Vec<TimeBinnedPixel>,

    /// Maximum sample luminance before the contribution is scaled down.
    max_sample_luminance: Float,

    /// Scratch storage for filter table offsets along x.
    ifx: Vec<usize>,

    /// Scratch storage for filter table offsets along y.
    ify: Vec<usize>,

    /// Scratch storage for (time bin, temporal weight) pairs.
    temporal: Vec<(usize, Float)>,
}

impl<'film> TransientFilmTile<'film> {
    /// Returns a new zero-initialized tile.
    ///
    /// * `pixel_bounds`         - Bounds of the pixels in the tile.
    /// * `time_axis`            - Time discretization.
    /// * `filter_table`         - Precomputed filter weights.
    /// * `max_sample_luminance` - Maximum sample luminance.
    pub fn new(
        pixel_bounds: &Bounds2i,
        time_axis: TimeAxis,
        filter_table: &'film FilterTable,
        max_sample_luminance: Float,
    ) -> Self {
        Self {
            pixel_bounds: *pixel_bounds,
            time_axis,
            filter_table,
            pixels: vec![TimeBinnedPixel::new(time_axis.num_bins); pixel_bounds.count()],
            max_sample_luminance,
            ifx: Vec::new(),
            ify: Vec::new(),
            temporal: Vec::new(),
        }
    }

    /// Adds the spatial filter weight of one camera ray to the pixels around
    /// `p_film`. Called once per camera ray, whether or not the ray produced
    /// any samples.
    ///
    /// * `p_film` - Continuous film position of the camera ray.
    pub fn add_filter_weight(&mut self, p_film: &Point2f) {
        let (p0, p1) = match self.spatial_support(p_film) {
            Some(bounds) => bounds,
            None => return,
        };

        let table = self.filter_table;
        for (y, iy) in (p0.y..p1.y).zip(self.ify.iter()) {
            for (x, ix) in (p0.x..p1.x).zip(self.ifx.iter()) {
                let offset = self.get_pixel_offset(&Point2i::new(x, y));
                self.pixels[offset].filter_weight_sum += table.spatial_weight(*ix, *iy);
            }
        }
    }

    /// Splats a time-tagged sample into the tile. Only the intensities change;
    /// weight sums are updated per camera ray by `add_filter_weight`.
    /// Returns `false` when the time of flight lies outside the time axis and
    /// the sample is dropped.
    ///
    /// * `p_film`         - Continuous film position of the sample.
    /// * `time_of_flight` - Path length travelled by the light.
    /// * `l`              - Radiance carried along the path.
    /// * `sample_weight`  - Weight of the camera ray.
    pub fn add_sample(
        &mut self,
        p_film: &Point2f,
        time_of_flight: Float,
        l: Spectrum,
        sample_weight: Float,
    ) -> bool {
        let t_pos = match self.time_axis.bin_position(time_of_flight) {
            Some(t) => t,
            None => return false,
        };

        let mut intensity = l.y();
        if intensity > self.max_sample_luminance {
            intensity = self.max_sample_luminance;
        }

        let (p0, p1) = match self.spatial_support(p_film) {
            Some(bounds) => bounds,
            None => return true,
        };

        let table = self.filter_table;

        // Temporal support around the discrete bin position.
        let t_discrete = t_pos - 0.5;
        let num_bins = self.time_axis.num_bins as Int;
        let t0 = max((t_discrete - table.temporal_radius).ceil() as Int, 0);
        let t1 = min(
            (t_discrete + table.temporal_radius).floor() as Int + 1,
            num_bins,
        );
        self.temporal.clear();
        self.temporal.extend((t0..t1).map(|t| {
            let it = FilterTable::offset(t as Float - t_discrete, table.inv_temporal_radius);
            (t as usize, table.temporal_weight(it))
        }));
        let mut temporal_sum: Float = self.temporal.iter().map(|(_, w)| w).sum();
        if temporal_sum <= 0.0 {
            // Filter vanishes on every touched bin; keep the energy in the
            // bin containing the sample.
            self.temporal.clear();
            self.temporal.push((t_pos as usize, 1.0));
            temporal_sum = 1.0;
        }

        let scale = intensity * sample_weight / (temporal_sum * self.time_axis.bin_width());

        // Loop over filter support and add sample to pixel arrays.
        for (y, iy) in (p0.y..p1.y).zip(self.ify.iter()) {
            for (x, ix) in (p0.x..p1.x).zip(self.ifx.iter()) {
                let w = scale * table.spatial_weight(*ix, *iy);

                let offset = self.get_pixel_offset(&Point2i::new(x, y));
                let pixel = &mut self.pixels[offset];
                for (t, tw) in self.temporal.iter() {
                    pixel.intensity[*t] += w * tw;
                }
            }
        }

        true
    }

    /// Computes the raster bounds of the filter footprint around `p_film`,
    /// clipped to the tile, and fills the x and y filter table offsets.
    /// Returns `None` when the footprint misses the tile.
    ///
    /// * `p_film` - Continuous film position.
    fn spatial_support(&mut self, p_film: &Point2f) -> Option<(Point2i, Point2i)> {
        let table = self.filter_table;

        // Compute sample's raster bounds.
        let p_film_discrete = *p_film - Vector2f::new(0.5, 0.5);
        let p0 = Point2i::from((p_film_discrete - table.radius).ceil());
        let p1 = Point2i::from((p_film_discrete + table.radius).floor()) + Point2i::new(1, 1);
        let p0 = p0.max(&self.pixel_bounds.p_min);
        let p1 = p1.min(&self.pixel_bounds.p_max);
        if p0.x >= p1.x || p0.y >= p1.y {
            return None;
        }

        // Precompute x and y filter table offsets.
        self.ifx.clear();
        self.ifx.extend(
            (p0.x..p1.x)
                .map(|x| FilterTable::offset(x as Float - p_film_discrete.x, table.inv_radius.x)),
        );
        self.ify.clear();
        self.ify.extend(
            (p0.y..p1.y)
                .map(|y| FilterTable::offset(y as Float - p_film_discrete.y, table.inv_radius.y)),
        );

        Some((p0, p1))
    }

    /// Returns the offset of a pixel in `pixels`.
    ///
    /// * `p` - The pixel coordinates.
    fn get_pixel_offset(&self, p: &Point2i) -> usize {
        debug_assert!(self.pixel_bounds.contains_exclusive(p));
        let width = self.pixel_bounds.p_max.x - self.pixel_bounds.p_min.x;
        ((p.y - self.pixel_bounds.p_min.y) * width + (p.x - self.pixel_bounds.p_min.x)) as usize
    }

    /// Returns a reference to a pixel inside the tile.
    ///
    /// * `p` - The pixel coordinates.
    pub fn get_pixel(&self, p: &Point2i) -> &TimeBinnedPixel {
        &self.pixels[self.get_pixel_offset(p)]
    }

    /// Returns the bounds of the pixels in the tile.
    pub fn get_pixel_bounds(&self) -> Bounds2i {
        self.pixel_bounds
    }

    /// Returns the time discretization.
    pub fn time_axis(&self) -> &TimeAxis {
        &self.time_axis
    }
}
