//! Transient Film

use crate::filter::*;
use crate::geometry::*;
use crate::paramset::*;
use crate::pbrt::*;
use crate::spectrum::*;
use crate::transient_image::*;
use std::sync::{Mutex, MutexGuard, PoisonError};

mod film_tile;
mod time_axis;

// Re-export.
pub use film_tile::*;
pub use time_axis::*;

/// Models the time-resolved sensor. Stores a histogram of arrival times for
/// every pixel of the cropped image.
pub struct TransientFilm {
    /// The overall image resolution in pixels.
    pub full_resolution: Point2i,

    /// The time discretization.
    pub time_axis: TimeAxis,

    /// The diagonal of the film's physical area in meters.
    pub diagonal: Float,

    /// Filter function to use for image reconstruction from samples.
    pub filter: ArcFilter,

    /// The output file name.
    pub filename: String,

    /// Pixel bounds of the image after cropping.
    pub cropped_pixel_bounds: Bounds2i,

    /// Describes how pixels map onto the relay surface in the written file.
    pub pixel_interpretation: PixelInterpretationBlock,

    /// The image pixels.
    pixels: Mutex<Vec<TimeBinnedPixel>>,

    /// Precomputed filter weights.
    filter_table: FilterTable,

    /// Scale factor applied when writing the image.
    scale: Float,

    /// Maximum sample luminance.
    max_sample_luminance: Float,
}

impl TransientFilm {
    /// Create a new `TransientFilm`.
    ///
    /// * `resolution`           - The overall image resolution in pixels.
    /// * `time_axis`            - The time discretization.
    /// * `crop_window`          - Crop window in NDC space [0, 1]^2.
    /// * `filter`               - Filter function for reconstruction.
    /// * `diagonal`             - Diagonal of the physical film in millimeters.
    /// * `filename`             - The output file name.
    /// * `scale`                - Scale factor applied to pixel values.
    /// * `max_sample_luminance` - Sample luminance is clamped to this value.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        resolution: &Point2i,
        time_axis: TimeAxis,
        crop_window: &Bounds2f,
        filter: ArcFilter,
        diagonal: Float,
        filename: &str,
        scale: Float,
        max_sample_luminance: Float,
    ) -> Self {
        // Compute film image bounds.
        let cropped_pixel_bounds = Bounds2i::new(
            Point2i::new(
                (resolution.x as Float * crop_window.p_min.x).ceil() as Int,
                (resolution.y as Float * crop_window.p_min.y).ceil() as Int,
            ),
            Point2i::new(
                (resolution.x as Float * crop_window.p_max.x).ceil() as Int,
                (resolution.y as Float * crop_window.p_max.y).ceil() as Int,
            ),
        );

        info!(
            "Created film with full resolution {resolution} and {time_axis}. \
             Crop window of {crop_window} -> cropped pixel bounds {cropped_pixel_bounds}",
        );

        let pixels = vec![TimeBinnedPixel::new(time_axis.num_bins); cropped_pixel_bounds.count()];
        let filter_table = FilterTable::new(filter.as_ref());
        let extent = cropped_pixel_bounds.diagonal();

        Self {
            full_resolution: *resolution,
            time_axis,
            diagonal: diagonal * 0.001,
            filter,
            filename: filename.to_owned(),
            cropped_pixel_bounds,
            pixel_interpretation: PixelInterpretationBlock {
                u_resolution: max(extent.x, 0) as u32,
                v_resolution: max(extent.y, 0) as u32,
                ..Default::default()
            },
            pixels: Mutex::new(pixels),
            filter_table,
            scale,
            max_sample_luminance,
        }
    }

    /// Sets the relay surface layout written with the image. The resolution
    /// fields always reflect the cropped image.
    ///
    /// * `block` - Corner and laser positions.
    pub fn with_pixel_interpretation(mut self, block: PixelInterpretationBlock) -> Self {
        self.pixel_interpretation = PixelInterpretationBlock {
            u_resolution: self.pixel_interpretation.u_resolution,
            v_resolution: self.pixel_interpretation.v_resolution,
            ..block
        };
        self
    }

    /// Returns the area to be sampled for the image, including the extra
    /// pixels needed by the reconstruction filter at the crop boundary.
    pub fn get_sample_bounds(&self) -> Bounds2i {
        let radius = self.filter.get_data().radius;
        let half_pixel = Vector2f::new(0.5, 0.5);
        let float_bounds = Bounds2f::new(
            (Point2f::from(self.cropped_pixel_bounds.p_min) + half_pixel - radius).floor(),
            (Point2f::from(self.cropped_pixel_bounds.p_max) - half_pixel + radius).ceil(),
        );
        Bounds2i::from(float_bounds)
    }

    /// Returns the extent of the film in the scene, centered at the origin.
    pub fn get_physical_extent(&self) -> Bounds2f {
        let aspect = self.full_resolution.y as Float / self.full_resolution.x as Float;
        let x = (self.diagonal * self.diagonal / (1.0 + aspect * aspect)).sqrt();
        let y = aspect * x;
        Bounds2f::new(Point2f::new(-x / 2.0, -y / 2.0), Point2f::new(x / 2.0, y / 2.0))
    }

    /// Returns a tile for the pixels that samples in `sample_bounds`
    /// contribute to. The tile spans the whole time axis.
    ///
    /// * `sample_bounds` - Tile bounds in the overall image.
    pub fn get_film_tile(&self, sample_bounds: &Bounds2i) -> TransientFilmTile<'_> {
        let half_pixel = Vector2f::new(0.5, 0.5);
        let float_bounds = Bounds2f::from(*sample_bounds);
        let radius = self.filter_table.radius;
        let p0 = Point2i::from((float_bounds.p_min - half_pixel - radius).ceil());
        let p1 = Point2i::from((float_bounds.p_max - half_pixel + radius).floor()) + Point2i::new(1, 1);
        let tile_pixel_bounds = Bounds2i { p_min: p0, p_max: p1 }.intersect(&self.cropped_pixel_bounds);

        TransientFilmTile::new(
            &tile_pixel_bounds,
            self.time_axis,
            &self.filter_table,
            self.max_sample_luminance,
        )
    }

    /// Merge a tile into the film. Merging is pure addition so the order in
    /// which tiles arrive does not matter.
    ///
    /// * `tile` - The tile to merge.
    pub fn merge_film_tile(&self, tile: TransientFilmTile) {
        let tile_bounds = tile.get_pixel_bounds();
        debug!("Merging film tile {tile_bounds}");

        let mut pixels = self.lock_pixels();
        for p in tile_bounds {
            let offset = self.get_pixel_offset(&p);
            pixels[offset].add(tile.get_pixel(&p));
        }
    }

    /// Returns a copy of a pixel's accumulators.
    ///
    /// * `p` - Pixel coordinates inside the cropped bounds.
    pub fn get_pixel(&self, p: &Point2i) -> TimeBinnedPixel {
        let offset = self.get_pixel_offset(p);
        self.lock_pixels()[offset].clone()
    }

    /// Returns the normalized image in the TI04 format.
    ///
    /// * `properties` - Text stored after the pixel data.
    pub fn to_transient_image(&self, properties: &str) -> TransientImage {
        let extent = self.cropped_pixel_bounds.diagonal();
        let mut img = TransientImage::new(
            max(extent.x, 0) as u32,
            max(extent.y, 0) as u32,
            self.time_axis.num_bins as u32,
            self.time_axis.t_min,
            self.time_axis.bin_width(),
        );
        img.pixel_interpretation = self.pixel_interpretation;
        img.image_properties = properties.as_bytes().to_vec();

        let num_bins = self.time_axis.num_bins;
        let pixels = self.lock_pixels();
        for (pixel, out) in pixels.iter().zip(img.data.chunks_exact_mut(num_bins)) {
            if pixel.filter_weight_sum != 0.0 {
                let inv_wt = self.scale / pixel.filter_weight_sum;
                for (o, v) in out.iter_mut().zip(pixel.intensity.iter()) {
                    *o = *v * inv_wt;
                }
            }
        }
        img
    }

    /// Write the normalized image to `filename`.
    ///
    /// * `properties` - Text stored after the pixel data.
    pub fn write_image(&self, properties: &str) -> Result<(), TransientImageError> {
        info!("Converting histogram and computing final weighted pixel values");
        let img = self.to_transient_image(properties);

        info!(
            "Writing image {} with bounds {}",
            self.filename, self.cropped_pixel_bounds
        );
        img.write_file(&self.filename)
    }

    /// Returns the time-integrated energy per pixel, in scanline order over
    /// the cropped bounds.
    pub fn steady_state_image(&self) -> Vec<Float> {
        let bin_width = self.time_axis.bin_width();
        self.lock_pixels()
            .iter()
            .map(|p| {
                if p.filter_weight_sum == 0.0 {
                    0.0
                } else {
                    let sum: Float = p.intensity.iter().sum();
                    sum * bin_width * self.scale / p.filter_weight_sum
                }
            })
            .collect()
    }

    /// Writes the time-integrated image as an 8-bit grayscale PNG, normalized
    /// to the brightest pixel with a 2.2 gamma.
    ///
    /// * `path` - The output file path.
    pub fn write_preview(&self, path: &str) -> Result<(), String> {
        let values = self.steady_state_image();
        let extent = self.cropped_pixel_bounds.diagonal();
        let (w, h) = (max(extent.x, 0) as u32, max(extent.y, 0) as u32);

        let peak = values.iter().fold(0.0, |m: Float, &v| max(m, v));
        let inv_peak = if peak > 0.0 { 1.0 / peak } else { 0.0 };
        let buf: Vec<u8> = values
            .iter()
            .map(|v| {
                let g = clamp(v * inv_peak, 0.0, 1.0).powf(1.0 / 2.2);
                (g * 255.0 + 0.5) as u8
            })
            .collect();

        let img = image::GrayImage::from_raw(w, h, buf)
            .ok_or_else(|| format!("preview buffer does not match {w}x{h}"))?;
        img.save(path)
            .map_err(|e| format!("Error writing preview '{path}': {e}"))
    }

    /// Returns the offset of a pixel in `pixels`.
    ///
    /// * `p` - The pixel coordinates.
    fn get_pixel_offset(&self, p: &Point2i) -> usize {
        assert!(self.cropped_pixel_bounds.contains_exclusive(p));
        let width = self.cropped_pixel_bounds.p_max.x - self.cropped_pixel_bounds.p_min.x;
        ((p.y - self.cropped_pixel_bounds.p_min.y) * width + (p.x - self.cropped_pixel_bounds.p_min.x))
            as usize
    }

    /// Takes the pixel lock. A worker that panicked mid-merge leaves only
    /// fully added values behind, so a poisoned lock is still usable.
    fn lock_pixels(&self) -> MutexGuard<'_, Vec<TimeBinnedPixel>> {
        self.pixels.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Spatial resolution used when `xresolution` or `yresolution` is missing.
pub const DEFAULT_RESOLUTION: Int = 256;

/// Number of time bins used when `tresolution` is missing.
pub const DEFAULT_TIME_RESOLUTION: Int = 512;

impl From<(&ParamSet, ArcFilter)> for TransientFilm {
    /// Create a `TransientFilm` from given parameter set and filter.
    ///
    /// * `p` - Tuple containing the parameter set and filter.
    fn from(p: (&ParamSet, ArcFilter)) -> Self {
        let (params, filter) = p;

        let mut filename = params.find_one_string("filename", String::new());
        if filename.is_empty() {
            filename = String::from("pbrt.ti");
        }

        let xres = params.find_one_int("xresolution", DEFAULT_RESOLUTION);
        let yres = params.find_one_int("yresolution", DEFAULT_RESOLUTION);
        let tres = params.find_one_int("tresolution", DEFAULT_TIME_RESOLUTION);

        let t_min = params.find_one_float("t_min", 0.0);
        let t_max = params.find_one_float("t_max", 100.0);
        let time_axis = TimeAxis::new(max(tres, 1) as usize, t_min, t_max).unwrap_or_else(|e| {
            error!("{e}. Using 512 bins in [0, 100).");
            TimeAxis {
                num_bins: 512,
                t_min: 0.0,
                t_max: 100.0,
            }
        });

        let mut crop = Bounds2f::new(Point2f::new(0.0, 0.0), Point2f::new(1.0, 1.0));
        let cr = params.find_float("cropwindow");
        match cr.len() {
            0 => {}
            4 => {
                crop.p_min.x = clamp(min(cr[0], cr[1]), 0.0, 1.0);
                crop.p_max.x = clamp(max(cr[0], cr[1]), 0.0, 1.0);
                crop.p_min.y = clamp(min(cr[2], cr[3]), 0.0, 1.0);
                crop.p_max.y = clamp(max(cr[2], cr[3]), 0.0, 1.0);
            }
            n => error!("{n} values supplied for 'cropwindow'. Expected 4."),
        }

        let scale = params.find_one_float("scale", 1.0);
        let diagonal = params.find_one_float("diagonal", 35.0);
        let max_sample_luminance = params.find_one_float("maxsampleluminance", INFINITY);

        Self::new(
            &Point2i::new(max(xres, 1), max(yres, 1)),
            time_axis,
            &crop,
            filter,
            diagonal,
            &filename,
            scale,
            max_sample_luminance,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;
    use std::sync::Arc;

    struct TestBoxFilter {
        data: FilterData,
    }

    impl Filter for TestBoxFilter {
        fn get_data(&self) -> &FilterData {
            &self.data
        }

        fn evaluate(&self, _p: &Point2f) -> Float {
            1.0
        }
    }

    struct TestTriangleFilter {
        data: FilterData,
    }

    impl Filter for TestTriangleFilter {
        fn get_data(&self) -> &FilterData {
            &self.data
        }

        fn evaluate(&self, p: &Point2f) -> Float {
            max(0.0, self.data.radius.x - p.x.abs()) * max(0.0, self.data.radius.y - p.y.abs())
        }
    }

    fn triangle_film(num_bins: usize, t_min: Float, t_max: Float) -> TransientFilm {
        let filter: ArcFilter = Arc::new(TestTriangleFilter {
            data: FilterData::new(Vector2f::new(2.0, 2.0)),
        });
        TransientFilm::new(
            &Point2i::new(8, 8),
            TimeAxis::new(num_bins, t_min, t_max).unwrap(),
            &Bounds2f::new(Point2f::new(0.0, 0.0), Point2f::new(1.0, 1.0)),
            filter,
            35.0,
            "test.ti",
            1.0,
            INFINITY,
        )
    }

    fn full_tile(film: &TransientFilm) -> TransientFilmTile<'_> {
        film.get_film_tile(&film.get_sample_bounds())
    }

    proptest! {
        #[test]
        fn single_sample_conserves_energy(
            x in 0.5..7.5f32,
            y in 0.5..7.5f32,
            tof in 1.0..9.0f32,
            radiance in 0.01..10.0f32,
            weight in 0.1..2.0f32,
        ) {
            let film = triangle_film(40, 1.0, 9.0);
            let bin_width = film.time_axis.bin_width();
            let mut tile = full_tile(&film);
            tile.add_filter_weight(&Point2f::new(x, y));
            let deposited = tile.add_sample(
                &Point2f::new(x, y),
                tof,
                Spectrum::new(radiance),
                weight,
            );
            prop_assert!(deposited);

            // The spatial weight of a pixel is exactly what was added to its
            // weight sum by this one camera ray.
            for p in tile.get_pixel_bounds() {
                let pixel = tile.get_pixel(&p);
                let energy: Float = pixel.intensity.iter().map(|v| v * bin_width).sum();
                let expected = radiance * weight * pixel.filter_weight_sum;
                prop_assert!(
                    (energy - expected).abs() <= 1e-5 * expected.max(1e-6) + 1e-6,
                    "pixel {} energy {} expected {}", p, energy, expected
                );
            }
        }
    }

    #[test]
    fn box_filter_energy_at_time_axis_edges() {
        let filter: ArcFilter = Arc::new(TestBoxFilter {
            data: FilterData::new(Vector2f::new(0.5, 0.5)),
        });
        let film = TransientFilm::new(
            &Point2i::new(4, 4),
            TimeAxis::new(8, 0.0, 4.0).unwrap(),
            &Bounds2f::new(Point2f::new(0.0, 0.0), Point2f::new(1.0, 1.0)),
            filter,
            35.0,
            "test.ti",
            1.0,
            INFINITY,
        );
        let mut tile = full_tile(&film);
        for tof in [0.0, 0.01, 3.99] {
            tile.add_filter_weight(&Point2f::new(1.5, 1.5));
            assert!(tile.add_sample(&Point2f::new(1.5, 1.5), tof, Spectrum::new(2.0), 1.0));
        }
        let pixel = tile.get_pixel(&Point2i::new(1, 1));
        let energy: Float = pixel.intensity.iter().sum::<Float>() * film.time_axis.bin_width();
        assert!(approx_eq!(f32, energy, 6.0, epsilon = 1e-5));
        assert!(approx_eq!(f32, pixel.filter_weight_sum, 3.0));
        assert!(pixel.intensity[0] > 0.0);
        assert!(pixel.intensity[7] > 0.0);
    }

    #[test]
    fn out_of_range_time_is_discarded() {
        let film = triangle_film(10, 2.0, 4.0);
        let mut tile = full_tile(&film);
        assert!(!tile.add_sample(&Point2f::new(4.0, 4.0), 1.99, Spectrum::new(1.0), 1.0));
        assert!(!tile.add_sample(&Point2f::new(4.0, 4.0), 4.0, Spectrum::new(1.0), 1.0));
        for p in tile.get_pixel_bounds() {
            assert!(tile.get_pixel(&p).intensity.iter().all(|v| *v == 0.0));
        }
    }

    #[test]
    fn sample_luminance_is_clamped() {
        let filter: ArcFilter = Arc::new(TestBoxFilter {
            data: FilterData::new(Vector2f::new(0.5, 0.5)),
        });
        let film = TransientFilm::new(
            &Point2i::new(2, 2),
            TimeAxis::new(1, 0.0, 1.0).unwrap(),
            &Bounds2f::new(Point2f::new(0.0, 0.0), Point2f::new(1.0, 1.0)),
            filter,
            35.0,
            "test.ti",
            1.0,
            5.0,
        );
        let mut tile = full_tile(&film);
        tile.add_sample(&Point2f::new(0.5, 0.5), 0.5, Spectrum::new(100.0), 1.0);
        let pixel = tile.get_pixel(&Point2i::new(0, 0));
        assert!(approx_eq!(f32, pixel.intensity[0], 5.0));
    }

    fn splat(film: &TransientFilm, seed: u32) -> TransientFilmTile<'_> {
        let mut tile = full_tile(film);
        for i in 0..50_u32 {
            let k = (i * 7919 + seed * 104_729) % 1000;
            let x = 0.5 + (k % 70) as Float / 10.0;
            let y = 0.5 + (k / 14 % 70) as Float / 10.0;
            let tof = 1.0 + (k % 97) as Float * 0.08;
            tile.add_filter_weight(&Point2f::new(x, y));
            tile.add_sample(&Point2f::new(x, y), tof, Spectrum::new(0.3 + i as Float), 1.0);
        }
        tile
    }

    #[test]
    fn merge_order_does_not_change_result() {
        let film_ab = triangle_film(20, 1.0, 9.0);
        let film_ba = triangle_film(20, 1.0, 9.0);

        film_ab.merge_film_tile(splat(&film_ab, 1));
        film_ab.merge_film_tile(splat(&film_ab, 2));
        film_ba.merge_film_tile(splat(&film_ba, 2));
        film_ba.merge_film_tile(splat(&film_ba, 1));

        for p in film_ab.cropped_pixel_bounds {
            let a = film_ab.get_pixel(&p);
            let b = film_ba.get_pixel(&p);
            assert!(approx_eq!(f32, a.filter_weight_sum, b.filter_weight_sum, epsilon = 1e-6));
            for (x, y) in a.intensity.iter().zip(b.intensity.iter()) {
                assert!((x - y).abs() <= 1e-6 * x.abs().max(1.0));
            }
        }
    }

    #[test]
    fn write_normalizes_by_weight_sum_and_leaves_empty_pixels_zero() {
        let film = triangle_film(4, 0.0, 4.0);
        let mut tile = film.get_film_tile(&Bounds2i::new(Point2i::new(0, 0), Point2i::new(1, 1)));
        tile.add_filter_weight(&Point2f::new(0.5, 0.5));
        tile.add_sample(&Point2f::new(0.5, 0.5), 1.5, Spectrum::new(1.0), 1.0);
        film.merge_film_tile(tile);

        let img = film.to_transient_image("SceneName: test");
        assert_eq!(img.header.num_pixels, 64);
        assert_eq!(img.header.num_bins, 4);
        assert_eq!(img.properties(), "SceneName: test");

        let pixel = film.get_pixel(&Point2i::new(0, 0));
        let expected = pixel.intensity[1] * (1.0 / pixel.filter_weight_sum);
        assert!(approx_eq!(f32, img.pixel(1, 0, 0), expected, ulps = 1));
        // Pixel (7, 7) is outside the splat footprint.
        for t in 0..4 {
            assert_eq!(img.pixel(t, 7, 7), 0.0);
        }
    }

    fn box_film_1x1() -> TransientFilm {
        let filter: ArcFilter = Arc::new(TestBoxFilter {
            data: FilterData::new(Vector2f::new(0.5, 0.5)),
        });
        TransientFilm::new(
            &Point2i::new(1, 1),
            TimeAxis::new(4, 0.0, 4.0).unwrap(),
            &Bounds2f::new(Point2f::new(0.0, 0.0), Point2f::new(1.0, 1.0)),
            filter,
            35.0,
            "test.ti",
            1.0,
            INFINITY,
        )
    }

    #[test]
    fn rays_without_samples_still_count_towards_pixel_weight() {
        let film = box_film_1x1();
        let mut tile = full_tile(&film);
        let p = Point2f::new(0.5, 0.5);
        for i in 0..64 {
            tile.add_filter_weight(&p);
            if i % 2 == 0 {
                assert!(tile.add_sample(&p, 1.5, Spectrum::new(1.0), 1.0));
            }
        }
        film.merge_film_tile(tile);
        assert!(approx_eq!(f32, film.steady_state_image()[0], 0.5, epsilon = 1e-5));
    }

    #[test]
    fn several_samples_per_ray_add_up() {
        let film = box_film_1x1();
        let mut tile = full_tile(&film);
        let p = Point2f::new(0.5, 0.5);
        for _ in 0..64 {
            tile.add_filter_weight(&p);
            assert!(tile.add_sample(&p, 0.5, Spectrum::new(1.0), 1.0));
            assert!(tile.add_sample(&p, 2.5, Spectrum::new(1.0), 1.0));
        }
        film.merge_film_tile(tile);
        assert!(approx_eq!(f32, film.steady_state_image()[0], 2.0, epsilon = 1e-5));

        let img = film.to_transient_image("");
        assert!(approx_eq!(f32, img.pixel(0, 0, 0), 1.0, epsilon = 1e-5));
        assert_eq!(img.pixel(1, 0, 0), 0.0);
        assert!(approx_eq!(f32, img.pixel(2, 0, 0), 1.0, epsilon = 1e-5));
    }

    #[test]
    fn crop_window_limits_pixel_bounds() {
        let filter: ArcFilter = Arc::new(TestBoxFilter {
            data: FilterData::new(Vector2f::new(0.5, 0.5)),
        });
        let film = TransientFilm::new(
            &Point2i::new(10, 20),
            TimeAxis::new(2, 0.0, 1.0).unwrap(),
            &Bounds2f::new(Point2f::new(0.25, 0.5), Point2f::new(0.75, 1.0)),
            filter,
            35.0,
            "test.ti",
            1.0,
            INFINITY,
        );
        assert_eq!(
            film.cropped_pixel_bounds,
            Bounds2i::new(Point2i::new(3, 10), Point2i::new(8, 20))
        );
        assert_eq!(film.pixel_interpretation.u_resolution, 5);
        assert_eq!(film.pixel_interpretation.v_resolution, 10);
        assert_eq!(
            film.get_sample_bounds(),
            Bounds2i::new(Point2i::new(3, 10), Point2i::new(8, 20))
        );
        let tile = film.get_film_tile(&Bounds2i::new(Point2i::new(0, 0), Point2i::new(4, 12)));
        assert_eq!(
            tile.get_pixel_bounds(),
            Bounds2i::new(Point2i::new(3, 10), Point2i::new(5, 13))
        );
    }

    #[test]
    fn physical_extent_matches_diagonal() {
        let film = triangle_film(1, 0.0, 1.0);
        let extent = film.get_physical_extent();
        let d = extent.diagonal();
        let len = (d.x * d.x + d.y * d.y).sqrt();
        assert!(approx_eq!(f32, len, 0.035, epsilon = 1e-6));
    }

    #[test]
    fn film_from_paramset_reads_transient_parameters() {
        let mut params = ParamSet::default();
        params.add_int("xresolution", &[6]);
        params.add_int("yresolution", &[4]);
        params.add_int("tresolution", &[16]);
        params.add_float("t_min", &[1.0]);
        params.add_float("t_max", &[5.0]);
        params.add_float("cropwindow", &[0.5, 0.0, 0.0, 1.0]);
        let filter: ArcFilter = Arc::new(TestBoxFilter {
            data: FilterData::new(Vector2f::new(0.5, 0.5)),
        });

        let film = TransientFilm::from((&params, filter));
        assert_eq!(film.time_axis, TimeAxis::new(16, 1.0, 5.0).unwrap());
        assert_eq!(film.filename, "pbrt.ti");
        assert_eq!(
            film.cropped_pixel_bounds,
            Bounds2i::new(Point2i::new(0, 0), Point2i::new(3, 4))
        );
    }
}
