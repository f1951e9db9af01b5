//! Tile Scheduler

use super::*;
use crate::film::TransientFilmTile;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Instant, SystemTime};

/// Splits the image into square tiles and renders them on a fixed pool of
/// worker threads.
#[derive(Clone, Debug)]
pub struct TileScheduler {
    /// Edge length of the square tiles in pixels.
    pub tile_size: usize,

    /// Number of worker threads.
    pub n_threads: usize,

    /// Global seed mixed into every tile's sampler seed.
    pub seed: u64,

    /// Hide the progress bar.
    pub quiet: bool,

    /// Scene name recorded in the image properties.
    pub scene_name: String,

    /// Additional entries for the image properties.
    pub file_info: Vec<(String, String)>,
}

/// Counters shared by the workers.
#[derive(Default)]
struct SampleCounters {
    rejected: AtomicUsize,
    discarded: AtomicUsize,
}

impl TileScheduler {
    /// Create a new `TileScheduler`.
    ///
    /// * `tile_size`  - Edge length of the square tiles in pixels.
    /// * `n_threads`  - Number of worker threads.
    /// * `seed`       - Global seed.
    /// * `scene_name` - Scene name recorded in the image properties.
    pub fn new(tile_size: usize, n_threads: usize, seed: u64, scene_name: &str) -> Self {
        Self {
            tile_size: max(1, tile_size),
            n_threads: max(1, n_threads),
            seed,
            quiet: false,
            scene_name: String::from(scene_name),
            file_info: vec![],
        }
    }

    /// Returns the number of tiles in x and y covering `sample_bounds`.
    ///
    /// * `sample_bounds` - Sample bounds of the film.
    pub fn tile_grid(&self, sample_bounds: &Bounds2i) -> Point2<usize> {
        let extent = sample_bounds.diagonal();
        let ts = self.tile_size as Int;
        Point2::new(
            max(0, (extent.x + ts - 1) / ts) as usize,
            max(0, (extent.y + ts - 1) / ts) as usize,
        )
    }

    /// Returns the sample bounds of a tile. Tiles in the last row and column
    /// are clipped to `sample_bounds`.
    ///
    /// * `tile_idx`      - Tile index `tile.y * n_tiles.x + tile.x`.
    /// * `n_tiles`       - Number of tiles in x and y.
    /// * `sample_bounds` - Sample bounds of the film.
    pub fn tile_bounds(
        &self,
        tile_idx: usize,
        n_tiles: Point2<usize>,
        sample_bounds: &Bounds2i,
    ) -> Bounds2i {
        let tile_x = (tile_idx % n_tiles.x) as Int;
        let tile_y = (tile_idx / n_tiles.x) as Int;
        let ts = self.tile_size as Int;
        let x0 = sample_bounds.p_min.x + tile_x * ts;
        let x1 = min(x0 + ts, sample_bounds.p_max.x);
        let y0 = sample_bounds.p_min.y + tile_y * ts;
        let y1 = min(y0 + ts, sample_bounds.p_max.y);
        Bounds2i::new(Point2i::new(x0, y0), Point2i::new(x1, y1))
    }

    /// Returns the sampler seed for a tile. With a zero global seed this is
    /// the tile index.
    ///
    /// * `tile_idx` - Tile index.
    pub fn tile_seed(&self, tile_idx: usize) -> u64 {
        (tile_idx as u64) ^ self.seed.wrapping_mul(0x9e37_79b9_7f4a_7c15)
    }

    /// Renders every tile, merges the tiles into the camera's film and writes
    /// the transient image.
    ///
    /// * `integrator` - The integrator.
    /// * `scene`      - The scene.
    pub fn render(
        &self,
        integrator: &dyn Integrator,
        scene: &Scene,
    ) -> Result<RenderResult, RenderError> {
        let start = Instant::now();
        let data = integrator.get_data();
        let film = &data.camera.get_data().film;
        let samples_per_pixel = data.sampler.samples_per_pixel();

        // Compute number of tiles, `n_tiles`, to use for parallel rendering.
        let sample_bounds = film.get_sample_bounds();
        let n_tiles = self.tile_grid(&sample_bounds);
        let tile_count = n_tiles.x * n_tiles.y;
        info!(
            "Rendering {}x{} tiles on {} threads",
            n_tiles.x, n_tiles.y, self.n_threads
        );

        let progress = create_progress_reporter(tile_count as u64 + 1, self.quiet); // Render + image write
        progress.set_message("Rendering scene");

        let counters = SampleCounters::default();
        crossbeam::scope(|scope| {
            let (tx, rx) = crossbeam_channel::bounded(self.n_threads);

            // Spawn worker threads.
            for _ in 0..self.n_threads {
                let rxc = rx.clone();
                let progress = &progress;
                let counters = &counters;
                scope.spawn(move |_| {
                    for tile_idx in rxc.iter() {
                        let tile_bounds = self.tile_bounds(tile_idx, n_tiles, &sample_bounds);
                        let film_tile =
                            self.render_tile(integrator, scene, tile_idx, &tile_bounds, counters);

                        // Merge image tile into the film.
                        film.merge_film_tile(film_tile);
                        progress.inc(1);
                    }
                });
            }
            drop(rx); // Each worker holds its own clone.

            // Send work.
            for tile_idx in 0..tile_count {
                if tx.send(tile_idx).is_err() {
                    error!("All render workers stopped before tile {tile_idx} was queued");
                    break;
                }
            }
        })
        .map_err(|_| RenderError::WorkerPanicked)?;

        // Save final image after rendering.
        progress.set_message("Writing image");
        let properties = image_properties(
            &self.scene_name,
            samples_per_pixel,
            &film.time_axis,
            &self.file_info,
            SystemTime::now(),
        );
        film.write_image(&properties)?;
        progress.inc(1);
        progress.finish_with_message("Render complete");

        Ok(RenderResult {
            scene_name: self.scene_name.clone(),
            elapsed: start.elapsed(),
            samples_per_pixel,
            tile_count,
            rejected_samples: counters.rejected.load(Ordering::Relaxed),
            discarded_samples: counters.discarded.load(Ordering::Relaxed),
            output_file: film.filename.clone(),
        })
    }

    /// Render one tile into a new film tile.
    ///
    /// * `integrator`  - The integrator.
    /// * `scene`       - The scene.
    /// * `tile_idx`    - Tile index.
    /// * `tile_bounds` - Sample bounds of the tile.
    /// * `counters`    - Shared sample counters.
    fn render_tile<'film>(
        &self,
        integrator: &'film dyn Integrator,
        scene: &Scene,
        tile_idx: usize,
        tile_bounds: &Bounds2i,
        counters: &SampleCounters,
    ) -> TransientFilmTile<'film> {
        let data = integrator.get_data();
        let camera = &data.camera;
        let mut film_tile = camera.get_data().film.get_film_tile(tile_bounds);
        let mut sampler = data.sampler.clone_sampler(self.tile_seed(tile_idx));
        let mut arena = Bump::new();
        let mut samples: Vec<TransientSample> = Vec::new();

        debug!("Starting image tile {tile_idx} -> {tile_bounds}");

        let mut rejected = 0;
        let mut discarded = 0;
        for pixel in *tile_bounds {
            sampler.start_pixel(&pixel);

            // Checked after start_pixel() so the sample stream of a pixel
            // does not depend on the pixel bounds.
            if !data.pixel_bounds.contains_exclusive(&pixel) {
                continue;
            }

            loop {
                let camera_sample = sampler.get_camera_sample(&pixel);
                let (ray, ray_weight) = camera.generate_ray(&camera_sample);

                // Every camera ray counts towards the pixel weight, including
                // rays that return no samples.
                film_tile.add_filter_weight(&camera_sample.p_film);

                samples.clear();
                if ray_weight > 0.0 {
                    integrator.li(&ray, scene, sampler.as_mut(), &arena, &mut samples);
                }

                let sample_number = sampler.current_sample_number();
                for s in samples.iter() {
                    let l = validate_sample(s.l, &pixel, sample_number).unwrap_or_else(|| {
                        rejected += 1;
                        Spectrum::ZERO
                    });
                    if !film_tile.add_sample(&camera_sample.p_film, s.distance, l, ray_weight) {
                        discarded += 1;
                    }
                }

                arena.reset();
                if !sampler.start_next_sample() {
                    break;
                }
            }
        }

        counters.rejected.fetch_add(rejected, Ordering::Relaxed);
        counters.discarded.fetch_add(discarded, Ordering::Relaxed);
        debug!("Finished image tile {tile_idx} -> {tile_bounds}");

        film_tile
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn tiles_cover_sample_bounds_exactly_once() {
        let scheduler = TileScheduler::new(16, 2, 7, "test");
        let sample_bounds = Bounds2i::new(Point2i::new(-1, 2), Point2i::new(40, 35));
        let n_tiles = scheduler.tile_grid(&sample_bounds);
        assert_eq!((n_tiles.x, n_tiles.y), (3, 3));

        let mut seen = HashSet::new();
        for tile_idx in 0..n_tiles.x * n_tiles.y {
            let tile = scheduler.tile_bounds(tile_idx, n_tiles, &sample_bounds);
            assert!(tile.p_max.x - tile.p_min.x <= 16);
            for p in tile {
                assert!(sample_bounds.contains_exclusive(&p));
                assert!(seen.insert((p.x, p.y)), "pixel ({}, {}) covered twice", p.x, p.y);
            }
        }
        assert_eq!(seen.len(), sample_bounds.count());
    }

    #[test]
    fn tile_seed_depends_on_global_seed() {
        let a = TileScheduler::new(16, 1, 0, "a");
        assert_eq!(a.tile_seed(5), 5);
        let b = TileScheduler::new(16, 1, 1, "b");
        assert_ne!(b.tile_seed(5), a.tile_seed(5));
        assert_ne!(b.tile_seed(5), b.tile_seed(6));
    }
}
