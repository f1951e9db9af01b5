//! Spatial Light Distribution.

use super::LightDistribution;
use crate::geometry::*;
use crate::interaction::Hit;
use crate::light::*;
use crate::pbrt::*;
use crate::rng::RNG;
use crate::sampling::*;
use crate::scene::*;
use arc_swap::ArcSwapOption;
use std::sync::Arc;

/// Number of points sampled per voxel when estimating light contributions.
const VOXEL_SAMPLES: usize = 128;

/// Imposes a voxel grid over the scene bounds. Each voxel gets a distribution
/// over the lights weighted by an estimate of their contribution inside the
/// voxel. Distributions are built on first lookup and published so concurrent
/// readers never block; two threads racing on the same voxel compute the same
/// deterministic result.
pub struct SpatialLightDistribution {
    lights: Vec<ArcLight>,
    world_bound: Bounds3f,
    n_voxels: [usize; 3],
    voxels: Vec<ArcSwapOption<Distribution1D>>,
}

impl SpatialLightDistribution {
    /// Create a new instance of `SpatialLightDistribution`.
    ///
    /// * `scene`      - The scene.
    /// * `max_voxels` - Number of voxels along the widest scene dimension.
    pub fn new(scene: &Scene, max_voxels: usize) -> Self {
        // Voxels are roughly cube shaped, with `max_voxels` along the widest axis.
        let b = scene.world_bound;
        let diag = b.diagonal();
        let bmax = max(diag.x, max(diag.y, diag.z));
        let mut n_voxels = [1_usize; 3];
        if bmax > 0.0 {
            for (i, n) in n_voxels.iter_mut().enumerate() {
                *n = max(1, (diag[i] / bmax * max_voxels as Float).round() as usize);
            }
        }

        info!(
            "SpatialLightDistribution: scene bounds {} - {}, voxel res ({}, {}, {})",
            b.p_min, b.p_max, n_voxels[0], n_voxels[1], n_voxels[2]
        );

        let count = n_voxels[0] * n_voxels[1] * n_voxels[2];
        Self {
            lights: scene.lights.iter().map(Arc::clone).collect(),
            world_bound: b,
            n_voxels,
            voxels: (0..count).map(|_| ArcSwapOption::const_empty()).collect(),
        }
    }

    /// Returns the integer coordinates of the voxel containing `p`. Points
    /// slightly outside the bounds are clamped to the boundary voxels.
    ///
    /// * `p` - The point.
    fn voxel_coords(&self, p: &Point3f) -> [usize; 3] {
        let offset = self.world_bound.offset(p);
        let mut pi = [0_usize; 3];
        for (i, c) in pi.iter_mut().enumerate() {
            let v = (offset[i] * self.n_voxels[i] as Float) as Int;
            *c = clamp(v, 0, self.n_voxels[i] as Int - 1) as usize;
        }
        pi
    }

    /// Estimate each light's contribution in the voxel `pi` from unoccluded
    /// `Li / pdf` at random points inside it.
    ///
    /// * `pi`    - Voxel coordinates.
    /// * `index` - Linear voxel index, used to seed the point sequence.
    fn compute_distribution(&self, pi: &[usize; 3], index: usize) -> Distribution1D {
        let corner = |d: usize| {
            Point3f::new(
                (pi[0] + d) as Float / self.n_voxels[0] as Float,
                (pi[1] + d) as Float / self.n_voxels[1] as Float,
                (pi[2] + d) as Float / self.n_voxels[2] as Float,
            )
        };
        let voxel_bounds = Bounds3f::new(
            self.world_bound.lerp(&corner(0)),
            self.world_bound.lerp(&corner(1)),
        );

        let mut rng = RNG::new(index as u64);
        let mut light_contrib = vec![0.0 as Float; self.lights.len()];
        for _ in 0..VOXEL_SAMPLES {
            let po = voxel_bounds.lerp(&Point3f::new(
                rng.uniform_float(),
                rng.uniform_float(),
                rng.uniform_float(),
            ));
            let hit = Hit::new_minimal(po, 0.0);
            let u = Point2f::new(rng.uniform_float(), rng.uniform_float());
            for (j, light) in self.lights.iter().enumerate() {
                let li = light.sample_li(&hit, &u);
                if li.pdf > 0.0 {
                    light_contrib[j] += li.value.y() / li.pdf;
                }
            }
        }

        // Every light keeps a small nonzero probability since sampling may
        // have missed the region where it matters.
        let sum_contrib: Float = light_contrib.iter().sum();
        let avg_contrib = sum_contrib / (VOXEL_SAMPLES * light_contrib.len()) as Float;
        let min_contrib = if avg_contrib > 0.0 { 0.001 * avg_contrib } else { 1.0 };
        for contrib in light_contrib.iter_mut() {
            *contrib = max(*contrib, min_contrib);
        }
        debug!(
            "Initialized light distribution in voxel ({}, {}, {}), avg contrib = {}",
            pi[0], pi[1], pi[2], avg_contrib
        );

        Distribution1D::new(light_contrib)
    }
}

impl LightDistribution for SpatialLightDistribution {
    fn lookup(&self, p: &Point3f) -> Option<Arc<Distribution1D>> {
        if self.lights.is_empty() {
            return None;
        }

        let pi = self.voxel_coords(p);
        let index = (pi[2] * self.n_voxels[1] + pi[1]) * self.n_voxels[0] + pi[0];
        let entry = &self.voxels[index];
        if let Some(dist) = entry.load_full() {
            return Some(dist);
        }

        let dist = Arc::new(self.compute_distribution(&pi, index));
        let prev = entry.rcu(|cur| cur.clone().or_else(|| Some(Arc::clone(&dist))));
        Some(prev.unwrap_or(dist))
    }
}
