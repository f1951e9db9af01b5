//! Light Distribution.

mod power;
mod spatial;
mod uniform;

pub use power::*;
pub use spatial::*;
pub use uniform::*;

use crate::geometry::*;
use crate::sampling::*;
use crate::scene::*;
use std::sync::Arc;

/// Light sampling strategy.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum LightSampleStrategy {
    /// Sample all light sources uniformly.
    Uniform,

    /// Samples light sources according to their emitted power.
    Power,

    /// Estimate light contributions per voxel of the scene bounds and sample
    /// from the voxel's distribution.
    Spatial,
}

impl From<&str> for LightSampleStrategy {
    /// Returns a `LightSampleStrategy` given a string name.
    fn from(name: &str) -> Self {
        match name {
            "uniform" => Self::Uniform,
            "power" => Self::Power,
            "spatial" => Self::Spatial,
            _ => {
                error!("Light sample distribution type '{name}' unknown. Using 'spatial'.");
                Self::Spatial
            }
        }
    }
}

/// Provides probability distributions for choosing a light source to sample
/// at a given point in space.
pub trait LightDistribution {
    /// Returns the distribution over `scene.lights` to use at `p`, or `None`
    /// when the scene has no lights.
    ///
    /// * `p` - The point.
    fn lookup(&self, p: &Point3f) -> Option<Arc<Distribution1D>>;
}

/// Atomic reference counted `LightDistribution`.
pub type ArcLightDistribution = Arc<dyn LightDistribution + Send + Sync>;

/// Returns a new `LightDistribution` implementation. A scene with a single
/// light always uses the uniform distribution.
///
/// * `strategy` - The strategy to use for light sampling.
/// * `scene`    - The scene.
pub fn create_light_sample_distribution(
    strategy: LightSampleStrategy,
    scene: &Scene,
) -> ArcLightDistribution {
    let strategy = if scene.lights.len() == 1 {
        LightSampleStrategy::Uniform
    } else {
        strategy
    };
    debug!("Using {strategy:?} light sample distribution");
    match strategy {
        LightSampleStrategy::Uniform => Arc::new(UniformLightDistribution::new(scene)),
        LightSampleStrategy::Power => Arc::new(PowerLightDistribution::new(scene)),
        LightSampleStrategy::Spatial => Arc::new(SpatialLightDistribution::new(scene, 64)),
    }
}
