//! Materials

#[macro_use]
extern crate log;

mod glass;
mod matte;
mod mirror;

// Re-export
pub use glass::*;
pub use matte::*;
pub use mirror::*;

use nlos_core::material::ArcMaterial;
use nlos_core::paramset::ParamSet;
use std::sync::Arc;

/// Returns the material with the given name. An empty name or `none` yields
/// no material; unknown names fall back to matte.
///
/// * `name`   - Material name: `matte`, `mirror` or `glass`.
/// * `params` - Material parameters.
pub fn create_material(name: &str, params: &ParamSet) -> Option<ArcMaterial> {
    match name {
        "" | "none" => None,
        "matte" => Some(Arc::new(MatteMaterial::from(params))),
        "mirror" => Some(Arc::new(MirrorMaterial::from(params))),
        "glass" => Some(Arc::new(GlassMaterial::from(params))),
        _ => {
            warn!("Material '{name}' unknown. Using 'matte'.");
            Some(Arc::new(MatteMaterial::from(params)))
        }
    }
}

#[cfg(test)]
pub(crate) mod test_util {
    use nlos_core::geometry::*;
    use nlos_core::interaction::SurfaceInteraction;

    /// Surface point at the origin facing +z, seen from `wo`.
    pub fn surface(wo: Vector3f) -> SurfaceInteraction<'static> {
        SurfaceInteraction::new(
            Point3f::ZERO,
            Point2f::new(0.5, 0.5),
            wo.normalize(),
            Normal3f::new(0.0, 0.0, 1.0),
            Vector3f::new(1.0, 0.0, 0.0),
            0.0,
        )
    }
}
