//! Material

use crate::interaction::*;
use crate::reflection::*;
use bumpalo::Bump;
use std::sync::Arc;

pub use crate::reflection::TransportMode;

/// Material trait provides common behavior.
pub trait Material {
    /// Returns the material's name for logging.
    fn get_name(&self) -> &'static str;

    /// Initializes representations of the light-scattering properties of the
    /// material at the intersection point on the surface. Returns `None` for
    /// surfaces that do not scatter light.
    ///
    /// * `arena` - The arena for memory allocations.
    /// * `si`    - The surface interaction at the intersection.
    /// * `mode`  - Transport mode.
    fn compute_scattering_functions<'arena>(
        &self,
        arena: &'arena Bump,
        si: &SurfaceInteraction,
        mode: TransportMode,
    ) -> Option<&'arena BSDF<'arena>>;
}

/// Atomic reference counted `Material`.
pub type ArcMaterial = Arc<dyn Material + Send + Sync>;
