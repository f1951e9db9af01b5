//! Filters

#[macro_use]
extern crate log;

mod boxf; // box is reserved keyword
mod gaussian;
mod triangle;

// Re-export.
pub use boxf::*;
pub use gaussian::*;
pub use triangle::*;

use nlos_core::filter::ArcFilter;
use nlos_core::paramset::ParamSet;
use std::sync::Arc;

/// Returns the reconstruction filter with the given name. Unknown names fall
/// back to the box filter.
///
/// * `name`   - Filter name: `box`, `triangle` or `gaussian`.
/// * `params` - Filter parameters.
pub fn create_filter(name: &str, params: &ParamSet) -> ArcFilter {
    match name {
        "box" => Arc::new(BoxFilter::from(params)),
        "triangle" => Arc::new(TriangleFilter::from(params)),
        "gaussian" => Arc::new(GaussianFilter::from(params)),
        _ => {
            warn!("Filter '{name}' unknown. Using 'box'.");
            Arc::new(BoxFilter::from(params))
        }
    }
}
