//! PBRT common stuff

mod common;
mod time;

// Re-export
pub use common::*;
pub use time::*;
