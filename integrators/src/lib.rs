//! Integrators

#[macro_use]
extern crate log;

mod direct_lighting;
mod transient_path;

// Re-export.
pub use direct_lighting::*;
pub use transient_path::*;
