//! Lights

#[macro_use]
extern crate log;

mod diffuse;
mod point;

// Re-export
pub use diffuse::*;
pub use point::*;
