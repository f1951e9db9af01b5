//! Shapes

#[macro_use]
extern crate log;

mod triangle;

// Re-export
pub use triangle::*;
