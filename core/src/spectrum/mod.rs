//! Spectrum

mod rgb_spectrum;

// Re-export
pub use rgb_spectrum::*;

/// Rendering uses `RGBSpectrum`; the film reduces it to luminance.
pub type Spectrum = RGBSpectrum;
