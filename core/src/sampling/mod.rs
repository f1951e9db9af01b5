//! Sampling

use crate::geometry::*;
use crate::pbrt::*;

mod distribution_1d;

// Re-export
pub use distribution_1d::*;

/// Sample a point on a unit disk by mapping from a unit square to the unit
/// circle. The concentric mapping takes points in [-1, 1]^2 to unit disk by
/// uniformly mapping concentric squares to concentric circles.
///
/// * `u` - The random sample point.
pub fn concentric_sample_disk(u: &Point2f) -> Point2f {
    // Map uniform random numbers to [-1,1]^2.
    let ux = 2.0 * u.x - 1.0;
    let uy = 2.0 * u.y - 1.0;

    // Handle degeneracy at the origin.
    if ux == 0.0 && uy == 0.0 {
        return Point2f::new(0.0, 0.0);
    }

    // Apply concentric mapping to point.
    let (r, theta) = if abs(ux) > abs(uy) {
        (ux, PI_OVER_FOUR * (uy / ux))
    } else {
        (uy, PI_OVER_TWO - PI_OVER_FOUR * (ux / uy))
    };
    Point2f::new(r * theta.cos(), r * theta.sin())
}

/// Cosine-weighted hemisphere sampling using Malley's method.
///
/// * `u` - The random sample point.
#[inline]
pub fn cosine_sample_hemisphere(u: &Point2f) -> Vector3f {
    let d = concentric_sample_disk(u);
    let z = max(0.0, 1.0 - d.x * d.x - d.y * d.y).sqrt();
    Vector3f::new(d.x, d.y, z)
}

/// Returns the PDF for cosine-weighted hemisphere sampling.
///
/// * `cos_theta` - Cosine of the angle with the normal.
#[inline]
pub fn cosine_hemisphere_pdf(cos_theta: Float) -> Float {
    cos_theta * INV_PI
}

/// Uniformly sample a direction from a sphere.
///
/// * `u` - The random sample point.
pub fn uniform_sample_sphere(u: &Point2f) -> Vector3f {
    let z = 1.0 - 2.0 * u.x;
    let r = max(0.0, 1.0 - z * z).sqrt();
    let phi = TWO_PI * u.y;
    Vector3f::new(r * phi.cos(), r * phi.sin(), z)
}

/// Returns the PDF for uniformly sampling a direction from a sphere.
#[inline]
pub fn uniform_sphere_pdf() -> Float {
    INV_FOUR_PI
}

/// Uniformly sample barycentric coordinates of a triangle.
///
/// * `u` - The random sample point.
pub fn uniform_sample_triangle(u: &Point2f) -> Point2f {
    let su0 = u.x.sqrt();
    Point2f::new(1.0 - su0, u.y * su0)
}

/// Power heuristic for multiple importance sampling with exponent 2.
///
/// * `nf`    - Number of samples taken from the first distribution.
/// * `f_pdf` - PDF of the first distribution.
/// * `ng`    - Number of samples taken from the second distribution.
/// * `g_pdf` - PDF of the second distribution.
#[inline]
pub fn power_heuristic(nf: u32, f_pdf: Float, ng: u32, g_pdf: Float) -> Float {
    let f = nf as Float * f_pdf;
    let g = ng as Float * g_pdf;
    if f == INFINITY {
        return 1.0;
    }
    let (f2, g2) = (f * f, g * g);
    if f2 + g2 == 0.0 {
        0.0
    } else {
        f2 / (f2 + g2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn concentric_disk_stays_in_unit_disk(x in 0.0..1.0f32, y in 0.0..1.0f32) {
            let d = concentric_sample_disk(&Point2f::new(x, y));
            prop_assert!(d.x * d.x + d.y * d.y <= 1.0 + 1e-5);
        }

        #[test]
        fn cosine_hemisphere_is_upper_and_unit(x in 0.0..1.0f32, y in 0.0..1.0f32) {
            let w = cosine_sample_hemisphere(&Point2f::new(x, y));
            prop_assert!(w.z >= 0.0);
            prop_assert!((w.length() - 1.0).abs() < 1e-4);
        }

        #[test]
        fn triangle_barycentrics_are_valid(x in 0.0..1.0f32, y in 0.0..1.0f32) {
            let b = uniform_sample_triangle(&Point2f::new(x, y));
            prop_assert!(b.x >= 0.0 && b.y >= 0.0 && b.x + b.y <= 1.0 + 1e-6);
        }
    }

    #[test]
    fn power_heuristic_weights_sum_to_one() {
        let a = power_heuristic(1, 0.3, 1, 0.7);
        let b = power_heuristic(1, 0.7, 1, 0.3);
        assert!(approx_eq!(f32, a + b, 1.0, epsilon = 1e-6));
        assert_eq!(power_heuristic(1, 0.0, 1, 0.0), 0.0);
        assert_eq!(power_heuristic(1, INFINITY, 1, 1.0), 1.0);
    }
}
