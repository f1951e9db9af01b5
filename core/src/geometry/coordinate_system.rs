//! Coordinate System

use super::*;

/// Construct a local coordinate system given a unit vector. Returns the two
/// remaining axes.
///
/// * `v1` - The first axis, normalized.
pub fn coordinate_system(v1: &Vector3f) -> (Vector3f, Vector3f) {
    let v2 = if v1.x.abs() > v1.y.abs() {
        Vector3f::new(-v1.z, 0.0, v1.x) / (v1.x * v1.x + v1.z * v1.z).sqrt()
    } else {
        Vector3f::new(0.0, v1.z, -v1.y) / (v1.y * v1.y + v1.z * v1.z).sqrt()
    };
    (v2, v1.cross(&v2))
}

/// Returns a spherical direction from the sine and cosine of theta and an
/// angle phi.
///
/// * `sin_theta` - Sine of theta.
/// * `cos_theta` - Cosine of theta.
/// * `phi`       - Azimuth angle.
pub fn spherical_direction(sin_theta: Float, cos_theta: Float, phi: Float) -> Vector3f {
    Vector3f::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn coordinate_system_is_orthonormal() {
        for v in [
            Vector3f::new(0.0, 0.0, 1.0),
            Vector3f::new(1.0, 0.0, 0.0),
            Vector3f::new(0.3, -0.5, 0.8).normalize(),
        ] {
            let (a, b) = coordinate_system(&v);
            assert!(approx_eq!(f32, a.length(), 1.0, epsilon = 1e-5));
            assert!(approx_eq!(f32, b.length(), 1.0, epsilon = 1e-5));
            assert!(a.dot(&v).abs() < 1e-5);
            assert!(b.dot(&v).abs() < 1e-5);
            assert!(a.dot(&b).abs() < 1e-5);
        }
    }
}
