//! Common

use num_traits::Num;
use std::ops::{Add, Mul, Neg};

/// Use 32-bit precision for floating point numbers.
pub type Float = f32;

/// Default signed integer to 32-bit.
pub type Int = i32;

/// Infinty (∞)
pub const INFINITY: Float = Float::INFINITY;

/// PI (π)
pub const PI: Float = std::f32::consts::PI;

/// 1/PI (1/π)
pub const INV_PI: Float = 1.0 / PI;

/// 2*PI (2π)
pub const TWO_PI: Float = 2.0 * PI;

/// 1/2*PI (1/2π)
pub const INV_TWO_PI: Float = 1.0 / (2.0 * PI);

/// PI/2 (π/2)
pub const PI_OVER_TWO: Float = PI * 0.5;

/// PI/4 (π/4)
pub const PI_OVER_FOUR: Float = PI * 0.25;

/// 1/4*PI (1/4π)
pub const INV_FOUR_PI: Float = 1.0 / (4.0 * PI);

/// 4*PI (4π)
pub const FOUR_PI: Float = 4.0 * PI;

/// Shadow Epsilon
pub const SHADOW_EPSILON: Float = 0.0001;

/// Distance used to push spawned ray origins off a surface.
pub const RAY_OFFSET_EPSILON: Float = 1e-4;

/// Returns the absolute value of a number.
///
/// * `n` - The number.
#[inline(always)]
pub fn abs<T>(n: T) -> T
where
    T: Num + Neg<Output = T> + PartialOrd + Copy,
{
    if n < T::zero() {
        -n
    } else {
        n
    }
}

/// Returns the minimum of 2 numbers.
///
/// * `a` - First number.
/// * `b` - Second number.
#[inline(always)]
pub fn min<T: PartialOrd>(a: T, b: T) -> T {
    if a < b {
        a
    } else {
        b
    }
}

/// Returns the maximum of 2 numbers.
///
/// * `a` - First number.
/// * `b` - Second number.
#[inline(always)]
pub fn max<T: PartialOrd>(a: T, b: T) -> T {
    if a > b {
        a
    } else {
        b
    }
}

/// Clamps a value to the closed interval `[low, high]`.
///
/// * `val`  - The value.
/// * `low`  - Lower bound.
/// * `high` - Upper bound.
#[inline(always)]
pub fn clamp<T: PartialOrd>(val: T, low: T, high: T) -> T {
    if val < low {
        low
    } else if val > high {
        high
    } else {
        val
    }
}

/// Linearly interpolate between two values.
///
/// * `t`  - Parameter in [0, 1].
/// * `p0` - Value at `t = 0`.
/// * `p1` - Value at `t = 1`.
#[inline(always)]
pub fn lerp<P>(t: Float, p0: P, p1: P) -> P
where
    Float: Mul<P, Output = P>,
    P: Add<P, Output = P>,
{
    (1.0 - t) * p0 + t * p1
}

/// Convert degrees to radians.
///
/// * `deg` - Angle in degrees.
#[inline(always)]
pub fn radians(deg: Float) -> Float {
    (PI / 180.0) * deg
}

/// Bisect a sorted sequence of `size` entries and return the last index `i`
/// for which `pred(i)` holds, clamped to `[0, size - 2]`.
///
/// * `size` - Number of entries.
/// * `pred` - Predicate that is `true` for a prefix of the entries.
pub fn find_interval<Predicate>(size: usize, pred: Predicate) -> usize
where
    Predicate: Fn(usize) -> bool,
{
    let (mut first, mut len) = (0, size);

    while len > 0 {
        let half = len >> 1;
        let middle = first + half;

        // Bisect range based on value of `pred` at `middle`.
        if pred(middle) {
            first = middle + 1;
            len -= half + 1;
        } else {
            len = half;
        }
    }

    clamp(first.saturating_sub(1), 0, size.saturating_sub(2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_interval_returns_bracketing_index() {
        let v = [0.0, 0.25, 0.5, 1.0];
        assert_eq!(find_interval(v.len(), |i| v[i] <= 0.3), 1);
        assert_eq!(find_interval(v.len(), |i| v[i] <= 0.0), 0);
        assert_eq!(find_interval(v.len(), |i| v[i] <= 1.0), 2);
    }

    #[test]
    fn find_interval_clamps_below_first_entry() {
        let v = [0.5, 0.75, 1.0];
        assert_eq!(find_interval(v.len(), |i| v[i] <= 0.1), 0);
    }

    #[test]
    fn clamp_limits_to_range() {
        assert_eq!(clamp(5, 0, 3), 3);
        assert_eq!(clamp(-1, 0, 3), 0);
        assert_eq!(clamp(2, 0, 3), 2);
    }
}
