//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::Vector3;
use num_traits::Float;
use thiserror::Error;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Norm below which a vector is considered degenerate (effectively zero).
pub const DEGENERATE_NORM_LIMIT: f64 = 1e-9;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors raised by the maths functions.
#[derive(Debug, Error)]
pub enum MathsError {
    #[error("Cannot normalise a vector with a norm below {}", DEGENERATE_NORM_LIMIT)]
    DegenerateVector
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Get the signed angle (in radians) that rotates `a` onto `b`.
///
/// The magnitude is `acos` of the dot product of the unit vectors, with the
/// sign taken from the z component of their cross product: a cross product
/// pointing up (+Z) gives a negative angle. The result lies in (-pi, pi],
/// with 0 meaning the vectors are aligned.
///
/// Returns [`MathsError::DegenerateVector`] if either input cannot be
/// normalised.
pub fn angle_between_signed(
    a: &Vector3<f64>,
    b: &Vector3<f64>
) -> Result<f64, MathsError> {

    // Guard against zero-length inputs, which would otherwise produce NaN.
    let norm_a = a.norm();
    let norm_b = b.norm();

    if norm_a < DEGENERATE_NORM_LIMIT || norm_b < DEGENERATE_NORM_LIMIT {
        return Err(MathsError::DegenerateVector)
    }

    let unit_a = a / norm_a;
    let unit_b = b / norm_b;

    // Clamp the dot product into acos's domain, floating point error can
    // push it just outside [-1, 1] for near-(anti)parallel vectors.
    let angle = unit_a.dot(&unit_b).clamp(-1f64, 1f64).acos();

    if unit_a.cross(&unit_b)[2] > 0f64 {
        Ok(-angle)
    }
    else {
        Ok(angle)
    }
}

/// Clamp a value between a minimum and maximum.
pub fn clamp<T>(value: &T, min: &T, max: &T) -> T
where
    T: Float + std::ops::Mul + std::ops::Add + std::ops::AddAssign
{
    let mut ret = *value;

    if ret > *max {
        ret = *max
    }
    if ret < *min {
        ret = *min
    }

    ret
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_angle_between_signed() {
        let x = Vector3::new(1f64, 0f64, 0f64);
        let y = Vector3::new(0f64, 1f64, 0f64);

        // Rotating x onto y is a CCW (left) rotation, so the cross points up
        // and the angle is negative.
        let angle = angle_between_signed(&x, &y).unwrap();
        assert!((angle + PI / 2f64).abs() < 1e-12);

        // And the reverse rotation has the opposite sign
        let angle_rev = angle_between_signed(&y, &x).unwrap();
        assert!((angle + angle_rev).abs() < 1e-12);

        // Aligned vectors give zero, even with different norms
        let long_x = Vector3::new(10f64, 0f64, 0f64);
        assert_eq!(angle_between_signed(&x, &long_x).unwrap(), 0f64);
    }

    #[test]
    fn test_angle_between_signed_antisymmetry() {
        let a = Vector3::new(0.3f64, -1.2f64, 0f64);
        let b = Vector3::new(-2.1f64, 0.4f64, 0f64);

        let fwd = angle_between_signed(&a, &b).unwrap();
        let rev = angle_between_signed(&b, &a).unwrap();

        assert!((fwd + rev).abs() < 1e-12);
    }

    #[test]
    fn test_angle_between_signed_degenerate() {
        let zero = Vector3::new(0f64, 0f64, 0f64);
        let x = Vector3::new(1f64, 0f64, 0f64);

        assert!(angle_between_signed(&zero, &x).is_err());
        assert!(angle_between_signed(&x, &zero).is_err());
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(&2f64, &-1f64, &1f64), 1f64);
        assert_eq!(clamp(&-2f64, &-1f64, &1f64), -1f64);
        assert_eq!(clamp(&0.5f64, &-1f64, &1f64), 0.5f64);
    }
}
