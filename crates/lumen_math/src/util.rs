//! Tolerance helpers and math construction errors.

use glam::DVec3;
use thiserror::Error;

/// Magnitude below which a scalar is treated as zero.
pub const EPSILON: f64 = 1e-10;

/// Errors raised when building math values from invalid input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Zero-length vector has no direction")]
    ZeroVector,

    #[error("Bounding box min {min} exceeds max {max} on axis {axis}")]
    InvertedBox { min: DVec3, max: DVec3, axis: usize },
}

/// Returns true if `x` is within [`EPSILON`] of zero.
#[inline]
pub fn is_zero(x: f64) -> bool {
    x.abs() < EPSILON
}

/// Snap values within [`EPSILON`] of zero to exactly zero.
#[inline]
pub fn align_zero(x: f64) -> f64 {
    if is_zero(x) {
        0.0
    } else {
        x
    }
}

/// Normalize `v`, failing on the zero vector instead of producing NaNs.
pub fn unit(v: DVec3) -> Result<DVec3, MathError> {
    let length = v.length();
    if is_zero(length) {
        return Err(MathError::ZeroVector);
    }
    Ok(v / length)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_zero() {
        assert!(is_zero(0.0));
        assert!(is_zero(1e-12));
        assert!(is_zero(-1e-12));
        assert!(!is_zero(1e-6));
    }

    #[test]
    fn test_align_zero() {
        assert_eq!(align_zero(1e-13), 0.0);
        assert_eq!(align_zero(0.5), 0.5);
        assert_eq!(align_zero(-0.5), -0.5);
    }

    #[test]
    fn test_unit() {
        let v = unit(DVec3::new(0.0, 3.0, 4.0)).unwrap();
        assert!((v.length() - 1.0).abs() < 1e-12);
        assert_eq!(v, DVec3::new(0.0, 0.6, 0.8));
    }

    #[test]
    fn test_unit_zero_vector() {
        assert_eq!(unit(DVec3::ZERO), Err(MathError::ZeroVector));
    }
}
