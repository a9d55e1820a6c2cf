//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Map a value from one range into another.
pub fn lin_map<T>(source_range: (T, T), target_range: (T, T), value: T) -> T
where
    T: Float,
{
    target_range.0
        + ((value - source_range.0) * (target_range.1 - target_range.0)
            / (source_range.1 - source_range.0))
}

/// Clamp a value into `[min, max]`.
pub fn clamp<T>(value: T, min: T, max: T) -> T
where
    T: Float,
{
    value.max(min).min(max)
}

/// Apply a symmetric deadband to a value in [-1, 1].
///
/// Values inside `(-deadband, deadband)` become zero, values outside are rescaled so that the
/// output still spans the full [-1, 1] range without a step at the deadband edge.
pub fn apply_deadband<T>(value: T, deadband: T) -> T
where
    T: Float,
{
    let zero = T::zero();
    let one = T::one();

    if value.abs() < deadband {
        return zero;
    }

    let magn = lin_map((deadband, one), (zero, one), clamp(value.abs(), zero, one));

    if value < zero {
        -magn
    } else {
        magn
    }
}

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
///
/// This function is taken from the std library as num is missing it.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float,
{
    let r = lhs % rhs;
    if r < T::zero() {
        r + rhs.abs()
    } else {
        r
    }
}

/// Wrap an angle into the range [-pi, pi).
pub fn wrap_pi<T>(angle: T) -> T
where
    T: Float,
{
    let pi_t = T::from(std::f64::consts::PI).unwrap_or_else(T::zero);
    let tau_t = pi_t + pi_t;

    rem_euclid(angle + pi_t, tau_t) - pi_t
}

#[cfg(test)]
mod test {
    use super::*;

    const PI: f64 = std::f64::consts::PI;

    #[test]
    fn test_wrap_pi() {
        assert!((wrap_pi(0.5f64) - 0.5).abs() < 1e-12);
        assert!((wrap_pi(PI + 0.5) - (-PI + 0.5)).abs() < 1e-12);
        assert!((wrap_pi(-PI - 0.5) - (PI - 0.5)).abs() < 1e-12);
        assert!((wrap_pi(4.0 * PI)).abs() < 1e-12);
    }

    #[test]
    fn test_deadband() {
        assert_eq!(apply_deadband(0.05f64, 0.1), 0.0);
        assert_eq!(apply_deadband(-0.05f64, 0.1), 0.0);
        assert_eq!(apply_deadband(1.0f64, 0.1), 1.0);
        assert_eq!(apply_deadband(-1.0f64, 0.1), -1.0);
        assert!((apply_deadband(0.55f64, 0.1) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_lin_map() {
        assert_eq!(lin_map((0.0, 1.0), (0.0, 10.0), 0.5f64), 5.0);
        assert_eq!(clamp(3.0f64, -1.0, 1.0), 1.0);
    }
}
