//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Map a value from one range into another.
pub fn lin_map<T>(source_range: (T, T), target_range: (T, T), value: T) -> T
where
    T: Float
{
    target_range.0
        + ((value - source_range.0)
        * (target_range.1 - target_range.0)
        / (source_range.1 - source_range.0))
}

pub fn clamp<T>(value: &T, min: &T, max: &T) -> T
where
    T: Float
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

/// Wrap an angle into the range (-pi, pi].
///
/// Uses `atan2(sin, cos)` so that the result is continuous across the wrap, then folds the single
/// point `-pi` onto `+pi`.
pub fn wrap_pi<T>(angle: T) -> T
where
    T: Float
{
    let pi_t = T::from(std::f64::consts::PI).unwrap_or_else(T::zero);
    let tau_t = T::from(std::f64::consts::TAU).unwrap_or_else(T::zero);

    let wrapped = angle.sin().atan2(angle.cos());

    if wrapped <= -pi_t {
        wrapped + tau_t
    }
    else {
        wrapped
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_wrap_pi() {
        assert!((wrap_pi(0.5f64) - 0.5).abs() < 1e-12);
        assert!((wrap_pi(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-12);
        assert!((wrap_pi(-3.0 * PI / 2.0) - PI / 2.0).abs() < 1e-12);
        assert!((wrap_pi(7.0 * PI + 0.25) - (-PI + 0.25)).abs() < 1e-9);

        // -pi is folded onto +pi so the range is half open
        assert!(wrap_pi(-PI) > 0.0);

        for i in -200..200 {
            let a = wrap_pi(i as f64 * 0.173);
            assert!(a > -PI && a <= PI, "{} out of range", a);
        }
    }

    #[test]
    fn test_lin_map() {
        assert_eq!(lin_map((0.0, 25.0), (0.0, 1.0), 12.5), 0.5);
        assert_eq!(lin_map((0.0, 10.0), (10.0, 20.0), 0.0), 10.0);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(&5.0, &1.0, &10.0), 5.0);
        assert_eq!(clamp(&0.5, &1.0, &10.0), 1.0);
        assert_eq!(clamp(&12.0, &1.0, &10.0), 10.0);
    }
}
