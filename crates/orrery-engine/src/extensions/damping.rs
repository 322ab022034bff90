// extensions/damping.rs
//
// Frame-rate-independent exponential smoothing toward a goal.
// Pure math, no scene dependencies.

use glam::DVec3;

/// Fraction of the remaining distance covered in `dt` seconds with time constant `tau`.
///
/// `1 − e^(−dt/τ)`. Non-positive or non-finite `tau` snaps (returns 1);
/// non-positive or non-finite `dt` does not move (returns 0).
#[inline]
pub fn damping_factor(dt: f64, tau: f64) -> f64 {
    if !(dt.is_finite() && dt > 0.0) {
        return 0.0;
    }
    if !(tau.is_finite() && tau > 0.0) {
        return 1.0;
    }
    1.0 - (-dt / tau).exp()
}

/// `value + (goal − value) × (1 − e^(−dt/τ))`.
#[inline]
pub fn damp_vec3(value: DVec3, goal: DVec3, dt: f64, tau: f64) -> DVec3 {
    value + (goal - value) * damping_factor(dt, tau)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_time_constant_covers_63_percent() {
        let v = damp_vec3(DVec3::ZERO, DVec3::new(100.0, 0.0, 0.0), 0.3, 0.3);
        assert!((v.x - 63.212_055_882_855_77).abs() < 1e-9, "v = {v}");
    }

    #[test]
    fn never_overshoots() {
        let mut v = DVec3::ZERO;
        for _ in 0..1000 {
            v = damp_vec3(v, DVec3::ONE, 0.5, 0.01);
            assert!(v.max_element() <= 1.0);
        }
    }

    #[test]
    fn split_steps_match_one_big_step() {
        let one = damp_vec3(DVec3::ZERO, DVec3::splat(10.0), 0.2, 0.3);
        let mut two = damp_vec3(DVec3::ZERO, DVec3::splat(10.0), 0.1, 0.3);
        two = damp_vec3(two, DVec3::splat(10.0), 0.1, 0.3);
        assert!((one - two).length() < 1e-12);
    }

    #[test]
    fn degenerate_inputs() {
        assert_eq!(damping_factor(0.0, 0.3), 0.0);
        assert_eq!(damping_factor(-1.0, 0.3), 0.0);
        assert_eq!(damping_factor(f64::NAN, 0.3), 0.0);
        assert_eq!(damping_factor(0.016, 0.0), 1.0);
    }
}
