//! L4 Atomic Layer: Time calculation utilities for animations
//!
//! Pure functions over explicit millisecond timestamps, so callers can drive
//! them from any clock.

/// Calculate animation progress (0.0 to 1.0) from start time and duration
///
/// # Arguments
/// * `start_ms` - Animation start time
/// * `now_ms` - Current time
/// * `duration_ms` - Total animation duration
///
/// # Returns
/// Progress value clamped to [0.0, 1.0]
#[inline]
pub fn progress(start_ms: f64, now_ms: f64, duration_ms: f64) -> f64 {
    if duration_ms <= 0.0 {
        return 1.0;
    }
    ((now_ms - start_ms) / duration_ms).clamp(0.0, 1.0)
}

/// Check if animation is complete
#[inline]
pub fn is_complete(start_ms: f64, now_ms: f64, duration_ms: f64) -> bool {
    now_ms - start_ms >= duration_ms
}

/// Linear interpolation between two values
///
/// # Arguments
/// * `from` - Start value
/// * `to` - End value
/// * `t` - Interpolation factor, usually [0.0, 1.0]
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Frame-rate independent exponential smoothing toward `to`
///
/// `lambda` is the decay rate per second; `dt_secs` the frame delta.
#[inline]
pub fn damp(from: f64, to: f64, lambda: f64, dt_secs: f64) -> f64 {
    lerp(from, to, 1.0 - (-lambda * dt_secs).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp() {
        assert!((lerp(0.0, 100.0, 0.0) - 0.0).abs() < 0.001);
        assert!((lerp(0.0, 100.0, 0.5) - 50.0).abs() < 0.001);
        assert!((lerp(0.0, 100.0, 1.0) - 100.0).abs() < 0.001);
    }

    #[test]
    fn test_progress_zero_duration() {
        assert!((progress(0.0, 0.0, 0.0) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_progress_clamps() {
        assert_eq!(progress(100.0, 50.0, 200.0), 0.0);
        assert!((progress(100.0, 200.0, 200.0) - 0.5).abs() < 0.001);
        assert_eq!(progress(100.0, 900.0, 200.0), 1.0);
        assert!(is_complete(100.0, 300.0, 200.0));
        assert!(!is_complete(100.0, 299.0, 200.0));
    }

    #[test]
    fn test_damp_is_frame_rate_independent() {
        let lambda = 6.0;
        let one_step = damp(0.0, 100.0, lambda, 0.032);
        let two_steps = damp(damp(0.0, 100.0, lambda, 0.016), 100.0, lambda, 0.016);
        assert!((one_step - two_steps).abs() < 1e-9);
        assert!(one_step > 0.0 && one_step < 100.0);
    }
}
