//! L4 Atomic Layer: Pure easing functions
//!
//! Maps progress in [0, 1] to eased progress. Every curve starts at 0 and ends
//! exactly at 1; `BackOut` and `ElasticOut` overshoot in between.

use std::f64::consts::PI;

pub use crate::config::EasingType;

/// Overshoot of the back-out curve
const BACK_OVERSHOOT: f64 = 1.7;

/// Period of the elastic-out curve (amplitude is fixed at 1)
const ELASTIC_PERIOD: f64 = 0.3;

impl EasingType {
    /// Apply the easing function to a progress value
    ///
    /// # Arguments
    /// * `t` - Progress value, clamped to [0, 1]
    #[inline]
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        if t >= 1.0 {
            return 1.0;
        }
        match self {
            EasingType::None => 0.0,
            EasingType::Linear => t,
            EasingType::Quad => power_ease_out(t, 2),
            EasingType::Cubic => power_ease_out(t, 3),
            EasingType::Quartic => power_ease_out(t, 4),
            EasingType::Quintic => power_ease_out(t, 5),
            EasingType::EaseOut => exponential_ease_out(t),
            EasingType::EaseIn => t * t * t,
            EasingType::EaseInOut => cubic_ease_in_out(t),
            EasingType::BackOut => back_ease_out(t),
            EasingType::ElasticOut => elastic_ease_out(t),
        }
    }

    /// Whether the curve leaves [0, 1] before completing
    pub fn overshoots(&self) -> bool {
        matches!(self, EasingType::BackOut | EasingType::ElasticOut)
    }
}

/// Power ease-out: f(t) = 1 - (1-t)^n
#[inline]
fn power_ease_out(t: f64, n: i32) -> f64 {
    1.0 - (1.0 - t).powi(n)
}

/// Exponential ease-out: f(t) = 1 - 2^(-10t)
#[inline]
fn exponential_ease_out(t: f64) -> f64 {
    1.0 - 2.0_f64.powf(-10.0 * t)
}

#[inline]
fn cubic_ease_in_out(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let inv = -2.0 * t + 2.0;
        1.0 - inv * inv * inv / 2.0
    }
}

/// Back ease-out: f(t) = 1 + (s+1)(t-1)³ + s(t-1)²
#[inline]
fn back_ease_out(t: f64) -> f64 {
    let s = BACK_OVERSHOOT;
    let u = t - 1.0;
    1.0 + (s + 1.0) * u * u * u + s * u * u
}

/// Elastic ease-out with amplitude 1
#[inline]
fn elastic_ease_out(t: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    let phase = ELASTIC_PERIOD / 4.0;
    2.0_f64.powf(-10.0 * t) * ((t - phase) * (2.0 * PI) / ELASTIC_PERIOD).sin() + 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [EasingType; 11] = [
        EasingType::None,
        EasingType::Linear,
        EasingType::Quad,
        EasingType::Cubic,
        EasingType::Quartic,
        EasingType::Quintic,
        EasingType::EaseOut,
        EasingType::EaseIn,
        EasingType::EaseInOut,
        EasingType::BackOut,
        EasingType::ElasticOut,
    ];

    #[test]
    fn test_easing_boundaries() {
        for easing in ALL {
            assert!((easing.apply(0.0) - 0.0).abs() < 0.001, "{:?} at t=0", easing);
            assert!((easing.apply(1.0) - 1.0).abs() < f64::EPSILON, "{:?} at t=1", easing);
        }
    }

    #[test]
    fn test_easing_monotonic() {
        for easing in ALL.iter().filter(|e| !e.overshoots()) {
            let mut prev = 0.0;
            for i in 0..=20 {
                let t = i as f64 / 20.0;
                let v = easing.apply(t);
                assert!(v >= prev, "{:?} not monotonic at t={}", easing, t);
                prev = v;
            }
        }
    }

    #[test]
    fn test_overshooting_curves_exceed_one() {
        let back_peak = (1..100)
            .map(|i| EasingType::BackOut.apply(i as f64 / 100.0))
            .fold(0.0, f64::max);
        assert!(back_peak > 1.0);

        let elastic_peak = (1..100)
            .map(|i| EasingType::ElasticOut.apply(i as f64 / 100.0))
            .fold(0.0, f64::max);
        assert!(elastic_peak > 1.0);
    }

    #[test]
    fn test_exponential_matches_formula() {
        let v = EasingType::EaseOut.apply(0.1);
        assert!((v - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_input_is_clamped() {
        assert_eq!(EasingType::Linear.apply(-1.0), 0.0);
        assert_eq!(EasingType::Linear.apply(3.0), 1.0);
    }
}
