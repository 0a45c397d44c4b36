//! Retargetable single-value tweens for pointer-driven motion.

use crate::scroll::timing::lerp;
use crate::scroll::EasingType;

/// A value that eases toward a target over a fixed duration. Retargeting
/// restarts the curve from wherever the value currently is, so a stream of
/// pointer positions produces one continuous motion.
#[derive(Debug, Clone, PartialEq)]
pub struct QuickTween {
    value: f64,
    start: f64,
    target: f64,
    elapsed_ms: f64,
    duration_ms: f64,
    easing: EasingType,
}

impl QuickTween {
    /// Create a settled tween resting at `initial`
    pub fn new(initial: f64, duration_ms: f64, easing: EasingType) -> Self {
        let duration_ms = duration_ms.max(0.0);
        Self {
            value: initial,
            start: initial,
            target: initial,
            elapsed_ms: duration_ms,
            duration_ms,
            easing,
        }
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    #[inline]
    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn retarget(&mut self, to: f64) {
        if !to.is_finite() {
            return;
        }
        if self.duration_ms <= 0.0 {
            self.set(to);
            return;
        }
        self.start = self.value;
        self.target = to;
        self.elapsed_ms = 0.0;
    }

    /// Jump to `value` and stop
    pub fn set(&mut self, value: f64) {
        self.value = value;
        self.start = value;
        self.target = value;
        self.elapsed_ms = self.duration_ms;
    }

    pub fn advance(&mut self, dt_ms: f64) -> f64 {
        if self.is_settled() {
            return self.value;
        }
        self.elapsed_ms += dt_ms.max(0.0);
        self.value = if self.is_settled() {
            self.target
        } else {
            let t = self.elapsed_ms / self.duration_ms;
            lerp(self.start, self.target, self.easing.apply(t))
        };
        self.value
    }

    #[inline]
    pub fn is_settled(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_settled() {
        let mut q = QuickTween::new(5.0, 500.0, EasingType::Quartic);
        assert!(q.is_settled());
        assert_eq!(q.advance(16.0), 5.0);
    }

    #[test]
    fn test_reaches_target_after_duration() {
        let mut q = QuickTween::new(0.0, 100.0, EasingType::Linear);
        q.retarget(10.0);
        assert!(!q.is_settled());
        assert!((q.advance(50.0) - 5.0).abs() < 1e-9);
        assert_eq!(q.advance(50.0), 10.0);
        assert!(q.is_settled());
    }

    #[test]
    fn test_retarget_starts_from_current_value() {
        let mut q = QuickTween::new(0.0, 100.0, EasingType::Linear);
        q.retarget(100.0);
        q.advance(50.0);
        q.retarget(0.0);
        assert_eq!(q.value(), 50.0);
        assert!((q.advance(50.0) - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_set_jumps() {
        let mut q = QuickTween::new(0.0, 100.0, EasingType::Cubic);
        q.retarget(10.0);
        q.set(3.0);
        assert!(q.is_settled());
        assert_eq!(q.value(), 3.0);
        assert_eq!(q.target(), 3.0);
    }

    #[test]
    fn test_zero_duration_snaps() {
        let mut q = QuickTween::new(0.0, 0.0, EasingType::Cubic);
        q.retarget(7.0);
        assert_eq!(q.advance(0.0), 7.0);
    }
}
