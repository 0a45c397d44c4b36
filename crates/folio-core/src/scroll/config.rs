//! L4 Atomic Layer: Derived values over the scroll section of the config

use std::time::Duration;

pub use crate::config::{EasingType, ScrollConfig};

/// Values the virtualizer and render loops derive from [`ScrollConfig`]
pub trait ScrollConfigExt {
    /// Wall-clock interval between rendered frames
    fn frame_interval(&self) -> Duration;

    /// Per-second decay rate equivalent to the per-frame lerp at 60fps
    fn damping_rate(&self) -> f64;

    /// Whether input of this kind eases toward its goal instead of jumping
    fn smooths(&self, touch: bool) -> bool;
}

impl ScrollConfigExt for ScrollConfig {
    fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.animation_fps.max(1)))
    }

    #[inline]
    fn damping_rate(&self) -> f64 {
        self.lerp * 60.0
    }

    #[inline]
    fn smooths(&self, touch: bool) -> bool {
        self.smooth_enabled && (!touch || self.smooth_touch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_interval() {
        let mut config = ScrollConfig::default();
        assert_eq!(config.frame_interval(), Duration::from_secs_f64(1.0 / 60.0));

        config.animation_fps = 0;
        assert_eq!(config.frame_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_damping_matches_default_lerp() {
        let config = ScrollConfig::default();
        assert!((config.damping_rate() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_touch_smoothing_is_opt_in() {
        let mut config = ScrollConfig::default();
        assert!(config.smooths(false));
        assert!(!config.smooths(true));

        config.smooth_touch = true;
        assert!(config.smooths(true));

        config.smooth_enabled = false;
        assert!(!config.smooths(false));
    }
}
