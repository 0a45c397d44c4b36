//! Infinite horizontal marquee.
//!
//! The strip holds two copies of its content and translates left forever.
//! The offset is wrapped into `[-cycle_width, 0)` every frame, so the jump
//! back by one cycle lands on identical content.

use tracing::debug;

use crate::config::MarqueeConfig;
use crate::stage::{ElementHandle, ElementStore, Property};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MarqueePhase {
    #[default]
    Idle,
    Running,
    Paused,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MarqueeState {
    pub track_offset: f64,
    pub cycle_width: f64,
    /// Units per second
    pub speed: f64,
    pub phase: MarqueePhase,
}

impl MarqueeConfig {
    /// Width of one full unduplicated content cycle
    pub fn cycle_width(item_width: f64, gap: f64, count: usize) -> f64 {
        (item_width + gap) * count as f64
    }

    /// Speed that moves one cycle every `loop_secs`
    pub fn speed_for_loop(cycle_width: f64, loop_secs: f64) -> f64 {
        if loop_secs > 0.0 {
            cycle_width / loop_secs
        } else {
            0.0
        }
    }

    /// Cycle width for `count` items, using the fallback width if unmeasured
    pub fn measure(&self, item_width: Option<f64>, count: usize) -> f64 {
        let item_width = item_width
            .filter(|w| *w > 0.0)
            .unwrap_or(self.fallback_item_width);
        Self::cycle_width(item_width, self.gap, count)
    }

    pub fn speed(&self, cycle_width: f64) -> f64 {
        Self::speed_for_loop(cycle_width, self.loop_duration_secs)
    }
}

/// Wrap `offset` into `[-width, 0)`
#[inline]
pub fn wrap_offset(offset: f64, width: f64) -> f64 {
    if width <= 0.0 || !width.is_finite() {
        return 0.0;
    }
    let wrapped = offset.rem_euclid(width) - width;
    if wrapped >= 0.0 {
        wrapped - width
    } else {
        wrapped
    }
}

#[derive(Debug, Clone)]
pub struct Marquee {
    strip: ElementHandle,
    state: MarqueeState,
    pause_on_hover: bool,
    hover_paused: bool,
}

impl Marquee {
    pub fn new(strip: ElementHandle, pause_on_hover: bool) -> Self {
        Self {
            strip,
            state: MarqueeState::default(),
            pause_on_hover,
            hover_paused: false,
        }
    }

    pub fn strip(&self) -> ElementHandle {
        self.strip
    }

    pub fn state(&self) -> &MarqueeState {
        &self.state
    }

    #[inline]
    pub fn offset(&self) -> f64 {
        self.state.track_offset
    }

    #[inline]
    pub fn phase(&self) -> MarqueePhase {
        self.state.phase
    }

    /// Begin looping from offset 0
    pub fn start(&mut self, cycle_width: f64, speed: f64) -> Result<()> {
        if self.state.phase != MarqueePhase::Idle {
            return Err(Error::InvalidMarquee("already started".to_string()));
        }
        if !(cycle_width.is_finite() && cycle_width > 0.0) {
            return Err(Error::InvalidMarquee(format!(
                "cycle width must be positive, got {}",
                cycle_width
            )));
        }
        if !(speed.is_finite() && speed >= 0.0) {
            return Err(Error::InvalidMarquee(format!(
                "speed must be a non-negative number, got {}",
                speed
            )));
        }

        self.state = MarqueeState {
            track_offset: 0.0,
            cycle_width,
            speed,
            phase: MarqueePhase::Running,
        };
        debug!(cycle_width, speed, "Marquee started");
        Ok(())
    }

    /// Freeze at the current offset
    pub fn pause(&mut self) {
        if self.state.phase == MarqueePhase::Running {
            self.state.phase = MarqueePhase::Paused;
        }
        self.hover_paused = false;
    }

    /// Continue from exactly where `pause()` left off
    pub fn resume(&mut self) {
        if self.state.phase == MarqueePhase::Paused {
            self.state.phase = MarqueePhase::Running;
        }
        self.hover_paused = false;
    }

    pub fn pointer_enter(&mut self) {
        if self.pause_on_hover && self.state.phase == MarqueePhase::Running {
            self.state.phase = MarqueePhase::Paused;
            self.hover_paused = true;
        }
    }

    /// Resume only if hovering was what paused the strip
    pub fn pointer_leave(&mut self) {
        if self.hover_paused {
            self.resume();
        }
    }

    /// Move the strip by `dt_ms` and return the wrapped offset
    pub fn advance(&mut self, dt_ms: f64) -> f64 {
        if self.state.phase != MarqueePhase::Running {
            return self.state.track_offset;
        }
        let offset = self.state.track_offset - self.state.speed * dt_ms.max(0.0) / 1000.0;
        self.state.track_offset = wrap_offset(offset, self.state.cycle_width);
        self.state.track_offset
    }

    /// Write the offset to the strip element
    pub fn apply(&self, store: &mut ElementStore) -> bool {
        store.set(self.strip, Property::TranslateX, self.state.track_offset)
    }

    /// Content was re-measured: keep the same relative position in the cycle
    pub fn set_cycle_width(&mut self, cycle_width: f64) -> Result<()> {
        if !(cycle_width.is_finite() && cycle_width > 0.0) {
            return Err(Error::InvalidMarquee(format!(
                "cycle width must be positive, got {}",
                cycle_width
            )));
        }
        let old = self.state.cycle_width;
        if old > 0.0 {
            let scaled = self.state.track_offset * cycle_width / old;
            self.state.track_offset = wrap_offset(scaled, cycle_width);
        }
        self.state.cycle_width = cycle_width;
        Ok(())
    }

    pub fn set_speed(&mut self, speed: f64) {
        if speed.is_finite() && speed >= 0.0 {
            self.state.speed = speed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(width: f64, speed: f64) -> Marquee {
        let mut store = ElementStore::new();
        let mut m = Marquee::new(store.mount("strip"), true);
        m.start(width, speed).unwrap();
        m
    }

    #[test]
    fn test_wrap_offset() {
        assert!((wrap_offset(-1100.0, 1000.0) + 100.0).abs() < 1e-9);
        assert!((wrap_offset(-100.0, 1000.0) + 100.0).abs() < 1e-9);
        assert_eq!(wrap_offset(0.0, 1000.0), -1000.0);
        assert!((wrap_offset(250.0, 1000.0) + 750.0).abs() < 1e-9);
        assert_eq!(wrap_offset(-5.0, 0.0), 0.0);
        for raw in [-12345.6, -1000.0, -0.001, 0.5, 9999.0] {
            let w = wrap_offset(raw, 1000.0);
            assert!((-1000.0..0.0).contains(&w), "{raw} wrapped to {w}");
        }
    }

    #[test]
    fn test_wraps_after_eleven_seconds() {
        let mut m = running(1000.0, 100.0);
        for _ in 0..110 {
            m.advance(100.0);
        }
        assert!((m.offset() + 100.0).abs() < 1e-6, "offset {}", m.offset());
    }

    #[test]
    fn test_pause_resume_has_no_jump() {
        let mut m = running(1000.0, 100.0);
        m.advance(2500.0);
        let x = m.offset();
        m.pause();
        for _ in 0..50 {
            m.advance(1000.0);
        }
        assert_eq!(m.offset(), x);
        m.resume();
        assert_eq!(m.offset(), x);
        assert_eq!(m.phase(), MarqueePhase::Running);
        m.advance(100.0);
        assert!((m.offset() - (x - 10.0)).abs() < 1e-9);
    }

    #[test]
    fn test_hover_pause() {
        let mut m = running(1000.0, 100.0);
        m.pointer_enter();
        assert_eq!(m.phase(), MarqueePhase::Paused);
        m.pointer_leave();
        assert_eq!(m.phase(), MarqueePhase::Running);

        // An explicit pause is not undone by leaving
        m.pause();
        m.pointer_enter();
        m.pointer_leave();
        assert_eq!(m.phase(), MarqueePhase::Paused);
    }

    #[test]
    fn test_start_validates() {
        let mut store = ElementStore::new();
        let mut m = Marquee::new(store.mount("strip"), false);
        assert!(matches!(m.start(0.0, 10.0), Err(Error::InvalidMarquee(_))));
        assert!(m.start(100.0, f64::NAN).is_err());
        assert!(m.start(100.0, -1.0).is_err());
        assert_eq!(m.phase(), MarqueePhase::Idle);
        m.start(100.0, 1.0).unwrap();
        assert!(m.start(100.0, 1.0).is_err());
    }

    #[test]
    fn test_resize_rescales_offset() {
        let mut m = running(1000.0, 100.0);
        m.advance(2500.0);
        assert!((m.offset() + 250.0).abs() < 1e-9);
        m.set_cycle_width(2000.0).unwrap();
        assert!((m.offset() + 500.0).abs() < 1e-9);
        assert!(m.set_cycle_width(-1.0).is_err());
    }

    #[test]
    fn test_idle_does_not_move() {
        let mut store = ElementStore::new();
        let mut m = Marquee::new(store.mount("strip"), false);
        assert_eq!(m.advance(1000.0), 0.0);
    }

    #[test]
    fn test_apply_writes_translate_x() {
        let mut store = ElementStore::new();
        let strip = store.mount("strip");
        let mut m = Marquee::new(strip, false);
        m.start(1000.0, 100.0).unwrap();
        m.advance(1000.0);
        assert!(m.apply(&mut store));
        assert_eq!(store.get(strip, Property::TranslateX), Some(m.offset()));
    }

    #[test]
    fn test_config_helpers() {
        let width = MarqueeConfig::cycle_width(400.0, 32.0, 5);
        assert_eq!(width, 2160.0);
        assert_eq!(MarqueeConfig::speed_for_loop(width, 30.0), 72.0);
        assert_eq!(MarqueeConfig::speed_for_loop(width, 0.0), 0.0);

        let config = MarqueeConfig::default();
        assert_eq!(config.measure(None, 5), 2160.0);
        assert_eq!(config.measure(Some(100.0), 2), 264.0);
        assert_eq!(config.speed(2160.0), 72.0);
    }
}
