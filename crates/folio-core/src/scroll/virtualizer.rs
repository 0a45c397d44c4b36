//! L3 Molecular Layer: Inertial scroll virtualizer
//!
//! Combines easing functions and timing utilities into a smoothed proxy for
//! the page scroll position. Raw input moves a goal offset; every frame the
//! virtual offset is advanced toward that goal and handed back to the caller,
//! which applies it to the real viewport.

use tracing::debug;

use super::config::{ScrollConfig, ScrollConfigExt};
use super::easing::EasingType;
use super::timing::{damp, is_complete, lerp, progress};
use crate::frame::FrameTime;
use crate::sections::SectionLookup;
use crate::{Error, Result};

/// Where raw scroll input came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Wheel,
    Touch,
}

/// Destination of a programmatic scroll
#[derive(Debug, Clone, PartialEq)]
pub enum ScrollTarget {
    /// Absolute offset from the top of the page
    Offset(f64),
    /// Start of a named section
    Section(String),
}

/// Options for [`ScrollVirtualizer::request_scroll_to`]
#[derive(Debug, Clone, Default)]
pub struct ScrollToOptions {
    /// Animation duration; the configured duration when `None`
    pub duration_ms: Option<u64>,
    /// Easing curve; the configured easing when `None`
    pub easing: Option<EasingType>,
    /// Added to the resolved target before clamping
    pub offset: f64,
    /// Jump without animating
    pub immediate: bool,
    /// Scroll even while the virtualizer is locked
    pub force: bool,
}

/// Observable scroll state
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollState {
    /// Offset last applied to the real viewport
    pub raw_offset: f64,
    /// Smoothed offset
    pub virtual_offset: f64,
    /// Units per second over the last frame
    pub velocity: f64,
    /// Clock time of the last raw input
    pub last_input_ms: Option<f64>,
}

/// Result of advancing one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollFrame {
    pub offset: f64,
    pub velocity: f64,
    /// Whether the offset differs from the previous frame's
    pub moved: bool,
}

/// Active programmatic scroll animation
#[derive(Debug, Clone)]
struct TimedScroll {
    start_ms: f64,
    from: f64,
    to: f64,
    duration_ms: f64,
    easing: EasingType,
}

#[derive(Debug, Clone)]
enum Motion {
    Idle,
    /// Exponentially following the goal after raw input
    Damped,
    Timed(TimedScroll),
}

/// Inertial scroll controller
///
/// Call `on_input()` or `request_scroll_to()` to move the goal, then
/// `advance()` each frame to get the current virtual offset.
#[derive(Debug, Clone)]
pub struct ScrollVirtualizer {
    config: ScrollConfig,
    state: ScrollState,
    goal: f64,
    max_scroll: f64,
    motion: Motion,
    locked: bool,
    last_frame_offset: Option<f64>,
}

impl Default for ScrollVirtualizer {
    fn default() -> Self {
        Self::new(ScrollConfig::default())
    }
}

impl ScrollVirtualizer {
    /// Create a new virtualizer with configuration
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            config,
            state: ScrollState::default(),
            goal: 0.0,
            max_scroll: 0.0,
            motion: Motion::Idle,
            locked: false,
            last_frame_offset: None,
        }
    }

    /// Create with default configuration
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Update configuration
    pub fn set_config(&mut self, config: ScrollConfig) {
        self.config = config;
    }

    /// Get current configuration
    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    pub fn state(&self) -> &ScrollState {
        &self.state
    }

    /// Get the current smoothed offset
    #[inline]
    pub fn current_offset(&self) -> f64 {
        self.state.virtual_offset
    }

    /// Get the offset motion is heading to
    #[inline]
    pub fn target_offset(&self) -> f64 {
        self.goal
    }

    #[inline]
    pub fn max_scroll(&self) -> f64 {
        self.max_scroll
    }

    /// Check if the offset is still moving toward its goal
    #[inline]
    pub fn is_animating(&self) -> bool {
        !matches!(self.motion, Motion::Idle)
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Ignore input and programmatic scrolls until `unlock()`
    pub fn lock(&mut self) {
        self.locked = true;
        self.stop();
    }

    pub fn unlock(&mut self) {
        self.locked = false;
    }

    /// Update the scrollable range.
    ///
    /// A range that shrinks below the current offset clamps immediately
    /// instead of animating back into range.
    pub fn set_max_scroll(&mut self, max_scroll: f64) {
        let max_scroll = if max_scroll.is_finite() { max_scroll.max(0.0) } else { 0.0 };
        self.max_scroll = max_scroll;
        self.goal = self.goal.min(max_scroll);

        if self.state.virtual_offset > max_scroll {
            debug!(
                offset = self.state.virtual_offset,
                max_scroll, "Scroll range shrank below offset, clamping"
            );
            self.state.virtual_offset = max_scroll;
            self.state.raw_offset = max_scroll;
        }
        if let Motion::Timed(ref mut anim) = self.motion {
            anim.to = anim.to.min(max_scroll);
            anim.from = anim.from.min(max_scroll);
        }
    }

    /// Start a programmatic scroll to an offset or a section.
    ///
    /// Returns the clamped goal. Unknown section ids are an error; requests
    /// while locked are ignored unless `options.force` is set.
    pub fn request_scroll_to(
        &mut self,
        target: &ScrollTarget,
        sections: &impl SectionLookup,
        options: &ScrollToOptions,
        now_ms: f64,
    ) -> Result<f64> {
        let base = match target {
            ScrollTarget::Offset(offset) => *offset,
            ScrollTarget::Section(id) => sections
                .section_start(id)
                .ok_or_else(|| Error::SectionNotFound(id.clone()))?,
        };

        if self.locked && !options.force {
            debug!(?target, "Scroll request ignored while locked");
            return Ok(self.goal);
        }

        let target = self.clamp(base + options.offset);
        let duration_ms = options
            .duration_ms
            .unwrap_or(self.config.animation_duration_ms);
        self.goal = target;

        if options.immediate || !self.config.smooth_enabled || duration_ms == 0 {
            // Instant jump when smooth scrolling is disabled
            self.state.virtual_offset = target;
            self.motion = Motion::Idle;
            return Ok(target);
        }

        let from = self.state.virtual_offset;
        if (from - target).abs() <= f64::EPSILON {
            self.motion = Motion::Idle;
            return Ok(target);
        }

        self.motion = Motion::Timed(TimedScroll {
            start_ms: now_ms,
            from,
            to: target,
            duration_ms: duration_ms as f64,
            easing: options.easing.unwrap_or(self.config.easing),
        });
        Ok(target)
    }

    /// Accumulate raw wheel or touch delta (positive = down).
    ///
    /// The goal moves immediately; the virtual offset follows it on
    /// subsequent frames. Returns false when input is ignored.
    pub fn on_input(&mut self, delta: f64, source: InputSource, now_ms: f64) -> bool {
        if self.locked || !delta.is_finite() {
            return false;
        }

        let multiplier = match source {
            InputSource::Wheel => self.config.wheel_multiplier,
            InputSource::Touch => self.config.touch_multiplier,
        };
        self.state.last_input_ms = Some(now_ms);
        self.goal = self.clamp(self.goal + delta * multiplier);

        if self.config.smooths(source == InputSource::Touch) {
            self.motion = Motion::Damped;
        } else {
            self.state.virtual_offset = self.goal;
            self.motion = Motion::Idle;
        }
        true
    }

    /// Adopt an offset the viewport reached on its own (scrollbar drag,
    /// keyboard paging) while no smoothed motion is running
    pub fn on_native_scroll(&mut self, offset: f64) {
        if self.is_animating() {
            return;
        }
        let offset = self.clamp(offset);
        self.goal = offset;
        self.state.virtual_offset = offset;
        self.state.raw_offset = offset;
    }

    /// Cancel any motion and stay at the current offset
    pub fn stop(&mut self) {
        self.motion = Motion::Idle;
        self.goal = self.state.virtual_offset;
    }

    /// Reset to the top with no motion
    pub fn reset(&mut self) {
        self.motion = Motion::Idle;
        self.goal = 0.0;
        self.state = ScrollState::default();
        self.last_frame_offset = None;
    }

    /// Advance motion by one frame and return the offset to apply
    pub fn advance(&mut self, frame: &FrameTime) -> ScrollFrame {
        let mut offset = self.state.virtual_offset;

        match self.motion {
            Motion::Idle => {}
            Motion::Damped => {
                offset = damp(offset, self.goal, self.config.damping_rate(), frame.delta_secs());
                if (self.goal - offset).abs() <= self.config.settle_epsilon {
                    offset = self.goal;
                    self.motion = Motion::Idle;
                }
            }
            Motion::Timed(ref anim) => {
                if is_complete(anim.start_ms, frame.now_ms, anim.duration_ms) {
                    offset = anim.to;
                    self.motion = Motion::Idle;
                } else {
                    let t = progress(anim.start_ms, frame.now_ms, anim.duration_ms);
                    offset = lerp(anim.from, anim.to, anim.easing.apply(t));
                }
            }
        }

        let offset = self.clamp(offset);
        let previous = self.last_frame_offset.unwrap_or(offset);
        let velocity = if frame.delta_ms > 0.0 {
            (offset - previous) / frame.delta_secs()
        } else {
            0.0
        };
        let moved = self
            .last_frame_offset
            .map_or(true, |last| (last - offset).abs() > f64::EPSILON);

        self.state.virtual_offset = offset;
        self.state.raw_offset = offset;
        self.state.velocity = velocity;
        self.last_frame_offset = Some(offset);

        ScrollFrame {
            offset,
            velocity,
            moved,
        }
    }

    #[inline]
    fn clamp(&self, offset: f64) -> f64 {
        offset.clamp(0.0, self.max_scroll)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Sections(HashMap<&'static str, f64>);

    impl SectionLookup for Sections {
        fn section_start(&self, id: &str) -> Option<f64> {
            self.0.get(id).copied()
        }
    }

    fn no_sections() -> Sections {
        Sections(HashMap::new())
    }

    fn frame(now_ms: f64, delta_ms: f64, epoch: u64) -> FrameTime {
        FrameTime {
            now_ms,
            delta_ms,
            epoch,
        }
    }

    /// Tick at 60fps until motion stops; returns (frames, offsets seen)
    fn run_until_idle(v: &mut ScrollVirtualizer, start_ms: f64) -> (u64, Vec<f64>) {
        let mut offsets = Vec::new();
        let mut now = start_ms;
        let mut epoch = 1;
        v.advance(&frame(now, 0.0, epoch));
        while v.is_animating() && epoch < 10_000 {
            now += 16.0;
            epoch += 1;
            offsets.push(v.advance(&frame(now, 16.0, epoch)).offset);
        }
        (epoch, offsets)
    }

    #[test]
    fn test_instant_scroll_when_disabled() {
        let config = ScrollConfig {
            smooth_enabled: false,
            ..Default::default()
        };
        let mut v = ScrollVirtualizer::new(config);
        v.set_max_scroll(2000.0);

        let goal = v
            .request_scroll_to(&ScrollTarget::Offset(100.0), &no_sections(), &Default::default(), 0.0)
            .unwrap();
        assert_eq!(goal, 100.0);
        assert_eq!(v.current_offset(), 100.0);
        assert!(!v.is_animating());
    }

    #[test]
    fn test_timed_scroll_converges_without_overshoot() {
        for goal in [0.0, 1.0, 333.0, 1999.5, 2000.0] {
            let mut v = ScrollVirtualizer::with_defaults();
            v.set_max_scroll(2000.0);
            v.on_native_scroll(1000.0);
            v.request_scroll_to(&ScrollTarget::Offset(goal), &no_sections(), &Default::default(), 0.0)
                .unwrap();

            let (frames, offsets) = run_until_idle(&mut v, 0.0);
            assert!(frames < 200, "goal {goal} took {frames} frames");
            assert!((v.current_offset() - goal).abs() < 1e-9);
            let (lo, hi) = if goal < 1000.0 { (goal, 1000.0) } else { (1000.0, goal) };
            for o in offsets {
                assert!(o >= lo - 1e-9 && o <= hi + 1e-9, "offset {o} left [{lo}, {hi}]");
            }
        }
    }

    #[test]
    fn test_wheel_input_converges_by_damping() {
        let mut v = ScrollVirtualizer::with_defaults();
        v.set_max_scroll(5000.0);
        assert!(v.on_input(300.0, InputSource::Wheel, 0.0));
        assert!(v.on_input(200.0, InputSource::Wheel, 5.0));
        assert_eq!(v.target_offset(), 500.0);
        assert_eq!(v.current_offset(), 0.0);

        let (frames, offsets) = run_until_idle(&mut v, 5.0);
        assert!(frames < 300);
        assert_eq!(v.current_offset(), 500.0);
        let mut prev = 0.0;
        for o in offsets {
            assert!(o >= prev && o <= 500.0);
            prev = o;
        }
        assert_eq!(v.state().last_input_ms, Some(5.0));
    }

    #[test]
    fn test_input_goal_is_clamped() {
        let mut v = ScrollVirtualizer::with_defaults();
        v.set_max_scroll(100.0);
        v.on_input(-50.0, InputSource::Wheel, 0.0);
        assert_eq!(v.target_offset(), 0.0);
        v.on_input(1000.0, InputSource::Wheel, 0.0);
        assert_eq!(v.target_offset(), 100.0);
    }

    #[test]
    fn test_touch_jumps_without_smooth_touch() {
        let mut v = ScrollVirtualizer::with_defaults();
        v.set_max_scroll(1000.0);
        v.on_input(120.0, InputSource::Touch, 0.0);
        assert_eq!(v.current_offset(), 120.0);
        assert!(!v.is_animating());
    }

    #[test]
    fn test_scroll_to_section() {
        let mut v = ScrollVirtualizer::with_defaults();
        v.set_max_scroll(3000.0);
        let sections = Sections(HashMap::from([("projects", 1200.0)]));

        let goal = v
            .request_scroll_to(
                &ScrollTarget::Section("projects".to_string()),
                &sections,
                &ScrollToOptions {
                    offset: -20.0,
                    ..Default::default()
                },
                0.0,
            )
            .unwrap();
        assert_eq!(goal, 1180.0);

        let err = v.request_scroll_to(
            &ScrollTarget::Section("blog".to_string()),
            &sections,
            &Default::default(),
            0.0,
        );
        assert!(matches!(err, Err(Error::SectionNotFound(id)) if id == "blog"));
    }

    #[test]
    fn test_shrinking_range_clamps_immediately() {
        let mut v = ScrollVirtualizer::with_defaults();
        v.set_max_scroll(2000.0);
        v.on_native_scroll(1800.0);
        v.set_max_scroll(1200.0);
        assert_eq!(v.current_offset(), 1200.0);
        assert_eq!(v.target_offset(), 1200.0);

        let f = v.advance(&frame(0.0, 0.0, 1));
        assert_eq!(f.offset, 1200.0);
    }

    #[test]
    fn test_lock_ignores_input() {
        let mut v = ScrollVirtualizer::with_defaults();
        v.set_max_scroll(1000.0);
        v.lock();
        assert!(!v.on_input(100.0, InputSource::Wheel, 0.0));
        let goal = v
            .request_scroll_to(&ScrollTarget::Offset(500.0), &no_sections(), &Default::default(), 0.0)
            .unwrap();
        assert_eq!(goal, 0.0);

        let forced = v
            .request_scroll_to(
                &ScrollTarget::Offset(500.0),
                &no_sections(),
                &ScrollToOptions {
                    force: true,
                    immediate: true,
                    ..Default::default()
                },
                0.0,
            )
            .unwrap();
        assert_eq!(forced, 500.0);

        v.unlock();
        assert!(v.on_input(100.0, InputSource::Wheel, 0.0));
    }

    #[test]
    fn test_velocity_and_moved() {
        let mut v = ScrollVirtualizer::with_defaults();
        v.set_max_scroll(1000.0);
        let first = v.advance(&frame(0.0, 0.0, 1));
        assert!(first.moved);
        assert_eq!(first.velocity, 0.0);

        let idle = v.advance(&frame(16.0, 16.0, 2));
        assert!(!idle.moved);

        v.on_input(200.0, InputSource::Wheel, 16.0);
        let moving = v.advance(&frame(32.0, 16.0, 3));
        assert!(moving.moved);
        assert!(moving.velocity > 0.0);
        assert!((moving.velocity - moving.offset / 0.016).abs() < 1e-6);
    }

    #[test]
    fn test_input_cancels_timed_scroll() {
        let mut v = ScrollVirtualizer::with_defaults();
        v.set_max_scroll(3000.0);
        v.request_scroll_to(&ScrollTarget::Offset(2000.0), &no_sections(), &Default::default(), 0.0)
            .unwrap();
        v.advance(&frame(0.0, 0.0, 1));
        v.on_input(-100.0, InputSource::Wheel, 10.0);
        assert_eq!(v.target_offset(), 1900.0);
        run_until_idle(&mut v, 10.0);
        assert_eq!(v.current_offset(), 1900.0);
    }
}
