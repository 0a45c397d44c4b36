//! Inertial scroll virtualization
//!
//! Raw wheel/touch deltas and programmatic scroll requests move a goal offset;
//! each frame the smoothed virtual offset is advanced toward it and applied to
//! a [`Viewport`].
//!
//! # Architecture
//!
//! ## L4 Atomic Layer
//! - `easing` - Pure easing functions (power, exponential, back, elastic)
//! - `timing` - Time calculation utilities (progress, interpolation, damping)
//! - `config` - Configuration types and defaults (re-exported from `crate::config`)
//!
//! ## L3 Molecular Layer
//! - `virtualizer` - Scroll controller combining atoms
//!
//! # Usage
//!
//! ```ignore
//! use folio_core::scroll::{InputSource, ScrollVirtualizer};
//!
//! let mut scroll = ScrollVirtualizer::with_defaults();
//! scroll.set_max_scroll(4000.0);
//!
//! // Raw input moves the goal
//! scroll.on_input(120.0, InputSource::Wheel, clock.now_ms());
//!
//! // Each frame, apply the smoothed offset
//! let frame = scroll.advance(&frame_time);
//! viewport.apply_scroll(frame.offset);
//! ```

// L4 Atomic Layer
pub mod config;
pub mod easing;
pub mod timing;

// L3 Molecular Layer
pub mod virtualizer;

pub use config::{ScrollConfig, ScrollConfigExt};
pub use easing::EasingType;
pub use virtualizer::{
    InputSource, ScrollFrame, ScrollState, ScrollTarget, ScrollToOptions, ScrollVirtualizer,
};

/// The real scroll container the virtual offset is applied to
pub trait Viewport {
    fn apply_scroll(&mut self, offset: f64);
}

/// Viewport that only remembers the last applied offset
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RecordingViewport {
    pub offset: f64,
    pub applied: u64,
}

impl Viewport for RecordingViewport {
    fn apply_scroll(&mut self, offset: f64) {
        self.offset = offset;
        self.applied += 1;
    }
}
