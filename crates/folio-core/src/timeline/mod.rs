//! Trigger-gated tween timeline.
//!
//! - `task` - tween specs, triggers and task states
//! - `anchor` - viewport anchors ("top 70%") and intersections
//! - `playback` - the [`Timeline`] that arms and advances tasks
//! - `reveal` - per-character text reveal
//! - `presets` - section entrance effects
//! - `quick` - retargetable single-value tweens

pub mod anchor;
pub mod playback;
pub mod presets;
pub mod quick;
pub mod reveal;
pub mod task;

pub use anchor::{ElementEdge, ViewportAnchor, ViewportIntersection};
pub use playback::{Timeline, TimelineReport};
pub use quick::QuickTween;
pub use reveal::{reveal_text, TextReveal, TextRevealParams};
pub use task::{BatchId, PropertyTween, TaskId, TaskState, Trigger, TweenSpec};
