//! Shared frame clock and event plumbing.
//!
//! - `clock` - injectable time sources (`SystemClock`, `ManualClock`)
//! - `scheduler` - per-frame fan-out with capability-handle subscriptions
//! - `listeners` - re-entrancy tolerant event listener lists

pub mod clock;
pub mod listeners;
pub mod scheduler;

pub use clock::{ManualClock, SystemClock, TimeSource};
pub use listeners::{ListenerId, Listeners};
pub use scheduler::{FrameCallback, FrameScheduler, FrameTime, Subscription, SubscriptionId};
