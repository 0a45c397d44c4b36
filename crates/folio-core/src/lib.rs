pub mod config;
pub mod cursor;
pub mod engine;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod magnet;
pub mod marquee;
pub mod scroll;
pub mod sections;
pub mod stage;
pub mod timeline;

pub use config::{AppConfig, EasingType, ScrollConfig};
pub use engine::{EngineEvent, MagnetHandle, MarqueeHandle, MotionEngine, RevealHandle};
pub use error::{Error, Result};
pub use frame::{FrameScheduler, FrameTime, ManualClock, Subscription, SystemClock, TimeSource};
pub use geometry::{Point, Rect};
pub use sections::SectionDescriptor;
pub use stage::{ElementHandle, ElementStore, Property, SharedStore};
