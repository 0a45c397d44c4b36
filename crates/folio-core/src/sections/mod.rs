//! Active-section tracking.
//!
//! - `descriptor` - section ranges and partition validation
//! - `tracker` - offset to active id mapping, sampled once per frame

pub mod descriptor;
pub mod tracker;

pub use descriptor::{validate_partition, RangeAnomaly, SectionDescriptor};
pub use tracker::{SectionLookup, SectionTracker};
