//! Capability handles returned by the engine.
//!
//! Disposing a handle is how a component is unmounted: its frame
//! subscription is released and the work it owns is dropped.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::frame::Subscription;
use crate::geometry::Rect;
use crate::magnet::{MagnetState, MagneticFollower};
use crate::marquee::{Marquee, MarqueePhase, MarqueeState};
use crate::stage::{ElementHandle, ElementStore};
use crate::timeline::{BatchId, TaskId, TaskState, Timeline};
use crate::Result;

/// A running marquee. Dropping the handle also stops it.
#[derive(Debug)]
pub struct MarqueeHandle {
    pub(crate) marquee: Rc<RefCell<Marquee>>,
    pub(crate) subscription: Subscription,
}

impl MarqueeHandle {
    pub fn strip(&self) -> ElementHandle {
        self.marquee.borrow().strip()
    }

    pub fn state(&self) -> MarqueeState {
        *self.marquee.borrow().state()
    }

    pub fn offset(&self) -> f64 {
        self.marquee.borrow().offset()
    }

    pub fn is_paused(&self) -> bool {
        self.marquee.borrow().phase() == MarqueePhase::Paused
    }

    pub fn pause(&self) {
        self.marquee.borrow_mut().pause();
    }

    pub fn resume(&self) {
        self.marquee.borrow_mut().resume();
    }

    pub fn pointer_enter(&self) {
        self.marquee.borrow_mut().pointer_enter();
    }

    pub fn pointer_leave(&self) {
        self.marquee.borrow_mut().pointer_leave();
    }

    pub fn set_cycle_width(&self, cycle_width: f64) -> Result<()> {
        self.marquee.borrow_mut().set_cycle_width(cycle_width)
    }

    pub fn dispose(self) {
        self.subscription.dispose();
    }
}

/// A bound magnetic element. Dropping the handle also unbinds it.
#[derive(Debug)]
pub struct MagnetHandle {
    pub(crate) follower: Rc<RefCell<MagneticFollower>>,
    pub(crate) subscription: Subscription,
}

impl MagnetHandle {
    pub fn target(&self) -> ElementHandle {
        self.follower.borrow().target()
    }

    pub fn state(&self) -> MagnetState {
        self.follower.borrow().state()
    }

    pub fn is_hovering(&self) -> bool {
        self.follower.borrow().is_hovering()
    }

    pub fn set_bounds(&self, bounds: Rect) -> Result<()> {
        self.follower.borrow_mut().set_bounds(bounds)
    }

    pub fn dispose(self) {
        self.subscription.dispose();
    }
}

/// Tween tasks registered through the engine.
///
/// Dropping the handle leaves the tasks to finish; `dispose()` cancels them
/// and unmounts any elements the engine created for them.
#[derive(Debug)]
pub struct RevealHandle {
    pub(crate) timeline: Weak<RefCell<Timeline>>,
    pub(crate) store: Weak<RefCell<ElementStore>>,
    pub(crate) tasks: Vec<TaskId>,
    pub(crate) batch: Option<BatchId>,
    pub(crate) glyphs: Vec<(char, ElementHandle)>,
}

impl RevealHandle {
    pub fn tasks(&self) -> &[TaskId] {
        &self.tasks
    }

    pub fn batch(&self) -> Option<BatchId> {
        self.batch
    }

    /// Characters mounted by a text reveal, in order
    pub fn glyphs(&self) -> &[(char, ElementHandle)] {
        &self.glyphs
    }

    pub fn text(&self) -> String {
        self.glyphs.iter().map(|(c, _)| *c).collect()
    }

    /// Whether every task has finished
    pub fn is_done(&self) -> bool {
        let Some(timeline) = self.timeline.upgrade() else {
            return true;
        };
        let timeline = timeline.borrow();
        self.tasks
            .iter()
            .all(|id| matches!(timeline.state(*id), Some(TaskState::Done) | None))
    }

    pub fn dispose(self) {
        if let Some(timeline) = self.timeline.upgrade() {
            let mut timeline = timeline.borrow_mut();
            for id in &self.tasks {
                timeline.cancel(*id);
            }
        }
        if let Some(store) = self.store.upgrade() {
            let mut store = store.borrow_mut();
            for (_, handle) in &self.glyphs {
                store.unmount(*handle);
            }
        }
    }
}
