//! Single shared frame clock.
//!
//! One [`FrameScheduler`] drives every animated component. Each call to
//! [`FrameScheduler::tick`] reads the injected [`TimeSource`], bumps the frame
//! epoch and runs every subscriber once, in subscription order. Nothing is
//! queued: a late tick just carries a larger `delta_ms`.

use std::cell::RefCell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};

use tracing::{debug, error};

use super::clock::TimeSource;
use crate::Result;

/// Timing of one delivered frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Clock reading for this frame
    pub now_ms: f64,
    /// Time since the previous frame (0 on the first frame after start)
    pub delta_ms: f64,
    /// Monotonic frame counter, starting at 1
    pub epoch: u64,
}

impl FrameTime {
    #[inline]
    pub fn delta_secs(&self) -> f64 {
        self.delta_ms / 1000.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

pub type FrameCallback = Box<dyn FnMut(&FrameTime) -> Result<()>>;

struct Subscriber {
    id: SubscriptionId,
    callback: FrameCallback,
}

struct SchedulerInner {
    clock: Box<dyn TimeSource>,
    running: bool,
    ticking: bool,
    last_frame_ms: Option<f64>,
    epoch: u64,
    next_id: u64,
    subscribers: Vec<Subscriber>,
    /// Subscribers taken out for the tick in progress
    in_flight: Vec<SubscriptionId>,
    /// In-flight subscribers disposed during the tick in progress
    removed: Vec<SubscriptionId>,
}

/// Cloneable handle to the shared frame clock
#[derive(Clone)]
pub struct FrameScheduler {
    inner: Rc<RefCell<SchedulerInner>>,
}

impl fmt::Debug for FrameScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("FrameScheduler")
            .field("running", &inner.running)
            .field("epoch", &inner.epoch)
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl FrameScheduler {
    pub fn new(clock: impl TimeSource + 'static) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SchedulerInner {
                clock: Box::new(clock),
                running: false,
                ticking: false,
                last_frame_ms: None,
                epoch: 0,
                next_id: 0,
                subscribers: Vec::new(),
                in_flight: Vec::new(),
                removed: Vec::new(),
            })),
        }
    }

    /// Begin delivering frames
    pub fn start(&self) {
        let mut inner = self.inner.borrow_mut();
        if !inner.running {
            inner.running = true;
            inner.last_frame_ms = None;
            debug!(epoch = inner.epoch, "Frame scheduler started");
        }
    }

    /// Halt delivery; subscribers stay registered
    pub fn stop(&self) {
        let mut inner = self.inner.borrow_mut();
        if inner.running {
            inner.running = false;
            debug!(epoch = inner.epoch, "Frame scheduler stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.inner.borrow().running
    }

    /// Current reading of the injected clock
    pub fn now_ms(&self) -> f64 {
        self.inner.borrow().clock.now_ms()
    }

    /// Epoch of the most recent frame (0 before the first tick)
    pub fn epoch(&self) -> u64 {
        self.inner.borrow().epoch
    }

    /// Register a per-frame callback.
    ///
    /// The callback stays registered until the returned [`Subscription`] is
    /// disposed or dropped. A callback added during a tick first runs on the
    /// next tick.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: FnMut(&FrameTime) -> Result<()> + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let id = SubscriptionId(inner.next_id);
        inner.subscribers.push(Subscriber {
            id,
            callback: Box::new(callback),
        });
        Subscription {
            id,
            scheduler: Rc::downgrade(&self.inner),
        }
    }

    /// Remove a callback; returns false if it was not registered.
    ///
    /// Takes effect immediately, also for a tick in progress.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let detached = {
            let mut inner = self.inner.borrow_mut();
            if let Some(pos) = inner.subscribers.iter().position(|s| s.id == id) {
                Some(inner.subscribers.remove(pos))
            } else if inner.in_flight.contains(&id) && !inner.removed.contains(&id) {
                inner.removed.push(id);
                return true;
            } else {
                None
            }
        };
        // Dropped outside the borrow: the callback may own subscriptions itself.
        detached.is_some()
    }

    pub fn subscriber_count(&self) -> usize {
        let inner = self.inner.borrow();
        inner.subscribers.len() + inner.in_flight.len() - inner.removed.len()
    }

    /// Deliver one frame to every subscriber.
    ///
    /// Returns `None` when the scheduler is stopped or already inside a tick.
    pub fn tick(&self) -> Option<FrameTime> {
        let (frame, mut active) = {
            let mut inner = self.inner.borrow_mut();
            if !inner.running || inner.ticking {
                return None;
            }
            let now_ms = inner.clock.now_ms();
            let delta_ms = inner
                .last_frame_ms
                .map_or(0.0, |last| (now_ms - last).max(0.0));
            inner.last_frame_ms = Some(now_ms);
            inner.epoch += 1;
            inner.ticking = true;
            let active = std::mem::take(&mut inner.subscribers);
            inner.in_flight = active.iter().map(|s| s.id).collect();
            (
                FrameTime {
                    now_ms,
                    delta_ms,
                    epoch: inner.epoch,
                },
                active,
            )
        };

        for subscriber in active.iter_mut() {
            if self.inner.borrow().removed.contains(&subscriber.id) {
                continue;
            }
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| (subscriber.callback)(&frame)));
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!(
                    subscription = subscriber.id.0,
                    epoch = frame.epoch,
                    error = %e,
                    "Frame callback failed, skipping"
                ),
                Err(_) => error!(
                    subscription = subscriber.id.0,
                    epoch = frame.epoch,
                    "Frame callback panicked, skipping"
                ),
            }
        }

        let disposed: Vec<Subscriber> = {
            let mut inner = self.inner.borrow_mut();
            let removed = std::mem::take(&mut inner.removed);
            let (disposed, mut kept): (Vec<_>, Vec<_>) =
                active.into_iter().partition(|s| removed.contains(&s.id));
            kept.append(&mut inner.subscribers);
            inner.subscribers = kept;
            inner.in_flight.clear();
            inner.ticking = false;
            disposed
        };
        drop(disposed);

        Some(frame)
    }
}

/// Capability handle for a frame callback.
///
/// Disposing (or dropping) the handle is the only way the callback is
/// released.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriptionId,
    scheduler: Weak<RefCell<SchedulerInner>>,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Unsubscribe now
    pub fn dispose(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(inner) = self.scheduler.upgrade() {
            FrameScheduler { inner }.unsubscribe(self.id);
        }
        self.scheduler = Weak::new();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for SchedulerInner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchedulerInner")
            .field("running", &self.running)
            .field("epoch", &self.epoch)
            .finish()
    }
}
