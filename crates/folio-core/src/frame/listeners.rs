//! Ordered event listener lists.

use std::cell::RefCell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use tracing::{error, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Callback<T> = Box<dyn FnMut(&T)>;

struct Inner<T> {
    next_id: u64,
    entries: Vec<(ListenerId, Callback<T>)>,
    emitting: Vec<ListenerId>,
    removed: Vec<ListenerId>,
}

/// Listener list that tolerates listeners adding or removing listeners while
/// an event is being delivered.
pub struct Listeners<T> {
    inner: RefCell<Inner<T>>,
}

impl<T> Default for Listeners<T> {
    fn default() -> Self {
        Self {
            inner: RefCell::new(Inner {
                next_id: 0,
                entries: Vec::new(),
                emitting: Vec::new(),
                removed: Vec::new(),
            }),
        }
    }
}

impl<T> fmt::Debug for Listeners<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners").field("len", &self.len()).finish()
    }
}

impl<T> Listeners<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, callback: impl FnMut(&T) + 'static) -> ListenerId {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let id = ListenerId(inner.next_id);
        inner.entries.push((id, Box::new(callback)));
        id
    }

    pub fn remove(&self, id: ListenerId) -> bool {
        let detached = {
            let mut inner = self.inner.borrow_mut();
            if let Some(pos) = inner.entries.iter().position(|(i, _)| *i == id) {
                Some(inner.entries.remove(pos))
            } else if inner.emitting.contains(&id) && !inner.removed.contains(&id) {
                inner.removed.push(id);
                return true;
            } else {
                None
            }
        };
        detached.is_some()
    }

    pub fn len(&self) -> usize {
        let inner = self.inner.borrow();
        inner.entries.len() + inner.emitting.len() - inner.removed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deliver `value` to every listener in registration order
    pub fn emit(&self, value: &T) {
        let mut active = {
            let mut inner = self.inner.borrow_mut();
            if !inner.emitting.is_empty() {
                warn!("Nested listener emit ignored");
                return;
            }
            let active = std::mem::take(&mut inner.entries);
            inner.emitting = active.iter().map(|(id, _)| *id).collect();
            active
        };

        for (id, callback) in active.iter_mut() {
            if self.inner.borrow().removed.contains(id) {
                continue;
            }
            // A panicking listener must not leave the list stuck mid-emit
            if panic::catch_unwind(AssertUnwindSafe(|| callback(value))).is_err() {
                error!(listener = id.0, "Listener panicked, skipping");
            }
        }

        let dropped: Vec<_> = {
            let mut inner = self.inner.borrow_mut();
            let removed = std::mem::take(&mut inner.removed);
            let (dropped, mut kept): (Vec<_>, Vec<_>) =
                active.into_iter().partition(|(id, _)| removed.contains(id));
            kept.append(&mut inner.entries);
            inner.entries = kept;
            inner.emitting.clear();
            dropped
        };
        drop(dropped);
    }
}
