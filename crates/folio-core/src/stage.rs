//! In-memory presentation target.
//!
//! Components never touch a rendering surface directly. Each frame they write
//! animated property values into an [`ElementStore`]; an adapter (the terminal
//! UI, a test, a recorder) reads the values back and draws them.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Opaque reference to a mounted element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementHandle(u64);

impl ElementHandle {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element#{}", self.0)
    }
}

/// Animatable visual properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    Opacity,
    TranslateX,
    TranslateY,
    Scale,
    RotateX,
    RotateY,
    RotateZ,
    Blur,
    WidthPercent,
}

impl Property {
    /// Value of the property on an element nothing has animated
    pub fn neutral(self) -> f64 {
        match self {
            Property::Opacity | Property::Scale => 1.0,
            Property::WidthPercent => 100.0,
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone)]
struct Element {
    label: String,
    values: BTreeMap<Property, f64>,
}

#[derive(Debug, Default)]
pub struct ElementStore {
    next_id: u64,
    elements: HashMap<ElementHandle, Element>,
}

/// Store shared between the engine's components on one thread
pub type SharedStore = Rc<RefCell<ElementStore>>;

impl ElementStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedStore {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Mount a new element with neutral property values
    pub fn mount(&mut self, label: impl Into<String>) -> ElementHandle {
        self.next_id += 1;
        let handle = ElementHandle(self.next_id);
        self.elements.insert(
            handle,
            Element {
                label: label.into(),
                values: BTreeMap::new(),
            },
        );
        handle
    }

    /// Remove an element; returns false if it was not mounted
    pub fn unmount(&mut self, handle: ElementHandle) -> bool {
        self.elements.remove(&handle).is_some()
    }

    #[inline]
    pub fn is_mounted(&self, handle: ElementHandle) -> bool {
        self.elements.contains_key(&handle)
    }

    pub fn label(&self, handle: ElementHandle) -> Option<&str> {
        self.elements.get(&handle).map(|e| e.label.as_str())
    }

    /// Write a property value; writes to unmounted elements are ignored
    pub fn set(&mut self, handle: ElementHandle, property: Property, value: f64) -> bool {
        match self.elements.get_mut(&handle) {
            Some(element) => {
                element.values.insert(property, value);
                true
            }
            None => false,
        }
    }

    /// Current value, or the neutral value if never written
    pub fn get(&self, handle: ElementHandle, property: Property) -> Option<f64> {
        self.elements.get(&handle).map(|e| {
            e.values
                .get(&property)
                .copied()
                .unwrap_or_else(|| property.neutral())
        })
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mount_set_get() {
        let mut store = ElementStore::new();
        let el = store.mount("title");
        assert_eq!(store.get(el, Property::Opacity), Some(1.0));
        assert!(store.set(el, Property::Opacity, 0.25));
        assert_eq!(store.get(el, Property::Opacity), Some(0.25));
        assert_eq!(store.label(el), Some("title"));
    }

    #[test]
    fn test_unmounted_writes_are_ignored() {
        let mut store = ElementStore::new();
        let el = store.mount("card");
        assert!(store.unmount(el));
        assert!(!store.set(el, Property::Scale, 2.0));
        assert_eq!(store.get(el, Property::Scale), None);
        assert!(!store.unmount(el));
    }

    #[test]
    fn test_handles_are_unique() {
        let mut store = ElementStore::new();
        let a = store.mount("a");
        store.unmount(a);
        let b = store.mount("b");
        assert_ne!(a, b);
    }
}
