//! Two-layer custom cursor: a lagging outer ring and a fast inner dot.

use crate::config::CursorConfig;
use crate::geometry::Point;
use crate::scroll::EasingType;
use crate::stage::{ElementHandle, ElementStore, Property};
use crate::timeline::QuickTween;

/// Duration of the hover scale change
const HOVER_SCALE_MS: f64 = 300.0;

#[derive(Debug, Clone)]
struct Layer {
    element: ElementHandle,
    x: QuickTween,
    y: QuickTween,
    scale: QuickTween,
}

impl Layer {
    fn new(element: ElementHandle, follow_ms: f64, easing: EasingType) -> Self {
        Self {
            element,
            x: QuickTween::new(0.0, follow_ms, easing),
            y: QuickTween::new(0.0, follow_ms, easing),
            scale: QuickTween::new(1.0, HOVER_SCALE_MS, EasingType::Cubic),
        }
    }

    fn position(&self) -> Point {
        Point::new(self.x.value(), self.y.value())
    }

    fn advance(&mut self, dt_ms: f64) {
        self.x.advance(dt_ms);
        self.y.advance(dt_ms);
        self.scale.advance(dt_ms);
    }

    fn apply(&self, store: &mut ElementStore) -> bool {
        store.set(self.element, Property::TranslateX, self.x.value())
            && store.set(self.element, Property::TranslateY, self.y.value())
            && store.set(self.element, Property::Scale, self.scale.value())
    }

    fn is_settled(&self) -> bool {
        self.x.is_settled() && self.y.is_settled() && self.scale.is_settled()
    }
}

#[derive(Debug, Clone)]
pub struct CursorFollower {
    ring: Layer,
    dot: Layer,
    ring_hover_scale: f64,
    hovering: bool,
}

impl CursorFollower {
    pub fn new(ring: ElementHandle, dot: ElementHandle, config: &CursorConfig) -> Self {
        Self {
            ring: Layer::new(ring, config.ring_duration_ms as f64, EasingType::Quartic),
            dot: Layer::new(dot, config.dot_duration_ms as f64, EasingType::Cubic),
            ring_hover_scale: config.ring_hover_scale,
            hovering: false,
        }
    }

    pub fn pointer_moved(&mut self, pos: Point) {
        self.ring.x.retarget(pos.x);
        self.ring.y.retarget(pos.y);
        self.dot.x.retarget(pos.x);
        self.dot.y.retarget(pos.y);
    }

    /// Grow the ring and hide the dot over interactive elements
    pub fn set_hovering(&mut self, hovering: bool) {
        if hovering == self.hovering {
            return;
        }
        self.hovering = hovering;
        if hovering {
            self.ring.scale.retarget(self.ring_hover_scale);
            self.dot.scale.retarget(0.0);
        } else {
            self.ring.scale.retarget(1.0);
            self.dot.scale.retarget(1.0);
        }
    }

    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    pub fn advance(&mut self, dt_ms: f64) {
        self.ring.advance(dt_ms);
        self.dot.advance(dt_ms);
    }

    pub fn apply(&self, store: &mut ElementStore) -> bool {
        let ring = self.ring.apply(store);
        let dot = self.dot.apply(store);
        ring && dot
    }

    pub fn ring_element(&self) -> ElementHandle {
        self.ring.element
    }

    pub fn dot_element(&self) -> ElementHandle {
        self.dot.element
    }

    pub fn ring_position(&self) -> Point {
        self.ring.position()
    }

    pub fn dot_position(&self) -> Point {
        self.dot.position()
    }

    pub fn ring_scale(&self) -> f64 {
        self.ring.scale.value()
    }

    pub fn dot_scale(&self) -> f64 {
        self.dot.scale.value()
    }

    pub fn is_settled(&self) -> bool {
        self.ring.is_settled() && self.dot.is_settled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor() -> (ElementStore, CursorFollower) {
        let mut store = ElementStore::new();
        let ring = store.mount("cursor-ring");
        let dot = store.mount("cursor-dot");
        let cursor = CursorFollower::new(ring, dot, &CursorConfig::default());
        (store, cursor)
    }

    #[test]
    fn test_dot_leads_ring() {
        let (_, mut cursor) = cursor();
        cursor.pointer_moved(Point::new(100.0, 40.0));
        cursor.advance(150.0);
        assert_eq!(cursor.dot_position(), Point::new(100.0, 40.0));
        assert!(cursor.ring_position().x < 100.0);
        assert!(!cursor.is_settled());

        cursor.advance(350.0);
        assert_eq!(cursor.ring_position(), Point::new(100.0, 40.0));
        assert!(cursor.is_settled());
    }

    #[test]
    fn test_hover_scales() {
        let (mut store, mut cursor) = cursor();
        cursor.set_hovering(true);
        cursor.advance(300.0);
        assert!((cursor.ring_scale() - 1.8).abs() < 1e-9);
        assert_eq!(cursor.dot_scale(), 0.0);
        assert!(cursor.apply(&mut store));

        cursor.set_hovering(false);
        cursor.advance(300.0);
        assert_eq!(cursor.ring_scale(), 1.0);
        assert_eq!(cursor.dot_scale(), 1.0);
    }
}
