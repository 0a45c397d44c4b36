//! Magnetic pointer follower.
//!
//! While the pointer is over the element, the element is pulled toward it by
//! a fraction of the pointer's offset from the element center, with a slight
//! tilt and scale-up. On leave everything springs back to neutral.

use crate::config::MagnetConfig;
use crate::geometry::{Point, Rect};
use crate::scroll::EasingType;
use crate::stage::{ElementHandle, ElementStore, Property};
use crate::timeline::QuickTween;
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MagnetState {
    pub element_center: Point,
    /// Pointer offset from the center, scaled by strength
    pub pointer_delta: Point,
    /// Offset currently applied to the element
    pub applied_offset: Point,
    pub scale: f64,
    /// Z rotation in degrees
    pub rotation: f64,
}

#[derive(Debug, Clone)]
pub struct MagneticFollower {
    target: ElementHandle,
    bounds: Rect,
    strength: f64,
    config: MagnetConfig,
    hovering: bool,
    pointer_delta: Point,
    x: QuickTween,
    y: QuickTween,
    scale: QuickTween,
    rotation: QuickTween,
}

impl MagneticFollower {
    pub fn new(
        target: ElementHandle,
        bounds: Rect,
        strength: f64,
        config: MagnetConfig,
    ) -> Result<Self> {
        if !(strength > 0.0 && strength < 1.0) {
            return Err(Error::InvalidMagnet(format!(
                "strength must be in (0, 1), got {}",
                strength
            )));
        }
        Self::check_bounds(&bounds)?;

        let offset_ms = config.offset_duration_ms as f64;
        let scale_ms = config.scale_duration_ms as f64;
        Ok(Self {
            target,
            bounds,
            strength,
            hovering: false,
            pointer_delta: Point::ORIGIN,
            x: QuickTween::new(0.0, offset_ms, EasingType::ElasticOut),
            y: QuickTween::new(0.0, offset_ms, EasingType::ElasticOut),
            scale: QuickTween::new(1.0, scale_ms, EasingType::Cubic),
            rotation: QuickTween::new(0.0, offset_ms, EasingType::ElasticOut),
            config,
        })
    }

    fn check_bounds(bounds: &Rect) -> Result<()> {
        if bounds.is_empty() || !bounds.width.is_finite() || !bounds.height.is_finite() {
            return Err(Error::InvalidMagnet(format!(
                "bounds must have a positive size, got {}x{}",
                bounds.width, bounds.height
            )));
        }
        Ok(())
    }

    pub fn target(&self) -> ElementHandle {
        self.target
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    /// Update the hit area after a layout change
    pub fn set_bounds(&mut self, bounds: Rect) -> Result<()> {
        Self::check_bounds(&bounds)?;
        self.bounds = bounds;
        Ok(())
    }

    /// Feed a pointer position. Returns whether the pointer is over the element.
    pub fn pointer_move(&mut self, pos: Point) -> bool {
        if !self.bounds.contains(pos) {
            if self.hovering {
                self.pointer_leave();
            }
            return false;
        }

        self.hovering = true;
        let delta = pos.delta_from(self.bounds.center()).scaled(self.strength);
        self.pointer_delta = delta;
        self.x.retarget(delta.x);
        self.y.retarget(delta.y);
        self.scale.retarget(self.config.hover_scale);
        self.rotation
            .retarget(delta.x / self.bounds.width * self.config.rotation_factor);
        true
    }

    /// Spring back to neutral
    pub fn pointer_leave(&mut self) {
        self.hovering = false;
        self.pointer_delta = Point::ORIGIN;
        self.x.retarget(0.0);
        self.y.retarget(0.0);
        self.scale.retarget(1.0);
        self.rotation.retarget(0.0);
    }

    pub fn advance(&mut self, dt_ms: f64) -> MagnetState {
        self.x.advance(dt_ms);
        self.y.advance(dt_ms);
        self.scale.advance(dt_ms);
        self.rotation.advance(dt_ms);
        self.state()
    }

    pub fn state(&self) -> MagnetState {
        MagnetState {
            element_center: self.bounds.center(),
            pointer_delta: self.pointer_delta,
            applied_offset: Point::new(self.x.value(), self.y.value()),
            scale: self.scale.value(),
            rotation: self.rotation.value(),
        }
    }

    pub fn is_settled(&self) -> bool {
        self.x.is_settled()
            && self.y.is_settled()
            && self.scale.is_settled()
            && self.rotation.is_settled()
    }

    pub fn apply(&self, store: &mut ElementStore) -> bool {
        store.set(self.target, Property::TranslateX, self.x.value())
            && store.set(self.target, Property::TranslateY, self.y.value())
            && store.set(self.target, Property::Scale, self.scale.value())
            && store.set(self.target, Property::RotateZ, self.rotation.value())
    }
}
