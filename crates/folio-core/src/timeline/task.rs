use std::fmt;

use serde::{Deserialize, Serialize};

use super::anchor::ViewportAnchor;
use crate::scroll::EasingType;
use crate::stage::{ElementHandle, Property};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(pub(crate) u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BatchId(pub(crate) u64);

/// Lifecycle of a tween task. Tasks only ever move forward through these
/// states; `Timeline::reset` is the one way back to `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// Waiting for the trigger
    Pending,
    /// Triggered, waiting for the delay or the next frame
    Armed,
    Playing,
    Done,
}

/// What starts a task
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Trigger {
    /// Armed as soon as it is scheduled
    Immediate,
    /// Armed the first time `element` crosses `anchor`; `None` means the
    /// tween target (or the first target of a batch)
    OnVisible {
        anchor: ViewportAnchor,
        element: Option<ElementHandle>,
    },
}

/// One animated property
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertyTween {
    pub property: Property,
    pub from: f64,
    pub to: f64,
}

/// Declarative description of a from-to tween
#[derive(Debug, Clone, PartialEq)]
pub struct TweenSpec {
    pub properties: Vec<PropertyTween>,
    pub duration_ms: f64,
    pub easing: EasingType,
    pub delay_ms: f64,
    /// Extra iterations after the first
    pub repeat: u32,
    pub trigger: Trigger,
    /// Write the `from` values as soon as the task is scheduled
    pub immediate_render: bool,
}

impl TweenSpec {
    pub fn new(duration_ms: f64) -> Self {
        Self {
            properties: Vec::new(),
            duration_ms,
            easing: EasingType::EaseOut,
            delay_ms: 0.0,
            repeat: 0,
            trigger: Trigger::Immediate,
            immediate_render: true,
        }
    }

    pub fn from_to(mut self, property: Property, from: f64, to: f64) -> Self {
        self.properties.push(PropertyTween { property, from, to });
        self
    }

    pub fn easing(mut self, easing: EasingType) -> Self {
        self.easing = easing;
        self
    }

    pub fn delay(mut self, delay_ms: f64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn repeat(mut self, repeat: u32) -> Self {
        self.repeat = repeat;
        self
    }

    /// Trigger when the tween target crosses `anchor`
    pub fn on_visible(mut self, anchor: ViewportAnchor) -> Self {
        self.trigger = Trigger::OnVisible {
            anchor,
            element: None,
        };
        self
    }

    /// Trigger when another element crosses `anchor`
    pub fn triggered_by(mut self, element: ElementHandle, anchor: ViewportAnchor) -> Self {
        self.trigger = Trigger::OnVisible {
            anchor,
            element: Some(element),
        };
        self
    }

    pub fn immediate_render(mut self, immediate_render: bool) -> Self {
        self.immediate_render = immediate_render;
        self
    }

    /// Length of all iterations, excluding the delay
    pub fn total_duration_ms(&self) -> f64 {
        self.duration_ms * f64::from(self.repeat + 1)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.duration_ms.is_finite() && self.duration_ms > 0.0) {
            return Err(Error::InvalidTween(format!(
                "duration must be positive, got {}",
                self.duration_ms
            )));
        }
        if !(self.delay_ms.is_finite() && self.delay_ms >= 0.0) {
            return Err(Error::InvalidTween(format!(
                "delay must be non-negative, got {}",
                self.delay_ms
            )));
        }
        if self.properties.is_empty() {
            return Err(Error::InvalidTween("no properties to animate".to_string()));
        }
        if let Some(p) = self
            .properties
            .iter()
            .find(|p| !p.from.is_finite() || !p.to.is_finite())
        {
            return Err(Error::InvalidTween(format!(
                "non-finite value for {:?}",
                p.property
            )));
        }
        if let Trigger::OnVisible { anchor, .. } = self.trigger {
            if !anchor.fraction.is_finite() {
                return Err(Error::InvalidTween("non-finite trigger anchor".to_string()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let spec = TweenSpec::new(1200.0)
            .from_to(Property::Opacity, 0.0, 1.0)
            .from_to(Property::TranslateY, 80.0, 0.0)
            .delay(100.0)
            .repeat(2)
            .on_visible(ViewportAnchor::top(0.8));

        assert_eq!(spec.properties.len(), 2);
        assert_eq!(spec.total_duration_ms(), 3600.0);
        assert!(matches!(spec.trigger, Trigger::OnVisible { element: None, .. }));
        assert!(spec.immediate_render);
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_specs() {
        let base = TweenSpec::new(500.0).from_to(Property::Opacity, 0.0, 1.0);

        let mut spec = base.clone();
        spec.duration_ms = 0.0;
        assert!(matches!(spec.validate(), Err(Error::InvalidTween(_))));

        let mut spec = base.clone();
        spec.duration_ms = f64::INFINITY;
        assert!(spec.validate().is_err());

        assert!(TweenSpec::new(500.0).validate().is_err());
        assert!(base.clone().delay(-1.0).validate().is_err());
        assert!(base
            .from_to(Property::Scale, f64::NAN, 1.0)
            .validate()
            .is_err());
    }
}
