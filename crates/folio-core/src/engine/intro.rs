//! Loading sequence played before the page becomes scrollable.
//!
//! A ring spins three times while a caption fades in and out; once the ring
//! stops the whole loader fades away.

use tracing::debug;

use crate::scroll::EasingType;
use crate::stage::{ElementHandle, ElementStore, Property};
use crate::timeline::{TaskId, Timeline, TweenSpec};
use crate::Result;

const RING_TURN_MS: f64 = 1500.0;
const RING_REPEAT: u32 = 2;
const CAPTION_MS: f64 = 600.0;
const CAPTION_IN_AT_MS: f64 = 300.0;
const CAPTION_OUT_AT_MS: f64 = 2500.0;
const LOADER_FADE_MS: f64 = 800.0;

/// Elements making up the loader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntroElements {
    pub loader: ElementHandle,
    pub ring: ElementHandle,
    pub caption: ElementHandle,
}

impl IntroElements {
    pub fn mount(store: &mut ElementStore) -> Self {
        Self {
            loader: store.mount("loader"),
            ring: store.mount("loader-ring"),
            caption: store.mount("loader-caption"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntroPhase {
    Spinning { ring: TaskId },
    FadingOut { fade: TaskId },
    Finished,
}

#[derive(Debug, Clone)]
pub struct IntroSequence {
    elements: IntroElements,
    phase: IntroPhase,
}

impl IntroSequence {
    /// Schedule the spinning part of the sequence
    pub fn start(
        elements: IntroElements,
        timeline: &mut Timeline,
        store: &mut ElementStore,
        now_ms: f64,
    ) -> Result<Self> {
        let ring = timeline.schedule(
            TweenSpec::new(RING_TURN_MS)
                .from_to(Property::RotateZ, 0.0, 360.0)
                .easing(EasingType::EaseInOut)
                .repeat(RING_REPEAT),
            elements.ring,
            store,
            now_ms,
        )?;
        timeline.schedule(
            TweenSpec::new(CAPTION_MS)
                .from_to(Property::Opacity, 0.0, 1.0)
                .from_to(Property::TranslateY, 20.0, 0.0)
                .easing(EasingType::Cubic)
                .delay(CAPTION_IN_AT_MS),
            elements.caption,
            store,
            now_ms,
        )?;
        timeline.schedule(
            TweenSpec::new(CAPTION_MS)
                .from_to(Property::Opacity, 1.0, 0.0)
                .from_to(Property::TranslateY, 0.0, -20.0)
                .easing(EasingType::EaseIn)
                .delay(CAPTION_OUT_AT_MS)
                .immediate_render(false),
            elements.caption,
            store,
            now_ms,
        )?;

        debug!("Intro sequence started");
        Ok(Self {
            elements,
            phase: IntroPhase::Spinning { ring },
        })
    }

    pub fn elements(&self) -> IntroElements {
        self.elements
    }

    pub fn phase(&self) -> IntroPhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == IntroPhase::Finished
    }

    /// Feed tasks completed this frame. Returns true once the loader is gone.
    pub fn on_completed(
        &mut self,
        completed: &[TaskId],
        timeline: &mut Timeline,
        store: &mut ElementStore,
        now_ms: f64,
    ) -> Result<bool> {
        match self.phase {
            IntroPhase::Spinning { ring } if completed.contains(&ring) => {
                let fade = timeline.schedule(
                    TweenSpec::new(LOADER_FADE_MS)
                        .from_to(Property::Opacity, 1.0, 0.0)
                        .easing(EasingType::EaseInOut),
                    self.elements.loader,
                    store,
                    now_ms,
                )?;
                self.phase = IntroPhase::FadingOut { fade };
                Ok(false)
            }
            IntroPhase::FadingOut { fade } if completed.contains(&fade) => {
                self.phase = IntroPhase::Finished;
                debug!("Intro sequence finished");
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Skip whatever is left of the sequence
    pub fn abort(&mut self) {
        self.phase = IntroPhase::Finished;
    }

    /// Total length of the sequence
    pub fn duration_ms() -> f64 {
        RING_TURN_MS * f64::from(RING_REPEAT + 1) + LOADER_FADE_MS
    }
}
