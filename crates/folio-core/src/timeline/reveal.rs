//! Per-character text reveal.
//!
//! The text is split into one mounted element per character, then a single
//! staggered batch rises, un-rotates and un-blurs them into place.

use super::playback::Timeline;
use super::task::{BatchId, TweenSpec};
use crate::config::RevealConfig;
use crate::scroll::EasingType;
use crate::stage::{ElementHandle, ElementStore, Property};
use crate::{Error, Result};

/// Non-breaking space, so revealed spaces keep their width
pub const NBSP: char = '\u{00A0}';

#[derive(Debug, Clone, PartialEq)]
pub struct TextRevealParams {
    pub duration_ms: f64,
    pub stagger_ms: f64,
    pub delay_ms: f64,
    pub easing: EasingType,
    /// Starting vertical offset of each character
    pub rise: f64,
    /// Starting X rotation in degrees
    pub rotate_x: f64,
    pub blur: f64,
}

impl Default for TextRevealParams {
    fn default() -> Self {
        Self {
            duration_ms: 1400.0,
            stagger_ms: 30.0,
            delay_ms: 500.0,
            easing: EasingType::EaseOut,
            rise: 150.0,
            rotate_x: -90.0,
            blur: 10.0,
        }
    }
}

impl TextRevealParams {
    pub fn from_config(config: &RevealConfig) -> Self {
        Self {
            duration_ms: config.text_duration_ms as f64,
            stagger_ms: config.text_stagger_ms as f64,
            delay_ms: config.text_delay_ms as f64,
            easing: config.easing,
            ..Default::default()
        }
    }

    fn spec(&self) -> TweenSpec {
        TweenSpec::new(self.duration_ms)
            .from_to(Property::Opacity, 0.0, 1.0)
            .from_to(Property::TranslateY, self.rise, 0.0)
            .from_to(Property::RotateX, self.rotate_x, 0.0)
            .from_to(Property::Blur, self.blur, 0.0)
            .easing(self.easing)
            .delay(self.delay_ms)
    }
}

/// Characters mounted for a reveal, in text order
#[derive(Debug, Clone, PartialEq)]
pub struct TextReveal {
    pub parent: ElementHandle,
    pub batch: BatchId,
    pub glyphs: Vec<(char, ElementHandle)>,
}

impl TextReveal {
    pub fn text(&self) -> String {
        self.glyphs.iter().map(|(c, _)| *c).collect()
    }

    pub fn elements(&self) -> Vec<ElementHandle> {
        self.glyphs.iter().map(|(_, h)| *h).collect()
    }

    /// Cancel the batch and unmount every character
    pub fn remove(self, timeline: &mut Timeline, store: &mut ElementStore) {
        timeline.cancel_batch(self.batch);
        for (_, handle) in self.glyphs {
            store.unmount(handle);
        }
    }
}

/// Split `text` under `parent` and schedule its reveal
pub fn reveal_text(
    timeline: &mut Timeline,
    store: &mut ElementStore,
    parent: ElementHandle,
    text: &str,
    params: &TextRevealParams,
    now_ms: f64,
) -> Result<TextReveal> {
    if !store.is_mounted(parent) {
        return Err(Error::TargetNotFound(parent));
    }
    if text.is_empty() {
        return Err(Error::InvalidTween("nothing to reveal".to_string()));
    }
    let spec = params.spec();
    spec.validate()?;

    let parent_label = store.label(parent).unwrap_or_default().to_string();
    let glyphs: Vec<(char, ElementHandle)> = text
        .chars()
        .enumerate()
        .map(|(i, c)| {
            let c = if c == ' ' { NBSP } else { c };
            (c, store.mount(format!("{}[{}]", parent_label, i)))
        })
        .collect();
    let elements: Vec<ElementHandle> = glyphs.iter().map(|(_, h)| *h).collect();

    let batch = match timeline.schedule_batch(spec, &elements, params.stagger_ms, store, now_ms) {
        Ok(batch) => batch,
        Err(e) => {
            for handle in elements {
                store.unmount(handle);
            }
            return Err(e);
        }
    };

    Ok(TextReveal {
        parent,
        batch,
        glyphs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameTime;
    use crate::timeline::TaskState;

    fn frame(now_ms: f64) -> FrameTime {
        FrameTime {
            now_ms,
            delta_ms: 16.0,
            epoch: 1,
        }
    }

    #[test]
    fn test_spaces_become_nbsp() {
        let mut store = ElementStore::new();
        let mut timeline = Timeline::new();
        let title = store.mount("title");

        let reveal = reveal_text(
            &mut timeline,
            &mut store,
            title,
            "Hi there",
            &TextRevealParams::default(),
            0.0,
        )
        .unwrap();

        assert_eq!(reveal.glyphs.len(), 8);
        assert_eq!(reveal.glyphs[2].0, NBSP);
        assert_eq!(reveal.text(), "Hi\u{00A0}there");
        assert_eq!(store.label(reveal.glyphs[0].1), Some("title[0]"));
    }

    #[test]
    fn test_characters_start_hidden_and_stagger_in() {
        let mut store = ElementStore::new();
        let mut timeline = Timeline::new();
        let title = store.mount("title");
        let params = TextRevealParams::default();
        let reveal = reveal_text(&mut timeline, &mut store, title, "abc", &params, 0.0).unwrap();
        let els = reveal.elements();

        for el in &els {
            assert_eq!(store.get(*el, Property::Opacity), Some(0.0));
            assert_eq!(store.get(*el, Property::TranslateY), Some(150.0));
            assert_eq!(store.get(*el, Property::RotateX), Some(-90.0));
            assert_eq!(store.get(*el, Property::Blur), Some(10.0));
        }

        // First character starts after the delay, the third 60ms later
        timeline.advance(&frame(530.0), &mut store);
        assert!(store.get(els[0], Property::Opacity).unwrap() > 0.0);
        assert_eq!(store.get(els[2], Property::Opacity), Some(0.0));

        timeline.advance(&frame(500.0 + 60.0 + 1400.0), &mut store);
        for el in &els {
            assert_eq!(store.get(*el, Property::Opacity), Some(1.0));
            assert_eq!(store.get(*el, Property::TranslateY), Some(0.0));
        }
        for id in timeline.batch_tasks(reveal.batch) {
            assert_eq!(timeline.state(id), Some(TaskState::Done));
        }
    }

    #[test]
    fn test_remove_unmounts_characters() {
        let mut store = ElementStore::new();
        let mut timeline = Timeline::new();
        let title = store.mount("title");
        let reveal = reveal_text(
            &mut timeline,
            &mut store,
            title,
            "ok",
            &TextRevealParams::default(),
            0.0,
        )
        .unwrap();
        assert_eq!(store.len(), 3);

        reveal.remove(&mut timeline, &mut store);
        assert_eq!(store.len(), 1);
        assert!(timeline.is_empty());
    }

    #[test]
    fn test_missing_parent() {
        let mut store = ElementStore::new();
        let mut timeline = Timeline::new();
        let title = store.mount("title");
        store.unmount(title);
        let err = reveal_text(
            &mut timeline,
            &mut store,
            title,
            "x",
            &TextRevealParams::default(),
            0.0,
        );
        assert!(matches!(err, Err(Error::TargetNotFound(_))));
        assert!(store.is_empty());
    }
}
