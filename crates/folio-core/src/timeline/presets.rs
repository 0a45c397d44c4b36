//! Entrance effects used by the portfolio sections.

use super::anchor::ViewportAnchor;
use super::task::TweenSpec;
use crate::config::RevealConfig;
use crate::scroll::EasingType;
use crate::stage::Property;

/// Stagger between hero call-to-action buttons
pub const CTA_STAGGER_MS: f64 = 150.0;

/// Stagger between tool badges
pub const BADGE_STAGGER_MS: f64 = 50.0;

/// Section header: fade in while rising
pub fn fade_up(config: &RevealConfig) -> TweenSpec {
    let anchor = config.start.parse().unwrap_or_default();
    TweenSpec::new(config.duration_ms as f64)
        .from_to(Property::Opacity, 0.0, 1.0)
        .from_to(Property::TranslateY, 80.0, 0.0)
        .easing(config.easing)
        .on_visible(anchor)
        .immediate_render(config.immediate_render)
}

/// Body text sliding in from the left out of a blur
pub fn slide_in_left() -> TweenSpec {
    TweenSpec::new(1400.0)
        .from_to(Property::Opacity, 0.0, 1.0)
        .from_to(Property::TranslateX, -100.0, 0.0)
        .from_to(Property::Blur, 20.0, 0.0)
        .on_visible(ViewportAnchor::top(0.7))
}

/// Image growing in with a slight Y tilt
pub fn scale_in() -> TweenSpec {
    TweenSpec::new(1400.0)
        .from_to(Property::Opacity, 0.0, 1.0)
        .from_to(Property::Scale, 0.8, 1.0)
        .from_to(Property::RotateY, 20.0, 0.0)
        .from_to(Property::Blur, 20.0, 0.0)
        .on_visible(ViewportAnchor::top(0.7))
}

/// Project card rising and tilting into place
pub fn card_rise() -> TweenSpec {
    TweenSpec::new(1400.0)
        .from_to(Property::Opacity, 0.0, 1.0)
        .from_to(Property::TranslateY, 150.0, 0.0)
        .from_to(Property::Scale, 0.8, 1.0)
        .from_to(Property::RotateX, 30.0, 0.0)
        .from_to(Property::Blur, 20.0, 0.0)
        .on_visible(ViewportAnchor::top(0.85))
}

/// Skill row entering from the left
pub fn skill_row() -> TweenSpec {
    TweenSpec::new(1000.0)
        .from_to(Property::Opacity, 0.0, 1.0)
        .from_to(Property::TranslateX, -80.0, 0.0)
        .on_visible(ViewportAnchor::top(0.85))
}

/// Skill bar growing to `level` percent
pub fn skill_bar_fill(level: f64) -> TweenSpec {
    TweenSpec::new(1800.0)
        .from_to(Property::WidthPercent, 0.0, level.clamp(0.0, 100.0))
        .on_visible(ViewportAnchor::top(0.8))
}

/// Tool badges popping in; schedule as a batch with [`BADGE_STAGGER_MS`]
pub fn badge_pop() -> TweenSpec {
    TweenSpec::new(800.0)
        .from_to(Property::Opacity, 0.0, 1.0)
        .from_to(Property::TranslateY, 30.0, 0.0)
        .from_to(Property::Scale, 0.5, 1.0)
        .easing(EasingType::BackOut)
        .on_visible(ViewportAnchor::top(0.85))
}

/// Hero subtitle, after the title reveal
pub fn hero_subtitle() -> TweenSpec {
    TweenSpec::new(1200.0)
        .from_to(Property::Opacity, 0.0, 1.0)
        .from_to(Property::TranslateY, 50.0, 0.0)
        .from_to(Property::Blur, 10.0, 0.0)
        .delay(1300.0)
}

/// Hero buttons; schedule as a batch with [`CTA_STAGGER_MS`]
pub fn hero_cta() -> TweenSpec {
    TweenSpec::new(1000.0)
        .from_to(Property::Opacity, 0.0, 1.0)
        .from_to(Property::TranslateY, 50.0, 0.0)
        .from_to(Property::Scale, 0.8, 1.0)
        .from_to(Property::Blur, 10.0, 0.0)
        .easing(EasingType::BackOut)
        .delay(1700.0)
}

/// Navigation bar dropping in
pub fn nav_drop() -> TweenSpec {
    TweenSpec::new(1200.0)
        .from_to(Property::TranslateY, -100.0, 0.0)
        .from_to(Property::Opacity, 0.0, 1.0)
        .delay(500.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::Trigger;

    #[test]
    fn test_presets_are_valid() {
        let config = RevealConfig::default();
        for spec in [
            fade_up(&config),
            slide_in_left(),
            scale_in(),
            card_rise(),
            skill_row(),
            skill_bar_fill(85.0),
            badge_pop(),
            hero_subtitle(),
            hero_cta(),
            nav_drop(),
        ] {
            assert!(spec.validate().is_ok(), "{:?}", spec);
        }
    }

    #[test]
    fn test_fade_up_follows_config() {
        let config = RevealConfig {
            duration_ms: 900,
            start: "top 60%".to_string(),
            ..Default::default()
        };
        let spec = fade_up(&config);
        assert_eq!(spec.duration_ms, 900.0);
        match spec.trigger {
            Trigger::OnVisible { anchor, element } => {
                assert!((anchor.fraction - 0.6).abs() < 1e-9);
                assert!(element.is_none());
            }
            Trigger::Immediate => panic!("fade_up should wait for visibility"),
        }
    }

    #[test]
    fn test_skill_bar_level_is_clamped() {
        let spec = skill_bar_fill(140.0);
        assert_eq!(spec.properties[0].to, 100.0);
    }
}
