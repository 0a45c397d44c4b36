//! Page geometry in terminal rows, and the conversion to engine units.
//!
//! The engine works in pixel-like units so the configured bias, scroll step
//! and tween offsets keep their meaning; one terminal cell is
//! [`COL_PX`] x [`ROW_PX`] of those units.

use folio_core::config::SectionEntry;
use folio_core::SectionDescriptor;

use crate::content::{ABOUT, CONTACT, PROJECTS, SKILLS};

/// Engine units per terminal row
pub const ROW_PX: f64 = 20.0;
/// Engine units per terminal column
pub const COL_PX: f64 = 10.0;

/// Rows taken by a section heading and the gap below it
pub const HEADING_ROWS: u16 = 4;
pub const MARQUEE_ROWS: u16 = 3;
pub const PROJECT_ROWS: u16 = 3;
pub const SKILL_ROWS: u16 = 2;
pub const BADGE_ROWS: u16 = 2;
pub const BUTTON_ROWS: u16 = 3;
const HERO_MIN_ROWS: u16 = 14;
const SECTION_PADDING: u16 = 2;

pub fn rows_to_px(rows: u16) -> f64 {
    f64::from(rows) * ROW_PX
}

/// Whole rows an element moved by `translate` units
pub fn px_to_rows(translate: f64) -> i32 {
    (translate / ROW_PX).round() as i32
}

pub fn px_to_cols(translate: f64) -> i32 {
    (translate / COL_PX).round() as i32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Hero,
    About,
    Achievements,
    Projects,
    Skills,
    Contact,
    Other,
}

impl SectionKind {
    pub fn from_id(id: &str) -> Self {
        match id {
            "hero" => Self::Hero,
            "about" => Self::About,
            "achievements" => Self::Achievements,
            "projects" => Self::Projects,
            "skills" => Self::Skills,
            "contact" => Self::Contact,
            _ => Self::Other,
        }
    }

    fn body_rows(self, viewport_rows: u16) -> u16 {
        let count = |n: usize| n as u16;
        let rows = match self {
            Self::Hero => return viewport_rows.max(HERO_MIN_ROWS),
            Self::About => HEADING_ROWS + count(ABOUT.len()),
            Self::Achievements => HEADING_ROWS + MARQUEE_ROWS,
            Self::Projects => HEADING_ROWS + count(PROJECTS.len()) * PROJECT_ROWS,
            Self::Skills => HEADING_ROWS + count(SKILLS.len()) * SKILL_ROWS + BADGE_ROWS,
            Self::Contact => HEADING_ROWS + count(CONTACT.len()) + 1 + BUTTON_ROWS,
            Self::Other => HEADING_ROWS,
        };
        rows + SECTION_PADDING
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionLayout {
    pub id: String,
    pub label: String,
    pub kind: SectionKind,
    /// First page row
    pub top: u16,
    pub height: u16,
}

impl SectionLayout {
    pub fn heading_row(&self) -> u16 {
        self.top + 1
    }

    /// First row below the heading
    pub fn body_top(&self) -> u16 {
        self.top + HEADING_ROWS
    }

    pub fn bottom(&self) -> u16 {
        self.top + self.height
    }
}

/// Rows of the hero block, which is centered vertically
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeroRows {
    pub title: u16,
    pub subtitle: u16,
    pub cta: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLayout {
    pub sections: Vec<SectionLayout>,
    pub total_rows: u16,
    pub viewport_rows: u16,
}

impl PageLayout {
    /// Stack sections top to bottom in config order
    pub fn compute(entries: &[SectionEntry], viewport_rows: u16) -> Self {
        let viewport_rows = viewport_rows.max(1);
        let mut top = 0u16;
        let sections = entries
            .iter()
            .map(|entry| {
                let kind = SectionKind::from_id(&entry.id);
                let height = kind.body_rows(viewport_rows);
                let section = SectionLayout {
                    id: entry.id.clone(),
                    label: entry.label.clone(),
                    kind,
                    top,
                    height,
                };
                top = top.saturating_add(height);
                section
            })
            .collect();

        Self {
            sections,
            total_rows: top,
            viewport_rows,
        }
    }

    pub fn section(&self, kind: SectionKind) -> Option<&SectionLayout> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    pub fn descriptors(&self) -> Vec<SectionDescriptor> {
        self.sections
            .iter()
            .map(|s| SectionDescriptor::from_geometry(s.id.clone(), rows_to_px(s.top), rows_to_px(s.height)))
            .collect()
    }

    pub fn max_scroll_rows(&self) -> u16 {
        self.total_rows.saturating_sub(self.viewport_rows)
    }

    pub fn max_scroll_px(&self) -> f64 {
        rows_to_px(self.max_scroll_rows())
    }

    pub fn viewport_px(&self) -> f64 {
        rows_to_px(self.viewport_rows)
    }

    pub fn hero_rows(&self) -> Option<HeroRows> {
        let hero = self.section(SectionKind::Hero)?;
        let title = hero.top + (hero.height / 2).saturating_sub(4);
        Some(HeroRows {
            title,
            // The title can sit up to three rows low while it rises
            subtitle: title + 5,
            cta: title + 7,
        })
    }
}
