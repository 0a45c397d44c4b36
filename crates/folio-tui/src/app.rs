use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use anyhow::Result;
use folio_core::engine::{EngineEvent, IntroElements, IntroPhase, MagnetHandle, MarqueeHandle, RevealHandle};
use folio_core::scroll::{ScrollConfigExt, ScrollTarget, ScrollToOptions};
use folio_core::stage::ElementStore;
use folio_core::timeline::presets;
use folio_core::{AppConfig, ElementHandle, MotionEngine, Point, Property, Rect, TimeSource};
use tracing::{debug, info, warn};
use unicode_width::UnicodeWidthStr;

use crate::content::{self, ABOUT, CONTACT, CONTACT_BUTTON, CTA_LABELS, PROJECTS, SKILLS, TOOLS};
use crate::input::Action;
use crate::layout::{
    rows_to_px, PageLayout, SectionKind, BUTTON_ROWS, COL_PX, MARQUEE_ROWS, PROJECT_ROWS, ROW_PX,
    SKILL_ROWS,
};
use crate::theme::Theme;

/// Screen row where the page viewport starts, below the nav bar
pub const PAGE_TOP: u16 = 1;

pub const BRAND: &str = " folio.";

const NAV_GAP: u16 = 3;
const PROJECT_STAGGER_MS: f64 = 120.0;

/// Elements of the page the engine animates
#[derive(Debug, Clone)]
pub struct PageElements {
    pub nav: ElementHandle,
    pub hero_title: ElementHandle,
    pub hero_subtitle: ElementHandle,
    pub ctas: Vec<ElementHandle>,
    /// Heading of every section below the hero, by section id
    pub headings: Vec<(String, ElementHandle)>,
    pub about: ElementHandle,
    pub marquee: ElementHandle,
    pub projects: Vec<ElementHandle>,
    /// Row and bar of each skill
    pub skills: Vec<(ElementHandle, ElementHandle)>,
    pub badges: Vec<ElementHandle>,
    pub contact_button: ElementHandle,
}

impl PageElements {
    fn mount(store: &mut ElementStore, layout: &PageLayout) -> Self {
        Self {
            nav: store.mount("nav"),
            hero_title: store.mount("hero-title"),
            hero_subtitle: store.mount("hero-subtitle"),
            ctas: CTA_LABELS.iter().map(|l| store.mount(format!("cta:{}", l))).collect(),
            headings: layout
                .sections
                .iter()
                .filter(|s| s.kind != SectionKind::Hero)
                .map(|s| (s.id.clone(), store.mount(format!("heading:{}", s.id))))
                .collect(),
            about: store.mount("about"),
            marquee: store.mount("marquee"),
            projects: PROJECTS
                .iter()
                .map(|p| store.mount(format!("project:{}", p.title)))
                .collect(),
            skills: SKILLS
                .iter()
                .map(|s| {
                    (
                        store.mount(format!("skill:{}", s.name)),
                        store.mount(format!("skill-bar:{}", s.name)),
                    )
                })
                .collect(),
            badges: TOOLS.iter().map(|t| store.mount(format!("badge:{}", t))).collect(),
            contact_button: store.mount("contact-button"),
        }
    }

    pub fn heading(&self, section_id: &str) -> Option<ElementHandle> {
        self.headings
            .iter()
            .find(|(id, _)| id == section_id)
            .map(|(_, el)| *el)
    }
}

/// A clickable nav bar entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub index: usize,
    pub id: String,
    pub text: String,
    pub start: u16,
    pub width: u16,
}

/// Application state
pub struct App {
    /// Application configuration
    pub config: AppConfig,
    pub theme: Theme,
    pub engine: MotionEngine,
    pub layout: PageLayout,
    pub elements: PageElements,
    /// Loader elements while the intro is playing
    pub intro: Option<IntroElements>,
    pub width: u16,
    pub height: u16,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Status message
    pub status_message: Option<String>,
    /// Frames rendered so far
    pub frames: u64,
    /// Last pointer cell, while the pointer is over the terminal
    pub pointer: Option<(u16, u16)>,
    hero_title: Option<RevealHandle>,
    reveals: Vec<RevealHandle>,
    marquee: Option<MarqueeHandle>,
    magnet: Option<MagnetHandle>,
    events: Rc<RefCell<Vec<EngineEvent>>>,
    pointer_over_marquee: bool,
}

impl App {
    pub fn new(
        config: AppConfig,
        clock: impl TimeSource + 'static,
        width: u16,
        height: u16,
    ) -> Result<Self> {
        let theme = Theme::by_name(&config.ui.theme);
        let engine = MotionEngine::new(config.clone(), clock);
        let layout = PageLayout::compute(&config.sections.entries, Self::viewport_rows(height));
        let elements = PageElements::mount(&mut engine.store().borrow_mut(), &layout);

        let events = Rc::new(RefCell::new(Vec::new()));
        {
            let events = events.clone();
            engine.on_event(move |event| events.borrow_mut().push(event.clone()));
        }

        let mut app = Self {
            config,
            theme,
            engine,
            layout,
            elements,
            intro: None,
            width,
            height,
            should_quit: false,
            status_message: None,
            frames: 0,
            pointer: None,
            hero_title: None,
            reveals: Vec::new(),
            marquee: None,
            magnet: None,
            events,
            pointer_over_marquee: false,
        };

        app.register_reveals()?;
        app.apply_layout();
        app.start_marquee()?;
        app.bind_contact_button()?;

        if app.config.ui.show_intro {
            app.intro = Some(app.engine.play_intro()?);
        } else {
            app.start_hero()?;
        }
        info!(width, height, rows = app.layout.total_rows, "Portfolio page ready");
        Ok(app)
    }

    fn viewport_rows(height: u16) -> u16 {
        height.saturating_sub(PAGE_TOP + 1).max(1)
    }

    // Setup

    fn has_section(&self, kind: SectionKind) -> bool {
        self.layout.section(kind).is_some()
    }

    fn register_reveals(&mut self) -> Result<()> {
        for (_, heading) in &self.elements.headings {
            self.reveals.push(
                self.engine
                    .register_reveal_animation(*heading, presets::fade_up(&self.config.reveal))?,
            );
        }
        if self.has_section(SectionKind::About) {
            self.reveals.push(
                self.engine
                    .register_reveal_animation(self.elements.about, presets::slide_in_left())?,
            );
        }
        if self.has_section(SectionKind::Projects) {
            self.reveals.push(self.engine.register_batch(
                &self.elements.projects,
                presets::card_rise(),
                PROJECT_STAGGER_MS,
            )?);
        }
        if self.has_section(SectionKind::Skills) {
            for (&(row, bar), skill) in self.elements.skills.iter().zip(SKILLS) {
                self.reveals
                    .push(self.engine.register_reveal_animation(row, presets::skill_row())?);
                self.reveals.push(
                    self.engine
                        .register_reveal_animation(bar, presets::skill_bar_fill(skill.level))?,
                );
            }
            self.reveals.push(self.engine.register_batch(
                &self.elements.badges,
                presets::badge_pop(),
                presets::BADGE_STAGGER_MS,
            )?);
        }
        debug!(count = self.reveals.len(), "Registered section reveals");
        Ok(())
    }

    /// Page rows of every element whose reveal waits on visibility
    fn observed_rows(&self) -> Vec<(ElementHandle, u16, u16)> {
        let mut observed = Vec::new();
        for section in &self.layout.sections {
            if let Some(heading) = self.elements.heading(&section.id) {
                observed.push((heading, section.heading_row(), 1));
            }
            let body = section.body_top();
            match section.kind {
                SectionKind::About => {
                    observed.push((self.elements.about, body, ABOUT.len() as u16));
                }
                SectionKind::Projects => {
                    if let Some(&first) = self.elements.projects.first() {
                        observed.push((first, body, PROJECT_ROWS));
                    }
                }
                SectionKind::Skills => {
                    for (i, &(row, bar)) in self.elements.skills.iter().enumerate() {
                        let top = body + i as u16 * SKILL_ROWS;
                        observed.push((row, top, 1));
                        observed.push((bar, top, 1));
                    }
                    if let Some(&first) = self.elements.badges.first() {
                        let top = body + self.elements.skills.len() as u16 * SKILL_ROWS;
                        observed.push((first, top, 1));
                    }
                }
                _ => {}
            }
        }
        observed
    }

    fn apply_layout(&mut self) {
        self.engine.set_sections(self.layout.descriptors());
        self.engine
            .resize(self.layout.viewport_px(), self.layout.max_scroll_px());
        for (element, top, rows) in self.observed_rows() {
            self.engine.observe(element, rows_to_px(top), rows_to_px(rows));
        }
    }

    fn start_marquee(&mut self) -> Result<()> {
        if !self.has_section(SectionKind::Achievements) {
            return Ok(());
        }
        let cycle_width = content::marquee_cycle().width() as f64 * COL_PX;
        self.marquee = Some(self.engine.start_marquee(self.elements.marquee, cycle_width)?);
        Ok(())
    }

    fn bind_contact_button(&mut self) -> Result<()> {
        let Some(bounds) = self.contact_button_bounds() else {
            return Ok(());
        };
        self.magnet = Some(self.engine.bind_magnetic(
            self.elements.contact_button,
            bounds,
            self.config.magnet.strength,
        )?);
        Ok(())
    }

    fn start_hero(&mut self) -> Result<()> {
        self.hero_title = Some(
            self.engine
                .reveal_text(self.elements.hero_title, content::HERO_TITLE)?,
        );
        self.reveals.push(
            self.engine
                .register_reveal_animation(self.elements.hero_subtitle, presets::hero_subtitle())?,
        );
        self.reveals.push(self.engine.register_batch(
            &self.elements.ctas,
            presets::hero_cta(),
            presets::CTA_STAGGER_MS,
        )?);
        self.reveals.push(
            self.engine
                .register_reveal_animation(self.elements.nav, presets::nav_drop())?,
        );
        info!("Hero sequence started");
        Ok(())
    }

    // Frame loop

    /// Advance the engine one frame and react to what happened
    pub fn tick(&mut self) -> Result<()> {
        self.engine.tick();
        self.frames += 1;

        let events = std::mem::take(&mut *self.events.borrow_mut());
        for event in events {
            match event {
                EngineEvent::IntroFinished => {
                    self.intro = None;
                    self.start_hero()?;
                }
                EngineEvent::SectionChanged { section } => {
                    debug!(%section, "Active section changed");
                }
                EngineEvent::TweenCompleted { .. } | EngineEvent::TweenDropped { .. } => {}
            }
        }
        Ok(())
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.layout = PageLayout::compute(&self.config.sections.entries, Self::viewport_rows(height));
        self.apply_layout();
        self.sync_magnet_bounds();
        debug!(width, height, rows = self.layout.total_rows, "Terminal resized");
    }

    pub fn is_intro_playing(&self) -> bool {
        matches!(self.engine.intro_phase(), Some(phase) if phase != IntroPhase::Finished)
    }

    pub fn is_animating(&self) -> bool {
        self.engine.is_animating()
    }

    /// Delay before the next frame: the full frame rate while anything moves,
    /// the idle poll interval otherwise
    pub fn frame_interval(&self) -> Duration {
        if self.is_animating() {
            self.config.scroll.frame_interval()
        } else {
            Duration::from_millis(self.config.ui.tick_rate_ms.max(1))
        }
    }

    // Actions

    pub fn apply(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Quit => self.should_quit = true,
            Action::ScrollRows(rows) => {
                self.engine.on_wheel(rows * ROW_PX);
            }
            Action::ScrollPageDown => {
                self.engine.on_wheel(self.page_px());
            }
            Action::ScrollPageUp => {
                self.engine.on_wheel(-self.page_px());
            }
            Action::JumpToTop => {
                self.engine
                    .scroll_to(ScrollTarget::Offset(0.0), ScrollToOptions::default())?;
            }
            Action::JumpToBottom => {
                self.engine.scroll_to(
                    ScrollTarget::Offset(self.layout.max_scroll_px()),
                    ScrollToOptions::default(),
                )?;
            }
            Action::GoToSection(index) => self.go_to_section(index)?,
            Action::NextSection => {
                let next = self.active_index().map_or(0, |i| i + 1);
                self.go_to_section(next.min(self.layout.sections.len().saturating_sub(1)))?;
            }
            Action::PrevSection => {
                let prev = self.active_index().map_or(0, |i| i.saturating_sub(1));
                self.go_to_section(prev)?;
            }
            Action::ToggleMarquee => self.toggle_marquee(),
            Action::PointerMoved { column, row } => self.pointer_moved(column, row),
            Action::PointerLeft => {
                self.pointer = None;
                self.set_pointer_over_marquee(false);
                self.engine.pointer_left();
            }
            Action::Click { column, row } => {
                if row == 0 {
                    if let Some(item) = self.nav_item_at(column) {
                        self.go_to_section(item.index)?;
                    }
                } else {
                    self.pointer_moved(column, row);
                }
            }
            Action::None => {}
        }
        Ok(())
    }

    fn page_px(&self) -> f64 {
        self.layout.viewport_px() * 0.9
    }

    fn go_to_section(&mut self, index: usize) -> Result<()> {
        let Some(section) = self.layout.sections.get(index) else {
            return Ok(());
        };
        let id = section.id.clone();
        self.engine.navigate_to(&id)?;
        self.status_message = None;
        Ok(())
    }

    fn toggle_marquee(&mut self) {
        let Some(marquee) = &self.marquee else {
            return;
        };
        if marquee.is_paused() {
            self.engine.resume_marquee();
            self.status_message = Some("Marquee resumed".to_string());
        } else {
            self.engine.pause_marquee();
            self.status_message = Some("Marquee paused".to_string());
        }
    }

    /// The button moves on screen as the page scrolls
    fn sync_magnet_bounds(&self) {
        if let (Some(magnet), Some(bounds)) = (&self.magnet, self.contact_button_bounds()) {
            if let Err(e) = magnet.set_bounds(bounds) {
                warn!(error = %e, "Failed to update contact button bounds");
            }
        }
    }

    fn pointer_moved(&mut self, column: u16, row: u16) {
        self.pointer = Some((column, row));
        self.sync_magnet_bounds();

        let over_marquee = self.marquee_screen_rows().is_some_and(|(top, bottom)| {
            let row = i32::from(row);
            row >= top && row < bottom
        });
        self.set_pointer_over_marquee(over_marquee);

        let over_link = (row == 0 && self.nav_item_at(column).is_some())
            || self.cta_hit(column, row);
        self.engine.set_hovering(over_link);
        self.engine.pointer_moved(Point::new(
            (f64::from(column) + 0.5) * COL_PX,
            (f64::from(row) + 0.5) * ROW_PX,
        ));
    }

    fn set_pointer_over_marquee(&mut self, over: bool) {
        if over == self.pointer_over_marquee {
            return;
        }
        self.pointer_over_marquee = over;
        if let Some(marquee) = &self.marquee {
            if over {
                marquee.pointer_enter();
            } else {
                marquee.pointer_leave();
            }
        }
    }

    // Geometry

    /// First page row at the top of the viewport
    pub fn scroll_row(&self) -> u16 {
        (self.engine.current_offset() / ROW_PX).round().max(0.0) as u16
    }

    /// Screen row of a page row; may be off screen
    pub fn screen_row(&self, page_row: u16) -> i32 {
        i32::from(PAGE_TOP) + i32::from(page_row) - i32::from(self.scroll_row())
    }

    pub fn nav_items(&self) -> Vec<NavItem> {
        let mut col = BRAND.width() as u16 + NAV_GAP;
        self.layout
            .sections
            .iter()
            .enumerate()
            .map(|(index, section)| {
                let text = format!("{} {}", index + 1, section.label);
                let width = text.width() as u16;
                let item = NavItem {
                    index,
                    id: section.id.clone(),
                    text,
                    start: col,
                    width,
                };
                col = col.saturating_add(width + NAV_GAP);
                item
            })
            .collect()
    }

    fn nav_item_at(&self, column: u16) -> Option<NavItem> {
        self.nav_items()
            .into_iter()
            .find(|item| column >= item.start && column < item.start + item.width)
    }

    fn cta_hit(&self, column: u16, row: u16) -> bool {
        let Some(hero) = self.layout.hero_rows() else {
            return false;
        };
        if i32::from(row) != self.screen_row(hero.cta) {
            return false;
        }
        self.cta_columns()
            .iter()
            .any(|&(start, width)| column >= start && column < start + width)
    }

    /// Start column and width of each call-to-action button
    pub fn cta_columns(&self) -> Vec<(u16, u16)> {
        let labels: Vec<String> = CTA_LABELS.iter().map(|l| format!("[ {} ]", l)).collect();
        let total: u16 = labels.iter().map(|l| l.width() as u16).sum::<u16>()
            + 4 * (labels.len() as u16).saturating_sub(1);
        let mut col = self.width.saturating_sub(total) / 2;
        labels
            .iter()
            .map(|l| {
                let start = col;
                col += l.width() as u16 + 4;
                (start, l.width() as u16)
            })
            .collect()
    }

    /// Screen rows `[top, bottom)` covered by the marquee strip
    pub fn marquee_screen_rows(&self) -> Option<(i32, i32)> {
        let section = self.layout.section(SectionKind::Achievements)?;
        let top = self.screen_row(section.body_top());
        Some((top, top + i32::from(MARQUEE_ROWS)))
    }

    /// Page row and start column of the contact button
    pub fn contact_button_cell(&self) -> Option<(u16, u16)> {
        let section = self.layout.section(SectionKind::Contact)?;
        let row = section.body_top() + CONTACT.len() as u16 + 1;
        let col = self.width.saturating_sub(CONTACT_BUTTON.width() as u16) / 2;
        Some((row, col))
    }

    /// Contact button in screen units, as the magnetic follower sees it
    fn contact_button_bounds(&self) -> Option<Rect> {
        let (row, col) = self.contact_button_cell()?;
        Some(Rect::new(
            f64::from(col) * COL_PX,
            f64::from(self.screen_row(row)) * ROW_PX,
            CONTACT_BUTTON.width() as f64 * COL_PX,
            rows_to_px(BUTTON_ROWS),
        ))
    }

    // State for rendering

    /// Animated property of `element`, neutral when never animated
    pub fn value(&self, element: ElementHandle, property: Property) -> f64 {
        self.engine
            .store()
            .borrow()
            .get(element, property)
            .unwrap_or_else(|| property.neutral())
    }

    pub fn hero_glyphs(&self) -> &[(char, ElementHandle)] {
        match &self.hero_title {
            Some(handle) => handle.glyphs(),
            None => &[],
        }
    }

    pub fn marquee_offset(&self) -> f64 {
        self.marquee.as_ref().map_or(0.0, |m| m.offset())
    }

    pub fn marquee(&self) -> Option<&MarqueeHandle> {
        self.marquee.as_ref()
    }

    pub fn magnet(&self) -> Option<&MagnetHandle> {
        self.magnet.as_ref()
    }

    pub fn active_section(&self) -> Option<String> {
        self.engine.current_active_section()
    }

    fn active_index(&self) -> Option<usize> {
        let active = self.active_section()?;
        self.layout.sections.iter().position(|s| s.id == active)
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::ManualClock;

    fn app(show_intro: bool) -> (App, ManualClock) {
        let clock = ManualClock::new();
        let mut config = AppConfig::default();
        config.ui.show_intro = show_intro;
        let app = App::new(config, clock.clone(), 100, 32).unwrap();
        (app, clock)
    }

    fn run(app: &mut App, clock: &ManualClock, ms: f64) {
        let mut elapsed = 0.0;
        while elapsed < ms {
            clock.advance(16.0);
            app.tick().unwrap();
            elapsed += 16.0;
        }
    }

    #[test]
    fn test_hero_reveals_without_intro() {
        let (mut app, clock) = app(false);
        assert_eq!(app.hero_glyphs().len(), content::HERO_TITLE.chars().count());
        assert_eq!(app.active_section().as_deref(), Some("hero"));

        run(&mut app, &clock, 4000.0);
        for &(_, glyph) in app.hero_glyphs() {
            assert_eq!(app.value(glyph, Property::Opacity), 1.0);
        }
        assert_eq!(app.value(app.elements.nav, Property::Opacity), 1.0);
    }

    #[test]
    fn test_frame_interval_idles_when_settled() {
        let (mut app, clock) = app(false);
        app.apply(Action::ToggleMarquee).unwrap();
        run(&mut app, &clock, 6000.0);
        assert!(!app.is_animating());
        assert_eq!(app.frame_interval(), Duration::from_millis(100));

        app.apply(Action::ScrollRows(3.0)).unwrap();
        assert!(app.is_animating());
        assert_eq!(app.frame_interval(), Duration::from_secs_f64(1.0 / 60.0));
    }

    #[test]
    fn test_intro_hands_over_to_hero() {
        let (mut app, clock) = app(true);
        assert!(app.is_intro_playing());
        assert!(app.hero_glyphs().is_empty());
        assert!(!app.engine.on_wheel(100.0));

        run(&mut app, &clock, 6000.0);
        assert!(!app.is_intro_playing());
        assert!(app.intro.is_none());
        assert!(!app.hero_glyphs().is_empty());
        assert!(app.engine.on_wheel(100.0));
    }

    #[test]
    fn test_go_to_section_converges() {
        let (mut app, clock) = app(false);
        app.apply(Action::GoToSection(3)).unwrap();
        run(&mut app, &clock, 2000.0);

        let projects = app.layout.section(SectionKind::Projects).unwrap().clone();
        let expected = rows_to_px(projects.top).min(app.layout.max_scroll_px());
        assert_eq!(app.engine.current_offset(), expected);
        assert_eq!(app.active_section().as_deref(), Some("projects"));

        app.apply(Action::PrevSection).unwrap();
        run(&mut app, &clock, 2000.0);
        assert_eq!(app.active_section().as_deref(), Some("achievements"));
    }

    #[test]
    fn test_scrolled_sections_reveal() {
        let (mut app, clock) = app(false);
        let first_project = app.elements.projects[0];
        assert_eq!(app.value(first_project, Property::Opacity), 0.0);

        app.apply(Action::GoToSection(3)).unwrap();
        run(&mut app, &clock, 5000.0);
        assert_eq!(app.value(first_project, Property::Opacity), 1.0);
        let last = *app.elements.projects.last().unwrap();
        assert_eq!(app.value(last, Property::Opacity), 1.0);
    }

    #[test]
    fn test_resize_relayouts() {
        let (mut app, _clock) = app(false);
        let before = app.layout.max_scroll_px();
        app.resize(100, 52);
        assert_eq!(app.layout.viewport_rows, 50);
        assert_eq!(app.engine.max_scroll(), app.layout.max_scroll_px());
        assert_ne!(app.layout.max_scroll_px(), before);
        assert_eq!(app.engine.sections().len(), app.layout.sections.len());
    }

    #[test]
    fn test_marquee_toggle_and_hover() {
        let (mut app, clock) = app(false);
        run(&mut app, &clock, 160.0);
        assert!(app.marquee_offset() < 0.0);

        app.apply(Action::ToggleMarquee).unwrap();
        assert!(app.marquee().unwrap().is_paused());
        let x = app.marquee_offset();
        run(&mut app, &clock, 160.0);
        assert_eq!(app.marquee_offset(), x);
        app.apply(Action::ToggleMarquee).unwrap();
        assert!(!app.marquee().unwrap().is_paused());
    }

    #[test]
    fn test_contact_button_is_magnetic() {
        let (mut app, clock) = app(false);
        app.apply(Action::JumpToBottom).unwrap();
        run(&mut app, &clock, 2000.0);

        let (row, col) = app.contact_button_cell().unwrap();
        let screen_row = app.screen_row(row + 1) as u16;
        app.apply(Action::PointerMoved {
            column: col + 1,
            row: screen_row,
        })
        .unwrap();
        assert!(app.magnet().unwrap().is_hovering());

        app.apply(Action::PointerLeft).unwrap();
        assert!(!app.magnet().unwrap().is_hovering());
    }

    #[test]
    fn test_nav_click_navigates() {
        let (mut app, clock) = app(false);
        let items = app.nav_items();
        assert_eq!(items.len(), 6);
        assert_eq!(items[1].text, "2 About");
        app.apply(Action::Click {
            column: items[1].start,
            row: 0,
        })
        .unwrap();
        run(&mut app, &clock, 2000.0);
        assert_eq!(app.active_section().as_deref(), Some("about"));
    }
}
