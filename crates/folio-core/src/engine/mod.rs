//! Motion engine: one frame scheduler driving scroll virtualization, section
//! tracking, tween playback, marquees, magnetic elements and the cursor.
//!
//! - `handles` - capability handles for marquees, magnets and reveals
//! - `intro` - the loading sequence that gates scrolling

pub mod handles;
pub mod intro;

pub use handles::{MagnetHandle, MarqueeHandle, RevealHandle};
pub use intro::{IntroElements, IntroPhase, IntroSequence};

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::cursor::CursorFollower;
use crate::frame::{FrameScheduler, FrameTime, ListenerId, Listeners, Subscription, TimeSource};
use crate::geometry::{Point, Rect};
use crate::magnet::MagneticFollower;
use crate::marquee::{Marquee, MarqueePhase};
use crate::scroll::{
    InputSource, RecordingViewport, ScrollFrame, ScrollState, ScrollTarget, ScrollToOptions,
    ScrollVirtualizer, Viewport,
};
use crate::sections::{SectionDescriptor, SectionTracker};
use crate::stage::{ElementHandle, ElementStore, SharedStore};
use crate::timeline::{
    reveal_text, TaskId, TextRevealParams, Timeline, TweenSpec, ViewportIntersection,
};
use crate::{Error, Result};

/// Notifications delivered through [`MotionEngine::on_event`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngineEvent {
    SectionChanged { section: String },
    TweenCompleted { task: TaskId },
    TweenDropped { task: TaskId },
    IntroFinished,
}

struct ScrollRuntime {
    virtualizer: ScrollVirtualizer,
    tracker: SectionTracker,
    viewport: Box<dyn Viewport>,
}

/// Element whose page geometry is checked against the viewport every frame
#[derive(Debug, Clone, Copy)]
struct Observed {
    element: ElementHandle,
    top: f64,
    height: f64,
}

/// State reachable from the per-frame callback
struct Shared {
    store: SharedStore,
    scroll: RefCell<ScrollRuntime>,
    timeline: Rc<RefCell<Timeline>>,
    intro: RefCell<Option<IntroSequence>>,
    cursor: RefCell<Option<CursorFollower>>,
    observed: RefCell<Vec<Observed>>,
    viewport_height: Cell<f64>,
    section_listeners: Listeners<String>,
    scroll_listeners: Listeners<ScrollFrame>,
    event_listeners: Listeners<EngineEvent>,
}

impl Shared {
    fn on_frame(&self, frame: &FrameTime) -> Result<()> {
        self.step_scroll(frame);
        let timeline = self.step_timeline(frame);
        self.step_cursor(frame);
        timeline
    }

    fn step_scroll(&self, frame: &FrameTime) {
        let (scroll_frame, changed) = {
            let mut scroll = self.scroll.borrow_mut();
            let ScrollRuntime {
                virtualizer,
                tracker,
                viewport,
            } = &mut *scroll;

            let scroll_frame = virtualizer.advance(frame);
            if !scroll_frame.moved {
                return;
            }
            viewport.apply_scroll(scroll_frame.offset);
            (scroll_frame, tracker.on_scroll(scroll_frame.offset, frame.epoch))
        };

        self.scroll_listeners.emit(&scroll_frame);
        if let Some(section) = changed {
            self.notify_section(section);
        }
    }

    fn step_timeline(&self, frame: &FrameTime) -> Result<()> {
        let offset = self.scroll.borrow().virtualizer.current_offset();
        let viewport_height = self.viewport_height.get();
        let mut events = Vec::new();
        let mut intro_error = None;

        let intro_finished = {
            let mut timeline = self.timeline.borrow_mut();
            let mut store = self.store.borrow_mut();

            for o in self.observed.borrow().iter() {
                if timeline.pending_for(o.element) > 0 {
                    let intersection =
                        ViewportIntersection::from_scroll(o.top, o.height, offset, viewport_height);
                    timeline.report_visibility(o.element, &intersection, frame.now_ms);
                }
            }

            let report = timeline.advance(frame, &mut store);
            events.extend(
                report
                    .completed
                    .iter()
                    .map(|&task| EngineEvent::TweenCompleted { task }),
            );
            events.extend(
                report
                    .dropped
                    .iter()
                    .map(|&task| EngineEvent::TweenDropped { task }),
            );

            let mut intro = self.intro.borrow_mut();
            match intro.as_mut() {
                Some(seq) if !seq.is_finished() => {
                    let done = match seq.on_completed(
                        &report.completed,
                        &mut timeline,
                        &mut store,
                        frame.now_ms,
                    ) {
                        Ok(done) => done,
                        Err(e) => {
                            warn!(error = %e, "Intro sequence failed, skipping to the page");
                            seq.abort();
                            intro_error = Some(e);
                            true
                        }
                    };
                    if done {
                        let elements = seq.elements();
                        for el in [elements.caption, elements.ring, elements.loader] {
                            timeline.cancel_target(el);
                            store.unmount(el);
                        }
                    }
                    done
                }
                _ => false,
            }
        };

        if intro_finished {
            self.scroll.borrow_mut().virtualizer.unlock();
            info!("Intro finished, scrolling unlocked");
            events.push(EngineEvent::IntroFinished);
        }
        for event in &events {
            self.event_listeners.emit(event);
        }
        match intro_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn step_cursor(&self, frame: &FrameTime) {
        let mut cursor = self.cursor.borrow_mut();
        if let Some(cursor) = cursor.as_mut() {
            if !cursor.is_settled() {
                cursor.advance(frame.delta_ms);
                cursor.apply(&mut self.store.borrow_mut());
            }
        }
    }

    fn notify_section(&self, section: String) {
        self.section_listeners.emit(&section);
        self.event_listeners
            .emit(&EngineEvent::SectionChanged { section });
    }
}

/// The exposed control surface of the page motion system
pub struct MotionEngine {
    config: AppConfig,
    scheduler: FrameScheduler,
    shared: Rc<Shared>,
    marquees: RefCell<Vec<Weak<RefCell<Marquee>>>>,
    magnets: RefCell<Vec<Weak<RefCell<MagneticFollower>>>>,
    hovering: Cell<bool>,
    _frame: Subscription,
}

impl MotionEngine {
    pub fn new(config: AppConfig, clock: impl TimeSource + 'static) -> Self {
        Self::with_viewport(config, clock, Box::new(RecordingViewport::default()))
    }

    /// Create an engine that applies scroll offsets to `viewport`
    pub fn with_viewport(
        config: AppConfig,
        clock: impl TimeSource + 'static,
        viewport: Box<dyn Viewport>,
    ) -> Self {
        let scheduler = FrameScheduler::new(clock);
        let store = ElementStore::shared();

        let cursor = if config.cursor.enabled {
            let mut s = store.borrow_mut();
            let ring = s.mount("cursor-ring");
            let dot = s.mount("cursor-dot");
            Some(CursorFollower::new(ring, dot, &config.cursor))
        } else {
            None
        };

        let shared = Rc::new(Shared {
            store,
            scroll: RefCell::new(ScrollRuntime {
                virtualizer: ScrollVirtualizer::new(config.scroll.clone()),
                tracker: SectionTracker::new(config.sections.activation_bias),
                viewport,
            }),
            timeline: Rc::new(RefCell::new(Timeline::new())),
            intro: RefCell::new(None),
            cursor: RefCell::new(cursor),
            observed: RefCell::new(Vec::new()),
            viewport_height: Cell::new(0.0),
            section_listeners: Listeners::new(),
            scroll_listeners: Listeners::new(),
            event_listeners: Listeners::new(),
        });

        let frame = {
            let shared = shared.clone();
            scheduler.subscribe(move |frame| shared.on_frame(frame))
        };
        scheduler.start();
        info!(
            bias = config.sections.activation_bias,
            smooth = config.scroll.smooth_enabled,
            "Motion engine created"
        );

        Self {
            config,
            scheduler,
            shared,
            marquees: RefCell::new(Vec::new()),
            magnets: RefCell::new(Vec::new()),
            hovering: Cell::new(false),
            _frame: frame,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    pub fn store(&self) -> SharedStore {
        self.shared.store.clone()
    }

    pub fn now_ms(&self) -> f64 {
        self.scheduler.now_ms()
    }

    /// Run one frame
    pub fn tick(&self) -> Option<FrameTime> {
        self.scheduler.tick()
    }

    // Scrolling

    /// Smooth-scroll to the start of a section
    pub fn navigate_to(&self, section_id: &str) -> Result<f64> {
        self.scroll_to(
            ScrollTarget::Section(section_id.to_string()),
            ScrollToOptions::default(),
        )
    }

    pub fn scroll_to(&self, target: ScrollTarget, options: ScrollToOptions) -> Result<f64> {
        let now_ms = self.now_ms();
        let mut scroll = self.shared.scroll.borrow_mut();
        let ScrollRuntime {
            virtualizer,
            tracker,
            ..
        } = &mut *scroll;
        let goal = virtualizer.request_scroll_to(&target, &*tracker, &options, now_ms)?;
        debug!(?target, goal, "Scroll requested");
        Ok(goal)
    }

    pub fn on_wheel(&self, delta: f64) -> bool {
        self.on_input(delta, InputSource::Wheel)
    }

    pub fn on_touch(&self, delta: f64) -> bool {
        self.on_input(delta, InputSource::Touch)
    }

    fn on_input(&self, delta: f64, source: InputSource) -> bool {
        let now_ms = self.now_ms();
        self.shared
            .scroll
            .borrow_mut()
            .virtualizer
            .on_input(delta, source, now_ms)
    }

    pub fn scroll_state(&self) -> ScrollState {
        *self.shared.scroll.borrow().virtualizer.state()
    }

    pub fn current_offset(&self) -> f64 {
        self.shared.scroll.borrow().virtualizer.current_offset()
    }

    pub fn max_scroll(&self) -> f64 {
        self.shared.scroll.borrow().virtualizer.max_scroll()
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.shared.scroll.borrow().virtualizer.is_locked()
    }

    pub fn lock_scroll(&self) {
        self.shared.scroll.borrow_mut().virtualizer.lock();
    }

    pub fn unlock_scroll(&self) {
        self.shared.scroll.borrow_mut().virtualizer.unlock();
    }

    // Sections

    pub fn current_active_section(&self) -> Option<String> {
        self.shared
            .scroll
            .borrow()
            .tracker
            .current_section()
            .map(str::to_string)
    }

    pub fn sections(&self) -> Vec<SectionDescriptor> {
        self.shared.scroll.borrow().tracker.sections().to_vec()
    }

    /// Replace the section layout and re-evaluate the active section
    pub fn set_sections(&self, sections: Vec<SectionDescriptor>) {
        let changed = {
            let mut scroll = self.shared.scroll.borrow_mut();
            let offset = scroll.virtualizer.current_offset();
            scroll.tracker.set_sections(sections);
            scroll.tracker.refresh(offset)
        };
        if let Some(section) = changed {
            self.shared.notify_section(section);
        }
    }

    /// Viewport or content size changed
    pub fn resize(&self, viewport_height: f64, max_scroll: f64) {
        self.shared.viewport_height.set(viewport_height);
        let changed = {
            let mut scroll = self.shared.scroll.borrow_mut();
            scroll.virtualizer.set_max_scroll(max_scroll);
            let offset = scroll.virtualizer.current_offset();
            scroll.tracker.refresh(offset)
        };
        debug!(viewport_height, max_scroll, "Engine resized");
        if let Some(section) = changed {
            self.shared.notify_section(section);
        }
    }

    pub fn viewport_height(&self) -> f64 {
        self.shared.viewport_height.get()
    }

    // Listeners

    pub fn on_active_section_changed(&self, callback: impl FnMut(&String) + 'static) -> ListenerId {
        self.shared.section_listeners.add(callback)
    }

    pub fn on_scroll_changed(&self, callback: impl FnMut(&ScrollFrame) + 'static) -> ListenerId {
        self.shared.scroll_listeners.add(callback)
    }

    pub fn on_event(&self, callback: impl FnMut(&EngineEvent) + 'static) -> ListenerId {
        self.shared.event_listeners.add(callback)
    }

    pub fn remove_section_listener(&self, id: ListenerId) -> bool {
        self.shared.section_listeners.remove(id)
    }

    pub fn remove_scroll_listener(&self, id: ListenerId) -> bool {
        self.shared.scroll_listeners.remove(id)
    }

    pub fn remove_event_listener(&self, id: ListenerId) -> bool {
        self.shared.event_listeners.remove(id)
    }

    // Tweens

    pub fn register_reveal_animation(
        &self,
        target: ElementHandle,
        spec: TweenSpec,
    ) -> Result<RevealHandle> {
        let now_ms = self.now_ms();
        let task = self.shared.timeline.borrow_mut().schedule(
            spec,
            target,
            &mut self.shared.store.borrow_mut(),
            now_ms,
        )?;
        Ok(self.reveal_handle(vec![task], None, Vec::new()))
    }

    pub fn register_batch(
        &self,
        targets: &[ElementHandle],
        spec: TweenSpec,
        stagger_ms: f64,
    ) -> Result<RevealHandle> {
        let now_ms = self.now_ms();
        let mut timeline = self.shared.timeline.borrow_mut();
        let batch = timeline.schedule_batch(
            spec,
            targets,
            stagger_ms,
            &mut self.shared.store.borrow_mut(),
            now_ms,
        )?;
        let tasks = timeline.batch_tasks(batch);
        drop(timeline);
        Ok(self.reveal_handle(tasks, Some(batch), Vec::new()))
    }

    /// Split `text` into characters under `parent` and reveal them
    pub fn reveal_text(&self, parent: ElementHandle, text: &str) -> Result<RevealHandle> {
        let now_ms = self.now_ms();
        let params = TextRevealParams::from_config(&self.config.reveal);
        let mut timeline = self.shared.timeline.borrow_mut();
        let reveal = reveal_text(
            &mut timeline,
            &mut self.shared.store.borrow_mut(),
            parent,
            text,
            &params,
            now_ms,
        )?;
        let tasks = timeline.batch_tasks(reveal.batch);
        drop(timeline);
        Ok(self.reveal_handle(tasks, Some(reveal.batch), reveal.glyphs))
    }

    fn reveal_handle(
        &self,
        tasks: Vec<TaskId>,
        batch: Option<crate::timeline::BatchId>,
        glyphs: Vec<(char, ElementHandle)>,
    ) -> RevealHandle {
        RevealHandle {
            timeline: Rc::downgrade(&self.shared.timeline),
            store: Rc::downgrade(&self.shared.store),
            tasks,
            batch,
            glyphs,
        }
    }

    /// Feed a visibility measurement for `element`
    pub fn report_visibility(&self, element: ElementHandle, intersection: ViewportIntersection) -> usize {
        let now_ms = self.now_ms();
        self.shared
            .timeline
            .borrow_mut()
            .report_visibility(element, &intersection, now_ms)
    }

    /// Check `element` (at page offset `top`) against the viewport every
    /// frame, arming tasks it triggers once it scrolls into view
    pub fn observe(&self, element: ElementHandle, top: f64, height: f64) {
        let mut observed = self.shared.observed.borrow_mut();
        match observed.iter_mut().find(|o| o.element == element) {
            Some(o) => {
                o.top = top;
                o.height = height;
            }
            None => observed.push(Observed {
                element,
                top,
                height,
            }),
        }
    }

    pub fn unobserve(&self, element: ElementHandle) {
        self.shared
            .observed
            .borrow_mut()
            .retain(|o| o.element != element);
    }

    pub fn timeline(&self) -> Rc<RefCell<Timeline>> {
        self.shared.timeline.clone()
    }

    // Marquees

    /// Start looping `strip` with one content cycle of `cycle_width`
    pub fn start_marquee(&self, strip: ElementHandle, cycle_width: f64) -> Result<MarqueeHandle> {
        if !self.shared.store.borrow().is_mounted(strip) {
            return Err(Error::TargetNotFound(strip));
        }
        let mut marquee = Marquee::new(strip, self.config.marquee.pause_on_hover);
        marquee.start(cycle_width, self.config.marquee.speed(cycle_width))?;
        let marquee = Rc::new(RefCell::new(marquee));

        let subscription = {
            let marquee = marquee.clone();
            let store = self.shared.store.clone();
            self.scheduler.subscribe(move |frame| {
                let mut marquee = marquee.borrow_mut();
                if marquee.phase() == MarqueePhase::Running {
                    marquee.advance(frame.delta_ms);
                    marquee.apply(&mut store.borrow_mut());
                }
                Ok(())
            })
        };

        let mut marquees = self.marquees.borrow_mut();
        marquees.retain(|m| m.strong_count() > 0);
        marquees.push(Rc::downgrade(&marquee));
        Ok(MarqueeHandle {
            marquee,
            subscription,
        })
    }

    pub fn pause_marquee(&self) {
        self.for_each_marquee(|m| m.pause());
    }

    pub fn resume_marquee(&self) {
        self.for_each_marquee(|m| m.resume());
    }

    fn for_each_marquee(&self, mut f: impl FnMut(&mut Marquee)) {
        self.marquees.borrow_mut().retain(|weak| match weak.upgrade() {
            Some(marquee) => {
                f(&mut marquee.borrow_mut());
                true
            }
            None => false,
        });
    }

    // Pointer

    pub fn bind_magnetic(
        &self,
        target: ElementHandle,
        bounds: Rect,
        strength: f64,
    ) -> Result<MagnetHandle> {
        if !self.shared.store.borrow().is_mounted(target) {
            return Err(Error::TargetNotFound(target));
        }
        let follower = MagneticFollower::new(target, bounds, strength, self.config.magnet.clone())?;
        let follower = Rc::new(RefCell::new(follower));

        let subscription = {
            let follower = follower.clone();
            let store = self.shared.store.clone();
            self.scheduler.subscribe(move |frame| {
                let mut follower = follower.borrow_mut();
                if !follower.is_settled() {
                    follower.advance(frame.delta_ms);
                    follower.apply(&mut store.borrow_mut());
                }
                Ok(())
            })
        };

        let mut magnets = self.magnets.borrow_mut();
        magnets.retain(|m| m.strong_count() > 0);
        magnets.push(Rc::downgrade(&follower));
        Ok(MagnetHandle {
            follower,
            subscription,
        })
    }

    /// Feed the pointer position. Returns whether it is over a magnetic element.
    pub fn pointer_moved(&self, pos: Point) -> bool {
        let mut over_magnet = false;
        self.magnets.borrow_mut().retain(|weak| match weak.upgrade() {
            Some(follower) => {
                over_magnet |= follower.borrow_mut().pointer_move(pos);
                true
            }
            None => false,
        });

        if let Some(cursor) = self.shared.cursor.borrow_mut().as_mut() {
            cursor.pointer_moved(pos);
            cursor.set_hovering(self.hovering.get() || over_magnet);
        }
        over_magnet
    }

    /// Pointer left the page
    pub fn pointer_left(&self) {
        self.magnets.borrow_mut().retain(|weak| match weak.upgrade() {
            Some(follower) => {
                follower.borrow_mut().pointer_leave();
                true
            }
            None => false,
        });
        self.set_hovering(false);
    }

    /// Pointer entered or left an interactive element
    pub fn set_hovering(&self, hovering: bool) {
        self.hovering.set(hovering);
        if let Some(cursor) = self.shared.cursor.borrow_mut().as_mut() {
            cursor.set_hovering(hovering);
        }
    }

    pub fn cursor_elements(&self) -> Option<(ElementHandle, ElementHandle)> {
        self.shared
            .cursor
            .borrow()
            .as_ref()
            .map(|c| (c.ring_element(), c.dot_element()))
    }

    // Intro

    /// Lock scrolling and play the loading sequence. Scrolling unlocks and
    /// [`EngineEvent::IntroFinished`] fires when it ends.
    pub fn play_intro(&self) -> Result<IntroElements> {
        if matches!(&*self.shared.intro.borrow(), Some(seq) if !seq.is_finished()) {
            return Err(Error::Other("intro is already playing".to_string()));
        }
        let now_ms = self.now_ms();
        let sequence = {
            let mut store = self.shared.store.borrow_mut();
            let elements = IntroElements::mount(&mut store);
            IntroSequence::start(
                elements,
                &mut self.shared.timeline.borrow_mut(),
                &mut store,
                now_ms,
            )?
        };
        let elements = sequence.elements();
        *self.shared.intro.borrow_mut() = Some(sequence);
        self.lock_scroll();
        info!("Intro started, scrolling locked");
        Ok(elements)
    }

    pub fn intro_phase(&self) -> Option<IntroPhase> {
        self.shared.intro.borrow().as_ref().map(|s| s.phase())
    }

    /// Whether anything will change on the next frame without new input
    pub fn is_animating(&self) -> bool {
        if self.shared.scroll.borrow().virtualizer.is_animating()
            || self.shared.timeline.borrow().active_count() > 0
        {
            return true;
        }
        if let Some(cursor) = self.shared.cursor.borrow().as_ref() {
            if !cursor.is_settled() {
                return true;
            }
        }
        let marquee_running = self.marquees.borrow().iter().any(|weak| {
            weak.upgrade()
                .is_some_and(|m| m.borrow().phase() == MarqueePhase::Running)
        });
        let magnet_moving = self
            .magnets
            .borrow()
            .iter()
            .any(|weak| weak.upgrade().is_some_and(|m| !m.borrow().is_settled()));
        marquee_running || magnet_moving
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::ManualClock;
    use crate::stage::Property;
    use crate::timeline::{TaskState, ViewportAnchor};

    fn engine() -> (MotionEngine, ManualClock) {
        let clock = ManualClock::new();
        let engine = MotionEngine::new(AppConfig::default(), clock.clone());
        engine.set_sections(vec![
            SectionDescriptor::new("A", 0.0, 500.0),
            SectionDescriptor::new("B", 500.0, 1200.0),
            SectionDescriptor::new("C", 1200.0, 2000.0),
        ]);
        engine.resize(800.0, 1900.0);
        engine.tick();
        (engine, clock)
    }

    fn run_frames(engine: &MotionEngine, clock: &ManualClock, frames: usize) {
        for _ in 0..frames {
            clock.advance(16.0);
            engine.tick();
        }
    }

    fn jump(engine: &MotionEngine, clock: &ManualClock, offset: f64) {
        engine
            .scroll_to(
                ScrollTarget::Offset(offset),
                ScrollToOptions {
                    immediate: true,
                    ..Default::default()
                },
            )
            .unwrap();
        run_frames(engine, clock, 1);
    }

    #[test]
    fn test_section_scenario() {
        let (engine, clock) = engine();
        assert_eq!(engine.current_active_section().as_deref(), Some("A"));

        jump(&engine, &clock, 1060.0);
        assert_eq!(engine.current_active_section().as_deref(), Some("C"));

        jump(&engine, &clock, 1900.0);
        assert_eq!(engine.current_active_section().as_deref(), Some("C"));

        jump(&engine, &clock, 300.0);
        assert_eq!(engine.current_active_section().as_deref(), Some("A"));
    }

    #[test]
    fn test_navigate_converges_and_notifies() {
        let (engine, clock) = engine();
        let sections = Rc::new(RefCell::new(Vec::new()));
        let s = sections.clone();
        engine.on_active_section_changed(move |id| s.borrow_mut().push(id.clone()));

        let goal = engine.navigate_to("C").unwrap();
        assert_eq!(goal, 1200.0);

        let mut offsets = Vec::new();
        let mut frames = 0;
        while engine.is_animating() && frames < 500 {
            run_frames(&engine, &clock, 1);
            offsets.push(engine.current_offset());
            frames += 1;
        }
        assert_eq!(engine.current_offset(), 1200.0);
        assert!(offsets.iter().all(|o| (0.0..=1200.0).contains(o)));
        assert!(offsets.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*sections.borrow(), vec!["B", "C"]);

        assert!(matches!(
            engine.navigate_to("blog"),
            Err(Error::SectionNotFound(_))
        ));
    }

    #[test]
    fn test_wheel_moves_viewport() {
        let (engine, clock) = engine();
        let moved = Rc::new(Cell::new(0));
        let m = moved.clone();
        engine.on_scroll_changed(move |_| m.set(m.get() + 1));

        assert!(engine.on_wheel(300.0));
        run_frames(&engine, &clock, 200);
        assert_eq!(engine.current_offset(), 300.0);
        assert!(moved.get() > 1);
        assert!(engine.scroll_state().last_input_ms.is_some());
    }

    #[test]
    fn test_observed_element_arms_on_scroll() {
        let (engine, clock) = engine();
        let store = engine.store();
        let card = store.borrow_mut().mount("card");
        let spec = TweenSpec::new(100.0)
            .from_to(Property::Opacity, 0.0, 1.0)
            .on_visible(ViewportAnchor::top(0.8));
        let handle = engine.register_reveal_animation(card, spec).unwrap();
        engine.observe(card, 1000.0, 200.0);

        run_frames(&engine, &clock, 10);
        assert_eq!(
            engine.timeline().borrow().state(handle.tasks()[0]),
            Some(TaskState::Pending)
        );

        // Top edge at 1000 - 400 = 600 <= 0.8 * 800
        jump(&engine, &clock, 400.0);
        run_frames(&engine, &clock, 10);
        assert!(handle.is_done());
        assert_eq!(store.borrow().get(card, Property::Opacity), Some(1.0));
    }

    #[test]
    fn test_unmount_during_flight() {
        let (engine, clock) = engine();
        let store = engine.store();
        let card = store.borrow_mut().mount("card");
        let events = Rc::new(RefCell::new(Vec::new()));
        let e = events.clone();
        engine.on_event(move |event| e.borrow_mut().push(event.clone()));

        let spec = TweenSpec::new(1000.0)
            .from_to(Property::Opacity, 0.0, 1.0)
            .easing(crate::scroll::EasingType::Linear);
        let handle = engine.register_reveal_animation(card, spec).unwrap();
        let task = handle.tasks()[0];
        let strip = store.borrow_mut().mount("strip");
        let marquee = engine.start_marquee(strip, 1000.0).unwrap();
        assert_eq!(engine.scheduler().subscriber_count(), 2);

        clock.advance(500.0);
        engine.tick();
        let opacity = store.borrow().get(card, Property::Opacity).unwrap();
        assert!((opacity - 0.5).abs() < 1e-9);

        store.borrow_mut().unmount(card);
        run_frames(&engine, &clock, 1);
        assert!(events
            .borrow()
            .contains(&EngineEvent::TweenDropped { task }));
        handle.dispose();

        marquee.dispose();
        assert_eq!(engine.scheduler().subscriber_count(), 1);

        let scheduler = engine.scheduler().clone();
        drop(engine);
        assert_eq!(scheduler.subscriber_count(), 0);
    }

    #[test]
    fn test_panicking_scroll_listener_is_isolated() {
        let (engine, clock) = engine();
        let panicked = Rc::new(Cell::new(false));
        let p = panicked.clone();
        engine.on_scroll_changed(move |_| {
            if !p.get() {
                p.set(true);
                panic!("listener bug");
            }
        });
        let calls = Rc::new(Cell::new(0));
        let c = calls.clone();
        engine.on_scroll_changed(move |_| c.set(c.get() + 1));

        engine.on_wheel(1000.0);
        run_frames(&engine, &clock, 30);
        assert!(panicked.get());
        assert_eq!(calls.get(), 30);
    }

    #[test]
    fn test_cursor_advances_when_intro_fails() {
        let (engine, clock) = engine();
        let store = engine.store();
        let intro = engine.play_intro().unwrap();
        // The loader fade can no longer be scheduled once the ring finishes
        store.borrow_mut().unmount(intro.loader);

        clock.advance(4000.0);
        engine.tick();
        assert!(matches!(engine.intro_phase(), Some(IntroPhase::Spinning { .. })));

        let (ring, _) = engine.cursor_elements().unwrap();
        let before = store.borrow().get(ring, Property::TranslateX).unwrap_or(0.0);
        engine.pointer_moved(Point::new(400.0, 300.0));

        clock.advance(600.0);
        engine.tick();
        let after = store.borrow().get(ring, Property::TranslateX).unwrap_or(0.0);
        assert!(after > before + 100.0);
        assert_eq!(engine.intro_phase(), Some(IntroPhase::Finished));
        assert!(!engine.is_scroll_locked());
    }

    #[test]
    fn test_marquee_pause_all() {
        let (engine, clock) = engine();
        let strip = engine.store().borrow_mut().mount("strip");
        let marquee = engine.start_marquee(strip, 3000.0).unwrap();
        run_frames(&engine, &clock, 10);
        let x = marquee.offset();
        assert!(x < 0.0);

        engine.pause_marquee();
        run_frames(&engine, &clock, 10);
        assert_eq!(marquee.offset(), x);
        engine.resume_marquee();
        run_frames(&engine, &clock, 1);
        assert!(marquee.offset() < x);
        assert_eq!(
            engine.store().borrow().get(strip, Property::TranslateX),
            Some(marquee.offset())
        );
    }

    #[test]
    fn test_magnet_and_cursor_follow_pointer() {
        let (engine, clock) = engine();
        let button = engine.store().borrow_mut().mount("button");
        let magnet = engine
            .bind_magnetic(button, Rect::new(0.0, 0.0, 100.0, 40.0), 0.5)
            .unwrap();

        assert!(engine.pointer_moved(Point::new(90.0, 20.0)));
        run_frames(&engine, &clock, 60);
        assert!((magnet.state().applied_offset.x - 20.0).abs() < 1e-9);

        let (ring, _) = engine.cursor_elements().unwrap();
        let store = engine.store();
        assert_eq!(store.borrow().get(ring, Property::TranslateX), Some(90.0));
        assert!((store.borrow().get(ring, Property::Scale).unwrap() - 1.8).abs() < 1e-9);

        assert!(!engine.pointer_moved(Point::new(500.0, 500.0)));
        run_frames(&engine, &clock, 60);
        assert_eq!(magnet.state().applied_offset.x, 0.0);
        assert_eq!(store.borrow().get(ring, Property::Scale), Some(1.0));
    }

    #[test]
    fn test_intro_locks_scroll_until_finished() {
        let (engine, clock) = engine();
        let events = Rc::new(RefCell::new(Vec::new()));
        let e = events.clone();
        engine.on_event(move |event| e.borrow_mut().push(event.clone()));

        let elements = engine.play_intro().unwrap();
        assert!(engine.is_scroll_locked());
        assert!(!engine.on_wheel(100.0));
        assert!(engine.play_intro().is_err());

        run_frames(&engine, &clock, 400);
        assert!(!engine.is_scroll_locked());
        assert_eq!(engine.intro_phase(), Some(IntroPhase::Finished));
        assert!(events.borrow().contains(&EngineEvent::IntroFinished));
        assert!(!engine.store().borrow().is_mounted(elements.loader));
        assert!(engine.on_wheel(100.0));
    }

    #[test]
    fn test_reveal_text_dispose_unmounts_glyphs() {
        let (engine, _clock) = engine();
        let title = engine.store().borrow_mut().mount("title");
        let before = engine.store().borrow().len();
        let handle = engine.reveal_text(title, "Hello").unwrap();
        assert_eq!(handle.text(), "Hello");
        assert_eq!(engine.store().borrow().len(), before + 5);

        handle.dispose();
        assert_eq!(engine.store().borrow().len(), before);
        assert!(engine.timeline().borrow().is_empty());
    }

    #[test]
    fn test_events_serialize_with_tag() {
        let json = serde_json::to_string(&EngineEvent::SectionChanged {
            section: "about".to_string(),
        })
        .unwrap();
        assert_eq!(json, r#"{"event":"section_changed","section":"about"}"#);
    }
}
