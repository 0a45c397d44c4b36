use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseEvent};

/// Event handler for terminal events
pub struct EventHandler {
    /// Upper bound on events read per frame, so a flood of mouse moves
    /// cannot starve rendering
    max_per_frame: usize,
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new(64)
    }
}

impl EventHandler {
    pub fn new(max_per_frame: usize) -> Self {
        Self {
            max_per_frame: max_per_frame.max(1),
        }
    }

    /// Read every event already queued, without blocking
    pub fn drain(&self) -> Result<Vec<AppEvent>> {
        let mut events = Vec::new();
        while events.len() < self.max_per_frame && event::poll(Duration::ZERO)? {
            if let Some(event) = Self::translate(event::read()?) {
                events.push(event);
            }
        }
        Ok(events)
    }

    fn translate(event: Event) -> Option<AppEvent> {
        match event {
            // Only handle key press events, ignore release events
            // (crossterm 0.27+ sends release events on some systems)
            Event::Key(key) if key.kind == KeyEventKind::Press => Some(AppEvent::Key(key)),
            Event::Mouse(mouse) => Some(AppEvent::Mouse(mouse)),
            Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
            Event::FocusLost => Some(AppEvent::FocusLost),
            _ => None,
        }
    }
}

/// Application events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// A key was pressed
    Key(KeyEvent),
    /// Mouse moved, clicked or scrolled
    Mouse(MouseEvent),
    /// Terminal was resized
    Resize(u16, u16),
    /// The terminal lost focus; treated as the pointer leaving the page
    FocusLost,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};

    #[test]
    fn test_release_events_are_ignored() {
        let mut key = KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE);
        assert_eq!(
            EventHandler::translate(Event::Key(key)),
            Some(AppEvent::Key(key))
        );

        key.kind = KeyEventKind::Release;
        key.state = KeyEventState::NONE;
        assert_eq!(EventHandler::translate(Event::Key(key)), None);
        assert_eq!(
            EventHandler::translate(Event::Resize(80, 24)),
            Some(AppEvent::Resize(80, 24))
        );
    }
}
