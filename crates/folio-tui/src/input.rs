use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::app::App;

/// Input action that can be performed
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    /// Wheel-style scroll by a number of rows (negative = up)
    ScrollRows(f64),
    ScrollPageDown,
    ScrollPageUp,
    JumpToTop,
    JumpToBottom,
    /// Smooth-scroll to the nth configured section
    GoToSection(usize),
    NextSection,
    PrevSection,
    ToggleMarquee,
    /// Pointer moved to a terminal cell
    PointerMoved { column: u16, row: u16 },
    PointerLeft,
    Click { column: u16, row: u16 },
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent, app: &App) -> Action {
    // Only quitting works while the loader is up
    let quitting = matches!(
        (key.code, key.modifiers),
        (KeyCode::Char('q'), KeyModifiers::NONE)
            | (KeyCode::Esc, _)
            | (KeyCode::Char('c'), KeyModifiers::CONTROL)
    );
    if quitting {
        return Action::Quit;
    }
    if app.is_intro_playing() {
        return Action::None;
    }

    let step = app.config.scroll.scroll_step;
    match (key.code, key.modifiers) {
        (KeyCode::Char('j'), KeyModifiers::NONE) | (KeyCode::Down, _) => Action::ScrollRows(step),
        (KeyCode::Char('k'), KeyModifiers::NONE) | (KeyCode::Up, _) => Action::ScrollRows(-step),

        (KeyCode::Char(' '), KeyModifiers::NONE)
        | (KeyCode::PageDown, _)
        | (KeyCode::Char('f'), KeyModifiers::CONTROL) => Action::ScrollPageDown,
        (KeyCode::PageUp, _) | (KeyCode::Char('b'), KeyModifiers::CONTROL) => Action::ScrollPageUp,

        (KeyCode::Char('g'), KeyModifiers::NONE) | (KeyCode::Home, _) => Action::JumpToTop,
        (KeyCode::Char('G'), _) | (KeyCode::End, _) => Action::JumpToBottom,

        (KeyCode::Tab, _) => Action::NextSection,
        (KeyCode::BackTab, _) => Action::PrevSection,
        (KeyCode::Char(c), KeyModifiers::NONE) if c.is_ascii_digit() && c != '0' => {
            Action::GoToSection(c as usize - '1' as usize)
        }

        (KeyCode::Char('p'), KeyModifiers::NONE) => Action::ToggleMarquee,
        _ => Action::None,
    }
}

pub fn handle_mouse_event(mouse: MouseEvent, app: &App) -> Action {
    if app.is_intro_playing() {
        return Action::None;
    }
    let step = app.config.scroll.scroll_step;
    match mouse.kind {
        MouseEventKind::ScrollDown => Action::ScrollRows(step),
        MouseEventKind::ScrollUp => Action::ScrollRows(-step),
        MouseEventKind::Moved | MouseEventKind::Drag(_) => Action::PointerMoved {
            column: mouse.column,
            row: mouse.row,
        },
        MouseEventKind::Down(MouseButton::Left) => Action::Click {
            column: mouse.column,
            row: mouse.row,
        },
        _ => Action::None,
    }
}
