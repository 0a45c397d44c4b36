use folio_core::Property;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::layout::px_to_rows;

const SPINNER: [char; 4] = ['◐', '◓', '◑', '◒'];
const CAPTION: &str = "LOADING EXPERIENCE";

/// Spinner frame for a ring rotated by `degrees`
pub fn spinner_frame(degrees: f64) -> char {
    let quarter = (degrees.rem_euclid(360.0) / 90.0) as usize;
    SPINNER[quarter.min(SPINNER.len() - 1)]
}

pub struct LoaderWidget;

impl LoaderWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let Some(intro) = app.intro else {
            return;
        };
        let opacity = app.value(intro.loader, Property::Opacity);
        if opacity < 0.05 {
            return;
        }

        let theme = &app.theme;
        let mut lines = vec![Line::default(); area.height as usize];
        let middle = (area.height / 2) as usize;
        let center = |text: &str| " ".repeat((area.width as usize).saturating_sub(text.width()) / 2);

        let ring = spinner_frame(app.value(intro.ring, Property::RotateZ)).to_string();
        if let Some(line) = lines.get_mut(middle.saturating_sub(1)) {
            *line = Line::from(vec![
                Span::raw(center(&ring)),
                Span::styled(
                    ring,
                    Style::default()
                        .fg(theme.fade(theme.accent, opacity))
                        .add_modifier(Modifier::BOLD),
                ),
            ]);
        }

        let caption = app.value(intro.caption, Property::Opacity) * opacity;
        if caption >= 0.05 {
            let row = (middle as i32 + 1 + px_to_rows(app.value(intro.caption, Property::TranslateY)))
                .max(0) as usize;
            if let Some(line) = lines.get_mut(row) {
                *line = Line::from(vec![
                    Span::raw(center(CAPTION)),
                    Span::styled(CAPTION, Style::default().fg(theme.fade(theme.grey2, caption))),
                ]);
            }
        }

        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(lines).style(Style::default().bg(theme.bg0)),
            area,
        );
    }
}
