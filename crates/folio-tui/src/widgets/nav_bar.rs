use folio_core::Property;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, BRAND};
use crate::layout::px_to_rows;

pub struct NavBarWidget;

impl NavBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let bar = Style::default().bg(app.theme.bg1);
        let nav = app.elements.nav;
        let opacity = app.value(nav, Property::Opacity);

        // Still above the top edge while dropping in
        if opacity < 0.05 || px_to_rows(app.value(nav, Property::TranslateY)) < 0 {
            frame.render_widget(Paragraph::new("").style(bar), area);
            return;
        }

        let active = app.active_section();
        let mut spans = vec![Span::styled(
            BRAND,
            Style::default()
                .fg(app.theme.fade(app.theme.accent, opacity))
                .add_modifier(Modifier::BOLD),
        )];
        let mut col = BRAND.len() as u16;
        for item in app.nav_items() {
            spans.push(Span::raw(" ".repeat(item.start.saturating_sub(col) as usize)));
            let style = if active.as_deref() == Some(item.id.as_str()) {
                Style::default()
                    .fg(app.theme.fade(app.theme.accent, opacity))
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default().fg(app.theme.fade(app.theme.fg0, opacity))
            };
            col = item.start + item.width;
            spans.push(Span::styled(item.text, style));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)).style(bar), area);
    }
}
