use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let state = app.engine.scroll_state();
        let section = app
            .active_section()
            .map(|s| s.to_uppercase())
            .unwrap_or_else(|| "-".to_string());

        let status_text = if let Some(msg) = &app.status_message {
            format!(" {}", msg)
        } else if app.is_intro_playing() {
            " LOADING".to_string()
        } else {
            let mut text = format!(
                " {} | {:.0}/{:.0}",
                section,
                state.virtual_offset,
                app.engine.max_scroll()
            );
            if app.config.ui.show_stats {
                text.push_str(&format!(
                    " | v {:.0}/s | frame {} | tweens {}",
                    state.velocity,
                    app.frames,
                    app.engine.timeline().borrow().active_count()
                ));
            }
            text
        };

        let help_hint = " q:quit j/k:scroll 1-9:jump tab:next p:marquee ";
        let padding_len = area
            .width
            .saturating_sub(status_text.width() as u16 + help_hint.width() as u16)
            as usize;

        let line = Line::from(vec![
            Span::styled(
                status_text,
                Style::default().fg(app.theme.fg0).bg(app.theme.bg2),
            ),
            Span::styled(" ".repeat(padding_len), Style::default().bg(app.theme.bg2)),
            Span::styled(
                help_hint,
                Style::default().fg(app.theme.grey2).bg(app.theme.bg2),
            ),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}
