use folio_core::{ElementHandle, Property};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::content::{self, ABOUT, CONTACT, CONTACT_BUTTON, CTA_LABELS, PROJECTS, SKILLS, TOOLS};
use crate::layout::{px_to_cols, px_to_rows, SectionKind, SectionLayout, PROJECT_ROWS, SKILL_ROWS};

const SKILL_NAME_WIDTH: usize = 22;
const SKILL_BAR_WIDTH: usize = 24;
/// Rows a rising hero glyph may sit below its line
const GLYPH_DROP_ROWS: i32 = 3;

/// Visible window of the page, addressed by page row
struct Canvas {
    first_row: i32,
    lines: Vec<Line<'static>>,
}

impl Canvas {
    fn new(first_row: u16, rows: u16) -> Self {
        Self {
            first_row: i32::from(first_row),
            lines: vec![Line::default(); rows as usize],
        }
    }

    fn put(&mut self, row: i32, line: Line<'static>) {
        let idx = row - self.first_row;
        if idx >= 0 && (idx as usize) < self.lines.len() {
            self.lines[idx as usize] = line;
        }
    }

    fn overlaps(&self, section: &SectionLayout) -> bool {
        let last = self.first_row + self.lines.len() as i32;
        i32::from(section.bottom()) > self.first_row && i32::from(section.top) < last
    }
}

/// Text style of an animated element, or None while it is invisible
fn element_style(app: &App, element: ElementHandle, color: Color) -> Option<Style> {
    let opacity = app.value(element, Property::Opacity);
    if opacity < 0.05 {
        return None;
    }
    let mut style = Style::default().fg(app.theme.fade(color, opacity));
    if app.value(element, Property::Blur) > 4.0 {
        style = style.add_modifier(Modifier::DIM);
    }
    Some(style)
}

fn shift(app: &App, element: ElementHandle) -> (i32, i32) {
    (
        px_to_rows(app.value(element, Property::TranslateY)),
        px_to_cols(app.value(element, Property::TranslateX)),
    )
}

fn pad(width: i32) -> Span<'static> {
    Span::raw(" ".repeat(width.max(0) as usize))
}

fn centered(app: &App, text: &str) -> i32 {
    (i32::from(app.width) - text.width() as i32) / 2
}

/// The slice of one marquee loop visible at `offset`
pub fn marquee_window(cycle: &str, offset: f64, width: usize) -> String {
    let chars: Vec<char> = cycle.chars().collect();
    if chars.is_empty() {
        return String::new();
    }
    let start = px_to_cols(-offset).rem_euclid(chars.len() as i32) as usize;
    chars.iter().cycle().skip(start).take(width).collect()
}

pub struct PageWidget;

impl PageWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let mut canvas = Canvas::new(app.scroll_row(), area.height);

        for (index, section) in app.layout.sections.iter().enumerate() {
            if !canvas.overlaps(section) {
                continue;
            }
            if let Some(heading) = app.elements.heading(&section.id) {
                Self::heading(&mut canvas, app, section, index, heading);
            }
            match section.kind {
                SectionKind::Hero => Self::hero(&mut canvas, app, section),
                SectionKind::About => Self::about(&mut canvas, app, section),
                SectionKind::Achievements => Self::achievements(&mut canvas, app, section),
                SectionKind::Projects => Self::projects(&mut canvas, app, section),
                SectionKind::Skills => Self::skills(&mut canvas, app, section),
                SectionKind::Contact => Self::contact(&mut canvas, app, section),
                SectionKind::Other => {}
            }
        }

        let paragraph =
            Paragraph::new(canvas.lines).style(Style::default().fg(app.theme.fg0).bg(app.theme.bg0));
        frame.render_widget(paragraph, area);
    }

    fn heading(
        canvas: &mut Canvas,
        app: &App,
        section: &SectionLayout,
        index: usize,
        element: ElementHandle,
    ) {
        let Some(style) = element_style(app, element, app.theme.heading) else {
            return;
        };
        let (dy, dx) = shift(app, element);
        let text = format!("{:02}. {}", index + 1, section.label.to_uppercase());
        let rule = "─".repeat(text.width() + 4);
        let row = i32::from(section.heading_row()) + dy;
        canvas.put(
            row,
            Line::from(vec![pad(4 + dx), Span::styled(text, style.add_modifier(Modifier::BOLD))]),
        );
        canvas.put(
            row + 1,
            Line::from(vec![
                pad(2 + dx),
                Span::styled(rule, Style::default().fg(app.theme.fade(app.theme.grey0, app.value(element, Property::Opacity)))),
            ]),
        );
    }

    fn hero(canvas: &mut Canvas, app: &App, section: &SectionLayout) {
        let Some(rows) = app.layout.hero_rows() else {
            return;
        };

        let glyphs = app.hero_glyphs();
        if !glyphs.is_empty() {
            let indent = centered(app, content::HERO_TITLE);
            for drop in 0..=GLYPH_DROP_ROWS {
                let mut spans = vec![pad(indent)];
                for &(c, glyph) in glyphs {
                    let c = if c == folio_core::timeline::reveal::NBSP { ' ' } else { c };
                    let glyph_drop = px_to_rows(app.value(glyph, Property::TranslateY))
                        .clamp(0, GLYPH_DROP_ROWS);
                    match element_style(app, glyph, app.theme.fg1) {
                        Some(style) if glyph_drop == drop => spans.push(Span::styled(
                            c.to_string(),
                            style.add_modifier(Modifier::BOLD),
                        )),
                        _ => spans.push(Span::raw(" ")),
                    }
                }
                canvas.put(i32::from(rows.title) + drop, Line::from(spans));
            }
        }

        let subtitle = app.elements.hero_subtitle;
        if let Some(style) = element_style(app, subtitle, app.theme.grey2) {
            let (dy, _) = shift(app, subtitle);
            canvas.put(
                i32::from(rows.subtitle) + dy,
                Line::from(vec![
                    pad(centered(app, content::HERO_SUBTITLE)),
                    Span::styled(content::HERO_SUBTITLE, style),
                ]),
            );
        }

        let mut spans = Vec::new();
        let mut col = 0i32;
        for ((&cta, label), (start, width)) in app
            .elements
            .ctas
            .iter()
            .zip(CTA_LABELS)
            .zip(app.cta_columns())
        {
            spans.push(pad(i32::from(start) - col));
            let text = format!("[ {} ]", label);
            match element_style(app, cta, app.theme.accent) {
                Some(style) => spans.push(Span::styled(text, style.add_modifier(Modifier::BOLD))),
                None => spans.push(pad(i32::from(width))),
            }
            col = i32::from(start + width);
        }
        canvas.put(i32::from(rows.cta), Line::from(spans));

        let hint = "scroll";
        canvas.put(
            i32::from(section.bottom()) - 2,
            Line::from(vec![
                pad(centered(app, hint)),
                Span::styled(hint, Style::default().fg(app.theme.grey0)),
            ]),
        );
    }

    fn about(canvas: &mut Canvas, app: &App, section: &SectionLayout) {
        let about = app.elements.about;
        let Some(style) = element_style(app, about, app.theme.fg0) else {
            return;
        };
        let (dy, dx) = shift(app, about);
        for (i, text) in ABOUT.iter().enumerate() {
            canvas.put(
                i32::from(section.body_top()) + i as i32 + dy,
                Line::from(vec![pad(4 + dx), Span::styled(*text, style)]),
            );
        }
    }

    fn achievements(canvas: &mut Canvas, app: &App, section: &SectionLayout) {
        let width = app.width as usize;
        let rule = Span::styled("─".repeat(width), Style::default().fg(app.theme.grey0));
        let top = i32::from(section.body_top());
        let text = marquee_window(&content::marquee_cycle(), app.marquee_offset(), width);

        canvas.put(top, Line::from(rule.clone()));
        canvas.put(
            top + 1,
            Line::from(Span::styled(
                text,
                Style::default().fg(app.theme.yellow).add_modifier(Modifier::BOLD),
            )),
        );
        canvas.put(top + 2, Line::from(rule));
    }

    fn projects(canvas: &mut Canvas, app: &App, section: &SectionLayout) {
        for (i, (&card, project)) in app.elements.projects.iter().zip(PROJECTS).enumerate() {
            let Some(style) = element_style(app, card, app.theme.fg1) else {
                continue;
            };
            let (dy, dx) = shift(app, card);
            let opacity = app.value(card, Property::Opacity);
            let row = i32::from(section.body_top()) + i as i32 * i32::from(PROJECT_ROWS) + dy;
            canvas.put(
                row,
                Line::from(vec![
                    pad(4 + dx),
                    Span::styled(project.title, style.add_modifier(Modifier::BOLD)),
                    Span::raw("  "),
                    Span::styled(project.stack, Style::default().fg(app.theme.fade(app.theme.aqua, opacity))),
                ]),
            );
            canvas.put(
                row + 1,
                Line::from(vec![
                    pad(4 + dx),
                    Span::styled(project.blurb, Style::default().fg(app.theme.fade(app.theme.grey2, opacity))),
                ]),
            );
        }
    }

    fn skills(canvas: &mut Canvas, app: &App, section: &SectionLayout) {
        let body = i32::from(section.body_top());
        for (i, (&(row_el, bar_el), skill)) in app.elements.skills.iter().zip(SKILLS).enumerate() {
            let (_, dx) = shift(app, row_el);
            let mut spans = vec![pad(4 + dx)];
            match element_style(app, row_el, app.theme.fg0) {
                Some(style) => spans.push(Span::styled(
                    format!("{:<width$}", skill.name, width = SKILL_NAME_WIDTH),
                    style,
                )),
                None => spans.push(pad(SKILL_NAME_WIDTH as i32)),
            }

            let percent = app.value(bar_el, Property::WidthPercent).clamp(0.0, 100.0);
            let filled = (SKILL_BAR_WIDTH as f64 * percent / 100.0).round() as usize;
            spans.push(Span::styled(
                "█".repeat(filled),
                Style::default().fg(app.theme.bar_fill),
            ));
            spans.push(Span::styled(
                "░".repeat(SKILL_BAR_WIDTH - filled),
                Style::default().fg(app.theme.bar_empty),
            ));
            spans.push(Span::styled(
                format!(" {:>3.0}%", percent),
                Style::default().fg(app.theme.grey2),
            ));
            canvas.put(body + i as i32 * i32::from(SKILL_ROWS), Line::from(spans));
        }

        let mut spans = vec![pad(4)];
        for (&badge, tool) in app.elements.badges.iter().zip(TOOLS) {
            let text = format!("[{}]", tool);
            let width = text.width() as i32;
            match element_style(app, badge, app.theme.purple) {
                Some(style) => spans.push(Span::styled(text, style)),
                None => spans.push(pad(width)),
            }
            spans.push(Span::raw(" "));
        }
        canvas.put(
            body + app.elements.skills.len() as i32 * i32::from(SKILL_ROWS),
            Line::from(spans),
        );
    }

    fn contact(canvas: &mut Canvas, app: &App, section: &SectionLayout) {
        let body = i32::from(section.body_top());
        for (i, text) in CONTACT.iter().enumerate() {
            canvas.put(
                body + i as i32,
                Line::from(vec![
                    pad(centered(app, text)),
                    Span::styled(*text, Style::default().fg(app.theme.fg0)),
                ]),
            );
        }

        let Some((row, col)) = app.contact_button_cell() else {
            return;
        };
        let button = app.elements.contact_button;
        let (dy, dx) = shift(app, button);
        let mut style = Style::default().fg(app.theme.accent).add_modifier(Modifier::BOLD);
        if app.value(button, Property::Scale) > 1.02 {
            style = style.fg(app.theme.bg0).bg(app.theme.accent);
        }
        canvas.put(
            i32::from(row) + 1 + dy,
            Line::from(vec![pad(i32::from(col) + dx), Span::styled(CONTACT_BUTTON, style)]),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marquee_window_wraps() {
        assert_eq!(marquee_window("abcd", 0.0, 6), "abcdab");
        // Ten units per column
        assert_eq!(marquee_window("abcd", -10.0, 3), "bcd");
        assert_eq!(marquee_window("abcd", -30.0, 3), "dab");
        assert_eq!(marquee_window("", -30.0, 3), "");
    }

    #[test]
    fn test_canvas_clips_to_window() {
        let mut canvas = Canvas::new(10, 3);
        canvas.put(9, Line::from("above"));
        canvas.put(11, Line::from("inside"));
        canvas.put(13, Line::from("below"));
        assert_eq!(canvas.lines[1], Line::from("inside"));
        assert!(canvas.lines.iter().all(|l| *l != Line::from("above")));
        assert!(canvas.lines.iter().all(|l| *l != Line::from("below")));
    }
}
