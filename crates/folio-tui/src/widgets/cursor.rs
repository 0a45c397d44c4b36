use folio_core::Property;
use ratatui::{layout::Rect, style::Style, Frame};

use crate::app::App;
use crate::layout::{COL_PX, ROW_PX};

pub struct CursorWidget;

impl CursorWidget {
    /// Draw the ring and dot over whatever is already rendered in `area`
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        if app.pointer.is_none() || app.intro.is_some() {
            return;
        }
        let Some((ring, dot)) = app.engine.cursor_elements() else {
            return;
        };

        let ring_glyph = if app.value(ring, Property::Scale) > 1.4 { '◎' } else { '○' };
        let layers = [
            (ring, Some(ring_glyph)),
            (dot, (app.value(dot, Property::Scale) > 0.5).then_some('•')),
        ];

        let buf = frame.buffer_mut();
        for (element, glyph) in layers {
            let Some(glyph) = glyph else {
                continue;
            };
            let x = (app.value(element, Property::TranslateX) / COL_PX).floor();
            let y = (app.value(element, Property::TranslateY) / ROW_PX).floor();
            if x < 0.0 || y < 0.0 {
                continue;
            }
            let (x, y) = (x as u16, y as u16);
            if x < area.left() || x >= area.right() || y < area.top() || y >= area.bottom() {
                continue;
            }
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_char(glyph)
                    .set_style(Style::default().fg(app.theme.accent));
            }
        }
    }
}
