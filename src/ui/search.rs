use crate::app::{App, Focus};
use crate::util::{display_width, truncate_to_width};
use ratatui::{
    layout::{Position, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const PLACEHOLDER: &str = "Search questions...";

/// Render the search bar. Bordered when there are three rows to spare.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 10 || area.height == 0 {
        return;
    }

    let focused = app.focus == Focus::Search;
    let bordered = area.height >= 3;
    let prefix = if bordered { "" } else { "/ " };
    let term = &app.browse.search_term;

    let inner_width = usize::from(if bordered {
        area.width.saturating_sub(2)
    } else {
        area.width
    });
    let room = inner_width.saturating_sub(display_width(prefix) + 1);

    let text = if term.is_empty() && !focused {
        Span::styled(
            truncate_to_width(PLACEHOLDER, room).into_owned(),
            app.style("search_placeholder"),
        )
    } else {
        // Keep the tail visible while typing past the edge
        let shown = if display_width(term) > room {
            tail_to_width(term, room)
        } else {
            term.as_str()
        };
        Span::styled(shown.to_string(), app.style("search_text"))
    };
    let cursor_col = u16::try_from(display_width(prefix) + display_width(&text.content))
        .unwrap_or(u16::MAX);
    let line = Line::from(vec![
        Span::styled(prefix, app.style("search_placeholder")),
        text,
    ]);

    let mut paragraph = Paragraph::new(line);
    if bordered {
        let border = if focused {
            app.style("panel_border_focused")
        } else {
            app.style("panel_border")
        };
        paragraph = paragraph.block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(" Search (/) "),
        );
    }
    f.render_widget(paragraph, area);

    if focused {
        let (x0, y) = if bordered {
            (area.x + 1, area.y + 1)
        } else {
            (area.x, area.y)
        };
        let x = x0
            .saturating_add(cursor_col)
            .min(area.right().saturating_sub(1));
        f.set_cursor_position(Position::new(x, y));
    }
}

/// Longest suffix of `s` fitting in `columns`.
fn tail_to_width(s: &str, columns: usize) -> &str {
    let mut used = 0;
    let mut start = s.len();
    for (idx, c) in s.char_indices().rev() {
        let w = display_width(c.encode_utf8(&mut [0; 4]));
        if used + w > columns {
            break;
        }
        used += w;
        start = idx;
    }
    &s[start..]
}
