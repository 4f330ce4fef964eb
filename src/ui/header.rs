use crate::app::App;
use crate::util::display_width;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub const TITLE: &str = "Frontend Interview Q&A";
const TAGLINE: &str =
    "Common frontend development interview questions and answers to help you prepare";
const NOTE_LABEL: &str = "Note: ";
const NOTE: &str = "The following questions are designed to support preliminary \
preparation and interview practice. For comprehensive learning and advanced mastery, \
use specialized resources and professional tools such as Google (press o on a \
question) and ChatGPT (press c) for in-depth study and skill development.";

/// Terminal heights below which parts of the header are dropped.
const TAGLINE_MIN_HEIGHT: u16 = 20;
const NOTE_MIN_HEIGHT: u16 = 32;

/// Rows the header needs inside a terminal of `area` size.
pub fn height(area: Rect) -> u16 {
    let mut h = 1;
    if area.height >= TAGLINE_MIN_HEIGHT {
        h += 1;
    }
    if area.height >= NOTE_MIN_HEIGHT {
        h += note_height(area.width);
    }
    h
}

/// Bordered note box: wrapped text plus two border rows.
fn note_height(width: u16) -> u16 {
    let inner = usize::from(width.saturating_sub(4)).max(1);
    let text = display_width(NOTE_LABEL) + display_width(NOTE);
    // Word wrapping loses a little per line; one spare row covers it
    let rows = text.div_ceil(inner) + 1;
    u16::try_from(rows).unwrap_or(u16::MAX).saturating_add(2)
}

/// Title, tagline and the preparation note.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.height == 0 || area.width < 3 {
        return;
    }

    let show_tagline = area.height >= 2;
    let show_note = area.height > 2;
    let [title_area, tagline_area, note_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(u16::from(show_tagline)),
        Constraint::Min(0),
    ])
    .areas(area);

    f.render_widget(
        Paragraph::new(Span::styled(TITLE, app.style("header_title")))
            .alignment(Alignment::Center),
        title_area,
    );

    if show_tagline {
        f.render_widget(
            Paragraph::new(Span::styled(TAGLINE, app.style("header_tagline")))
                .alignment(Alignment::Center),
            tagline_area,
        );
    }

    if show_note {
        let note = Paragraph::new(Line::from(vec![
            Span::styled(NOTE_LABEL, app.style("note_label")),
            Span::styled(NOTE, app.style("note_text")),
        ]))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("note_border")),
        );
        f.render_widget(note, note_area);
    }
}
