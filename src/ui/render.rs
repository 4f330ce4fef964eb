//! Render functions for the TUI.
//!
//! Lays out the single browse screen top to bottom: header, search bar,
//! category chips, summary line, question accordion, pagination and the
//! status bar.

use crate::app::App;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    text::Span,
    widgets::Paragraph,
    Frame,
};

use super::{categories, header, help, pagination, questions, search, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 60;
pub(super) const MIN_HEIGHT: u16 = 12;

/// Loading spinner frames, advanced on each tick.
pub(super) const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Terminal height at which the search bar gets its border.
const BORDERED_SEARCH_MIN_HEIGHT: u16 = 20;

/// Main render dispatch function.
pub(super) fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();

    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    if app.loading {
        render_loading(f, app, area);
    } else {
        render_browse(f, app, area);
    }

    if app.show_help {
        help::render(f, app);
    }
}

/// Header plus a centered spinner while the question set is fetched.
fn render_loading(f: &mut Frame, app: &App, area: Rect) {
    let [header_area, body, status_area] = Layout::vertical([
        Constraint::Length(header::height(area)),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    header::render(f, app, header_area);

    let frame = SPINNER_FRAMES[app.spinner_frame % SPINNER_FRAMES.len()];
    let [_, middle, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(body);
    f.render_widget(
        Paragraph::new(Span::styled(
            format!("{} Loading questions...", frame),
            app.style("loading"),
        ))
        .alignment(Alignment::Center),
        middle,
    );

    status::render(f, app, status_area);
}

/// The browse screen.
fn render_browse(f: &mut Frame, app: &mut App, area: Rect) {
    let search_height = if area.height >= BORDERED_SEARCH_MIN_HEIGHT {
        3
    } else {
        1
    };

    let [header_area, search_area, chips_area, summary_area, list_area, pages_area, status_area] =
        Layout::vertical([
            Constraint::Length(header::height(area)),
            Constraint::Length(search_height),
            Constraint::Length(categories::height(app, area.width)),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(pagination::height(&app.view)),
            Constraint::Length(1),
        ])
        .areas(area);

    header::render(f, app, header_area);
    search::render(f, app, search_area);
    categories::render(f, app, chips_area);
    questions::render_summary(f, app, summary_area);
    questions::render(f, app, list_area);
    pagination::render(f, app, pages_area);
    status::render(f, app, status_area);
}
