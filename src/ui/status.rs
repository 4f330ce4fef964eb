use crate::app::{App, Focus};
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

const LIST_HINTS: &str =
    "[j/k]move [Enter]answer [h/l/:]page [Tab]category [/]search [o]google [c]hatgpt [t]heme [?]help [q]uit";
const SEARCH_HINTS: &str = "Type to search | ESC clear | ENTER keep | Ctrl+U erase";

/// Text shown in the status bar: a transient message, else key hints.
fn status_text(app: &App) -> Cow<'_, str> {
    if app.loading {
        Cow::Borrowed("Loading questions... [q]uit")
    } else if let Some(input) = &app.page_input {
        Cow::Owned(format!(
            "Go to page (1-{}): {}_ | ENTER jump | ESC cancel",
            app.view.total_pages.max(1),
            input
        ))
    } else if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(msg.as_ref())
    } else {
        match app.focus {
            Focus::Search => Cow::Borrowed(SEARCH_HINTS),
            Focus::List => Cow::Borrowed(LIST_HINTS),
        }
    }
}

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }
    let paragraph = Paragraph::new(status_text(app)).style(app.style("status_bar"));
    f.render_widget(paragraph, area);
}
