//! Input handling for the TUI.
//!
//! Keys are resolved through the keybinding registry in the context of the
//! focused widget, then dispatched to `App` operations.

use crate::app::{App, Focus};
use crate::keybindings::{Action as KbAction, Context as KbContext};
use crate::util::{sanitize_search_term, MAX_SEARCH_QUERY_LENGTH};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};

use super::helpers::{web_search_url, LookupSite};
use super::Action;

/// Main input dispatch function.
///
/// The help overlay and the page prompt capture every key while open;
/// otherwise the focused widget decides.
pub(super) async fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
) -> Result<Action> {
    if app.show_help {
        return Ok(handle_help_input(app, code));
    }
    if app.page_input.is_some() {
        return Ok(handle_page_input(app, code, modifiers));
    }

    match app.focus {
        Focus::Search => Ok(handle_search_input(app, code, modifiers)),
        Focus::List => handle_list_input(app, code, modifiers).await,
    }
}

/// Handle input while the help overlay is visible.
///
/// Captures all keys: j/k/Up/Down scroll, Esc/q/? dismiss.
fn handle_help_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            app.show_help = false;
            app.help_scroll_offset = 0;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_sub(1);
        }
        _ => {}
    }
    Action::Continue
}

/// Handle input on the question list.
async fn handle_list_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
) -> Result<Action> {
    let Some(action) = app
        .keybindings
        .action_for_key(code, modifiers, KbContext::List)
    else {
        // A bare digit opens the page prompt with that digit typed
        if let KeyCode::Char(c @ '1'..='9') = code {
            if !app.loading && !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
                app.page_input = Some(c.to_string());
            }
        }
        return Ok(Action::Continue);
    };

    // Only quitting makes sense before the record set exists
    if app.loading && action != KbAction::Quit {
        return Ok(Action::Continue);
    }

    match action {
        KbAction::Quit => return Ok(Action::Quit),
        KbAction::Back => {
            if !app.browse.search_term.is_empty() {
                app.set_search("");
                app.set_status("Search cleared");
            } else {
                app.status_message = None;
            }
        }
        KbAction::NavDown => app.nav_down(),
        KbAction::NavUp => app.nav_up(),
        KbAction::ToggleAnswer => {
            app.toggle_answer();
        }
        KbAction::ExpandAll => app.expand_all(),
        KbAction::CollapseAll => app.collapse_all(),
        KbAction::NextPage => {
            app.next_page();
        }
        KbAction::PrevPage => {
            app.prev_page();
        }
        KbAction::FirstPage => {
            app.first_page();
        }
        KbAction::LastPage => {
            app.last_page();
        }
        KbAction::NextCategory => app.next_category(),
        KbAction::PrevCategory => app.prev_category(),
        KbAction::AllCategory => app.all_category(),
        KbAction::EnterSearch => {
            app.focus = Focus::Search;
        }
        KbAction::CycleTheme => {
            app.toggle_theme().await;
        }
        KbAction::GoToPage => {
            app.page_input = Some(String::new());
        }
        KbAction::OpenWebSearch => open_lookup(app, LookupSite::Google),
        KbAction::OpenChatSearch => open_lookup(app, LookupSite::ChatGpt),
        KbAction::ShowHelp => {
            app.show_help = true;
            app.help_scroll_offset = 0;
        }
        KbAction::ExitSearch | KbAction::CommitSearch => {}
    }
    Ok(Action::Continue)
}

/// Handle input while the search bar has focus.
///
/// Typed characters edit the term live. Global bindings do not apply here,
/// otherwise `q` could never be typed.
fn handle_search_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    match app
        .keybindings
        .action_for_key(code, modifiers, KbContext::Search)
    {
        Some(KbAction::ExitSearch) => {
            app.focus = Focus::List;
            app.set_search("");
            return Action::Continue;
        }
        Some(KbAction::CommitSearch) => {
            app.focus = Focus::List;
            return Action::Continue;
        }
        Some(KbAction::Quit) if modifiers.contains(KeyModifiers::CONTROL) => {
            return Action::Quit;
        }
        _ => {}
    }

    match code {
        KeyCode::Backspace => {
            let mut term = app.browse.search_term.clone();
            if term.pop().is_some() {
                app.set_search(term);
            }
        }
        KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.set_search("");
        }
        KeyCode::Char(c)
            if !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            if app.browse.search_term.chars().count() >= MAX_SEARCH_QUERY_LENGTH {
                app.set_status(format!(
                    "Search term at max length ({} chars)",
                    MAX_SEARCH_QUERY_LENGTH
                ));
                return Action::Continue;
            }
            let mut term = app.browse.search_term.clone();
            term.push(c);
            app.set_search(sanitize_search_term(&term));
        }
        _ => {}
    }
    Action::Continue
}

/// Handle input while the go-to-page prompt is open.
fn handle_page_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    /// Longer than any realistic page count.
    const MAX_PAGE_DIGITS: usize = 5;

    match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return Action::Quit,
        KeyCode::Esc => app.page_input = None,
        KeyCode::Enter => {
            app.submit_page_input();
        }
        KeyCode::Backspace => {
            if let Some(input) = app.page_input.as_mut() {
                input.pop();
            }
        }
        KeyCode::Char(c) if c.is_ascii_digit() => {
            if let Some(input) = app.page_input.as_mut() {
                if input.len() < MAX_PAGE_DIGITS {
                    input.push(c);
                }
            }
        }
        _ => {}
    }
    Action::Continue
}

/// Open the selected question on a lookup site in the browser.
fn open_lookup(app: &mut App, site: LookupSite) {
    let Some(question) = app.selected_question() else {
        return;
    };
    if question.question.trim().is_empty() {
        app.set_status("Question has no text to search for");
        return;
    }
    let url = match web_search_url(site, &question.question) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to build web search URL");
            app.set_status(format!("Cannot build search link: {}", e));
            return;
        }
    };
    if let Err(e) = open::that(url.as_str()) {
        tracing::warn!(url = %url, error = %e, "Failed to open browser");
        app.set_status(format!("Failed to open browser: {}", e));
    } else {
        app.set_status(format!("Opened {} in browser", site.name()));
    }
}
