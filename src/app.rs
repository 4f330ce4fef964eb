use crate::engine::{category_counts, derive_view, BrowseState, DerivedView};
use crate::keybindings::KeybindingRegistry;
use crate::loader::QuestionSource;
use crate::question::{CategoryCount, Question, ALL_CATEGORY, CATEGORIES};
use crate::theme::{StyleMap, ThemeStore, ThemeVariant};
use ratatui::style::Style;
use std::borrow::Cow;
use std::collections::HashSet;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// How long a status message stays on the status bar.
const STATUS_TTL: Duration = Duration::from_secs(3);

// ============================================================================
// Events
// ============================================================================

/// Events from background tasks
#[derive(Debug)]
pub enum AppEvent {
    /// The one-shot question load settled. Errors are pre-rendered strings.
    QuestionsLoaded(Result<Vec<Question>, String>),
    /// A background task panicked.
    ///
    /// Fields:
    /// - `task`: Name of the task that panicked (e.g., "load_questions")
    /// - `error`: The panic message extracted from the panic payload
    TaskPanicked { task: &'static str, error: String },
}

/// Which widget receives typed characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    List,
    Search,
}

// ============================================================================
// Application State
// ============================================================================

/// Central application state
pub struct App {
    pub http_client: reqwest::Client,
    pub source: QuestionSource,

    // Theme
    pub theme_store: ThemeStore,
    theme_rx: watch::Receiver<ThemeVariant>,
    /// Active style map for all UI rendering. Replaced wholesale on theme change.
    pub theme: StyleMap,

    pub keybindings: KeybindingRegistry,

    // Question data
    /// Sorted record set. Empty until the load settles, and on load failure.
    pub questions: Vec<Question>,
    /// True until the initial load settles either way.
    pub loading: bool,
    pub load_error: Option<String>,
    pub load_handle: Option<JoinHandle<()>>,

    // Browsing
    pub browse: BrowseState,
    /// Recomputed by `refresh_view` after every input change.
    pub view: DerivedView,
    pub category_counts: Vec<CategoryCount>,
    pub focus: Focus,
    /// Digits typed into the go-to-page prompt; `None` when it is closed.
    pub page_input: Option<String>,
    /// Selected row within the current page.
    pub selected: usize,
    /// First visible line of the accordion.
    pub list_scroll: usize,
    /// Ids of questions whose answer is open. Several may be open at once.
    pub expanded: HashSet<String>,

    // Chrome
    pub status_message: Option<(Cow<'static, str>, Instant)>,
    pub show_help: bool,
    pub help_scroll_offset: usize,
    pub needs_redraw: bool,
    pub spinner_frame: usize,
}

impl App {
    pub fn new(
        theme_store: ThemeStore,
        http_client: reqwest::Client,
        source: QuestionSource,
    ) -> Self {
        let theme_rx = theme_store.subscribe();
        let theme = StyleMap::for_variant(theme_store.get());

        Self {
            http_client,
            source,
            theme_store,
            theme_rx,
            theme,
            keybindings: KeybindingRegistry::new(),
            questions: Vec::new(),
            loading: true,
            load_error: None,
            load_handle: None,
            browse: BrowseState::default(),
            view: DerivedView::default(),
            category_counts: category_counts(&[]),
            focus: Focus::List,
            page_input: None,
            selected: 0,
            list_scroll: 0,
            expanded: HashSet::new(),
            status_message: None,
            show_help: false,
            help_scroll_offset: 0,
            needs_redraw: true,
            spinner_frame: 0,
        }
    }

    /// Resolve a semantic role name to its `Style`.
    pub fn style(&self, role: &str) -> Style {
        self.theme.resolve(role)
    }

    // ========================================================================
    // Theme
    // ========================================================================

    /// Pick up a theme change published by the store.
    ///
    /// Returns true if the style map was replaced.
    pub fn sync_theme(&mut self) -> bool {
        if !self.theme_rx.has_changed().unwrap_or(false) {
            return false;
        }
        let variant = *self.theme_rx.borrow_and_update();
        if variant == self.theme.variant() {
            return false;
        }
        self.theme = StyleMap::for_variant(variant);
        self.needs_redraw = true;
        tracing::debug!(theme = variant.as_str(), "Applied theme");
        true
    }

    /// Flip between light and dark, persisting the choice.
    ///
    /// The new theme is applied even when saving fails; the failure is
    /// reported on the status bar.
    pub async fn toggle_theme(&mut self) -> ThemeVariant {
        let next = self.theme_store.get().next();
        match self.theme_store.set(next).await {
            Ok(()) => self.set_status(format!("{} theme", next.name())),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to save theme preference");
                self.set_status(format!("{} theme (not saved: {})", next.name(), e));
            }
        }
        self.sync_theme();
        next
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Install the result of the question load.
    pub fn apply_loaded(&mut self, result: Result<Vec<Question>, String>) {
        self.loading = false;
        self.load_handle = None;
        match result {
            Ok(questions) => {
                self.questions = questions;
                self.load_error = None;
            }
            Err(e) => {
                tracing::error!(source = %self.source, error = %e, "Failed to load questions");
                self.questions.clear();
                self.set_status(format!("Failed to load questions: {}", e));
                self.load_error = Some(e);
            }
        }
        self.category_counts = category_counts(&self.questions);
        self.expanded.clear();
        self.refresh_view();
        self.reset_scroll();
    }

    /// Settle the loading state after the load task died.
    pub fn abandon_load(&mut self, error: &str) {
        self.apply_loaded(Err(format!("internal error: {}", error)));
    }

    // ========================================================================
    // Derived view
    // ========================================================================

    /// Recompute the derived view, then reset an out-of-range page to 1.
    pub fn refresh_view(&mut self) {
        self.view = derive_view(&self.questions, &self.browse);
        if self.browse.reconcile(self.view.total_pages) {
            self.view = derive_view(&self.questions, &self.browse);
            self.reset_scroll();
        }
        let rows = self.view.page_indices().len();
        if self.selected >= rows {
            self.selected = rows.saturating_sub(1);
        }
        self.needs_redraw = true;
    }

    /// Back to the first row of the page.
    pub fn reset_scroll(&mut self) {
        self.selected = 0;
        self.list_scroll = 0;
    }

    /// Replace the search term. The page is left to `refresh_view`.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.browse.set_search(term);
        self.refresh_view();
        self.reset_scroll();
    }

    /// Select a category; clears the search and returns to page 1.
    pub fn select_category(&mut self, id: &str) {
        self.browse.select_category(id);
        self.refresh_view();
        self.reset_scroll();
    }

    fn category_position(&self) -> usize {
        CATEGORIES
            .iter()
            .position(|c| c.id == self.browse.category)
            .unwrap_or(0)
    }

    pub fn next_category(&mut self) {
        let next = (self.category_position() + 1) % CATEGORIES.len();
        self.select_category(CATEGORIES[next].id);
    }

    pub fn prev_category(&mut self) {
        let pos = self.category_position();
        let prev = pos.checked_sub(1).unwrap_or(CATEGORIES.len() - 1);
        self.select_category(CATEGORIES[prev].id);
    }

    pub fn all_category(&mut self) {
        self.select_category(ALL_CATEGORY);
    }

    // ========================================================================
    // Pagination
    // ========================================================================

    fn change_page(&mut self, apply: impl FnOnce(&mut BrowseState, &DerivedView) -> bool) -> bool {
        if !apply(&mut self.browse, &self.view) {
            return false;
        }
        self.refresh_view();
        self.reset_scroll();
        true
    }

    /// Jump to a page. Out-of-range pages are ignored.
    pub fn request_page(&mut self, page: usize) -> bool {
        self.change_page(|b, v| b.request_page(page, v.total_pages))
    }

    /// Close the page prompt and jump to the page it holds.
    ///
    /// Pages outside `1..=total_pages` are ignored with a status message.
    pub fn submit_page_input(&mut self) -> bool {
        let Some(input) = self.page_input.take() else {
            return false;
        };
        if input.is_empty() {
            return false;
        }
        let page = input.parse::<usize>().unwrap_or(0);
        if self.request_page(page) {
            return true;
        }
        self.set_status(format!(
            "No page {} (1-{})",
            input,
            self.view.total_pages.max(1)
        ));
        false
    }

    pub fn next_page(&mut self) -> bool {
        self.change_page(BrowseState::next_page)
    }

    pub fn prev_page(&mut self) -> bool {
        self.change_page(BrowseState::prev_page)
    }

    pub fn first_page(&mut self) -> bool {
        self.change_page(BrowseState::first_page)
    }

    pub fn last_page(&mut self) -> bool {
        self.change_page(BrowseState::last_page)
    }

    // ========================================================================
    // Question list
    // ========================================================================

    /// Questions on the current page, in display order.
    pub fn page_questions(&self) -> impl Iterator<Item = &Question> + '_ {
        self.view
            .page_indices()
            .iter()
            .filter_map(|&i| self.questions.get(i))
    }

    pub fn selected_question(&self) -> Option<&Question> {
        let idx = *self.view.page_indices().get(self.selected)?;
        self.questions.get(idx)
    }

    pub fn nav_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn nav_down(&mut self) {
        let rows = self.view.page_indices().len();
        if rows > 0 {
            self.selected = (self.selected + 1).min(rows - 1);
        }
    }

    pub fn is_expanded(&self, question: &Question) -> bool {
        self.expanded.contains(&question.id)
    }

    /// Open or close the selected answer. Returns the new open state.
    pub fn toggle_answer(&mut self) -> Option<bool> {
        let id = self.selected_question()?.id.clone();
        let open = if self.expanded.remove(&id) {
            false
        } else {
            self.expanded.insert(id);
            true
        };
        Some(open)
    }

    /// Open every answer on the current page.
    pub fn expand_all(&mut self) {
        let ids: Vec<String> = self.page_questions().map(|q| q.id.clone()).collect();
        self.expanded.extend(ids);
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
        self.list_scroll = 0;
    }

    // ========================================================================
    // Status
    // ========================================================================

    /// Set status message (will auto-expire after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear status message if expired.
    /// Returns true if a message was actually cleared
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed() >= STATUS_TTL {
                self.status_message = None;
                return true;
            }
        }
        false
    }
}

/// Abort the load task if the UI exits before it settles.
impl Drop for App {
    fn drop(&mut self) {
        if let Some(handle) = self.load_handle.take() {
            handle.abort();
            tracing::debug!("Aborted question load on App drop");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::Difficulty;
    use crate::storage::Database;
    use crate::theme::THEME_PREF_KEY;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;
    use tokio::time;

    async fn test_app_with_db(db: Database) -> App {
        let store = ThemeStore::load(db).await;
        App::new(
            store,
            reqwest::Client::new(),
            QuestionSource::File(PathBuf::from("questions.json")),
        )
    }

    async fn test_app() -> App {
        test_app_with_db(Database::open(":memory:").await.unwrap()).await
    }

    fn q(id: usize, category: &str, text: &str) -> Question {
        Question {
            id: id.to_string(),
            category: category.to_string(),
            question: text.to_string(),
            answer: format!("answer {}", id),
            difficulty: Difficulty::Easy,
        }
    }

    /// 15 react questions followed by 5 css questions.
    fn sample() -> Vec<Question> {
        (0..20)
            .map(|i| {
                let cat = if i < 15 { "react" } else { "css" };
                q(i, cat, &format!("question {:02}", i))
            })
            .collect()
    }

    async fn loaded_app() -> App {
        let mut app = test_app().await;
        app.apply_loaded(Ok(sample()));
        app
    }

    #[tokio::test]
    async fn test_new_app_is_loading() {
        let app = test_app().await;
        assert!(app.loading);
        assert_eq!(app.view.total(), 0);
        assert_eq!(app.theme.variant(), ThemeVariant::Light);
        assert_eq!(app.category_counts[0].count, 0);
    }

    #[tokio::test]
    async fn test_apply_loaded_builds_view() {
        let app = loaded_app().await;
        assert!(!app.loading);
        assert_eq!(app.view.total(), 20);
        assert_eq!(app.view.total_pages, 3);
        assert_eq!(app.view.page_indices().len(), 8);
        assert_eq!(app.category_counts[0].count, 20);
        let react = app
            .category_counts
            .iter()
            .find(|c| c.category.id == "react")
            .unwrap();
        assert_eq!(react.count, 15);
    }

    #[tokio::test]
    async fn test_apply_loaded_error_leaves_empty_set() {
        let mut app = test_app().await;
        app.apply_loaded(Err("HTTP 404".to_string()));
        assert!(!app.loading);
        assert!(app.questions.is_empty());
        assert_eq!(app.load_error.as_deref(), Some("HTTP 404"));
        assert_eq!(app.view.showing_label(), "Showing 1-0 of 0 questions");
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert!(msg.contains("HTTP 404"));
    }

    #[tokio::test]
    async fn test_category_change_resets_page_and_search() {
        let mut app = loaded_app().await;
        assert!(app.last_page());
        assert_eq!(app.browse.page, 3);
        app.browse.search_term = "question".to_string();

        app.select_category("css");
        assert_eq!(app.browse.page, 1);
        assert_eq!(app.browse.search_term, "");
        assert_eq!(app.view.total(), 5);
        assert_eq!(app.view.total_pages, 1);
    }

    #[tokio::test]
    async fn test_reselecting_active_category_returns_to_first_page() {
        let mut app = loaded_app().await;
        assert!(app.last_page());
        app.nav_down();

        app.all_category();
        assert_eq!(app.browse.category, ALL_CATEGORY);
        assert_eq!(app.browse.page, 1);
        assert_eq!(app.view.current_page, 1);
        assert_eq!(app.selected, 0);
    }

    #[tokio::test]
    async fn test_requesting_current_page_scrolls_to_top() {
        let mut app = loaded_app().await;
        app.nav_down();
        app.list_scroll = 4;

        assert!(app.request_page(1));
        assert_eq!(app.browse.page, 1);
        assert_eq!(app.selected, 0);
        assert_eq!(app.list_scroll, 0);
    }

    #[tokio::test]
    async fn test_page_prompt_jumps_to_typed_page() {
        let mut app = loaded_app().await;
        app.page_input = Some("2".to_string());
        assert!(app.submit_page_input());
        assert_eq!(app.browse.page, 2);
        assert!(app.page_input.is_none());
    }

    #[tokio::test]
    async fn test_page_prompt_ignores_out_of_range() {
        let mut app = loaded_app().await;
        app.page_input = Some("7".to_string());
        assert!(!app.submit_page_input());
        assert_eq!(app.browse.page, 1);
        assert!(app.page_input.is_none());
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert_eq!(msg, "No page 7 (1-3)");

        app.page_input = Some(String::new());
        assert!(!app.submit_page_input());
    }

    #[tokio::test]
    async fn test_search_past_last_page_resets_to_first() {
        let mut app = loaded_app().await;
        app.request_page(3);
        app.set_search("question 0");
        // "question 00".."question 09" -> 10 results, 2 pages; page 3 is gone
        assert_eq!(app.view.total(), 10);
        assert_eq!(app.browse.page, 1);
        assert_eq!(app.view.current_page, 1);
    }

    #[tokio::test]
    async fn test_page_change_scrolls_to_top() {
        let mut app = loaded_app().await;
        app.nav_down();
        app.nav_down();
        app.list_scroll = 5;

        assert!(app.next_page());
        assert_eq!(app.browse.page, 2);
        assert_eq!(app.selected, 0);
        assert_eq!(app.list_scroll, 0);
    }

    #[tokio::test]
    async fn test_out_of_range_page_ignored() {
        let mut app = loaded_app().await;
        assert!(!app.request_page(0));
        assert!(!app.request_page(4));
        assert!(!app.prev_page());
        assert_eq!(app.browse.page, 1);
    }

    #[tokio::test]
    async fn test_nav_clamps_to_page_rows() {
        let mut app = loaded_app().await;
        app.last_page();
        // Page 3 holds 4 rows
        for _ in 0..10 {
            app.nav_down();
        }
        assert_eq!(app.selected, 3);
        assert_eq!(app.selected_question().unwrap().id, "19");
        app.nav_up();
        assert_eq!(app.selected, 2);
    }

    #[tokio::test]
    async fn test_nav_on_empty_view() {
        let mut app = test_app().await;
        app.apply_loaded(Ok(Vec::new()));
        app.nav_down();
        assert_eq!(app.selected, 0);
        assert!(app.selected_question().is_none());
        assert!(app.toggle_answer().is_none());
    }

    #[tokio::test]
    async fn test_toggle_answer_allows_several_open() {
        let mut app = loaded_app().await;
        assert_eq!(app.toggle_answer(), Some(true));
        app.nav_down();
        assert_eq!(app.toggle_answer(), Some(true));
        assert_eq!(app.expanded.len(), 2);

        assert_eq!(app.toggle_answer(), Some(false));
        assert_eq!(app.expanded.len(), 1);
    }

    #[tokio::test]
    async fn test_expand_and_collapse_all() {
        let mut app = loaded_app().await;
        app.expand_all();
        assert_eq!(app.expanded.len(), 8);
        assert!(app.page_questions().all(|q| app.is_expanded(q)));
        app.collapse_all();
        assert!(app.expanded.is_empty());
    }

    #[tokio::test]
    async fn test_category_cycle_wraps() {
        let mut app = loaded_app().await;
        app.prev_category();
        assert_eq!(app.browse.category, "other");
        app.next_category();
        assert_eq!(app.browse.category, ALL_CATEGORY);
        app.next_category();
        assert_eq!(app.browse.category, "react");
        app.all_category();
        assert_eq!(app.browse.category, ALL_CATEGORY);
    }

    #[tokio::test]
    async fn test_toggle_theme_applies_and_persists() {
        let db = Database::open(":memory:").await.unwrap();
        let mut app = test_app_with_db(db.clone()).await;

        let variant = app.toggle_theme().await;
        assert_eq!(variant, ThemeVariant::Dark);
        assert_eq!(app.theme.variant(), ThemeVariant::Dark);
        assert_eq!(
            db.get_preference(THEME_PREF_KEY).await.unwrap(),
            Some("dark".to_string())
        );

        app.toggle_theme().await;
        assert_eq!(app.theme.variant(), ThemeVariant::Light);
    }

    #[tokio::test]
    async fn test_sync_theme_sees_external_set() {
        let mut app = test_app().await;
        assert!(!app.sync_theme());
        app.theme_store.set(ThemeVariant::Dark).await.unwrap();
        assert!(app.sync_theme());
        assert_eq!(app.theme.variant(), ThemeVariant::Dark);
        assert!(!app.sync_theme());
    }

    #[tokio::test]
    async fn test_status_expires_after_3_seconds() {
        // Create app before pausing time to avoid DB connection timeout
        let mut app = test_app().await;
        time::pause();
        app.set_status("Test message");

        time::advance(Duration::from_secs(2)).await;
        assert!(!app.clear_expired_status());
        assert!(app.status_message.is_some());

        time::advance(Duration::from_secs(2)).await;
        assert!(app.clear_expired_status());
        assert!(app.status_message.is_none());
    }
}
