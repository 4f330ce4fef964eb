//! Filter, count and paginate engine.
//!
//! Everything here is a pure function of the record set and a [`BrowseState`].
//! The UI recomputes a [`DerivedView`] eagerly after every input change, then
//! calls [`BrowseState::reconcile`] so an out-of-range page snaps back to 1.

use std::ops::Range;

use crate::question::{CategoryCount, Question, ALL_CATEGORY, CATEGORIES};

/// Number of questions shown per page.
pub const PAGE_SIZE: usize = 8;

// ============================================================================
// View State
// ============================================================================

/// User-controlled inputs to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseState {
    pub search_term: String,
    pub category: String,
    /// Requested page, 1-based. May be out of range until reconciled.
    pub page: usize,
}

impl Default for BrowseState {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            category: ALL_CATEGORY.to_string(),
            page: 1,
        }
    }
}

impl BrowseState {
    /// Replace the search term. The page is left for `reconcile` to correct.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// Select a category: resets to page 1 and clears any search term.
    pub fn select_category(&mut self, category: impl Into<String>) {
        self.category = category.into();
        self.page = 1;
        self.search_term.clear();
    }

    /// Move to `page` if it lies within `1..=total_pages`.
    ///
    /// Returns true for any in-range request, including the current page,
    /// which is the caller's cue to scroll back to the top of the list.
    pub fn request_page(&mut self, page: usize, total_pages: usize) -> bool {
        if page < 1 || page > total_pages {
            return false;
        }
        self.page = page;
        true
    }

    pub fn next_page(&mut self, view: &DerivedView) -> bool {
        self.request_page(view.current_page + 1, view.total_pages)
    }

    pub fn prev_page(&mut self, view: &DerivedView) -> bool {
        self.request_page(view.current_page.saturating_sub(1), view.total_pages)
    }

    pub fn first_page(&mut self, view: &DerivedView) -> bool {
        self.request_page(1, view.total_pages)
    }

    pub fn last_page(&mut self, view: &DerivedView) -> bool {
        self.request_page(view.total_pages, view.total_pages)
    }

    /// Reset the requested page to 1 when it exceeds the available pages.
    ///
    /// This is a reset, not a clamp: a user on page 5 whose filter narrows to
    /// two pages lands on page 1. Returns true if the page was reset.
    pub fn reconcile(&mut self, total_pages: usize) -> bool {
        if total_pages > 0 && self.page > total_pages {
            tracing::debug!(
                requested = self.page,
                total_pages,
                "Requested page out of range, resetting to 1"
            );
            self.page = 1;
            return true;
        }
        false
    }
}

// ============================================================================
// Pagination Tokens
// ============================================================================

/// One entry in the pagination strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageToken {
    Page(usize),
    Ellipsis,
}

// ============================================================================
// Derived View
// ============================================================================

/// Everything the UI needs to draw the list for the current inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivedView {
    /// Indices into the record set, in record-set order.
    pub filtered: Vec<usize>,
    pub total_pages: usize,
    /// Clamped page, always within `1..=max(1, total_pages)`.
    pub current_page: usize,
    /// Range into `filtered` for the visible page.
    pub page_range: Range<usize>,
    pub buttons: Vec<PageToken>,
}

impl DerivedView {
    /// Number of records passing the filter.
    pub fn total(&self) -> usize {
        self.filtered.len()
    }

    /// Record indices visible on the current page.
    pub fn page_indices(&self) -> &[usize] {
        &self.filtered[self.page_range.clone()]
    }

    /// Zero-based offset of the first visible record within the filtered set.
    pub fn start_index(&self) -> usize {
        self.current_page.saturating_sub(1) * PAGE_SIZE
    }

    /// "Showing a-b of n questions".
    ///
    /// Mirrors the page arithmetic even for an empty result ("Showing 1-0 of 0").
    pub fn showing_label(&self) -> String {
        let start = self.start_index();
        format!(
            "Showing {}-{} of {} questions",
            start + 1,
            (start + PAGE_SIZE).min(self.total()),
            self.total()
        )
    }

    /// "Page x of y".
    pub fn page_label(&self) -> String {
        format!("Page {} of {}", self.current_page, self.total_pages)
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

// ============================================================================
// Pure Operations
// ============================================================================

/// Does `question` pass the search and category filters?
///
/// `needle_lower` must already be lowercased.
pub fn matches(question: &Question, needle_lower: &str, category: &str) -> bool {
    let matches_search = needle_lower.is_empty()
        || question.question.to_lowercase().contains(needle_lower)
        || question.answer.to_lowercase().contains(needle_lower);
    let matches_category = category == ALL_CATEGORY || question.category == category;
    matches_search && matches_category
}

/// Indices of records passing the filters, in input order.
pub fn filter(records: &[Question], search_term: &str, category: &str) -> Vec<usize> {
    let needle = search_term.to_lowercase();
    records
        .iter()
        .enumerate()
        .filter(|(_, q)| matches(q, &needle, category))
        .map(|(i, _)| i)
        .collect()
}

/// Per-category record counts over the full, unfiltered record set.
pub fn category_counts(records: &[Question]) -> Vec<CategoryCount> {
    CATEGORIES
        .iter()
        .map(|category| CategoryCount {
            category,
            count: if category.id == ALL_CATEGORY {
                records.len()
            } else {
                records.iter().filter(|q| q.category == category.id).count()
            },
        })
        .collect()
}

/// `ceil(filtered_len / PAGE_SIZE)`; zero when nothing matched.
pub fn page_count(filtered_len: usize) -> usize {
    filtered_len.div_ceil(PAGE_SIZE)
}

/// Clamp a requested page into `1..=max(1, total_pages)`.
pub fn clamp_page(requested: usize, total_pages: usize) -> usize {
    requested.clamp(1, total_pages.max(1))
}

/// Range into the filtered set for `page`.
pub fn page_range(page: usize, filtered_len: usize) -> Range<usize> {
    let start = (page.max(1) - 1).saturating_mul(PAGE_SIZE).min(filtered_len);
    let end = start.saturating_add(PAGE_SIZE).min(filtered_len);
    start..end
}

/// Build the pagination strip for `total_pages` with `current` highlighted.
///
/// Always the first page, a window of one page either side of `current`,
/// ellipses over gaps, and the last page. Empty for a single page.
pub fn pagination_buttons(total_pages: usize, current: usize) -> Vec<PageToken> {
    let mut buttons = Vec::new();
    if total_pages <= 1 {
        return buttons;
    }

    buttons.push(PageToken::Page(1));
    let start = current.saturating_sub(1).max(2);
    let end = (current + 1).min(total_pages - 1);

    if start > 2 {
        buttons.push(PageToken::Ellipsis);
    }
    buttons.extend((start..=end).map(PageToken::Page));
    if end < total_pages - 1 {
        buttons.push(PageToken::Ellipsis);
    }
    buttons.push(PageToken::Page(total_pages));

    buttons
}

/// Compute the full derived view for `records` under `state`.
pub fn derive_view(records: &[Question], state: &BrowseState) -> DerivedView {
    let filtered = filter(records, &state.search_term, &state.category);
    let total_pages = page_count(filtered.len());
    let current_page = clamp_page(state.page, total_pages);
    let page_range = page_range(current_page, filtered.len());
    let buttons = pagination_buttons(total_pages, current_page);

    DerivedView {
        filtered,
        total_pages,
        current_page,
        page_range,
        buttons,
    }
}

// ============================================================================
// Tests
// ============================================================================
