//! Theme system for the TUI.
//!
//! Provides semantic color roles that map to ratatui `Style` values.
//! The `ThemeVariant` enum selects between Light and Dark palettes,
//! `StyleMap` resolves role names to concrete styles, and `ThemeStore`
//! owns the persisted choice and notifies subscribers when it changes.

use anyhow::Result;
use ratatui::style::{Color, Modifier, Style};
use std::collections::HashMap;
use tokio::sync::watch;

use crate::storage::Database;

/// Preference key holding the persisted theme name.
pub const THEME_PREF_KEY: &str = "theme";

// ============================================================================
// Theme Variant
// ============================================================================

/// Available theme variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeVariant {
    #[default]
    Light,
    Dark,
}

impl ThemeVariant {
    /// Parse a variant name from a string (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    /// Stored form: `"light"` or `"dark"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Build the `ColorPalette` for this variant.
    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Light => ColorPalette::light(),
            Self::Dark => ColorPalette::dark(),
        }
    }

    /// Toggle: Light → Dark → Light.
    pub fn next(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Human-readable name for status display.
    pub fn name(self) -> &'static str {
        match self {
            Self::Light => "Light",
            Self::Dark => "Dark",
        }
    }
}

// ============================================================================
// Color Palette: semantic roles to Style
// ============================================================================

/// A complete color palette mapping every semantic UI role to a `Style`.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Header --
    pub header_title: Style,
    pub header_tagline: Style,
    pub note_label: Style,
    pub note_text: Style,
    pub note_border: Style,

    // -- Search --
    pub search_text: Style,
    pub search_placeholder: Style,

    // -- Category chips --
    pub chip_normal: Style,
    pub chip_selected: Style,

    // -- Summary line --
    pub summary: Style,
    pub page_badge: Style,

    // -- Question list --
    pub question_number: Style,
    pub question_text: Style,
    pub question_selected: Style,
    pub category_badge: Style,
    pub difficulty_easy: Style,
    pub difficulty_medium: Style,
    pub difficulty_hard: Style,
    pub difficulty_unknown: Style,
    pub empty_state: Style,

    // -- Answer body --
    pub answer_body: Style,
    pub answer_heading: Style,
    pub answer_code_block: Style,
    pub answer_inline_code: Style,
    pub answer_emphasis: Style,
    pub answer_strong: Style,
    pub answer_image: Style,

    // -- Pagination --
    pub page_current: Style,
    pub page_normal: Style,
    pub page_disabled: Style,

    // -- Chrome --
    pub status_bar: Style,
    pub panel_border: Style,
    pub panel_border_focused: Style,
    pub loading: Style,
}

impl ColorPalette {
    /// Light palette, the default: blue accents on the terminal background.
    fn light() -> Self {
        Self {
            header_title: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            header_tagline: Style::default().fg(Color::DarkGray),
            note_label: Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
            note_text: Style::default().fg(Color::Blue),
            note_border: Style::default().fg(Color::Yellow),

            search_text: Style::default().fg(Color::Black),
            search_placeholder: Style::default().fg(Color::Gray),

            chip_normal: Style::default().fg(Color::DarkGray),
            chip_selected: Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),

            summary: Style::default().fg(Color::DarkGray),
            page_badge: Style::default().fg(Color::Black),

            question_number: Style::default().fg(Color::Blue),
            question_text: Style::default().fg(Color::Blue),
            question_selected: Style::default().bg(Color::Blue).fg(Color::White),
            category_badge: Style::default().fg(Color::DarkGray),
            difficulty_easy: Style::default().fg(Color::Green),
            difficulty_medium: Style::default().fg(Color::Yellow),
            difficulty_hard: Style::default().fg(Color::Red),
            difficulty_unknown: Style::default().fg(Color::DarkGray),
            empty_state: Style::default().fg(Color::DarkGray),

            answer_body: Style::default().fg(Color::Black),
            answer_heading: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            answer_code_block: Style::default().fg(Color::DarkGray).bg(Color::White),
            answer_inline_code: Style::default().fg(Color::Magenta),
            answer_emphasis: Style::default().add_modifier(Modifier::ITALIC),
            answer_strong: Style::default().add_modifier(Modifier::BOLD),
            answer_image: Style::default().fg(Color::Blue),

            page_current: Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            page_normal: Style::default().fg(Color::Black),
            page_disabled: Style::default().fg(Color::Gray),

            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            panel_border: Style::default().fg(Color::DarkGray),
            panel_border_focused: Style::default().fg(Color::Blue),
            loading: Style::default().fg(Color::Blue),
        }
    }

    /// Dark palette, adapted for dark terminal backgrounds.
    fn dark() -> Self {
        Self {
            header_title: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            header_tagline: Style::default().fg(Color::Gray),
            note_label: Style::default()
                .fg(Color::LightRed)
                .add_modifier(Modifier::BOLD),
            note_text: Style::default().fg(Color::LightBlue),
            note_border: Style::default().fg(Color::Yellow),

            search_text: Style::default(),
            search_placeholder: Style::default().fg(Color::DarkGray),

            chip_normal: Style::default().fg(Color::Gray),
            chip_selected: Style::default()
                .bg(Color::Cyan)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),

            summary: Style::default().fg(Color::Gray),
            page_badge: Style::default(),

            question_number: Style::default().fg(Color::Cyan),
            question_text: Style::default().fg(Color::LightBlue),
            question_selected: Style::default().bg(Color::DarkGray).fg(Color::White),
            category_badge: Style::default().fg(Color::Gray),
            difficulty_easy: Style::default().fg(Color::LightGreen),
            difficulty_medium: Style::default().fg(Color::LightYellow),
            difficulty_hard: Style::default().fg(Color::LightRed),
            difficulty_unknown: Style::default().fg(Color::Gray),
            empty_state: Style::default().fg(Color::Gray),

            answer_body: Style::default(),
            answer_heading: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            answer_code_block: Style::default().fg(Color::Yellow).bg(Color::Black),
            answer_inline_code: Style::default().fg(Color::Yellow),
            answer_emphasis: Style::default().add_modifier(Modifier::ITALIC),
            answer_strong: Style::default().add_modifier(Modifier::BOLD),
            answer_image: Style::default().fg(Color::Blue),

            page_current: Style::default()
                .bg(Color::Cyan)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            page_normal: Style::default(),
            page_disabled: Style::default().fg(Color::DarkGray),

            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            panel_border: Style::default(),
            panel_border_focused: Style::default().fg(Color::Cyan),
            loading: Style::default().fg(Color::Cyan),
        }
    }

    /// Every role paired with its style, in declaration order.
    fn roles(&self) -> [(&'static str, Style); ROLE_COUNT] {
        [
            ("header_title", self.header_title),
            ("header_tagline", self.header_tagline),
            ("note_label", self.note_label),
            ("note_text", self.note_text),
            ("note_border", self.note_border),
            ("search_text", self.search_text),
            ("search_placeholder", self.search_placeholder),
            ("chip_normal", self.chip_normal),
            ("chip_selected", self.chip_selected),
            ("summary", self.summary),
            ("page_badge", self.page_badge),
            ("question_number", self.question_number),
            ("question_text", self.question_text),
            ("question_selected", self.question_selected),
            ("category_badge", self.category_badge),
            ("difficulty_easy", self.difficulty_easy),
            ("difficulty_medium", self.difficulty_medium),
            ("difficulty_hard", self.difficulty_hard),
            ("difficulty_unknown", self.difficulty_unknown),
            ("empty_state", self.empty_state),
            ("answer_body", self.answer_body),
            ("answer_heading", self.answer_heading),
            ("answer_code_block", self.answer_code_block),
            ("answer_inline_code", self.answer_inline_code),
            ("answer_emphasis", self.answer_emphasis),
            ("answer_strong", self.answer_strong),
            ("answer_image", self.answer_image),
            ("page_current", self.page_current),
            ("page_normal", self.page_normal),
            ("page_disabled", self.page_disabled),
            ("status_bar", self.status_bar),
            ("panel_border", self.panel_border),
            ("panel_border_focused", self.panel_border_focused),
            ("loading", self.loading),
        ]
    }
}

/// Number of semantic roles in a `ColorPalette`.
const ROLE_COUNT: usize = 34;

// ============================================================================
// Style Map: string-keyed lookup
// ============================================================================

/// String-keyed style lookup built from a `ColorPalette`.
///
/// Resolves role names (e.g. `"answer_heading"`) to their concrete `Style`
/// at render time. Replacing the map swaps every role at once.
#[derive(Debug, Clone)]
pub struct StyleMap {
    variant: ThemeVariant,
    map: HashMap<&'static str, Style>,
}

impl StyleMap {
    /// Build the `StyleMap` for a variant.
    pub fn for_variant(variant: ThemeVariant) -> Self {
        let palette = variant.palette();
        let map = palette.roles().into_iter().collect();
        Self { variant, map }
    }

    /// Variant this map was built from.
    pub fn variant(&self) -> ThemeVariant {
        self.variant
    }

    /// Resolve a role name to its `Style`. Returns `Style::default()` for unknown roles.
    pub fn resolve(&self, role: &str) -> Style {
        self.map.get(role).copied().unwrap_or_default()
    }
}

// ============================================================================
// Theme Store
// ============================================================================

/// Owned, persisted theme choice.
///
/// Initialized from the `theme` preference, falling back to a default.
/// `set` notifies every subscriber and then writes the new value through to
/// the preference database.
pub struct ThemeStore {
    db: Database,
    tx: watch::Sender<ThemeVariant>,
}

impl ThemeStore {
    /// Load the stored theme, defaulting to `ThemeVariant::default()` (Light).
    pub async fn load(db: Database) -> Self {
        Self::load_or(db, ThemeVariant::default()).await
    }

    /// Load the stored theme, falling back to `default` when nothing valid is stored.
    pub async fn load_or(db: Database, default: ThemeVariant) -> Self {
        let variant = match db.get_preference(THEME_PREF_KEY).await {
            Ok(Some(stored)) => ThemeVariant::from_str_name(&stored).unwrap_or_else(|| {
                tracing::warn!(stored = %stored, "Unknown stored theme, using default");
                default
            }),
            Ok(None) => default,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored theme, using default");
                default
            }
        };
        tracing::debug!(theme = variant.as_str(), "Theme store initialized");

        let (tx, _rx) = watch::channel(variant);
        Self { db, tx }
    }

    /// Current theme.
    pub fn get(&self) -> ThemeVariant {
        *self.tx.borrow()
    }

    /// Receiver that observes every subsequent `set`.
    pub fn subscribe(&self) -> watch::Receiver<ThemeVariant> {
        self.tx.subscribe()
    }

    /// Change the theme and persist it.
    ///
    /// Subscribers are notified even if persisting fails; the error is
    /// returned so the caller can surface it.
    pub async fn set(&self, variant: ThemeVariant) -> Result<()> {
        self.tx.send_replace(variant);
        self.db
            .set_preference(THEME_PREF_KEY, variant.as_str())
            .await?;
        tracing::info!(theme = variant.as_str(), "Theme changed");
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
