//! Keybinding registry: maps actions to key events with config overrides.
//!
//! Defaults are registered per context; the `[keybindings]` table in
//! config.toml rebinds an action to a different key in every context it
//! already lives in.
use crossterm::event::{KeyCode, KeyModifiers};
use std::collections::HashMap;

// ============================================================================
// Action Enum
// ============================================================================

/// All user-facing actions that can be triggered by keybindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    NavDown,
    NavUp,
    ToggleAnswer,
    ExpandAll,
    CollapseAll,
    NextPage,
    PrevPage,
    FirstPage,
    LastPage,
    NextCategory,
    PrevCategory,
    AllCategory,
    EnterSearch,
    ExitSearch,
    CommitSearch,
    Back,
    CycleTheme,
    GoToPage,
    OpenWebSearch,
    OpenChatSearch,
    ShowHelp,
}

impl Action {
    /// Human-readable description for the help screen.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Quit => "Quit application",
            Self::NavDown => "Select next question",
            Self::NavUp => "Select previous question",
            Self::ToggleAnswer => "Show / hide answer",
            Self::ExpandAll => "Expand every answer on the page",
            Self::CollapseAll => "Collapse every answer",
            Self::NextPage => "Next page",
            Self::PrevPage => "Previous page",
            Self::FirstPage => "First page",
            Self::LastPage => "Last page",
            Self::NextCategory => "Next category",
            Self::PrevCategory => "Previous category",
            Self::AllCategory => "Show all categories",
            Self::EnterSearch => "Search questions",
            Self::ExitSearch => "Clear search and leave search mode",
            Self::CommitSearch => "Keep search and leave search mode",
            Self::Back => "Clear search / dismiss",
            Self::CycleTheme => "Toggle light / dark theme",
            Self::GoToPage => "Go to page number (or type a digit)",
            Self::OpenWebSearch => "Search Google for the question",
            Self::OpenChatSearch => "Ask ChatGPT about the question",
            Self::ShowHelp => "Show help",
        }
    }
}

// ============================================================================
// Context Enum
// ============================================================================

/// Dispatch context: determines which bindings are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    Global,
    List,
    Search,
}

// ============================================================================
// Key Specification
// ============================================================================

/// A key event: code + modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySpec {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeySpec {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    /// Drop SHIFT where the key code already carries it (`'E'`, BackTab).
    /// Terminals disagree on whether to report it.
    fn normalized(self) -> Self {
        match self.code {
            KeyCode::Char(_) | KeyCode::BackTab => {
                Self::new(self.code, self.modifiers.difference(KeyModifiers::SHIFT))
            }
            _ => self,
        }
    }
}

/// Parse a key string from config into a KeySpec.
///
/// Supported formats:
/// - Single char: "q", "j", "/"
/// - Named keys: "Enter", "Esc", "Tab", "BackTab", "Up", "Home", "PageDown"
/// - Modifier combos: "Ctrl+d", "Ctrl+n"
/// - Function keys: "F1" through "F12"
fn parse_key_string(s: &str) -> Option<KeySpec> {
    let s = s.trim();

    if let Some(rest) = s.strip_prefix("Ctrl+") {
        let rest = rest.trim();
        let mut chars = rest.chars();
        return match (chars.next(), chars.next()) {
            (Some(c), None) => Some(KeySpec::ctrl(c)),
            _ => None,
        };
    }

    // Named keys (case-insensitive)
    let named = match s.to_lowercase().as_str() {
        "enter" | "return" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "tab" => Some(KeyCode::Tab),
        "backtab" | "shift+tab" => Some(KeyCode::BackTab),
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        "left" => Some(KeyCode::Left),
        "right" => Some(KeyCode::Right),
        "home" => Some(KeyCode::Home),
        "end" => Some(KeyCode::End),
        "pageup" => Some(KeyCode::PageUp),
        "pagedown" => Some(KeyCode::PageDown),
        "backspace" => Some(KeyCode::Backspace),
        "space" => Some(KeyCode::Char(' ')),
        _ => None,
    };
    if let Some(code) = named {
        return Some(KeySpec::plain(code));
    }

    // Function keys
    if let Some(n) = s
        .strip_prefix(['F', 'f'])
        .and_then(|rest| rest.parse::<u8>().ok())
    {
        return (1..=12)
            .contains(&n)
            .then(|| KeySpec::plain(KeyCode::F(n)));
    }

    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(KeySpec::plain(KeyCode::Char(c))),
        _ => None,
    }
}

/// Format a KeySpec as a human-readable string for the help screen.
fn format_key(key: &KeySpec) -> String {
    let modifier = if key.modifiers.contains(KeyModifiers::CONTROL) {
        "Ctrl+"
    } else {
        ""
    };

    let key_name = match key.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => "Shift+Tab".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::PageUp => "PageUp".to_string(),
        KeyCode::PageDown => "PageDown".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => "?".to_string(),
    };

    format!("{}{}", modifier, key_name)
}

// ============================================================================
// Keybinding Registry
// ============================================================================

/// Registry of keybindings, supporting default bindings and config overrides.
///
/// The same key can map to different actions in different contexts; lookups
/// fall back to `Context::Global`.
pub struct KeybindingRegistry {
    lookup: HashMap<(Context, KeySpec), Action>,
    /// All bindings in registration order, for the help screen.
    bindings: Vec<(Context, KeySpec, Action)>,
}

impl KeybindingRegistry {
    /// Create a registry with the default bindings.
    pub fn new() -> Self {
        let mut registry = Self {
            lookup: HashMap::new(),
            bindings: Vec::new(),
        };
        registry.register_defaults();
        registry
    }

    fn bind(&mut self, context: Context, key: KeySpec, action: Action) {
        self.lookup.insert((context, key), action);
        self.bindings.push((context, key, action));
    }

    fn bind_chars(&mut self, context: Context, chars: &[char], action: Action) {
        for &c in chars {
            self.bind(context, KeySpec::plain(KeyCode::Char(c)), action);
        }
    }

    fn register_defaults(&mut self) {
        use Action::*;
        use Context::{Global, List, Search};

        // === Global ===
        self.bind_chars(Global, &['q'], Quit);
        self.bind(Global, KeySpec::ctrl('c'), Quit);
        self.bind_chars(Global, &['/'], EnterSearch);
        self.bind(Global, KeySpec::plain(KeyCode::Esc), Back);
        self.bind(Global, KeySpec::plain(KeyCode::Tab), NextCategory);
        self.bind(Global, KeySpec::plain(KeyCode::BackTab), PrevCategory);
        self.bind_chars(Global, &['a'], AllCategory);
        self.bind_chars(Global, &['t'], CycleTheme);
        self.bind_chars(Global, &['?'], ShowHelp);

        // === Question list ===
        self.bind_chars(List, &['j'], NavDown);
        self.bind(List, KeySpec::plain(KeyCode::Down), NavDown);
        self.bind_chars(List, &['k'], NavUp);
        self.bind(List, KeySpec::plain(KeyCode::Up), NavUp);

        self.bind(List, KeySpec::plain(KeyCode::Enter), ToggleAnswer);
        self.bind_chars(List, &[' '], ToggleAnswer);
        self.bind_chars(List, &['e'], ExpandAll);
        self.bind_chars(List, &['E'], CollapseAll);

        self.bind_chars(List, &['l', 'n'], NextPage);
        self.bind(List, KeySpec::plain(KeyCode::Right), NextPage);
        self.bind_chars(List, &['h', 'p'], PrevPage);
        self.bind(List, KeySpec::plain(KeyCode::Left), PrevPage);
        self.bind_chars(List, &['g'], FirstPage);
        self.bind(List, KeySpec::plain(KeyCode::Home), FirstPage);
        self.bind_chars(List, &['G'], LastPage);
        self.bind(List, KeySpec::plain(KeyCode::End), LastPage);

        self.bind_chars(List, &[':'], GoToPage);

        self.bind_chars(List, &['o'], OpenWebSearch);
        self.bind_chars(List, &['c'], OpenChatSearch);

        // === Search mode ===
        self.bind(Search, KeySpec::plain(KeyCode::Esc), ExitSearch);
        self.bind(Search, KeySpec::plain(KeyCode::Enter), CommitSearch);
    }

    /// Apply user overrides from config keybindings map.
    ///
    /// Keys in the map are action names (e.g., "quit", "next_page").
    /// Values are key strings (e.g., "q", "Ctrl+n", "F5").
    ///
    /// Returns a list of warnings for unrecognized action names or unparseable keys.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) -> Vec<String> {
        let mut warnings = Vec::new();

        // Sorted so overrides touching the same key resolve the same way every run
        let mut entries: Vec<(&String, &String)> = overrides.iter().collect();
        entries.sort();

        for (action_name, key_str) in entries {
            let Some(action) = parse_action_name(action_name) else {
                warnings.push(format!("Unknown action '{}', ignoring", action_name));
                continue;
            };

            let Some(key) = parse_key_string(key_str) else {
                warnings.push(format!(
                    "Cannot parse key '{}' for action '{}', ignoring",
                    key_str, action_name
                ));
                continue;
            };

            let mut contexts: Vec<Context> = Vec::new();
            for (ctx, _, a) in &self.bindings {
                if *a == action && !contexts.contains(ctx) {
                    contexts.push(*ctx);
                }
            }

            self.lookup.retain(|_, a| *a != action);
            self.bindings.retain(|(_, _, a)| *a != action);

            for ctx in contexts {
                self.bind(ctx, key.normalized(), action);
            }

            tracing::info!(
                action = %action_name,
                key = %key_str,
                "Applied keybinding override"
            );
        }

        warnings
    }

    /// Look up the action for a given key in a given context.
    ///
    /// Tries the specific context first, then falls back to Global.
    pub fn action_for_key(
        &self,
        code: KeyCode,
        modifiers: KeyModifiers,
        context: Context,
    ) -> Option<Action> {
        let key = KeySpec::new(code, modifiers).normalized();

        if let Some(&action) = self.lookup.get(&(context, key)) {
            return Some(action);
        }

        if context != Context::Global {
            return self.lookup.get(&(Context::Global, key)).copied();
        }

        None
    }

    /// All bindings for the help screen as
    /// (context, key_display_string, action, description) tuples.
    pub fn all_bindings(&self) -> Vec<(Context, String, Action, &'static str)> {
        self.bindings
            .iter()
            .map(|(ctx, key, action)| (*ctx, format_key(key), *action, action.describe()))
            .collect()
    }
}

impl Default for KeybindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse an action name string (from config) into an Action enum.
fn parse_action_name(name: &str) -> Option<Action> {
    match name.to_lowercase().as_str() {
        "quit" => Some(Action::Quit),
        "nav_down" | "navdown" | "down" => Some(Action::NavDown),
        "nav_up" | "navup" | "up" => Some(Action::NavUp),
        "toggle_answer" | "toggleanswer" | "toggle" => Some(Action::ToggleAnswer),
        "expand_all" | "expandall" => Some(Action::ExpandAll),
        "collapse_all" | "collapseall" => Some(Action::CollapseAll),
        "next_page" | "nextpage" => Some(Action::NextPage),
        "prev_page" | "prevpage" | "previous_page" => Some(Action::PrevPage),
        "first_page" | "firstpage" => Some(Action::FirstPage),
        "last_page" | "lastpage" => Some(Action::LastPage),
        "next_category" | "nextcategory" => Some(Action::NextCategory),
        "prev_category" | "prevcategory" | "previous_category" => Some(Action::PrevCategory),
        "all_category" | "allcategory" | "all" => Some(Action::AllCategory),
        "enter_search" | "entersearch" | "search" => Some(Action::EnterSearch),
        "exit_search" | "exitsearch" => Some(Action::ExitSearch),
        "commit_search" | "commitsearch" => Some(Action::CommitSearch),
        "back" => Some(Action::Back),
        "cycle_theme" | "cycletheme" | "theme" => Some(Action::CycleTheme),
        "go_to_page" | "gotopage" | "goto" => Some(Action::GoToPage),
        "open_web_search" | "openwebsearch" | "open" => Some(Action::OpenWebSearch),
        "open_chat_search" | "openchatsearch" | "chatgpt" => Some(Action::OpenChatSearch),
        "show_help" | "showhelp" | "help" => Some(Action::ShowHelp),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_has_quit() {
        let reg = KeybindingRegistry::new();
        let action = reg.action_for_key(KeyCode::Char('q'), KeyModifiers::NONE, Context::Global);
        assert_eq!(action, Some(Action::Quit));
    }

    #[test]
    fn test_list_falls_back_to_global() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            reg.action_for_key(KeyCode::Char('q'), KeyModifiers::NONE, Context::List),
            Some(Action::Quit)
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Tab, KeyModifiers::NONE, Context::List),
            Some(Action::NextCategory)
        );
    }

    #[test]
    fn test_default_nav_keys() {
        let reg = KeybindingRegistry::new();
        for code in [KeyCode::Char('j'), KeyCode::Down] {
            assert_eq!(
                reg.action_for_key(code, KeyModifiers::NONE, Context::List),
                Some(Action::NavDown)
            );
        }
        for code in [KeyCode::Char('k'), KeyCode::Up] {
            assert_eq!(
                reg.action_for_key(code, KeyModifiers::NONE, Context::List),
                Some(Action::NavUp)
            );
        }
    }

    #[test]
    fn test_page_keys() {
        let reg = KeybindingRegistry::new();
        for code in [KeyCode::Char('l'), KeyCode::Char('n'), KeyCode::Right] {
            assert_eq!(
                reg.action_for_key(code, KeyModifiers::NONE, Context::List),
                Some(Action::NextPage)
            );
        }
        for code in [KeyCode::Char('h'), KeyCode::Char('p'), KeyCode::Left] {
            assert_eq!(
                reg.action_for_key(code, KeyModifiers::NONE, Context::List),
                Some(Action::PrevPage)
            );
        }
        assert_eq!(
            reg.action_for_key(KeyCode::Home, KeyModifiers::NONE, Context::List),
            Some(Action::FirstPage)
        );
        assert_eq!(
            reg.action_for_key(KeyCode::End, KeyModifiers::NONE, Context::List),
            Some(Action::LastPage)
        );
    }

    #[test]
    fn test_page_jump_and_chat_keys() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            reg.action_for_key(KeyCode::Char(':'), KeyModifiers::SHIFT, Context::List),
            Some(Action::GoToPage)
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Char('c'), KeyModifiers::NONE, Context::List),
            Some(Action::OpenChatSearch)
        );
        // Digits start the page prompt in the input handler, not here
        assert_eq!(
            reg.action_for_key(KeyCode::Char('2'), KeyModifiers::NONE, Context::List),
            None
        );
        assert_eq!(parse_action_name("goto"), Some(Action::GoToPage));
        assert_eq!(parse_action_name("chatgpt"), Some(Action::OpenChatSearch));
    }

    #[test]
    fn test_shifted_keys_match_regardless_of_reported_shift() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            reg.action_for_key(KeyCode::Char('G'), KeyModifiers::SHIFT, Context::List),
            Some(Action::LastPage)
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Char('E'), KeyModifiers::NONE, Context::List),
            Some(Action::CollapseAll)
        );
        assert_eq!(
            reg.action_for_key(KeyCode::BackTab, KeyModifiers::SHIFT, Context::List),
            Some(Action::PrevCategory)
        );
    }

    #[test]
    fn test_search_context() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            reg.action_for_key(KeyCode::Esc, KeyModifiers::NONE, Context::Search),
            Some(Action::ExitSearch)
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Enter, KeyModifiers::NONE, Context::Search),
            Some(Action::CommitSearch)
        );
        // List-only keys are not active while searching
        assert_eq!(
            reg.action_for_key(KeyCode::Char('j'), KeyModifiers::NONE, Context::Search),
            None
        );
    }

    #[test]
    fn test_unknown_key_returns_none() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            reg.action_for_key(KeyCode::F(12), KeyModifiers::NONE, Context::Global),
            None
        );
    }

    #[test]
    fn test_apply_overrides_valid() {
        let mut reg = KeybindingRegistry::new();
        let mut overrides = HashMap::new();
        overrides.insert("quit".to_string(), "Ctrl+q".to_string());

        let warnings = reg.apply_overrides(&overrides);
        assert!(warnings.is_empty());

        assert_eq!(
            reg.action_for_key(KeyCode::Char('q'), KeyModifiers::NONE, Context::Global),
            None
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Char('q'), KeyModifiers::CONTROL, Context::Global),
            Some(Action::Quit)
        );
    }

    #[test]
    fn test_override_replaces_every_default_key() {
        let mut reg = KeybindingRegistry::new();
        let mut overrides = HashMap::new();
        overrides.insert("next_page".to_string(), "F5".to_string());
        assert!(reg.apply_overrides(&overrides).is_empty());

        for code in [KeyCode::Char('l'), KeyCode::Char('n'), KeyCode::Right] {
            assert_eq!(
                reg.action_for_key(code, KeyModifiers::NONE, Context::List),
                None
            );
        }
        assert_eq!(
            reg.action_for_key(KeyCode::F(5), KeyModifiers::NONE, Context::List),
            Some(Action::NextPage)
        );
        // Stays a list binding
        assert_eq!(
            reg.action_for_key(KeyCode::F(5), KeyModifiers::NONE, Context::Global),
            None
        );
    }

    #[test]
    fn test_apply_overrides_unknown_action() {
        let mut reg = KeybindingRegistry::new();
        let mut overrides = HashMap::new();
        overrides.insert("nonexistent_action".to_string(), "q".to_string());

        let warnings = reg.apply_overrides(&overrides);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Unknown action"));
    }

    #[test]
    fn test_apply_overrides_bad_key() {
        let mut reg = KeybindingRegistry::new();
        let mut overrides = HashMap::new();
        overrides.insert("quit".to_string(), "Ctrl+Alt+Shift+Q".to_string());

        let warnings = reg.apply_overrides(&overrides);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Cannot parse key"));
    }

    #[test]
    fn test_parse_key_string_named_keys() {
        assert_eq!(
            parse_key_string("Enter"),
            Some(KeySpec::plain(KeyCode::Enter))
        );
        assert_eq!(parse_key_string("esc"), Some(KeySpec::plain(KeyCode::Esc)));
        assert_eq!(
            parse_key_string("BackTab"),
            Some(KeySpec::plain(KeyCode::BackTab))
        );
        assert_eq!(parse_key_string("home"), Some(KeySpec::plain(KeyCode::Home)));
        assert_eq!(
            parse_key_string("space"),
            Some(KeySpec::plain(KeyCode::Char(' ')))
        );
    }

    #[test]
    fn test_parse_key_string_function_keys() {
        assert_eq!(parse_key_string("F1"), Some(KeySpec::plain(KeyCode::F(1))));
        assert_eq!(
            parse_key_string("F12"),
            Some(KeySpec::plain(KeyCode::F(12)))
        );
        assert_eq!(parse_key_string("F0"), None);
        assert_eq!(parse_key_string("F13"), None);
    }

    #[test]
    fn test_parse_key_string_single_char() {
        assert_eq!(
            parse_key_string("q"),
            Some(KeySpec::plain(KeyCode::Char('q')))
        );
        assert_eq!(
            parse_key_string("F"),
            Some(KeySpec::plain(KeyCode::Char('F')))
        );
        assert_eq!(parse_key_string("Ctrl+n"), Some(KeySpec::ctrl('n')));
        assert_eq!(parse_key_string("qq"), None);
    }

    #[test]
    fn test_all_bindings_cover_every_action() {
        let reg = KeybindingRegistry::new();
        let bindings = reg.all_bindings();
        let actions = [
            Action::Quit,
            Action::NavDown,
            Action::NavUp,
            Action::ToggleAnswer,
            Action::ExpandAll,
            Action::CollapseAll,
            Action::NextPage,
            Action::PrevPage,
            Action::FirstPage,
            Action::LastPage,
            Action::NextCategory,
            Action::PrevCategory,
            Action::AllCategory,
            Action::EnterSearch,
            Action::ExitSearch,
            Action::CommitSearch,
            Action::Back,
            Action::CycleTheme,
            Action::OpenWebSearch,
            Action::ShowHelp,
        ];
        for action in actions {
            assert!(
                bindings.iter().any(|(_, _, a, _)| *a == action),
                "{:?} has no default key",
                action
            );
        }
    }

    #[test]
    fn test_format_key_display() {
        assert_eq!(format_key(&KeySpec::plain(KeyCode::Char('q'))), "q");
        assert_eq!(format_key(&KeySpec::plain(KeyCode::Char(' '))), "Space");
        assert_eq!(format_key(&KeySpec::ctrl('d')), "Ctrl+d");
        assert_eq!(format_key(&KeySpec::plain(KeyCode::BackTab)), "Shift+Tab");
        assert_eq!(format_key(&KeySpec::plain(KeyCode::F(5))), "F5");
    }
}
