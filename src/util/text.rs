use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::MAX_SEARCH_QUERY_LENGTH;

/// Terminal columns occupied by `s` (CJK and emoji count as two).
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Truncate `s` to at most `max_width` columns, appending "..." when cut.
///
/// Widths of 3 or less cannot hold a character plus the ellipsis, so the
/// text is cut hard instead. Returns `Cow::Borrowed` when `s` already fits.
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }
    if max_width <= ELLIPSIS_WIDTH {
        return Cow::Owned(take_columns(s, max_width).to_string());
    }
    let head = take_columns(s, max_width - ELLIPSIS_WIDTH);
    Cow::Owned(format!("{}{}", head, ELLIPSIS))
}

/// Longest prefix of `s` that fits in `columns`, cut on a char boundary.
fn take_columns(s: &str, columns: usize) -> &str {
    let mut used = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > columns {
            return &s[..idx];
        }
        used += w;
    }
    s
}

fn is_stripped_control(c: char) -> bool {
    (c.is_ascii_control() && !matches!(c, '\t' | '\n' | '\r')) || c == '\u{9b}'
}

/// Remove terminal control characters and ANSI escape sequences.
///
/// Question text comes from a remote resource and is written straight into
/// the terminal, so CSI (`ESC [ ... final`) and OSC (`ESC ] ... BEL|ST`)
/// sequences are dropped whole. Tab, newline and carriage return survive.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    if !s.chars().any(is_stripped_control) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\x1b' {
            if !is_stripped_control(c) {
                out.push(c);
            }
            continue;
        }
        match chars.peek() {
            Some('[') => {
                chars.next();
                // Parameter and intermediate bytes, then one final byte
                for c in chars.by_ref() {
                    if ('\x40'..='\x7e').contains(&c) {
                        break;
                    }
                }
            }
            Some(']') => {
                chars.next();
                while let Some(c) = chars.next() {
                    if c == '\x07' {
                        break;
                    }
                    if c == '\x1b' && chars.peek() == Some(&'\\') {
                        chars.next();
                        break;
                    }
                }
            }
            _ => {}
        }
    }
    Cow::Owned(out)
}

/// Clean a search term typed or pasted by the user: controls removed,
/// newlines folded to spaces, length capped at `MAX_SEARCH_QUERY_LENGTH` chars.
pub fn sanitize_search_term(s: &str) -> String {
    strip_control_chars(s)
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .take(MAX_SEARCH_QUERY_LENGTH)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fits_is_borrowed() {
        let result = truncate_to_width("What is JSX?", 40);
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result, "What is JSX?");
    }

    #[test]
    fn test_ascii_truncation() {
        assert_eq!(truncate_to_width("What is the virtual DOM?", 10), "What is...");
        assert_eq!(truncate_to_width("Closures", 8), "Closures");
    }

    #[test]
    fn test_wide_chars_truncation() {
        // Each CJK char is two columns
        assert_eq!(truncate_to_width("日本語テスト", 7), "日本...");
        assert_eq!(truncate_to_width("日本語テスト", 2), "日");
        assert_eq!(truncate_to_width("日本", 1), "");
    }

    #[test]
    fn test_narrow_widths_cut_without_ellipsis() {
        assert_eq!(truncate_to_width("Hooks", 0), "");
        assert_eq!(truncate_to_width("Hooks", 1), "H");
        assert_eq!(truncate_to_width("Hooks", 3), "Hoo");
        assert_eq!(truncate_to_width("Hooks", 4), "H...");
    }

    #[test]
    fn test_display_width() {
        assert_eq!(display_width("CSS"), 3);
        assert_eq!(display_width("日本"), 4);
    }

    #[test]
    fn test_strip_clean_text_returns_borrowed() {
        let input = "Explain `useEffect`\n\tcleanup\r\n";
        let result = strip_control_chars(input);
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result, input);
    }

    #[test]
    fn test_strip_c0_controls_and_del() {
        assert_eq!(strip_control_chars("a\x00b\x07c\x08d\x7fe"), "abcde");
    }

    #[test]
    fn test_strip_csi_sequences() {
        assert_eq!(strip_control_chars("\x1b[1;31mbold red\x1b[0m"), "bold red");
        assert_eq!(strip_control_chars("up\x1b[2Adown"), "updown");
    }

    #[test]
    fn test_strip_osc_sequences() {
        assert_eq!(strip_control_chars("\x1b]0;title\x07after"), "after");
        assert_eq!(strip_control_chars("\x1b]8;;http://x\x1b\\link"), "link");
    }

    #[test]
    fn test_strip_bare_esc_keeps_following_text() {
        assert_eq!(strip_control_chars("a\x1bb"), "ab");
    }

    #[test]
    fn test_strip_keeps_unicode() {
        assert_eq!(strip_control_chars("日本\x1b[31m語\x1b[0m"), "日本語");
    }

    #[test]
    fn test_sanitize_search_term() {
        assert_eq!(sanitize_search_term("use\nEffect\x1b[2J"), "use Effect");
        let long = "x".repeat(MAX_SEARCH_QUERY_LENGTH + 10);
        assert_eq!(
            sanitize_search_term(&long).chars().count(),
            MAX_SEARCH_QUERY_LENGTH
        );
    }
}
