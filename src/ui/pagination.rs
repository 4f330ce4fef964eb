use crate::app::App;
use crate::engine::{DerivedView, PageToken};
use crate::theme::StyleMap;
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const PREV_LABEL: &str = "< Prev";
const NEXT_LABEL: &str = "Next >";

/// Rows the pagination strip needs. Hidden for a single page.
pub fn height(view: &DerivedView) -> u16 {
    u16::from(view.total_pages > 1)
}

/// `< Prev  1 ... 4 [5] 6 ... 12  Next >`
pub fn strip_line(view: &DerivedView, theme: &StyleMap) -> Line<'static> {
    let edge = |label: &'static str, enabled: bool| {
        let role = if enabled { "page_normal" } else { "page_disabled" };
        Span::styled(label, theme.resolve(role))
    };

    let mut spans = vec![edge(PREV_LABEL, view.has_prev()), Span::raw("  ")];
    for token in &view.buttons {
        let span = match *token {
            PageToken::Page(n) if n == view.current_page => {
                Span::styled(format!(" {} ", n), theme.resolve("page_current"))
            }
            PageToken::Page(n) => Span::styled(format!(" {} ", n), theme.resolve("page_normal")),
            PageToken::Ellipsis => Span::styled(" ... ", theme.resolve("page_disabled")),
        };
        spans.push(span);
    }
    spans.push(Span::raw("  "));
    spans.push(edge(NEXT_LABEL, view.has_next()));
    Line::from(spans)
}

/// Render the centered pagination strip.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.height == 0 || app.view.total_pages <= 1 {
        return;
    }
    let line = strip_line(&app.view, &app.theme);
    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::pagination_buttons;
    use crate::theme::ThemeVariant;
    use pretty_assertions::assert_eq;

    fn view(total_pages: usize, current_page: usize) -> DerivedView {
        DerivedView {
            total_pages,
            current_page,
            buttons: pagination_buttons(total_pages, current_page),
            ..DerivedView::default()
        }
    }

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_hidden_for_single_page() {
        assert_eq!(height(&view(1, 1)), 0);
        assert_eq!(height(&view(0, 1)), 0);
        assert_eq!(height(&view(2, 1)), 1);
    }

    #[test]
    fn test_strip_text_with_ellipses() {
        let theme = StyleMap::for_variant(ThemeVariant::Light);
        let line = strip_line(&view(12, 5), &theme);
        assert_eq!(
            text(&line),
            "< Prev   1  ...  4  5  6  ...  12   Next >"
        );
    }

    #[test]
    fn test_edges_disabled_at_bounds() {
        let theme = StyleMap::for_variant(ThemeVariant::Dark);
        let first = strip_line(&view(3, 1), &theme);
        assert_eq!(first.spans[0].style, theme.resolve("page_disabled"));
        let last_span = first.spans.last().unwrap();
        assert_eq!(last_span.style, theme.resolve("page_normal"));

        let last = strip_line(&view(3, 3), &theme);
        assert_eq!(last.spans[0].style, theme.resolve("page_normal"));
        assert_eq!(
            last.spans.last().unwrap().style,
            theme.resolve("page_disabled")
        );
    }

    #[test]
    fn test_current_page_highlighted() {
        let theme = StyleMap::for_variant(ThemeVariant::Light);
        let line = strip_line(&view(3, 2), &theme);
        let current = line.spans.iter().find(|s| s.content == " 2 ").unwrap();
        assert_eq!(current.style, theme.resolve("page_current"));
    }
}
