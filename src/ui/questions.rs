//! Summary line and the question accordion.

use crate::app::App;
use crate::question::{capitalize_words, Question};
use crate::theme::StyleMap;
use crate::util::{display_width, strip_control_chars, truncate_to_width};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthChar;

use super::markdown::render_markdown;

const EMPTY_MESSAGE: &str = "No questions found matching your search.";
/// Answer lines are indented under the question text.
const ANSWER_INDENT: &str = "      ";

/// "Showing a-b of n questions" on the left, "Page x of y" on the right.
pub fn render_summary(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 10 || area.height == 0 {
        return;
    }
    let page_label = format!(" {} ", app.view.page_label());
    let badge_width = u16::try_from(display_width(&page_label)).unwrap_or(0);
    let [left, right] =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(badge_width)]).areas(area);

    f.render_widget(
        Paragraph::new(Span::styled(app.view.showing_label(), app.style("summary"))),
        left,
    );
    f.render_widget(
        Paragraph::new(Span::styled(page_label, app.style("page_badge")))
            .alignment(Alignment::Right),
        right,
    );
}

/// One accordion row: its lines and where it starts.
struct Row {
    start: usize,
    len: usize,
}

/// Build every line of the current page and the line span of each row.
fn build_lines(app: &App, width: usize) -> (Vec<Line<'static>>, Vec<Row>) {
    let mut lines = Vec::new();
    let mut rows = Vec::new();
    let start_number = app.view.start_index();

    for (i, question) in app.page_questions().enumerate() {
        let start = lines.len();
        let expanded = app.is_expanded(question);
        lines.push(header_line(
            question,
            start_number + i + 1,
            i == app.selected,
            expanded,
            &app.theme,
            width,
        ));
        if expanded {
            let body_width = width.saturating_sub(ANSWER_INDENT.len()).max(1);
            let answer = render_markdown(&question.answer, &app.theme);
            for line in answer {
                for wrapped in wrap_line(line, body_width) {
                    let mut spans = vec![Span::raw(ANSWER_INDENT)];
                    spans.extend(wrapped.spans);
                    lines.push(Line::from(spans));
                }
            }
            lines.push(Line::default());
        }
        rows.push(Row {
            start,
            len: lines.len() - start,
        });
    }
    (lines, rows)
}

/// `▸ 12  Question text...  [Medium] [React]`, fitted to `width`.
fn header_line(
    question: &Question,
    number: usize,
    selected: bool,
    expanded: bool,
    theme: &StyleMap,
    width: usize,
) -> Line<'static> {
    let marker = if expanded { "▾" } else { "▸" };
    let prefix = format!("{} {:>3}  ", marker, number);
    let difficulty = format!("[{}]", question.difficulty.label());
    let category = format!("[{}]", capitalize_words(&question.category));
    let badges_width = display_width(&difficulty) + display_width(&category) + 2;

    let text = strip_control_chars(&question.question).replace(['\n', '\r', '\t'], " ");
    let room = width.saturating_sub(display_width(&prefix) + badges_width);
    let text = truncate_to_width(&text, room).into_owned();
    let pad = room.saturating_sub(display_width(&text));

    let (number_style, text_style) = if selected {
        let s = theme.resolve("question_selected");
        (s, s)
    } else {
        (
            theme.resolve("question_number"),
            theme.resolve("question_text"),
        )
    };

    Line::from(vec![
        Span::styled(prefix, number_style),
        Span::styled(text, text_style),
        Span::raw(" ".repeat(pad + 1)),
        Span::styled(difficulty, theme.resolve(question.difficulty.style_role())),
        Span::raw(" "),
        Span::styled(category, theme.resolve("category_badge")),
    ])
}

/// Word-wrap a styled line to `width` columns, keeping span styles.
/// Words longer than a full row are split by character.
fn wrap_line(line: Line<'static>, width: usize) -> Vec<Line<'static>> {
    let width = width.max(1);
    let mut out: Vec<Line<'static>> = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut used = 0;

    for span in line.spans {
        let style = span.style;
        for word in span.content.split_inclusive(' ') {
            let mut word = word;
            if used > 0 && used + display_width(word.trim_end()) > width {
                out.push(Line::from(std::mem::take(&mut current)));
                used = 0;
                word = word.trim_start();
            }
            let w = display_width(word);
            if used + w <= width {
                current.push(Span::styled(word.to_string(), style));
                used += w;
                continue;
            }
            // Hard split
            let mut chunk = String::new();
            for c in word.chars() {
                let cw = UnicodeWidthChar::width(c).unwrap_or(0);
                if used + cw > width && used > 0 {
                    current.push(Span::styled(std::mem::take(&mut chunk), style));
                    out.push(Line::from(std::mem::take(&mut current)));
                    used = 0;
                }
                chunk.push(c);
                used += cw;
            }
            if !chunk.is_empty() {
                current.push(Span::styled(chunk, style));
            }
        }
    }
    if !current.is_empty() || out.is_empty() {
        out.push(Line::from(current));
    }
    out
}

/// Smallest scroll offset change that shows the selected row, preferring
/// to show an open answer in full when it fits.
fn scroll_for_selection(scroll: usize, row_start: usize, row_len: usize, height: usize) -> usize {
    if height == 0 {
        return scroll;
    }
    let mut scroll = scroll;
    let row_end = row_start + row_len;
    if row_end > scroll + height {
        scroll = row_end.saturating_sub(height);
    }
    if row_start < scroll {
        scroll = row_start;
    }
    scroll
}

/// Render the accordion for the current page.
pub fn render(f: &mut Frame, app: &mut App, area: Rect) {
    if area.width < 10 || area.height < 3 {
        return;
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.style("panel_border"));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if app.view.page_indices().is_empty() {
        let message = match &app.load_error {
            Some(err) => format!("{}\n\nCould not load questions: {}", EMPTY_MESSAGE, err),
            None => EMPTY_MESSAGE.to_string(),
        };
        let paragraph = Paragraph::new(message)
            .style(app.style("empty_state"))
            .alignment(Alignment::Center);
        f.render_widget(paragraph, inner);
        return;
    }

    let (lines, rows) = build_lines(app, usize::from(inner.width));
    let height = usize::from(inner.height);
    if let Some(row) = rows.get(app.selected) {
        app.list_scroll = scroll_for_selection(app.list_scroll, row.start, row.len, height);
    }
    app.list_scroll = app.list_scroll.min(lines.len().saturating_sub(1));

    let scroll = u16::try_from(app.list_scroll).unwrap_or(u16::MAX);
    f.render_widget(Paragraph::new(lines).scroll((scroll, 0)), inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::Difficulty;
    use crate::theme::ThemeVariant;
    use ratatui::style::Style;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn question(text: &str) -> Question {
        Question {
            id: "1".to_string(),
            category: "react".to_string(),
            question: text.to_string(),
            answer: String::new(),
            difficulty: Difficulty::Hard,
        }
    }

    #[test]
    fn test_header_line_layout() {
        let theme = StyleMap::for_variant(ThemeVariant::Light);
        let line = header_line(&question("What is JSX?"), 9, false, false, &theme, 60);
        let s = text(&line);
        assert!(s.starts_with("▸   9  What is JSX?"));
        assert!(s.ends_with("[Hard] [React]"));
        assert_eq!(display_width(&s), 60);
    }

    #[test]
    fn test_header_line_truncates_long_question() {
        let theme = StyleMap::for_variant(ThemeVariant::Light);
        let long = "Explain the difference between controlled and uncontrolled components";
        let line = header_line(&question(long), 1, true, true, &theme, 50);
        let s = text(&line);
        assert!(s.starts_with("▾   1  "));
        assert!(s.contains("..."));
        assert!(s.ends_with("[Hard] [React]"));
        assert_eq!(line.spans[1].style, theme.resolve("question_selected"));
    }

    #[test]
    fn test_wrap_line_breaks_on_words() {
        let line = Line::from("alpha beta gamma delta");
        let wrapped: Vec<String> = wrap_line(line, 11).iter().map(text).collect();
        assert_eq!(wrapped, vec!["alpha beta ", "gamma delta"]);
    }

    #[test]
    fn test_wrap_line_keeps_styles_and_splits_long_words() {
        let style = Style::default().fg(ratatui::style::Color::Red);
        let line = Line::from(vec![Span::styled("abcdefghij", style)]);
        let wrapped = wrap_line(line, 4);
        let texts: Vec<String> = wrapped.iter().map(text).collect();
        assert_eq!(texts, vec!["abcd", "efgh", "ij"]);
        assert!(wrapped.iter().all(|l| l.spans.iter().all(|s| s.style == style)));
    }

    #[test]
    fn test_wrap_empty_line_kept() {
        assert_eq!(wrap_line(Line::default(), 10).len(), 1);
    }

    #[test]
    fn test_scroll_follows_selection() {
        // Row below the viewport scrolls down so its end is visible
        assert_eq!(scroll_for_selection(0, 10, 2, 8), 4);
        // Row above the viewport scrolls up to its start
        assert_eq!(scroll_for_selection(6, 3, 1, 8), 3);
        // A row taller than the viewport keeps its header visible
        assert_eq!(scroll_for_selection(0, 2, 20, 8), 2);
        // Already visible
        assert_eq!(scroll_for_selection(2, 4, 1, 8), 2);
    }
}
