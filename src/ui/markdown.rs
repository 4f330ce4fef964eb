//! Answer bodies are Markdown; this turns them into styled lines.

use crate::theme::StyleMap;
use crate::util::strip_control_chars;
use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use ratatui::style::Style;
use ratatui::text::{Line, Span};

/// Inline style flags active at the current parser position.
#[derive(Default)]
struct InlineState {
    heading: bool,
    emphasis: bool,
    strong: bool,
    code_block: bool,
}

impl InlineState {
    fn style(&self, theme: &StyleMap) -> Style {
        if self.code_block {
            return theme.resolve("answer_code_block");
        }
        let mut style = theme.resolve("answer_body");
        if self.heading {
            style = style.patch(theme.resolve("answer_heading"));
        }
        if self.strong {
            style = style.patch(theme.resolve("answer_strong"));
        }
        if self.emphasis {
            style = style.patch(theme.resolve("answer_emphasis"));
        }
        style
    }
}

/// Convert an answer to styled lines. Blank lines separate blocks; a
/// trailing blank line is dropped.
pub fn render_markdown(md: &str, theme: &StyleMap) -> Vec<Line<'static>> {
    let md = strip_control_chars(md);
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut spans: Vec<Span<'static>> = Vec::with_capacity(4);
    let mut state = InlineState::default();
    // Nesting of lists; `Some(n)` is an ordered list at item n.
    let mut lists: Vec<Option<u64>> = Vec::new();

    let flush = |lines: &mut Vec<Line<'static>>, spans: &mut Vec<Span<'static>>| {
        if !spans.is_empty() {
            lines.push(Line::from(std::mem::take(spans)));
        }
    };

    for event in Parser::new(&md) {
        match event {
            Event::Start(Tag::Heading { .. }) => state.heading = true,
            Event::End(TagEnd::Heading(_)) => {
                flush(&mut lines, &mut spans);
                lines.push(Line::default());
                state.heading = false;
            }
            Event::End(TagEnd::Paragraph) => {
                flush(&mut lines, &mut spans);
                if lists.is_empty() {
                    lines.push(Line::default());
                }
            }
            Event::Start(Tag::CodeBlock(_)) => {
                flush(&mut lines, &mut spans);
                state.code_block = true;
            }
            Event::End(TagEnd::CodeBlock) => {
                state.code_block = false;
                lines.push(Line::default());
            }
            Event::Start(Tag::List(start)) => {
                flush(&mut lines, &mut spans);
                lists.push(start);
            }
            Event::End(TagEnd::List(_)) => {
                flush(&mut lines, &mut spans);
                lists.pop();
                if lists.is_empty() {
                    lines.push(Line::default());
                }
            }
            Event::Start(Tag::Item) => {
                flush(&mut lines, &mut spans);
                let depth = lists.len().saturating_sub(1);
                let marker = match lists.last_mut() {
                    Some(Some(n)) => {
                        let m = format!("{}. ", n);
                        *n += 1;
                        m
                    }
                    _ => "• ".to_string(),
                };
                spans.push(Span::styled(
                    format!("{}{}", "  ".repeat(depth), marker),
                    theme.resolve("answer_body"),
                ));
            }
            Event::End(TagEnd::Item) => flush(&mut lines, &mut spans),
            Event::Start(Tag::Emphasis) => state.emphasis = true,
            Event::End(TagEnd::Emphasis) => state.emphasis = false,
            Event::Start(Tag::Strong) => state.strong = true,
            Event::End(TagEnd::Strong) => state.strong = false,
            Event::Start(Tag::Image { dest_url, .. }) => {
                spans.push(Span::styled(
                    format!("[Image: {}]", dest_url),
                    theme.resolve("answer_image"),
                ));
            }
            Event::Text(text) if state.code_block => {
                let style = state.style(theme);
                for line in text.lines() {
                    lines.push(Line::from(Span::styled(format!("  {}", line), style)));
                }
            }
            Event::Text(text) => {
                spans.push(Span::styled(text.into_string(), state.style(theme)));
            }
            Event::Code(code) => {
                spans.push(Span::styled(
                    format!("`{}`", code),
                    theme.resolve("answer_inline_code"),
                ));
            }
            Event::SoftBreak => spans.push(Span::raw(" ")),
            Event::HardBreak => flush(&mut lines, &mut spans),
            _ => {}
        }
    }

    flush(&mut lines, &mut spans);
    while lines.last().is_some_and(|l| l.spans.is_empty()) {
        lines.pop();
    }
    lines
}
