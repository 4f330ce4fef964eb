use crate::app::App;
use crate::question::{capitalize_words, CategoryCount};
use crate::theme::StyleMap;
use crate::util::display_width;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const CHIP_GAP: &str = " ";

/// Chip label: capitalised name and record count.
fn chip_label(entry: &CategoryCount) -> String {
    format!(" {} ({}) ", capitalize_words(entry.category.name), entry.count)
}

/// Pack the chips into rows no wider than `width`. A chip is never split
/// across rows.
pub fn chip_lines(
    counts: &[CategoryCount],
    selected: &str,
    theme: &StyleMap,
    width: u16,
) -> Vec<Line<'static>> {
    let width = usize::from(width);
    let mut lines = Vec::new();
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut used = 0;

    for entry in counts {
        let label = chip_label(entry);
        let w = display_width(&label);
        if used > 0 && used + CHIP_GAP.len() + w > width {
            lines.push(Line::from(std::mem::take(&mut spans)));
            used = 0;
        }
        if used > 0 {
            spans.push(Span::raw(CHIP_GAP));
            used += CHIP_GAP.len();
        }
        let style = if entry.category.id == selected {
            theme.resolve("chip_selected")
        } else {
            theme.resolve("chip_normal")
        };
        spans.push(Span::styled(label, style));
        used += w;
    }
    if !spans.is_empty() {
        lines.push(Line::from(spans));
    }
    lines
}

/// Rows the chip bar needs at `width`.
pub fn height(app: &App, width: u16) -> u16 {
    let rows = chip_lines(&app.category_counts, &app.browse.category, &app.theme, width).len();
    u16::try_from(rows).unwrap_or(u16::MAX)
}

/// Render the category chip bar.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height == 0 {
        return;
    }
    let lines = chip_lines(
        &app.category_counts,
        &app.browse.category,
        &app.theme,
        area.width,
    );
    f.render_widget(Paragraph::new(lines), area);
}
