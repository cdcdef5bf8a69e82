//! Faceted filter popup: the options of one enum column with the number
//! of rows each would match.

use std::collections::BTreeSet;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};

use opsdeck_core::table::EnumOption;
use opsdeck_core::{ColumnDef, FilterValue};

use crate::theme;
use crate::widgets::centered;

/// Values currently accepted by a facet filter.
pub fn accepted(filter: Option<&FilterValue>) -> BTreeSet<String> {
    match filter {
        Some(FilterValue::OneOf(set)) => set.clone(),
        _ => BTreeSet::new(),
    }
}

/// `[x] Active        12`
pub fn option_line(option: &EnumOption, count: usize, checked: bool) -> String {
    let mark = if checked { "x" } else { " " };
    format!("[{mark}] {:<12} {count:>4}", option.label)
}

pub fn render_facet(
    frame: &mut Frame,
    area: Rect,
    column: &ColumnDef,
    counts: &[(EnumOption, usize)],
    filter: Option<&FilterValue>,
    cursor: usize,
) {
    let accepted = accepted(filter);
    let height = u16::try_from(counts.len()).unwrap_or(u16::MAX).saturating_add(4);
    let popup = centered(area, 32, height);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(format!(" Filter: {} ", column.title))
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused())
        .style(Style::default().bg(theme::BG_DARK));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);

    let lines: Vec<Line> = counts
        .iter()
        .enumerate()
        .map(|(i, (option, count))| {
            let text = option_line(option, *count, accepted.contains(option.value));
            let style = if i == cursor {
                theme::table_selected()
            } else {
                theme::table_row()
            };
            Line::from(Span::styled(text, style))
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), layout[0]);

    let hints = Line::from(vec![
        Span::styled("space ", theme::key_hint_key()),
        Span::styled("toggle  ", theme::key_hint()),
        Span::styled("c ", theme::key_hint_key()),
        Span::styled("clear  ", theme::key_hint()),
        Span::styled("esc ", theme::key_hint_key()),
        Span::styled("close", theme::key_hint()),
    ]);
    frame.render_widget(Paragraph::new(hints), layout[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use opsdeck_core::table::schema::STATUS_OPTIONS;
    use pretty_assertions::assert_eq;

    #[test]
    fn option_lines_show_mark_and_count() {
        assert_eq!(
            option_line(&STATUS_OPTIONS[0], 42, true),
            "[x] Active         42"
        );
        assert_eq!(
            option_line(&STATUS_OPTIONS[1], 7, false),
            "[ ] Inactive        7"
        );
    }

    #[test]
    fn accepted_ignores_text_filters() {
        assert!(accepted(Some(&FilterValue::Text("a".into()))).is_empty());
        assert!(accepted(None).is_empty());
        let set = accepted(Some(&FilterValue::one_of(["active"])));
        assert!(set.contains("active"));
    }
}
