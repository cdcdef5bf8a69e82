//! Horizontal inline tab bar (environment picker, facet summaries).

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::theme;

/// A tab line with the active label bracketed and highlighted in `accent`.
pub fn render_sub_tabs<'a>(labels: &[&'a str], active_index: usize, accent: Style) -> Line<'a> {
    let mut spans = Vec::with_capacity(labels.len() * 2);

    for (i, label) in labels.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  ", theme::key_hint()));
        }

        if i == active_index {
            spans.push(Span::styled(
                format!("[{label}]"),
                accent.add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::styled(*label, theme::tab_inactive()));
        }
    }

    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn brackets_only_the_active_label() {
        let line = render_sub_tabs(&["development", "staging"], 1, theme::tab_active());
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "development  [staging]");
    }
}
