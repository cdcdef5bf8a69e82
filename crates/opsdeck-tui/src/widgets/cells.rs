//! Cell rendering. Each column kind has one pure renderer; [`renderer`]
//! picks it.

use ratatui::style::{Modifier, Style};
use ratatui::text::Span;

use opsdeck_core::table::dates;
use opsdeck_core::{ColumnDef, ColumnKind};

use crate::theme;

/// Placeholder for a missing value.
pub const EMPTY: &str = "─";

/// Turns a column's raw field value into a styled span.
pub type CellRenderer = fn(&ColumnDef, Option<&str>) -> Span<'static>;

pub fn renderer(kind: ColumnKind) -> CellRenderer {
    match kind {
        ColumnKind::Text { .. } => text_cell,
        ColumnKind::Date => date_cell,
        ColumnKind::Enum { .. } => enum_cell,
        ColumnKind::Action => action_cell,
    }
}

/// Render `raw` the way column `column` displays it.
pub fn render(column: &ColumnDef, raw: Option<&str>) -> Span<'static> {
    renderer(column.kind)(column, raw)
}

fn text_cell(_column: &ColumnDef, raw: Option<&str>) -> Span<'static> {
    match raw.filter(|v| !v.is_empty()) {
        Some(value) => Span::styled(value.to_owned(), theme::table_row()),
        None => Span::styled(EMPTY, theme::key_hint()),
    }
}

fn date_cell(_column: &ColumnDef, raw: Option<&str>) -> Span<'static> {
    match raw.filter(|v| !v.is_empty()) {
        Some(value) => Span::styled(dates::display(value), Style::default().fg(theme::NEON_CYAN)),
        None => Span::styled(EMPTY, theme::key_hint()),
    }
}

fn enum_cell(column: &ColumnDef, raw: Option<&str>) -> Span<'static> {
    match raw.filter(|v| !v.is_empty()) {
        Some(value) => Span::styled(
            column.label_for(value).to_owned(),
            Style::default()
                .fg(theme::badge_color(value))
                .add_modifier(Modifier::BOLD),
        ),
        None => Span::styled(EMPTY, theme::key_hint()),
    }
}

fn action_cell(_column: &ColumnDef, _raw: Option<&str>) -> Span<'static> {
    Span::styled("open ›", theme::key_hint())
}

#[cfg(test)]
mod tests {
    use super::*;
    use opsdeck_core::table::schema::{CRON_JOB_COLUMNS, STATUS_OPTIONS};
    use pretty_assertions::assert_eq;

    fn text(column: &ColumnDef, raw: Option<&str>) -> String {
        render(column, raw).content.into_owned()
    }

    #[test]
    fn each_kind_renders_its_own_way() {
        let date = ColumnDef::date("createdAt", "Created At", 14);
        let status = ColumnDef::enumerated("status", "Status", STATUS_OPTIONS, 10);
        let name = ColumnDef::text("name", "Name", 20);
        let action = ColumnDef::action("action", 6);

        assert_eq!(text(&date, Some("2024-01-05T09:30:00.000Z")), "Jan 5, 2024");
        assert_eq!(text(&status, Some("inactive")), "Inactive");
        assert_eq!(text(&name, Some("nightly backup")), "nightly backup");
        assert_eq!(text(&action, None), "open ›");
    }

    #[test]
    fn missing_values_use_placeholder() {
        for column in CRON_JOB_COLUMNS.iter().filter(|c| c.kind != ColumnKind::Action) {
            assert_eq!(text(column, None), EMPTY);
            assert_eq!(text(column, Some("")), EMPTY);
        }
    }

    #[test]
    fn unknown_values_pass_through() {
        let status = ColumnDef::enumerated("status", "Status", STATUS_OPTIONS, 10);
        assert_eq!(text(&status, Some("paused")), "paused");
        let date = ColumnDef::date("createdAt", "Created At", 14);
        assert_eq!(text(&date, Some("someday")), "someday");
    }
}
