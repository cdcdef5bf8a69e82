//! Table body for a [`TableView`]: header with sort/filter markers, rows
//! through the cell renderers, and the loading, error and empty states.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table, TableState};
use throbber_widgets_tui::{Throbber, ThrobberState};

use opsdeck_core::{ColumnDef, Record, SortDirection, TableView};

use crate::theme;
use crate::widgets::cells;

pub const ERROR_MESSAGE: &str = "Something went wrong with fetching the data";
pub const EMPTY_MESSAGE: &str = "No results";

/// What the table body shows, derived from the collection's fetch state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Loading,
    Ready,
    Failed(String),
}

/// Header text: title, sort arrow, and a dot when a filter is active.
pub fn header_label(column: &ColumnDef, sort: Option<SortDirection>, filtered: bool) -> String {
    let mut label = column.title.to_owned();
    if let Some(direction) = sort {
        label.push(' ');
        label.push_str(direction.arrow());
    }
    if filtered {
        label.push_str(" ●");
    }
    label
}

/// Shown in place of rows.
enum Placeholder {
    Spinner,
    Message(Line<'static>),
}

pub struct DataTable<'a, R: Record> {
    pub view: &'a TableView<R>,
    pub status: &'a LoadStatus,
    /// Index of the column under the column cursor.
    pub column_cursor: usize,
    pub table_state: &'a TableState,
    pub throbber_state: &'a ThrobberState,
}

impl<R: Record> DataTable<'_, R> {
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let columns = self.view.columns();
        let header = Row::new(columns.iter().enumerate().map(|(i, column)| {
            let label = header_label(
                column,
                self.view.sort().direction_of(column.id),
                self.view.filters().get(column.id).is_some(),
            );
            let style = if i == self.column_cursor {
                theme::table_header_focused()
            } else {
                theme::table_header()
            };
            Cell::from(label).style(style)
        }));
        let widths: Vec<Constraint> = columns
            .iter()
            .map(|c| Constraint::Length(c.width))
            .collect();

        let placeholder = match self.status {
            LoadStatus::Loading if self.view.total_len() == 0 => Some(Placeholder::Spinner),
            LoadStatus::Failed(detail) => Some(Placeholder::Message(Line::from(vec![
                Span::styled(ERROR_MESSAGE, theme::error_text()),
                Span::styled(format!("  ({detail})"), theme::key_hint()),
            ]))),
            _ if self.view.visible_len() == 0 => Some(Placeholder::Message(Line::from(
                Span::styled(EMPTY_MESSAGE, theme::key_hint()),
            ))),
            _ => None,
        };

        let Some(placeholder) = placeholder else {
            let rows = self.view.visible_rows().map(|record| {
                Row::new(columns.iter().map(|column| {
                    let raw = record.field(column.id);
                    Cell::from(cells::render(column, raw.as_deref()))
                }))
            });
            let table = Table::new(rows, widths)
                .header(header)
                .row_highlight_style(theme::table_selected())
                .highlight_symbol("▸ ");
            let mut state = *self.table_state;
            frame.render_stateful_widget(table, area, &mut state);
            return;
        };

        let layout = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);
        frame.render_widget(Table::new(Vec::<Row>::new(), widths).header(header), layout[0]);

        match placeholder {
            Placeholder::Message(line) => {
                frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), layout[2]);
            }
            Placeholder::Spinner => {
                let throbber = Throbber::default()
                    .label(" Loading…")
                    .style(Style::default().fg(theme::NEON_CYAN))
                    .throbber_style(Style::default().fg(theme::ELECTRIC_PURPLE));
                let spot = Layout::horizontal([
                    Constraint::Fill(1),
                    Constraint::Length(12),
                    Constraint::Fill(1),
                ])
                .split(layout[2]);
                frame.render_stateful_widget(throbber, spot[1], &mut self.throbber_state.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opsdeck_core::table::schema::{CRON_JOB_COLUMNS, STATUS_OPTIONS};
    use pretty_assertions::assert_eq;

    #[test]
    fn header_marks_sort_and_filter() {
        let status = ColumnDef::enumerated("status", "Status", STATUS_OPTIONS, 10);
        assert_eq!(header_label(&status, None, false), "Status");
        assert_eq!(
            header_label(&status, Some(SortDirection::Descending), true),
            "Status ▼ ●"
        );
        assert_eq!(
            header_label(&CRON_JOB_COLUMNS[0], Some(SortDirection::Ascending), false),
            "Created At ▲"
        );
    }
}
