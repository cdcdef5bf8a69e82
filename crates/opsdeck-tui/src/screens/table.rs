//! Generic table screen: a [`TableView`] driven by keys, fed by collection
//! snapshots, with a search box, facet popup and detail panel.
//!
//! The screen never touches the address itself. Every view mutation is
//! returned as [`Action::Navigate`] for the app to apply to its history, and
//! back/forward arrive as [`Action::Hydrate`].

use std::fmt;
use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, TableState, Wrap};
use throbber_widgets_tui::ThrobberState;
use tui_input::Input;

use opsdeck_core::table::column;
use opsdeck_core::{
    CollectionSnapshot, ColumnDef, ColumnKind, FetchState, FilterValue, Record, SortRequest,
    TableView,
};

use crate::action::Action;
use crate::component::Component;
use crate::screen::ScreenId;
use crate::theme;
use crate::widgets::data_table::{DataTable, LoadStatus};
use crate::widgets::{facet, input};

/// A record type with a table screen of its own.
pub trait TableRow: Record + fmt::Debug {
    const SCREEN: ScreenId;

    fn columns() -> &'static [ColumnDef];

    /// This collection's snapshot, if `action` carries one.
    fn snapshot(action: &Action) -> Option<&CollectionSnapshot<Self>>;

    fn detail_title(&self) -> String;

    /// Label/value pairs for the detail panel.
    fn detail_fields(&self) -> Vec<(&'static str, String)>;
}

#[derive(Debug)]
enum Mode {
    Browse,
    /// Editing the search box of the searchable column.
    Search(Input),
    /// Facet popup open on an enum column.
    Facet { column: ColumnDef, cursor: usize },
}

pub struct TableScreen<R: TableRow> {
    focused: bool,
    view: TableView<R>,
    status: LoadStatus,
    revalidating: bool,
    table_state: TableState,
    /// Column under the column cursor (sort/facet target).
    column: usize,
    mode: Mode,
    throbber_state: ThrobberState,
}

impl<R: TableRow> TableScreen<R> {
    pub fn new() -> Self {
        Self {
            focused: false,
            view: TableView::new(R::columns(), Arc::new(Vec::new())),
            status: LoadStatus::Loading,
            revalidating: false,
            table_state: TableState::default().with_selected(Some(0)),
            column: 0,
            mode: Mode::Browse,
            throbber_state: ThrobberState::default(),
        }
    }

    pub fn view(&self) -> &TableView<R> {
        &self.view
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    fn apply_snapshot(&mut self, snap: &CollectionSnapshot<R>) {
        self.revalidating = snap.revalidating;
        match &snap.state {
            FetchState::Loading => {
                self.status = LoadStatus::Loading;
                self.view.replace_rows(Arc::new(Vec::new()));
            }
            FetchState::Success(rows) => {
                self.status = LoadStatus::Ready;
                self.view.replace_rows(Arc::clone(rows));
            }
            FetchState::Error(message) => {
                self.status = LoadStatus::Failed(message.clone());
            }
        }
        self.sync_cursor();
    }

    // ── Cursor ───────────────────────────────────────────────────────

    fn cursor(&self) -> usize {
        self.table_state.selected().unwrap_or(0)
    }

    fn select_row(&mut self, idx: usize) {
        let len = self.view.visible_len();
        let clamped = if len == 0 { 0 } else { idx.min(len - 1) };
        self.table_state.select(Some(clamped));
    }

    fn move_cursor(&mut self, delta: isize) {
        let next = self.cursor().saturating_add_signed(delta);
        self.select_row(next);
    }

    /// Put the cursor on the selected record, or back in range.
    fn sync_cursor(&mut self) {
        match self.view.selected_position() {
            Some(pos) => self.select_row(pos),
            None => self.select_row(self.cursor()),
        }
    }

    fn cursor_id(&self) -> Option<String> {
        self.view.visible_row(self.cursor()).map(|r| r.id().to_owned())
    }

    fn move_column(&mut self, forward: bool) {
        let len = self.view.columns().len();
        if len == 0 {
            return;
        }
        self.column = if forward {
            (self.column + 1) % len
        } else {
            (self.column + len - 1) % len
        };
    }

    fn focused_column(&self) -> Option<ColumnDef> {
        self.view.columns().get(self.column).copied()
    }

    fn search_column(&self) -> Option<ColumnDef> {
        self.view
            .columns()
            .iter()
            .find(|c| c.is_searchable())
            .copied()
    }

    /// The focused column if it's an enum, else the first enum column.
    fn facet_column(&self) -> Option<ColumnDef> {
        self.focused_column()
            .filter(|c| matches!(c.kind, ColumnKind::Enum { .. }))
            .or_else(|| {
                self.view
                    .columns()
                    .iter()
                    .find(|c| matches!(c.kind, ColumnKind::Enum { .. }))
                    .copied()
            })
    }

    // ── View mutations ───────────────────────────────────────────────

    fn sort(&mut self, request: SortRequest) -> Option<Action> {
        let column = self.focused_column()?;
        let change = self.view.set_sort(column.id, request)?;
        self.sync_cursor();
        Some(Action::Navigate(change))
    }

    fn filter(&mut self, column: &str, value: Option<FilterValue>) -> Option<Action> {
        let change = self.view.set_filter(column, value)?;
        self.sync_cursor();
        Some(Action::Navigate(change))
    }

    fn toggle_facet(&mut self, column: ColumnDef, value: &str) -> Option<Action> {
        let mut set = facet::accepted(self.view.filters().get(column.id));
        if !set.remove(value) {
            set.insert(value.to_owned());
        }
        self.filter(column.id, Some(FilterValue::OneOf(set)))
    }

    fn open_detail(&mut self) -> Option<Action> {
        let id = self.cursor_id()?;
        Some(Action::Navigate(self.view.select(Some(&id))))
    }

    // ── Keys per mode ────────────────────────────────────────────────

    fn handle_browse_key(&mut self, key: KeyEvent) -> Option<Action> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.move_cursor(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_cursor(-1),
            KeyCode::Char('d') if ctrl => self.move_cursor(10),
            KeyCode::Char('u') if ctrl => self.move_cursor(-10),
            KeyCode::PageDown => self.move_cursor(10),
            KeyCode::PageUp => self.move_cursor(-10),
            KeyCode::Char('g') | KeyCode::Home => self.select_row(0),
            KeyCode::Char('G') | KeyCode::End => self.select_row(usize::MAX),
            KeyCode::Char('h') | KeyCode::Left => self.move_column(false),
            KeyCode::Char('l') | KeyCode::Right => self.move_column(true),
            KeyCode::Char('s') => return self.sort(SortRequest::Toggle),
            KeyCode::Char('A') => return self.sort(SortRequest::Ascending),
            KeyCode::Char('D') => return self.sort(SortRequest::Descending),
            KeyCode::Char('/') => {
                let column = self.search_column()?;
                let current = match self.view.filters().get(column.id) {
                    Some(FilterValue::Text(text)) => text.clone(),
                    _ => String::new(),
                };
                self.mode = Mode::Search(Input::new(current));
            }
            KeyCode::Char('f') => {
                let column = self.facet_column()?;
                self.mode = Mode::Facet { column, cursor: 0 };
            }
            KeyCode::Char('x') => {
                let change = self.view.reset();
                self.sync_cursor();
                return Some(Action::Navigate(change));
            }
            KeyCode::Enter => return self.open_detail(),
            KeyCode::Esc if self.view.selection().is_open() => {
                return Some(Action::Navigate(self.view.select(None)));
            }
            _ => {}
        }
        None
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> Option<Action> {
        if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
            self.mode = Mode::Browse;
            return None;
        }
        let Mode::Search(search) = &mut self.mode else {
            return None;
        };
        if !input::edit(search, &key) {
            return None;
        }
        let text = search.value().to_owned();
        let column = self.search_column()?;
        self.filter(column.id, Some(FilterValue::Text(text)))
    }

    fn handle_facet_key(&mut self, key: KeyEvent) -> Option<Action> {
        let Mode::Facet { column, cursor } = &mut self.mode else {
            return None;
        };
        let column = *column;
        let options = column.options();
        match key.code {
            KeyCode::Esc | KeyCode::Char('f' | 'q') => self.mode = Mode::Browse,
            KeyCode::Char('j') | KeyCode::Down => {
                *cursor = (*cursor + 1).min(options.len().saturating_sub(1));
            }
            KeyCode::Char('k') | KeyCode::Up => *cursor = cursor.saturating_sub(1),
            KeyCode::Char(' ') | KeyCode::Enter => {
                let option = options.get(*cursor)?;
                return self.toggle_facet(column, option.value);
            }
            KeyCode::Char('c') => return self.filter(column.id, None),
            _ => {}
        }
        None
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render_filter_bar(&self, frame: &mut Frame, area: Rect) {
        let layout = Layout::horizontal([Constraint::Length(10), Constraint::Min(1)]).split(area);

        let searching = matches!(self.mode, Mode::Search(_));
        frame.render_widget(
            Paragraph::new(Span::styled(
                " / search ",
                if searching {
                    theme::key_hint_key()
                } else {
                    theme::key_hint()
                },
            )),
            layout[0],
        );

        if let Mode::Search(search) = &self.mode {
            input::render_input(frame, layout[1], search, true, false, "");
            return;
        }

        let mut spans = Vec::new();
        for (id, value) in self.view.filters().iter() {
            let Some(def) = column::find(self.view.columns(), id) else {
                continue;
            };
            let shown = match value {
                FilterValue::Text(text) => format!("\"{text}\""),
                FilterValue::OneOf(set) => set
                    .iter()
                    .map(|v| def.label_for(v))
                    .collect::<Vec<_>>()
                    .join(", "),
            };
            if !spans.is_empty() {
                spans.push(Span::styled("  ", theme::key_hint()));
            }
            spans.push(Span::styled(format!("{}: ", def.title), theme::key_hint()));
            spans.push(Span::styled(shown, Style::default().fg(theme::CORAL)));
        }
        if spans.is_empty() {
            spans.push(Span::styled("no filters", theme::key_hint()));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), layout[1]);
    }

    fn render_detail(&self, frame: &mut Frame, area: Rect) {
        let record = self.view.selected_record();
        let title = record.map_or_else(String::new, |r| format!(" {} ", r.detail_title()));
        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        // Open but unresolved renders as an empty panel
        let Some(record) = record else {
            return;
        };

        let mut lines = vec![Line::from("")];
        for (label, value) in record.detail_fields() {
            lines.push(Line::from(vec![
                Span::styled(format!("  {label:<12}"), theme::key_hint()),
                Span::styled(value, Style::default().fg(theme::DIM_WHITE)),
            ]));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("  esc ", theme::key_hint_key()),
            Span::styled("close", theme::key_hint()),
        ]));
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }

    fn render_hints(&self, frame: &mut Frame, area: Rect) {
        let pairs: &[(&str, &str)] = match self.mode {
            Mode::Browse => &[
                ("j/k ", "rows  "),
                ("h/l ", "column  "),
                ("s ", "sort  "),
                ("f ", "facet  "),
                ("/ ", "search  "),
                ("x ", "reset  "),
                ("enter ", "details"),
            ],
            Mode::Search(_) => &[("enter/esc ", "done")],
            Mode::Facet { .. } => &[("j/k ", "move  "), ("space ", "toggle")],
        };
        let spans: Vec<Span> = pairs
            .iter()
            .flat_map(|(key, label)| {
                [
                    Span::styled(*key, theme::key_hint_key()),
                    Span::styled(*label, theme::key_hint()),
                ]
            })
            .collect();
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

impl<R: TableRow> Default for TableScreen<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: TableRow> Component for TableScreen<R> {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        Ok(match self.mode {
            Mode::Browse => self.handle_browse_key(key),
            Mode::Search(_) => self.handle_search_key(key),
            Mode::Facet { .. } => self.handle_facet_key(key),
        })
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Some(snap) = R::snapshot(action) {
            self.apply_snapshot(snap);
            return Ok(None);
        }
        match action {
            Action::Hydrate(location) => {
                self.view.hydrate(location);
                self.mode = Mode::Browse;
                self.sync_cursor();
            }
            Action::Tick => {
                if self.status == LoadStatus::Loading || self.revalidating {
                    self.throbber_state.calc_next();
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let mut title = format!(
            " {} · {} of {} ",
            R::SCREEN.label(),
            self.view.visible_len(),
            self.view.total_len()
        );
        if self.revalidating {
            title.push_str("⟳ ");
        }
        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let (table_area, detail_area) = if self.view.selection().is_open() {
            let chunks =
                Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
                    .split(inner);
            (chunks[0], Some(chunks[1]))
        } else {
            (inner, None)
        };

        let layout = Layout::vertical([
            Constraint::Length(1), // filter bar
            Constraint::Min(1),    // table
            Constraint::Length(1), // hints
        ])
        .split(table_area);

        self.render_filter_bar(frame, layout[0]);
        DataTable {
            view: &self.view,
            status: &self.status,
            column_cursor: self.column,
            table_state: &self.table_state,
            throbber_state: &self.throbber_state,
        }
        .render(frame, layout[1]);
        self.render_hints(frame, layout[2]);

        if let Some(detail_area) = detail_area {
            self.render_detail(frame, detail_area);
        }

        if let Mode::Facet { column, cursor } = &self.mode {
            let counts = self.view.facet_counts(column.id);
            facet::render_facet(
                frame,
                area,
                column,
                &counts,
                self.view.filters().get(column.id),
                *cursor,
            );
        }
    }

    fn captures_input(&self) -> bool {
        !matches!(self.mode, Mode::Browse)
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        R::SCREEN.label()
    }
}
