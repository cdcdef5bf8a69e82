// ── Table view-model ──
//
// Owns one table's sort, filter and selection state over a shared record
// collection. The visible projection is a pure function of
// (rows, filters, sort) and is rebuilt on every change that affects it.

use std::sync::Arc;

use tracing::debug;

use crate::model::Record;
use crate::table::address::{self, AddressChange, HistoryMode, Location, keys};
use crate::table::column::{self, ColumnDef, EnumOption, SortValue};
use crate::table::filter::{FilterState, FilterValue};
use crate::table::sort::{SortRequest, SortState};

/// Whether a detail panel is open, and for which record id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Closed,
    Open(String),
}

impl Selection {
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Closed => None,
            Self::Open(id) => Some(id),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open(_))
    }
}

pub struct TableView<R: Record> {
    columns: &'static [ColumnDef],
    rows: Arc<Vec<R>>,
    sort: SortState,
    filters: FilterState,
    selection: Selection,
    /// Indices into `rows`, filtered and ordered.
    visible: Vec<usize>,
}

impl<R: Record> TableView<R> {
    /// A view with default state: unsorted, unfiltered, nothing selected.
    pub fn new(columns: &'static [ColumnDef], rows: Arc<Vec<R>>) -> Self {
        let mut view = Self {
            columns,
            rows,
            sort: SortState::default(),
            filters: FilterState::default(),
            selection: Selection::Closed,
            visible: Vec::new(),
        };
        view.recompute();
        view
    }

    /// A view whose state is read from `location`. Never fails.
    pub fn initialize(
        columns: &'static [ColumnDef],
        rows: Arc<Vec<R>>,
        location: &Location,
    ) -> Self {
        let mut view = Self::new(columns, rows);
        view.hydrate(location);
        view
    }

    /// Re-read sort, filters and selection from `location`.
    pub fn hydrate(&mut self, location: &Location) {
        self.sort = address::decode_sorting(location.get(keys::SORTING), self.columns);
        self.filters = address::decode_filters(location.get(keys::FILTERS), self.columns);
        self.selection = location
            .get(keys::ID)
            .filter(|id| !id.is_empty())
            .map_or(Selection::Closed, |id| Selection::Open(id.to_owned()));
        self.recompute();
    }

    /// Swap in a refetched collection. View state is kept.
    pub fn replace_rows(&mut self, rows: Arc<Vec<R>>) {
        self.rows = rows;
        self.recompute();
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Set or clear (`None` or empty) a column filter.
    ///
    /// Returns `None`, changing nothing, when the column can't be filtered
    /// or the value has the wrong shape for it.
    pub fn set_filter(&mut self, column: &str, value: Option<FilterValue>) -> Option<AddressChange> {
        let def = column::find(self.columns, column).filter(ColumnDef::is_filterable)?;
        if let Some(value) = &value {
            if !def.accepts(value) {
                debug!(column, ?value, "filter value does not fit column");
                return None;
            }
        }

        if self.filters.set(column, value) {
            self.recompute();
        }
        Some(
            AddressChange::new(HistoryMode::Replace)
                .set(keys::FILTERS, address::encode_filters(&self.filters)),
        )
    }

    /// Sort by a single column. `None` when the column isn't sortable.
    pub fn set_sort(&mut self, column: &str, request: SortRequest) -> Option<AddressChange> {
        column::find(self.columns, column).filter(ColumnDef::is_sortable)?;

        if self.sort.apply(column, request) {
            self.recompute();
        }
        Some(
            AddressChange::new(HistoryMode::Replace)
                .set(keys::SORTING, address::encode_sorting(&self.sort)),
        )
    }

    /// Open (`Some`) or close (`None`) the detail panel. Adds a history entry.
    pub fn select(&mut self, id: Option<&str>) -> AddressChange {
        let id = id.filter(|id| !id.is_empty());
        self.selection = id.map_or(Selection::Closed, |id| Selection::Open(id.to_owned()));
        AddressChange::new(HistoryMode::Push).set(keys::ID, id.map(str::to_owned))
    }

    /// Reset sort and filters. Selection is untouched.
    pub fn reset(&mut self) -> AddressChange {
        self.sort.clear();
        self.filters.clear();
        self.recompute();
        AddressChange::new(HistoryMode::Replace)
            .set(keys::SORTING, None)
            .set(keys::FILTERS, None)
    }

    /// The whole view state as one replace-mode change.
    pub fn address(&self) -> AddressChange {
        AddressChange::new(HistoryMode::Replace)
            .set(keys::SORTING, address::encode_sorting(&self.sort))
            .set(keys::FILTERS, address::encode_filters(&self.filters))
            .set(keys::ID, self.selection.id().map(str::to_owned))
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Rows passing every filter, in sort order (fetch order if unsorted).
    /// Each call starts a fresh iteration.
    pub fn visible_rows(&self) -> impl Iterator<Item = &R> + '_ {
        self.visible.iter().filter_map(|&i| self.rows.get(i))
    }

    /// The `n`th visible row.
    pub fn visible_row(&self, n: usize) -> Option<&R> {
        self.visible.get(n).and_then(|&i| self.rows.get(i))
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    pub fn total_len(&self) -> usize {
        self.rows.len()
    }

    /// The selected record, if a panel is open and the id still exists.
    pub fn selected_record(&self) -> Option<&R> {
        let id = self.selection.id()?;
        self.rows.iter().find(|r| r.id() == id)
    }

    /// Position of the selected record among visible rows.
    pub fn selected_position(&self) -> Option<usize> {
        let id = self.selection.id()?;
        self.visible_rows().position(|r| r.id() == id)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn columns(&self) -> &'static [ColumnDef] {
        self.columns
    }

    /// Option counts for an enum column over rows that pass every *other*
    /// filter, so selecting an option never zeroes its siblings.
    pub fn facet_counts(&self, column: &str) -> Vec<(EnumOption, usize)> {
        let Some(def) = column::find(self.columns, column) else {
            return Vec::new();
        };
        def.options()
            .iter()
            .map(|opt| {
                let count = self
                    .rows
                    .iter()
                    .filter(|r| self.filters.matches_except(*r, Some(column)))
                    .filter(|r| r.field(column).as_deref() == Some(opt.value))
                    .count();
                (*opt, count)
            })
            .collect()
    }

    // ── Projection ───────────────────────────────────────────────────

    fn recompute(&mut self) {
        let mut keyed: Vec<(usize, SortValue)> = Vec::new();
        let sort_col = self
            .sort
            .primary()
            .and_then(|key| column::find(self.columns, &key.column).map(|c| (c, key.direction)));

        for (i, row) in self.rows.iter().enumerate() {
            if !self.filters.matches(row) {
                continue;
            }
            let key = sort_col.map_or(SortValue::Unordered, |(col, _)| {
                col.sort_value(row.field(col.id).as_deref())
            });
            keyed.push((i, key));
        }

        if let Some((_, direction)) = sort_col {
            // Stable: equal keys keep fetch order in both directions.
            keyed.sort_by(|a, b| {
                let ord = a.1.cmp(&b.1);
                if direction.is_descending() {
                    ord.reverse()
                } else {
                    ord
                }
            });
        }

        self.visible = keyed.into_iter().map(|(i, _)| i).collect();
    }
}
