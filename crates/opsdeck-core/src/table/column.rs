// ── Column definitions ──

use std::cmp::Ordering;

use chrono::NaiveDateTime;

use crate::table::dates;
use crate::table::filter::FilterValue;

/// One accepted value of an enumerated column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumOption {
    /// Raw record value.
    pub value: &'static str,
    /// Display label.
    pub label: &'static str,
}

/// What a column holds. Decides sorting, filtering and rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Free text. `searchable` columns get a search box in the UI.
    Text { searchable: bool },
    /// A timestamp string, compared chronologically.
    Date,
    /// One of a fixed set of values, filtered by facet.
    Enum { options: &'static [EnumOption] },
    /// Row actions; holds no data.
    Action,
}

/// Static description of one table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    /// Record field this column reads; also the id used in the address.
    pub id: &'static str,
    pub title: &'static str,
    pub kind: ColumnKind,
    /// Preferred width in terminal cells.
    pub width: u16,
}

impl ColumnDef {
    pub const fn text(id: &'static str, title: &'static str, width: u16) -> Self {
        Self {
            id,
            title,
            kind: ColumnKind::Text { searchable: false },
            width,
        }
    }

    pub const fn searchable(id: &'static str, title: &'static str, width: u16) -> Self {
        Self {
            id,
            title,
            kind: ColumnKind::Text { searchable: true },
            width,
        }
    }

    pub const fn date(id: &'static str, title: &'static str, width: u16) -> Self {
        Self {
            id,
            title,
            kind: ColumnKind::Date,
            width,
        }
    }

    pub const fn enumerated(
        id: &'static str,
        title: &'static str,
        options: &'static [EnumOption],
        width: u16,
    ) -> Self {
        Self {
            id,
            title,
            kind: ColumnKind::Enum { options },
            width,
        }
    }

    pub const fn action(id: &'static str, width: u16) -> Self {
        Self {
            id,
            title: "",
            kind: ColumnKind::Action,
            width,
        }
    }

    pub fn is_sortable(&self) -> bool {
        !matches!(self.kind, ColumnKind::Action)
    }

    pub fn is_filterable(&self) -> bool {
        matches!(self.kind, ColumnKind::Text { .. } | ColumnKind::Enum { .. })
    }

    pub fn is_searchable(&self) -> bool {
        matches!(self.kind, ColumnKind::Text { searchable: true })
    }

    /// Enum options, empty for other kinds.
    pub fn options(&self) -> &'static [EnumOption] {
        match self.kind {
            ColumnKind::Enum { options } => options,
            _ => &[],
        }
    }

    /// Display label for a raw enum value, falling back to the value.
    pub fn label_for<'a>(&self, value: &'a str) -> &'a str {
        self.options()
            .iter()
            .find(|o| o.value == value)
            .map_or(value, |o| o.label)
    }

    /// Whether a filter value has the right shape for this column.
    pub fn accepts(&self, value: &FilterValue) -> bool {
        matches!(
            (self.kind, value),
            (ColumnKind::Text { .. }, FilterValue::Text(_))
                | (ColumnKind::Enum { .. }, FilterValue::OneOf(_))
        )
    }

    /// Ordering key for a raw value. Missing values order first.
    pub fn sort_value(&self, raw: Option<&str>) -> SortValue {
        match self.kind {
            ColumnKind::Text { .. } => SortValue::Text(raw.map(str::to_lowercase)),
            ColumnKind::Date => SortValue::Date(raw.and_then(dates::parse)),
            ColumnKind::Enum { .. } => SortValue::Text(raw.map(str::to_owned)),
            ColumnKind::Action => SortValue::Unordered,
        }
    }

    /// Ascending comparison of two raw values.
    pub fn compare(&self, a: Option<&str>, b: Option<&str>) -> Ordering {
        self.sort_value(a).cmp(&self.sort_value(b))
    }
}

/// Precomputed ordering key; only compared within one column.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortValue {
    Text(Option<String>),
    Date(Option<NaiveDateTime>),
    Unordered,
}

/// Look a column up by id.
pub fn find(columns: &[ColumnDef], id: &str) -> Option<ColumnDef> {
    columns.iter().find(|c| c.id == id).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    const OPTIONS: &[EnumOption] = &[EnumOption {
        value: "active",
        label: "Active",
    }];

    #[test]
    fn capabilities_follow_kind() {
        let action = ColumnDef::action("action", 4);
        assert!(!action.is_sortable());
        assert!(!action.is_filterable());

        let date = ColumnDef::date("createdAt", "Created At", 14);
        assert!(date.is_sortable());
        assert!(!date.is_filterable());

        assert!(ColumnDef::searchable("email", "Email", 20).is_searchable());
        assert!(!ColumnDef::text("name", "Name", 20).is_searchable());
    }

    #[test]
    fn filter_shape_must_match_kind() {
        let status = ColumnDef::enumerated("status", "Status", OPTIONS, 10);
        assert!(status.accepts(&FilterValue::OneOf(BTreeSet::new())));
        assert!(!status.accepts(&FilterValue::Text("a".into())));
        assert!(ColumnDef::text("name", "Name", 10).accepts(&FilterValue::Text("a".into())));
    }

    #[test]
    fn text_compares_case_insensitively() {
        let col = ColumnDef::text("name", "Name", 10);
        assert_eq!(col.compare(Some("alpha"), Some("Beta")), Ordering::Less);
        assert_eq!(col.compare(Some("ALPHA"), Some("alpha")), Ordering::Equal);
        assert_eq!(col.compare(None, Some("a")), Ordering::Less);
    }

    #[test]
    fn dates_compare_chronologically_across_formats() {
        let col = ColumnDef::date("createdAt", "Created At", 10);
        assert_eq!(
            col.compare(Some("Feb 1, 2024"), Some("2024-01-15T08:00:00.000Z")),
            Ordering::Greater
        );
        assert_eq!(col.compare(Some("garbage"), Some("2020-01-01")), Ordering::Less);
    }

    #[test]
    fn labels_fall_back_to_value() {
        let status = ColumnDef::enumerated("status", "Status", OPTIONS, 10);
        assert_eq!(status.label_for("active"), "Active");
        assert_eq!(status.label_for("paused"), "paused");
    }
}
