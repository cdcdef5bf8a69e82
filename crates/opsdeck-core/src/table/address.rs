// ── Navigable address ──
//
// A `Location` is a path plus a string-keyed query map. Table state lives
// under four keys:
//
//   id       selected record id, plain
//   sorting  JSON `[{"id": col, "desc": bool}]`
//   filters  JSON `[{"id": col, "value": "text" | ["a", "b"]}]`
//   env      environment name, plain
//
// Decoding never fails: malformed or mismatched entries are dropped and
// logged at debug level, leaving the defaults in place.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::form_urlencoded;

use crate::table::column::{self, ColumnDef};
use crate::table::filter::{FilterState, FilterValue};
use crate::table::sort::{SortDirection, SortState};

pub mod keys {
    pub const ID: &str = "id";
    pub const SORTING: &str = "sorting";
    pub const FILTERS: &str = "filters";
    pub const ENV: &str = "env";
}

// ── Location ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub query: BTreeMap<String, String>,
}

impl Location {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: BTreeMap::new(),
        }
    }

    /// Parse `path?query`. Never fails; junk pairs decode as best they can.
    pub fn parse(raw: &str) -> Self {
        let (path, query) = raw.split_once('?').unwrap_or((raw, ""));
        let query = form_urlencoded::parse(query.as_bytes())
            .filter(|(k, _)| !k.is_empty())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self {
            path: if path.is_empty() { "/".into() } else { path.into() },
            query,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        if !self.query.is_empty() {
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(&self.query)
                .finish();
            write!(f, "?{query}")?;
        }
        Ok(())
    }
}

// ── Address changes ──────────────────────────────────────────────────

/// Whether an address change adds a history entry or rewrites the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMode {
    Push,
    Replace,
}

/// Query keys to set (`Some`) or remove (`None`), plus the history mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressChange {
    pub mode: HistoryMode,
    pub updates: Vec<(&'static str, Option<String>)>,
}

impl AddressChange {
    pub fn new(mode: HistoryMode) -> Self {
        Self {
            mode,
            updates: Vec::new(),
        }
    }

    pub fn set(mut self, key: &'static str, value: Option<String>) -> Self {
        self.updates.push((key, value));
        self
    }

    /// The location after applying every update to `base`.
    pub fn apply_to(&self, base: &Location) -> Location {
        let mut next = base.clone();
        for (key, value) in &self.updates {
            match value {
                Some(v) => {
                    next.query.insert((*key).to_owned(), v.clone());
                }
                None => {
                    next.query.remove(*key);
                }
            }
        }
        next
    }
}

// ── Wire shapes ──────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
struct SortEntry {
    id: String,
    desc: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct FilterEntry {
    id: String,
    value: WireFilterValue,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum WireFilterValue {
    Text(String),
    Many(Vec<String>),
}

// ── Encoding ─────────────────────────────────────────────────────────

/// `None` when unsorted, so the key disappears from the address.
pub fn encode_sorting(sort: &SortState) -> Option<String> {
    if sort.is_empty() {
        return None;
    }
    let entries: Vec<SortEntry> = sort
        .keys()
        .iter()
        .map(|k| SortEntry {
            id: k.column.clone(),
            desc: k.direction.is_descending(),
        })
        .collect();
    serde_json::to_string(&entries).ok()
}

/// `None` when there are no filters.
pub fn encode_filters(filters: &FilterState) -> Option<String> {
    if filters.is_empty() {
        return None;
    }
    let entries: Vec<FilterEntry> = filters
        .iter()
        .map(|(id, value)| FilterEntry {
            id: id.to_owned(),
            value: match value {
                FilterValue::Text(text) => WireFilterValue::Text(text.clone()),
                FilterValue::OneOf(set) => WireFilterValue::Many(set.iter().cloned().collect()),
            },
        })
        .collect();
    serde_json::to_string(&entries).ok()
}

// ── Decoding ─────────────────────────────────────────────────────────

/// Decode `sorting`, keeping the first entry naming a sortable column.
pub fn decode_sorting(raw: Option<&str>, columns: &[ColumnDef]) -> SortState {
    let Some(raw) = raw else {
        return SortState::default();
    };
    let entries: Vec<SortEntry> = match serde_json::from_str(raw) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(raw, error = %e, "ignoring malformed sorting");
            return SortState::default();
        }
    };

    entries
        .into_iter()
        .find(|entry| {
            let ok = column::find(columns, &entry.id).is_some_and(|c| c.is_sortable());
            if !ok {
                debug!(column = %entry.id, "ignoring sort on unknown column");
            }
            ok
        })
        .map(|entry| {
            let direction = if entry.desc {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            };
            SortState::single(entry.id, direction)
        })
        .unwrap_or_default()
}

/// Decode `filters`, dropping unknown columns, duplicates and shape mismatches.
pub fn decode_filters(raw: Option<&str>, columns: &[ColumnDef]) -> FilterState {
    let mut state = FilterState::default();
    let Some(raw) = raw else {
        return state;
    };
    let entries: Vec<FilterEntry> = match serde_json::from_str(raw) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(raw, error = %e, "ignoring malformed filters");
            return state;
        }
    };

    for entry in entries {
        if state.get(&entry.id).is_some() {
            debug!(column = %entry.id, "ignoring duplicate filter");
            continue;
        }
        let value = match entry.value {
            WireFilterValue::Text(text) => FilterValue::Text(text),
            WireFilterValue::Many(values) => FilterValue::OneOf(values.into_iter().collect()),
        };
        state.set(&entry.id, Some(value));
    }

    let before = state.len();
    state.retain_valid(columns);
    if state.len() != before {
        debug!(dropped = before - state.len(), "ignoring filters that don't fit columns");
    }
    state
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::table::schema::CRON_JOB_COLUMNS;
    use pretty_assertions::assert_eq;

    #[test]
    fn location_parse_and_display() {
        let loc = Location::parse("/dashboard/scheduler?env=staging&id=abc");
        assert_eq!(loc.path, "/dashboard/scheduler");
        assert_eq!(loc.get("env"), Some("staging"));
        assert_eq!(loc.to_string(), "/dashboard/scheduler?env=staging&id=abc");
        assert_eq!(Location::parse("").path, "/");
    }

    #[test]
    fn query_values_are_escaped() {
        let change = AddressChange::new(HistoryMode::Replace)
            .set(keys::FILTERS, Some(r#"[{"id":"email","value":"a&b"}]"#.into()));
        let loc = change.apply_to(&Location::new("/x"));
        insta::assert_snapshot!(
            loc.to_string(),
            @"/x?filters=%5B%7B%22id%22%3A%22email%22%2C%22value%22%3A%22a%26b%22%7D%5D"
        );
        assert_eq!(Location::parse(&loc.to_string()), loc);
    }

    #[test]
    fn apply_removes_keys() {
        let base = Location::parse("/x?id=1&env=staging");
        let next = AddressChange::new(HistoryMode::Push)
            .set(keys::ID, None)
            .apply_to(&base);
        assert_eq!(next.to_string(), "/x?env=staging");
    }

    #[test]
    fn sorting_wire_format() {
        let sort = SortState::single("createdAt", SortDirection::Descending);
        insta::assert_snapshot!(encode_sorting(&sort).unwrap(), @r#"[{"id":"createdAt","desc":true}]"#);
        assert_eq!(encode_sorting(&SortState::default()), None);
    }

    #[test]
    fn filters_wire_format() {
        let mut filters = FilterState::default();
        filters.set("email", Some(FilterValue::Text("ops".into())));
        filters.set("status", Some(FilterValue::one_of(["inactive", "active"])));
        insta::assert_snapshot!(
            encode_filters(&filters).unwrap(),
            @r#"[{"id":"email","value":"ops"},{"id":"status","value":["active","inactive"]}]"#
        );
    }

    #[test]
    fn malformed_input_decodes_to_defaults() {
        assert!(decode_sorting(Some("not json"), CRON_JOB_COLUMNS).is_empty());
        assert!(decode_sorting(Some(r#"{"id":"name"}"#), CRON_JOB_COLUMNS).is_empty());
        assert!(decode_filters(Some("[{]"), CRON_JOB_COLUMNS).is_empty());
        assert!(decode_filters(Some(r#"[{"id":"email","value":3}]"#), CRON_JOB_COLUMNS).is_empty());
    }

    #[test]
    fn invalid_columns_are_dropped() {
        let sort = decode_sorting(
            Some(r#"[{"id":"action","desc":false},{"id":"bogus","desc":true},{"id":"name","desc":true}]"#),
            CRON_JOB_COLUMNS,
        );
        assert_eq!(sort, SortState::single("name", SortDirection::Descending));

        let filters = decode_filters(
            Some(
                r#"[{"id":"email","value":"a"},{"id":"email","value":"b"},
                    {"id":"status","value":"active"},{"id":"nope","value":"x"},
                    {"id":"createdAt","value":"2024"}]"#,
            ),
            CRON_JOB_COLUMNS,
        );
        assert_eq!(filters.len(), 1);
        assert_eq!(filters.get("email"), Some(&FilterValue::Text("a".into())));
    }
}
