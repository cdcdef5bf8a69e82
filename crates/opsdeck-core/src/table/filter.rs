// ── Filter state ──
//
// Column id -> predicate. Text filters are case-insensitive substring
// matches; enum filters accept a row whose value is in the set. A filter
// whose value is empty is the same as no filter and is never stored.

use std::collections::BTreeSet;

use indexmap::IndexMap;

use crate::model::Record;
use crate::table::column::ColumnDef;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    OneOf(BTreeSet<String>),
}

impl FilterValue {
    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::OneOf(values.into_iter().map(Into::into).collect())
    }

    /// Empty text and the empty set both match everything.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::OneOf(set) => set.is_empty(),
        }
    }

    pub fn matches(&self, value: Option<&str>) -> bool {
        match self {
            Self::Text(needle) if needle.is_empty() => true,
            Self::OneOf(set) if set.is_empty() => true,
            Self::Text(needle) => value.is_some_and(|v| {
                v.to_lowercase().contains(&needle.to_lowercase())
            }),
            Self::OneOf(set) => value.is_some_and(|v| set.contains(v)),
        }
    }
}

/// Active filters in the order they were first set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    entries: IndexMap<String, FilterValue>,
}

impl FilterState {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, column: &str) -> Option<&FilterValue> {
        self.entries.get(column)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Set or clear a column's filter. Returns `true` if anything changed.
    pub fn set(&mut self, column: &str, value: Option<FilterValue>) -> bool {
        match value.filter(|v| !v.is_empty()) {
            Some(value) => {
                if self.entries.get(column) == Some(&value) {
                    return false;
                }
                self.entries.insert(column.to_owned(), value);
                true
            }
            None => self.entries.shift_remove(column).is_some(),
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Whether a record passes every active filter.
    pub fn matches<R: Record>(&self, record: &R) -> bool {
        self.matches_except(record, None)
    }

    /// Like [`matches`](Self::matches) but ignoring one column's filter.
    /// Facet counts use this so a facet never hides its own options.
    pub fn matches_except<R: Record>(&self, record: &R, skip: Option<&str>) -> bool {
        self.entries
            .iter()
            .filter(|(column, _)| Some(column.as_str()) != skip)
            .all(|(column, value)| value.matches(record.field(column).as_deref()))
    }

    /// Drop entries that don't fit `columns`.
    pub(crate) fn retain_valid(&mut self, columns: &[ColumnDef]) {
        self.entries.retain(|id, value| {
            columns
                .iter()
                .any(|c| c.id == id && c.is_filterable() && c.accepts(value))
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_matches_case_insensitively() {
        let f = FilterValue::Text("OPS".into());
        assert!(f.matches(Some("devops@example.com")));
        assert!(!f.matches(Some("admin@example.com")));
        assert!(!f.matches(None));
    }

    #[test]
    fn empty_set_matches_everything() {
        let f = FilterValue::OneOf(BTreeSet::new());
        assert!(f.matches(Some("active")));
        assert!(f.matches(None));
    }

    #[test]
    fn set_membership() {
        let f = FilterValue::one_of(["active"]);
        assert!(f.matches(Some("active")));
        assert!(!f.matches(Some("inactive")));
    }

    #[test]
    fn empty_values_clear_entries() {
        let mut state = FilterState::default();
        assert!(state.set("email", Some(FilterValue::Text("a".into()))));
        assert!(!state.set("email", Some(FilterValue::Text("a".into()))));
        assert!(state.set("email", Some(FilterValue::Text(String::new()))));
        assert!(state.is_empty());
        assert!(!state.set("status", Some(FilterValue::one_of(Vec::<String>::new()))));
        assert!(!state.set("status", None));
    }

    #[test]
    fn keeps_insertion_order() {
        let mut state = FilterState::default();
        state.set("status", Some(FilterValue::one_of(["active"])));
        state.set("email", Some(FilterValue::Text("x".into())));
        state.set("status", Some(FilterValue::one_of(["inactive"])));
        let order: Vec<_> = state.iter().map(|(k, _)| k).collect();
        assert_eq!(order, ["status", "email"]);
    }
}
