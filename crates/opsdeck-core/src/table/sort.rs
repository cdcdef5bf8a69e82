// ── Sort state ──

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn is_descending(self) -> bool {
        self == Self::Descending
    }

    pub fn arrow(self) -> &'static str {
        match self {
            Self::Ascending => "▲",
            Self::Descending => "▼",
        }
    }
}

/// What the user asked a column's sort to become.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortRequest {
    Ascending,
    Descending,
    /// ascending -> descending -> unsorted -> ascending
    Toggle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub column: String,
    pub direction: SortDirection,
}

/// Ordered sort keys. Empty means fetch order.
///
/// Kept as a sequence to match the address encoding, but every mutation
/// leaves at most one key: sorting a new column discards the previous one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    keys: Vec<SortKey>,
}

impl SortState {
    pub fn single(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            keys: vec![SortKey {
                column: column.into(),
                direction,
            }],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    pub fn primary(&self) -> Option<&SortKey> {
        self.keys.first()
    }

    pub fn direction_of(&self, column: &str) -> Option<SortDirection> {
        self.keys
            .iter()
            .find(|k| k.column == column)
            .map(|k| k.direction)
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Apply a request to `column`. Returns `true` if the state changed.
    pub fn apply(&mut self, column: &str, request: SortRequest) -> bool {
        let current = self.direction_of(column);
        let next = match request {
            SortRequest::Ascending => Some(SortDirection::Ascending),
            SortRequest::Descending => Some(SortDirection::Descending),
            SortRequest::Toggle => match current {
                None => Some(SortDirection::Ascending),
                Some(SortDirection::Ascending) => Some(SortDirection::Descending),
                Some(SortDirection::Descending) => None,
            },
        };

        let before = self.clone();
        *self = next.map_or_else(Self::default, |direction| Self::single(column, direction));
        *self != before
    }
}
