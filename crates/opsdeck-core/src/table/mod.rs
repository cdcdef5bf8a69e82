//! Query-synced table view-model.
//!
//! A [`TableView`] derives the visible rows of a record collection from
//! three pieces of view state (sort, filters, selection) and mirrors that
//! state into a navigable [`Location`]. Mutations return an
//! [`AddressChange`] for the caller to apply to its [`History`]; back and
//! forward navigation hand a `Location` back for [`TableView::hydrate`].

pub mod address;
pub mod column;
pub mod dates;
pub mod filter;
pub mod history;
pub mod schema;
pub mod sort;
pub mod view;

pub use address::{AddressChange, HistoryMode, Location};
pub use column::{ColumnDef, ColumnKind, EnumOption, SortValue};
pub use filter::{FilterState, FilterValue};
pub use history::History;
pub use sort::{SortDirection, SortKey, SortRequest, SortState};
pub use view::{Selection, TableView};
