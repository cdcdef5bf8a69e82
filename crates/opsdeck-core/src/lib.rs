// opsdeck-core: Session, environment and table state between opsdeck-api and the TUI.

pub mod config;
pub mod credentials;
pub mod dashboard;
pub mod environment;
pub mod error;
pub mod model;
pub mod session;
pub mod store;
pub mod table;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::DashboardConfig;
pub use dashboard::{CollectionKind, Dashboard};
pub use environment::EnvironmentSelector;
pub use error::CoreError;
pub use model::Record;
pub use session::{Session, SessionStore};
pub use store::{CollectionSnapshot, CollectionStore, FetchState};
pub use table::{
    AddressChange, ColumnDef, ColumnKind, FilterValue, History, HistoryMode, Location, Selection,
    SortDirection, SortRequest, TableView,
};

// Wire types are part of the core vocabulary.
pub use opsdeck_api::{CronJob, Environment, Identity, JobStatus, Module, Role, User};
