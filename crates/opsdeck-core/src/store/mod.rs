// ── Reactive collection storage ──

mod collection;

pub use collection::{CollectionSnapshot, CollectionStore, FetchState, FetchTicket};
