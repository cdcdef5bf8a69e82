// opsdeck-api: Async Rust client for the opsdeck dashboard HTTP API

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod resources;
pub mod transport;

pub use client::ApiClient;
pub use error::Error;
pub use models::{CronJob, Environment, Identity, JobStatus, Module, Role, User};
pub use transport::TransportConfig;
