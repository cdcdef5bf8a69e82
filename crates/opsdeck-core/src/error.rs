// ── Core error types ──
//
// User-facing errors from opsdeck-core. Consumers never see HTTP status
// codes or JSON parse failures directly: the `From<opsdeck_api::Error>`
// impl folds transport-layer errors into network and auth failures.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Network ──────────────────────────────────────────────────────
    #[error("Network failure: {message}")]
    NetworkFailure {
        message: String,
        /// HTTP status code, when the server answered.
        status: Option<u16>,
    },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Auth ─────────────────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    AuthFailure { message: String },

    #[error("Not logged in")]
    NotAuthenticated,

    // ── Input ────────────────────────────────────────────────────────
    #[error("{field}: {message}")]
    ValidationFailed { field: &'static str, message: String },

    // ── Local state ──────────────────────────────────────────────────
    #[error("Session storage error: {message}")]
    Session { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Whether logging in again could fix this.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::AuthFailure { .. } | Self::NotAuthenticated)
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<opsdeck_api::Error> for CoreError {
    fn from(err: opsdeck_api::Error) -> Self {
        match err {
            opsdeck_api::Error::Authentication { message }
            | opsdeck_api::Error::Unauthorized { message } => CoreError::AuthFailure { message },
            opsdeck_api::Error::Transport(ref e) => CoreError::NetworkFailure {
                message: e.to_string(),
                status: e.status().map(|s| s.as_u16()),
            },
            opsdeck_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            opsdeck_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            opsdeck_api::Error::Api { status, message } => CoreError::NetworkFailure {
                message,
                status: Some(status),
            },
            opsdeck_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        CoreError::Session {
            message: err.to_string(),
        }
    }
}
