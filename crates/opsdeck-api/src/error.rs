use thiserror::Error;

/// Top-level error type for the `opsdeck-api` crate.
///
/// Covers every failure mode of the dashboard API surface:
/// authentication, transport, HTTP status and payload decoding.
/// `opsdeck-core` maps these into its own taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login rejected (unknown account, wrong password).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Bearer token missing or not recognised by the server.
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── API ─────────────────────────────────────────────────────────
    /// Non-success status with the server's `{error}` message, if any.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the failure is about credentials or the token,
    /// i.e. logging in again might resolve it.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            Self::Authentication { .. } | Self::Unauthorized { .. }
        )
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Unauthorized { .. } => Some(401),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_failures_are_classified() {
        assert!(
            Error::Authentication {
                message: "bad".into()
            }
            .is_auth_failure()
        );
        assert!(
            Error::Unauthorized {
                message: "missing".into()
            }
            .is_auth_failure()
        );
        assert!(!Error::Timeout { timeout_secs: 3 }.is_auth_failure());
    }

    #[test]
    fn server_errors_are_transient() {
        let err = Error::Api {
            status: 503,
            message: "unavailable".into(),
        };
        assert!(err.is_transient());
        assert_eq!(err.status(), Some(503));

        let err = Error::Api {
            status: 400,
            message: "bad env".into(),
        };
        assert!(!err.is_transient());
    }
}
