// ── Runtime dashboard configuration ──
//
// Describes where the API lives and where the session is kept. Never
// touches disk itself: opsdeck-config (or a test) builds one and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// API base URL; endpoints live under `/api/`.
    pub api_url: Url,
    pub timeout: Duration,
    /// JSON file holding the persisted session.
    pub session_path: PathBuf,
}
