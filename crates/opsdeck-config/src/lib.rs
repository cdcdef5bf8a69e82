//! Shared configuration for the opsdeck TUI and mock API server.
//!
//! One TOML file (platform config dir) layered under `OPSDECK_*`
//! environment variables, plus translation to `opsdeck_core::DashboardConfig`.
//! Both binaries depend on this crate; their CLI flags override on top.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use opsdeck_core::DashboardConfig;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration shared by the TUI and the mock server.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub session: SessionSettings,

    #[serde(default)]
    pub ui: UiSettings,

    #[serde(default)]
    pub mock: MockSettings,
}

/// Where the dashboard API lives.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ApiSettings {
    /// Base URL (e.g., "http://127.0.0.1:4000").
    #[serde(default = "default_api_url")]
    pub url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            url: default_api_url(),
            timeout: default_timeout(),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SessionSettings {
    /// Session file override. Defaults to `session.json` in the data dir.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UiSettings {
    /// Tick interval for the event loop, in milliseconds.
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,

    /// Redraw rate in frames per second.
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            frame_rate: default_frame_rate(),
        }
    }
}

/// Mock API server settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MockSettings {
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Artificial latency added to login and collection responses.
    #[serde(default = "default_latency")]
    pub latency_ms: u64,

    /// Logins succeed only for addresses at this domain.
    #[serde(default = "default_accepted_domain")]
    pub accepted_domain: String,

    /// Users generated per environment (one cron job each).
    #[serde(default = "default_fixture_count")]
    pub fixture_count: usize,
}

impl Default for MockSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            latency_ms: default_latency(),
            accepted_domain: default_accepted_domain(),
            fixture_count: default_fixture_count(),
        }
    }
}

fn default_api_url() -> String {
    "http://127.0.0.1:4000".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_tick_rate() -> u64 {
    250
}
fn default_frame_rate() -> u32 {
    30
}
fn default_bind() -> String {
    "127.0.0.1:4000".into()
}
fn default_latency() -> u64 {
    1000
}
fn default_accepted_domain() -> String {
    "opsdeck.dev".into()
}
fn default_fixture_count() -> usize {
    100
}

impl MockSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind.parse().map_err(|_| ConfigError::Validation {
            field: "mock.bind".into(),
            reason: format!("expected host:port, got '{}'", self.bind),
        })
    }

    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "opsdeck", "opsdeck")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback().join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Default session file location (platform data dir).
pub fn default_session_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback().join("session.json"),
        |dirs| dirs.data_dir().join("session.json"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("opsdeck");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from an explicit file, layered under `OPSDECK_*` env vars.
///
/// Nested keys use a double underscore: `OPSDECK_API__URL`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("OPSDECK_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if anything goes wrong.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

/// Build the runtime `DashboardConfig` from the file config.
pub fn to_dashboard_config(cfg: &Config) -> Result<DashboardConfig, ConfigError> {
    let api_url: url::Url = cfg.api.url.parse().map_err(|_| ConfigError::Validation {
        field: "api.url".into(),
        reason: format!("invalid URL: {}", cfg.api.url),
    })?;

    Ok(DashboardConfig {
        api_url,
        timeout: Duration::from_secs(cfg.api.timeout),
        session_path: cfg
            .session
            .path
            .clone()
            .unwrap_or_else(default_session_path),
    })
}
