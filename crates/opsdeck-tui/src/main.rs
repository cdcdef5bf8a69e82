//! `opsdeck-tui`: terminal admin dashboard for scheduled jobs and users.
//!
//! Built on [ratatui](https://ratatui.rs) over `opsdeck-core`'s dashboard.
//! Logged out it shows the login form; logged in, one tab per module the
//! account may open, with an environment picker in the header.
//!
//! Every view lives at a location (`/dashboard/scheduler?env=staging&…`)
//! kept in an in-app history: `[`/`]` go back and forward, and
//! `--location` opens a deep link directly.
//!
//! Logs are written to a file (default `/tmp/opsdeck-tui.log`) to avoid
//! corrupting the terminal UI.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use opsdeck_core::{Dashboard, Location};

use crate::app::App;

/// Terminal admin dashboard for the opsdeck API.
#[derive(Parser, Debug)]
#[command(name = "opsdeck-tui", version, about)]
struct Cli {
    /// Location to open, e.g. "/dashboard/scheduler?env=staging"
    #[arg(short, long, default_value = "/")]
    location: String,

    /// API base URL, overriding the config file
    #[arg(short = 'u', long, env = "OPSDECK_URL")]
    api_url: Option<String>,

    /// Config file (defaults to the platform config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log file path (defaults to /tmp/opsdeck-tui.log)
    #[arg(long, default_value = "/tmp/opsdeck-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. We MUST NOT log to stdout/stderr since that would
/// corrupt the TUI output. Returns a guard that must be held for the
/// lifetime of the application to ensure logs are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "opsdeck_tui={log_level},opsdeck_core={log_level},opsdeck_api={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("opsdeck-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

/// Priority: CLI flags > config file (+ `OPSDECK_*` env) > defaults.
fn load_config(cli: &Cli) -> Result<opsdeck_config::Config> {
    let mut cfg = match &cli.config {
        Some(path) => opsdeck_config::load_config_from(path)?,
        None => opsdeck_config::load_config_or_default(),
    };
    if let Some(url) = &cli.api_url {
        cfg.api.url.clone_from(url);
    }
    Ok(cfg)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    // Tracing to file; hold the guard so logs flush on exit
    let _log_guard = setup_tracing(&cli);

    let cfg = load_config(&cli)?;
    let dashboard = Dashboard::new(opsdeck_config::to_dashboard_config(&cfg)?)?;

    info!(
        api = %cfg.api.url,
        location = %cli.location,
        logged_in = dashboard.session().is_authenticated(),
        "starting opsdeck-tui"
    );

    let mut app = App::new(dashboard.clone(), Location::parse(&cli.location), &cfg.ui);
    let result = app.run().await;

    dashboard.shutdown();
    result
}
