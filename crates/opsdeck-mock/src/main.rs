use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, NaiveTime};
use clap::{Args, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Result, WrapErr};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use opsdeck_api::Environment;
use opsdeck_mock::{FixtureOptions, MockOptions, MockState, fixtures};

// ── CLI ──────────────────────────────────────────────────────────────

/// opsdeck-mock -- seeded stand-in for the dashboard API
#[derive(Debug, Parser)]
#[command(
    name = "opsdeck-mock",
    version,
    about = "Serve or dump seeded dashboard fixtures",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve(ServeArgs),
    /// Print one environment's fixtures as JSON
    Fixtures(FixturesArgs),
}

#[derive(Debug, Args)]
struct SeedArgs {
    /// Users per environment (one cron job each)
    #[arg(long)]
    count: Option<usize>,

    /// Extra seed mixed into every environment
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

#[derive(Debug, Args)]
struct ServeArgs {
    /// Address to listen on (host:port)
    #[arg(long, short = 'b', env = "OPSDECK_MOCK_BIND")]
    bind: Option<String>,

    /// Artificial response latency in milliseconds
    #[arg(long)]
    latency_ms: Option<u64>,

    /// Email domain allowed to log in
    #[arg(long)]
    accepted_domain: Option<String>,

    #[command(flatten)]
    seed: SeedArgs,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Kind {
    Users,
    CronJobs,
}

#[derive(Debug, Args)]
struct FixturesArgs {
    /// Environment to generate
    #[arg(long, short = 'e', default_value = "development")]
    env: Environment,

    /// Collection to print
    #[arg(long, short = 'k', value_enum, default_value = "users")]
    kind: Kind,

    /// Print at most this many records
    #[arg(long, short = 'n')]
    limit: Option<usize>,

    /// Date the records are generated relative to (YYYY-MM-DD, default today)
    #[arg(long)]
    anchor: Option<NaiveDate>,

    #[command(flatten)]
    seed: SeedArgs,
}

// ── Entry ────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = opsdeck_config::load_config_or_default();

    match cli.command {
        Command::Serve(args) => serve(args, config.mock).await,
        Command::Fixtures(args) => dump(&args, &config.mock),
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "opsdeck_mock=info,tower_http=warn",
        1 => "opsdeck_mock=debug,tower_http=info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn fixture_options(seed: &SeedArgs, settings: &opsdeck_config::MockSettings) -> FixtureOptions {
    let mut opts = FixtureOptions::today(seed.count.unwrap_or(settings.fixture_count));
    opts.seed = seed.seed;
    opts
}

async fn serve(args: ServeArgs, mut settings: opsdeck_config::MockSettings) -> Result<()> {
    if let Some(bind) = args.bind {
        settings.bind = bind;
    }
    if let Some(latency_ms) = args.latency_ms {
        settings.latency_ms = latency_ms;
    }
    if let Some(domain) = args.accepted_domain {
        settings.accepted_domain = domain;
    }

    let addr = settings.bind_addr()?;
    let state = Arc::new(MockState::new(MockOptions {
        latency: Duration::from_millis(settings.latency_ms),
        accepted_domain: settings.accepted_domain.clone(),
        fixtures: fixture_options(&args.seed, &settings),
    }));

    let listener = TcpListener::bind(addr)
        .await
        .wrap_err_with(|| format!("failed to bind {addr}"))?;
    info!(
        %addr,
        latency_ms = settings.latency_ms,
        domain = %settings.accepted_domain,
        "mock API listening"
    );

    opsdeck_mock::serve(listener, state, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
        }
    })
    .await?;

    info!("mock API stopped");
    Ok(())
}

fn dump(args: &FixturesArgs, settings: &opsdeck_config::MockSettings) -> Result<()> {
    let mut opts = fixture_options(&args.seed, settings);
    if let Some(anchor) = args.anchor {
        opts.anchor = anchor.and_time(NaiveTime::MIN).and_utc();
    }

    let set = fixtures::generate(args.env, &opts);
    let limit = args.limit.unwrap_or(usize::MAX);

    let json = match args.kind {
        Kind::Users => {
            serde_json::to_string_pretty(&set.users.iter().take(limit).collect::<Vec<_>>())?
        }
        Kind::CronJobs => {
            serde_json::to_string_pretty(&set.cron_jobs.iter().take(limit).collect::<Vec<_>>())?
        }
    };
    println!("{json}");
    Ok(())
}
