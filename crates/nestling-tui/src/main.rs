//! `nestling` — crib-side terminal dashboard for a baby monitor backend.
//!
//! Built on [ratatui](https://ratatui.rs) with reactive data from
//! `nestling-core`'s synchronization layer: continuous polling for stats
//! and health, fetch-on-change reads for the weekly trend and event logs.
//!
//! Logs are written to a file (default `/tmp/nestling.log`) to avoid
//! corrupting the terminal UI.
//!
//! Entry point: CLI argument parsing, tracing setup, panic hooks, and app
//! launch.

mod app;
mod event;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use nestling_api::ApiClient;
use nestling_core::Dashboard;

use crate::app::App;

/// Terminal dashboard for a nursery baby monitor.
#[derive(Parser, Debug)]
#[command(name = "nestling", version, about)]
struct Cli {
    /// Monitor backend URL (e.g., http://nursery.local:8001)
    #[arg(short = 'u', long)]
    base_url: Option<url::Url>,

    /// Log file path (defaults to /tmp/nestling.log)
    #[arg(long, default_value = "/tmp/nestling.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. We MUST NOT log to stdout/stderr — that would
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
            "nestling_tui={log_level},nestling_core={log_level},nestling_api={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("nestling.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    // Tracing to file — hold the guard so logs flush on exit
    let _log_guard = setup_tracing(&cli);

    // Config file + NESTLING_* env; the CLI flag outranks both.
    let mut config = nestling_config::load_config().wrap_err("loading configuration")?;
    if let Some(base_url) = cli.base_url.clone() {
        config.base_url = base_url;
    }

    info!(base_url = %config.base_url, "starting nestling");

    let api = ApiClient::new(config.gateway())?;
    let dashboard = Dashboard::new(api, &config.dashboard(), chrono::Local::now().date_naive());

    let mut app = App::new(dashboard, config.baby_age_months);
    app.run().await?;

    Ok(())
}
