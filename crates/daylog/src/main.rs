//! daylog: Daylog Main Binary
//!
//! Main entry point for the Daylog application.
//!
//! Usage:
//!   daylog                    - Start server mode (HTTP API)
//!   daylog --notify [DATE]    - Send one day to Slack and exit
//!   daylog --help             - Show help

use std::sync::Arc;

use anyhow::Context;
use daylog_core::{Clock, Config, DayRepository, SystemClock, parse_date_key};
use daylog_slack::DayNotifier;
use tracing_subscriber::EnvFilter;

/// Run mode
#[derive(Debug, PartialEq, Eq)]
enum RunMode {
    /// Server mode (HTTP API)
    Server,
    /// One-shot notification for a date (default: today)
    Notify(Option<String>),
    /// Show help
    Help,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mode = parse_args(&args);

    match mode {
        RunMode::Help => {
            print_help();
            return Ok(());
        }
        RunMode::Version => {
            println!("daylog {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        _ => {}
    }

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    // Load .env file
    dotenvy::dotenv().ok();

    let config = Config::load().context("Config error")?;
    tracing::debug!("Loaded configuration: {:?}", config);

    let repository = DayRepository::new(&config.store.db_path)
        .with_context(|| format!("Failed to open database at {}", config.store.db_path))?;
    let notifier = DayNotifier::from_config(&config.slack)?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    match mode {
        RunMode::Notify(date) => run_notify(repository, notifier, clock, date).await,
        _ => run_server(config, repository, notifier, clock).await,
    }
}

/// Parse command line arguments (without the program name)
///
/// `--help` and `--version` win over `--notify` wherever they appear.
fn parse_args(args: &[String]) -> RunMode {
    let mut iter = args.iter().peekable();
    let mut mode = RunMode::Server;

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--notify" | "-n" => {
                // 次の引数がフラグなら日付として消費しない
                let date = iter.next_if(|d| !d.starts_with('-')).cloned();
                mode = RunMode::Notify(date);
            }
            "--help" | "-h" => return RunMode::Help,
            "--version" | "-v" => return RunMode::Version,
            _ => {}
        }
    }

    mode
}

/// Print help message
fn print_help() {
    println!("daylog - calendar scheduling log with Slack notifications");
    println!();
    println!("Usage:");
    println!("  daylog                   Start server mode (HTTP API)");
    println!("  daylog --notify [DATE]   Send DATE (YYYY-MM-DD, default today) to Slack");
    println!("  daylog --help            Show this help message");
    println!("  daylog --version         Show version");
    println!();
    println!("Environment Variables:");
    println!("  API_PORT                 HTTP API port (default: 3000)");
    println!("  API_ALLOWED_ORIGINS      Comma-separated CORS origins (default: any)");
    println!("  DB_PATH                  SQLite database path (default: data/daylog.db)");
    println!("  SLACK_BOT_TOKEN          Slack bot token");
    println!("  SLACK_CHANNEL_DEFAULT    Fallback channel id");
    println!("  SLACK_CHANNEL_MON..SUN   Per-weekday channel ids");
}

/// Run server mode until Ctrl+C
async fn run_server(
    config: Config,
    repository: DayRepository,
    notifier: DayNotifier,
    clock: Arc<dyn Clock>,
) -> anyhow::Result<()> {
    tracing::info!("Starting daylog...");
    tracing::info!("Stored days: {}", repository.count().await?);

    if !notifier.is_configured() {
        tracing::info!("Slack notify endpoints will return configuration errors");
    }

    let state = daylog_api::AppState::new(repository, notifier, clock);

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
        }
        tracing::info!("Shutting down...");
    };

    daylog_api::start_server(&config.api, state, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Send a single day to Slack and exit
async fn run_notify(
    repository: DayRepository,
    notifier: DayNotifier,
    clock: Arc<dyn Clock>,
    date: Option<String>,
) -> anyhow::Result<()> {
    let date = date.unwrap_or_else(|| clock.today_key());
    parse_date_key(&date)?;

    let day = repository
        .get_by_date(&date)
        .await?
        .with_context(|| format!("No record for {}", date))?;

    let receipt = notifier.send(&day).await?;
    println!("Sent {} to {} (ts {})", date, receipt.channel, receipt.ts);
    Ok(())
}
