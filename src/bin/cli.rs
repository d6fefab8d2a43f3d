//! quakefeed CLI
//!
//! Polls the JMA bulletin feed and broadcasts new bulletins.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use quakefeed::{
    error::{AppError, Result},
    models::{Config, POLL_INTERVAL},
    notify::{ConsoleNotifier, LineNotifier, Notifier, StopFile},
    pipeline::{self, PollOutcome, WatchExit, Watcher},
    services::HttpFetcher,
    storage::{LocalStorage, MemoryStorage, StateStore},
};

/// quakefeed - JMA Earthquake and Tsunami Bulletin Watcher
#[derive(Parser, Debug)]
#[command(
    name = "quakefeed",
    version,
    about = "Broadcasts new JMA earthquake and tsunami bulletins"
)]
struct Cli {
    /// Path to storage directory containing config and saved state
    #[arg(short, long, default_value = "storage", global = true)]
    storage_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// LINE channel access token
    #[arg(long, env = "LINE_TOKEN", hide_env_values = true, global = true)]
    line_token: Option<String>,

    /// Log bulletins instead of broadcasting, and keep saved state untouched
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Poll the feed until stopped
    Watch,

    /// Run a single poll cycle
    Once,

    /// Validate configuration file
    Validate,

    /// Show saved state info
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn build_notifier(cli: &Cli, config: &Config) -> Result<Box<dyn Notifier>> {
    if cli.dry_run {
        return Ok(Box::new(ConsoleNotifier));
    }
    let token = cli
        .line_token
        .as_deref()
        .ok_or_else(|| AppError::config("LINE token missing: pass --line-token or set LINE_TOKEN"))?;
    Ok(Box::new(LineNotifier::from_config(&config.notifier, token)?))
}

async fn build_store(cli: &Cli, local: LocalStorage) -> Result<Box<dyn StateStore>> {
    if cli.dry_run {
        log::info!("Dry run: saved state is read but never written");
        return Ok(Box::new(MemoryStorage::snapshot_of(&local).await?));
    }
    Ok(Box::new(local))
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    log::info!("quakefeed starting...");

    let config_path = cli.storage_dir.join("config.toml");
    let config = Config::load_or_default(&config_path);

    log::info!("Loaded configuration from {}", cli.storage_dir.display());

    let local = LocalStorage::new(&cli.storage_dir);

    match cli.command {
        Command::Watch => {
            config.validate()?;
            let fetcher = HttpFetcher::from_config(&config.feed)?;
            let notifier = build_notifier(&cli, &config)?;
            let store = build_store(&cli, local).await?;
            let stop = StopFile::in_dir(&cli.storage_dir);

            let watcher = Watcher::new(&config.feed.url, &fetcher, store.as_ref(), notifier.as_ref());
            log::info!("Create {} to stop after the current cycle", stop.path().display());

            match pipeline::run_watch(&watcher, &stop, POLL_INTERVAL).await {
                WatchExit::StopRequested => log::info!("Stopped by sentinel file"),
                WatchExit::Interrupted => log::info!("Stopped by Ctrl-C"),
            }
        }

        Command::Once => {
            config.validate()?;
            let fetcher = HttpFetcher::from_config(&config.feed)?;
            let notifier = build_notifier(&cli, &config)?;
            let store = build_store(&cli, local).await?;

            let watcher = Watcher::new(&config.feed.url, &fetcher, store.as_ref(), notifier.as_ref());
            let report = watcher.run_cycle().await?;

            match report.poll {
                PollOutcome::Updated => {
                    log::info!(
                        "{} new bulletins ({} candidates, {} already processed)",
                        report.delivered.len(),
                        report.candidates,
                        report.skipped
                    );
                    for record in &report.delivered {
                        log::info!("  - {} [{}]", record.title.replace('\n', " "), record.identity);
                    }
                    if report.delivery_failures > 0 {
                        log::warn!("{} deliveries failed", report.delivery_failures);
                    }
                }
                PollOutcome::Unchanged => log::info!("Feed unchanged since last check"),
                PollOutcome::Unreachable => log::warn!("Feed unreachable, try again later"),
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK (feed: {})", config.feed.url);

            if !cli.dry_run && cli.line_token.is_none() {
                log::warn!("No LINE token configured; only --dry-run will work");
            }

            log::info!("All validations passed!");
        }

        Command::Info => {
            log::info!("Storage directory: {}", local.root_dir().display());

            let checkpoint = local.load_checkpoint().await?;
            match checkpoint.latest {
                Some(latest) => log::info!("Feed last modified: {}", latest),
                None => log::info!("Feed has not been polled yet."),
            }

            let identities = local.load_identities().await?;
            log::info!("Processed bulletins: {}", identities.len());

            let ledger = local.load_ledger().await?;
            log::info!("Tracked report sequences: {}", ledger.len());
        }
    }

    log::info!("Done!");

    Ok(())
}
