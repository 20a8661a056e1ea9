//! Sumi-Seek main entry point
//!
//! This is the command-line interface for the Sumi-Seek keyword crawler.

use anyhow::Context;
use clap::Parser;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use sumi_seek::config::{load_config, load_config_from_env, Config};
use sumi_seek::service::ResultsResponse;
use sumi_seek::{CrawlApi, CrawlStatus};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

/// Sumi-Seek: a keyword-driven site crawler
///
/// Sumi-Seek crawls every page under the configured base URL and reports
/// the pages whose HTML contains KEYWORD. Results are printed as JSON lines
/// while the crawl runs. Press Ctrl-C once to halt the crawl, twice to
/// finish it immediately.
#[derive(Parser, Debug)]
#[command(name = "sumi-seek")]
#[command(version = "1.0.0")]
#[command(about = "A keyword-driven site crawler", long_about = None)]
struct Cli {
    /// Keyword to search for (4 to 32 characters, case-insensitive)
    #[arg(value_name = "KEYWORD", required_unless_present = "dry_run")]
    keyword: Option<String>,

    /// Path to TOML configuration file; environment variables alone are used when omitted
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Delay between result polls in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 500)]
    poll_interval: u64,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show the effective settings without crawling
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?
        }
        None => {
            tracing::info!("Loading configuration from environment");
            load_config_from_env().context("failed to load configuration from environment")?
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    let keyword = cli
        .keyword
        .context("a keyword is required unless --dry-run is given")?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.crawler.effective_worker_threads())
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;

    runtime.block_on(handle_crawl(
        config,
        keyword,
        Duration::from_millis(cli.poll_interval.max(1)),
    ))
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_seek=info,warn"),
            1 => EnvFilter::new("sumi_seek=debug,info"),
            2 => EnvFilter::new("sumi_seek=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // Logs go to stderr so stdout carries only result lines
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Sumi-Seek Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Base URL: {}", config.crawler.base_url);
    println!("  Max results: {}", config.crawler.max_results);
    println!(
        "  Cache clear interval: {}s",
        config.crawler.cache_clear_interval
    );
    println!(
        "  Worker threads: {}",
        config.crawler.effective_worker_threads()
    );

    println!("\nIdentifiers:");
    println!("  Length: {}", config.identifier.length);
    println!(
        "  Accepted lengths: {:?}",
        config.identifier.effective_accepted_lengths()
    );

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.user_agent_string());

    println!("\n✓ Configuration is valid");
}

/// Forwards every Ctrl-C to the returned channel
///
/// The listener re-arms immediately after each signal, so presses that land
/// while the poll loop is busy are queued rather than lost.
fn spawn_interrupt_listener() -> mpsc::UnboundedReceiver<()> {
    forward_signals(tokio::signal::ctrl_c)
}

/// Awaits `next_signal` in a loop on its own task, sending one message per signal
fn forward_signals<F, Fut>(mut next_signal: F) -> mpsc::UnboundedReceiver<()>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = std::io::Result<()>> + Send,
{
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        loop {
            if let Err(e) = next_signal().await {
                tracing::error!("Failed to listen for Ctrl-C: {}", e);
                break;
            }
            if tx.send(()).is_err() {
                break;
            }
        }
    });
    rx
}

/// Handles the main crawl operation: start, poll and steer one crawl
async fn handle_crawl(config: Config, keyword: String, poll: Duration) -> anyhow::Result<()> {
    let api = CrawlApi::from_config(&config).context("failed to set up the crawler")?;
    let id = api.start_crawl(&keyword)?.id;
    tracing::info!("Crawl {} started for keyword '{}'", id, keyword);

    let mut interrupts_rx = spawn_interrupt_listener();
    let mut interval = tokio::time::interval(poll);
    let mut last: Option<ResultsResponse> = None;
    let mut interrupts = 0u8;

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            Some(()) = interrupts_rx.recv() => {
                interrupts = interrupts.saturating_add(1);
                let status = if interrupts == 1 { CrawlStatus::Halt } else { CrawlStatus::Done };
                tracing::warn!("Interrupted, setting crawl {} to {}", id, status);
                api.set_crawl_status(&id, status.as_str())?;
            }
        }

        let snapshot = api.get_results(&id)?;
        if last.as_ref() != Some(&snapshot) {
            println!("{}", serde_json::to_string(&snapshot)?);
        }

        if snapshot.status.is_finished() {
            match snapshot.status {
                CrawlStatus::Failed => {
                    let message = snapshot.message.as_deref().unwrap_or("unknown error");
                    anyhow::bail!("crawl {} failed: {}", id, message);
                }
                _ => {
                    tracing::info!(
                        "Crawl {} finished with {} matching URLs",
                        id,
                        snapshot.urls.len()
                    );
                    return Ok(());
                }
            }
        }
        last = Some(snapshot);
    }
}
