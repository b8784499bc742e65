//! Sitemap-Ripple main entry point
//!
//! This is the command-line interface for the Sitemap-Ripple crawler.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use sitemap_ripple::config::{load_config, validate, Config};
use sitemap_ripple::crawler::run_crawl;
use sitemap_ripple::output::{log_statistics, render_sitemap};
use tracing_subscriber::EnvFilter;

/// Sitemap-Ripple: a concurrent single-host sitemap crawler
///
/// Crawls every page on HOST reachable by following links, then prints the
/// discovered pages and their assets as a tree.
#[derive(Parser, Debug)]
#[command(name = "sitemap-ripple")]
#[command(version)]
#[command(about = "A concurrent single-host sitemap crawler", long_about = None)]
struct Cli {
    /// Host to crawl, e.g. example.com (a full http(s) URL also works)
    #[arg(value_name = "HOST")]
    host: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of concurrent fetch slots
    #[arg(long)]
    pool_size: Option<usize>,

    /// Maximum number of URLs waiting in the frontier
    #[arg(long)]
    frontier_capacity: Option<usize>,

    /// Completion check interval in milliseconds
    #[arg(long)]
    sample_interval_ms: Option<u64>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;

    tracing::info!("Starting to crawl {}", cli.host);
    let report = run_crawl(config, &cli.host)
        .await
        .with_context(|| format!("crawl of {} failed", cli.host))?;

    let stdout = std::io::stdout();
    render_sitemap(&report.sitemap, &report.root, &mut stdout.lock())
        .context("failed to write sitemap")?;

    log_statistics(&report.statistics);
    tracing::info!("Good bye!");

    Ok(())
}

/// Loads the config file (if any) and applies command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(pool_size) = cli.pool_size {
        config.crawler.pool_size = pool_size;
    }
    if let Some(capacity) = cli.frontier_capacity {
        config.crawler.frontier_capacity = capacity;
    }
    if let Some(interval) = cli.sample_interval_ms {
        config.crawler.sample_interval_ms = interval;
    }

    validate(&config).context("invalid configuration")?;
    Ok(config)
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr; stdout carries only the sitemap.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if let Ok(filter) = EnvFilter::try_from_default_env() {
        filter
    } else {
        match verbose {
            0 => EnvFilter::new("sitemap_ripple=info,warn"),
            1 => EnvFilter::new("sitemap_ripple=debug,info"),
            2 => EnvFilter::new("sitemap_ripple=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
