//! Sumi-Sitemap main entry point
//!
//! This is the command-line interface for the Sumi-Sitemap crawler.

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use sumi_sitemap::config::{load_config_with_hash, Config, FilterEntry};
use sumi_sitemap::crawler::run_crawl;
use sumi_sitemap::output::{print_statistics, sitemap_path};
use tracing_subscriber::EnvFilter;

/// Sumi-Sitemap: a same-origin sitemap crawler
///
/// Sumi-Sitemap walks every page reachable from a seed URL on one host and
/// writes the discovered URLs as a sitemap XML document.
#[derive(Parser, Debug)]
#[command(name = "sumi-sitemap")]
#[command(version)]
#[command(about = "A same-origin sitemap crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,

    /// Only list links found on the entry page
    #[arg(long)]
    shallow: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.shallow {
        config.crawler.deep = false;
    }

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(&config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_sitemap=info,warn"),
            1 => EnvFilter::new("sumi_sitemap=debug,info"),
            2 => EnvFilter::new("sumi_sitemap=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the resolved configuration
fn handle_dry_run(config: &Config) {
    println!("=== Sumi-Sitemap Dry Run ===\n");

    println!("Site:");
    println!("  Host: {}", config.site.host);
    println!("  Entry: {}", config.site.entry);

    println!("\nCrawler Configuration:");
    println!("  Deep: {}", config.crawler.deep);
    println!("  Include seed: {}", config.crawler.include_seed);
    println!("  Max retry: {}", config.crawler.max_retry);
    println!(
        "  Loop interval: {}ms",
        config.effective_loop_interval().as_millis()
    );
    println!("  Backoff base: {}ms", config.crawler.backoff_base);
    println!("  Request timeout: {}s", config.crawler.request_timeout);
    println!("  User agent: {}", config.crawler.user_agent);

    println!("\nFilters ({}):", config.filters.len());
    for filter in &config.filters {
        match filter {
            FilterEntry::Contains(text) => println!("  - contains {}", text),
            FilterEntry::Regex(pattern) => println!("  - regex {}", pattern),
        }
    }

    println!(
        "\nOutput: {}",
        sitemap_path(Path::new(&config.output.path), &config.output.filename).display()
    );

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config) -> anyhow::Result<()> {
    tracing::info!(
        "Mapping {} from {} ({} filters)",
        config.site.host,
        config.site.entry,
        config.filters.len()
    );

    let report = run_crawl(config).await.context("crawl failed")?;

    if let Some(path) = &report.output_path {
        println!("Sitemap written to {}\n", path.display());
    }
    print_statistics(&report.statistics);

    Ok(())
}
