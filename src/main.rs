//! html-scraper main entry point
//!
//! This is the command-line interface for the html-scraper crawler.

use anyhow::Context;
use clap::Parser;
use html_scraper::config::{resolve_config, Config, ConfigOverrides};
use html_scraper::crawler::Coordinator;
use html_scraper::output::print_statistics;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// html-scraper: recursively fetch HTML pages from a root URL
///
/// Fetches the root page, follows its links level by level up to the given
/// depth, and writes every page to `{output_dir}/{depth}/`.
#[derive(Parser, Debug)]
#[command(name = "html-scraper")]
#[command(version)]
#[command(about = "Recursively scrapes HTML pages from a root URL to a given depth", long_about = None)]
struct Cli {
    /// Root URL to start scraping from
    #[arg(value_name = "ROOT_URL")]
    root_url: Option<String>,

    /// Max depth of the recursive scrape
    #[arg(short, long, value_name = "DEPTH")]
    level: Option<u32>,

    /// Max URLs to follow per HTML page (unbounded if omitted)
    #[arg(short, long, value_name = "N")]
    width: Option<usize>,

    /// Scrape unique URLs only
    #[arg(short, long)]
    unique: bool,

    /// Output directory to store scraped pages
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Scrape pages even if TLS certificate verification fails
    #[arg(long)]
    ignore_ssl_verification: bool,

    /// Max fetches in flight at once within a level (unbounded if omitted)
    #[arg(short = 'j', long, value_name = "N")]
    max_concurrent: Option<usize>,

    /// Path to a TOML configuration file; command-line values override it
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate the configuration and print it without crawling
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            root_url: self.root_url.clone(),
            max_depth: self.level,
            max_width: self.width,
            unique_urls_only: self.unique,
            output_dir: self.output_dir.clone(),
            ignore_ssl_verification: self.ignore_ssl_verification,
            max_concurrent_fetches: self.max_concurrent,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let (config, config_hash) = resolve_config(cli.config.as_deref(), cli.overrides())
        .context("Failed to load configuration")?;

    if let (Some(path), Some(hash)) = (&cli.config, &config_hash) {
        tracing::info!(
            "Configuration loaded from {} (hash: {})",
            path.display(),
            hash
        );
    }

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("html_scraper=info,warn"),
            1 => EnvFilter::new("html_scraper=debug,info"),
            2 => EnvFilter::new("html_scraper=trace,debug"),
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

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config) {
    println!("=== html-scraper Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Root URL: {}", config.crawler.root_url);
    println!("  Max depth: {}", config.crawler.max_depth);
    match config.crawler.max_width {
        Some(width) => println!("  Max links per page: {}", width),
        None => println!("  Max links per page: unbounded"),
    }
    println!("  Unique URLs only: {}", config.crawler.unique_urls_only);
    match config.crawler.max_concurrent_fetches {
        Some(limit) => println!("  Max concurrent fetches: {}", limit),
        None => println!("  Max concurrent fetches: unbounded"),
    }

    println!("\nHTTP:");
    println!(
        "  Ignore SSL verification: {}",
        config.http.ignore_ssl_verification
    );

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory.display());

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
///
/// Ctrl-C stops launching new fetches; pages already fetched are still
/// written before the partial statistics are printed.
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        "Scraping {} to depth {} into {}",
        config.crawler.root_url,
        config.crawler.max_depth,
        config.output.directory.display()
    );

    let mut coordinator = Coordinator::new(config).context("Failed to initialize crawler")?;

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let stats = coordinator
        .run_until(shutdown)
        .await
        .context("Crawl failed")?;

    print_statistics(&stats);

    Ok(())
}
