//! Deepsift main entry point
//!
//! This is the command-line interface for the Deepsift search crawler.

use anyhow::Context;
use clap::{Parser, Subcommand};
use deepsift::config::{load_config_with_hash, Config};
use deepsift::crawler::Coordinator;
use deepsift::output::{print_results, print_summary, write_results};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Deepsift: crawl a hidden-service search engine through Tor
///
/// Deepsift sends one search to the endpoint, follows its result pages and
/// collects every host the engine reports.
#[derive(Parser, Debug)]
#[command(name = "deepsift")]
#[command(version)]
#[command(about = "Crawl a hidden-service search engine through Tor", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to a TOML configuration file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a search and collect every result page
    Search {
        /// Search term, or a literal page path starting with '/'
        #[arg(short = 'r', long = "request", value_name = "REQUEST", value_parser = non_blank)]
        request: String,

        /// Save results to this file (must not exist yet)
        #[arg(short = 'f', long = "file", value_name = "FILE")]
        file: Option<PathBuf>,
    },
}

/// Rejects an empty or whitespace-only request
fn non_blank(value: &str) -> Result<String, String> {
    if value.trim().is_empty() {
        return Err("request must not be empty".to_string());
    }
    Ok(value.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Help, version and usage errors all exit with status 1
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    };

    setup_logging(cli.verbose, cli.quiet);

    let config = load_configuration(cli.config.as_deref())?;

    match cli.command {
        Command::Search { request, file } => handle_search(&config, &request, file).await,
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("deepsift=info,warn"),
            1 => EnvFilter::new("deepsift=debug,info"),
            2 => EnvFilter::new("deepsift=trace,debug"),
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

/// Loads the configuration file, or the defaults when none is given
fn load_configuration(path: Option<&std::path::Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::debug!("No configuration file given, using defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    Ok(config)
}

/// Handles the `search` subcommand
async fn handle_search(
    config: &Config,
    request: &str,
    file: Option<PathBuf>,
) -> anyhow::Result<()> {
    // Fail on an unusable output path before spending time on the crawl
    if let Some(path) = &file {
        if path.exists() {
            anyhow::bail!(
                "{} already exists, refusing to overwrite",
                path.display()
            );
        }

        let parent = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => std::path::Path::new("."),
        };
        if !parent.is_dir() {
            anyhow::bail!("directory {} does not exist", parent.display());
        }
    }

    tracing::info!(
        "Searching {} via {}",
        config.endpoint.base_url(),
        config.endpoint.proxy_url().unwrap_or("direct connection")
    );

    let coordinator = Coordinator::from_config(config)?;
    let report = match coordinator.run(request).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    print_results(&report.entries);
    print_summary(&report);

    if let Some(path) = file {
        write_results(&path, &report.entries)
            .with_context(|| format!("failed to save results to {}", path.display()))?;
        println!("\nResults saved to: {}", path.display());
    }

    Ok(())
}
