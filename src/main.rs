//! Reel-Ripple main entry point
//!
//! This is the command-line interface for the Reel-Ripple film crawler.

use anyhow::Context;
use clap::Parser;
use reel_ripple::config::{resolve_config, Overrides};
use reel_ripple::crawler::crawl;
use reel_ripple::output::{
    create_output, load_prior_corpus, print_statistics, ranked_corpus, write_corpus,
    CrawlStatistics,
};
use reel_ripple::QualityThreshold;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Reel-Ripple: a breadth-first film recommendation crawler
///
/// Reel-Ripple starts from a seed film, follows "similar film" links to a
/// bounded depth, and writes the well-rated films it found, ordered by how
/// many ratings back them.
#[derive(Parser, Debug)]
#[command(name = "reel-ripple")]
#[command(version = "1.0.0")]
#[command(about = "A breadth-first film recommendation crawler", long_about = None)]
struct Cli {
    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// The film to begin crawling from
    #[arg(short, long, visible_alias = "root")]
    title: Option<String>,

    /// Prior corpus to resume from
    #[arg(short, long, value_name = "PATH")]
    input: Option<String>,

    /// Ignore any prior corpus
    #[arg(long, conflicts_with = "input")]
    no_input: bool,

    /// Where to write the ranked corpus
    #[arg(short, long, value_name = "PATH")]
    output: Option<String>,

    /// The depth at which to stop crawling
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    depth: Option<u32>,

    /// The number of workers to process films
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    workers: Option<u32>,

    /// Delay each worker waits after every fetch, in milliseconds
    #[arg(long, value_name = "MS")]
    delay_ms: Option<u64>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            root: self.title.clone(),
            input_path: self.input.clone(),
            no_input: self.no_input,
            output_path: self.output.clone(),
            max_depth: self.depth,
            workers: self.workers,
            request_delay: self.delay_ms,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let (config, config_hash) = resolve_config(cli.config.as_deref(), cli.overrides())
        .context("failed to load configuration")?;
    match (&cli.config, &config_hash) {
        (Some(path), Some(hash)) => {
            tracing::info!("Configuration loaded from {} (hash: {})", path.display(), hash);
        }
        _ => tracing::info!("Using built-in configuration"),
    }

    // Fail before any fetch if the destination cannot be created
    let output_path = Path::new(&config.output.output_path);
    let writer = create_output(output_path)
        .with_context(|| format!("cannot create output file {}", output_path.display()))?;

    let prior = load_prior_corpus(config.output.input_path.as_deref().map(Path::new));

    tracing::info!(
        "Crawling from {} to depth {} with up to {} workers",
        config.source.root,
        config.crawler.max_depth,
        config.crawler.workers
    );
    let report = crawl(&config, prior).await.context("crawl failed")?;

    let corpus = ranked_corpus(&report, QualityThreshold::from(&config.quality));
    tracing::info!(
        "Writing {} of {} films to {}",
        corpus.len(),
        report.visited.len(),
        output_path.display()
    );
    if let Err(e) = write_corpus(writer, &corpus) {
        tracing::error!("writing to file failed: {}", e);
    }

    if !cli.quiet {
        print_statistics(&CrawlStatistics::from_report(&report, corpus.len()));
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("reel_ripple=info,warn"),
            1 => EnvFilter::new("reel_ripple=debug,info"),
            2 => EnvFilter::new("reel_ripple=trace,debug"),
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
