//! Crawler module for film page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - Page fetching behind the `PageSource` seam
//! - Film record extraction from parsed pages
//! - Bounded worker pools, one per depth level
//! - Depth-staged breadth-first crawl coordination

mod coordinator;
mod fetcher;
mod parser;
mod stage;
mod worker;

#[cfg(test)]
pub(crate) mod testing;

pub use coordinator::{CrawlEngine, CrawlReport, CrawlSettings};
pub use fetcher::{build_http_client, fetch_film, parse_page, HttpSource, PageSource};
pub use parser::{
    extract_film, parse_rating_count, parse_score, similar_film_slug, FILM_PATH_PREFIX,
    POSTER_ALT_PREFIX,
};
pub use stage::{run_stage, StageContext, StageOutcome, StageReport};
pub use worker::{film_url, Envelope};

use crate::config::Config;
use crate::film::FilmCorpus;
use crate::ReelError;
use std::time::Duration;

/// Runs a complete crawl over HTTP
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP source from the configuration
/// 2. Seed the frontier from `prior` and the configured root
/// 3. Expand every depth level
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `prior` - A previously written corpus to resume from, if any
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl completed
/// * `Err(ReelError)` - The HTTP client could not be built
pub async fn crawl(config: &Config, prior: Option<FilmCorpus>) -> Result<CrawlReport, ReelError> {
    let source = HttpSource::new(
        &config.user_agent.header,
        Duration::from_secs(config.crawler.fetch_timeout),
    )?;

    let mut engine = CrawlEngine::new(source, CrawlSettings::from_config(config));
    engine.seed(prior, &config.source.root);
    engine.run().await
}
