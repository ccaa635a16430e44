//! Output module for ranking and persisting crawl results
//!
//! This module handles:
//! - Filtering and ranking the visited films
//! - Reading and writing film corpus files
//! - Summarizing crawl statistics

pub mod corpus;
mod ranking;
pub mod stats;

pub use corpus::{create_output, load_corpus, load_prior_corpus, write_corpus};
pub use ranking::{rank, QualityThreshold};
pub use stats::{print_statistics, CrawlStatistics};

use crate::crawler::CrawlReport;
use crate::film::FilmCorpus;

/// Ranks a finished crawl into the output corpus
pub fn ranked_corpus(report: &CrawlReport, threshold: QualityThreshold) -> FilmCorpus {
    FilmCorpus::new(rank(&report.visited, |film| threshold.meets(film)))
}
