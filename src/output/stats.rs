//! Statistics for a finished crawl run
//!
//! This module condenses a [`CrawlReport`] into the summary printed at the
//! end of a run.

use crate::crawler::{CrawlReport, StageReport};
use chrono::{DateTime, Utc};

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Films loaded from the prior corpus
    pub seeded: usize,

    /// Per-depth counters, in depth order
    pub stages: Vec<StageReport>,

    /// Total films in the visited map at the end of the run
    pub total_films: usize,

    /// Total fetch attempts across all stages
    pub total_fetches: usize,

    /// Total failed fetches across all stages
    pub total_failed: usize,

    /// Total untitled pages across all stages
    pub total_discarded: usize,

    /// Films discovered at the last depth but never fetched
    pub unexplored: usize,

    /// Films that passed the quality threshold
    pub ranked: usize,
}

impl CrawlStatistics {
    pub fn from_report(report: &CrawlReport, ranked: usize) -> Self {
        Self {
            started_at: report.started_at,
            finished_at: report.finished_at,
            seeded: report.seeded,
            stages: report.stages.clone(),
            total_films: report.visited.len(),
            total_fetches: report.stages.iter().map(|s| s.dispatched).sum(),
            total_failed: report.stages.iter().map(|s| s.failed).sum(),
            total_discarded: report.stages.iter().map(|s| s.discarded).sum(),
            unexplored: report.unexplored.len(),
            ranked,
        }
    }

    /// Wall-clock duration of the crawl in seconds
    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }

    /// Percentage of fetch attempts that produced a stored film
    pub fn success_rate(&self) -> f64 {
        if self.total_fetches == 0 {
            return 0.0;
        }
        let resolved: usize = self.stages.iter().map(|s| s.resolved).sum();
        (resolved as f64 / self.total_fetches as f64) * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Started: {}", stats.started_at.to_rfc3339());
    println!("  Duration: {}s", stats.duration_seconds());
    println!("  Films from prior corpus: {}", stats.seeded);
    println!("  Films collected: {}", stats.total_films);
    println!("  Films ranked: {}", stats.ranked);
    println!("  Left unexplored: {}", stats.unexplored);
    println!();

    println!("By Depth:");
    for stage in &stats.stages {
        println!(
            "  depth {}: {} in frontier, {} fetched by {} workers, {} new, {} failed, {} untitled",
            stage.depth,
            stage.frontier,
            stage.dispatched,
            stage.workers,
            stage.resolved,
            stage.failed,
            stage.discarded
        );
    }
    println!();

    println!(
        "Success Rate: {:.1}% ({} failed, {} untitled of {} fetches)",
        stats.success_rate(),
        stats.total_failed,
        stats.total_discarded,
        stats.total_fetches
    );
}
