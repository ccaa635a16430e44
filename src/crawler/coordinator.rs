//! Crawl engine - depth-staged breadth-first crawl orchestration
//!
//! The engine owns the visited map for one run and drives it through
//! `Seeding -> Expanding(1..=max_depth) -> Done`:
//! - Seeding pre-populates the visited map from an optional prior corpus and
//!   builds the first frontier from the corpus titles plus the root
//! - Each expanding phase runs exactly one stage; stages never overlap
//! - Edges discovered at the final depth are kept in their films but their
//!   targets are never fetched

use crate::config::Config;
use crate::crawler::fetcher::PageSource;
use crate::crawler::stage::{run_stage, StageContext, StageReport};
use crate::film::FilmCorpus;
use crate::state::{CrawlPhase, VisitedMap};
use crate::ReelError;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

/// Settings the engine needs from the configuration
#[derive(Debug, Clone)]
pub struct CrawlSettings {
    /// Number of depth levels to expand (1 = fetch the seeds only)
    pub max_depth: u32,

    /// Upper bound on concurrent workers per stage
    pub workers: usize,

    /// Prefix every identity is appended to when deriving a page URL
    pub base_url: String,

    /// Courtesy delay each worker observes after every fetch
    pub request_delay: Duration,
}

impl CrawlSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_depth: config.crawler.max_depth,
            workers: config.crawler.workers as usize,
            base_url: config.source.base_url.clone(),
            request_delay: Duration::from_millis(config.crawler.request_delay),
        }
    }
}

/// Everything a finished run produced
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Every film resolved during the run, including prior-corpus films
    pub visited: VisitedMap,

    /// Films loaded from the prior corpus at seeding
    pub seeded: usize,

    /// One report per depth, in depth order
    pub stages: Vec<StageReport>,

    /// Identities discovered at the final depth that were never fetched
    pub unexplored: Vec<String>,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Breadth-first crawl engine for one run
pub struct CrawlEngine<S> {
    ctx: StageContext<S>,
    max_depth: u32,
    visited: VisitedMap,
    frontier: Vec<String>,
    seeded: usize,
    phase: CrawlPhase,
}

impl<S> CrawlEngine<S>
where
    S: PageSource + 'static,
{
    /// Creates an engine in the `Seeding` phase with an empty frontier
    pub fn new(source: S, settings: CrawlSettings) -> Self {
        Self {
            ctx: StageContext {
                source: Arc::new(source),
                base_url: Arc::from(settings.base_url),
                workers: settings.workers,
                request_delay: settings.request_delay,
            },
            max_depth: settings.max_depth,
            visited: VisitedMap::new(),
            frontier: Vec::new(),
            seeded: 0,
            phase: CrawlPhase::Seeding,
        }
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    pub fn frontier(&self) -> &[String] {
        &self.frontier
    }

    pub fn visited(&self) -> &VisitedMap {
        &self.visited
    }

    /// Builds the initial frontier
    ///
    /// Every titled film in `prior` is recorded as already resolved and its
    /// title joins the frontier; `root` is appended unless the corpus already
    /// named it. Calling this again replaces the frontier but keeps films
    /// recorded earlier.
    pub fn seed(&mut self, prior: Option<FilmCorpus>, root: &str) -> &[String] {
        let mut seen = HashSet::new();
        let mut frontier = Vec::new();

        for film in prior.map(|corpus| corpus.films).unwrap_or_default() {
            if !film.is_resolved() {
                tracing::debug!("Skipping untitled film in prior corpus");
                continue;
            }
            if seen.insert(film.title.clone()) {
                frontier.push(film.title.clone());
            }
            if self.visited.insert(film) {
                self.seeded += 1;
            }
        }

        if seen.insert(root.to_string()) {
            frontier.push(root.to_string());
        }

        tracing::info!(
            "Seeded frontier with {} films ({} from prior corpus)",
            frontier.len(),
            self.seeded
        );

        self.frontier = frontier;
        &self.frontier
    }

    /// Expands every depth level and returns the final state of the run
    pub async fn run(mut self) -> Result<CrawlReport, ReelError> {
        if self.phase != CrawlPhase::Seeding {
            return Err(ReelError::InvalidTransition {
                from: self.phase,
                to: CrawlPhase::Expanding { depth: 1 },
            });
        }

        let started_at = Utc::now();
        let mut stages = Vec::with_capacity(self.max_depth as usize);

        for depth in 1..=self.max_depth {
            self.phase = self.phase.transition(CrawlPhase::Expanding { depth })?;
            tracing::info!("depth: {}", depth);
            tracing::info!("films: {}", self.frontier.len());

            let outcome = run_stage(depth, &self.frontier, &mut self.visited, &self.ctx).await;
            self.frontier = outcome.next_frontier;
            stages.push(outcome.report);
        }

        self.phase = self.phase.transition(CrawlPhase::Done)?;

        if !self.frontier.is_empty() {
            tracing::debug!(
                "{} films discovered at depth {} left unexplored",
                self.frontier.len(),
                self.max_depth
            );
        }

        Ok(CrawlReport {
            visited: self.visited,
            seeded: self.seeded,
            stages,
            unexplored: self.frontier,
            started_at,
            finished_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::testing::{film_page, FakeSource};
    use crate::film::Film;

    const BASE: &str = "https://films.example/m/";

    fn settings(max_depth: u32) -> CrawlSettings {
        CrawlSettings {
            max_depth,
            workers: 4,
            base_url: BASE.to_string(),
            request_delay: Duration::ZERO,
        }
    }

    fn sorted(mut items: Vec<String>) -> Vec<String> {
        items.sort();
        items
    }

    /// a -> b -> c -> d
    fn chain() -> FakeSource {
        FakeSource::new(BASE)
            .with_page("a", &film_page("a", &["b"], 10, 10))
            .with_page("b", &film_page("b", &["c"], 10, 10))
            .with_page("c", &film_page("c", &["d"], 10, 10))
            .with_page("d", &film_page("d", &[], 10, 10))
    }

    #[tokio::test]
    async fn test_depth_bound_stops_at_last_stage() {
        let source = Arc::new(chain());
        let mut engine = CrawlEngine::new(SharedSource(Arc::clone(&source)), settings(2));
        engine.seed(None, "a");
        let report = engine.run().await.unwrap();

        assert_eq!(source.fetch_count("a"), 1);
        assert_eq!(source.fetch_count("b"), 1);
        assert_eq!(source.fetch_count("c"), 0);
        assert_eq!(report.unexplored, vec!["c".to_string()]);
        assert_eq!(report.visited.get("b").unwrap().similar_films, vec!["c"]);
        assert_eq!(report.stages.len(), 2);
    }

    #[tokio::test]
    async fn test_each_identity_fetched_once() {
        // a -> {b, c}; b -> {a, d}; c -> {d, b}; d -> {a}
        let source = Arc::new(
            FakeSource::new(BASE)
                .with_page("a", &film_page("a", &["b", "c"], 10, 10))
                .with_page("b", &film_page("b", &["a", "d"], 10, 10))
                .with_page("c", &film_page("c", &["d", "b"], 10, 10))
                .with_page("d", &film_page("d", &["a"], 10, 10)),
        );
        let mut engine = CrawlEngine::new(SharedSource(Arc::clone(&source)), settings(5));
        engine.seed(None, "a");
        let report = engine.run().await.unwrap();

        for identity in ["a", "b", "c", "d"] {
            assert_eq!(source.fetch_count(identity), 1, "{} refetched", identity);
        }
        assert_eq!(report.visited.len(), 4);
        assert!(report.unexplored.is_empty());
        assert_eq!(report.stages[2].dispatched, 1);
        assert_eq!(report.stages[3].dispatched, 0);
    }

    #[tokio::test]
    async fn test_seed_merges_prior_corpus() {
        let prior = FilmCorpus::new(vec![Film {
            title: "A".to_string(),
            similar_films: vec!["C".to_string()],
            ..Default::default()
        }]);
        let source = Arc::new(
            FakeSource::new(BASE)
                .with_page("A", &film_page("A", &[], 10, 10))
                .with_page("B", &film_page("B", &[], 10, 10))
                .with_page("C", &film_page("C", &[], 10, 10)),
        );
        let mut engine = CrawlEngine::new(SharedSource(Arc::clone(&source)), settings(1));

        let frontier = engine.seed(Some(prior), "B").to_vec();
        assert_eq!(sorted(frontier), vec!["A".to_string(), "B".to_string()]);
        assert!(engine.visited().contains("A"));

        let report = engine.run().await.unwrap();
        assert_eq!(source.fetch_count("A"), 0);
        assert_eq!(source.fetch_count("B"), 1);
        assert_eq!(report.seeded, 1);
        assert_eq!(report.unexplored, vec!["C".to_string()]);
    }

    #[tokio::test]
    async fn test_seed_root_already_in_corpus() {
        let prior = FilmCorpus::new(vec![
            Film {
                title: "B".to_string(),
                ..Default::default()
            },
            Film::default(),
        ]);
        let source = Arc::new(FakeSource::new(BASE));
        let mut engine = CrawlEngine::new(SharedSource(Arc::clone(&source)), settings(1));

        assert_eq!(engine.seed(Some(prior), "B"), ["B".to_string()]);
        let report = engine.run().await.unwrap();

        assert_eq!(source.total_fetches(), 0);
        assert_eq!(report.visited.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_root_yields_empty_crawl() {
        let source = FakeSource::new(BASE).with_status("a", 503);
        let mut engine = CrawlEngine::new(source, settings(3));
        engine.seed(None, "a");
        let report = engine.run().await.unwrap();

        assert!(report.visited.is_empty());
        assert_eq!(report.stages[0].failed, 1);
        assert_eq!(report.stages.len(), 3);
    }

    #[tokio::test]
    async fn test_run_moves_to_done() {
        let mut engine = CrawlEngine::new(chain(), settings(1));
        assert_eq!(engine.phase(), CrawlPhase::Seeding);
        engine.seed(None, "a");
        let report = engine.run().await.unwrap();
        assert!(report.finished_at >= report.started_at);
    }

    /// Lets a test keep a handle on the source it gave the engine
    struct SharedSource(Arc<FakeSource>);

    impl PageSource for SharedSource {
        async fn fetch_body(&self, url: &str) -> Result<String, crate::FetchError> {
            self.0.fetch_body(url).await
        }
    }
}
