//! Stage coordinator - one breadth-first depth level
//!
//! A stage:
//! 1. Deduplicates the frontier and skips identities already in the visited map
//! 2. Fans the remaining identities out to a bounded pool of workers
//! 3. Collects exactly one envelope per dispatched identity
//! 4. Records resolved films in the visited map (on this task only)
//! 5. Computes the next frontier from the edges of this stage's films
//!
//! Films already present in the visited map when the stage starts (for
//! example, loaded from a prior corpus) are not fetched again, but their
//! stored edges still count towards the next frontier.

use crate::crawler::fetcher::PageSource;
use crate::crawler::worker::{Envelope, Worker};
use crate::state::VisitedMap;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;

/// Shared settings for every stage of a run
pub struct StageContext<S> {
    pub source: Arc<S>,
    pub base_url: Arc<str>,
    pub workers: usize,
    pub request_delay: Duration,
}

/// Counters for one stage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageReport {
    pub depth: u32,

    /// Unique identities in the incoming frontier
    pub frontier: usize,

    /// Frontier identities already resolved before the stage started
    pub cached: usize,

    /// Identities handed to workers
    pub dispatched: usize,

    /// Workers spawned for the stage
    pub workers: usize,

    /// Films newly inserted into the visited map
    pub resolved: usize,

    /// Films whose title was already present in the visited map
    pub duplicates: usize,

    /// Pages fetched without a usable title
    pub discarded: usize,

    /// Fetch attempts that failed
    pub failed: usize,
}

/// Result of running one stage
#[derive(Debug, Clone, Default)]
pub struct StageOutcome {
    /// Identities discovered by this stage that are not yet visited
    pub next_frontier: Vec<String>,

    pub report: StageReport,
}

/// Order-preserving set of discovered edges
#[derive(Default)]
struct EdgeSet {
    seen: HashSet<String>,
    ordered: Vec<String>,
}

impl EdgeSet {
    fn extend<'a>(&mut self, edges: impl IntoIterator<Item = &'a String>) {
        for edge in edges {
            if self.seen.insert(edge.clone()) {
                self.ordered.push(edge.clone());
            }
        }
    }

    /// Drops edges whose slug is already a visited key
    ///
    /// Visited keys are extracted titles while edges are URL slugs. A film
    /// whose title differs from its slug is not matched here and gets
    /// fetched again at a later depth, where its insert counts as a duplicate.
    fn unvisited(self, visited: &VisitedMap) -> Vec<String> {
        self.ordered
            .into_iter()
            .filter(|identity| !visited.contains(identity))
            .collect()
    }
}

/// Runs one depth level of the crawl
///
/// Returns once every dispatched identity has produced an envelope and every
/// worker has exited. Fetch errors are logged and otherwise ignored.
pub async fn run_stage<S>(
    depth: u32,
    frontier: &[String],
    visited: &mut VisitedMap,
    ctx: &StageContext<S>,
) -> StageOutcome
where
    S: PageSource + 'static,
{
    let mut report = StageReport {
        depth,
        ..Default::default()
    };
    let mut edges = EdgeSet::default();

    let mut unique = HashSet::new();
    let mut pending = Vec::new();
    for identity in frontier {
        if !unique.insert(identity.as_str()) {
            continue;
        }
        match visited.get(identity) {
            Some(film) => {
                report.cached += 1;
                edges.extend(&film.similar_films);
            }
            None => pending.push(identity.clone()),
        }
    }
    report.frontier = unique.len();
    report.dispatched = pending.len();

    if !pending.is_empty() {
        let envelopes = dispatch(pending, ctx, &mut report).await;

        for envelope in envelopes {
            match envelope.outcome {
                Err(e) => {
                    tracing::warn!("{}", e);
                    report.failed += 1;
                }
                Ok(film) if !film.is_resolved() => {
                    tracing::warn!(
                        "No title found for {} at {}, discarding",
                        envelope.identity,
                        film.url
                    );
                    report.discarded += 1;
                }
                Ok(film) => {
                    edges.extend(&film.similar_films);
                    if visited.insert(film) {
                        report.resolved += 1;
                    } else {
                        report.duplicates += 1;
                    }
                }
            }
        }
    }

    let next_frontier = edges.unvisited(visited);

    tracing::debug!(
        "Stage {} complete: {} dispatched, {} resolved, {} failed, {} discarded, {} next",
        depth,
        report.dispatched,
        report.resolved,
        report.failed,
        report.discarded,
        next_frontier.len()
    );

    StageOutcome {
        next_frontier,
        report,
    }
}

/// Fans `pending` out over a worker pool and collects every envelope
async fn dispatch<S>(
    pending: Vec<String>,
    ctx: &StageContext<S>,
    report: &mut StageReport,
) -> Vec<Envelope>
where
    S: PageSource + 'static,
{
    let dispatched = pending.len();
    let worker_count = ctx.workers.max(1).min(dispatched);
    report.workers = worker_count;

    let (work_tx, work_rx) = mpsc::channel(dispatched);
    let (results_tx, mut results_rx) = mpsc::channel(dispatched);
    let queue = Arc::new(Mutex::new(work_rx));

    let mut workers = JoinSet::new();
    for id in 0..worker_count {
        let worker = Worker {
            id,
            source: Arc::clone(&ctx.source),
            base_url: Arc::clone(&ctx.base_url),
            request_delay: ctx.request_delay,
        };
        workers.spawn(worker.run(Arc::clone(&queue), results_tx.clone()));
    }
    drop(results_tx);

    for identity in pending {
        // Capacity equals the pending count, so this never waits.
        if work_tx.send(identity).await.is_err() {
            tracing::error!("Work queue closed before dispatch finished");
            break;
        }
    }
    drop(work_tx);

    let mut envelopes = Vec::with_capacity(dispatched);
    while let Some(envelope) = results_rx.recv().await {
        envelopes.push(envelope);
    }

    while let Some(joined) = workers.join_next().await {
        if let Err(e) = joined {
            tracing::error!("Worker task failed: {}", e);
        }
    }

    if envelopes.len() != dispatched {
        tracing::error!(
            "{} of {} dispatched films produced no result",
            dispatched - envelopes.len(),
            dispatched
        );
    }

    envelopes
}
