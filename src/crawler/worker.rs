//! Crawl worker
//!
//! A worker pulls one identity at a time from the shared work queue, fetches
//! and extracts the film page, and reports the outcome as an [`Envelope`].
//! It waits for the courtesy delay after every attempt, successful or not.

use crate::crawler::fetcher::{fetch_film, PageSource};
use crate::film::Film;
use crate::FetchError;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};

/// Outcome of one fetch attempt
#[derive(Debug)]
pub struct Envelope {
    /// The identity that was dispatched
    pub identity: String,

    /// The extracted film, or the error that prevented it
    pub outcome: Result<Film, FetchError>,
}

/// Shared, multi-consumer end of a stage's work queue
pub(crate) type WorkQueue = Arc<Mutex<mpsc::Receiver<String>>>;

/// Everything a worker needs besides its queues
pub(crate) struct Worker<S> {
    pub id: usize,
    pub source: Arc<S>,
    pub base_url: Arc<str>,
    pub request_delay: Duration,
}

/// Derives a film page URL from its identity
///
/// Identities are used as path segments as-is, without escaping.
pub fn film_url(base_url: &str, identity: &str) -> String {
    format!("{}{}", base_url, identity)
}

impl<S> Worker<S>
where
    S: PageSource + 'static,
{
    /// Drains the work queue, sending exactly one envelope per identity taken
    pub(crate) async fn run(self, queue: WorkQueue, results: mpsc::Sender<Envelope>) {
        loop {
            let next = queue.lock().await.recv().await;
            let Some(identity) = next else {
                break;
            };

            let url = film_url(&self.base_url, &identity);
            let outcome = fetch_film(self.source.as_ref(), &url).await;

            if let Ok(film) = &outcome {
                if film.is_resolved() {
                    tracing::info!("Worker {}: {}", self.id, film.title);
                }
            }

            if results.send(Envelope { identity, outcome }).await.is_err() {
                tracing::error!("Worker {}: result channel closed", self.id);
                break;
            }

            if !self.request_delay.is_zero() {
                tokio::time::sleep(self.request_delay).await;
            }
        }

        tracing::trace!("Worker {} finished", self.id);
    }
}
