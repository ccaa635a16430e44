//! In-memory page source for crawler tests

use crate::crawler::fetcher::PageSource;
use crate::{FetchCause, FetchError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

enum Canned {
    Page(String),
    Status(u16),
}

/// Serves canned pages keyed by URL and records every fetch
pub(crate) struct FakeSource {
    base_url: String,
    pages: HashMap<String, Canned>,
    fetches: Mutex<HashMap<String, usize>>,
    latency: Duration,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl FakeSource {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            pages: HashMap::new(),
            fetches: Mutex::new(HashMap::new()),
            latency: Duration::ZERO,
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn with_page(mut self, identity: &str, html: &str) -> Self {
        self.pages.insert(
            format!("{}{}", self.base_url, identity),
            Canned::Page(html.to_string()),
        );
        self
    }

    pub fn with_status(mut self, identity: &str, status: u16) -> Self {
        self.pages
            .insert(format!("{}{}", self.base_url, identity), Canned::Status(status));
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Number of times the page for `identity` was requested
    pub fn fetch_count(&self, identity: &str) -> usize {
        let url = format!("{}{}", self.base_url, identity);
        self.fetches
            .lock()
            .unwrap()
            .get(&url)
            .copied()
            .unwrap_or(0)
    }

    pub fn total_fetches(&self) -> usize {
        self.fetches.lock().unwrap().values().sum()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

impl PageSource for FakeSource {
    async fn fetch_body(&self, url: &str) -> Result<String, FetchError> {
        *self
            .fetches
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_insert(0) += 1;

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.pages.get(url) {
            Some(Canned::Page(html)) => Ok(html.clone()),
            Some(Canned::Status(status)) => Err(FetchError::new(url, FetchCause::Status(*status))),
            None => Err(FetchError::new(url, FetchCause::Status(404))),
        }
    }
}

/// Renders a minimal film page in the markup the extractor understands
pub(crate) fn film_page(title: &str, similar: &[&str], ratings: u64, audience_score: u32) -> String {
    let links: String = similar
        .iter()
        .map(|slug| format!(r#"<a href="/m/{}">{}</a>"#, slug, slug))
        .collect();

    format!(
        r#"<html><body>
        <h1 class="title">{title}</h1>
        <score-board-deprecated audiencescore="{audience_score}" tomatometerscore="50" rating="PG" mediatype="movie"></score-board-deprecated>
        <a data-qa="audience-rating-count">{ratings} Ratings</a>
        {links}
        </body></html>"#
    )
}
