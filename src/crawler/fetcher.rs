//! Page fetch adapter
//!
//! This module wraps the transport and the HTML parser behind one operation:
//! - `PageSource` is the transport seam (`fetch_body(url)`)
//! - `HttpSource` is the production source over `reqwest`
//! - `fetch_film` fetches, parses and extracts a single film page
//!
//! Any transport failure, non-success status, non-HTML response or body read
//! error becomes a [`FetchError`] carrying the URL.

use crate::crawler::parser::extract_film;
use crate::film::Film;
use crate::{FetchCause, FetchError};
use reqwest::Client;
use scraper::Html;
use std::future::Future;
use std::time::Duration;

/// Upper bound on connection setup, independent of the total fetch timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// A source of raw film pages
///
/// Implementations must be shareable across worker tasks.
pub trait PageSource: Send + Sync {
    /// Fetches the raw markup at `url`
    fn fetch_body(&self, url: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// Fetches pages over HTTP
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    /// Creates a source that identifies itself with `user_agent` and gives up
    /// on any single fetch after `timeout`
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(user_agent, timeout)?,
        })
    }
}

impl PageSource for HttpSource {
    async fn fetch_body(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::new(url, FetchCause::Transport(e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(url, FetchCause::Status(status.as_u16())));
        }

        if let Some(content_type) = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            if !content_type.contains("html") {
                return Err(FetchError::new(
                    url,
                    FetchCause::NotHtml(content_type.to_string()),
                ));
            }
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::new(url, FetchCause::Body(e)))
    }
}

/// Builds an HTTP client with the crawler's identification and timeouts
///
/// # Example
///
/// ```no_run
/// use reel_ripple::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client("Mozilla/5.0", Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(user_agent: &str, timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .connect_timeout(CONNECT_TIMEOUT.min(timeout))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Parses raw markup into a traversable tree
///
/// The HTML5 parser recovers from malformed markup, so this never fails.
pub fn parse_page(body: &str) -> Html {
    Html::parse_document(body)
}

/// Fetches one film page and extracts its record
///
/// The returned film's `url` is set to `url`. The parsed tree only lives
/// after the last suspension point, so the future stays `Send`.
pub async fn fetch_film<S>(source: &S, url: &str) -> Result<Film, FetchError>
where
    S: PageSource + ?Sized,
{
    let body = source.fetch_body(url).await?;

    let mut film = extract_film(&parse_page(&body));
    film.url = url.to_string();
    Ok(film)
}
