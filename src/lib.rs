//! Reel-Ripple: a breadth-first film recommendation crawler
//!
//! This crate starts from a single seed film page, follows the "similar films"
//! links each page carries out to a bounded depth, extracts a typed record from
//! every page it visits, and ranks the collected films against quality
//! thresholds.

pub mod config;
pub mod crawler;
pub mod film;
pub mod output;
pub mod state;

use thiserror::Error;

/// Main error type for Reel-Ripple operations
#[derive(Debug, Error)]
pub enum ReelError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Corpus error: {0}")]
    Corpus(#[from] CorpusError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Invalid phase transition: {from} -> {to}")]
    InvalidTransition {
        from: state::CrawlPhase,
        to: state::CrawlPhase,
    },
}

/// A failed attempt to fetch and parse one film page
///
/// This is the only error a crawl stage ever sees. It is logged and the
/// identity it belongs to never enters the visited map.
#[derive(Debug, Error)]
#[error("error getting {url}: {cause}")]
pub struct FetchError {
    /// The URL that was requested
    pub url: String,

    /// What went wrong
    pub cause: FetchCause,
}

impl FetchError {
    pub fn new(url: impl Into<String>, cause: FetchCause) -> Self {
        Self {
            url: url.into(),
            cause,
        }
    }
}

/// Underlying cause of a [`FetchError`]
#[derive(Debug, Error)]
pub enum FetchCause {
    #[error("http get failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("reading body failed: {0}")]
    Body(#[source] reqwest::Error),

    #[error("expected HTML, got {0}")]
    NotHtml(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors reading or writing a film corpus file
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Reel-Ripple operations
pub type Result<T> = std::result::Result<T, ReelError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlEngine, CrawlReport};
pub use film::{Film, FilmCorpus};
pub use output::{rank, QualityThreshold};
pub use state::{CrawlPhase, VisitedMap};
