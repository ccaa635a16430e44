//! Film records and the corpus document that carries them
//!
//! A [`Film`] is everything extracted from one film page. Its `title` doubles
//! as the crawl graph's node key; `similar_films` are the page's out-edges.
//! A [`FilmCorpus`] is the `{ "films": [...] }` JSON document read as a prior
//! corpus and written as the ranked output.

use serde::{Deserialize, Serialize};

/// One film page's extracted metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Film {
    /// Canonical title, taken verbatim from the page heading
    pub title: String,

    /// URL the record was fetched from (set by the worker, not the extractor)
    pub url: String,

    pub poster_url: String,

    pub media_type: String,

    /// Certification (e.g. "R", "PG-13")
    pub rating: String,

    pub year: String,

    pub genre: String,

    pub runtime: String,

    /// Audience score, nominally 0-100
    pub audience_score: u32,

    /// Critic (tomatometer) score, nominally 0-100
    pub tomato_score: u32,

    /// Number of user ratings backing the audience score
    pub ratings: u64,

    /// Identities of similar films, in page order, duplicates included
    pub similar_films: Vec<String>,
}

impl Film {
    /// Returns true if the page yielded a usable identity
    ///
    /// Records without a title are unresolved and must never be stored.
    pub fn is_resolved(&self) -> bool {
        !self.title.is_empty()
    }
}

/// The on-disk corpus document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilmCorpus {
    #[serde(default)]
    pub films: Vec<Film>,
}

impl FilmCorpus {
    pub fn new(films: Vec<Film>) -> Self {
        Self { films }
    }

    pub fn len(&self) -> usize {
        self.films.len()
    }

    pub fn is_empty(&self) -> bool {
        self.films.is_empty()
    }
}
