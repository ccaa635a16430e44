//! Aggregation and ranking of crawled films

use crate::config::QualityConfig;
use crate::film::Film;
use crate::state::VisitedMap;

/// Minimum bar a film must clear to be ranked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityThreshold {
    pub min_ratings: u64,
    pub min_audience_score: u32,
}

impl Default for QualityThreshold {
    fn default() -> Self {
        Self {
            min_ratings: 1000,
            min_audience_score: 70,
        }
    }
}

impl From<&QualityConfig> for QualityThreshold {
    fn from(config: &QualityConfig) -> Self {
        Self {
            min_ratings: config.min_ratings,
            min_audience_score: config.min_audience_score,
        }
    }
}

impl QualityThreshold {
    /// Returns true if the film has enough ratings and a high enough score
    pub fn meets(&self, film: &Film) -> bool {
        film.ratings >= self.min_ratings && film.audience_score >= self.min_audience_score
    }
}

/// Filters and orders the visited films
///
/// Untitled films and films failing `predicate` are dropped. Survivors are
/// sorted by rating count, highest first. The relative order of films with
/// equal counts is unspecified.
///
/// # Example
///
/// ```
/// use reel_ripple::{rank, Film, QualityThreshold, VisitedMap};
///
/// let mut visited = VisitedMap::new();
/// visited.insert(Film { title: "Heat".into(), ratings: 5000, audience_score: 94, ..Default::default() });
/// visited.insert(Film { title: "Obscure".into(), ratings: 12, audience_score: 99, ..Default::default() });
///
/// let threshold = QualityThreshold::default();
/// let ranked = rank(&visited, |film| threshold.meets(film));
/// assert_eq!(ranked.len(), 1);
/// assert_eq!(ranked[0].title, "Heat");
/// ```
pub fn rank<P>(visited: &VisitedMap, predicate: P) -> Vec<Film>
where
    P: Fn(&Film) -> bool,
{
    let mut ranked: Vec<Film> = visited
        .films()
        .filter(|film| film.is_resolved() && predicate(*film))
        .cloned()
        .collect();

    ranked.sort_by(|a, b| b.ratings.cmp(&a.ratings));
    ranked
}
