//! Visited map: the single source of truth for "already crawled"

use crate::film::Film;
use std::collections::hash_map::{Entry, HashMap};

/// Deduplicated store of resolved films, keyed by title
///
/// Entries are inserted at most once per identity. The first successful
/// insert wins and later inserts for the same identity are ignored.
/// Untitled records are never stored.
#[derive(Debug, Clone, Default)]
pub struct VisitedMap {
    films: HashMap<String, Film>,
}

impl VisitedMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a film if its identity is non-empty and not yet present
    ///
    /// Returns `true` if the film was stored.
    pub fn insert(&mut self, film: Film) -> bool {
        if !film.is_resolved() {
            return false;
        }

        match self.films.entry(film.title.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(film);
                true
            }
        }
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.films.contains_key(identity)
    }

    pub fn get(&self, identity: &str) -> Option<&Film> {
        self.films.get(identity)
    }

    pub fn len(&self) -> usize {
        self.films.len()
    }

    pub fn is_empty(&self) -> bool {
        self.films.is_empty()
    }

    pub fn identities(&self) -> impl Iterator<Item = &str> {
        self.films.keys().map(String::as_str)
    }

    /// Iterates over stored films in unspecified order
    pub fn films(&self) -> impl Iterator<Item = &Film> {
        self.films.values()
    }
}
