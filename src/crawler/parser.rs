//! Film page extractor
//!
//! Turns a parsed film page into a [`Film`]. Every field is best-effort: a
//! field whose markup cannot be located keeps its empty default, and numeric
//! text that fails to parse becomes 0. Extraction never fails as a whole.
//!
//! # Markup Rules
//!
//! | Field(s) | Node | Source |
//! |----------|------|--------|
//! | title | `<h1 class="title">` | first text child, verbatim |
//! | poster_url | `<rt-img alt="Watch trailer for ...">` | `src` |
//! | rating, audience_score, media_type, tomato_score | `<score-board-deprecated>` | attributes |
//! | year, genre, runtime | `<p data-qa="score-panel-subtitle">` | first text child split on `", "` |
//! | ratings | `<a data-qa="audience-rating-count">` | first token of first text child |
//! | similar_films | `<a href="/m/<slug>">` | single-segment slug |
//!
//! The tree is walked once in pre-order. Scalar fields are recorded by the
//! first matching node only; later matches of the same kind are ignored.

use crate::film::Film;
use scraper::{ElementRef, Html};

/// Alt-text prefix marking the official poster image
pub const POSTER_ALT_PREFIX: &str = "Watch trailer for ";

/// Path prefix of links that point at other film pages
pub const FILM_PATH_PREFIX: &str = "/m/";

const TITLE_CLASS: &str = "title";
const SCORE_BOARD_TAG: &str = "score-board-deprecated";
const POSTER_TAG: &str = "rt-img";
const SUBTITLE_QA: &str = "score-panel-subtitle";
const RATING_COUNT_QA: &str = "audience-rating-count";

/// Attributes carried by the score board node
#[derive(Debug, Default)]
struct ScoreBoard {
    rating: Option<String>,
    media_type: Option<String>,
    audience_score: u32,
    tomato_score: u32,
}

/// The comma-separated "year, genre, runtime" line
#[derive(Debug, Default)]
struct Subtitle {
    year: Option<String>,
    genre: Option<String>,
    runtime: Option<String>,
}

/// Accumulates matches during the walk; each slot is written at most once
#[derive(Debug, Default)]
struct FilmBuilder {
    title: Option<String>,
    poster_url: Option<String>,
    score_board: Option<ScoreBoard>,
    subtitle: Option<Subtitle>,
    ratings: Option<u64>,
    similar_films: Vec<String>,
}

impl FilmBuilder {
    fn visit(&mut self, element: ElementRef<'_>) {
        match element.value().name() {
            "h1" => set_once(&mut self.title, || match_title(element)),
            "a" => {
                if let Some(slug) = match_similar_film(element) {
                    self.similar_films.push(slug);
                }
                set_once(&mut self.ratings, || match_rating_count(element));
            }
            "p" => set_once(&mut self.subtitle, || match_subtitle(element)),
            POSTER_TAG => set_once(&mut self.poster_url, || match_poster(element)),
            SCORE_BOARD_TAG => set_once(&mut self.score_board, || Some(read_score_board(element))),
            _ => {}
        }
    }

    fn finish(self) -> Film {
        let score_board = self.score_board.unwrap_or_default();
        let subtitle = self.subtitle.unwrap_or_default();

        Film {
            title: self.title.unwrap_or_default(),
            url: String::new(),
            poster_url: self.poster_url.unwrap_or_default(),
            media_type: score_board.media_type.unwrap_or_default(),
            rating: score_board.rating.unwrap_or_default(),
            year: subtitle.year.unwrap_or_default(),
            genre: subtitle.genre.unwrap_or_default(),
            runtime: subtitle.runtime.unwrap_or_default(),
            audience_score: score_board.audience_score,
            tomato_score: score_board.tomato_score,
            ratings: self.ratings.unwrap_or_default(),
            similar_films: self.similar_films,
        }
    }
}

/// Fills an empty slot; a filled slot is never overwritten
fn set_once<T>(slot: &mut Option<T>, matcher: impl FnOnce() -> Option<T>) {
    if slot.is_none() {
        *slot = matcher();
    }
}

/// Extracts a film record from a parsed page
///
/// The returned record has an empty `url`; the caller knows where the page
/// came from. An empty `title` means the page could not be resolved.
///
/// # Example
///
/// ```
/// use reel_ripple::crawler::extract_film;
/// use scraper::Html;
///
/// let html = r#"<html><body><h1 class="title">Heat</h1><a href="/m/collateral">x</a></body></html>"#;
/// let film = extract_film(&Html::parse_document(html));
/// assert_eq!(film.title, "Heat");
/// assert_eq!(film.similar_films, vec!["collateral".to_string()]);
/// ```
pub fn extract_film(document: &Html) -> Film {
    let mut builder = FilmBuilder::default();

    for element in document.root_element().descendants().filter_map(ElementRef::wrap) {
        builder.visit(element);
    }

    builder.finish()
}

/// Returns the element's first child if it is a text node
fn leading_text<'a>(element: ElementRef<'a>) -> Option<&'a str> {
    element
        .first_child()
        .and_then(|child| child.value().as_text())
        .map(|text| &**text)
}

fn match_title(element: ElementRef<'_>) -> Option<String> {
    if element.value().attr("class") != Some(TITLE_CLASS) {
        return None;
    }
    leading_text(element).map(str::to_string)
}

fn match_poster(element: ElementRef<'_>) -> Option<String> {
    let alt = element.value().attr("alt")?;
    if !alt.starts_with(POSTER_ALT_PREFIX) {
        return None;
    }
    element.value().attr("src").map(str::to_string)
}

fn read_score_board(element: ElementRef<'_>) -> ScoreBoard {
    let value = element.value();

    ScoreBoard {
        rating: value.attr("rating").map(str::to_string),
        media_type: value.attr("mediatype").map(str::to_string),
        audience_score: value.attr("audiencescore").map(parse_score).unwrap_or(0),
        tomato_score: value.attr("tomatometerscore").map(parse_score).unwrap_or(0),
    }
}

fn match_subtitle(element: ElementRef<'_>) -> Option<Subtitle> {
    if element.value().attr("data-qa") != Some(SUBTITLE_QA) {
        return None;
    }

    let mut parts = leading_text(element)?.split(", ").map(str::to_string);
    Some(Subtitle {
        year: parts.next(),
        genre: parts.next(),
        runtime: parts.next(),
    })
}

fn match_rating_count(element: ElementRef<'_>) -> Option<u64> {
    if element.value().attr("data-qa") != Some(RATING_COUNT_QA) {
        return None;
    }
    leading_text(element).map(parse_rating_count)
}

fn match_similar_film(element: ElementRef<'_>) -> Option<String> {
    let href = element.value().attr("href")?;
    similar_film_slug(href).map(str::to_string)
}

/// Returns the film slug a link points at, if it is a film page link
///
/// Only single-segment paths count: `/m/heat` is an edge, `/m/heat/reviews`
/// is a sub-page and is not.
pub fn similar_film_slug(href: &str) -> Option<&str> {
    let slug = href.strip_prefix(FILM_PATH_PREFIX)?;
    if slug.is_empty() || slug.contains('/') {
        return None;
    }
    Some(slug)
}

/// Parses a score attribute, yielding 0 on anything unparseable
pub fn parse_score(text: &str) -> u32 {
    text.parse().unwrap_or(0)
}

/// Parses a rating count such as `"250,000+ Ratings"`
///
/// Takes the first whitespace-delimited token, drops everything from the
/// first `+`, removes thousands separators, and yields 0 on failure.
pub fn parse_rating_count(text: &str) -> u64 {
    text.split_whitespace()
        .next()
        .and_then(|token| token.split('+').next())
        .map(|count| count.replace(',', ""))
        .and_then(|count| count.parse().ok())
        .unwrap_or(0)
}
