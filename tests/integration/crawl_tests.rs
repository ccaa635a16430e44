//! Integration tests for the crawler
//!
//! These tests use wiremock to serve film pages and run the full crawl
//! cycle end-to-end over HTTP.

use reel_ripple::config::{Config, DEFAULT_USER_AGENT};
use reel_ripple::crawler::crawl;
use reel_ripple::output::{create_output, load_corpus, load_prior_corpus, ranked_corpus, write_corpus};
use reel_ripple::{Film, FilmCorpus, QualityThreshold};
use std::io::Write;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointed at the mock server
fn create_test_config(server: &MockServer, root: &str, max_depth: u32) -> Config {
    let mut config = Config::default();
    config.source.base_url = format!("{}/m/", server.uri());
    config.source.root = root.to_string();
    config.crawler.max_depth = max_depth;
    config.crawler.workers = 4;
    config.crawler.request_delay = 0;
    config.crawler.fetch_timeout = 5;
    config.output.input_path = None;
    config
}

/// Renders a film page with the given similar-film links
fn film_page(title: &str, similar: &[&str], ratings: &str, audience_score: u32) -> String {
    let links: String = similar
        .iter()
        .map(|slug| format!(r#"<li><a href="/m/{}">{}</a></li>"#, slug, slug))
        .collect();

    format!(
        r#"<html><head><title>{title} - Reviews</title></head><body>
        <rt-img alt="Watch trailer for {title}" src="https://img.example/{title}.jpg"></rt-img>
        <score-board-deprecated rating="PG-13" audiencescore="{audience_score}" mediatype="movie" tomatometerscore="81">
            <h1 class="title">{title}</h1>
            <p data-qa="score-panel-subtitle">2001, Drama, 1h 55m</p>
            <a data-qa="audience-rating-count" href="/m/{title}/reviews">{ratings} Ratings</a>
        </score-board-deprecated>
        <ul>{links}</ul>
        </body></html>"#
    )
}

async fn mount_page(server: &MockServer, slug: &str, body: String, expected_hits: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/m/{}", slug)))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8"))
        .expect(expected_hits)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_two_levels() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/m/root"))
        .and(header("user-agent", DEFAULT_USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            film_page("root", &["alpha", "broken", "alpha", "root/reviews"], "12,500+", 90),
            "text/html",
        ))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "alpha", film_page("alpha", &["root", "gamma"], "3,000", 75), 1).await;
    Mock::given(method("GET"))
        .and(path("/m/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    // Discovered at the last depth, so never fetched
    mount_page(&server, "gamma", film_page("gamma", &[], "1", 1), 0).await;
    mount_page(&server, "root/reviews", String::new(), 0).await;

    let config = create_test_config(&server, "root", 2);
    let report = crawl(&config, None).await.expect("crawl failed");

    assert_eq!(report.visited.len(), 2);
    let root = report.visited.get("root").expect("root not visited");
    assert_eq!(root.url, format!("{}/m/root", server.uri()));
    assert_eq!(root.ratings, 12_500);
    assert_eq!(root.audience_score, 90);
    assert_eq!(root.tomato_score, 81);
    assert_eq!(root.rating, "PG-13");
    assert_eq!(root.media_type, "movie");
    assert_eq!(root.year, "2001");
    assert_eq!(root.genre, "Drama");
    assert_eq!(root.runtime, "1h 55m");
    assert_eq!(root.poster_url, "https://img.example/root.jpg");
    assert_eq!(root.similar_films, vec!["alpha", "broken", "alpha"]);

    assert!(!report.visited.contains("broken"));
    assert_eq!(report.unexplored, vec!["gamma".to_string()]);
    assert_eq!(report.stages[0].dispatched, 1);
    assert_eq!(report.stages[1].dispatched, 2);
    assert_eq!(report.stages[1].failed, 1);
}

#[tokio::test]
async fn test_prior_corpus_is_not_refetched() {
    let server = MockServer::start().await;

    mount_page(&server, "fresh", film_page("fresh", &["next"], "2,000", 80), 1).await;
    mount_page(&server, "known", film_page("known", &[], "1", 1), 0).await;
    mount_page(&server, "from_known", film_page("from_known", &[], "5,000", 95), 1).await;
    mount_page(&server, "next", film_page("next", &[], "1,500", 71), 1).await;

    let prior = FilmCorpus::new(vec![Film {
        title: "known".to_string(),
        ratings: 9_000,
        audience_score: 99,
        similar_films: vec!["from_known".to_string()],
        ..Default::default()
    }]);
    let mut prior_file = tempfile::NamedTempFile::new().unwrap();
    prior_file
        .write_all(serde_json::to_string(&prior).unwrap().as_bytes())
        .unwrap();
    prior_file.flush().unwrap();

    let prior = load_prior_corpus(Some(prior_file.path()));
    assert!(prior.is_some());

    let config = create_test_config(&server, "fresh", 2);
    let report = crawl(&config, prior).await.expect("crawl failed");

    assert_eq!(report.seeded, 1);
    assert_eq!(report.stages[0].cached, 1);
    assert_eq!(report.stages[0].dispatched, 1);
    assert_eq!(report.visited.len(), 4);
    assert_eq!(report.visited.get("known").unwrap().ratings, 9_000);
}

#[tokio::test]
async fn test_ranked_output_written() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "hub",
        film_page("hub", &["popular", "niche", "disliked"], "2,000", 85),
        1,
    )
    .await;
    mount_page(&server, "popular", film_page("popular", &[], "40,000+", 88), 1).await;
    mount_page(&server, "niche", film_page("niche", &[], "150", 97), 1).await;
    mount_page(&server, "disliked", film_page("disliked", &[], "80,000", 35), 1).await;

    let config = create_test_config(&server, "hub", 2);
    let report = crawl(&config, None).await.expect("crawl failed");
    let corpus = ranked_corpus(&report, QualityThreshold::from(&config.quality));

    let dir = tempfile::tempdir().unwrap();
    let output_path = dir.path().join("output.json");
    write_corpus(create_output(&output_path).unwrap(), &corpus).unwrap();

    let written = load_corpus(&output_path).unwrap();
    let titles: Vec<&str> = written.films.iter().map(|f| f.title.as_str()).collect();
    assert_eq!(titles, vec!["popular", "hub"]);
}

#[tokio::test]
async fn test_non_html_response_is_a_fetch_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/m/data"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"<h1 class="title">data</h1>"#,
            "application/json",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&server, "data", 1);
    let report = crawl(&config, None).await.expect("crawl failed");

    assert!(report.visited.is_empty());
    assert_eq!(report.stages[0].failed, 1);
}
