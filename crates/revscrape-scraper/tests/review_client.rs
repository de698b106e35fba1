//! Integration tests for `ReviewPageClient` and `scrape_listing` over HTTP.
//!
//! Uses `wiremock` to stand up a local HTTP server for each test so no real
//! network traffic is made.

use std::time::{Duration, Instant};

use revscrape_core::{ScrapeOptions, StopReason};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use revscrape_scraper::{scrape_listing, PageOutcome, ReviewPageClient, ScraperError};

const TEST_UA: &str = "Mozilla/5.0 (revscrape-test)";
const LISTING_PATH: &str = "/review/acme.test";

/// Builds a client with a short timeout and no politeness delay.
fn test_client() -> ReviewPageClient {
    ReviewPageClient::new(5, TEST_UA, 0).expect("failed to build test ReviewPageClient")
}

fn listing_url(server: &MockServer) -> String {
    format!("{}{LISTING_PATH}", server.uri())
}

fn review_json(id: &str, author: &str, rating: u64) -> serde_json::Value {
    json!({
        "id": id,
        "rating": rating,
        "title": format!("Title {id}"),
        "text": format!("Text {id}"),
        "dates": { "publishedDate": "2025-01-15T12:00:00.000Z" },
        "consumer": { "displayName": author, "countryCode": "NL" }
    })
}

fn listing_html(page_props: &serde_json::Value) -> String {
    let payload = json!({ "props": { "pageProps": page_props } });
    format!(
        r#"<!DOCTYPE html><html><head></head><body><script id="__NEXT_DATA__" type="application/json">{payload}</script></body></html>"#
    )
}

fn html_response(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/html; charset=utf-8")
        .set_body_string(body)
}

// ---------------------------------------------------------------------------
// Page fetcher
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_page_returns_body_on_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(html_response("<html>ok</html>".to_owned()))
        .mount(&server)
        .await;

    let outcome = test_client().fetch_page(&listing_url(&server)).await;
    match outcome {
        PageOutcome::Ok(body) => assert_eq!(body, "<html>ok</html>"),
        other => panic!("expected Ok, got: {other:?}"),
    }
}

#[tokio::test]
async fn fetch_page_sends_browser_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(header("user-agent", TEST_UA))
        .respond_with(html_response("<html>ua</html>".to_owned()))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = test_client().fetch_page(&listing_url(&server)).await;
    assert!(matches!(outcome, PageOutcome::Ok(_)), "got: {outcome:?}");
}

#[tokio::test]
async fn fetch_page_maps_404_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let outcome = test_client().fetch_page(&listing_url(&server)).await;
    assert!(matches!(outcome, PageOutcome::NotFound), "got: {outcome:?}");
}

#[tokio::test]
async fn fetch_page_maps_other_statuses_to_transient_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let outcome = test_client().fetch_page(&listing_url(&server)).await;
    assert!(
        matches!(
            outcome,
            PageOutcome::TransientError(ScraperError::UnexpectedStatus { status: 503, .. })
        ),
        "got: {outcome:?}"
    );
}

#[tokio::test]
async fn fetch_page_maps_connection_failure_to_transient_error() {
    // Nothing listens on port 9 locally; the connection is refused.
    let outcome = test_client()
        .fetch_page("http://127.0.0.1:9/review/acme.test")
        .await;
    assert!(
        matches!(outcome, PageOutcome::TransientError(ScraperError::Http(_))),
        "got: {outcome:?}"
    );
}

#[tokio::test]
async fn throttle_delay_applies_after_failed_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = ReviewPageClient::new(5, TEST_UA, 150).unwrap();
    let started = Instant::now();
    let outcome = client.fetch_page(&listing_url(&server)).await;
    assert!(matches!(outcome, PageOutcome::TransientError(_)));
    assert!(
        started.elapsed() >= Duration::from_millis(150),
        "expected the politeness delay to run on the error path"
    );
}

// ---------------------------------------------------------------------------
// Full listing scrape
// ---------------------------------------------------------------------------

#[tokio::test]
async fn scrape_listing_collects_reviews_until_404() {
    let server = MockServer::start().await;

    let first_page = listing_html(&json!({
        "reviews": [
            review_json("r1", "Ann", 5),
            review_json("r2", "Bob", 4),
            review_json("r3", "Cy", 5)
        ],
        "businessUnit": {
            "displayName": "Acme",
            "trustScore": 8.5,
            "numberOfReviews": 3,
            "stars": 4.7
        }
    }));

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("languages", "all"))
        .and(query_param_is_missing("page"))
        .respond_with(html_response(first_page))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("languages", "all"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client();
    let result = scrape_listing(&client, &listing_url(&server), &ScrapeOptions::default())
        .await
        .expect("scrape should succeed");

    assert_eq!(result.reviews.len(), 3);
    assert_eq!(result.stop_reason, StopReason::EndOfPagination);
    assert_eq!(
        result
            .business_info
            .as_ref()
            .and_then(|b| b.display_name.as_deref()),
        Some("Acme")
    );
    assert_eq!(
        result.reviews[0].url.as_deref(),
        Some("https://www.trustpilot.com/reviews/r1")
    );
}

#[tokio::test]
async fn scrape_listing_stops_after_two_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(ResponseTemplate::new(502))
        .expect(2)
        .mount(&server)
        .await;

    let client = test_client();
    let result = scrape_listing(&client, &listing_url(&server), &ScrapeOptions::default())
        .await
        .expect("page failures are not surfaced as errors");

    assert_eq!(result.stop_reason, StopReason::ConsecutiveFailures);
    assert!(result.reviews.is_empty());
    assert!(result.business_info.is_none());
}

#[tokio::test]
async fn scrape_listing_treats_interstitial_pages_as_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(html_response(
            "<html><body>Please enable cookies</body></html>".to_owned(),
        ))
        .expect(2)
        .mount(&server)
        .await;

    let client = test_client();
    let result = scrape_listing(&client, &listing_url(&server), &ScrapeOptions::default())
        .await
        .unwrap();

    assert_eq!(result.stop_reason, StopReason::ConsecutiveFailures);
    assert_eq!(result.pages_fetched, 2);
}
