use super::*;

#[test]
fn first_page_has_no_page_argument() {
    let url = page_url("https://www.trustpilot.com/review/example.com", 1).unwrap();
    assert_eq!(
        url,
        "https://www.trustpilot.com/review/example.com?languages=all"
    );
}

#[test]
fn later_pages_carry_page_argument() {
    let url = page_url("https://www.trustpilot.com/review/example.com", 7).unwrap();
    assert_eq!(
        url,
        "https://www.trustpilot.com/review/example.com?languages=all&page=7"
    );
}

#[test]
fn page_url_replaces_existing_query() {
    let url = page_url(
        "https://www.trustpilot.com/review/example.com?languages=en&stars=5#top",
        2,
    )
    .unwrap();
    assert_eq!(
        url,
        "https://www.trustpilot.com/review/example.com?languages=all&page=2"
    );
}

#[test]
fn page_url_rejects_unparseable_listing() {
    let result = page_url("example.com", 1);
    assert!(
        matches!(result, Err(ScraperError::InvalidListingUrl { .. })),
        "expected InvalidListingUrl, got: {result:?}"
    );
}

#[test]
fn page_url_rejects_non_http_scheme() {
    let result = page_url("ftp://example.com/review/x", 1);
    assert!(
        matches!(result, Err(ScraperError::InvalidListingUrl { .. })),
        "expected InvalidListingUrl, got: {result:?}"
    );
}

#[test]
fn listing_url_for_bare_domain() {
    assert_eq!(
        listing_url_for_domain("example.com", "https://www.trustpilot.com/review/"),
        "https://www.trustpilot.com/review/example.com"
    );
}

#[test]
fn listing_url_keeps_full_urls() {
    assert_eq!(
        listing_url_for_domain(
            " https://de.trustpilot.com/review/example.com ",
            "https://www.trustpilot.com/review"
        ),
        "https://de.trustpilot.com/review/example.com"
    );
}

#[test]
fn listing_url_scheme_match_ignores_case() {
    assert_eq!(
        listing_url_for_domain(
            "HTTPS://www.trustpilot.com/review/example.com",
            "https://www.trustpilot.com/review"
        ),
        "HTTPS://www.trustpilot.com/review/example.com"
    );
    assert_eq!(
        listing_url_for_domain("Http://example.com/review/acme", "https://x.test/review"),
        "Http://example.com/review/acme"
    );
}

#[test]
fn client_rejects_empty_user_agent() {
    let result = ReviewPageClient::new(5, "  ", 0);
    assert!(
        matches!(result, Err(ScraperError::InvalidClientConfig { .. })),
        "expected InvalidClientConfig"
    );
}
