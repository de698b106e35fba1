//! Listing and page URL construction.

use reqwest::Url;

use crate::error::ScraperError;

/// Turns the user's target into a listing URL.
///
/// A bare business domain such as `"example.com"` is appended to
/// `listing_url_base`; anything that already carries an `http(s)://` scheme
/// is returned unchanged.
#[must_use]
pub fn listing_url_for_domain(target: &str, listing_url_base: &str) -> String {
    let target = target.trim();
    let lowered = target.to_ascii_lowercase();
    if lowered.starts_with("https://") || lowered.starts_with("http://") {
        return target.to_owned();
    }
    format!(
        "{}/{}",
        listing_url_base.trim_end_matches('/'),
        target.trim_matches('/')
    )
}

/// Builds the URL for one page of a listing.
///
/// Every page asks for `languages=all` since the site otherwise filters by
/// the visitor's locale. Page 1 carries no `page` argument. Any query or
/// fragment already on `listing_url` is dropped.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidListingUrl`] if `listing_url` does not
/// parse or is not `http(s)`.
pub fn page_url(listing_url: &str, page: u32) -> Result<String, ScraperError> {
    let invalid = |reason: String| ScraperError::InvalidListingUrl {
        listing_url: listing_url.to_owned(),
        reason,
    };

    let mut url = Url::parse(listing_url).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme \"{}\"", url.scheme())));
    }

    url.set_query(None);
    url.set_fragment(None);
    url.query_pairs_mut().append_pair("languages", "all");
    if page >= 2 {
        url.query_pairs_mut()
            .append_pair("page", &page.to_string());
    }

    Ok(url.to_string())
}
