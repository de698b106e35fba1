//! Normalization from raw payload reviews to [`revscrape_core::Review`].
//!
//! Raw reviews are untyped JSON. Each required field is looked up explicitly
//! and a missing or mistyped one turns into [`ScraperError::MalformedReview`]
//! for that single review only.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use revscrape_core::Review;
use serde_json::Value;

use crate::error::ScraperError;
use crate::extract::lookup;

/// Normalizes one raw review.
///
/// Returns `Ok(None)` when the review is filtered out because
/// `filter_five_stars` is set and its rating is not 5.
///
/// # Errors
///
/// Returns [`ScraperError::MalformedReview`] when the rating, publication
/// date, reviewer name, text, title, or reviewer country is missing or has
/// the wrong type, or when the rating lies outside `1..=5`.
pub fn normalize_review(
    raw: &Value,
    filter_five_stars: bool,
    review_url_base: &str,
) -> Result<Option<Review>, ScraperError> {
    let rating = rating(raw)?;
    if filter_five_stars && rating != 5 {
        return Ok(None);
    }

    let published = required_str(raw, &["dates", "publishedDate"])?;
    let date = parse_published_date(published).ok_or_else(|| malformed(format!(
        "unparseable publishedDate \"{published}\""
    )))?;

    Ok(Some(Review {
        date,
        author: required_str(raw, &["consumer", "displayName"])?.to_owned(),
        body: required_str(raw, &["text"])?.to_owned(),
        heading: required_str(raw, &["title"])?.to_owned(),
        rating,
        location: required_str(raw, &["consumer", "countryCode"])?.to_owned(),
        url: review_url(raw, review_url_base),
    }))
}

/// Derives the review-detail link: an `id` (or `reviewId`) appended to
/// `review_url_base`, else an explicit `url` field, else `None`.
#[must_use]
pub fn review_url(raw: &Value, review_url_base: &str) -> Option<String> {
    let id = ["id", "reviewId"]
        .iter()
        .find_map(|key| identifier(raw.get(*key)));
    if let Some(id) = id {
        return Some(format!("{}/{id}", review_url_base.trim_end_matches('/')));
    }
    raw.get("url")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// Reduces a publication timestamp to its calendar date in the timestamp's
/// own offset. Accepts RFC 3339, zone-less date-times, and bare dates.
#[must_use]
pub fn parse_published_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

fn rating(raw: &Value) -> Result<u8, ScraperError> {
    let value = raw
        .get("rating")
        .ok_or_else(|| malformed("missing rating".to_owned()))?;
    value
        .as_u64()
        .and_then(|n| u8::try_from(n).ok())
        .filter(|n| (1..=5).contains(n))
        .ok_or_else(|| malformed(format!("rating {value} is not an integer in 1..=5")))
}

fn required_str<'a>(raw: &'a Value, path: &[&str]) -> Result<&'a str, ScraperError> {
    lookup(raw, path)
        .and_then(Value::as_str)
        .ok_or_else(|| malformed(format!("missing or non-string {}", path.join("."))))
}

fn identifier(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn malformed(reason: String) -> ScraperError {
    ScraperError::MalformedReview { reason }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
