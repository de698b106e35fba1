//! Duplicate removal across overlapping pages.

use std::collections::HashSet;

use chrono::NaiveDate;
use revscrape_core::Review;

/// Number of leading body characters that take part in the duplicate key.
pub const BODY_PREFIX_CHARS: usize = 100;

type ReviewKey = (NaiveDate, String, String, u8);

/// Removes duplicate reviews, keeping the first occurrence of each.
///
/// Two reviews are duplicates when their date, author, first
/// [`BODY_PREFIX_CHARS`] characters of body, and rating all match.
/// Relative order of the survivors is unchanged.
#[must_use]
pub fn dedupe_reviews(mut reviews: Vec<Review>) -> Vec<Review> {
    let mut seen: HashSet<ReviewKey> = HashSet::with_capacity(reviews.len());
    reviews.retain(|review| seen.insert(review_key(review)));
    reviews
}

fn review_key(review: &Review) -> ReviewKey {
    (
        review.date,
        review.author.clone(),
        body_prefix(&review.body).to_owned(),
        review.rating,
    )
}

/// First [`BODY_PREFIX_CHARS`] characters of `body`, cut on a char boundary.
fn body_prefix(body: &str) -> &str {
    body.char_indices()
        .nth(BODY_PREFIX_CHARS)
        .map_or(body, |(idx, _)| &body[..idx])
}
