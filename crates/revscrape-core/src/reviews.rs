//! Review records and run results exchanged between the scraper and its
//! callers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::AppConfig;

/// Placeholder written in place of a review link when none could be derived.
pub const ABSENT_URL_MARKER: &str = "N/A";

/// Hard cap on the number of pages requested in one run.
pub const DEFAULT_MAX_PAGES: u32 = 100;

/// Base of synthesized review-detail links; the review id is appended as a
/// path segment.
pub const DEFAULT_REVIEW_URL_BASE: &str = "https://www.trustpilot.com/reviews";

/// A single customer review, normalized from the listing's embedded payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// Publication date at day precision; time and zone are discarded.
    pub date: NaiveDate,
    pub author: String,
    pub body: String,
    pub heading: String,
    /// Star rating, always within `1..=5`.
    pub rating: u8,
    /// Reviewer country code as reported by the site, e.g. `"DE"`.
    pub location: String,
    /// Canonical review-detail link, `None` when the payload carried neither
    /// an id nor an explicit link.
    pub url: Option<String>,
}

impl Review {
    /// Returns the review link, or [`ABSENT_URL_MARKER`] when there is none.
    #[must_use]
    pub fn url_or_marker(&self) -> &str {
        self.url.as_deref().unwrap_or(ABSENT_URL_MARKER)
    }
}

/// Headline figures for the business behind a listing. Taken from page 1 only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessInfo {
    pub display_name: Option<String>,
    /// Site score on a 0-10 scale.
    pub trust_score: Option<f64>,
    pub number_of_reviews: Option<u64>,
    /// Average stars on a 1-5 scale.
    pub stars: Option<f64>,
}

/// Why the pagination loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The site answered 404 for the next page number.
    EndOfPagination,
    ConsecutiveFailures,
    ConsecutiveEmptyPages,
    MaxPagesReached,
    /// The page number passed the `totalPages` reported by the payload.
    PaginationMetaExhausted,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::EndOfPagination => write!(f, "end of pagination"),
            StopReason::ConsecutiveFailures => write!(f, "two consecutive failed pages"),
            StopReason::ConsecutiveEmptyPages => write!(f, "two consecutive empty pages"),
            StopReason::MaxPagesReached => write!(f, "maximum page number reached"),
            StopReason::PaginationMetaExhausted => write!(f, "reported page count exhausted"),
        }
    }
}

/// Per-run switches handed to the scraper by its caller.
#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    /// Emit progress narration at `info`; otherwise the same events are
    /// logged at `debug`. Has no effect on the data returned.
    pub verbose: bool,
    /// Keep only 5-star reviews.
    pub filter_five_stars: bool,
    pub max_pages: u32,
    pub review_url_base: String,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            verbose: false,
            filter_five_stars: false,
            max_pages: DEFAULT_MAX_PAGES,
            review_url_base: DEFAULT_REVIEW_URL_BASE.to_string(),
        }
    }
}

impl ScrapeOptions {
    /// Builds run options from the resolved application config plus the two
    /// per-run switches.
    #[must_use]
    pub fn from_app_config(config: &AppConfig, verbose: bool, filter_five_stars: bool) -> Self {
        Self {
            verbose,
            filter_five_stars,
            max_pages: config.max_pages,
            review_url_base: config.review_url_base.clone(),
        }
    }
}

/// Everything a scrape run produces.
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeResult {
    /// Deduplicated reviews in first-seen order.
    pub reviews: Vec<Review>,
    pub business_info: Option<BusinessInfo>,
    pub stop_reason: StopReason,
    /// Number of page requests issued, including failed ones.
    pub pages_fetched: u32,
    /// Reviews kept before duplicate removal.
    pub total_before_dedup: usize,
}

impl ScrapeResult {
    /// Mean star rating of the returned reviews, `None` when there are none.
    #[must_use]
    pub fn average_rating(&self) -> Option<f64> {
        if self.reviews.is_empty() {
            return None;
        }
        let sum: u32 = self.reviews.iter().map(|r| u32::from(r.rating)).sum();
        #[allow(clippy::cast_precision_loss)]
        let count = self.reviews.len() as f64;
        Some(f64::from(sum) / count)
    }

    #[must_use]
    pub fn duplicates_removed(&self) -> usize {
        self.total_before_dedup.saturating_sub(self.reviews.len())
    }
}
