//! Page-number pagination over a review listing.
//!
//! The loop walks `page = 1, 2, ...` strictly in sequence and stops on the
//! first of:
//!
//! - a 404 for the next page number (the normal end),
//! - two page failures in a row (transport error or unreadable payload),
//! - two empty pages in a row, where a page whose reviews were all filtered
//!   out counts as empty once something has already been kept,
//! - the page number passing the `totalPages` the payload reports,
//! - the hard page cap.
//!
//! Page-level problems never escape: the caller always gets whatever was
//! collected up to the stop.

use revscrape_core::{BusinessInfo, Review, ScrapeOptions, ScrapeResult, StopReason};

use crate::client::{page_url, PageOutcome, PageSource};
use crate::dedupe::dedupe_reviews;
use crate::error::ScraperError;
use crate::extract::extract_page;
use crate::normalize::normalize_review;
use crate::types::PageExtract;

/// Successive non-productive pages tolerated before stopping.
pub const CONSECUTIVE_LIMIT: u32 = 2;

/// Logs at the given level when narration is on, at `debug` otherwise.
macro_rules! narrate {
    ($verbose:expr, $level:ident, $($arg:tt)+) => {
        if $verbose {
            tracing::$level!($($arg)+);
        } else {
            tracing::debug!($($arg)+);
        }
    };
}

/// Counters driving the stop decisions. Each `on_*` method applies one page
/// event and returns the reason to stop, if any.
#[derive(Debug, Clone)]
pub(crate) struct PaginationState {
    pub(crate) page: u32,
    max_pages: u32,
    consecutive_failures: u32,
    consecutive_empty: u32,
    kept_total: usize,
}

impl PaginationState {
    pub(crate) fn new(max_pages: u32) -> Self {
        Self {
            page: 1,
            max_pages,
            consecutive_failures: 0,
            consecutive_empty: 0,
            kept_total: 0,
        }
    }

    /// Page could not be fetched or its payload could not be read.
    pub(crate) fn on_failure(&mut self) -> Option<StopReason> {
        self.consecutive_failures += 1;
        if self.consecutive_failures >= CONSECUTIVE_LIMIT {
            return Some(StopReason::ConsecutiveFailures);
        }
        self.advance()
    }

    /// Page was read but held no reviews.
    pub(crate) fn on_empty_page(&mut self) -> Option<StopReason> {
        self.consecutive_failures = 0;
        self.consecutive_empty += 1;
        if self.consecutive_empty >= CONSECUTIVE_LIMIT {
            return Some(StopReason::ConsecutiveEmptyPages);
        }
        self.advance()
    }

    /// Page was read and held reviews. Checked before normalizing them.
    pub(crate) fn on_reviews_found(&mut self, total_pages: Option<u32>) -> Option<StopReason> {
        self.consecutive_failures = 0;
        match total_pages {
            Some(total) if total > 0 && self.page > total => {
                Some(StopReason::PaginationMetaExhausted)
            }
            _ => None,
        }
    }

    /// Records how many reviews survived normalization on a non-empty page.
    ///
    /// A page that kept nothing counts as empty once earlier pages have kept
    /// something; before that it resets the counter like any page with
    /// reviews.
    pub(crate) fn on_page_kept(&mut self, kept: usize) -> Option<StopReason> {
        if kept == 0 && self.kept_total > 0 {
            self.consecutive_empty += 1;
            if self.consecutive_empty >= CONSECUTIVE_LIMIT {
                return Some(StopReason::ConsecutiveEmptyPages);
            }
        } else {
            self.consecutive_empty = 0;
        }
        self.kept_total += kept;
        self.advance()
    }

    fn advance(&mut self) -> Option<StopReason> {
        self.page += 1;
        if self.page > self.max_pages {
            return Some(StopReason::MaxPagesReached);
        }
        None
    }
}

/// Collects every review of a listing.
///
/// Fetches pages from `source` one after another, extracts and normalizes
/// their reviews, captures business details from page 1, and deduplicates
/// the accumulated reviews once the loop stops.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidListingUrl`] if `listing_url` cannot be
/// turned into page URLs. Nothing is fetched in that case. All page-level
/// failures are absorbed into the stop decision instead.
pub async fn scrape_listing<S>(
    source: &S,
    listing_url: &str,
    options: &ScrapeOptions,
) -> Result<ScrapeResult, ScraperError>
where
    S: PageSource,
{
    // Validate once up front; later pages only differ in the page argument.
    page_url(listing_url, 1)?;

    let verbose = options.verbose;
    let mut state = PaginationState::new(options.max_pages.max(1));
    let mut collected: Vec<Review> = Vec::new();
    let mut business_info: Option<BusinessInfo> = None;
    let mut pages_fetched = 0u32;

    narrate!(
        verbose,
        info,
        listing_url,
        filter_five_stars = options.filter_five_stars,
        "starting review scrape"
    );

    let stop_reason = loop {
        let page = state.page;
        let url = page_url(listing_url, page)?;
        narrate!(verbose, info, page, url = %url, "fetching page");

        let outcome = source.fetch_page(&url).await;
        pages_fetched += 1;

        let extracted: Result<PageExtract, ScraperError> = match outcome {
            PageOutcome::NotFound => {
                narrate!(verbose, info, page, "page not found, end of pagination");
                break StopReason::EndOfPagination;
            }
            PageOutcome::TransientError(e) => Err(e),
            PageOutcome::Ok(html) => extract_page(&html),
        };

        let extract = match extracted {
            Ok(extract) => extract,
            Err(e) => {
                narrate!(verbose, warn, page, error = %e, "page could not be loaded");
                if let Some(reason) = state.on_failure() {
                    break reason;
                }
                continue;
            }
        };

        if page == 1 && business_info.is_none() {
            business_info = extract.business_info;
        }

        if extract.raw_reviews.is_empty() {
            narrate!(verbose, info, page, "no reviews on page");
            if let Some(reason) = state.on_empty_page() {
                break reason;
            }
            continue;
        }

        let total_pages = extract.pagination.and_then(|p| p.total_pages);
        if let Some(total_pages) = total_pages {
            narrate!(verbose, info, page, total_pages, "pagination reported");
        }
        if let Some(reason) = state.on_reviews_found(total_pages) {
            break reason;
        }

        let mut kept = 0usize;
        let mut filtered = 0usize;
        for raw in &extract.raw_reviews {
            match normalize_review(raw, options.filter_five_stars, &options.review_url_base) {
                Ok(Some(review)) => {
                    collected.push(review);
                    kept += 1;
                }
                Ok(None) => filtered += 1,
                Err(e) => {
                    narrate!(verbose, warn, page, error = %e, "review skipped");
                }
            }
        }

        narrate!(
            verbose,
            info,
            page,
            kept,
            filtered,
            total = collected.len(),
            "page processed"
        );

        if let Some(reason) = state.on_page_kept(kept) {
            break reason;
        }
    };

    let total_before_dedup = collected.len();
    let reviews = dedupe_reviews(collected);

    narrate!(
        verbose,
        info,
        stop_reason = %stop_reason,
        pages_fetched,
        total_found = total_before_dedup,
        after_dedup = reviews.len(),
        "scrape finished"
    );

    Ok(ScrapeResult {
        reviews,
        business_info,
        stop_reason,
        pages_fetched,
        total_before_dedup,
    })
}

#[cfg(test)]
#[path = "pagination_test.rs"]
mod tests;
