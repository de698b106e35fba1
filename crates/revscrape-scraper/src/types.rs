//! Shapes pulled out of a listing page's embedded `__NEXT_DATA__` payload.
//!
//! ## Observed payload layout
//!
//! ```text
//! props.pageProps.reviews                         -> [review, ...]      (primary)
//! props.pageProps.businessUnit.reviews.reviews    -> [review, ...]      (fallback)
//! props.pageProps.businessUnit.reviews.pagination -> { currentPage, totalPages }
//! props.pageProps.businessUnit                    -> { displayName, trustScore,
//!                                                      numberOfReviews, stars }
//! ```
//!
//! Which of the two review locations is populated depends on the page
//! variant served, so both are tried in order. Individual reviews are kept
//! as raw JSON and only checked field by field during normalization.

use revscrape_core::BusinessInfo;
use serde_json::Value;

/// Pagination block reported by the page itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pagination {
    pub current_page: Option<u32>,
    pub total_pages: Option<u32>,
}

/// Everything extracted from one page.
#[derive(Debug, Clone, Default)]
pub struct PageExtract {
    /// Raw review objects. Empty means the page had no reviews.
    pub raw_reviews: Vec<Value>,
    pub pagination: Option<Pagination>,
    /// Only meaningful on page 1.
    pub business_info: Option<BusinessInfo>,
}
