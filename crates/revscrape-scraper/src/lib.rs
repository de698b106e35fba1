pub mod client;
pub mod dedupe;
pub mod error;
pub mod extract;
pub mod normalize;
pub mod pagination;
pub mod rate_limit;
pub mod types;

pub use client::{listing_url_for_domain, page_url, PageOutcome, PageSource, ReviewPageClient};
pub use dedupe::dedupe_reviews;
pub use error::ScraperError;
pub use extract::extract_page;
pub use normalize::normalize_review;
pub use pagination::scrape_listing;
pub use types::{PageExtract, Pagination};
