use std::path::PathBuf;

/// Process-wide settings for a scrape run, resolved from the environment.
///
/// Per-run switches (rating filter, progress narration) are not part of this
/// struct; they arrive from the command line and are combined with it into a
/// [`crate::ScrapeOptions`].
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    /// Sleep applied after every page request, successful or not.
    pub page_delay_ms: u64,
    pub max_pages: u32,
    /// Prefix for synthesized review-detail links, e.g. `https://host/reviews`.
    pub review_url_base: String,
    /// Prefix used to turn a bare business domain into a listing URL.
    pub listing_url_base: String,
    pub output_dir: PathBuf,
}
