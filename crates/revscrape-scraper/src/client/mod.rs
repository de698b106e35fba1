//! HTTP page fetcher for a review listing.

mod listing;

use std::future::Future;
use std::time::Duration;

use reqwest::Client;

use crate::error::ScraperError;
use crate::rate_limit::FixedIntervalThrottle;

pub use listing::{listing_url_for_domain, page_url};

/// Result of requesting one listing page.
#[derive(Debug)]
pub enum PageOutcome {
    /// 2xx response; carries the decoded HTML body.
    Ok(String),
    /// HTTP 404. The page number does not exist, which ends pagination.
    NotFound,
    /// Transport failure, non-404 error status, or undecodable body.
    TransientError(ScraperError),
}

/// Anything that can turn a page URL into a [`PageOutcome`].
///
/// [`ReviewPageClient`] is the network implementation; tests drive the
/// pagination loop with scripted sources.
pub trait PageSource {
    fn fetch_page(&self, url: &str) -> impl Future<Output = PageOutcome> + Send;
}

/// HTTP client for server-rendered review listing pages.
///
/// Requests are throttled: every request is followed by a fixed pause,
/// including requests that fail. No retries happen here; the pagination loop
/// decides what to do with a failed page.
pub struct ReviewPageClient {
    client: Client,
    throttle: FixedIntervalThrottle,
}

impl ReviewPageClient {
    /// Creates a client with the given timeout, `User-Agent`, and post-request
    /// delay. The site rejects requests without a browser-like agent, so an
    /// empty `user_agent` is refused.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidClientConfig`] for an empty agent and
    /// [`ScraperError::Http`] if the underlying `reqwest::Client` cannot be
    /// constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        page_delay_ms: u64,
    ) -> Result<Self, ScraperError> {
        if user_agent.trim().is_empty() {
            return Err(ScraperError::InvalidClientConfig {
                reason: "User-Agent must not be empty".to_owned(),
            });
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            throttle: FixedIntervalThrottle::from_millis(page_delay_ms),
        })
    }

    /// Fetches one listing page and classifies the result.
    ///
    /// The throttle delay runs after the request whatever the outcome.
    pub async fn fetch_page(&self, url: &str) -> PageOutcome {
        self.throttle.acquire().await;
        let result = self.request_page(url).await;
        self.throttle.pause_after_request().await;

        match result {
            Ok(body) => PageOutcome::Ok(body),
            Err(ScraperError::NotFound { .. }) => {
                tracing::debug!(url, "listing page not found");
                PageOutcome::NotFound
            }
            Err(e) => {
                tracing::debug!(url, error = %e, "listing page request failed");
                PageOutcome::TransientError(e)
            }
        }
    }

    async fn request_page(&self, url: &str) -> Result<String, ScraperError> {
        let response = self
            .client
            .get(url)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ScraperError::NotFound {
                url: url.to_owned(),
            });
        }

        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        Ok(response.text().await?)
    }
}

impl PageSource for ReviewPageClient {
    async fn fetch_page(&self, url: &str) -> PageOutcome {
        ReviewPageClient::fetch_page(self, url).await
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
