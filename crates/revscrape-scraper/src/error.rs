use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("page not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("embedded data script not found in page")]
    PayloadNotFound,

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unrecognized page payload: {reason}")]
    UnrecognizedPayload { reason: String },

    #[error("malformed review: {reason}")]
    MalformedReview { reason: String },

    #[error("invalid listing URL \"{listing_url}\": {reason}")]
    InvalidListingUrl { listing_url: String, reason: String },

    #[error("invalid client configuration: {reason}")]
    InvalidClientConfig { reason: String },
}
