pub mod app_config;
pub mod config;
pub mod reviews;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use reviews::{
    BusinessInfo, Review, ScrapeOptions, ScrapeResult, StopReason, ABSENT_URL_MARKER,
    DEFAULT_MAX_PAGES, DEFAULT_REVIEW_URL_BASE,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
