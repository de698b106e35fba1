use crate::app_config::AppConfig;
use crate::ConfigError;

pub(crate) const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";
pub(crate) const DEFAULT_LISTING_URL_BASE: &str = "https://www.trustpilot.com/review";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every key is optional. Parsing is decoupled from the real environment so
/// it can be tested with a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let non_empty = |var: &str, default: &str| -> Result<String, ConfigError> {
        let raw = or_default(var, default);
        if raw.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(raw)
    };

    let log_level = or_default("REVSCRAPE_LOG_LEVEL", "info");
    let user_agent = non_empty("REVSCRAPE_USER_AGENT", DEFAULT_USER_AGENT)?;
    let request_timeout_secs = parse_u64("REVSCRAPE_REQUEST_TIMEOUT_SECS", "30")?;
    let page_delay_ms = parse_u64("REVSCRAPE_PAGE_DELAY_MS", "2000")?;
    let max_pages = parse_max_pages(&or_default(
        "REVSCRAPE_MAX_PAGES",
        &crate::DEFAULT_MAX_PAGES.to_string(),
    ))?;
    let review_url_base = non_empty("REVSCRAPE_REVIEW_URL_BASE", crate::DEFAULT_REVIEW_URL_BASE)?
        .trim_end_matches('/')
        .to_string();
    let listing_url_base = non_empty("REVSCRAPE_LISTING_URL_BASE", DEFAULT_LISTING_URL_BASE)?
        .trim_end_matches('/')
        .to_string();
    let output_dir = PathBuf::from(or_default("REVSCRAPE_OUTPUT_DIR", "."));

    Ok(AppConfig {
        log_level,
        user_agent,
        request_timeout_secs,
        page_delay_ms,
        max_pages,
        review_url_base,
        listing_url_base,
        output_dir,
    })
}

/// Parse the page cap. Zero would stop before the first request, so it is
/// rejected along with non-numeric input.
fn parse_max_pages(raw: &str) -> Result<u32, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar {
        var: "REVSCRAPE_MAX_PAGES".to_string(),
        reason,
    };
    let value = raw.parse::<u32>().map_err(|e| invalid(e.to_string()))?;
    if value == 0 {
        return Err(invalid("must be at least 1".to_string()));
    }
    Ok(value)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
