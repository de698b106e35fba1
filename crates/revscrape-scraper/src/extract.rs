//! Locates and decodes the JSON payload embedded in a listing page.

use std::sync::LazyLock;

use revscrape_core::BusinessInfo;
use scraper::{Html, Selector};
use serde_json::Value;

use crate::error::ScraperError;
use crate::types::{PageExtract, Pagination};

static NEXT_DATA_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("script#__NEXT_DATA__").expect("valid __NEXT_DATA__ selector")
});

const PAGE_PROPS_PATH: &[&str] = &["props", "pageProps"];

/// Review list locations under `pageProps`, in priority order.
const REVIEW_LIST_PATHS: &[&[&str]] = &[&["reviews"], &["businessUnit", "reviews", "reviews"]];

/// Parses a listing page and pulls out its reviews, pagination, and business
/// details.
///
/// An empty review list is a valid result. A page where neither review
/// location holds a list at all is not.
///
/// # Errors
///
/// - [`ScraperError::PayloadNotFound`] when the data script is missing, as on
///   interstitial or error pages.
/// - [`ScraperError::Deserialize`] when the script body is not valid JSON.
/// - [`ScraperError::UnrecognizedPayload`] when `pageProps` or every review
///   list location is missing.
pub fn extract_page(html: &str) -> Result<PageExtract, ScraperError> {
    let raw = embedded_payload_text(html).ok_or(ScraperError::PayloadNotFound)?;
    let payload: Value =
        serde_json::from_str(raw.trim()).map_err(|e| ScraperError::Deserialize {
            context: "embedded page payload".to_owned(),
            source: e,
        })?;

    let page_props =
        lookup(&payload, PAGE_PROPS_PATH).ok_or_else(|| ScraperError::UnrecognizedPayload {
            reason: "props.pageProps is missing".to_owned(),
        })?;

    let raw_reviews =
        find_review_list(page_props).ok_or_else(|| ScraperError::UnrecognizedPayload {
            reason: "no review list under pageProps".to_owned(),
        })?;

    let business_unit = page_props.get("businessUnit").filter(|v| v.is_object());
    let pagination = business_unit.and_then(extract_pagination);
    let business_info = business_unit.map(extract_business_info);

    Ok(PageExtract {
        raw_reviews,
        pagination,
        business_info,
    })
}

fn embedded_payload_text(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(&NEXT_DATA_SELECTOR)
        .next()
        .map(|script| script.text().collect::<String>())
}

/// Walks `path` through nested objects. Any missing step yields `None`.
pub(crate) fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |node, key| node.get(*key))
}

/// Returns the first non-empty review array. If every array found is empty
/// the result is an empty list; if none exists it is `None`.
fn find_review_list(page_props: &Value) -> Option<Vec<Value>> {
    let mut found_empty = false;
    for path in REVIEW_LIST_PATHS {
        match lookup(page_props, path).and_then(Value::as_array) {
            Some(list) if !list.is_empty() => return Some(list.clone()),
            Some(_) => found_empty = true,
            None => {}
        }
    }
    found_empty.then(Vec::new)
}

fn extract_pagination(business_unit: &Value) -> Option<Pagination> {
    let pagination = lookup(business_unit, &["reviews", "pagination"])?;
    if !pagination.is_object() {
        return None;
    }
    Some(Pagination {
        current_page: as_u32(pagination.get("currentPage")),
        total_pages: as_u32(pagination.get("totalPages")),
    })
}

fn extract_business_info(business_unit: &Value) -> BusinessInfo {
    BusinessInfo {
        display_name: business_unit
            .get("displayName")
            .and_then(Value::as_str)
            .map(str::to_owned),
        trust_score: business_unit.get("trustScore").and_then(Value::as_f64),
        number_of_reviews: business_unit.get("numberOfReviews").and_then(Value::as_u64),
        stars: business_unit.get("stars").and_then(Value::as_f64),
    }
}

fn as_u32(value: Option<&Value>) -> Option<u32> {
    value
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
