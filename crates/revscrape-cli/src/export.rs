//! JSON and CSV export of a finished scrape.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use revscrape_core::{BusinessInfo, Review, ScrapeResult};
use serde::Serialize;

pub(crate) const JSON_FILE: &str = "reviews.json";
pub(crate) const CSV_FILE: &str = "reviews.csv";
pub(crate) const CSV_BY_LOCATION_FILE: &str = "reviews_by_location.csv";

/// One exported review. Column names match the headers consumers of the
/// CSV files already expect.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ReviewRow<'a> {
    date: String,
    author: &'a str,
    body: &'a str,
    heading: &'a str,
    rating: u8,
    location: &'a str,
    #[serde(rename = "URL")]
    url: &'a str,
}

impl<'a> From<&'a Review> for ReviewRow<'a> {
    fn from(review: &'a Review) -> Self {
        Self {
            date: review.date.format("%Y-%m-%d").to_string(),
            author: &review.author,
            body: &review.body,
            heading: &review.heading,
            rating: review.rating,
            location: &review.location,
            url: review.url_or_marker(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ExportStatistics {
    total_reviews_scraped: usize,
    filter_5_stars_active: bool,
}

#[derive(Debug, Serialize)]
struct ExportDocument<'a> {
    business_info: BusinessInfo,
    reviews: Vec<ReviewRow<'a>>,
    statistics: ExportStatistics,
}

/// Writes `reviews.json`, `reviews.csv`, and `reviews_by_location.csv` into
/// `dir`, creating it if needed. Returns the paths written.
///
/// # Errors
///
/// Returns an error if the directory or any file cannot be written.
pub(crate) fn write_all(
    dir: &Path,
    result: &ScrapeResult,
    filter_five_stars: bool,
) -> anyhow::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .map_err(|e| anyhow::anyhow!("failed to create {}: {e}", dir.display()))?;

    let json_path = dir.join(JSON_FILE);
    write_json(&json_path, result, filter_five_stars)?;

    let rows: Vec<ReviewRow<'_>> = result.reviews.iter().map(ReviewRow::from).collect();
    let csv_path = dir.join(CSV_FILE);
    write_csv(&csv_path, &rows)?;

    let by_location_path = dir.join(CSV_BY_LOCATION_FILE);
    write_csv(&by_location_path, &sorted_by_location(&result.reviews))?;

    Ok(vec![json_path, csv_path, by_location_path])
}

pub(crate) fn write_json(
    path: &Path,
    result: &ScrapeResult,
    filter_five_stars: bool,
) -> anyhow::Result<()> {
    let document = ExportDocument {
        business_info: result.business_info.clone().unwrap_or_default(),
        reviews: result.reviews.iter().map(ReviewRow::from).collect(),
        statistics: ExportStatistics {
            total_reviews_scraped: result.reviews.len(),
            filter_5_stars_active: filter_five_stars,
        },
    };
    let file = File::create(path)
        .map_err(|e| anyhow::anyhow!("failed to create {}: {e}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &document)?;
    writer
        .flush()
        .map_err(|e| anyhow::anyhow!("failed to write {}: {e}", path.display()))?;
    Ok(())
}

fn write_csv(path: &Path, rows: &[ReviewRow<'_>]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| anyhow::anyhow!("failed to create {}: {e}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Rows ordered by location ascending, newest review first within a
/// location.
fn sorted_by_location(reviews: &[Review]) -> Vec<ReviewRow<'_>> {
    let mut ordered: Vec<&Review> = reviews.iter().collect();
    ordered.sort_by(|a, b| {
        a.location
            .cmp(&b.location)
            .then_with(|| b.date.cmp(&a.date))
    });
    ordered.into_iter().map(ReviewRow::from).collect()
}
