//! Human-readable run summary printed after a scrape.

use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;
use revscrape_core::{Review, ScrapeResult};

const EXAMPLE_REVIEWS: usize = 3;
const EXAMPLE_BODY_CHARS: usize = 150;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LocationStat {
    pub(crate) location: String,
    pub(crate) count: usize,
    pub(crate) average_rating: f64,
}

/// Review counts and mean rating per location, most reviews first. Ties are
/// ordered by location code.
pub(crate) fn location_stats(reviews: &[Review]) -> Vec<LocationStat> {
    let mut totals: HashMap<&str, (usize, u32)> = HashMap::new();
    for review in reviews {
        let entry = totals.entry(review.location.as_str()).or_default();
        entry.0 += 1;
        entry.1 += u32::from(review.rating);
    }

    let mut stats: Vec<LocationStat> = totals
        .into_iter()
        .map(|(location, (count, rating_sum))| LocationStat {
            location: location.to_owned(),
            count,
            average_rating: f64::from(rating_sum) / as_f64(count),
        })
        .collect();
    stats.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.location.cmp(&b.location)));
    stats
}

/// `(rating, count)` pairs, highest rating first.
pub(crate) fn rating_distribution(reviews: &[Review]) -> Vec<(u8, usize)> {
    let mut counts: HashMap<u8, usize> = HashMap::new();
    for review in reviews {
        *counts.entry(review.rating).or_default() += 1;
    }
    let mut dist: Vec<(u8, usize)> = counts.into_iter().collect();
    dist.sort_by(|a, b| b.0.cmp(&a.0));
    dist
}

/// Oldest and newest review dates.
pub(crate) fn date_range(reviews: &[Review]) -> Option<(NaiveDate, NaiveDate)> {
    let oldest = reviews.iter().map(|r| r.date).min()?;
    let newest = reviews.iter().map(|r| r.date).max()?;
    Some((oldest, newest))
}

#[allow(clippy::cast_precision_loss)]
fn as_f64(n: usize) -> f64 {
    n as f64
}

fn truncate_chars(text: &str, max: usize) -> &str {
    text.char_indices()
        .nth(max)
        .map_or(text, |(idx, _)| &text[..idx])
}

fn or_na<T: fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "N/A".to_owned(), |v| v.to_string())
}

/// Printable summary of a [`ScrapeResult`].
pub(crate) struct Report<'a> {
    result: &'a ScrapeResult,
    filter_five_stars: bool,
}

impl<'a> Report<'a> {
    pub(crate) fn new(result: &'a ScrapeResult, filter_five_stars: bool) -> Self {
        Self {
            result,
            filter_five_stars,
        }
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reviews = &self.result.reviews;

        writeln!(f, "Stopped: {}", self.result.stop_reason)?;
        writeln!(
            f,
            "Total found: {} reviews, after duplicate removal: {}",
            self.result.total_before_dedup,
            reviews.len()
        )?;

        if let Some(info) = &self.result.business_info {
            writeln!(f)?;
            writeln!(f, "Business Information:")?;
            writeln!(f, "   Name: {}", or_na(info.display_name.as_deref()))?;
            writeln!(f, "   TrustScore: {}/10", or_na(info.trust_score))?;
            writeln!(f, "   Total Reviews: {}", or_na(info.number_of_reviews))?;
            writeln!(f, "   Average Stars: {}/5", or_na(info.stars))?;
        }

        writeln!(f)?;
        writeln!(f, "Overall Statistics (scraped reviews):")?;
        writeln!(f, "   Number of Reviews: {}", reviews.len())?;
        if let Some(average) = self.result.average_rating() {
            writeln!(f, "   Average Rating: {average:.2}/5")?;
        }
        if let Some(max) = reviews.iter().map(|r| r.rating).max() {
            writeln!(f, "   Highest Rating: {max}/5")?;
        }
        if let Some(min) = reviews.iter().map(|r| r.rating).min() {
            writeln!(f, "   Lowest Rating: {min}/5")?;
        }
        if self.filter_five_stars {
            let listed = self
                .result
                .business_info
                .as_ref()
                .and_then(|b| b.number_of_reviews)
                .filter(|n| *n > 0);
            if let Some(listed) = listed {
                #[allow(clippy::cast_precision_loss)]
                let pct = as_f64(reviews.len()) / listed as f64 * 100.0;
                writeln!(
                    f,
                    "   5-Star Reviews Percentage: {pct:.1}% ({}/{listed})",
                    reviews.len()
                )?;
            }
        }

        writeln!(f)?;
        writeln!(f, "Reviews by Location:")?;
        for stat in location_stats(reviews) {
            writeln!(
                f,
                "   {}: {:3} reviews (avg {:.2}/5)",
                stat.location, stat.count, stat.average_rating
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Rating Distribution:")?;
        for (rating, count) in rating_distribution(reviews) {
            let pct = as_f64(count) / as_f64(reviews.len()) * 100.0;
            writeln!(f, "   {rating} stars: {count:3} reviews ({pct:5.1}%)")?;
        }

        if let Some((oldest, newest)) = date_range(reviews) {
            writeln!(f)?;
            writeln!(f, "Date Range:")?;
            writeln!(f, "   Oldest Review: {oldest}")?;
            writeln!(f, "   Newest Review: {newest}")?;
        }

        writeln!(f)?;
        writeln!(f, "Example Reviews (first {EXAMPLE_REVIEWS}):")?;
        for (i, review) in reviews.iter().take(EXAMPLE_REVIEWS).enumerate() {
            writeln!(f)?;
            writeln!(f, "Review {}:", i + 1)?;
            writeln!(f, "   Date: {}", review.date)?;
            writeln!(f, "   Author: {}", review.author)?;
            writeln!(f, "   Location: {}", review.location)?;
            writeln!(f, "   Rating: {}/5", review.rating)?;
            writeln!(f, "   Heading: {}", review.heading)?;
            writeln!(f, "   URL: {}", review.url_or_marker())?;
            writeln!(
                f,
                "   Text: {}...",
                truncate_chars(&review.body, EXAMPLE_BODY_CHARS)
            )?;
        }

        Ok(())
    }
}
