mod export;
mod report;

use std::path::PathBuf;

use clap::Parser;
use revscrape_core::{AppConfig, ScrapeOptions};
use revscrape_scraper::{listing_url_for_domain, scrape_listing, ReviewPageClient};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "revscrape")]
#[command(about = "Collect every customer review of a business listing")]
struct Cli {
    /// Business domain (e.g. `example.com`) or a full listing URL.
    #[arg(long)]
    url: String,

    /// Only keep 5-star reviews.
    #[arg(long = "filter-5-stars")]
    filter_5_stars: bool,

    /// Keep all ratings; overrides `--filter-5-stars`.
    #[arg(long)]
    no_filter: bool,

    /// Suppress per-page progress output.
    #[arg(long)]
    quiet: bool,

    /// Directory for `reviews.json` and the CSV exports.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Stop after this many pages.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    max_pages: Option<u32>,
}

impl Cli {
    fn filter_five_stars(&self) -> bool {
        self.filter_5_stars && !self.no_filter
    }

    fn scrape_options(&self, config: &AppConfig) -> ScrapeOptions {
        let mut options =
            ScrapeOptions::from_app_config(config, !self.quiet, self.filter_five_stars());
        if let Some(max_pages) = self.max_pages {
            options.max_pages = max_pages;
        }
        options
    }

    fn output_dir(&self, config: &AppConfig) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| config.output_dir.clone())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = revscrape_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    run(&cli, &config).await
}

async fn run(cli: &Cli, config: &AppConfig) -> anyhow::Result<()> {
    let listing_url = listing_url_for_domain(&cli.url, &config.listing_url_base);
    let options = cli.scrape_options(config);

    let client = ReviewPageClient::new(
        config.request_timeout_secs,
        &config.user_agent,
        config.page_delay_ms,
    )
    .map_err(|e| anyhow::anyhow!("failed to build review client: {e}"))?;

    println!(
        "scraping {listing_url} ({})",
        if options.filter_five_stars {
            "5-star reviews only"
        } else {
            "all ratings"
        }
    );

    let result = scrape_listing(&client, &listing_url, &options).await?;
    tracing::info!(
        stop_reason = %result.stop_reason,
        pages = result.pages_fetched,
        reviews = result.reviews.len(),
        "scrape complete"
    );

    if result.reviews.is_empty() {
        anyhow::bail!("no reviews found for {listing_url}");
    }

    print!("{}", report::Report::new(&result, options.filter_five_stars));

    let output_dir = cli.output_dir(config);
    let written = export::write_all(&output_dir, &result, options.filter_five_stars)?;
    for path in written {
        println!("saved {}", path.display());
    }

    Ok(())
}
