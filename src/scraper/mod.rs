//! Scraping pipeline: fetch + extract
//!
//! The orchestrator here is the unit of work dispatched as a background task
//! per category; the triggering HTTP request never awaits it.

mod extractor;
mod fetcher;

pub use extractor::{extract, RecordError, DEFAULT_LIMIT};
pub use fetcher::{build_http_client, fetch_listing, source_url};

use crate::catalog::Category;
use crate::record::MovieRecord;
use crate::Result;
use reqwest::Client;
use scraper::Html;

/// Scrapes one category: fetch the listing page, parse it, extract records
///
/// Returns `Err` on fetch failure so the dispatcher can mark the category
/// Failed; the `Ok` side may be empty when nothing matched any strategy tier.
pub async fn scrape_category(
    client: &Client,
    base_url: &str,
    category: Category,
    limit: usize,
) -> Result<Vec<MovieRecord>> {
    let body = fetch_listing(client, base_url, category).await?;

    let document = Html::parse_document(&body);
    let movies = extract(&document, category, limit);

    tracing::info!(
        category = %category,
        count = movies.len(),
        "Scrape extracted records"
    );

    Ok(movies)
}
