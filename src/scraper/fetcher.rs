//! HTTP fetcher for listing pages
//!
//! Builds the shared HTTP client and performs the rate-limited GET for a
//! category's source URL. There is no retry at this layer (or anywhere): a
//! failed fetch marks the category Failed and a fresh client request is
//! needed to re-attempt.

use crate::catalog::Category;
use crate::{Result, ScrapeError};
use rand::Rng;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Browser identification sent with every listing request
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Request timeout in seconds
const TIMEOUT_SECS: u64 = 15;

/// Courtesy-delay bounds in seconds, drawn uniformly before each request
const DELAY_RANGE_SECS: (f64, f64) = (1.0, 3.0);

/// Builds the HTTP client used for all listing fetches
pub fn build_http_client() -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(TIMEOUT_SECS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Resolves the full source URL for a category against the site base URL
pub fn source_url(base_url: &str, category: Category) -> Result<Url> {
    let base = Url::parse(base_url)?;
    Ok(base.join(&category.source_path())?)
}

/// Fetches the listing page for a category
///
/// Sleeps a random 1-3 s before the request as a courtesy delay, then GETs
/// the category's source URL with a 15 s timeout. Any non-success status or
/// transport error is returned as a [`ScrapeError`]; no retries.
pub async fn fetch_listing(client: &Client, base_url: &str, category: Category) -> Result<String> {
    let url = source_url(base_url, category)?;

    courtesy_delay().await;

    tracing::info!(category = %category, url = %url, "Fetching listing page");

    let response = client.get(url.clone()).send().await.map_err(|e| {
        if e.is_timeout() {
            ScrapeError::Timeout {
                url: url.to_string(),
            }
        } else {
            ScrapeError::Http {
                url: url.to_string(),
                source: e,
            }
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ScrapeError::Status {
            url: url.to_string(),
            code: status.as_u16(),
        });
    }

    response.text().await.map_err(|e| ScrapeError::Http {
        url: url.to_string(),
        source: e,
    })
}

/// Sleeps a random duration drawn uniformly from the courtesy-delay range
async fn courtesy_delay() {
    let seconds = rand::thread_rng().gen_range(DELAY_RANGE_SECS.0..=DELAY_RANGE_SECS.1);
    tokio::time::sleep(Duration::from_secs_f64(seconds)).await;
}
