//! CineFind: an IMDb movie-listing scraper with a small HTTP API
//!
//! This crate fetches movie-listing pages from IMDb, extracts structured
//! records via layered selector fallback, and serves them through a JSON API
//! with per-category caching and asynchronous population.

pub mod api;
pub mod catalog;
pub mod record;
pub mod scraper;
pub mod store;

use thiserror::Error;

/// Main error type for CineFind scrape operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP status {code} for {url}")]
    Status { url: String, code: u16 },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Result type alias for CineFind scrape operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

// Re-export commonly used types
pub use catalog::Category;
pub use record::MovieRecord;
pub use store::{CacheEntry, MovieStore, ScrapeStatus};
