//! Extracted movie records

use serde::{Deserialize, Serialize};

/// Sentinel title for containers where no title link could be found
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// Sentinel for missing year/rating fields
pub const NOT_AVAILABLE: &str = "N/A";

/// A single extracted movie entry
///
/// Immutable once created. Fields that could not be extracted hold sentinel
/// values (`"Unknown Title"`, `"N/A"`, empty URL) rather than failing the
/// whole record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieRecord {
    /// 1-based position, reassigned in accepted order (never read from the page)
    pub rank: u32,
    pub title: String,
    pub year: String,
    pub rating: String,
    /// Canonical detail-page URL, empty when no title id was found
    pub imdb_url: String,
}
