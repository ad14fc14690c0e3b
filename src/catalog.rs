//! Category catalog
//!
//! Maps each supported listing category to its display label and the source
//! path on IMDb. Unknown category strings are rejected here, before any
//! network or store work happens.

use crate::ScrapeError;
use std::fmt;

/// Query suffix shared by all genre search pages: feature films with at least
/// 25k votes, sorted by user rating.
const SEARCH_SUFFIX: &str = "&sort=user_rating,desc&title_type=feature&num_votes=25000,";

/// A fixed listing category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Action,
    Comedy,
    Drama,
    Horror,
    Romance,
    Thriller,
    SciFi,
    Fantasy,
    Adventure,
    Crime,
    Animation,
    Family,
    Top250,
}

impl Category {
    /// Parses a category from its URL path segment
    ///
    /// Returns `ScrapeError::UnknownCategory` for anything outside the fixed
    /// set, so callers can reject bad input up front.
    pub fn parse(s: &str) -> crate::Result<Self> {
        match s {
            "action" => Ok(Self::Action),
            "comedy" => Ok(Self::Comedy),
            "drama" => Ok(Self::Drama),
            "horror" => Ok(Self::Horror),
            "romance" => Ok(Self::Romance),
            "thriller" => Ok(Self::Thriller),
            "sci-fi" => Ok(Self::SciFi),
            "fantasy" => Ok(Self::Fantasy),
            "adventure" => Ok(Self::Adventure),
            "crime" => Ok(Self::Crime),
            "animation" => Ok(Self::Animation),
            "family" => Ok(Self::Family),
            "top250" => Ok(Self::Top250),
            other => Err(ScrapeError::UnknownCategory(other.to_string())),
        }
    }

    /// The URL path segment / cache key for this category
    pub fn key(&self) -> &'static str {
        match self {
            Self::Action => "action",
            Self::Comedy => "comedy",
            Self::Drama => "drama",
            Self::Horror => "horror",
            Self::Romance => "romance",
            Self::Thriller => "thriller",
            Self::SciFi => "sci-fi",
            Self::Fantasy => "fantasy",
            Self::Adventure => "adventure",
            Self::Crime => "crime",
            Self::Animation => "animation",
            Self::Family => "family",
            Self::Top250 => "top250",
        }
    }

    /// Human-readable label, used in logs
    pub fn label(&self) -> &'static str {
        match self {
            Self::Action => "Action",
            Self::Comedy => "Comedy",
            Self::Drama => "Drama",
            Self::Horror => "Horror",
            Self::Romance => "Romance",
            Self::Thriller => "Thriller",
            Self::SciFi => "Sci-Fi",
            Self::Fantasy => "Fantasy",
            Self::Adventure => "Adventure",
            Self::Crime => "Crime",
            Self::Animation => "Animation",
            Self::Family => "Family",
            Self::Top250 => "Top 250",
        }
    }

    /// Source path on the listing site, relative to the base URL
    pub fn source_path(&self) -> String {
        match self {
            Self::Top250 => "/chart/top/".to_string(),
            genre => format!("/search/title/?genres={}{}", genre.key(), SEARCH_SUFFIX),
        }
    }

    /// True for the aggregate top-chart page, which uses a distinct markup
    /// structure from the genre search pages
    pub fn is_top_chart(&self) -> bool {
        matches!(self, Self::Top250)
    }

    /// All supported categories
    pub fn all() -> Vec<Self> {
        vec![
            Self::Action,
            Self::Comedy,
            Self::Drama,
            Self::Horror,
            Self::Romance,
            Self::Thriller,
            Self::SciFi,
            Self::Fantasy,
            Self::Adventure,
            Self::Crime,
            Self::Animation,
            Self::Family,
            Self::Top250,
        ]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}
