//! Movie extraction from listing pages
//!
//! This module turns a parsed HTML document into a sequence of
//! [`MovieRecord`]s using ordered fallback strategies:
//!
//! 1. Primary selector for the category's page layout (the aggregate top
//!    chart uses a different structure from genre search pages)
//! 2. Secondary selector for the same page type (site markup varies by
//!    experiment/version)
//! 3. Link scan fallback: every anchor pointing at a detail page, deduped by
//!    title, with a nearby-rating search up the ancestor chain
//!
//! Extraction never fails as a whole: a candidate that cannot be parsed is
//! skipped, and individual missing fields degrade to sentinel values.

use crate::catalog::Category;
use crate::record::{MovieRecord, NOT_AVAILABLE, UNKNOWN_TITLE};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use thiserror::Error;

/// Default maximum number of records returned per page
pub const DEFAULT_LIMIT: usize = 50;

/// How many ancestor levels the fallback path searches for a rating
const RATING_SEARCH_DEPTH: usize = 5;

/// Container selectors for the top-chart page, in fallback order
const TOP_CHART_TIERS: &[&str] = &["li.titleColumn", "td.titleColumn"];

/// Container selectors for genre search pages, in fallback order
const SEARCH_TIERS: &[&str] = &["div.lister-item.mode-advanced", "div.lister-item-content"];

/// Why a single candidate was rejected
///
/// These never abort the batch; the extractor collects successes and skips
/// the rest.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("container has no title link and no text")]
    EmptyContainer,

    #[error("title missing or too short")]
    TitleTooShort,

    #[error("duplicate title")]
    DuplicateTitle,
}

/// Extracts movie records from a parsed listing page
///
/// Tries the category's container selectors in order; the first tier that
/// matches at least one container wins. If no tier matches, falls back to
/// scanning detail-page links. Ranks are reassigned 1-based in accepted
/// order, and the result is truncated to `limit` records.
pub fn extract(document: &Html, category: Category, limit: usize) -> Vec<MovieRecord> {
    let tiers = if category.is_top_chart() {
        TOP_CHART_TIERS
    } else {
        SEARCH_TIERS
    };

    let containers = select_containers(document, tiers);
    if containers.is_empty() {
        tracing::debug!(
            category = %category,
            "No containers matched, using link-scan fallback"
        );
        return extract_fallback(document, limit);
    }

    tracing::debug!(
        category = %category,
        count = containers.len(),
        "Found movie containers"
    );

    let mut movies = Vec::new();
    for container in containers {
        if movies.len() >= limit {
            break;
        }

        let rank = movies.len() as u32 + 1;
        let parsed = if category.is_top_chart() {
            record_from_chart(container, rank)
        } else {
            record_from_search(container, rank)
        };

        match parsed {
            Ok(record) => movies.push(record),
            Err(e) => tracing::debug!(category = %category, "Skipping candidate: {}", e),
        }
    }

    movies
}

/// Returns the containers matched by the first non-empty tier
fn select_containers<'a>(document: &'a Html, tiers: &[&str]) -> Vec<ElementRef<'a>> {
    for css in tiers {
        if let Ok(selector) = Selector::parse(css) {
            let containers: Vec<_> = document.select(&selector).collect();
            if !containers.is_empty() {
                return containers;
            }
        }
    }
    Vec::new()
}

/// Parses one top-chart container (`li.titleColumn` / `td.titleColumn`)
///
/// The rating lives outside the container, in a sibling cell of the
/// enclosing table row.
fn record_from_chart(container: ElementRef, rank: u32) -> Result<MovieRecord, RecordError> {
    let title_link = first_match(container, "a");
    if title_link.is_none() && element_text(&container).is_empty() {
        return Err(RecordError::EmptyContainer);
    }

    let (title, imdb_url) = title_and_url(title_link);

    let year = first_match(container, "span.secondaryInfo")
        .map(|el| trim_parens(&element_text(&el)))
        .filter(|y| !y.is_empty())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    Ok(MovieRecord {
        rank,
        title,
        year,
        rating: chart_rating(container),
        imdb_url,
    })
}

/// Finds the rating for a chart container via its enclosing table row
fn chart_rating(container: ElementRef) -> String {
    let row = container
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "tr");

    if let Some(row) = row {
        if let Some(strong) = first_match(row, "td.ratingColumn.imdbRating strong") {
            let text = element_text(&strong);
            if !text.is_empty() {
                return text;
            }
        }
    }

    NOT_AVAILABLE.to_string()
}

/// Parses one search-result container (`div.lister-item*`)
fn record_from_search(container: ElementRef, rank: u32) -> Result<MovieRecord, RecordError> {
    let title_link = first_match(container, "h3.lister-item-header a");
    if title_link.is_none() && element_text(&container).is_empty() {
        return Err(RecordError::EmptyContainer);
    }

    let (title, imdb_url) = title_and_url(title_link);

    let year = first_match(container, "span.lister-item-year")
        .map(|el| trim_parens(&element_text(&el)))
        .filter(|y| !y.is_empty())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    let rating = first_match(container, "div.ratings-bar strong")
        .map(|el| element_text(&el))
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    Ok(MovieRecord {
        rank,
        title,
        year,
        rating,
        imdb_url,
    })
}

/// Fallback path: scan every detail-page link in the document
///
/// Titles are deduplicated by exact text (first occurrence wins) and must be
/// longer than 2 characters; ratings are searched for in nearby ancestors.
/// Years are not recoverable here and stay `"N/A"`.
fn extract_fallback(document: &Html, limit: usize) -> Vec<MovieRecord> {
    let link_selector = match Selector::parse("a[href]") {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    let mut seen_titles = HashSet::new();
    let mut movies = Vec::new();

    for link in document.select(&link_selector) {
        if movies.len() >= limit {
            break;
        }

        let href = link.value().attr("href").unwrap_or("");
        if !href.contains("/title/tt") {
            continue;
        }

        let rank = movies.len() as u32 + 1;
        match record_from_link(link, rank, &mut seen_titles) {
            Ok(record) => movies.push(record),
            Err(e) => tracing::trace!("Skipping link candidate: {}", e),
        }
    }

    tracing::debug!(count = movies.len(), "Link-scan fallback extracted records");
    movies
}

/// Builds a record from a bare detail-page link
fn record_from_link(
    link: ElementRef,
    rank: u32,
    seen_titles: &mut HashSet<String>,
) -> Result<MovieRecord, RecordError> {
    let title = element_text(&link);
    if title.chars().count() <= 2 {
        return Err(RecordError::TitleTooShort);
    }
    if !seen_titles.insert(title.clone()) {
        return Err(RecordError::DuplicateTitle);
    }

    Ok(MovieRecord {
        rank,
        title,
        year: NOT_AVAILABLE.to_string(),
        rating: find_nearby_rating(link),
        imdb_url: detail_url(link.value().attr("href")),
    })
}

/// Searches up to [`RATING_SEARCH_DEPTH`] ancestor levels for a rating-shaped
/// text token near a title link
///
/// Checks structured rating containers first, then any short span whose text
/// contains a decimal point. Stops at the first ancestor that yields one.
fn find_nearby_rating(link: ElementRef) -> String {
    let structured: Vec<Selector> = ["span.ratingValue", "div.ratings-bar"]
        .iter()
        .filter_map(|css| Selector::parse(css).ok())
        .collect();
    let span_selector = match Selector::parse("span") {
        Ok(s) => s,
        Err(_) => return NOT_AVAILABLE.to_string(),
    };

    for ancestor in link
        .ancestors()
        .filter_map(ElementRef::wrap)
        .take(RATING_SEARCH_DEPTH)
    {
        for selector in &structured {
            if let Some(el) = ancestor.select(selector).next() {
                let text = element_text(&el);
                if looks_like_rating(&text) {
                    return text;
                }
            }
        }

        for span in ancestor.select(&span_selector) {
            let text = element_text(&span);
            if text.contains('.') && text.chars().count() < 5 && looks_like_rating(&text) {
                return text;
            }
        }
    }

    NOT_AVAILABLE.to_string()
}

/// Basic validation for rating-shaped text: non-empty, contains a decimal
/// point, short
fn looks_like_rating(text: &str) -> bool {
    !text.is_empty() && text.contains('.') && text.chars().count() < 6
}

/// Extracts title text and detail URL from an optional title link, defaulting
/// to sentinels
fn title_and_url(link: Option<ElementRef>) -> (String, String) {
    match link {
        Some(a) => {
            let text = element_text(&a);
            let title = if text.is_empty() {
                UNKNOWN_TITLE.to_string()
            } else {
                text
            };
            (title, detail_url(a.value().attr("href")))
        }
        None => (UNKNOWN_TITLE.to_string(), String::new()),
    }
}

/// Builds the canonical detail-page URL from an href containing `/title/<id>`
///
/// Returns an empty string when no title id can be found.
fn detail_url(href: Option<&str>) -> String {
    let href = match href {
        Some(h) => h,
        None => return String::new(),
    };

    let id = href
        .split('/')
        .skip_while(|segment| *segment != "title")
        .nth(1)
        .and_then(|segment| segment.split('?').next())
        .unwrap_or("");

    if id.is_empty() {
        String::new()
    } else {
        format!("https://www.imdb.com/title/{}/", id)
    }
}

/// First descendant of `scope` matching a CSS selector
fn first_match<'a>(scope: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    scope.select(&selector).next()
}

/// Collects and trims the text content of an element
fn element_text(el: &ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Strips surrounding parentheses from year text like `(1994)`
fn trim_parens(text: &str) -> String {
    text.trim_matches(|c| c == '(' || c == ')').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(html: &str) -> Html {
        Html::parse_document(html)
    }

    fn chart_fixture() -> String {
        r#"<html><body><table><tbody>
            <tr>
                <td class="titleColumn">
                    1. <a href="/title/tt0111161/">The Shawshank Redemption</a>
                    <span class="secondaryInfo">(1994)</span>
                </td>
                <td class="ratingColumn imdbRating"><strong>9.3</strong></td>
            </tr>
            <tr>
                <td class="titleColumn">
                    2. <a href="/title/tt0068646/">The Godfather</a>
                    <span class="secondaryInfo">(1972)</span>
                </td>
                <td class="ratingColumn imdbRating"><strong>9.2</strong></td>
            </tr>
        </tbody></table></body></html>"#
            .to_string()
    }

    fn search_fixture() -> String {
        r#"<html><body>
            <div class="lister-item mode-advanced">
                <div class="lister-item-content">
                    <h3 class="lister-item-header">
                        <a href="/title/tt1375666/">Inception</a>
                        <span class="lister-item-year">(2010)</span>
                    </h3>
                    <div class="ratings-bar"><strong>8.8</strong></div>
                </div>
            </div>
            <div class="lister-item mode-advanced">
                <div class="lister-item-content">
                    <h3 class="lister-item-header">
                        <a href="/title/tt0133093/">The Matrix</a>
                        <span class="lister-item-year">(1999)</span>
                    </h3>
                    <div class="ratings-bar"><strong>8.7</strong></div>
                </div>
            </div>
        </body></html>"#
            .to_string()
    }

    #[test]
    fn test_chart_primary_tier() {
        // li.titleColumn takes precedence over td.titleColumn
        let html = r#"<html><body><ul>
            <li class="titleColumn">
                <a href="/title/tt0111161/">The Shawshank Redemption</a>
                <span class="secondaryInfo">(1994)</span>
            </li>
        </ul></body></html>"#;

        let movies = extract(&parse(html), Category::Top250, DEFAULT_LIMIT);
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].rank, 1);
        assert_eq!(movies[0].title, "The Shawshank Redemption");
        assert_eq!(movies[0].year, "1994");
        assert_eq!(
            movies[0].imdb_url,
            "https://www.imdb.com/title/tt0111161/"
        );
    }

    #[test]
    fn test_chart_secondary_tier_with_sibling_rating() {
        let movies = extract(&parse(&chart_fixture()), Category::Top250, DEFAULT_LIMIT);
        assert_eq!(movies.len(), 2);

        assert_eq!(movies[0].title, "The Shawshank Redemption");
        assert_eq!(movies[0].rating, "9.3");
        assert_eq!(movies[1].title, "The Godfather");
        assert_eq!(movies[1].rating, "9.2");
    }

    #[test]
    fn test_search_primary_tier() {
        let movies = extract(&parse(&search_fixture()), Category::Action, DEFAULT_LIMIT);
        assert_eq!(movies.len(), 2);

        assert_eq!(movies[0].rank, 1);
        assert_eq!(movies[0].title, "Inception");
        assert_eq!(movies[0].year, "2010");
        assert_eq!(movies[0].rating, "8.8");
        assert_eq!(movies[1].rank, 2);
        assert_eq!(movies[1].title, "The Matrix");
    }

    #[test]
    fn test_search_secondary_tier() {
        // No mode-advanced wrapper; only bare lister-item-content divs
        let html = r#"<html><body>
            <div class="lister-item-content">
                <h3 class="lister-item-header">
                    <a href="/title/tt1375666/">Inception</a>
                    <span class="lister-item-year">(2010)</span>
                </h3>
                <div class="ratings-bar"><strong>8.8</strong></div>
            </div>
        </body></html>"#;

        let movies = extract(&parse(html), Category::Drama, DEFAULT_LIMIT);
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].title, "Inception");
        assert_eq!(movies[0].rating, "8.8");
    }

    #[test]
    fn test_missing_fields_default_to_sentinels() {
        let html = r#"<html><body>
            <div class="lister-item mode-advanced">
                <h3 class="lister-item-header">
                    <a href="/title/tt0000001/">Some Movie</a>
                </h3>
            </div>
        </body></html>"#;

        let movies = extract(&parse(html), Category::Comedy, DEFAULT_LIMIT);
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].title, "Some Movie");
        assert_eq!(movies[0].year, "N/A");
        assert_eq!(movies[0].rating, "N/A");
    }

    #[test]
    fn test_missing_title_defaults_to_unknown() {
        let html = r#"<html><body>
            <div class="lister-item mode-advanced">
                <span class="lister-item-year">(2001)</span>
            </div>
        </body></html>"#;

        let movies = extract(&parse(html), Category::Comedy, DEFAULT_LIMIT);
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].title, "Unknown Title");
        assert_eq!(movies[0].imdb_url, "");
        assert_eq!(movies[0].year, "2001");
    }

    #[test]
    fn test_fallback_link_scan() {
        let html = r#"<html><body>
            <p><a href="/title/tt0111161/">The Shawshank Redemption</a></p>
            <p><a href="/title/tt0068646/">The Godfather</a></p>
            <p><a href="/about/">About this site</a></p>
        </body></html>"#;

        let movies = extract(&parse(html), Category::Crime, DEFAULT_LIMIT);
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].title, "The Shawshank Redemption");
        assert_eq!(movies[0].year, "N/A");
        assert_eq!(movies[1].rank, 2);
    }

    #[test]
    fn test_fallback_deduplicates_titles() {
        let html = r#"<html><body>
            <a href="/title/tt0111161/">The Shawshank Redemption</a>
            <a href="/title/tt0111161/">The Shawshank Redemption</a>
            <a href="/title/tt0068646/">The Godfather</a>
        </body></html>"#;

        let movies = extract(&parse(html), Category::Crime, DEFAULT_LIMIT);
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].title, "The Shawshank Redemption");
        assert_eq!(movies[1].title, "The Godfather");
        // Ranks stay gap-free after the duplicate is dropped
        assert_eq!(movies[0].rank, 1);
        assert_eq!(movies[1].rank, 2);
    }

    #[test]
    fn test_fallback_rejects_short_titles() {
        let html = r#"<html><body>
            <a href="/title/tt0000001/">Up</a>
            <a href="/title/tt0000002/"></a>
            <a href="/title/tt0068646/">The Godfather</a>
        </body></html>"#;

        let movies = extract(&parse(html), Category::Family, DEFAULT_LIMIT);
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].title, "The Godfather");
        assert_eq!(movies[0].rank, 1);
    }

    #[test]
    fn test_fallback_finds_nearby_rating() {
        let html = r#"<html><body>
            <div>
                <span class="ratingValue">8.9</span>
                <p><a href="/title/tt0110912/">Pulp Fiction</a></p>
            </div>
            <div>
                <span>7.8</span>
                <p><a href="/title/tt0109830/">Forrest Gump</a></p>
            </div>
            <div><div><div><div>
                <p><a href="/title/tt0120737/">The Fellowship of the Ring</a></p>
            </div></div></div></div>
        </body></html>"#;

        let movies = extract(&parse(html), Category::Drama, DEFAULT_LIMIT);
        assert_eq!(movies.len(), 3);
        assert_eq!(movies[0].rating, "8.9");
        assert_eq!(movies[1].rating, "7.8");
        assert_eq!(movies[2].rating, "N/A");
    }

    #[test]
    fn test_limit_truncates_results() {
        let mut html = String::from("<html><body>");
        for i in 0..10 {
            html.push_str(&format!(
                r#"<a href="/title/tt000000{}/">Movie Number {}</a>"#,
                i, i
            ));
        }
        html.push_str("</body></html>");

        let movies = extract(&parse(&html), Category::Action, 3);
        assert_eq!(movies.len(), 3);
        assert_eq!(movies[2].rank, 3);
    }

    #[test]
    fn test_ranks_strictly_increasing_no_gaps() {
        let movies = extract(&parse(&chart_fixture()), Category::Top250, DEFAULT_LIMIT);
        for (i, movie) in movies.iter().enumerate() {
            assert_eq!(movie.rank, i as u32 + 1);
        }
    }

    #[test]
    fn test_empty_document_yields_empty() {
        let movies = extract(
            &parse("<html><body></body></html>"),
            Category::Top250,
            DEFAULT_LIMIT,
        );
        assert!(movies.is_empty());
    }

    #[test]
    fn test_detail_url_from_relative_href() {
        assert_eq!(
            detail_url(Some("/title/tt0111161/")),
            "https://www.imdb.com/title/tt0111161/"
        );
        assert_eq!(
            detail_url(Some("/title/tt0111161/?ref_=chttp_t_1")),
            "https://www.imdb.com/title/tt0111161/"
        );
        assert_eq!(detail_url(Some("/about/")), "");
        assert_eq!(detail_url(None), "");
    }
}
