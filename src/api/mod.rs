//! HTTP API surface
//!
//! Thin request/response glue over the store and the scraping pipeline. The
//! first request for an uncached category wins admission via
//! `MovieStore::try_start`, spawns the scrape as a fire-and-forget task, and
//! returns immediately; clients poll the status endpoint until the scrape
//! reaches a terminal state. `/random` and `/export` only read the cache and
//! never trigger scraping.

mod export;

pub use export::{build_csv, export_filename};

use crate::catalog::Category;
use crate::scraper;
use crate::store::{MovieStore, ScrapeStatus};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use reqwest::Client;
use serde_json::json;
use std::sync::Arc;

/// Shared state handed to every route handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<MovieStore>,
    pub client: Client,
    pub base_url: String,
    pub limit: usize,
}

impl AppState {
    pub fn new(client: Client, base_url: String, limit: usize) -> Self {
        Self {
            store: Arc::new(MovieStore::new()),
            client,
            base_url,
            limit,
        }
    }
}

/// Builds the API router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/movies/:category", get(get_movies))
        .route("/api/movies/:category/status", get(get_status))
        .route("/api/movies/:category/random", get(get_random))
        .route("/api/export/:category", get(export_movies))
        .with_state(state)
}

/// `GET /api/movies/{category}`
///
/// Serves the cache when populated; otherwise reports or triggers the
/// background scrape.
async fn get_movies(State(state): State<AppState>, Path(category): Path<String>) -> Response {
    let category = match Category::parse(&category) {
        Ok(c) => c,
        Err(_) => return unknown_category(&category),
    };

    if let Some(cache) = state.store.get_cache(category) {
        return Json(json!({
            "status": "success",
            "movies": cache.movies,
            "count": cache.movies.len(),
        }))
        .into_response();
    }

    if state.store.get_status(category) == ScrapeStatus::InProgress {
        return scraping_response("Scraping in progress...");
    }

    // Admission control: exactly one request wins and dispatches the task;
    // a raced loser falls through to the in-progress response.
    if state.store.try_start(category) {
        spawn_scrape(state, category);
        return scraping_response("Started scraping movies...");
    }

    scraping_response("Scraping in progress...")
}

/// `GET /api/movies/{category}/status`
async fn get_status(State(state): State<AppState>, Path(category): Path<String>) -> Response {
    let category = match Category::parse(&category) {
        Ok(c) => c,
        Err(_) => return unknown_category(&category),
    };

    match state.store.get_status(category) {
        ScrapeStatus::Completed => match state.store.get_cache(category) {
            Some(cache) => Json(json!({
                "status": "completed",
                "movies": cache.movies,
                "count": cache.movies.len(),
            }))
            .into_response(),
            None => Json(json!({ "status": "not_started" })).into_response(),
        },
        ScrapeStatus::InProgress => scraping_response("Still scraping movies..."),
        ScrapeStatus::Failed => Json(json!({
            "status": "error",
            "message": "Error occurred while scraping",
        }))
        .into_response(),
        ScrapeStatus::NotStarted => Json(json!({ "status": "not_started" })).into_response(),
    }
}

/// `GET /api/movies/{category}/random`
///
/// Three records sampled uniformly without replacement, or the whole cached
/// set when it holds fewer than three.
async fn get_random(State(state): State<AppState>, Path(category): Path<String>) -> Response {
    use rand::seq::SliceRandom;

    let category = match Category::parse(&category) {
        Ok(c) => c,
        Err(_) => return unknown_category(&category),
    };

    let cache = match state.store.get_cache(category) {
        Some(c) => c,
        None => return no_movies_response(),
    };

    if cache.movies.len() < 3 {
        return Json(json!({ "movies": cache.movies })).into_response();
    }

    let sampled: Vec<_> = cache
        .movies
        .choose_multiple(&mut rand::thread_rng(), 3)
        .cloned()
        .collect();

    Json(json!({ "movies": sampled })).into_response()
}

/// `GET /api/export/{category}`
async fn export_movies(State(state): State<AppState>, Path(category): Path<String>) -> Response {
    let category = match Category::parse(&category) {
        Ok(c) => c,
        Err(_) => return unknown_category(&category),
    };

    let cache = match state.store.get_cache(category) {
        Some(c) => c,
        None => return no_movies_response(),
    };

    Json(json!({
        "csv_content": build_csv(category, &cache.movies),
        "filename": export_filename(category),
    }))
    .into_response()
}

/// Dispatches the scrape task for a category the caller just admitted
///
/// The task communicates its outcome solely through store transitions; the
/// caller has already returned by the time it finishes.
fn spawn_scrape(state: AppState, category: Category) {
    tokio::spawn(async move {
        tracing::info!(category = %category, "Starting background scrape");

        match scraper::scrape_category(&state.client, &state.base_url, category, state.limit).await
        {
            Ok(movies) => {
                tracing::info!(
                    category = %category,
                    count = movies.len(),
                    "Background scrape completed"
                );
                state.store.complete(category, movies);
            }
            Err(e) => {
                tracing::error!(category = %category, error = %e, "Background scrape failed");
                state.store.fail(category);
            }
        }
    });
}

fn scraping_response(message: &str) -> Response {
    Json(json!({
        "status": "scraping",
        "message": message,
    }))
    .into_response()
}

fn unknown_category(name: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": format!("Category '{}' not found", name) })),
    )
        .into_response()
}

fn no_movies_response() -> Response {
    Json(json!({ "error": "No movies available for this category" })).into_response()
}
