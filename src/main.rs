//! CineFind main entry point
//!
//! Starts the movie API server. Scraping happens lazily: the first request
//! for a category kicks off a background scrape, and the cache serves all
//! later requests.

use cinefind::api::{self, AppState};
use cinefind::scraper::{build_http_client, DEFAULT_LIMIT};
use clap::Parser;
use std::net::IpAddr;
use tracing_subscriber::EnvFilter;

/// CineFind: IMDb movie-listing scraper with a JSON API
#[derive(Parser, Debug)]
#[command(name = "cinefind")]
#[command(version = "1.0.0")]
#[command(about = "Movie-listing scraper and API server", long_about = None)]
struct Cli {
    /// Address to bind the API server to
    #[arg(long, default_value = "0.0.0.0")]
    bind: IpAddr,

    /// Port to listen on
    #[arg(short, long, default_value_t = 5001)]
    port: u16,

    /// Base URL of the listing site
    #[arg(long, default_value = "https://www.imdb.com")]
    base_url: String,

    /// Maximum records to keep per category
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    limit: usize,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let client = build_http_client()?;
    let state = AppState::new(client, cli.base_url.clone(), cli.limit);
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind((cli.bind, cli.port)).await?;
    tracing::info!(
        "CineFind listening on http://{}:{} (source: {})",
        cli.bind,
        cli.port,
        cli.base_url
    );

    axum::serve(listener, app).await?;

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("cinefind=info,warn"),
            1 => EnvFilter::new("cinefind=debug,info"),
            2 => EnvFilter::new("cinefind=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
