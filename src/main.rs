//! # Country Leaders
//!
//! A scraping pipeline that fetches historical national leaders from a
//! cookie-protected REST API, enriches each one with the first paragraph of
//! their Wikipedia biography, and exports the combined dataset to JSON and
//! CSV.
//!
//! ## Usage
//!
//! ```sh
//! country_leaders -j ./output/leaders_per_country.json -c ./output/leaders_per_country.csv
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Fetching**: Acquire a session cookie and pull the country and leader
//!    lists from the API, refreshing the cookie on auth rejections
//! 2. **Scraping**: Download each leader's Wikipedia page and extract the
//!    first bold-led paragraph as the biography excerpt
//! 3. **Output**: Write the country→leaders JSON mapping and the flat CSV
//!    table
//!
//! Failures degrade to partial data: an unreachable page or a failed export
//! is logged, never fatal.

use clap::Parser;
use std::error::Error;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod coordinator;
mod error;
mod models;
mod outputs;
mod repository;
mod scrapers;
mod utils;

use api::SessionClient;
use cli::Cli;
use coordinator::ScrapeCoordinator;
use repository::LeaderRepository;
use utils::ensure_writable_dir;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("country_leaders starting up");

    let args = Cli::parse();
    debug!(?args.api_root, ?args.json_output, ?args.csv_output, "Parsed CLI arguments");

    let json_path = Path::new(&args.json_output);
    let csv_path = Path::new(&args.csv_output);

    // Early check: ensure both output directories are writable
    for output in [json_path, csv_path] {
        let dir = output.parent().filter(|p| !p.as_os_str().is_empty());
        if let Some(dir) = dir {
            if let Err(e) = ensure_writable_dir(dir).await {
                error!(
                    path = %dir.display(),
                    error = %e,
                    "Output directory is not writable (fix perms or choose a different path)"
                );
                return Err(e);
            }
        }
    }

    let timeout = Duration::from_secs(args.timeout_secs);

    // ---- Fetch countries and leaders ----
    let mut session = SessionClient::new(&args.api_root, timeout)?;
    let mut repository = LeaderRepository::new();
    repository.populate(&mut session).await;

    if repository.leaders().is_empty() {
        warn!("No leaders fetched; exports will be skipped or empty");
    }

    if args.print_leaders {
        for leader in repository.leaders() {
            println!("{leader}");
        }
    }

    // ---- Scrape biographies and export ----
    let coordinator = ScrapeCoordinator::new(timeout)?;
    coordinator.run(&mut repository, json_path, csv_path).await;

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        leaders = repository.leaders().len(),
        "Execution complete"
    );

    Ok(())
}
