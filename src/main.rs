//! Tile Downloader - fetch a single map tile from the command line.
//!
//! Exit codes: 0 on success, 2 on a retryable miss, 1 on failure.

use std::path::Path;
use std::process::ExitCode;
use std::time::UNIX_EPOCH;

use clap::Parser;
use image::ImageFormat;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tile_downloader::{config::Config, FetchReport, FetchResult, TileBitmap, TileFetcher};

/// Exit code for a truncated or corrupted download.
const EXIT_RETRYABLE_MISS: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let job = match config.download_job() {
        Ok(job) => job,
        Err(e) => {
            error!("Invalid tile: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let fetch_config = config.fetch_config();

    info!("Fetching tile {}", job.tile());
    if let Ok(url) = job.url() {
        info!("  URL: {}", url);
    }

    let fetcher = TileFetcher::default();
    let result = fetcher.fetch(&job, &fetch_config).await;

    let report = FetchReport::new(&job, &result);
    if config.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Failed to serialize report: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        print_report(&report);
    }

    match result {
        FetchResult::Success { bitmap, .. } => {
            if let Some(ref path) = config.output {
                if let Err(e) = save_bitmap(&bitmap, path) {
                    error!("Failed to write {}: {}", path.display(), e);
                    return ExitCode::FAILURE;
                }
                info!("Saved tile to {}", path.display());
            }
            ExitCode::SUCCESS
        }
        FetchResult::RetryableMiss => ExitCode::from(EXIT_RETRYABLE_MISS),
        FetchResult::Failure(_) => ExitCode::FAILURE,
    }
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "tile_downloader=debug"
    } else {
        "tile_downloader=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Print the human-readable report on stdout.
fn print_report(report: &FetchReport) {
    println!("tile:    {}", report.tile);
    if let Some(ref url) = report.url {
        println!("url:     {}", url);
    }
    println!("outcome: {}", report.outcome);
    if let (Some(width), Some(height)) = (report.width, report.height) {
        let channels = if report.has_alpha == Some(true) {
            "RGBA"
        } else {
            "RGB"
        };
        println!("bitmap:  {}x{} {}", width, height, channels);
    }
    if let Some(expires) = report.expires {
        let expires = UNIX_EPOCH + std::time::Duration::from_secs(expires);
        let expires: chrono::DateTime<chrono::Utc> = expires.into();
        println!("expires: {}", expires.to_rfc2822());
    }
    if let Some(ref e) = report.error {
        println!("error:   {}", e);
    }
}

/// Save the bitmap as PNG.
fn save_bitmap(bitmap: &TileBitmap, path: &Path) -> Result<(), image::ImageError> {
    bitmap.image().save_with_format(path, ImageFormat::Png)
}
