//! Truncated and corrupted streams.
//!
//! A tile cut short in transit is not a definitive failure: the fetch must
//! report a retryable miss, and resubmitting the same job must work once the
//! peer behaves.

use tile_downloader::{FetchConfig, FetchResult};

use super::test_utils::{direct_fetcher, job_for, start_truncating_server, TileServer};

#[tokio::test]
async fn test_half_png_is_retryable_miss() {
    let server = TileServer::start().await;
    let job = job_for(server.url("/half"), 256);

    let result = direct_fetcher().fetch(&job, &FetchConfig::default()).await;
    assert!(result.is_retryable_miss(), "got {:?}", result);
    assert!(result.error().is_none());
    assert!(result.bitmap().is_none());
}

#[tokio::test]
async fn test_half_jpeg_is_retryable_miss() {
    let server = TileServer::start().await;
    let job = job_for(server.url("/half.jpg"), 256);

    let result = direct_fetcher().fetch(&job, &FetchConfig::default()).await;
    assert!(result.is_retryable_miss(), "got {:?}", result);
}

#[tokio::test]
async fn test_half_gzip_body_is_retryable_miss() {
    let server = TileServer::start().await;
    let job = job_for(server.url("/half-gzip"), 256);

    let result = direct_fetcher().fetch(&job, &FetchConfig::default()).await;
    assert!(result.is_retryable_miss(), "got {:?}", result);
}

#[tokio::test]
async fn test_connection_closed_mid_body_is_retryable_miss() {
    let addr = start_truncating_server().await;
    let job = job_for(format!("http://{}/0/0/0.png", addr), 256);

    let result = direct_fetcher().fetch(&job, &FetchConfig::default()).await;
    assert!(
        matches!(result, FetchResult::RetryableMiss),
        "got {:?}",
        result
    );
}

#[tokio::test]
async fn test_job_can_be_resubmitted_after_miss() {
    let server = TileServer::start().await;
    let fetcher = direct_fetcher();

    let job = job_for(server.url("/half"), 256);
    assert!(fetcher
        .fetch(&job, &FetchConfig::default())
        .await
        .is_retryable_miss());

    // Same fetcher and tile, now served in full
    let retry = job_for(server.url("/tiles/0/0/0.png"), job.tile().tile_size());
    assert!(fetcher
        .fetch(&retry, &FetchConfig::default())
        .await
        .is_success());
}
