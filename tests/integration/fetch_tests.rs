//! End-to-end fetches against the in-process tile server.
//!
//! Tests verify:
//! - Decoding PNG and JPEG tiles at the requested size and channel layout
//! - Transparent gzip handling and expiration from response headers
//! - Status code and redirect handling
//! - Identity headers sent only when configured

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tile_downloader::{
    DecodeError, DownloadJob, FetchConfig, FetchError, FetchResult, SharedFetchConfig, Tile,
    UrlTemplateSource,
};

use super::test_utils::{
    direct_fetcher, job_for, noisy_image, CapturedHeaders, TileServer, CACHED_MAX_AGE,
    GZIP_EXPIRES_IN,
};

// =============================================================================
// Successful Fetches
// =============================================================================

#[tokio::test]
async fn test_fetch_png_tile() {
    let server = TileServer::start().await;
    let source = UrlTemplateSource::new(server.url("/tiles/{z}/{x}/{y}.png")).unwrap();
    let job = DownloadJob::new(Tile::new(3, 1, 2, 256).unwrap(), Arc::new(source));

    let result = direct_fetcher().fetch(&job, &FetchConfig::default()).await;

    let bitmap = result.bitmap().expect("expected success");
    assert_eq!((bitmap.width(), bitmap.height()), (256, 256));
    assert!(!bitmap.has_alpha());
    assert_eq!(bitmap.image().to_rgb8(), noisy_image(256).to_rgb8());
    assert_eq!(result.expiration(), None);
}

#[tokio::test]
async fn test_fetch_with_alpha() {
    let server = TileServer::start().await;
    let job = job_for(server.url("/tiles/0/0/0.png"), 256).with_alpha(true);

    let result = direct_fetcher().fetch(&job, &FetchConfig::default()).await;

    let bitmap = result.bitmap().expect("expected success");
    assert!(bitmap.has_alpha());
    assert_eq!(bitmap.as_bytes().len(), 256 * 256 * 4);
}

#[tokio::test]
async fn test_fetch_jpeg_tile() {
    let server = TileServer::start().await;
    let job = job_for(server.url("/tile.jpg"), 256);

    let result = direct_fetcher().fetch(&job, &FetchConfig::default()).await;
    let bitmap = result.bitmap().expect("expected success");
    assert_eq!(bitmap.width(), 256);
}

#[tokio::test]
async fn test_fetch_rescales_to_tile_size() {
    let server = TileServer::start().await;
    let job = job_for(server.url("/tiles/0/0/0.png"), 512);

    let result = direct_fetcher().fetch(&job, &FetchConfig::default()).await;
    let bitmap = result.bitmap().expect("expected success");
    assert_eq!((bitmap.width(), bitmap.height()), (512, 512));
}

#[tokio::test]
async fn test_gzip_tile_with_expires() {
    let server = TileServer::start().await;
    let job = job_for(server.url("/gzip"), 256);

    let before = SystemTime::now();
    let result = direct_fetcher().fetch(&job, &FetchConfig::default()).await;

    let bitmap = result.bitmap().expect("expected success");
    assert_eq!(bitmap.image().to_rgb8(), noisy_image(256).to_rgb8());

    // HTTP dates have second precision
    let expires = result.expiration().expect("expected an expiration");
    let lower = before + Duration::from_secs(GZIP_EXPIRES_IN) - Duration::from_secs(2);
    let upper = SystemTime::now() + Duration::from_secs(GZIP_EXPIRES_IN) + Duration::from_secs(2);
    assert!(expires > lower && expires < upper);
}

#[tokio::test]
async fn test_max_age_overrides_stale_expires() {
    let server = TileServer::start().await;
    let job = job_for(server.url("/cached"), 256);

    let before = SystemTime::now();
    let result = direct_fetcher().fetch(&job, &FetchConfig::default()).await;

    let expires = result.expiration().expect("expected an expiration");
    assert!(expires >= before + Duration::from_secs(CACHED_MAX_AGE));
    assert!(expires <= SystemTime::now() + Duration::from_secs(CACHED_MAX_AGE));
}

// =============================================================================
// Protocol Failures
// =============================================================================

#[tokio::test]
async fn test_error_statuses_are_failures() {
    let server = TileServer::start().await;
    let fetcher = direct_fetcher();

    for code in [404u16, 500, 503] {
        let job = job_for(server.url(&format!("/status/{}", code)), 256);
        let result = fetcher.fetch(&job, &FetchConfig::default()).await;

        match result {
            FetchResult::Failure(FetchError::Status { code: got, ref url }) => {
                assert_eq!(got, code);
                assert!(url.ends_with(&format!("/status/{}", code)));
            }
            other => panic!("status {}: unexpected result {:?}", code, other),
        }
    }
}

#[tokio::test]
async fn test_redirect_not_followed_by_default() {
    let server = TileServer::start().await;
    let job = job_for(server.url("/moved"), 256);

    let result = direct_fetcher().fetch(&job, &FetchConfig::default()).await;
    assert_eq!(result.error().and_then(FetchError::status_code), Some(301));
}

#[tokio::test]
async fn test_redirect_followed_when_enabled() {
    let server = TileServer::start().await;
    let job = job_for(server.url("/moved"), 256);
    let config = FetchConfig::default().with_follow_redirects(true);

    let result = direct_fetcher().fetch(&job, &config).await;
    assert!(result.is_success(), "got {:?}", result);
}

#[tokio::test]
async fn test_redirect_loop_is_connection_failure() {
    let server = TileServer::start().await;
    let job = job_for(server.url("/loop"), 256);
    let config = FetchConfig::default().with_follow_redirects(true);

    let result = direct_fetcher().fetch(&job, &config).await;
    assert!(
        matches!(result.error(), Some(FetchError::Connection { .. })),
        "got {:?}",
        result
    );
}

#[tokio::test]
async fn test_html_body_is_format_failure() {
    let server = TileServer::start().await;
    let job = job_for(server.url("/html"), 256);

    let result = direct_fetcher().fetch(&job, &FetchConfig::default()).await;
    assert!(matches!(
        result.error(),
        Some(FetchError::Decode {
            source: DecodeError::Format(_),
            ..
        })
    ));
}

#[tokio::test]
async fn test_connection_refused() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let job = job_for(format!("http://127.0.0.1:{}/{{z}}/{{x}}/{{y}}.png", port), 256);
    let result = direct_fetcher().fetch(&job, &FetchConfig::default()).await;
    assert!(matches!(result.error(), Some(FetchError::Connection { .. })));
}

#[tokio::test]
async fn test_unsupported_scheme() {
    let job = job_for("ftp://tiles.test/{z}/{x}/{y}.png", 256);
    let result = direct_fetcher().fetch(&job, &FetchConfig::default()).await;

    let err = result.error().expect("expected failure");
    assert!(matches!(err, FetchError::UnsupportedScheme { .. }));
    assert!(err.is_configuration());
}

// =============================================================================
// Identity Headers
// =============================================================================

#[tokio::test]
async fn test_identity_headers_sent_when_configured() {
    let server = TileServer::start().await;
    let job = job_for(server.url("/echo"), 256);
    let config = FetchConfig::default()
        .with_user_agent("tile-test/1.0")
        .with_referer("https://map.test/");

    let result = direct_fetcher().fetch(&job, &config).await;
    assert!(result.is_success());

    assert_eq!(
        server.captured(),
        vec![CapturedHeaders {
            user_agent: Some("tile-test/1.0".to_string()),
            referer: Some("https://map.test/".to_string()),
        }]
    );
}

#[tokio::test]
async fn test_identity_headers_omitted_by_default() {
    let server = TileServer::start().await;
    let job = job_for(server.url("/echo"), 256);

    let result = direct_fetcher().fetch(&job, &FetchConfig::default()).await;
    assert!(result.is_success());

    assert_eq!(server.captured(), vec![CapturedHeaders::default()]);
}

#[tokio::test]
async fn test_shared_config_update_applies_to_next_fetch() {
    let server = TileServer::start().await;
    let job = job_for(server.url("/echo"), 256);
    let shared = SharedFetchConfig::default();
    let fetcher = direct_fetcher();

    fetcher.fetch_shared(&job, &shared).await;
    shared.set(FetchConfig::default().with_user_agent("updated/2.0"));
    fetcher.fetch_shared(&job, &shared).await;

    let captured = server.captured();
    assert_eq!(captured.len(), 2);
    assert_eq!(captured[0].user_agent, None);
    assert_eq!(captured[1].user_agent.as_deref(), Some("updated/2.0"));
}
