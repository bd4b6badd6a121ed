//! Local `file://` tiles.

use std::io::Write;
use std::sync::Arc;

use tile_downloader::{DownloadJob, FetchConfig, FetchError, Tile, UrlTemplateSource};
use url::Url;

use super::test_utils::{direct_fetcher, gzip, job_for, noisy_image, tile_png};

#[tokio::test]
async fn test_file_tile_is_decoded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("2").join("1");
    std::fs::create_dir_all(&path).unwrap();
    std::fs::write(path.join("3.png"), tile_png(256)).unwrap();

    let base = Url::from_directory_path(dir.path()).unwrap();
    let source = UrlTemplateSource::new(format!("{}{{z}}/{{x}}/{{y}}.png", base)).unwrap();
    let job = DownloadJob::new(Tile::new(1, 3, 2, 256).unwrap(), Arc::new(source));

    let result = direct_fetcher().fetch(&job, &FetchConfig::default()).await;

    let bitmap = result.bitmap().expect("expected success");
    assert_eq!(bitmap.image().to_rgb8(), noisy_image(256).to_rgb8());
    // Files carry no cache headers
    assert_eq!(result.expiration(), None);
}

#[tokio::test]
async fn test_file_is_never_decompressed() {
    // Without a Content-Encoding, gzip bytes are handed to the decoder as-is
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&gzip(&tile_png(64))).unwrap();
    let url = Url::from_file_path(file.path()).unwrap();

    let result = direct_fetcher()
        .fetch(&job_for(url.to_string(), 64), &FetchConfig::default())
        .await;
    assert!(matches!(result.error(), Some(FetchError::Decode { .. })), "got {:?}", result);
}

#[tokio::test]
async fn test_missing_file_is_failure() {
    let dir = tempfile::tempdir().unwrap();
    let url = Url::from_file_path(dir.path().join("missing.png")).unwrap();

    let result = direct_fetcher()
        .fetch(&job_for(url.to_string(), 256), &FetchConfig::default())
        .await;
    assert!(matches!(result.error(), Some(FetchError::Io { .. })), "got {:?}", result);
}
