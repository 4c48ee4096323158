//! Archive acquisition
//!
//! Downloads a URL-addressed zip archive and extracts it into the cache.
//! Safe to call repeatedly for the same URL: an existing entry short-circuits
//! before any network I/O.

use crate::cache::layout::{scrub_url, CacheLayout};
use crate::cache::FetchOutcome;
use crate::error::{LarderError, LarderResult};
use crate::net::Downloader;
use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

/// Name of the downloaded archive inside the partial directory
const ARCHIVE_FILE: &str = "file.zip";

/// Extraction target inside the partial directory, renamed into the entry
/// path on success
const EXTRACT_DIR: &str = "dir";

/// Fetches and caches URL-addressed archives
pub struct ArchiveFetcher<'a> {
    layout: &'a CacheLayout,
    downloader: &'a dyn Downloader,
}

impl<'a> ArchiveFetcher<'a> {
    /// Create a fetcher over the given layout and transport
    pub fn new(layout: &'a CacheLayout, downloader: &'a dyn Downloader) -> Self {
        Self { layout, downloader }
    }

    /// Download and cache the archive at `url`
    ///
    /// On transport or checksum failure the partial directory is left in
    /// place for inspection; extraction failures are fatal. Success means
    /// the cache entry directory exists with the archive's extracted
    /// contents.
    pub async fn fetch(&self, url: &str, sha256: Option<&str>) -> LarderResult<FetchOutcome> {
        if url.trim().is_empty() {
            return Err(LarderError::InvalidArgument { param: "url" });
        }

        let key = scrub_url(url);
        let target = self.layout.archive_entry(&key);
        if target.is_dir() {
            debug!("Archive already cached, skipping: {}", url);
            return Ok(FetchOutcome::Cached);
        }

        info!("Downloading archive file {}", url);

        // Delete any previous partial attempt.
        let partial = self.layout.archive_partial(&key);
        if partial.is_dir() {
            fs::remove_dir_all(&partial)
                .await
                .map_err(|e| LarderError::io(format!("removing stale {}", partial.display()), e))?;
        }
        fs::create_dir_all(&partial)
            .await
            .map_err(|e| LarderError::io(format!("creating {}", partial.display()), e))?;

        let body = self.downloader.get(url).await?;

        if let Some(expected) = sha256 {
            verify_sha256(url, expected, &body)?;
        }

        let file = partial.join(ARCHIVE_FILE);
        fs::write(&file, &body)
            .await
            .map_err(|e| LarderError::io(format!("writing {}", file.display()), e))?;

        debug!("Extracting archive");
        let extracted = partial.join(EXTRACT_DIR);
        extract_zip(&file, &extracted).await?;

        // Promote: one rename, so the entry is never observed half-written.
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| LarderError::io(format!("creating {}", parent.display()), e))?;
        }
        fs::rename(&extracted, &target)
            .await
            .map_err(|e| LarderError::io(format!("promoting {}", target.display()), e))?;

        fs::remove_dir_all(&partial)
            .await
            .map_err(|e| LarderError::io(format!("removing {}", partial.display()), e))?;

        Ok(FetchOutcome::Fetched)
    }
}

fn verify_sha256(url: &str, expected: &str, body: &[u8]) -> LarderResult<()> {
    let actual = hex::encode(Sha256::digest(body));
    if actual.eq_ignore_ascii_case(expected.trim()) {
        Ok(())
    } else {
        Err(LarderError::ChecksumMismatch {
            url: url.to_string(),
            expected: expected.trim().to_lowercase(),
            actual,
        })
    }
}

async fn extract_zip(archive: &Path, dest: &Path) -> LarderResult<()> {
    let archive = archive.to_path_buf();
    let dest = dest.to_path_buf();

    tokio::task::spawn_blocking(move || -> LarderResult<()> {
        let file = std::fs::File::open(&archive)
            .map_err(|e| LarderError::io(format!("opening {}", archive.display()), e))?;

        let mut zip = zip::ZipArchive::new(file).map_err(|e| LarderError::ExtractionFailure {
            archive: archive.clone(),
            reason: e.to_string(),
        })?;

        zip.extract(&dest).map_err(|e| LarderError::ExtractionFailure {
            archive: archive.clone(),
            reason: e.to_string(),
        })
    })
    .await
    .map_err(|e| LarderError::Internal(format!("extraction task failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::testing::{make_zip, FakeDownloader};
    use sha2::Digest;
    use tempfile::TempDir;

    const URL: &str = "https://example.com/tool.zip";
    const KEY: &str = "https___example.com_tool.zip";

    fn layout(temp: &TempDir) -> CacheLayout {
        CacheLayout::new(temp.path().to_path_buf())
    }

    #[tokio::test]
    async fn fetch_extracts_into_entry() {
        let temp = TempDir::new().unwrap();
        let layout = layout(&temp);
        let zip = make_zip(&[("bin/tool.sh", "#!/bin/sh\n"), ("readme.txt", "hi")]);
        let downloader = FakeDownloader::returning(zip);

        let outcome = ArchiveFetcher::new(&layout, &downloader)
            .fetch(URL, None)
            .await
            .unwrap();

        assert_eq!(outcome, FetchOutcome::Fetched);
        let entry = layout.archive_entry(KEY);
        assert!(entry.join("bin/tool.sh").is_file());
        assert!(entry.join("readme.txt").is_file());
        // staging is cleaned up after promotion
        assert!(!layout.archive_partial(KEY).exists());
    }

    #[tokio::test]
    async fn second_fetch_is_cached_and_silent() {
        let temp = TempDir::new().unwrap();
        let layout = layout(&temp);
        let downloader = FakeDownloader::returning(make_zip(&[("a", "1")]));
        let fetcher = ArchiveFetcher::new(&layout, &downloader);

        assert_eq!(fetcher.fetch(URL, None).await.unwrap(), FetchOutcome::Fetched);
        assert_eq!(fetcher.fetch(URL, None).await.unwrap(), FetchOutcome::Cached);
        assert_eq!(downloader.request_count(), 1);
    }

    #[tokio::test]
    async fn empty_url_rejected() {
        let temp = TempDir::new().unwrap();
        let layout = layout(&temp);
        let downloader = FakeDownloader::returning(Vec::new());

        let result = ArchiveFetcher::new(&layout, &downloader).fetch("", None).await;

        assert!(matches!(
            result,
            Err(LarderError::InvalidArgument { param: "url" })
        ));
        assert_eq!(downloader.request_count(), 0);
    }

    #[tokio::test]
    async fn stale_partial_is_replaced() {
        let temp = TempDir::new().unwrap();
        let layout = layout(&temp);
        let partial = layout.archive_partial(KEY);
        std::fs::create_dir_all(&partial).unwrap();
        std::fs::write(partial.join("file.zip"), b"garbage from a dead run").unwrap();

        let downloader = FakeDownloader::returning(make_zip(&[("fresh.txt", "new")]));
        ArchiveFetcher::new(&layout, &downloader)
            .fetch(URL, None)
            .await
            .unwrap();

        let entry = layout.archive_entry(KEY);
        assert!(entry.join("fresh.txt").is_file());
        assert!(!partial.exists());
    }

    #[tokio::test]
    async fn network_failure_leaves_partial_no_entry() {
        let temp = TempDir::new().unwrap();
        let layout = layout(&temp);
        let downloader = FakeDownloader::failing("connection reset");

        let result = ArchiveFetcher::new(&layout, &downloader).fetch(URL, None).await;

        assert!(matches!(result, Err(LarderError::NetworkFailure { .. })));
        assert!(layout.archive_partial(KEY).is_dir());
        assert!(!layout.archive_entry(KEY).exists());
    }

    #[tokio::test]
    async fn corrupt_archive_is_extraction_failure() {
        let temp = TempDir::new().unwrap();
        let layout = layout(&temp);
        let downloader = FakeDownloader::returning(b"definitely not a zip".to_vec());

        let result = ArchiveFetcher::new(&layout, &downloader).fetch(URL, None).await;

        assert!(matches!(result, Err(LarderError::ExtractionFailure { .. })));
        assert!(!layout.archive_entry(KEY).exists());
    }

    #[tokio::test]
    async fn checksum_match_accepts() {
        let temp = TempDir::new().unwrap();
        let layout = layout(&temp);
        let zip = make_zip(&[("a", "1")]);
        let digest = hex::encode(sha2::Sha256::digest(&zip));
        let downloader = FakeDownloader::returning(zip);

        let outcome = ArchiveFetcher::new(&layout, &downloader)
            .fetch(URL, Some(&digest.to_uppercase()))
            .await
            .unwrap();

        assert_eq!(outcome, FetchOutcome::Fetched);
    }

    #[tokio::test]
    async fn checksum_mismatch_aborts_before_extraction() {
        let temp = TempDir::new().unwrap();
        let layout = layout(&temp);
        let downloader = FakeDownloader::returning(make_zip(&[("a", "1")]));

        let result = ArchiveFetcher::new(&layout, &downloader)
            .fetch(URL, Some("deadbeef"))
            .await;

        assert!(matches!(result, Err(LarderError::ChecksumMismatch { .. })));
        assert!(!layout.archive_entry(KEY).exists());
        // partial kept for inspection, but nothing extracted
        assert!(layout.archive_partial(KEY).is_dir());
        assert!(!layout.archive_partial(KEY).join("dir").exists());
    }
}
