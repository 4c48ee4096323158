//! Secondary-feed package acquisition
//!
//! NuGet v2 style feeds expose packages as plain archives at
//! `<repository>/package/<name>/<version>`, so caching one is just an
//! archive fetch with a derived URL.

use crate::cache::archive::ArchiveFetcher;
use crate::cache::FetchOutcome;
use crate::error::{LarderError, LarderResult};

/// Fetches packages from an alternate feed by delegating to the archive
/// fetcher
pub struct SecondaryRegistryFetcher<'a> {
    archive: &'a ArchiveFetcher<'a>,
}

impl<'a> SecondaryRegistryFetcher<'a> {
    /// Wrap an archive fetcher
    pub fn new(archive: &'a ArchiveFetcher<'a>) -> Self {
        Self { archive }
    }

    /// Cache `name@version` from `repository`
    ///
    /// Inherits the archive fetcher's idempotence and failure semantics.
    pub async fn fetch(
        &self,
        repository: &str,
        name: &str,
        version: &str,
    ) -> LarderResult<FetchOutcome> {
        if repository.trim().is_empty() {
            return Err(LarderError::InvalidArgument { param: "repository" });
        }
        if name.trim().is_empty() {
            return Err(LarderError::InvalidArgument { param: "name" });
        }
        if version.trim().is_empty() {
            return Err(LarderError::InvalidArgument { param: "version" });
        }

        let url = package_url(repository, name, version);
        self.archive.fetch(&url, None).await
    }
}

/// Derive the archive URL for a feed package
pub fn package_url(repository: &str, name: &str, version: &str) -> String {
    let repo = repository.strip_suffix('/').unwrap_or(repository);
    format!("{}/package/{}/{}", repo, name, version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::layout::CacheLayout;
    use crate::cache::testing::{make_zip, FakeDownloader};
    use tempfile::TempDir;

    #[test]
    fn url_trims_trailing_separator() {
        assert_eq!(
            package_url("https://feed.example/", "pkgA", "2.0.0"),
            "https://feed.example/package/pkgA/2.0.0"
        );
        assert_eq!(
            package_url("https://feed.example", "pkgA", "2.0.0"),
            "https://feed.example/package/pkgA/2.0.0"
        );
    }

    #[tokio::test]
    async fn delegates_to_archive_fetcher() {
        let temp = TempDir::new().unwrap();
        let layout = CacheLayout::new(temp.path().to_path_buf());
        let downloader = FakeDownloader::returning(make_zip(&[("pkg.nuspec", "<xml/>")]));
        let archive = ArchiveFetcher::new(&layout, &downloader);

        let outcome = SecondaryRegistryFetcher::new(&archive)
            .fetch("https://feed.example/", "pkgA", "2.0.0")
            .await
            .unwrap();

        assert_eq!(outcome, FetchOutcome::Fetched);
        assert_eq!(
            downloader.requests.lock().unwrap().as_slice(),
            ["https://feed.example/package/pkgA/2.0.0"]
        );
        // entry lands under the archive category, keyed by the derived URL
        let entry = layout.archive_entry("https___feed.example_package_pkgA_2.0.0");
        assert!(entry.join("pkg.nuspec").is_file());
    }

    #[tokio::test]
    async fn empty_repository_rejected() {
        let temp = TempDir::new().unwrap();
        let layout = CacheLayout::new(temp.path().to_path_buf());
        let downloader = FakeDownloader::returning(Vec::new());
        let archive = ArchiveFetcher::new(&layout, &downloader);

        let result = SecondaryRegistryFetcher::new(&archive)
            .fetch("", "pkgA", "2.0.0")
            .await;

        assert!(matches!(
            result,
            Err(LarderError::InvalidArgument {
                param: "repository"
            })
        ));
        assert_eq!(downloader.request_count(), 0);
    }
}
