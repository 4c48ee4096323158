//! Cache population
//!
//! Dispatches manifest declarations to the matching fetcher, one at a time
//! in manifest order. The first failure aborts the run; completed entries
//! stay cached, so a re-run resumes where it left off.

use crate::cache::archive::ArchiveFetcher;
use crate::cache::layout::CacheLayout;
use crate::cache::registry::RegistryFetcher;
use crate::cache::secondary::SecondaryRegistryFetcher;
use crate::cache::FetchOutcome;
use crate::error::LarderResult;
use crate::manifest::Dependency;
use crate::net::Downloader;
use crate::tool::PackageTool;
use semver::Version;

/// Counts for a completed populate run
#[derive(Debug, Default, Clone, Copy)]
pub struct PopulateSummary {
    /// Entries newly materialized
    pub fetched: usize,
    /// Declarations that were already cached
    pub cached: usize,
}

impl PopulateSummary {
    /// Total declarations processed
    pub fn total(&self) -> usize {
        self.fetched + self.cached
    }
}

/// Routes dependency declarations to their acquisition strategy
pub struct CacheManager<'a> {
    layout: &'a CacheLayout,
    downloader: &'a dyn Downloader,
    tool: &'a dyn PackageTool,
    min_tool_version: Version,
}

impl<'a> CacheManager<'a> {
    /// Create a manager over the given layout, transport and tool
    pub fn new(
        layout: &'a CacheLayout,
        downloader: &'a dyn Downloader,
        tool: &'a dyn PackageTool,
        min_tool_version: Version,
    ) -> Self {
        Self {
            layout,
            downloader,
            tool,
            min_tool_version,
        }
    }

    /// Fetch a single declaration
    pub async fn fetch(&self, dependency: &Dependency) -> LarderResult<FetchOutcome> {
        let archive = ArchiveFetcher::new(self.layout, self.downloader);

        match dependency {
            Dependency::Archive { url, sha256 } => archive.fetch(url, sha256.as_deref()).await,
            Dependency::Registry { name, version } => {
                RegistryFetcher::new(self.layout, self.tool, self.min_tool_version.clone())
                    .fetch(name, version)
                    .await
            }
            Dependency::SecondaryRegistry {
                repository,
                name,
                version,
            } => {
                SecondaryRegistryFetcher::new(&archive)
                    .fetch(repository, name, version)
                    .await
            }
        }
    }

    /// Fetch every declaration sequentially, in order
    ///
    /// `observe` is called after each declaration completes, with its index
    /// and outcome. The first error propagates and ends the run.
    pub async fn populate<F>(
        &self,
        dependencies: &[Dependency],
        mut observe: F,
    ) -> LarderResult<PopulateSummary>
    where
        F: FnMut(usize, &Dependency, FetchOutcome),
    {
        let mut summary = PopulateSummary::default();

        for (index, dependency) in dependencies.iter().enumerate() {
            let outcome = self.fetch(dependency).await?;
            match outcome {
                FetchOutcome::Fetched => summary.fetched += 1,
                FetchOutcome::Cached => summary.cached += 1,
            }
            observe(index, dependency, outcome);
        }

        Ok(summary)
    }
}
