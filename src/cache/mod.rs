//! Dependency cache
//!
//! Materializes externally-declared build dependencies on disk, once, under
//! a shared cache root. Every acquisition follows the same pattern:
//!
//! 1. Derive a deterministic, path-safe key from the declaration.
//! 2. If the cache entry directory already exists, do nothing.
//! 3. Stage all work under `partial/` (deleting any stale leftover first).
//! 4. Promote the finished result with a single atomic rename.
//!
//! A cache entry is therefore either absent or complete; observers never
//! see a half-written one. Failures leave the partial directory behind for
//! inspection and the next run starts it over.
//!
//! The cache root is shared filesystem state with no cross-process locking;
//! concurrent invocations against the same root are not supported.

pub mod archive;
pub mod layout;
pub mod manager;
pub mod registry;
pub mod secondary;

pub use archive::ArchiveFetcher;
pub use layout::{scrub_url, CacheEntryInfo, CacheLayout, Category};
pub use manager::{CacheManager, PopulateSummary};
pub use registry::RegistryFetcher;
pub use secondary::SecondaryRegistryFetcher;

/// What a fetch actually did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The artifact was downloaded/installed and a new entry created
    Fetched,
    /// The entry already existed; no network or tool I/O happened
    Cached,
}
