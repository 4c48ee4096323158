//! Cache tree layout and key derivation
//!
//! ```text
//! <root>/archive/<scrubbed-url>/     extracted archive entries
//! <root>/npm/<name>/<version>/       installed npm packages
//! <root>/partial/<category>/<key>/   staging, never a finished dependency
//! ```
//!
//! A directory's existence under a category path is the only "already
//! cached" signal; no index is kept.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{LarderError, LarderResult};

/// Staging namespace under the cache root
pub const PARTIAL_DIR: &str = "partial";

/// Cache entry categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// URL-addressed archives
    Archive,
    /// npm registry packages
    Npm,
}

impl Category {
    /// Directory name under the cache root
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Archive => "archive",
            Self::Npm => "npm",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dir_name())
    }
}

/// Derive a filesystem-safe archive cache key from a URL
///
/// Every `/`, `\`, `:` and `?` becomes `_`. Distinct URLs that differ only
/// in those characters collide; callers accept that.
pub fn scrub_url(url: &str) -> String {
    url.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '?' => '_',
            other => other,
        })
        .collect()
}

/// Paths within one cache root
#[derive(Debug, Clone)]
pub struct CacheLayout {
    root: PathBuf,
}

impl CacheLayout {
    /// Create a layout rooted at `root`
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// The cache root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The staging namespace root
    pub fn partial_root(&self) -> PathBuf {
        self.root.join(PARTIAL_DIR)
    }

    /// Final entry path for an archive key
    pub fn archive_entry(&self, key: &str) -> PathBuf {
        self.root.join(Category::Archive.dir_name()).join(key)
    }

    /// Staging path for an archive key
    pub fn archive_partial(&self, key: &str) -> PathBuf {
        self.partial_root()
            .join(Category::Archive.dir_name())
            .join(key)
    }

    /// Final entry path for an npm package
    pub fn package_entry(&self, name: &str, version: &str) -> PathBuf {
        self.root
            .join(Category::Npm.dir_name())
            .join(name)
            .join(version)
    }

    /// Staging path for an npm package
    pub fn package_partial(&self, name: &str, version: &str) -> PathBuf {
        self.npm_partial_root().join(name).join(version)
    }

    /// Staging root for the npm category
    ///
    /// The inert `package.json` lives here, above every staged package, so
    /// it is never moved into a finished entry.
    pub fn npm_partial_root(&self) -> PathBuf {
        self.partial_root().join(Category::Npm.dir_name())
    }

    /// Enumerate finished cache entries across all categories
    pub fn list_entries(&self) -> LarderResult<Vec<CacheEntryInfo>> {
        let mut entries = Vec::new();

        let archive_root = self.root.join(Category::Archive.dir_name());
        for dir in read_dirs(&archive_root)? {
            entries.push(CacheEntryInfo::from_dir(Category::Archive, key_of(&dir), &dir));
        }

        // npm entries are <name>/<version>, with scoped names one level deeper
        let npm_root = self.root.join(Category::Npm.dir_name());
        for name_dir in read_dirs(&npm_root)? {
            let name = key_of(&name_dir);
            if name.starts_with('@') {
                for pkg_dir in read_dirs(&name_dir)? {
                    let scoped = format!("{}/{}", name, key_of(&pkg_dir));
                    push_versions(&mut entries, &scoped, &pkg_dir)?;
                }
            } else {
                push_versions(&mut entries, &name, &name_dir)?;
            }
        }

        entries.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(entries)
    }
}

/// One finished cache entry, for listings
#[derive(Debug, Clone, Serialize)]
pub struct CacheEntryInfo {
    /// Entry category
    pub category: Category,
    /// Entry key (scrubbed URL, or `name/version`)
    pub key: String,
    /// Absolute entry path
    #[serde(skip)]
    pub path: PathBuf,
    /// Filesystem modification time, when available
    pub modified: Option<DateTime<Utc>>,
}

impl CacheEntryInfo {
    fn from_dir(category: Category, key: String, path: &Path) -> Self {
        let modified = fs::metadata(path)
            .and_then(|m| m.modified())
            .ok()
            .map(DateTime::<Utc>::from);

        Self {
            category,
            key,
            path: path.to_path_buf(),
            modified,
        }
    }
}

fn key_of(path: &Path) -> String {
    path.file_name().unwrap_or_default().to_string_lossy().into_owned()
}

fn push_versions(
    entries: &mut Vec<CacheEntryInfo>,
    name: &str,
    name_dir: &Path,
) -> LarderResult<()> {
    for version_dir in read_dirs(name_dir)? {
        let key = format!("{}/{}", name, key_of(&version_dir));
        entries.push(CacheEntryInfo::from_dir(Category::Npm, key, &version_dir));
    }
    Ok(())
}

/// Subdirectories of `path`, empty when the directory does not exist
fn read_dirs(path: &Path) -> LarderResult<Vec<PathBuf>> {
    if !path.is_dir() {
        return Ok(Vec::new());
    }

    let mut dirs = Vec::new();
    let iter = fs::read_dir(path)
        .map_err(|e| LarderError::io(format!("reading {}", path.display()), e))?;
    for entry in iter {
        let entry = entry.map_err(|e| LarderError::io(format!("reading {}", path.display()), e))?;
        if entry.path().is_dir() {
            dirs.push(entry.path());
        }
    }

    dirs.sort();
    Ok(dirs)
}
