//! Externals manifest loading
//!
//! A repository declares its build-time externals in `externals.json`
//! files, one per task plus an optional repository-root manifest:
//!
//! ```json
//! {
//!     "npm": { "lodash": "4.17.0" },
//!     "nugetv2": { "Some.Pkg": { "version": "1.2.0", "repository": "https://feed/" } },
//!     "archivePackages": [ { "url": "https://example.com/tool.zip" } ]
//! }
//! ```
//!
//! Manifests are parsed into the typed [`Dependency`] union and validated
//! up front, so the fetchers only ever see well-formed declarations.

use crate::error::{LarderError, LarderResult};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// File name the discovery walk looks for
pub const MANIFEST_NAME: &str = "externals.json";

/// A single validated dependency declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dependency {
    /// URL-addressed archive, downloaded and extracted into the cache
    Archive {
        url: String,
        /// Optional hex sha256 of the archive bytes, verified before extraction
        sha256: Option<String>,
    },

    /// Named/versioned npm package, materialized via the npm CLI
    Registry { name: String, version: String },

    /// Named/versioned package on an alternate feed, fetched as an archive
    SecondaryRegistry {
        repository: String,
        name: String,
        version: String,
    },
}

impl Dependency {
    /// Short human-readable label for progress output
    pub fn describe(&self) -> String {
        match self {
            Self::Archive { url, .. } => format!("archive {}", url),
            Self::Registry { name, version } => format!("npm {}@{}", name, version),
            Self::SecondaryRegistry { name, version, .. } => {
                format!("nugetv2 {}@{}", name, version)
            }
        }
    }
}

/// A loaded, validated manifest
#[derive(Debug, Clone)]
pub struct Manifest {
    /// Where the manifest was read from
    pub path: PathBuf,
    /// Declarations in manifest order
    pub dependencies: Vec<Dependency>,
}

#[derive(Debug, Default, Deserialize)]
struct RawManifest {
    #[serde(default)]
    npm: BTreeMap<String, String>,

    #[serde(default)]
    nugetv2: BTreeMap<String, RawNugetEntry>,

    #[serde(default, rename = "archivePackages")]
    archive_packages: Vec<RawArchiveEntry>,
}

#[derive(Debug, Deserialize)]
struct RawNugetEntry {
    version: String,
    repository: String,
}

#[derive(Debug, Deserialize)]
struct RawArchiveEntry {
    url: String,
    #[serde(default)]
    sha256: Option<String>,
}

impl Manifest {
    /// Load and validate a manifest file
    pub async fn load(path: &Path) -> LarderResult<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| LarderError::io(format!("reading manifest {}", path.display()), e))?;

        Self::parse(path, &content)
    }

    /// Parse manifest content, validating every declaration
    pub fn parse(path: &Path, content: &str) -> LarderResult<Self> {
        let raw: RawManifest =
            serde_json::from_str(content).map_err(|e| LarderError::ManifestInvalid {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let invalid = |reason: String| LarderError::ManifestInvalid {
            path: path.to_path_buf(),
            reason,
        };

        let mut dependencies = Vec::new();

        for (name, version) in raw.npm {
            if name.trim().is_empty() {
                return Err(invalid("npm entry with empty package name".to_string()));
            }
            if version.trim().is_empty() {
                return Err(invalid(format!("npm package \"{}\" has empty version", name)));
            }
            dependencies.push(Dependency::Registry { name, version });
        }

        for (name, entry) in raw.nugetv2 {
            if name.trim().is_empty() {
                return Err(invalid("nugetv2 entry with empty package name".to_string()));
            }
            if entry.version.trim().is_empty() {
                return Err(invalid(format!(
                    "nugetv2 package \"{}\" has empty version",
                    name
                )));
            }
            if entry.repository.trim().is_empty() {
                return Err(invalid(format!(
                    "nugetv2 package \"{}\" has empty repository",
                    name
                )));
            }
            dependencies.push(Dependency::SecondaryRegistry {
                repository: entry.repository,
                name,
                version: entry.version,
            });
        }

        for entry in raw.archive_packages {
            if entry.url.trim().is_empty() {
                return Err(invalid("archive entry with empty url".to_string()));
            }
            dependencies.push(Dependency::Archive {
                url: entry.url,
                sha256: entry.sha256,
            });
        }

        debug!(
            "Loaded {} declaration(s) from {}",
            dependencies.len(),
            path.display()
        );

        Ok(Self {
            path: path.to_path_buf(),
            dependencies,
        })
    }
}

/// Find every `externals.json` under `root`, sorted for deterministic order
pub fn discover(root: &Path) -> LarderResult<Vec<PathBuf>> {
    let mut found = Vec::new();

    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry.map_err(|e| {
            LarderError::io(
                format!("walking {}", root.display()),
                e.into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("filesystem loop")),
            )
        })?;

        if entry.file_type().is_file() && entry.file_name() == MANIFEST_NAME {
            found.push(entry.into_path());
        }
    }

    found.sort();
    debug!("Discovered {} manifest(s) under {}", found.len(), root.display());
    Ok(found)
}
