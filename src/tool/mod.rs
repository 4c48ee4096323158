//! External package-manager tooling
//!
//! The registry fetcher drives the package manager through the
//! [`PackageTool`] trait so tests can substitute a fake; [`NpmTool`] is the
//! real npm CLI wrapper.

pub mod npm;

pub use npm::NpmTool;

use crate::error::LarderResult;
use async_trait::async_trait;
use semver::Version;
use std::path::Path;

/// Abstract package-manager interface
#[async_trait]
pub trait PackageTool: Send + Sync {
    /// Tool name for display and error messages
    fn tool_name(&self) -> &'static str;

    /// Query the installed tool's version
    ///
    /// Fails with `ToolNotFound` when the executable is not on the search
    /// path.
    async fn version(&self) -> LarderResult<Version>;

    /// Install `name@version` into `workdir`
    ///
    /// The working directory is passed explicitly to the spawned process;
    /// nothing mutates the ambient current directory. A nonzero exit status
    /// is an error even when the process spawned cleanly.
    async fn install(&self, name: &str, version: &str, workdir: &Path) -> LarderResult<()>;
}
