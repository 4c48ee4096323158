//! npm CLI wrapper
//!
//! Resolves the npm executable from the search path, probes its version,
//! and runs installs with an explicit working directory.

use crate::config::schema::NpmConfig;
use crate::error::{LarderError, LarderResult};
use crate::tool::PackageTool;
use async_trait::async_trait;
use semver::Version;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// npm package-manager wrapper
pub struct NpmTool {
    timeout_secs: u64,
}

impl NpmTool {
    /// Create an npm wrapper from tool configuration
    pub fn new(config: &NpmConfig) -> Self {
        Self {
            timeout_secs: config.timeout_secs,
        }
    }

    /// Locate npm on the search path
    fn resolve(&self) -> LarderResult<PathBuf> {
        which::which("npm").map_err(|_| LarderError::ToolNotFound {
            name: "npm".to_string(),
            hint: "ensure npm 3 or greater is installed".to_string(),
        })
    }

    /// Run npm with the given args, optionally inside `workdir`
    async fn run(
        &self,
        args: &[&str],
        workdir: Option<&Path>,
    ) -> LarderResult<std::process::Output> {
        let npm = self.resolve()?;
        let cmd_display = format!("npm {}", args.join(" "));
        debug!("Executing: {}", cmd_display);

        let mut cmd = Command::new(&npm);
        cmd.args(args).stdout(Stdio::piped()).stderr(Stdio::piped());
        if let Some(dir) = workdir {
            cmd.current_dir(dir);
        }

        let spawn_err =
            |e: std::io::Error, command: String| LarderError::ToolSpawn { command, source: e };

        let output = if self.timeout_secs == 0 {
            cmd.output().await.map_err(|e| spawn_err(e, cmd_display))?
        } else {
            match tokio::time::timeout(Duration::from_secs(self.timeout_secs), cmd.output()).await
            {
                Ok(result) => result.map_err(|e| spawn_err(e, cmd_display))?,
                Err(_) => {
                    return Err(LarderError::Timeout {
                        operation: cmd_display,
                        secs: self.timeout_secs,
                    })
                }
            }
        };

        Ok(output)
    }
}

#[async_trait]
impl PackageTool for NpmTool {
    fn tool_name(&self) -> &'static str {
        "npm"
    }

    async fn version(&self) -> LarderResult<Version> {
        let output = self.run(&["--version"], None).await?;

        if !output.status.success() {
            return Err(LarderError::tool_exec(
                "npm --version",
                output.status.code().unwrap_or(-1),
                String::from_utf8_lossy(&output.stderr),
            ));
        }

        let raw = String::from_utf8_lossy(&output.stdout).trim().to_string();
        debug!("npm version: \"{}\"", raw);

        Version::parse(&raw).map_err(|e| {
            LarderError::Internal(format!("unparseable npm version \"{}\": {}", raw, e))
        })
    }

    async fn install(&self, name: &str, version: &str, workdir: &Path) -> LarderResult<()> {
        let spec = format!("{}@{}", name, version);
        let output = self.run(&["install", &spec], Some(workdir)).await?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            debug!("{}", stdout.trim());
        }

        if !output.status.success() {
            return Err(LarderError::tool_exec(
                format!("npm install {}", spec),
                output.status.code().unwrap_or(-1),
                String::from_utf8_lossy(&output.stderr),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn tool_name() {
        let tool = NpmTool::new(&NpmConfig::default());
        assert_eq!(tool.tool_name(), "npm");
    }

    #[test]
    #[serial]
    fn resolve_not_found_off_path() {
        let saved = std::env::var_os("PATH");
        std::env::set_var("PATH", "");

        let tool = NpmTool::new(&NpmConfig::default());
        let result = tool.resolve();

        match saved {
            Some(path) => std::env::set_var("PATH", path),
            None => std::env::remove_var("PATH"),
        }

        assert!(matches!(result, Err(LarderError::ToolNotFound { .. })));
    }

    #[test]
    fn timeout_from_config() {
        let tool = NpmTool::new(&NpmConfig {
            min_version: "3.0.0".to_string(),
            timeout_secs: 42,
        });
        assert_eq!(tool.timeout_secs, 42);
    }
}
