//! Status command - check tool availability and cache health

use crate::cache::CacheLayout;
use crate::cli::commands::resolve_cache_root;
use crate::config::Config;
use crate::error::{LarderError, LarderResult};
use crate::tool::{NpmTool, PackageTool};
use crate::ui::{self, TaskSpinner, UiContext};
use semver::Version;

/// Execute the status command
pub async fn execute(config: &Config) -> LarderResult<()> {
    let ctx = UiContext::detect();
    ui::intro(&ctx, "Larder Status");

    let root = resolve_cache_root(None, config);
    let layout = CacheLayout::new(root.clone());

    ui::key_value(&ctx, "Cache root", &root.display().to_string());

    let entries = layout.list_entries()?;
    ui::key_value(&ctx, "Cached entries", &entries.len().to_string());

    let stale_staging = layout.partial_root().is_dir();
    if stale_staging {
        ui::step_warn_hint(
            &ctx,
            "Leftover staging directory found",
            "a previous run failed; run: larder clean --partial",
        );
    }

    let min = Version::parse(&config.npm.min_version).map_err(|e| {
        LarderError::User(format!(
            "Invalid npm.min_version \"{}\": {}",
            config.npm.min_version, e
        ))
    })?;

    let mut spinner = TaskSpinner::new(&ctx);
    spinner.start("Probing npm...");

    let tool = NpmTool::new(&config.npm);
    match tool.version().await {
        Ok(found) => {
            spinner.stop(&format!("npm {}", found));
            let ok = found >= min;
            ui::key_value_status(
                &ctx,
                "npm version",
                &format!("{} (minimum {})", found, min),
                ok,
            );
            if ok {
                ui::outro_success(&ctx, "Ready to populate");
            } else {
                ui::outro_warn(&ctx, "npm is too old; registry packages will fail to fetch");
            }
        }
        Err(e) => {
            spinner.stop_error("npm not available");
            ui::key_value_status(&ctx, "npm version", &e.to_string(), false);
            ui::outro_warn(
                &ctx,
                "npm is unavailable; only archive externals can be fetched",
            );
        }
    }

    Ok(())
}
