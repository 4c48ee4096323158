//! Populate command - fetch every declared external into the cache

use crate::cache::{CacheLayout, CacheManager};
use crate::cli::args::PopulateArgs;
use crate::cli::commands::resolve_cache_root;
use crate::config::Config;
use crate::error::{LarderError, LarderResult};
use crate::manifest::{self, Manifest};
use crate::net::HttpDownloader;
use crate::tool::NpmTool;
use crate::ui::{self, FetchProgress, UiContext};
use semver::Version;
use tracing::debug;

/// Execute the populate command
pub async fn execute(args: PopulateArgs, config: &Config) -> LarderResult<()> {
    let ctx = UiContext::detect();
    ui::intro(&ctx, "Larder Populate");

    let root = resolve_cache_root(args.root.as_ref(), config);
    debug!("Cache root: {}", root.display());
    let layout = CacheLayout::new(root);

    let manifest_paths = if args.manifest.is_empty() {
        let base = match args.path {
            Some(p) => p,
            None => std::env::current_dir()
                .map_err(|e| LarderError::io("getting current directory", e))?,
        };
        let found = manifest::discover(&base)?;
        if found.is_empty() {
            ui::outro_warn(
                &ctx,
                &format!("No externals.json manifests found under {}", base.display()),
            );
            return Ok(());
        }
        found
    } else {
        args.manifest
    };

    let mut dependencies = Vec::new();
    for path in &manifest_paths {
        ui::step_info(&ctx, &format!("Loading {}", path.display()));
        let manifest = Manifest::load(path).await?;
        dependencies.extend(manifest.dependencies);
    }

    if dependencies.is_empty() {
        ui::outro_success(&ctx, "Nothing to cache");
        return Ok(());
    }

    ui::remark(
        &ctx,
        &format!(
            "{} declaration(s) from {} manifest(s)",
            dependencies.len(),
            manifest_paths.len()
        ),
    );

    let min_version = Version::parse(&config.npm.min_version).map_err(|e| {
        LarderError::User(format!(
            "Invalid npm.min_version \"{}\": {}",
            config.npm.min_version, e
        ))
    })?;

    let downloader = HttpDownloader::new(&config.network);
    let tool = NpmTool::new(&config.npm);
    let manager = CacheManager::new(&layout, &downloader, &tool, min_version);

    let progress = FetchProgress::new(&ctx, dependencies.len());
    let result = manager
        .populate(&dependencies, |index, dependency, outcome| {
            progress.on_done(index, &dependency.describe(), outcome);
        })
        .await;
    progress.finish();

    match result {
        Ok(summary) => {
            ui::outro_success(
                &ctx,
                &format!(
                    "Cached {} external(s): {} fetched, {} already present",
                    summary.total(),
                    summary.fetched,
                    summary.cached
                ),
            );
            Ok(())
        }
        Err(e) => {
            if e.is_retryable() {
                ui::remark(&ctx, "Re-running may succeed; completed entries stay cached");
            }
            Err(e)
        }
    }
}
