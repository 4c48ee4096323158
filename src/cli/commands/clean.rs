//! Clean command - remove staged or cached artifacts

use crate::cache::CacheLayout;
use crate::cli::args::CleanArgs;
use crate::cli::commands::resolve_cache_root;
use crate::config::Config;
use crate::error::{LarderError, LarderResult};
use crate::ui::{self, UiContext};
use console::style;
use tracing::debug;

/// Execute the clean command
pub async fn execute(args: CleanArgs, config: &Config) -> LarderResult<()> {
    let ctx = UiContext::detect().with_auto_yes(args.yes);
    let layout = CacheLayout::new(resolve_cache_root(args.root.as_ref(), config));

    let (label, target) = if args.partial {
        ("staging leftovers", layout.partial_root())
    } else {
        ("entire cache", layout.root().to_path_buf())
    };

    if !target.is_dir() {
        println!("Nothing to clean.");
        return Ok(());
    }

    println!("This will remove the {}:", label);
    println!("  {} {}", style("•").red(), target.display());
    println!();

    if !ui::confirm(&ctx, "Are you sure?", false).await? {
        println!("Aborted.");
        return Ok(());
    }

    debug!("Removing {}", target.display());
    tokio::fs::remove_dir_all(&target)
        .await
        .map_err(|e| LarderError::io(format!("removing {}", target.display()), e))?;

    ui::step_ok(&ctx, &format!("Removed {}", target.display()));
    Ok(())
}
