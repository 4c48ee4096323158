//! CLI command implementations

pub mod clean;
pub mod config;
pub mod list;
pub mod populate;
pub mod status;

pub use clean::execute as clean;
pub use config::execute as config;
pub use list::execute as list;
pub use populate::execute as populate;
pub use status::execute as status;

use crate::config::{Config, ConfigManager};
use std::path::PathBuf;

/// Resolve the effective cache root: CLI flag, then config, then the
/// platform default.
pub(crate) fn resolve_cache_root(flag: Option<&PathBuf>, config: &Config) -> PathBuf {
    flag.cloned()
        .or_else(|| config.cache.root.clone())
        .unwrap_or_else(ConfigManager::default_cache_root)
}
