//! Larder - Build-Time External Dependency Cache
//!
//! Fetches, verifies, and caches the external packages and archives a
//! multi-task plugin repository declares in `externals.json` manifests,
//! so later build steps can consume them as pre-fetched directories.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod manifest;
pub mod net;
pub mod tool;
pub mod ui;

pub use error::{LarderError, LarderResult};
