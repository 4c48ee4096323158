//! Archive download transport
//!
//! Downloads are plain blocking GETs (`ureq`), run on the blocking pool so
//! the fetchers can stay async. The [`Downloader`] trait is the seam the
//! cache tests use to substitute canned responses.

use crate::config::schema::NetworkConfig;
use crate::error::{LarderError, LarderResult};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Fetches the raw bytes behind a URL
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Perform a GET and return the full response body
    async fn get(&self, url: &str) -> LarderResult<Vec<u8>>;
}

/// HTTP downloader with a global per-request timeout and body-size cap
pub struct HttpDownloader {
    timeout_secs: u64,
    limit_bytes: u64,
}

impl HttpDownloader {
    /// Create a downloader from network configuration
    pub fn new(config: &NetworkConfig) -> Self {
        Self {
            timeout_secs: config.timeout_secs,
            limit_bytes: config.max_download_mb.saturating_mul(1024 * 1024),
        }
    }

    fn agent(&self) -> ureq::Agent {
        let timeout = if self.timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.timeout_secs))
        };

        let config = ureq::Agent::config_builder()
            .timeout_global(timeout)
            .build();
        ureq::Agent::new_with_config(config)
    }
}

#[async_trait]
impl Downloader for HttpDownloader {
    async fn get(&self, url: &str) -> LarderResult<Vec<u8>> {
        debug!("GET {}", url);

        let agent = self.agent();
        let url_owned = url.to_string();
        let timeout_secs = self.timeout_secs;
        let limit = self.limit_bytes;

        let body = tokio::task::spawn_blocking(move || -> LarderResult<Vec<u8>> {
            let mut response = agent
                .get(&url_owned)
                .call()
                .map_err(|e| classify(&url_owned, timeout_secs, e))?;

            response
                .body_mut()
                .with_config()
                .limit(limit)
                .read_to_vec()
                .map_err(|e| classify(&url_owned, timeout_secs, e))
        })
        .await
        .map_err(|e| LarderError::Internal(format!("download task failed: {}", e)))??;

        debug!("GET {} returned {} bytes", url, body.len());
        Ok(body)
    }
}

/// Map transport errors onto the fetch error kinds; timeouts get their own
/// kind so callers can tell a slow mirror from a broken one.
fn classify(url: &str, timeout_secs: u64, err: ureq::Error) -> LarderError {
    match err {
        ureq::Error::Timeout(_) => LarderError::Timeout {
            operation: format!("GET {}", url),
            secs: timeout_secs,
        },
        ureq::Error::StatusCode(code) => LarderError::NetworkFailure {
            url: url.to_string(),
            reason: format!("HTTP status {}", code),
        },
        other => LarderError::NetworkFailure {
            url: url.to_string(),
            reason: other.to_string(),
        },
    }
}
