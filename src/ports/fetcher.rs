use std::path::Path;

use async_trait::async_trait;

use crate::domain::{DomainError, FetchOptions};

/// Transport port for downloading remote assets.
/// All network traffic goes through this interface.
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    /// Download `url` to `destination`.
    ///
    /// Resolves once the transfer has terminally succeeded or failed; on
    /// failure the error carries a human-readable reason.
    async fn fetch(
        &self,
        url: &str,
        destination: &Path,
        options: FetchOptions,
    ) -> Result<(), DomainError>;
}
