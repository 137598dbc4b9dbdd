//! Narrow host capability consumed by tag reconciliation.

use crate::error::HostError;
use crate::github::{RefCreated, RemoteTag};
use async_trait::async_trait;
use futures::stream::BoxStream;

/// Tag enumeration and bare reference creation on the hosting platform.
#[async_trait]
pub trait TagHost: Send + Sync {
    /// Lazily enumerate the remote tags.
    ///
    /// Every call starts a fresh enumeration from the first page; dropping the
    /// stream stops fetching further pages.
    fn tags(&self) -> BoxStream<'_, Result<RemoteTag, HostError>>;

    /// Create `refs/tags/<tag_name>` pointing at `sha`.
    async fn create_tag_reference(
        &self,
        owner: &str,
        repo: &str,
        tag_name: &str,
        sha: &str,
    ) -> Result<RefCreated, HostError>;
}
