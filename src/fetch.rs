//! Binary fetches of generated artifacts

use crate::error::Result;
use crate::qr::QrReference;
use async_trait::async_trait;
use bytes::Bytes;

/// Source of artifact bytes for a reference
#[async_trait]
pub trait ArtifactFetcher: Send + Sync {
    /// Fetch the full body behind `reference`. Non-success statuses are errors.
    async fn fetch(&self, reference: &QrReference) -> Result<Bytes>;
}

#[async_trait]
impl<T: ArtifactFetcher + ?Sized> ArtifactFetcher for &T {
    async fn fetch(&self, reference: &QrReference) -> Result<Bytes> {
        (**self).fetch(reference).await
    }
}

/// [`ArtifactFetcher`] backed by a shared `reqwest` client
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Fetcher with a default client
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetcher reusing an existing client (connection pool, proxies, timeouts)
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ArtifactFetcher for HttpFetcher {
    async fn fetch(&self, reference: &QrReference) -> Result<Bytes> {
        let response = self
            .client
            .get(reference.as_str())
            .send()
            .await?
            .error_for_status()?;
        let body = response.bytes().await?;
        tracing::debug!(bytes = body.len(), "Fetched artifact");
        Ok(body)
    }
}
