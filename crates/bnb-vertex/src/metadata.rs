//! GCE metadata server client.
//!
//! Used for the project id, the region the service runs in, and identity
//! tokens for outbound calls.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::auth::IdentityTokenProvider;
use crate::error::{VertexError, VertexResult};

/// Metadata server root used when `GCE_METADATA_HOST` is not set.
pub const METADATA_BASE_URL: &str = "http://metadata.google.internal/computeMetadata/v1";

/// Region used when the metadata server does not report one.
pub const DEFAULT_REGION: &str = "us-central1";

const METADATA_FLAVOR: (&str, &str) = ("Metadata-Flavor", "Google");

/// Client for the local metadata server.
#[derive(Debug, Clone)]
pub struct MetadataClient {
    http: Client,
    base_url: String,
}

impl MetadataClient {
    /// Create a client, honoring `GCE_METADATA_HOST`.
    pub fn new() -> VertexResult<Self> {
        let base_url = std::env::var("GCE_METADATA_HOST")
            .ok()
            .filter(|h| !h.is_empty())
            .map(|host| format!("http://{}/computeMetadata/v1", host))
            .unwrap_or_else(|| METADATA_BASE_URL.to_string());
        Self::with_base_url(base_url)
    }

    /// Create a client against an explicit metadata root.
    pub fn with_base_url(base_url: impl Into<String>) -> VertexResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(5))
            .connect_timeout(Duration::from_secs(2))
            .build()
            .map_err(VertexError::Network)?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn get(&self, path: &str, query: &[(&str, &str)]) -> VertexResult<String> {
        let url = format!("{}/{}", self.base_url, path);

        let response = self
            .http
            .get(&url)
            .header(METADATA_FLAVOR.0, METADATA_FLAVOR.1)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(VertexError::http(format!("metadata {}", path), status.as_u16(), body));
        }

        Ok(body.trim().to_string())
    }

    /// Project id of the running service.
    pub async fn project_id(&self) -> VertexResult<String> {
        self.get("project/project-id", &[]).await
    }

    /// Region of the running service.
    pub async fn region(&self) -> VertexResult<String> {
        let raw = self.get("instance/region", &[]).await?;
        Ok(parse_region(&raw))
    }
}

/// Reduce `projects/<number>/regions/<region>` to `<region>`.
pub fn parse_region(raw: &str) -> String {
    let raw = raw.trim();
    match raw.rsplit_once('/') {
        Some((_, region)) if !region.is_empty() => region.to_string(),
        _ if raw.is_empty() => DEFAULT_REGION.to_string(),
        _ => raw.to_string(),
    }
}

#[async_trait]
impl IdentityTokenProvider for MetadataClient {
    async fn token(&self, audience: &str) -> String {
        match self
            .get(
                "instance/service-accounts/default/identity",
                &[("audience", audience)],
            )
            .await
        {
            Ok(token) => {
                debug!(audience = %audience, "Fetched identity token");
                token
            }
            Err(e) => {
                warn!(audience = %audience, "Failed to fetch identity token: {}", e);
                String::new()
            }
        }
    }
}
