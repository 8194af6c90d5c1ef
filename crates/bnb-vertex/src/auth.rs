//! Bearer token sources for outbound Vertex calls.
//!
//! Tokens are fetched per call and never cached here. Both sources fail
//! closed: an unobtainable token comes back as an empty string, and the
//! backend's 401/403 is what the caller ends up seeing.

use std::sync::Arc;

use async_trait::async_trait;
use gcp_auth::TokenProvider;
use tracing::warn;

use crate::error::{VertexError, VertexResult};

/// OAuth scope used for access tokens.
pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// Source of short-lived bearer tokens scoped to an audience.
#[async_trait]
pub trait IdentityTokenProvider: Send + Sync {
    /// Token for `audience`, or an empty string if none could be obtained.
    async fn token(&self, audience: &str) -> String;
}

/// Access tokens from application default credentials via `gcp_auth`.
///
/// The audience is ignored; tokens carry the cloud-platform scope.
pub struct AccessTokenProvider {
    auth: Arc<dyn TokenProvider>,
}

impl AccessTokenProvider {
    /// Wrap an existing `gcp_auth` provider.
    pub fn new(auth: Arc<dyn TokenProvider>) -> Self {
        Self { auth }
    }

    /// Discover application default credentials.
    pub async fn from_default_credentials() -> VertexResult<Self> {
        let auth = gcp_auth::provider().await.map_err(|e| {
            VertexError::config(format!("Failed to load default credentials: {}", e))
        })?;
        Ok(Self::new(auth))
    }
}

#[async_trait]
impl IdentityTokenProvider for AccessTokenProvider {
    async fn token(&self, _audience: &str) -> String {
        match self.auth.token(&[CLOUD_PLATFORM_SCOPE]).await {
            Ok(token) => token.as_str().to_string(),
            Err(e) => {
                warn!("Failed to obtain access token: {}", e);
                String::new()
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Fixed token for client tests.
    pub(crate) struct StaticToken(pub &'static str);

    #[async_trait]
    impl IdentityTokenProvider for StaticToken {
        async fn token(&self, _audience: &str) -> String {
            self.0.to_string()
        }
    }
}
