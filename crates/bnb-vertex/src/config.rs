//! Vertex AI backend configuration.

use std::time::Duration;

use tracing::{info, warn};

use crate::error::{VertexError, VertexResult};
use crate::metadata::{MetadataClient, DEFAULT_REGION};

/// Default Gemini model used for image description and prompt writing.
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.0-flash-001";

/// Default Veo model used for video generation.
pub const DEFAULT_VIDEO_MODEL: &str = "veo-2.0-generate-001";

/// Where bearer tokens for Vertex calls come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenSource {
    /// Identity token from the metadata server, scoped to the endpoint audience
    #[default]
    Identity,
    /// OAuth access token from application default credentials
    Access,
}

impl TokenSource {
    fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "access" | "access_token" | "adc" => TokenSource::Access,
            _ => TokenSource::Identity,
        }
    }
}

/// Vertex AI client configuration.
#[derive(Debug, Clone)]
pub struct VertexConfig {
    /// GCP project ID
    pub project_id: String,
    /// GCP region, e.g. "us-central1"
    pub location: String,
    /// Gemini model id
    pub text_model: String,
    /// Veo model id
    pub video_model: String,
    /// API base URL override (defaults to the regional aiplatform host)
    pub base_url: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// Bearer token source
    pub token_source: TokenSource,
}

impl VertexConfig {
    /// Create a config for a project and region with default models.
    pub fn new(project_id: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            location: location.into(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            video_model: DEFAULT_VIDEO_MODEL.to_string(),
            base_url: None,
            timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(5),
            token_source: TokenSource::default(),
        }
    }

    /// Override the API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Create config from environment variables, asking the metadata server
    /// for the project and region when they are not set.
    pub async fn from_env(metadata: &MetadataClient) -> VertexResult<Self> {
        let project_id = match env_non_empty("GCP_PROJECT_ID")
            .or_else(|| env_non_empty("GOOGLE_CLOUD_PROJECT"))
        {
            Some(project) => project,
            None => metadata.project_id().await.map_err(|e| {
                VertexError::config(format!(
                    "GCP_PROJECT_ID not set and metadata server lookup failed: {}",
                    e
                ))
            })?,
        };

        let location = match env_non_empty("GCP_REGION") {
            Some(region) => region,
            None => match metadata.region().await {
                Ok(region) => region,
                Err(e) => {
                    warn!("Region lookup failed, using {}: {}", DEFAULT_REGION, e);
                    DEFAULT_REGION.to_string()
                }
            },
        };

        let mut config = Self::new(project_id, location);

        if let Some(model) = env_non_empty("VERTEX_TEXT_MODEL") {
            config.text_model = model;
        }
        if let Some(model) = env_non_empty("VERTEX_VIDEO_MODEL") {
            config.video_model = model;
        }
        config.base_url = env_non_empty("VERTEX_BASE_URL");
        config.timeout = Duration::from_secs(
            std::env::var("VERTEX_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(60),
        );
        config.token_source = std::env::var("AUTH_TOKEN_SOURCE")
            .map(|s| TokenSource::parse(&s))
            .unwrap_or_default();

        info!(
            project = %config.project_id,
            location = %config.location,
            text_model = %config.text_model,
            video_model = %config.video_model,
            "Vertex AI config resolved"
        );

        Ok(config)
    }

    /// API base URL, without a trailing slash.
    pub fn api_base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}-aiplatform.googleapis.com", self.location),
        }
    }

    /// Full resource URL of a publisher model.
    pub fn model_url(&self, model: &str) -> String {
        format!(
            "{}/v1/projects/{}/locations/{}/publishers/google/models/{}",
            self.api_base_url(),
            self.project_id,
            self.location,
            model
        )
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use serial_test::serial;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn test_model_url_default_host() {
        let config = VertexConfig::new("my-project", "europe-west4");
        assert_eq!(
            config.model_url("veo-2.0-generate-001"),
            "https://europe-west4-aiplatform.googleapis.com/v1/projects/my-project/locations/europe-west4/publishers/google/models/veo-2.0-generate-001"
        );
    }

    #[test]
    fn test_model_url_with_base_override() {
        let config = VertexConfig::new("p", "us-central1").with_base_url("http://127.0.0.1:9000/");
        assert_eq!(
            config.model_url("m"),
            "http://127.0.0.1:9000/v1/projects/p/locations/us-central1/publishers/google/models/m"
        );
    }

    #[test]
    fn test_token_source_parse() {
        assert_eq!(TokenSource::parse("access"), TokenSource::Access);
        assert_eq!(TokenSource::parse(" ADC "), TokenSource::Access);
        assert_eq!(TokenSource::parse("identity"), TokenSource::Identity);
        assert_eq!(TokenSource::parse("whatever"), TokenSource::Identity);
    }

    #[tokio::test]
    #[serial]
    async fn test_from_env_prefers_environment() {
        std::env::set_var("GCP_PROJECT_ID", "env-project");
        std::env::set_var("GCP_REGION", "asia-east1");
        std::env::set_var("VERTEX_VIDEO_MODEL", "veo-3.0-generate-001");

        // Unreachable metadata server: must not be consulted.
        let metadata = MetadataClient::with_base_url("http://127.0.0.1:9").unwrap();
        let config = VertexConfig::from_env(&metadata).await.unwrap();

        assert_eq!(config.project_id, "env-project");
        assert_eq!(config.location, "asia-east1");
        assert_eq!(config.video_model, "veo-3.0-generate-001");
        assert_eq!(config.text_model, DEFAULT_TEXT_MODEL);

        std::env::remove_var("GCP_PROJECT_ID");
        std::env::remove_var("GCP_REGION");
        std::env::remove_var("VERTEX_VIDEO_MODEL");
    }

    #[tokio::test]
    #[serial]
    async fn test_from_env_falls_back_to_metadata() {
        std::env::remove_var("GCP_PROJECT_ID");
        std::env::remove_var("GOOGLE_CLOUD_PROJECT");
        std::env::remove_var("GCP_REGION");

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/project/project-id"))
            .respond_with(ResponseTemplate::new(200).set_body_string("meta-project"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/instance/region"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("projects/123456/regions/us-east4"),
            )
            .mount(&server)
            .await;

        let metadata = MetadataClient::with_base_url(server.uri()).unwrap();
        let config = VertexConfig::from_env(&metadata).await.unwrap();

        assert_eq!(config.project_id, "meta-project");
        assert_eq!(config.location, "us-east4");
    }
}
