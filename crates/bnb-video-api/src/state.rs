//! Application state.

use std::sync::Arc;

use bnb_vertex::{
    build_http_client, AccessTokenProvider, GeminiClient, IdentityTokenProvider, MetadataClient,
    TextGenerator, TokenSource, VeoClient, VertexConfig, VideoJobs,
};
use tokio::sync::watch;
use tracing::info;

use crate::config::ApiConfig;
use crate::services::VideoOrchestrator;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub orchestrator: Arc<VideoOrchestrator>,
    shutdown: Arc<watch::Sender<bool>>,
}

impl AppState {
    /// Create new application state with Vertex AI clients.
    pub async fn new(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let metadata = MetadataClient::new()?;
        let vertex = VertexConfig::from_env(&metadata).await?;

        info!(
            project = %vertex.project_id,
            location = %vertex.location,
            text_model = %vertex.text_model,
            video_model = %vertex.video_model,
            "Vertex AI backend configured"
        );

        let tokens: Arc<dyn IdentityTokenProvider> = match vertex.token_source {
            TokenSource::Identity => Arc::new(metadata),
            TokenSource::Access => Arc::new(AccessTokenProvider::from_default_credentials().await?),
        };

        let http = build_http_client(&vertex)?;
        let text = Arc::new(GeminiClient::new(&vertex, http.clone(), Arc::clone(&tokens)));
        let jobs = Arc::new(VeoClient::new(&vertex, http, tokens));

        Ok(Self::with_clients(config, text, jobs))
    }

    /// Create state around existing clients.
    pub fn with_clients(
        config: ApiConfig,
        text: Arc<dyn TextGenerator>,
        jobs: Arc<dyn VideoJobs>,
    ) -> Self {
        let (shutdown, shutdown_rx) = watch::channel(false);
        let orchestrator = VideoOrchestrator::new(text, jobs, config.poll.clone(), shutdown_rx);

        Self {
            config,
            orchestrator: Arc::new(orchestrator),
            shutdown: Arc::new(shutdown),
        }
    }

    /// Signal in-flight video waits to stop.
    pub fn shutdown(&self) {
        self.shutdown.send_replace(true);
    }

    /// Check if shutdown has been signalled.
    pub fn is_shutting_down(&self) -> bool {
        *self.shutdown.borrow()
    }
}
