//! Veo long-running video generation client.

use std::sync::Arc;

use async_trait::async_trait;
use bnb_models::{GenerateVideoConfig, ImageRef, Operation};
use reqwest::Client;
use serde::Serialize;

use crate::auth::IdentityTokenProvider;
use crate::config::VertexConfig;
use crate::error::{VertexError, VertexResult};
use crate::http::AuthorizedHttp;

const GENERATE_OP: &str = "predictLongRunning";
const FETCH_OP: &str = "fetchPredictOperation";

/// Asynchronous video synthesis backend.
#[async_trait]
pub trait VideoJobs: Send + Sync {
    /// Submit a generation job and return its initial operation.
    async fn submit(
        &self,
        prompt: &str,
        image: &ImageRef,
        config: &GenerateVideoConfig,
    ) -> VertexResult<Operation>;

    /// Fetch the current state of a job.
    async fn status(&self, operation_name: &str) -> VertexResult<Operation>;
}

/// Veo on Vertex AI.
pub struct VeoClient {
    http: AuthorizedHttp,
    model_url: String,
}

/// predictLongRunning request body.
#[derive(Debug, Serialize)]
struct PredictLongRunningRequest<'a> {
    instances: Vec<Instance<'a>>,
    parameters: &'a GenerateVideoConfig,
}

#[derive(Debug, Serialize)]
struct Instance<'a> {
    prompt: &'a str,
    image: &'a ImageRef,
}

/// fetchPredictOperation request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FetchOperationRequest<'a> {
    operation_name: &'a str,
}

impl VeoClient {
    /// Create a new Veo client.
    pub fn new(config: &VertexConfig, http: Client, tokens: Arc<dyn IdentityTokenProvider>) -> Self {
        Self {
            http: AuthorizedHttp::new(http, tokens),
            model_url: config.model_url(&config.video_model),
        }
    }

    fn url(&self, op: &str) -> String {
        format!("{}:{}", self.model_url, op)
    }
}

fn check_name(operation: Operation, op: &str) -> VertexResult<Operation> {
    if operation.name.is_empty() {
        return Err(VertexError::decode(format!("{} returned an operation without a name", op)));
    }
    Ok(operation)
}

#[async_trait]
impl VideoJobs for VeoClient {
    async fn submit(
        &self,
        prompt: &str,
        image: &ImageRef,
        config: &GenerateVideoConfig,
    ) -> VertexResult<Operation> {
        let body = PredictLongRunningRequest {
            instances: vec![Instance { prompt, image }],
            parameters: config,
        };

        let operation: Operation = self
            .http
            .post_json(GENERATE_OP, &self.url(GENERATE_OP), &self.model_url, &body)
            .await?;

        check_name(operation, GENERATE_OP)
    }

    async fn status(&self, operation_name: &str) -> VertexResult<Operation> {
        let body = FetchOperationRequest { operation_name };

        let operation: Operation = self
            .http
            .post_json(FETCH_OP, &self.url(FETCH_OP), &self.model_url, &body)
            .await?;

        check_name(operation, FETCH_OP)
    }
}
