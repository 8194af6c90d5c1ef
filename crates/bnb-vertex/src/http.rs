//! Token-authenticated JSON transport shared by the Vertex clients.

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info_span, warn, Instrument};

use crate::auth::IdentityTokenProvider;
use crate::config::VertexConfig;
use crate::error::{VertexError, VertexResult};
use crate::metrics::record_request;

/// Build the shared HTTP client for Vertex calls.
pub fn build_http_client(config: &VertexConfig) -> VertexResult<Client> {
    Client::builder()
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .pool_idle_timeout(Duration::from_secs(90))
        .pool_max_idle_per_host(10)
        .user_agent(concat!("bnb-vertex/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(VertexError::Network)
}

/// HTTP client that attaches a freshly fetched bearer token to every call.
#[derive(Clone)]
pub(crate) struct AuthorizedHttp {
    http: Client,
    tokens: Arc<dyn IdentityTokenProvider>,
}

impl AuthorizedHttp {
    pub(crate) fn new(http: Client, tokens: Arc<dyn IdentityTokenProvider>) -> Self {
        Self { http, tokens }
    }

    /// POST `body` as JSON and decode a JSON response.
    ///
    /// Network failures and non-2xx statuses are transport errors; a body
    /// that does not parse into `R` is a decode error.
    pub(crate) async fn post_json<B, R>(
        &self,
        operation: &str,
        url: &str,
        audience: &str,
        body: &B,
    ) -> VertexResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let span = info_span!("vertex_request", operation = %operation);

        async {
            let start = Instant::now();
            let token = self.tokens.token(audience).await;

            let sent = self
                .http
                .post(url)
                .bearer_auth(token)
                .header(ACCEPT, "application/json")
                .json(body)
                .send()
                .await;

            let response = match sent {
                Ok(response) => response,
                Err(e) => {
                    record_request(operation, 0, start.elapsed().as_secs_f64() * 1000.0);
                    return Err(VertexError::Network(e));
                }
            };

            let status = response.status();
            let text = response.text().await?;
            record_request(operation, status.as_u16(), start.elapsed().as_secs_f64() * 1000.0);

            if !status.is_success() {
                warn!(status = status.as_u16(), body = %text, "Vertex request rejected");
                return Err(VertexError::http(operation, status.as_u16(), text));
            }

            debug!(status = %status, bytes = text.len(), "Vertex request completed");

            serde_json::from_str(&text).map_err(|e| {
                VertexError::decode(format!("{} response could not be parsed: {}", operation, e))
            })
        }
        .instrument(span)
        .await
    }
}
