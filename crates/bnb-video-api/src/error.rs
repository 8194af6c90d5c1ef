//! API and pipeline error types.

use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bnb_models::PipelineStage;
use bnb_vertex::VertexError;
use serde::Serialize;
use thiserror::Error;

use crate::config::is_production;

pub type ApiResult<T> = Result<T, ApiError>;

pub type GenerationResult<T> = Result<T, GenerationError>;

/// Why a video generation request did not produce a video.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Backend error while {stage}: {source}")]
    Backend {
        stage: PipelineStage,
        #[source]
        source: VertexError,
    },

    #[error("Video job failed: {0}")]
    JobFailed(String),

    #[error("Video job completed without producing a video")]
    EmptyResult,

    #[error("Video job did not finish within {waited:?} ({attempts} status checks)")]
    Timeout { waited: Duration, attempts: u32 },

    #[error("Video generation cancelled")]
    Cancelled,
}

impl GenerationError {
    /// Map a client error raised during `stage`.
    pub fn backend(stage: PipelineStage) -> impl FnOnce(VertexError) -> Self {
        move |source| Self::Backend { stage, source }
    }

    /// Stable label for logs, metrics and error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            GenerationError::InvalidRequest(_) => "invalid_request",
            GenerationError::Backend { source, .. } if source.is_decode() => "decode_error",
            GenerationError::Backend { .. } => "backend_error",
            GenerationError::JobFailed(_) => "job_failed",
            GenerationError::EmptyResult => "empty_result",
            GenerationError::Timeout { .. } => "timeout",
            GenerationError::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Generation(e) => match e {
                GenerationError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
                GenerationError::Backend { .. } | GenerationError::JobFailed(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
                // Existing callers depend on 418 for "job finished, no video"
                GenerationError::EmptyResult => StatusCode::IM_A_TEAPOT,
                GenerationError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
                GenerationError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
            },
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "invalid_request",
            ApiError::Generation(e) => e.code(),
        }
    }

    fn is_internal(&self) -> bool {
        matches!(
            self,
            ApiError::Generation(GenerationError::Backend { .. })
                | ApiError::Generation(GenerationError::JobFailed(_))
        )
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
    code: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Don't expose backend error details in production
        let detail = if self.is_internal()
            && is_production(&std::env::var("ENVIRONMENT").unwrap_or_default())
        {
            "An internal error occurred".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorResponse {
            detail,
            code: self.code(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (GenerationError::InvalidRequest("x".into()), StatusCode::BAD_REQUEST),
            (
                GenerationError::Backend {
                    stage: PipelineStage::Submitting,
                    source: VertexError::http("predictLongRunning", 503, "down"),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                GenerationError::Backend {
                    stage: PipelineStage::Polling,
                    source: VertexError::decode("bad json"),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (GenerationError::JobFailed("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (GenerationError::EmptyResult, StatusCode::IM_A_TEAPOT),
            (
                GenerationError::Timeout {
                    waited: Duration::from_secs(600),
                    attempts: 40,
                },
                StatusCode::GATEWAY_TIMEOUT,
            ),
            (GenerationError::Cancelled, StatusCode::SERVICE_UNAVAILABLE),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status_code(), expected);
        }
    }

    #[test]
    fn test_decode_and_transport_have_distinct_codes() {
        let decode = GenerationError::Backend {
            stage: PipelineStage::Describing,
            source: VertexError::decode("bad json"),
        };
        let transport = GenerationError::Backend {
            stage: PipelineStage::Describing,
            source: VertexError::http("generateContent", 500, "boom"),
        };
        assert_eq!(decode.code(), "decode_error");
        assert_eq!(transport.code(), "backend_error");
        assert!(transport.to_string().contains("describing"));
    }

    #[test]
    fn test_empty_result_is_not_internal() {
        assert!(!ApiError::from(GenerationError::EmptyResult).is_internal());
    }
}
