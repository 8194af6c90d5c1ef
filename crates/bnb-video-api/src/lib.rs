//! Axum HTTP API server for listing video generation.
//!
//! This crate provides:
//! - `POST /newvideo`: photo → description → instructions → Veo job → video
//! - Bounded, cancellable polling of the video job
//! - Health endpoints and Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult, GenerationError, GenerationResult};
pub use routes::create_router;
pub use services::{PollConfig, VideoOrchestrator};
pub use state::AppState;
