//! Vertex AI and GCE metadata clients.
//!
//! This crate provides:
//! - Identity tokens from the metadata server (and an ADC access-token source)
//! - Project id / region discovery
//! - Gemini `generateContent` client for image description and prompt writing
//! - Veo long-running video job client (submit + status)
//! - Request metrics for every outbound call

pub mod auth;
pub mod config;
pub mod error;
pub mod gemini;
mod http;
pub mod metadata;
pub mod metrics;
pub mod veo;

pub use auth::{AccessTokenProvider, IdentityTokenProvider};
pub use config::{TokenSource, VertexConfig};
pub use error::{VertexError, VertexResult};
pub use gemini::{GeminiClient, TextGenerator};
pub use http::build_http_client;
pub use metadata::MetadataClient;
pub use veo::{VeoClient, VideoJobs};
