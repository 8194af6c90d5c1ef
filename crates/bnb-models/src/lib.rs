//! Shared data models for the BnB listing video service.
//!
//! This crate provides Serde-serializable types for:
//! - Inbound video generation requests
//! - Vertex AI video job wire types (operations, videos, configs)
//! - Terminal job outcomes and pipeline stages

pub mod operation;
pub mod request;
pub mod stage;
pub mod video;

// Re-export common types
pub use operation::{GenerationOutcome, Operation, OperationError, OperationResponse};
pub use request::GenerationRequest;
pub use stage::PipelineStage;
pub use video::{GenerateVideoConfig, ImageRef, VideoRef};
