//! Long-running video job operation.

use serde::{Deserialize, Serialize};

use crate::video::VideoRef;

/// Remote video job lifecycle state.
///
/// `done` absent or `false` means the job is still running.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// Opaque operation name used to fetch status
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<OperationResponse>,
    /// Job error status, set by the backend on failed operations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<OperationError>,
}

/// Payload of a finished operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResponse {
    #[serde(default)]
    pub videos: Vec<VideoRef>,
    /// Number of videos removed by safety filters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rai_media_filtered_count: Option<u32>,
}

/// Error status of a failed operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationError {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

/// Terminal outcome of a finished video job.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    /// The job produced at least one video; the first one is kept
    Succeeded(VideoRef),
    /// The job finished without producing a video
    EmptyResult,
    /// The backend reported an explicit job failure
    Failed(String),
}

impl Operation {
    /// Create an in-progress operation handle.
    pub fn pending(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Create a finished operation carrying the given videos.
    pub fn finished(name: impl Into<String>, videos: Vec<VideoRef>) -> Self {
        Self {
            name: name.into(),
            done: Some(true),
            response: Some(OperationResponse {
                videos,
                rai_media_filtered_count: None,
            }),
            error: None,
        }
    }

    /// Check if this is a terminal state.
    pub fn is_done(&self) -> bool {
        self.done.unwrap_or(false)
    }

    /// Number of videos in the response, if any.
    pub fn video_count(&self) -> usize {
        self.response.as_ref().map_or(0, |r| r.videos.len())
    }

    /// Convert a finished operation into its outcome.
    ///
    /// Returns `None` while the operation is still running.
    pub fn into_outcome(self) -> Option<GenerationOutcome> {
        if !self.is_done() {
            return None;
        }

        if let Some(err) = self.error {
            let message = if err.message.is_empty() {
                format!("video job failed with code {}", err.code)
            } else {
                err.message
            };
            return Some(GenerationOutcome::Failed(message));
        }

        let first = self
            .response
            .and_then(|r| r.videos.into_iter().next());

        Some(match first {
            Some(video) => GenerationOutcome::Succeeded(video),
            None => GenerationOutcome::EmptyResult,
        })
    }
}

impl GenerationOutcome {
    /// Get string representation of the outcome.
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationOutcome::Succeeded(_) => "succeeded",
            GenerationOutcome::EmptyResult => "empty_result",
            GenerationOutcome::Failed(_) => "failed",
        }
    }
}
