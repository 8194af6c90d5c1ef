//! Stages of the video generation pipeline.

use serde::{Deserialize, Serialize};

/// Non-terminal stage of a generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Checking the inbound request
    Validating,
    /// Asking the text model to describe the image
    Describing,
    /// Turning the description into video instructions
    PromptBuilding,
    /// Submitting the video job
    Submitting,
    /// Waiting for the video job to finish
    Polling,
}

impl PipelineStage {
    /// Get string representation of the stage.
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Validating => "validating",
            PipelineStage::Describing => "describing",
            PipelineStage::PromptBuilding => "prompt_building",
            PipelineStage::Submitting => "submitting",
            PipelineStage::Polling => "polling",
        }
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
