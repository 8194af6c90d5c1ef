//! End-to-end listing video generation.

use std::sync::Arc;
use std::time::Instant;

use bnb_models::{GenerationOutcome, GenerationRequest, PipelineStage, VideoRef};
use bnb_vertex::{TextGenerator, VideoJobs};
use tokio::sync::watch;
use tracing::{debug, error, info, info_span, warn, Instrument};

use crate::error::{GenerationError, GenerationResult};
use crate::metrics;
use crate::services::poller::{wait_for_completion, PollConfig};
use crate::services::prompt;

/// Prompt sent alongside the listing photo.
pub const DESCRIBE_INSTRUCTION: &str = "describe what is in the image";

/// Drives a request from photo to finished video.
///
/// Holds shared client handles only; concurrent requests are independent.
pub struct VideoOrchestrator {
    text: Arc<dyn TextGenerator>,
    jobs: Arc<dyn VideoJobs>,
    poll: PollConfig,
    shutdown: watch::Receiver<bool>,
}

impl VideoOrchestrator {
    pub fn new(
        text: Arc<dyn TextGenerator>,
        jobs: Arc<dyn VideoJobs>,
        poll: PollConfig,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            text,
            jobs,
            poll,
            shutdown,
        }
    }

    /// Generate a video for `request` and return the first produced clip.
    pub async fn generate(&self, request: &GenerationRequest) -> GenerationResult<VideoRef> {
        let start = Instant::now();
        let span = info_span!("generate_video", listing_id = %request.listing_id);

        let result = self.run(request).instrument(span).await;

        let outcome = match &result {
            Ok(_) => "succeeded",
            Err(e) => {
                log_failure(&request.listing_id, e);
                e.code()
            }
        };
        metrics::record_generation(outcome, start.elapsed().as_secs_f64());

        result
    }

    async fn run(&self, request: &GenerationRequest) -> GenerationResult<VideoRef> {
        if let Err(msg) = request.validate() {
            warn!(
                stage = %PipelineStage::Validating,
                listing_id = %request.listing_id,
                image_count = request.image_uris.len(),
                storage_bucket = %request.storage_bucket,
                "Invalid video request: {}",
                msg
            );
            return Err(GenerationError::InvalidRequest(msg));
        }

        let image = request
            .first_image()
            .ok_or_else(|| GenerationError::InvalidRequest("At least one image URI is required".into()))?;

        debug!(image = %image.uri, output = %request.output_uri_prefix(), "New video request");

        let description = self
            .text
            .generate_text(DESCRIBE_INSTRUCTION, Some(&image))
            .await
            .map_err(GenerationError::backend(PipelineStage::Describing))?;
        debug!(stage = %PipelineStage::Describing, description = %description, "Image described");

        let instructions = self
            .text
            .generate_text(&prompt::synthesize(&description), None)
            .await
            .map_err(GenerationError::backend(PipelineStage::PromptBuilding))?;
        debug!(stage = %PipelineStage::PromptBuilding, prompt = %instructions, "Video instructions generated");

        let config = request.video_config();
        let operation = self
            .jobs
            .submit(&instructions, &image, &config)
            .await
            .map_err(GenerationError::backend(PipelineStage::Submitting))?;
        info!(
            stage = %PipelineStage::Submitting,
            operation = %operation.name,
            output = %config.output_uri_prefix,
            "Video job submitted"
        );

        let polled = wait_for_completion(
            self.jobs.as_ref(),
            &self.poll,
            self.shutdown.clone(),
            operation,
        )
        .await?;
        metrics::record_poll_attempts(polled.attempts);

        let clips = polled.operation.video_count();
        let outcome = polled
            .operation
            .into_outcome()
            .unwrap_or(GenerationOutcome::EmptyResult);

        info!(
            stage = %PipelineStage::Polling,
            attempts = polled.attempts,
            clips,
            outcome = outcome.as_str(),
            "Video job finished"
        );

        match outcome {
            GenerationOutcome::Succeeded(video) => Ok(video),
            GenerationOutcome::EmptyResult => Err(GenerationError::EmptyResult),
            GenerationOutcome::Failed(reason) => Err(GenerationError::JobFailed(reason)),
        }
    }
}

fn log_failure(listing_id: &str, err: &GenerationError) {
    match err {
        GenerationError::Backend { stage, source } => error!(
            listing_id = %listing_id,
            stage = %stage,
            error = %source,
            code = err.code(),
            "Failed to generate video"
        ),
        GenerationError::JobFailed(reason) => error!(
            listing_id = %listing_id,
            stage = %PipelineStage::Polling,
            error = %reason,
            code = err.code(),
            "Failed to generate video"
        ),
        GenerationError::EmptyResult
        | GenerationError::Timeout { .. }
        | GenerationError::Cancelled => warn!(
            listing_id = %listing_id,
            error = %err,
            code = err.code(),
            "Video generation stopped without a video"
        ),
        // Already logged with the offending fields
        GenerationError::InvalidRequest(_) => {}
    }
}
