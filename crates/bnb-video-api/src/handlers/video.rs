//! Video generation handler.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use bnb_models::{GenerationRequest, VideoRef};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Generate a listing video (`POST /newvideo`).
///
/// Blocks until the video job finishes, fails or runs out of time.
pub async fn create_video(
    State(state): State<AppState>,
    payload: Result<Json<GenerationRequest>, JsonRejection>,
) -> ApiResult<Json<VideoRef>> {
    let Json(request) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let video = state.orchestrator.generate(&request).await?;

    Ok(Json(video))
}
