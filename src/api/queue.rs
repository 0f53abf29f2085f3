use std::sync::Arc;

use axum::{Extension, Json, extract::rejection::JsonRejection};

use crate::{
    error::AppError,
    info,
    server::AppState,
    types::{QueueRequest, QueueResponse},
    utils,
};

/// Adds a track to the queue of the driver's active device.
pub async fn enqueue(
    Extension(state): Extension<Arc<AppState>>,
    body: Result<Json<QueueRequest>, JsonRejection>,
) -> Result<Json<QueueResponse>, AppError> {
    let uri = body
        .ok()
        .and_then(|Json(req)| req.track_id)
        .and_then(|track| utils::track_uri(&track))
        .ok_or_else(|| AppError::Validation("Track ID required".into()))?;

    let token = state
        .tokens
        .ensure_valid_token()
        .await
        .map_err(|e| e.logged("queue"))?;

    state
        .spotify
        .add_to_queue(&token, &uri)
        .await
        .map_err(|e| e.generic().logged("queue"))?;

    info!("Queued {}", uri);
    Ok(Json(QueueResponse {
        success: true,
        message: "Track added to queue",
    }))
}
