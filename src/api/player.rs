use std::sync::Arc;

use axum::{Extension, Json};

use crate::{error::AppError, server::AppState, types::NowPlaying, utils};

/// Reports what is playing on the driver's account; `{playing: false}` when idle.
pub async fn current(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<NowPlaying>, AppError> {
    let token = state
        .tokens
        .ensure_valid_token()
        .await
        .map_err(|e| e.logged("current"))?;

    let track = state
        .spotify
        .currently_playing(&token)
        .await
        .map_err(|e| e.logged("current"))?;

    Ok(Json(utils::to_now_playing(track)))
}
