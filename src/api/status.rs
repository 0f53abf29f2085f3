use std::sync::Arc;

use axum::{Extension, Json};

use crate::{server::AppState, types::AuthStatus};

/// Reports whether a driver is connected. Never fails.
pub async fn status(Extension(state): Extension<Arc<AppState>>) -> Json<AuthStatus> {
    Json(state.tokens.status().await)
}
