use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Query, rejection::QueryRejection},
};
use serde::Deserialize;

use crate::{
    error::AppError,
    server::AppState,
    types::{Profile, TimeRange, TrackList},
    utils,
};

pub const DEFAULT_TOP_LIMIT: u32 = 20;
pub const MAX_TOP_LIMIT: u32 = 50;

#[derive(Debug, Deserialize)]
pub struct TopTracksParams {
    pub time_range: Option<String>,
    pub limit: Option<u32>,
}

pub async fn profile(Extension(state): Extension<Arc<AppState>>) -> Result<Json<Profile>, AppError> {
    let token = state
        .tokens
        .ensure_valid_token()
        .await
        .map_err(|e| e.logged("me"))?;

    let user = state
        .spotify
        .current_user(&token)
        .await
        .map_err(|e| e.generic().logged("me"))?;

    Ok(Json(Profile {
        display_name: user.display_name,
        id: user.id,
    }))
}

pub async fn top_tracks(
    query: Result<Query<TopTracksParams>, QueryRejection>,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<TrackList>, AppError> {
    let Query(params) = query?;
    let time_range = match params.time_range.as_deref() {
        None | Some("") => TimeRange::default(),
        Some(raw) => raw.parse::<TimeRange>()?,
    };
    let limit = utils::clamp_limit(params.limit, DEFAULT_TOP_LIMIT, MAX_TOP_LIMIT);

    let token = state
        .tokens
        .ensure_valid_token()
        .await
        .map_err(|e| e.logged("top-tracks"))?;

    let tracks = state
        .spotify
        .top_tracks(&token, time_range, limit)
        .await
        .map_err(|e| e.logged("top-tracks"))?;

    Ok(Json(TrackList {
        tracks: utils::to_tracks(tracks),
    }))
}
