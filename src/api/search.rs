use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Query, rejection::QueryRejection},
};
use serde::Deserialize;

use crate::{
    error::AppError,
    server::AppState,
    spotify::SEARCH_LIMIT,
    types::TrackList,
    utils,
};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

pub async fn search(
    query: Result<Query<SearchParams>, QueryRejection>,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<TrackList>, AppError> {
    let Query(params) = query?;
    let Some(query) = params.q.filter(|q| !q.trim().is_empty()) else {
        return Err(AppError::Validation("Search query required".into()));
    };

    let token = state
        .tokens
        .ensure_valid_token()
        .await
        .map_err(|e| e.logged("search"))?;

    let tracks = state
        .spotify
        .search_tracks(&token, query.trim(), SEARCH_LIMIT)
        .await
        .map_err(|e| e.logged("search"))?;

    Ok(Json(TrackList {
        tracks: utils::to_tracks(tracks),
    }))
}
