use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, Query, rejection::QueryRejection},
};
use serde::Deserialize;

use crate::{
    error::AppError,
    server::AppState,
    types::{CuratedPlaylist, CuratedPlaylists, TrackList},
    utils,
};

pub const DEFAULT_PLAYLIST_LIMIT: u32 = 50;
pub const MAX_PLAYLIST_LIMIT: u32 = 100;

/// Chart and era playlists offered to passengers. `year` is the chart year or
/// the first year of the decade the playlist covers.
pub const CATALOG: &[CuratedPlaylist] = &[
    CuratedPlaylist {
        id: "37i9dQZF1DXcBWIGoYBM5M",
        name: "Today's Top Hits",
        year: 2025,
    },
    CuratedPlaylist {
        id: "37i9dQZEVXbMDoHDwVN2tF",
        name: "Top 50 - Global",
        year: 2025,
    },
    CuratedPlaylist {
        id: "37i9dQZEVXbLiRSasKsNU9",
        name: "Viral 50 - Global",
        year: 2025,
    },
    CuratedPlaylist {
        id: "37i9dQZF1DX5Ejj0EkURtP",
        name: "All Out 2010s",
        year: 2010,
    },
    CuratedPlaylist {
        id: "37i9dQZF1DX4o1oenSJRJd",
        name: "All Out 2000s",
        year: 2000,
    },
    CuratedPlaylist {
        id: "37i9dQZF1DXbTxeAdrVG2l",
        name: "All Out 90s",
        year: 1990,
    },
    CuratedPlaylist {
        id: "37i9dQZF1DX4UtSsGT1Sbe",
        name: "All Out 80s",
        year: 1980,
    },
];

#[derive(Debug, Deserialize)]
pub struct PlaylistParams {
    pub limit: Option<u32>,
}

/// Returns the fixed catalog of curated playlists.
pub async fn curated_playlists() -> Json<CuratedPlaylists> {
    Json(CuratedPlaylists {
        playlists: CATALOG,
    })
}

/// Lists the tracks of a playlist, skipping entries whose track was removed.
pub async fn playlist_tracks(
    Path(playlist_id): Path<String>,
    query: Result<Query<PlaylistParams>, QueryRejection>,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<TrackList>, AppError> {
    let Query(params) = query?;
    if playlist_id.is_empty() || !playlist_id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(AppError::Validation("Invalid playlist id".into()));
    }

    let limit = utils::clamp_limit(params.limit, DEFAULT_PLAYLIST_LIMIT, MAX_PLAYLIST_LIMIT);

    let token = state
        .tokens
        .ensure_valid_token()
        .await
        .map_err(|e| e.logged("playlist"))?;

    let items = state
        .spotify
        .playlist_tracks(&token, &playlist_id, limit)
        .await
        .map_err(|e| e.logged("playlist"))?;

    Ok(Json(TrackList {
        tracks: utils::playlist_to_tracks(items),
    }))
}
