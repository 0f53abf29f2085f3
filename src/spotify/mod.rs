//! # Spotify Integration Module
//!
//! Thin client over the handful of Spotify Web API endpoints the broker relays.
//! Every method issues exactly one HTTP request with the driver's bearer token and
//! either returns the decoded upstream payload or an [`AppError`] produced by
//! [`AppError::from_upstream`]. Nothing is retried.
//!
//! ## API Coverage
//!
//! - `GET /search` - Track search
//! - `GET /playlists/{id}/tracks` - Playlist track listing
//! - `POST /me/player/queue` - Add a track to the active device's queue
//! - `GET /me/player/currently-playing` - Current playback
//! - `GET /me` - Driver profile
//! - `GET /me/top/tracks` - Driver's top tracks
//!
//! Token exchange and refresh against the accounts service live in [`auth`].

pub mod auth;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::{
    error::AppError,
    warning,
    types::{
        CurrentlyPlayingResponse, Paging, PlaylistItem, SearchResponse, SpotifyTrack, SpotifyUser,
        TimeRange,
    },
};

/// Number of results a passenger search returns.
pub const SEARCH_LIMIT: u32 = 10;

/// Fields requested for playlist listings; keeps the payload to what a track
/// projection needs.
const PLAYLIST_FIELDS: &str = "items(track(id,uri,name,artists(name),album(name,images),duration_ms))";

#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    api_url: String,
}

impl SpotifyClient {
    pub fn new(http: Client, api_url: impl Into<String>) -> Self {
        SpotifyClient {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn search_tracks(
        &self,
        token: &str,
        query: &str,
        limit: u32,
    ) -> Result<Vec<SpotifyTrack>, AppError> {
        let limit = limit.to_string();
        let req = self
            .get(token, "/search")
            .query(&[("q", query), ("type", "track"), ("limit", limit.as_str())]);

        let res: SearchResponse = json(send(req).await?).await?;
        Ok(res.tracks.items)
    }

    pub async fn playlist_tracks(
        &self,
        token: &str,
        playlist_id: &str,
        limit: u32,
    ) -> Result<Vec<PlaylistItem>, AppError> {
        let limit = limit.to_string();
        let req = self
            .get(token, &format!("/playlists/{}/tracks", playlist_id))
            .query(&[("limit", limit.as_str()), ("fields", PLAYLIST_FIELDS)]);

        let res: Paging<PlaylistItem> = json(send(req).await?).await?;
        Ok(res.items)
    }

    /// Adds `uri` to the queue of the driver's active device.
    ///
    /// Spotify answers 404 when no device is playing; that case is reported as
    /// [`AppError::NoActiveDevice`] so passengers get an actionable message.
    pub async fn add_to_queue(&self, token: &str, uri: &str) -> Result<(), AppError> {
        let req = self
            .http
            .post(self.url("/me/player/queue"))
            .bearer_auth(token)
            .query(&[("uri", uri)])
            .header(reqwest::header::CONTENT_LENGTH, 0);

        match send(req).await {
            Ok(_) => Ok(()),
            Err(AppError::Upstream {
                status: Some(404), ..
            }) => Err(AppError::NoActiveDevice),
            Err(e) => Err(e),
        }
    }

    /// Returns the track currently playing on the driver's account.
    ///
    /// Spotify answers `204 No Content` when nothing is playing; that and an empty
    /// or item-less payload all yield `None`.
    pub async fn currently_playing(&self, token: &str) -> Result<Option<SpotifyTrack>, AppError> {
        let res = send(self.get(token, "/me/player/currently-playing")).await?;
        if res.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let body = res.text().await?;
        if body.trim().is_empty() {
            return Ok(None);
        }

        let current: CurrentlyPlayingResponse = serde_json::from_str(&body).map_err(|e| {
            warning!("[spotify] cannot decode currently-playing payload: {}", e);
            AppError::Upstream {
                status: None,
                message: "Unexpected response from Spotify".to_string(),
            }
        })?;

        Ok(current.item)
    }

    pub async fn current_user(&self, token: &str) -> Result<SpotifyUser, AppError> {
        json(send(self.get(token, "/me")).await?).await
    }

    pub async fn top_tracks(
        &self,
        token: &str,
        time_range: TimeRange,
        limit: u32,
    ) -> Result<Vec<SpotifyTrack>, AppError> {
        let limit = limit.to_string();
        let req = self
            .get(token, "/me/top/tracks")
            .query(&[("time_range", time_range.as_str()), ("limit", limit.as_str())]);

        let res: Paging<SpotifyTrack> = json(send(req).await?).await?;
        Ok(res.items)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    fn get(&self, token: &str, path: &str) -> RequestBuilder {
        self.http.get(self.url(path)).bearer_auth(token)
    }
}

/// Sends a request and turns any non-2xx answer into an [`AppError`].
async fn send(req: RequestBuilder) -> Result<Response, AppError> {
    let res = req.send().await?;
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    let body = res.text().await.unwrap_or_default();
    Err(AppError::from_upstream(status.as_u16(), &body))
}

async fn json<T: DeserializeOwned>(res: Response) -> Result<T, AppError> {
    res.json::<T>().await.map_err(|e| {
        warning!("[spotify] cannot decode payload: {}", e);
        AppError::Upstream {
            status: None,
            message: "Unexpected response from Spotify".to_string(),
        }
    })
}
