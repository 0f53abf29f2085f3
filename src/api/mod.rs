//! # API Module
//!
//! HTTP handlers of the broker. Driver routes handle the OAuth round trip; passenger
//! routes relay one Spotify call each through the driver's session.
//!
//! ## Endpoints
//!
//! ### Driver
//!
//! - [`login`] - `GET /auth/login`, redirects to Spotify's authorization page
//! - [`callback`] - `GET /callback`, exchanges the authorization code for tokens
//! - [`status`] - `GET /api/status`, whether a driver is connected
//! - [`profile`] - `GET /api/me`, the driver's Spotify profile
//! - [`top_tracks`] - `GET /api/top-tracks`, the driver's most played tracks
//!
//! ### Passenger
//!
//! - [`search`] - `GET /api/search?q=`, track search
//! - [`curated_playlists`] - `GET /api/playlists`, fixed playlist catalog
//! - [`playlist_tracks`] - `GET /api/playlist/{id}`, tracks of a playlist
//! - [`enqueue`] - `POST /api/queue`, adds a track to the active device's queue
//! - [`current`] - `GET /api/current`, what is playing right now
//!
//! ### Monitoring
//!
//! - [`health`] - `GET /health`, status and version
//!
//! Protected handlers call [`crate::management::TokenManager::ensure_valid_token`]
//! before talking to Spotify and answer with [`crate::error::AppError`] on failure.

mod auth;
mod health;
mod me;
mod player;
mod playlists;
mod queue;
mod search;
mod status;

pub use auth::callback;
pub use auth::login;
pub use health::health;
pub use me::profile;
pub use me::top_tracks;
pub use player::current;
pub use playlists::CATALOG;
pub use playlists::curated_playlists;
pub use playlists::playlist_tracks;
pub use queue::enqueue;
pub use search::search;
pub use status::status;
