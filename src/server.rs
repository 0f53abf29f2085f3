use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{
    Extension, Router,
    response::Redirect,
    routing::{get, post},
};
use reqwest::Client;
use tower_http::{cors::CorsLayer, services::ServeDir};

use crate::{
    Res, api, config::Config, error::LOGIN_PATH, info, management::TokenManager,
    spotify::SpotifyClient,
};

/// Page passengers land on when opening the root path.
pub const PASSENGER_PAGE: &str = "/passenger.html";

/// Process-wide context shared by every handler.
pub struct AppState {
    pub config: Arc<Config>,
    pub tokens: TokenManager,
    pub spotify: SpotifyClient,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let http = Client::new();
        let config = Arc::new(config);

        AppState {
            tokens: TokenManager::new(http.clone(), Arc::clone(&config)),
            spotify: SpotifyClient::new(http, config.api_url.clone()),
            config,
        }
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let assets = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/", get(|| async { Redirect::to(PASSENGER_PAGE) }))
        .route("/health", get(api::health))
        .route(LOGIN_PATH, get(api::login))
        .route("/callback", get(api::callback))
        .route("/api/search", get(api::search))
        .route("/api/playlists", get(api::curated_playlists))
        .route("/api/playlist/{playlist_id}", get(api::playlist_tracks))
        .route("/api/queue", post(api::enqueue))
        .route("/api/current", get(api::current))
        .route("/api/me", get(api::profile))
        .route("/api/top-tracks", get(api::top_tracks))
        .route("/api/status", get(api::status))
        .fallback_service(assets)
        .layer(Extension(state))
        .layer(CorsLayer::permissive())
}

pub async fn start_api_server(config: Config) -> Res<()> {
    let addr = SocketAddr::from_str(&config.server_addr())?;
    let login_url = config.login_url();
    let app = build_router(Arc::new(AppState::new(config)));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Spotify queue broker running on http://{}", addr);
    info!("Driver authentication: {}", login_url);

    axum::serve(listener, app).await?;
    Ok(())
}
