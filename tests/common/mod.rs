#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use axum::{
    Extension, Form, Json, Router,
    body::Body,
    extract::{Path, Query},
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use spotqueue::{
    config::Config,
    server::{AppState, build_router},
};
use tower::ServiceExt;

/// What the fake Spotify answers on the endpoints whose outcome a test varies.
#[derive(Clone)]
pub struct MockOptions {
    pub queue_status: u16,
    pub current: Option<Value>,
    pub rotate_refresh_token: bool,
    pub me_status: u16,
    pub expires_in: i64,
}

impl Default for MockOptions {
    fn default() -> Self {
        MockOptions {
            queue_status: 204,
            current: None,
            rotate_refresh_token: false,
            me_status: 200,
            expires_in: 3600,
        }
    }
}

#[derive(Default)]
pub struct Hits {
    pub token: AtomicUsize,
    pub refresh: AtomicUsize,
    pub search: AtomicUsize,
    pub playlist: AtomicUsize,
    pub queue: AtomicUsize,
    pub current: AtomicUsize,
    pub me: AtomicUsize,
    pub top: AtomicUsize,
    pub last_queued: Mutex<Option<String>>,
    pub last_time_range: Mutex<Option<String>>,
    pub last_limit: Mutex<Option<String>>,
}

impl Hits {
    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

struct MockState {
    options: MockOptions,
    hits: Arc<Hits>,
}

pub struct MockSpotify {
    pub base: String,
    pub hits: Arc<Hits>,
}

impl MockSpotify {
    pub async fn start(options: MockOptions) -> Self {
        let hits = Arc::new(Hits::default());
        let state = Arc::new(MockState {
            options,
            hits: Arc::clone(&hits),
        });

        let app = Router::new()
            .route("/api/token", post(token))
            .route("/v1/search", get(search))
            .route("/v1/playlists/{id}/tracks", get(playlist))
            .route("/v1/me/player/queue", post(queue))
            .route("/v1/me/player/currently-playing", get(current))
            .route("/v1/me", get(me))
            .route("/v1/me/top/tracks", get(top))
            .layer(Extension(state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        MockSpotify {
            base: format!("http://{}", addr),
            hits,
        }
    }

    pub fn config(&self) -> Config {
        let mut config = Config::new("client-id", "client-secret");
        config.api_url = format!("{}/v1", self.base);
        config.token_url = format!("{}/api/token", self.base);
        config
    }
}

pub fn track(id: &str, name: &str, duration_ms: u64) -> Value {
    json!({
        "id": id,
        "uri": format!("spotify:track:{}", id),
        "name": name,
        "artists": [{ "name": "Daft Punk" }, { "name": "Pharrell Williams" }],
        "album": {
            "name": "Random Access Memories",
            "images": [{ "url": "https://i.scdn.co/image/large" }, { "url": "https://i.scdn.co/image/small" }]
        },
        "duration_ms": duration_ms
    })
}

async fn token(
    Extension(state): Extension<Arc<MockState>>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    state.hits.token.fetch_add(1, Ordering::SeqCst);

    if form.get("client_secret").map(String::as_str) != Some("client-secret") {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "invalid_client", "error_description": "Invalid client secret" })),
        )
            .into_response();
    }

    match form.get("grant_type").map(String::as_str) {
        Some("authorization_code") if form.get("code").map(String::as_str) == Some("good-code") => {
            Json(json!({
                "access_token": "access-1",
                "token_type": "Bearer",
                "scope": "user-read-playback-state",
                "expires_in": state.options.expires_in,
                "refresh_token": "refresh-1"
            }))
            .into_response()
        }
        Some("refresh_token") => {
            state.hits.refresh.fetch_add(1, Ordering::SeqCst);
            if form.get("refresh_token").map(String::as_str) == Some("revoked") {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "invalid_grant", "error_description": "Refresh token revoked" })),
                )
                    .into_response();
            }

            let mut body = json!({
                "access_token": "access-refreshed",
                "token_type": "Bearer",
                "expires_in": 3600
            });
            if state.options.rotate_refresh_token {
                body["refresh_token"] = json!("refresh-2");
            }
            Json(body).into_response()
        }
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid_grant", "error_description": "Invalid authorization code" })),
        )
            .into_response(),
    }
}

async fn search(
    Extension(state): Extension<Arc<MockState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    state.hits.search.fetch_add(1, Ordering::SeqCst);
    *state.hits.last_limit.lock().unwrap() = params.get("limit").cloned();

    Json(json!({
        "tracks": {
            "items": [track("t1", "Get Lucky", 248_000), track("t2", "Lose Yourself to Dance", 353_000)]
        }
    }))
}

async fn playlist(
    Extension(state): Extension<Arc<MockState>>,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.hits.playlist.fetch_add(1, Ordering::SeqCst);
    *state.hits.last_limit.lock().unwrap() = params.get("limit").cloned();

    if id == "missing" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": { "status": 404, "message": "Resource not found" } })),
        )
            .into_response();
    }

    Json(json!({
        "items": [
            { "track": track("p1", "Instant Crush", 337_000) },
            { "track": null },
            { "track": track("p2", "Doin' It Right", 251_000) }
        ]
    }))
    .into_response()
}

async fn queue(
    Extension(state): Extension<Arc<MockState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.hits.queue.fetch_add(1, Ordering::SeqCst);
    *state.hits.last_queued.lock().unwrap() = params.get("uri").cloned();

    match state.options.queue_status {
        204 => StatusCode::NO_CONTENT.into_response(),
        404 => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": { "status": 404, "message": "Player command failed: No active device found", "reason": "NO_ACTIVE_DEVICE" } })),
        )
            .into_response(),
        other => (
            StatusCode::from_u16(other).unwrap(),
            Json(json!({ "error": { "status": other, "message": "Something went wrong" } })),
        )
            .into_response(),
    }
}

async fn current(Extension(state): Extension<Arc<MockState>>) -> Response {
    state.hits.current.fetch_add(1, Ordering::SeqCst);

    match &state.options.current {
        Some(body) => Json(body.clone()).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

async fn me(Extension(state): Extension<Arc<MockState>>) -> Response {
    state.hits.me.fetch_add(1, Ordering::SeqCst);

    match state.options.me_status {
        200 => Json(json!({ "id": "driver-1", "display_name": "The Driver", "country": "SE" }))
            .into_response(),
        other => (
            StatusCode::from_u16(other).unwrap(),
            Json(json!({ "error": { "status": other, "message": "Insufficient client scope" } })),
        )
            .into_response(),
    }
}

async fn top(
    Extension(state): Extension<Arc<MockState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    state.hits.top.fetch_add(1, Ordering::SeqCst);
    *state.hits.last_time_range.lock().unwrap() = params.get("time_range").cloned();
    *state.hits.last_limit.lock().unwrap() = params.get("limit").cloned();

    Json(json!({ "items": [track("top1", "One More Time", 320_000)] }))
}

/// The broker under test wired against a fake Spotify.
pub struct Harness {
    pub mock: MockSpotify,
    pub state: Arc<AppState>,
    pub app: Router,
}

impl Harness {
    pub async fn new(options: MockOptions) -> Self {
        let mock = MockSpotify::start(options).await;
        let state = Arc::new(AppState::new(mock.config()));
        let app = build_router(Arc::clone(&state));
        Harness { mock, state, app }
    }

    pub async fn authenticated(options: MockOptions) -> Self {
        let harness = Harness::new(options).await;
        harness.state.tokens.exchange_code("good-code").await.unwrap();
        harness
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let req = Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(req).await
    }

    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let (status, bytes) = self.send_raw(req).await;
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn send_raw(&self, req: Request<Body>) -> (StatusCode, Vec<u8>) {
        let res = self.app.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }
}
