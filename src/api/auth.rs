use std::{collections::HashMap, sync::Arc};

use axum::{
    Extension,
    extract::Query,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::{error::AppError, server::AppState, spotify, success, warning};

const CONNECTED_PAGE: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <title>Connected</title>
    <style>
      body {
        font-family: sans-serif;
        display: flex;
        justify-content: center;
        align-items: center;
        height: 100vh;
        margin: 0;
        background: linear-gradient(135deg, #1db954 0%, #1ed760 100%);
        color: white;
      }
      .card {
        text-align: center;
        padding: 40px;
        background: rgba(0, 0, 0, 0.2);
        border-radius: 20px;
      }
    </style>
  </head>
  <body>
    <div class="card">
      <h1>Connected!</h1>
      <p>Your Spotify account is now connected.</p>
      <p>Passengers can start queueing songs.</p>
      <p><small>You can close this window.</small></p>
    </div>
  </body>
</html>"#;

/// Redirects the driver to Spotify's authorization page.
pub async fn login(Extension(state): Extension<Arc<AppState>>) -> Response {
    match spotify::auth::authorize_url(&state.config) {
        Ok(url) => Redirect::to(&url).into_response(),
        Err(e) => e.logged("login").into_response(),
    }
}

/// Receives the authorization code from Spotify and exchanges it for tokens.
pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(state): Extension<Arc<AppState>>,
) -> Response {
    if let Some(reason) = params.get("error") {
        warning!("[callback] authorization denied: {}", reason);
        return (
            StatusCode::BAD_REQUEST,
            format!("Authorization was denied: {}", reason),
        )
            .into_response();
    }

    let Some(code) = params.get("code").filter(|code| !code.is_empty()) else {
        return (StatusCode::BAD_REQUEST, "No authorization code received").into_response();
    };

    match state.tokens.exchange_code(code).await {
        Ok(()) => {
            success!("Driver account connected");
            Html(CONNECTED_PAGE).into_response()
        }
        Err(e) => {
            let e: AppError = e.logged("callback");
            (e.status(), "Authentication failed").into_response()
        }
    }
}
