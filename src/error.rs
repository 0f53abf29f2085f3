//! Error taxonomy shared by the token lifecycle, the Spotify client and the HTTP
//! handlers.
//!
//! Every failure a request can run into is one of the [`AppError`] variants. The
//! variant decides the HTTP status returned to the caller; the message is what the
//! caller sees in the `{ "error": ... }` body.

use axum::{
    Json,
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use thiserror::Error;

use crate::warning;

/// Path the driver has to visit to (re)connect their account.
pub const LOGIN_PATH: &str = "/auth/login";

#[derive(Debug, Error)]
pub enum AppError {
    /// A required input was missing or malformed.
    #[error("{0}")]
    Validation(String),

    /// No driver has authorized yet.
    #[error("Driver not authenticated. Please visit /auth/login")]
    NotAuthenticated,

    /// The provider rejected the authorization code.
    #[error("Authorization code exchange failed: {0}")]
    AuthExchange(String),

    /// The provider rejected the refresh token.
    #[error("Token refresh failed: {0}")]
    TokenRefresh(String),

    #[error("No active device found. Please start playing Spotify on your device.")]
    NoActiveDevice,

    /// Any other upstream failure, with the upstream status when one was received.
    #[error("{message}")]
    Upstream { status: Option<u16>, message: String },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl AppError {
    /// HTTP status returned to the caller for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NoActiveDevice => StatusCode::NOT_FOUND,
            AppError::Upstream {
                status: Some(code), ..
            } => StatusCode::from_u16(*code)
                .ok()
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            AppError::NotAuthenticated
            | AppError::AuthExchange(_)
            | AppError::TokenRefresh(_)
            | AppError::Upstream { status: None, .. }
            | AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Translates a failed upstream response into a domain error.
    ///
    /// Spotify reports API errors as `{"error": {"status": 404, "message": "..."}}`
    /// and token endpoint errors as `{"error": "invalid_grant", "error_description":
    /// "..."}`. Both shapes are understood; any other body is replaced by a generic
    /// message so raw upstream payloads never reach passengers.
    pub fn from_upstream(status: u16, body: &str) -> Self {
        AppError::Upstream {
            status: Some(status),
            message: upstream_message(status, body),
        }
    }

    /// Drops the upstream status so the caller sees a plain 500.
    ///
    /// For endpoints whose contract only distinguishes their own special cases
    /// from "something failed", such as enqueueing and the driver profile.
    pub fn generic(self) -> Self {
        match self {
            AppError::Upstream { message, .. } => AppError::Upstream {
                status: None,
                message,
            },
            other => other,
        }
    }

    /// Logs the error with the endpoint it happened on and hands it back.
    pub fn logged(self, context: &str) -> Self {
        warning!("[{}] {} ({})", context, self, self.status().as_u16());
        self
    }
}

/// Extracts a human-readable message from an upstream error body.
pub fn upstream_message(status: u16, body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();

    let message = parsed.as_ref().and_then(|json| match &json["error"] {
        Value::Object(error) => error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
        Value::String(code) => Some(
            json["error_description"]
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| code.clone()),
        ),
        _ => None,
    });

    match message {
        Some(message) if !message.is_empty() => message,
        _ => format!("Spotify API responded with status {}", status),
    }
}

/// Message shown to callers when Spotify could not be reached at all.
pub const UNREACHABLE_MESSAGE: &str = "Could not reach Spotify";

/// Transport failures carry the request URL in their text, so only the log
/// gets the details.
impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        warning!("[spotify] {}", e);
        AppError::Upstream {
            status: e.status().map(|s| s.as_u16()),
            message: UNREACHABLE_MESSAGE.to_string(),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
