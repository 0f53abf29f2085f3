//! Configuration management for the Spotify queue broker.
//!
//! This module handles loading configuration values from environment variables and
//! `.env` files. Values are resolved once at startup into a [`Config`] that is
//! handed to the server and shared by every request.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the working directory
//! 3. `.env` file in the local data directory
//! 4. Application defaults (where applicable)

use std::{env, path::PathBuf};

use crate::error::{AppError, LOGIN_PATH};

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:3001/callback";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_STATIC_DIR: &str = "public";

/// Permissions requested from the driver during authorization.
pub const DEFAULT_SCOPE: &str = "user-read-playback-state user-modify-playback-state user-read-currently-playing user-read-private user-top-read playlist-read-private";

/// Loads environment variables from `.env` files.
///
/// Looks in the working directory first and then in the platform-specific local
/// data directory under `spotqueue/.env`. Variables that are already set in the
/// process environment are never overwritten, and a missing file is not an error.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/spotqueue/.env`
/// - macOS: `~/Library/Application Support/spotqueue/.env`
/// - Windows: `%LOCALAPPDATA%/spotqueue/.env`
///
/// # Errors
///
/// Returns an error if the data directory cannot be created or an existing
/// `.env` file cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotqueue/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    match dotenv::dotenv() {
        Ok(_) => {}
        Err(e) if e.not_found() => {}
        Err(e) => return Err(format!("cannot parse .env: {}", e)),
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| format!("cannot parse {}: {}", path.display(), e))?;
    }

    Ok(())
}

/// Runtime configuration of the broker.
#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub bind_address: String,
    pub port: u16,
    pub scope: String,
    pub api_url: String,
    pub auth_url: String,
    pub token_url: String,
    pub static_dir: PathBuf,
}

impl Config {
    /// Resolves the configuration from the process environment.
    ///
    /// `SPOTIFY_CLIENT_ID` and `SPOTIFY_CLIENT_SECRET` are required; everything
    /// else falls back to the defaults declared in this module.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] when a required variable is missing or `PORT`
    /// is not a valid port number.
    pub fn from_env() -> Result<Self, AppError> {
        let port = parse_port(env::var("PORT").ok().as_deref())?;

        Ok(Config {
            client_id: required("SPOTIFY_CLIENT_ID")?,
            client_secret: required("SPOTIFY_CLIENT_SECRET")?,
            redirect_uri: optional("REDIRECT_URI", DEFAULT_REDIRECT_URI),
            bind_address: optional("BIND_ADDRESS", DEFAULT_BIND_ADDRESS),
            port,
            scope: optional("SPOTIFY_SCOPE", DEFAULT_SCOPE),
            api_url: optional("SPOTIFY_API_URL", DEFAULT_API_URL),
            auth_url: optional("SPOTIFY_AUTH_URL", DEFAULT_AUTH_URL),
            token_url: optional("SPOTIFY_TOKEN_URL", DEFAULT_TOKEN_URL),
            static_dir: PathBuf::from(optional("STATIC_DIR", DEFAULT_STATIC_DIR)),
        })
    }

    /// Builds a configuration with default endpoints and the given credentials.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Config {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            scope: DEFAULT_SCOPE.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }

    /// Address the HTTP listener binds to, e.g. `0.0.0.0:3001`.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// Local URL of the driver login route, printed at startup.
    pub fn login_url(&self) -> String {
        format!("http://localhost:{}{}", self.port, LOGIN_PATH)
    }
}

/// Parses a `PORT` value; unset or blank means [`DEFAULT_PORT`].
pub fn parse_port(raw: Option<&str>) -> Result<u16, AppError> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => value
            .parse::<u16>()
            .map_err(|_| AppError::Config(format!("PORT must be a port number, got '{}'", value))),
        None => Ok(DEFAULT_PORT),
    }
}

fn required(key: &str) -> Result<String, AppError> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AppError::Config(format!("{} must be set", key))),
    }
}

fn optional(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
