use reqwest::Client;
use url::Url;

use crate::{
    config::Config,
    error::{AppError, UNREACHABLE_MESSAGE, upstream_message},
    types::TokenResponse,
    warning,
};

/// Builds the Spotify authorization URL the driver is redirected to.
///
/// The URL carries the configured client id, redirect URI and scope set and asks
/// for an authorization code (`response_type=code`).
///
/// # Errors
///
/// Returns [`AppError::Config`] if the configured authorization URL is not a
/// valid URL.
pub fn authorize_url(config: &Config) -> Result<String, AppError> {
    let url = Url::parse_with_params(
        &config.auth_url,
        &[
            ("client_id", config.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("scope", config.scope.as_str()),
            ("show_dialog", "false"),
        ],
    )
    .map_err(|e| AppError::Config(format!("SPOTIFY_AUTH_URL is invalid: {}", e)))?;

    Ok(url.into())
}

/// Exchanges an authorization code for an access and refresh token.
///
/// Uses the `authorization_code` grant with the client credentials and the same
/// redirect URI that was sent in the authorization request.
///
/// # Errors
///
/// Returns [`AppError::AuthExchange`] if the request fails or Spotify rejects
/// the code.
pub async fn exchange_code(
    http: &Client,
    config: &Config,
    code: &str,
) -> Result<TokenResponse, AppError> {
    request_token(
        http,
        config,
        &[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", config.redirect_uri.as_str()),
        ],
    )
    .await
    .map_err(AppError::AuthExchange)
}

/// Mints a new access token from a refresh token.
///
/// Spotify may rotate the refresh token; the rotated one is returned in
/// [`TokenResponse::refresh_token`] and is `None` otherwise.
///
/// # Errors
///
/// Returns [`AppError::TokenRefresh`] if the request fails or Spotify rejects
/// the refresh token.
pub async fn refresh_token(
    http: &Client,
    config: &Config,
    refresh_token: &str,
) -> Result<TokenResponse, AppError> {
    request_token(
        http,
        config,
        &[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ],
    )
    .await
    .map_err(AppError::TokenRefresh)
}

async fn request_token(
    http: &Client,
    config: &Config,
    grant: &[(&str, &str)],
) -> Result<TokenResponse, String> {
    let mut form: Vec<(&str, &str)> = grant.to_vec();
    form.push(("client_id", config.client_id.as_str()));
    form.push(("client_secret", config.client_secret.as_str()));

    let res = http
        .post(&config.token_url)
        .form(&form)
        .send()
        .await
        .map_err(|e| {
            warning!("[token] {}", e);
            UNREACHABLE_MESSAGE.to_string()
        })?;

    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        return Err(upstream_message(status.as_u16(), &body));
    }

    res.json::<TokenResponse>().await.map_err(|e| {
        warning!("[token] cannot decode token response: {}", e);
        "Unexpected token response from Spotify".to_string()
    })
}
