use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use tokio::sync::Mutex;

use crate::{
    config::Config,
    error::AppError,
    info, spotify,
    types::{AuthStatus, TokenResponse},
    warning,
};

/// Tokens are refreshed once they are this close to expiring.
pub const REFRESH_MARGIN_SECS: i64 = 5 * 60;

/// A failed refresh is reported to every caller for this long before the next
/// attempt goes out.
pub const REFRESH_BACKOFF_SECS: i64 = 30;

/// The driver's credentials. Access token and expiry are always replaced together.
#[derive(Debug, Clone)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
}

impl Token {
    /// Builds a token from a token endpoint answer received at `now`.
    ///
    /// Returns `None` when `expires_in` does not describe a representable instant.
    pub fn from_response(
        res: TokenResponse,
        previous_refresh: Option<String>,
        now: DateTime<Utc>,
    ) -> Option<Self> {
        let expires_at = Duration::try_seconds(res.expires_in)
            .and_then(|lifetime| now.checked_add_signed(lifetime))?;

        Some(Token {
            access_token: res.access_token,
            refresh_token: res.refresh_token.or(previous_refresh),
            expires_at,
        })
    }

    /// Whether the token has to be refreshed before it is used at `now`.
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        match now.checked_add_signed(Duration::seconds(REFRESH_MARGIN_SECS)) {
            Some(deadline) => deadline > self.expires_at,
            None => true,
        }
    }
}

#[derive(Debug, Default)]
struct Session {
    token: Option<Token>,
    failed_refresh: Option<(DateTime<Utc>, String)>,
}

/// Owns the single driver session of the process.
///
/// The session sits behind one async mutex. [`TokenManager::ensure_valid_token`]
/// keeps the lock across a refresh, so requests arriving while a refresh is in
/// flight wait for it and reuse its result instead of refreshing again. A failed
/// refresh is remembered for [`REFRESH_BACKOFF_SECS`], so those waiters get the
/// same failure instead of each retrying it.
pub struct TokenManager {
    http: Client,
    config: Arc<Config>,
    session: Mutex<Session>,
}

impl TokenManager {
    pub fn new(http: Client, config: Arc<Config>) -> Self {
        TokenManager {
            http,
            config,
            session: Mutex::new(Session::default()),
        }
    }

    /// Completes the authorization-code flow and replaces the stored session.
    pub async fn exchange_code(&self, code: &str) -> Result<(), AppError> {
        let res = spotify::auth::exchange_code(&self.http, &self.config, code).await?;
        let token = Token::from_response(res, None, Utc::now()).ok_or_else(|| {
            AppError::AuthExchange("Spotify returned an invalid token lifetime".into())
        })?;

        self.store(token).await;
        Ok(())
    }

    /// Returns an access token that is valid for at least the refresh margin.
    ///
    /// Refreshes first when the stored token is within [`REFRESH_MARGIN_SECS`] of
    /// expiring. The refresh token is kept unless Spotify hands out a new one.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotAuthenticated`] if no driver has authorized yet, or a
    ///   refresh is due and no refresh token was ever issued
    /// - [`AppError::TokenRefresh`] if Spotify rejects the refresh, or rejected
    ///   it less than [`REFRESH_BACKOFF_SECS`] ago
    pub async fn ensure_valid_token(&self) -> Result<String, AppError> {
        let mut session = self.session.lock().await;
        let now = Utc::now();

        let Some(token) = session.token.as_ref() else {
            return Err(AppError::NotAuthenticated);
        };

        if !token.needs_refresh(now) {
            return Ok(token.access_token.clone());
        }

        let Some(refresh) = token.refresh_token.clone() else {
            return Err(AppError::NotAuthenticated);
        };

        if let Some((failed_at, message)) = &session.failed_refresh {
            if now < *failed_at + Duration::seconds(REFRESH_BACKOFF_SECS) {
                return Err(AppError::TokenRefresh(message.clone()));
            }
        }

        let renewed = match spotify::auth::refresh_token(&self.http, &self.config, &refresh).await
        {
            Ok(res) => Token::from_response(res, Some(refresh), Utc::now()).ok_or_else(|| {
                AppError::TokenRefresh("Spotify returned an invalid token lifetime".into())
            }),
            Err(e) => Err(e),
        };

        match renewed {
            Ok(renewed) => {
                let access_token = renewed.access_token.clone();
                info!("Refreshed driver access token, valid until {}", renewed.expires_at);
                session.token = Some(renewed);
                session.failed_refresh = None;
                Ok(access_token)
            }
            Err(e) => {
                let message = match &e {
                    AppError::TokenRefresh(message) => message.clone(),
                    other => other.to_string(),
                };
                warning!("Token refresh failed, next attempt in {}s", REFRESH_BACKOFF_SECS);
                session.failed_refresh = Some((Utc::now(), message));
                Err(e)
            }
        }
    }

    pub async fn status(&self) -> AuthStatus {
        let session = self.session.lock().await;
        AuthStatus {
            authenticated: session.token.is_some(),
            has_refresh_token: session
                .token
                .as_ref()
                .is_some_and(|token| token.refresh_token.is_some()),
        }
    }

    /// Replaces the stored session and forgets any earlier refresh failure.
    pub async fn store(&self, token: Token) {
        let mut session = self.session.lock().await;
        session.token = Some(token);
        session.failed_refresh = None;
    }

    pub async fn current_token(&self) -> Option<Token> {
        self.session.lock().await.token.clone()
    }
}
