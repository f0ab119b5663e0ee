// ============================
// crates/backend-lib/src/middleware/session.rs
// ============================
//! Session cookie transport and the extractors built on it.
use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, HeaderValue},
};
use betledger_common::AuthUser;
use cookie::{time::Duration, Cookie, SameSite};

use crate::auth::token_generator::{generate_session_token, is_well_formed};
use crate::config::SessionSettings;
use crate::error::AppError;
use crate::AppState;

/// Find the session token in the `Cookie` headers.
///
/// Values that cannot be a token we issued are ignored.
pub fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == cookie_name && is_well_formed(cookie.value()))
        .map(|cookie| cookie.value().to_string())
}

fn base_cookie(settings: &SessionSettings, value: String) -> Cookie<'static> {
    Cookie::build((settings.cookie_name.clone(), value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(settings.secure_cookie)
        .build()
}

fn header_value(cookie: &Cookie<'_>) -> Result<HeaderValue, AppError> {
    HeaderValue::from_str(&cookie.to_string())
        .map_err(|e| AppError::Internal(format!("invalid cookie: {e}")))
}

/// `Set-Cookie` value binding the browser to `token`
pub fn session_cookie(settings: &SessionSettings, token: &str) -> Result<HeaderValue, AppError> {
    let ttl = i64::try_from(settings.ttl_secs)
        .map_err(|_| AppError::Internal("session ttl out of range".to_string()))?;
    let mut cookie = base_cookie(settings, token.to_string());
    cookie.set_max_age(Duration::seconds(ttl));
    header_value(&cookie)
}

/// `Set-Cookie` value that makes the browser drop the session cookie
pub fn expired_cookie(settings: &SessionSettings) -> Result<HeaderValue, AppError> {
    let mut cookie = base_cookie(settings, String::new());
    cookie.make_removal();
    header_value(&cookie)
}

/// Session presented with the request, resolved against the store.
///
/// Never rejects for a missing or stale session; `user` is simply `None`.
#[derive(Debug, Clone, Default)]
pub struct CurrentSession {
    pub token: Option<String>,
    pub user: Option<AuthUser>,
}

impl CurrentSession {
    /// Bind `user` to a fresh token, dropping the presented one.
    ///
    /// Returns the cookie to send back.
    pub async fn rotate(&self, state: &AppState, user: AuthUser) -> Result<HeaderValue, AppError> {
        if let Some(old) = &self.token {
            state.sessions.destroy(old).await?;
        }
        let token = generate_session_token();
        state.sessions.set(&token, user).await?;
        session_cookie(&state.settings.session, &token)
    }
}

impl FromRequestParts<Arc<AppState>> for CurrentSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let Some(token) = session_token(&parts.headers, &state.settings.session.cookie_name) else {
            return Ok(Self::default());
        };
        let user = state.sessions.get(&token).await?;
        Ok(Self {
            token: Some(token),
            user,
        })
    }
}

/// Identity of a logged-in caller; rejects with 401 otherwise.
///
/// Runs before any body extractor, so unauthenticated requests never reach
/// input validation.
#[derive(Debug, Clone)]
pub struct Authenticated(pub AuthUser);

impl FromRequestParts<Arc<AppState>> for Authenticated {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let session = CurrentSession::from_request_parts(parts, state).await?;
        session.user.map(Authenticated).ok_or(AppError::Unauthenticated)
    }
}
