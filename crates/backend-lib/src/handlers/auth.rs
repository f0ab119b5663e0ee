// ============================
// crates/backend-lib/src/handlers/auth.rs
// ============================
//! Account endpoints: register, login, logout, current user.
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::SET_COOKIE, StatusCode},
    response::IntoResponse,
    Json,
};
use betledger_common::{AuthResponse, Credentials, MessageResponse, UserResponse};
use tracing::info;

use crate::error::AppError;
use crate::middleware::session::expired_cookie;
use crate::middleware::{Authenticated, CurrentSession};
use crate::AppState;

/// `POST /auth/register`
pub async fn register(
    State(state): State<Arc<AppState>>,
    session: CurrentSession,
    body: Result<Json<Credentials>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(credentials) = body?;
    let user = state.accounts.register(credentials).await?;
    let cookie = session.rotate(&state, user.clone()).await?;

    Ok((
        StatusCode::CREATED,
        [(SET_COOKIE, cookie)],
        Json(AuthResponse {
            message: "Benutzer erfolgreich registriert".to_string(),
            user,
        }),
    ))
}

/// `POST /auth/login`
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: CurrentSession,
    body: Result<Json<Credentials>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(credentials) = body?;
    let user = state.accounts.login(credentials).await?;
    let cookie = session.rotate(&state, user.clone()).await?;

    Ok((
        [(SET_COOKIE, cookie)],
        Json(AuthResponse {
            message: "Erfolgreich angemeldet".to_string(),
            user,
        }),
    ))
}

/// `POST /auth/logout`
///
/// Succeeds without a session; only a failing store is an error.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    session: CurrentSession,
) -> Result<impl IntoResponse, AppError> {
    if let Some(token) = &session.token {
        state
            .sessions
            .destroy(token)
            .await
            .map_err(|e| AppError::Session(e.to_string()))?;
    }
    if let Some(user) = &session.user {
        info!(user_id = user.id, "user logged out");
    }

    Ok((
        [(SET_COOKIE, expired_cookie(&state.settings.session)?)],
        Json(MessageResponse {
            message: "Erfolgreich abgemeldet".to_string(),
        }),
    ))
}

/// `GET /auth/me`
pub async fn me(Authenticated(user): Authenticated) -> Json<UserResponse> {
    Json(UserResponse { user })
}
