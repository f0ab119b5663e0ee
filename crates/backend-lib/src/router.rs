// ============================
// crates/backend-lib/src/router.rs
// ============================
//! HTTP router.
use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers::{auth, bets, health};
use crate::AppState;

/// Prefix every route is mounted under
pub const API_PREFIX: &str = "/api";

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/health", get(health::health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route("/bets", get(bets::list_bets).post(bets::create_bet))
        .route("/bets/{id}", delete(bets::delete_bet))
        .route("/bets/{id}/result", put(bets::settle_bet))
        .route("/bets/{id}/winnings", get(bets::winnings));

    Router::new()
        .nest(API_PREFIX, api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
