// ============================
// crates/backend-lib/src/handlers/bets.rs
// ============================
//! Bet endpoints. Every route requires a logged-in caller.
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use betledger_common::{
    BetId, BetListResponse, BetResponse, BetWinnings, MessageResponse, NewBetRequest,
    SettleBetRequest,
};

use crate::error::AppError;
use crate::middleware::Authenticated;
use crate::AppState;

/// Path ids that are not integers cannot name a bet
fn parse_bet_id(raw: &str) -> Result<BetId, AppError> {
    raw.parse()
        .map_err(|_| AppError::NotFound("Wette".to_string()))
}

/// `POST /bets`
pub async fn create_bet(
    State(state): State<Arc<AppState>>,
    Authenticated(user): Authenticated,
    body: Result<Json<NewBetRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = body?;
    let bet = state.ledger.create_bet(&user, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(BetResponse {
            message: "Wette erfolgreich erstellt".to_string(),
            bet,
        }),
    ))
}

/// `GET /bets`
pub async fn list_bets(
    State(state): State<Arc<AppState>>,
    Authenticated(user): Authenticated,
) -> Result<Json<BetListResponse>, AppError> {
    Ok(Json(state.ledger.list_bets(&user).await?))
}

/// `PUT /bets/{id}/result`
pub async fn settle_bet(
    State(state): State<Arc<AppState>>,
    Authenticated(user): Authenticated,
    Path(id): Path<String>,
    body: Result<Json<SettleBetRequest>, JsonRejection>,
) -> Result<Json<BetResponse>, AppError> {
    let bet_id = parse_bet_id(&id)?;
    let Json(request) = body?;
    let bet = state.ledger.settle_bet(&user, bet_id, request).await?;
    Ok(Json(BetResponse {
        message: "Wettenergebnis erfolgreich aktualisiert".to_string(),
        bet,
    }))
}

/// `GET /bets/{id}/winnings`
pub async fn winnings(
    State(state): State<Arc<AppState>>,
    Authenticated(user): Authenticated,
    Path(id): Path<String>,
) -> Result<Json<BetWinnings>, AppError> {
    let bet_id = parse_bet_id(&id)?;
    Ok(Json(state.ledger.winnings(&user, bet_id).await?))
}

/// `DELETE /bets/{id}`
pub async fn delete_bet(
    State(state): State<Arc<AppState>>,
    Authenticated(user): Authenticated,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let bet_id = parse_bet_id(&id)?;
    state.ledger.delete_bet(&user, bet_id).await?;
    Ok(Json(MessageResponse {
        message: "Wette erfolgreich gelöscht".to_string(),
    }))
}
