// ================
// crates/common/src/lib.rs
// ================
//! Common types and structures
//! used for communication between the betting-ledger client and server.
//! This module defines the JSON request and response bodies of the HTTP API.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Database identity of a user.
pub type UserId = i64;

/// Database identity of a bet.
pub type BetId = i64;

/// Identity bound to an authenticated session.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: UserId,
    pub email: String,
}

/// A bet record as returned to its owner.
///
/// `result`, `is_won` and `winnings` are either all `None` (open bet)
/// or all set (settled bet).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Bet {
    pub id: BetId,
    pub user_id: UserId,
    /// Stake
    #[serde(with = "rust_decimal::serde::float")]
    pub einsatz: Decimal,
    /// Odds
    #[serde(with = "rust_decimal::serde::float")]
    pub quote: Decimal,
    /// Team or market label
    pub mannschaft: String,
    pub created_at: DateTime<Utc>,
    pub result: Option<String>,
    pub is_won: Option<bool>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub winnings: Option<Decimal>,
}

impl Bet {
    /// Whether an outcome has been recorded for this bet.
    pub fn is_settled(&self) -> bool {
        self.result.is_some()
    }
}

/// Aggregates over all bets of one user.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_bets: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_stake: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_winnings: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub profit: Decimal,
    /// Profit relative to stake in percent, always rendered with two decimals.
    pub profit_percentage: String,
}

/// Potential and realised payout of a single bet.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BetWinnings {
    #[serde(with = "rust_decimal::serde::float")]
    pub einsatz: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub quote: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub potential_winnings: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub actual_winnings: Decimal,
    pub is_won: Option<bool>,
}

// ---------------------------------------------------------------------------
// Request bodies. Every field is optional so that absence can be reported as a
// validation error instead of a deserialization failure.
// ---------------------------------------------------------------------------

/// Body of `POST /auth/register` and `POST /auth/login`.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Credentials {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Body of `POST /bets`.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct NewBetRequest {
    #[serde(default)]
    pub einsatz: Option<Decimal>,
    #[serde(default)]
    pub quote: Option<Decimal>,
    #[serde(default)]
    pub mannschaft: Option<String>,
}

/// Body of `PUT /bets/{id}/result`.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct SettleBetRequest {
    #[serde(default)]
    pub result: Option<String>,
}

// ---------------------------------------------------------------------------
// Response envelopes
// ---------------------------------------------------------------------------

/// Response to a successful registration or login.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AuthResponse {
    pub message: String,
    pub user: AuthUser,
}

/// Response of `GET /auth/me`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UserResponse {
    pub user: AuthUser,
}

/// Plain acknowledgement.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MessageResponse {
    pub message: String,
}

/// Response carrying one bet.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BetResponse {
    pub message: String,
    pub bet: Bet,
}

/// Response of `GET /bets`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BetListResponse {
    pub bets: Vec<Bet>,
    pub statistics: Statistics,
}

/// Response of `GET /health`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

/// Error body returned for every failed request.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}
