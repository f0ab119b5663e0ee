// ============================
// crates/backend-lib/src/ledger/mod.rs
// ============================
//! Bet ledger: per-user bet records and derived statistics.
//!
//! Every operation takes the authenticated identity; ownership is enforced by
//! the storage queries, and a bet owned by someone else is reported exactly
//! like a missing one.

pub mod settlement;
pub mod stats;

use std::sync::Arc;

use betledger_common::{AuthUser, Bet, BetId, BetListResponse, BetWinnings, NewBetRequest, SettleBetRequest};
use rust_decimal::Decimal;
use tracing::info;

use crate::error::AppError;
use crate::metrics;
use crate::storage::Storage;
use crate::validation;

pub use settlement::{potential_winnings, settle, MoneyOverflow, WON_KEYWORD};
pub use stats::compute_statistics;

const BET: &str = "Wette";

fn not_found() -> AppError {
    AppError::NotFound(BET.to_string())
}

/// Bet operations for authenticated users
#[derive(Clone)]
pub struct BetLedger {
    storage: Arc<dyn Storage>,
}

impl BetLedger {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Record a new open bet
    pub async fn create_bet(&self, user: &AuthUser, request: NewBetRequest) -> Result<Bet, AppError> {
        let new_bet = validation::validate_new_bet(request)?;
        let bet = self.storage.insert_bet(user.id, &new_bet).await?;

        ::metrics::counter!(metrics::BET_CREATED).increment(1);
        info!(user_id = user.id, bet_id = bet.id, "bet created");
        Ok(bet)
    }

    /// All bets of the user, newest first, with statistics
    pub async fn list_bets(&self, user: &AuthUser) -> Result<BetListResponse, AppError> {
        let bets = self.storage.list_bets(user.id).await?;
        let statistics = compute_statistics(&bets)?;
        Ok(BetListResponse { bets, statistics })
    }

    /// Record the outcome of a bet.
    ///
    /// Settling an already settled bet overwrites the previous outcome.
    pub async fn settle_bet(
        &self,
        user: &AuthUser,
        bet_id: BetId,
        request: SettleBetRequest,
    ) -> Result<Bet, AppError> {
        let result = validation::require_result(request)?;
        let bet = self
            .storage
            .find_bet(user.id, bet_id)
            .await?
            .ok_or_else(not_found)?;

        let settlement = settle(&bet, result)?;
        let updated = self
            .storage
            .settle_bet(user.id, bet_id, &settlement)
            .await?
            .ok_or_else(not_found)?;

        ::metrics::counter!(metrics::BET_SETTLED).increment(1);
        info!(
            user_id = user.id,
            bet_id,
            is_won = settlement.is_won,
            resettled = bet.is_settled(),
            "bet settled"
        );
        Ok(updated)
    }

    /// Potential and realised payout of one bet
    pub async fn winnings(&self, user: &AuthUser, bet_id: BetId) -> Result<BetWinnings, AppError> {
        let bet = self
            .storage
            .find_bet(user.id, bet_id)
            .await?
            .ok_or_else(not_found)?;

        Ok(BetWinnings {
            einsatz: bet.einsatz,
            quote: bet.quote,
            potential_winnings: potential_winnings(bet.einsatz, bet.quote)?,
            actual_winnings: bet.winnings.unwrap_or(Decimal::ZERO),
            is_won: bet.is_won,
        })
    }

    /// Delete a bet regardless of settlement state
    pub async fn delete_bet(&self, user: &AuthUser, bet_id: BetId) -> Result<(), AppError> {
        if !self.storage.delete_bet(user.id, bet_id).await? {
            return Err(not_found());
        }
        ::metrics::counter!(metrics::BET_DELETED).increment(1);
        info!(user_id = user.id, bet_id, "bet deleted");
        Ok(())
    }
}
