//! Bet settlement arithmetic.
use betledger_common::Bet;
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

use crate::storage::Settlement;

/// Outcome label that marks a bet as won, compared case-insensitively
pub const WON_KEYWORD: &str = "gewonnen";

/// Decimal places kept for monetary amounts
pub const MONEY_SCALE: u32 = 2;

/// Round a monetary amount to cents, midpoint away from zero
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// A monetary result fell outside the range `Decimal` can represent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("money arithmetic overflowed")]
pub struct MoneyOverflow;

/// `einsatz * quote`, independent of settlement state
pub fn potential_winnings(einsatz: Decimal, quote: Decimal) -> Result<Decimal, MoneyOverflow> {
    einsatz.checked_mul(quote).map(round_money).ok_or(MoneyOverflow)
}

/// Compute the outcome fields for recording `result` on `bet`.
///
/// Any label other than the won keyword counts as a loss. The label itself is
/// stored verbatim.
pub fn settle(bet: &Bet, result: String) -> Result<Settlement, MoneyOverflow> {
    let is_won = result.to_lowercase() == WON_KEYWORD;
    let winnings = if is_won {
        potential_winnings(bet.einsatz, bet.quote)?
    } else {
        Decimal::ZERO
    };
    Ok(Settlement {
        result,
        is_won,
        winnings,
    })
}
