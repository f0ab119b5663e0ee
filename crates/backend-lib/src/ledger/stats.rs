//! Aggregate statistics over a user's bets.
use betledger_common::{Bet, Statistics};
use rust_decimal::{Decimal, RoundingStrategy};

use super::settlement::MoneyOverflow;

/// Summarise a bet set.
///
/// Open bets add to the stake but contribute nothing to winnings. With zero
/// total stake the percentage is reported as `"0.00"`.
pub fn compute_statistics(bets: &[Bet]) -> Result<Statistics, MoneyOverflow> {
    let total_stake = checked_sum(bets.iter().map(|b| b.einsatz))?;
    let total_winnings = checked_sum(bets.iter().filter_map(|b| b.winnings))?;
    let profit = total_winnings.checked_sub(total_stake).ok_or(MoneyOverflow)?;

    let percentage = if total_stake > Decimal::ZERO {
        // divide before scaling so large profits stay representable
        profit
            .checked_div(total_stake)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .ok_or(MoneyOverflow)?
    } else {
        Decimal::ZERO
    };

    Ok(Statistics {
        total_bets: bets.len(),
        total_stake,
        total_winnings,
        profit,
        profit_percentage: format_two_decimals(percentage),
    })
}

fn checked_sum(mut amounts: impl Iterator<Item = Decimal>) -> Result<Decimal, MoneyOverflow> {
    amounts.try_fold(Decimal::ZERO, |acc, amount| acc.checked_add(amount).ok_or(MoneyOverflow))
}

fn format_two_decimals(value: Decimal) -> String {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}
