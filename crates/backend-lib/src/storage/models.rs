//! Data models for ledger storage.

use std::str::FromStr;

use betledger_common::{AuthUser, Bet, BetId, UserId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::StorageError;

/// A user row, credentials and lockout state included
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
    pub failed_login_attempts: i64,
    pub locked_until: Option<DateTime<Utc>>,
}

impl UserRecord {
    pub fn identity(&self) -> AuthUser {
        AuthUser {
            id: self.id,
            email: self.email.clone(),
        }
    }

    /// Stored counter clamped into `u32`
    pub fn failed_attempts(&self) -> u32 {
        u32::try_from(self.failed_login_attempts.max(0)).unwrap_or(u32::MAX)
    }
}

/// Validated input for a new bet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBet {
    pub einsatz: Decimal,
    pub quote: Decimal,
    pub mannschaft: String,
}

/// Outcome fields, always written together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    pub result: String,
    pub is_won: bool,
    pub winnings: Decimal,
}

/// Raw bet row; decimals are stored as text to keep them exact
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct BetRow {
    pub id: BetId,
    pub user_id: UserId,
    pub einsatz: String,
    pub quote: String,
    pub mannschaft: String,
    pub created_at: DateTime<Utc>,
    pub result: Option<String>,
    pub is_won: Option<bool>,
    pub winnings: Option<String>,
}

fn parse_decimal(column: &str, id: BetId, raw: &str) -> Result<Decimal, StorageError> {
    Decimal::from_str(raw)
        .map_err(|e| StorageError::Corrupt(format!("bet {id} column {column} = {raw:?}: {e}")))
}

impl TryFrom<BetRow> for Bet {
    type Error = StorageError;

    fn try_from(row: BetRow) -> Result<Self, Self::Error> {
        let winnings = row
            .winnings
            .as_deref()
            .map(|w| parse_decimal("winnings", row.id, w))
            .transpose()?;
        Ok(Bet {
            id: row.id,
            user_id: row.user_id,
            einsatz: parse_decimal("einsatz", row.id, &row.einsatz)?,
            quote: parse_decimal("quote", row.id, &row.quote)?,
            mannschaft: row.mannschaft,
            created_at: row.created_at,
            result: row.result,
            is_won: row.is_won,
            winnings,
        })
    }
}
