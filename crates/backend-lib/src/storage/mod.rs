// ============================
// crates/backend-lib/src/storage/mod.rs
// ============================
//! Storage abstraction with a SQLite implementation.
//!
//! Every bet query takes the owning user id, so rows belonging to other users
//! are indistinguishable from rows that do not exist.

pub mod models;
mod sqlite;


use async_trait::async_trait;
use betledger_common::{Bet, BetId, UserId};
use chrono::{DateTime, Utc};
use thiserror::Error;

pub use models::{NewBet, Settlement, UserRecord};
pub use sqlite::SqliteStorage;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Query error: {0}")]
    Query(String),

    /// A uniqueness constraint rejected the write
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A stored row could not be decoded
    #[error("Corrupt row: {0}")]
    Corrupt(String),
}

impl From<sqlx::Error> for StorageError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StorageError::Conflict(db.message().to_string())
            },
            _ => StorageError::Query(e.to_string()),
        }
    }
}

/// Trait for storage backends
#[async_trait]
pub trait Storage: Send + Sync {
    /// Whether a user with exactly this email exists
    async fn email_exists(&self, email: &str) -> Result<bool, StorageError>;

    /// Insert a user; a taken email yields [`StorageError::Conflict`]
    async fn insert_user(&self, email: &str, password_hash: &str)
        -> Result<UserRecord, StorageError>;

    /// Look a user up by email, including credentials and lockout state
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StorageError>;

    /// Persist the failed-login counter and lock expiry
    async fn record_login_failure(
        &self,
        user_id: UserId,
        attempts: u32,
        locked_until: Option<DateTime<Utc>>,
    ) -> Result<(), StorageError>;

    /// Reset the counter and clear any lock
    async fn clear_login_failures(&self, user_id: UserId) -> Result<(), StorageError>;

    /// Insert an open bet owned by `user_id`
    async fn insert_bet(&self, user_id: UserId, bet: &NewBet) -> Result<Bet, StorageError>;

    /// All bets of `user_id`, most recent first
    async fn list_bets(&self, user_id: UserId) -> Result<Vec<Bet>, StorageError>;

    /// One bet, if owned by `user_id`
    async fn find_bet(&self, user_id: UserId, bet_id: BetId) -> Result<Option<Bet>, StorageError>;

    /// Write an outcome to a bet owned by `user_id`, returning the updated row
    async fn settle_bet(
        &self,
        user_id: UserId,
        bet_id: BetId,
        settlement: &Settlement,
    ) -> Result<Option<Bet>, StorageError>;

    /// Delete a bet owned by `user_id`; `false` if nothing matched
    async fn delete_bet(&self, user_id: UserId, bet_id: BetId) -> Result<bool, StorageError>;
}
