//! SQLite database for the betting ledger.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use betledger_common::{Bet, BetId, UserId};
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use tracing::info;

use super::models::{BetRow, NewBet, Settlement, UserRecord};
use super::{Storage, StorageError};

const USER_COLUMNS: &str = "id, email, password_hash, failed_login_attempts, locked_until";
const BET_COLUMNS: &str =
    "id, user_id, einsatz, quote, mannschaft, created_at, result, is_won, winnings";

#[derive(Clone)]
pub struct SqliteStorage {
    pool: Pool<Sqlite>,
}

impl SqliteStorage {
    /// Connect using a sqlx URL such as `sqlite://data/betledger.db`
    /// and run pending migrations. The database file is created if missing.
    pub async fn connect(url: &str) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| StorageError::Connection(e.to_string()))?
            .create_if_missing(true);

        if let Some(parent) = options.get_filename().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| StorageError::Io(e.to_string()))?;
            }
        }

        Self::open_with(options, 5).await
    }

    /// Private in-memory database, used by tests
    pub async fn open_in_memory() -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        // every pooled connection would otherwise see its own empty database
        Self::open_with(options, 1).await
    }

    async fn open_with(
        options: SqliteConnectOptions,
        max_connections: u32,
    ) -> Result<Self, StorageError> {
        let options = options
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let db = Self { pool };
        db.run_migrations().await?;
        Ok(db)
    }

    async fn run_migrations(&self) -> Result<(), StorageError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StorageError::Migration(e.to_string()))?;

        info!("database migrations complete");
        Ok(())
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    async fn get_bet_row(&self, user_id: UserId, bet_id: BetId) -> Result<Option<Bet>, StorageError> {
        sqlx::query_as::<_, BetRow>(&format!(
            "SELECT {BET_COLUMNS} FROM bets WHERE id = ? AND user_id = ?"
        ))
        .bind(bet_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .map(Bet::try_from)
        .transpose()
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn email_exists(&self, email: &str) -> Result<bool, StorageError> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    async fn insert_user(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<UserRecord, StorageError> {
        let result = sqlx::query(
            "INSERT INTO users (email, password_hash, failed_login_attempts, created_at) VALUES (?, ?, 0, ?)",
        )
        .bind(email)
        .bind(password_hash)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        sqlx::query_as::<_, UserRecord>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::from)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StorageError> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn record_login_failure(
        &self,
        user_id: UserId,
        attempts: u32,
        locked_until: Option<DateTime<Utc>>,
    ) -> Result<(), StorageError> {
        sqlx::query("UPDATE users SET failed_login_attempts = ?, locked_until = ? WHERE id = ?")
            .bind(i64::from(attempts))
            .bind(locked_until)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn clear_login_failures(&self, user_id: UserId) -> Result<(), StorageError> {
        sqlx::query("UPDATE users SET failed_login_attempts = 0, locked_until = NULL WHERE id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn insert_bet(&self, user_id: UserId, bet: &NewBet) -> Result<Bet, StorageError> {
        let result = sqlx::query(
            "INSERT INTO bets (user_id, einsatz, quote, mannschaft, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(bet.einsatz.to_string())
        .bind(bet.quote.to_string())
        .bind(&bet.mannschaft)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.get_bet_row(user_id, id)
            .await?
            .ok_or_else(|| StorageError::Query(format!("bet {id} vanished after insert")))
    }

    async fn list_bets(&self, user_id: UserId) -> Result<Vec<Bet>, StorageError> {
        sqlx::query_as::<_, BetRow>(&format!(
            "SELECT {BET_COLUMNS} FROM bets WHERE user_id = ? ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(Bet::try_from)
        .collect()
    }

    async fn find_bet(&self, user_id: UserId, bet_id: BetId) -> Result<Option<Bet>, StorageError> {
        self.get_bet_row(user_id, bet_id).await
    }

    async fn settle_bet(
        &self,
        user_id: UserId,
        bet_id: BetId,
        settlement: &Settlement,
    ) -> Result<Option<Bet>, StorageError> {
        let result = sqlx::query(
            "UPDATE bets SET result = ?, is_won = ?, winnings = ? WHERE id = ? AND user_id = ?",
        )
        .bind(&settlement.result)
        .bind(settlement.is_won)
        .bind(settlement.winnings.to_string())
        .bind(bet_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_bet_row(user_id, bet_id).await
    }

    async fn delete_bet(&self, user_id: UserId, bet_id: BetId) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM bets WHERE id = ? AND user_id = ?")
            .bind(bet_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
