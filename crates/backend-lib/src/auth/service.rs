// ============================
// crates/backend-lib/src/auth/service.rs
// ============================
//! Account manager: registration and login with failed-attempt lockout.
//!
//! Session handling is left to the caller; both operations return the
//! identity to bind to a fresh session.
use std::sync::Arc;

use betledger_common::{AuthUser, Credentials};
use chrono::{DateTime, Utc};
use tracing::{info, warn};
use zeroize::Zeroizing;

use super::breach::BreachCheck;
use super::lockout::LockoutPolicy;
use super::password::{check_password_policy, PasswordHashing};
use crate::error::AppError;
use crate::metrics;
use crate::storage::{Storage, StorageError};
use crate::validation;

/// Source of the current time, replaceable in tests
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Registration and login
#[derive(Clone)]
pub struct AccountManager {
    storage: Arc<dyn Storage>,
    breach: Arc<dyn BreachCheck>,
    hashing: PasswordHashing,
    lockout: LockoutPolicy,
    clock: Arc<dyn Clock>,
}

impl AccountManager {
    pub fn new(
        storage: Arc<dyn Storage>,
        breach: Arc<dyn BreachCheck>,
        hashing: PasswordHashing,
        lockout: LockoutPolicy,
    ) -> Self {
        Self {
            storage,
            breach,
            hashing,
            lockout,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock used for lockout decisions
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Create an account.
    ///
    /// Checks run in order: presence, policy (all violations), breach corpus,
    /// email uniqueness. The breach lookup fails open.
    pub async fn register(&self, credentials: Credentials) -> Result<AuthUser, AppError> {
        let (email, password) = validation::require_credentials(credentials)?;
        let password = Zeroizing::new(password);

        let violations = check_password_policy(&password);
        if !violations.is_empty() {
            return Err(AppError::WeakPassword(violations));
        }

        if self.breach.is_breached(&password).await {
            info!("registration rejected: password found in breach corpus");
            return Err(AppError::BreachedPassword);
        }

        if self.storage.email_exists(&email).await? {
            warn!("registration rejected: email already registered");
            return Err(AppError::DuplicateEmail);
        }

        let password_hash = self
            .hashing
            .hash_password_blocking(password)
            .await?
            .map_err(|e| AppError::Internal(e.to_string()))?;

        let user = match self.storage.insert_user(&email, &password_hash).await {
            Ok(user) => user,
            // lost a race with a concurrent registration
            Err(StorageError::Conflict(_)) => return Err(AppError::DuplicateEmail),
            Err(e) => return Err(e.into()),
        };

        ::metrics::counter!(metrics::REGISTRATIONS).increment(1);
        info!(user_id = user.id, "user registered");
        Ok(user.identity())
    }

    /// Authenticate a user.
    ///
    /// An unknown email and a wrong password produce the same error. A locked
    /// account is refused before the password is looked at, and the counter is
    /// left untouched.
    pub async fn login(&self, credentials: Credentials) -> Result<AuthUser, AppError> {
        let (email, password) = validation::require_credentials(credentials)?;
        let password = Zeroizing::new(password);

        let Some(user) = self.storage.find_user_by_email(&email).await? else {
            ::metrics::counter!(metrics::LOGIN_FAILURE).increment(1);
            return Err(AppError::InvalidCredentials);
        };

        if LockoutPolicy::is_locked(user.locked_until, self.clock.now()) {
            info!(user_id = user.id, "login refused: account locked");
            return Err(AppError::AccountLocked);
        }

        let valid = self
            .hashing
            .verify_password_blocking(user.password_hash.clone(), password)
            .await?;

        if !valid {
            // read-modify-write; concurrent failures for one account may be miscounted
            let failed = self
                .lockout
                .register_failure(user.failed_attempts(), self.clock.now());
            self.storage
                .record_login_failure(user.id, failed.attempts, failed.locked_until)
                .await?;

            ::metrics::counter!(metrics::LOGIN_FAILURE).increment(1);
            if let Some(until) = failed.locked_until {
                ::metrics::counter!(metrics::LOCKOUTS).increment(1);
                warn!(
                    user_id = user.id,
                    attempts = failed.attempts,
                    locked_until = %until,
                    "account locked after repeated failed logins"
                );
            }
            return Err(AppError::InvalidCredentials);
        }

        self.storage.clear_login_failures(user.id).await?;

        ::metrics::counter!(metrics::LOGIN_SUCCESS).increment(1);
        info!(user_id = user.id, "user logged in");
        Ok(user.identity())
    }
}
