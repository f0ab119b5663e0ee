// ============================
// betledger-backend/src/lib.rs
// ============================
//! Core of the betting-ledger server: accounts, sessions and the bet ledger
//! behind a JSON HTTP API.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod ledger;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod router;
pub mod storage;
pub mod validation;

use std::sync::Arc;

use crate::auth::{
    AccountManager, BreachCheck, DisabledBreachCheck, LockoutPolicy, MemorySessionStore,
    PasswordHashing, PwnedPasswordsClient, SessionStore,
};
use crate::config::Settings;
use crate::ledger::BetLedger;
use crate::storage::Storage;

pub use router::create_router;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Registration and login
    pub accounts: AccountManager,
    /// Bet operations
    pub ledger: BetLedger,
    /// Session token store
    pub sessions: Arc<dyn SessionStore>,
    /// Settings the server was started with
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Assemble the state from already constructed collaborators
    pub fn new(
        settings: Settings,
        storage: Arc<dyn Storage>,
        breach: Arc<dyn BreachCheck>,
        sessions: Arc<dyn SessionStore>,
    ) -> anyhow::Result<Self> {
        let hashing = PasswordHashing::new(&settings.hashing)?;
        let lockout = LockoutPolicy::from(&settings.lockout);
        let accounts = AccountManager::new(storage.clone(), breach, hashing, lockout);

        Ok(Self {
            accounts,
            ledger: BetLedger::new(storage),
            sessions,
            settings: Arc::new(settings),
        })
    }

    /// Build the state for `settings` with the breach client it asks for
    /// and an in-memory session store.
    ///
    /// The session store is returned as well so the caller can run its sweep.
    pub fn from_settings(
        settings: Settings,
        storage: Arc<dyn Storage>,
    ) -> anyhow::Result<(Self, MemorySessionStore)> {
        let breach: Arc<dyn BreachCheck> = if settings.breach.enabled {
            Arc::new(PwnedPasswordsClient::new(&settings.breach)?)
        } else {
            Arc::new(DisabledBreachCheck)
        };
        let sessions = MemorySessionStore::new(settings.session.ttl());
        let state = Self::new(settings, storage, breach, Arc::new(sessions.clone()))?;
        Ok((state, sessions))
    }
}
