// ============================
// crates/backend-lib/src/auth/session.rs
// ============================
//! Session store: an opaque token bound to an authenticated identity.
use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use betledger_common::AuthUser;
use dashmap::DashMap;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::metrics;

/// Default session TTL, matching a 24 hour cookie lifetime
pub const SESSION_TTL: Duration = Duration::from_secs(60 * 60 * 24);

/// How often expired sessions are swept
pub const CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Session store failure
#[derive(Error, Debug)]
#[error("session store error: {0}")]
pub struct SessionError(pub String);

/// Key-value association between session tokens and identities.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Identity bound to `token`, if the session exists and is live
    async fn get(&self, token: &str) -> Result<Option<AuthUser>, SessionError>;
    /// Bind `token` to `identity`, replacing any previous binding
    async fn set(&self, token: &str, identity: AuthUser) -> Result<(), SessionError>;
    /// Remove the session; unknown tokens are not an error
    async fn destroy(&self, token: &str) -> Result<(), SessionError>;
}

#[derive(Clone)]
struct Session {
    identity: AuthUser,
    expires_at: Instant,
}

/// In-process session store with per-entry expiry
#[derive(Clone)]
pub struct MemorySessionStore {
    sessions: Arc<DashMap<String, Session>>,
    ttl: Duration,
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new(SESSION_TTL)
    }
}

impl MemorySessionStore {
    /// Create a new session store
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            ttl,
        }
    }

    /// Number of stored sessions, including expired ones not yet swept
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Drop every expired session, returning how many were removed
    pub fn remove_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.sessions.len();
        self.sessions.retain(|_, session| now < session.expires_at);
        let removed = before.saturating_sub(self.sessions.len());
        self.report_active();
        removed
    }

    /// Spawn the periodic sweep task
    pub fn spawn_cleanup_task(&self, interval: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let removed = store.remove_expired();
                if removed > 0 {
                    debug!(removed, "expired sessions swept");
                }
            }
        })
    }

    fn report_active(&self) {
        ::metrics::gauge!(metrics::SESSION_ACTIVE).set(self.sessions.len() as f64);
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, token: &str) -> Result<Option<AuthUser>, SessionError> {
        let Some(session) = self.sessions.get(token).map(|s| s.value().clone()) else {
            return Ok(None);
        };
        if Instant::now() >= session.expires_at {
            self.sessions.remove(token);
            self.report_active();
            return Ok(None);
        }
        Ok(Some(session.identity))
    }

    async fn set(&self, token: &str, identity: AuthUser) -> Result<(), SessionError> {
        self.sessions.insert(
            token.to_string(),
            Session {
                identity,
                expires_at: Instant::now() + self.ttl,
            },
        );
        self.report_active();
        Ok(())
    }

    async fn destroy(&self, token: &str) -> Result<(), SessionError> {
        self.sessions.remove(token);
        self.report_active();
        Ok(())
    }
}
