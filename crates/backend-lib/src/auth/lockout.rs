// ============================
// crates/backend-lib/src/auth/lockout.rs
// ============================
//! Failed-login counting and temporary lockout.
//!
//! A lock is never lifted explicitly: it is a stored expiry time compared
//! against the clock on each login attempt.
use chrono::{DateTime, Duration, Utc};

use crate::config::LockoutSettings;

/// Default number of failed attempts before lockout
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Default lockout duration in seconds (30 minutes)
pub const DEFAULT_LOCKOUT_SECS: i64 = 30 * 60;

/// Counter state to persist after a wrong password
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailedLogin {
    pub attempts: u32,
    pub locked_until: Option<DateTime<Utc>>,
}

impl FailedLogin {
    pub fn engaged_lock(&self) -> bool {
        self.locked_until.is_some()
    }
}

/// Lockout thresholds
#[derive(Debug, Clone, Copy)]
pub struct LockoutPolicy {
    max_attempts: u32,
    duration: Duration,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, Duration::seconds(DEFAULT_LOCKOUT_SECS))
    }
}

impl From<&LockoutSettings> for LockoutPolicy {
    fn from(settings: &LockoutSettings) -> Self {
        Self::new(
            settings.max_failed_attempts,
            Duration::seconds(i64::try_from(settings.duration_secs).unwrap_or(i64::MAX / 1000)),
        )
    }
}

impl LockoutPolicy {
    pub fn new(max_attempts: u32, duration: Duration) -> Self {
        Self {
            max_attempts,
            duration,
        }
    }

    /// Whether a login attempt at `now` must be refused outright
    pub fn is_locked(locked_until: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        locked_until.is_some_and(|until| now < until)
    }

    /// State after one more wrong password on top of `previous_attempts`.
    ///
    /// Once the threshold is reached every further failure re-arms the lock
    /// from `now`; the counter itself is only cleared by a successful login.
    pub fn register_failure(&self, previous_attempts: u32, now: DateTime<Utc>) -> FailedLogin {
        let attempts = previous_attempts.saturating_add(1);
        let locked_until = (attempts >= self.max_attempts).then(|| now + self.duration);
        FailedLogin {
            attempts,
            locked_until,
        }
    }
}
