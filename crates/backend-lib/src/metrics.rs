// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for metric keys
pub const REGISTRATIONS: &str = "auth.register";
pub const LOGIN_SUCCESS: &str = "auth.login.success";
pub const LOGIN_FAILURE: &str = "auth.login.failure";
pub const LOCKOUTS: &str = "auth.lockout";
pub const BREACH_CHECK_UNAVAILABLE: &str = "auth.breach_check.unavailable";
pub const BET_CREATED: &str = "bets.created";
pub const BET_SETTLED: &str = "bets.settled";
pub const BET_DELETED: &str = "bets.deleted";
pub const SESSION_ACTIVE: &str = "session.active";
