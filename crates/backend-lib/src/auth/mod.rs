// ============================
// crates/backend-lib/src/auth/mod.rs
// ============================
//! Authentication: password policy and hashing, breach lookup, lockout,
//! sessions and the account manager tying them together.

pub mod breach;
pub mod lockout;
pub mod password;
pub mod service;
pub mod session;
pub mod token_generator;

pub use breach::{BreachCheck, DisabledBreachCheck, PwnedPasswordsClient};
pub use lockout::LockoutPolicy;
pub use password::{check_password_policy, PasswordHashing, PolicyViolation};
pub use service::{AccountManager, Clock, SystemClock};
pub use session::{MemorySessionStore, SessionError, SessionStore};
pub use token_generator::generate_session_token;
