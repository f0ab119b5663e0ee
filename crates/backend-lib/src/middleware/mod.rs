// crates/backend-lib/src/middleware/mod.rs

//! Request plumbing shared by the handlers.

pub mod session;

pub use session::{Authenticated, CurrentSession};
