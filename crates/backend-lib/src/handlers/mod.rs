// ============================
// crates/backend-lib/src/handlers/mod.rs
// ============================
//! HTTP handlers for the JSON API.

pub mod auth;
pub mod bets;
pub mod health;
