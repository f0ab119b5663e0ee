// ============================
// crates/backend-lib/src/validation/mod.rs
// ============================
//! Request validation module.
//!
//! Presence and range checks on decoded request bodies. Password policy lives in
//! [`crate::auth::password`] because its violations are reported as a separate
//! error kind.

use betledger_common::{Credentials, NewBetRequest, SettleBetRequest};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::storage::models::NewBet;

/// Possible validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("email and password are required")]
    MissingCredentials,

    #[error("einsatz, quote and mannschaft are required")]
    MissingBetFields,

    #[error("einsatz and quote must be greater than zero")]
    NonPositiveAmount,

    #[error("einsatz or quote exceeds the accepted maximum")]
    AmountTooLarge,

    #[error("result is required")]
    MissingResult,

    #[error("malformed request body: {0}")]
    MalformedBody(String),
}

impl ValidationError {
    /// User-facing message
    pub fn client_message(&self) -> &'static str {
        match self {
            ValidationError::MissingCredentials => "E-Mail und Passwort sind erforderlich",
            ValidationError::MissingBetFields => "Einsatz, Quote und Mannschaft sind erforderlich",
            ValidationError::NonPositiveAmount => "Einsatz und Quote müssen größer als 0 sein",
            ValidationError::AmountTooLarge => "Einsatz oder Quote ist zu groß",
            ValidationError::MissingResult => "Ergebnis ist erforderlich",
            ValidationError::MalformedBody(_) => "Ungültiges Anfrageformat",
        }
    }
}

/// Largest accepted stake
pub const MAX_EINSATZ: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Largest accepted odds
pub const MAX_QUOTE: Decimal = Decimal::from_parts(100_000, 0, 0, false, 0);

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Require both email and password to be present and non-empty.
pub fn require_credentials(credentials: Credentials) -> ValidationResult<(String, String)> {
    match (non_empty(credentials.email), non_empty(credentials.password)) {
        (Some(email), Some(password)) => Ok((email, password)),
        _ => Err(ValidationError::MissingCredentials),
    }
}

/// Validate a bet creation request.
///
/// Missing fields are reported before out-of-range amounts. A zero amount is
/// treated as missing, so it surfaces as [`ValidationError::MissingBetFields`].
/// The team name is stored exactly as sent; only the empty string is missing.
///
/// The upper bounds keep every payout and aggregate within `Decimal` range.
pub fn validate_new_bet(request: NewBetRequest) -> ValidationResult<NewBet> {
    let einsatz = request.einsatz.filter(|v| !v.is_zero());
    let quote = request.quote.filter(|v| !v.is_zero());
    let mannschaft = non_empty(request.mannschaft);

    let (Some(einsatz), Some(quote), Some(mannschaft)) = (einsatz, quote, mannschaft) else {
        return Err(ValidationError::MissingBetFields);
    };

    if einsatz <= Decimal::ZERO || quote <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveAmount);
    }

    if einsatz > MAX_EINSATZ || quote > MAX_QUOTE {
        return Err(ValidationError::AmountTooLarge);
    }

    Ok(NewBet {
        einsatz,
        quote,
        mannschaft,
    })
}

/// Require a non-empty outcome label.
pub fn require_result(request: SettleBetRequest) -> ValidationResult<String> {
    non_empty(request.result).ok_or(ValidationError::MissingResult)
}
