// ============================
// crates/backend-lib/src/auth/password.rs
// ============================
//! Password hashing, verification and strength policy.
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use thiserror::Error;
use zeroize::Zeroizing;

use crate::config::HashingSettings;

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Characters accepted as "special" by the policy
pub const SPECIAL_CHARACTERS: &str = "!@#$%^&*";

/// A single unmet password rule, reported in policy order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyViolation {
    TooShort,
    MissingUppercase,
    MissingLowercase,
    MissingDigit,
    MissingSpecial,
}

impl PolicyViolation {
    /// User-facing message
    pub fn message(&self) -> &'static str {
        match self {
            PolicyViolation::TooShort => "Passwort muss mindestens 8 Zeichen lang sein",
            PolicyViolation::MissingUppercase => {
                "Passwort muss mindestens einen Großbuchstaben enthalten"
            },
            PolicyViolation::MissingLowercase => {
                "Passwort muss mindestens einen Kleinbuchstaben enthalten"
            },
            PolicyViolation::MissingDigit => "Passwort muss mindestens eine Zahl enthalten",
            PolicyViolation::MissingSpecial => {
                "Passwort muss mindestens ein Sonderzeichen (!@#$%^&*) enthalten"
            },
        }
    }
}

/// Check a password against every policy rule.
///
/// Returns all violations, in rule order. An empty vector means the password is
/// acceptable. Letters and digits are ASCII classes; length counts characters.
pub fn check_password_policy(password: &str) -> Vec<PolicyViolation> {
    let mut violations = Vec::new();

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        violations.push(PolicyViolation::TooShort);
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        violations.push(PolicyViolation::MissingUppercase);
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        violations.push(PolicyViolation::MissingLowercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        violations.push(PolicyViolation::MissingDigit);
    }
    if !password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)) {
        violations.push(PolicyViolation::MissingSpecial);
    }

    violations
}

/// Errors from the hashing backend
#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("invalid argon2 parameters: {0}")]
    Params(argon2::Error),

    #[error("hashing failed: {0}")]
    Hash(argon2::password_hash::Error),
}

/// argon2id hasher with fixed cost parameters.
#[derive(Clone)]
pub struct PasswordHashing {
    params: Params,
}

impl PasswordHashing {
    /// Build a hasher from configuration
    pub fn new(settings: &HashingSettings) -> Result<Self, PasswordError> {
        let params = Params::new(
            settings.memory_cost,
            settings.time_cost,
            settings.parallelism,
            None,
        )
        .map_err(PasswordError::Params)?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a password into a PHC string with a random salt
    pub fn hash_password(&self, plain: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(plain.as_bytes(), &salt)
            .map_err(PasswordError::Hash)?
            .to_string();
        Ok(hash)
    }

    /// Verify a password against a stored hash.
    ///
    /// Parameters are read from the PHC string, so hashes produced with older
    /// cost settings still verify. An unparsable hash never matches.
    pub fn verify_password(&self, hash: &str, plain: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(h) => h,
            Err(_) => return false,
        };
        self.argon2()
            .verify_password(plain.as_bytes(), &parsed_hash)
            .is_ok()
    }

    /// Hash on the blocking pool, wiping the plaintext afterwards
    pub async fn hash_password_blocking(
        &self,
        plain: Zeroizing<String>,
    ) -> Result<Result<String, PasswordError>, tokio::task::JoinError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash_password(&plain)).await
    }

    /// Verify on the blocking pool, wiping the plaintext afterwards
    pub async fn verify_password_blocking(
        &self,
        hash: String,
        plain: Zeroizing<String>,
    ) -> Result<bool, tokio::task::JoinError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.verify_password(&hash, &plain)).await
    }
}
