// ============================
// crates/backend-lib/src/auth/breach.rs
// ============================
//! Breach-corpus lookup using the k-anonymity range API.
//!
//! Only the first five hex characters of the SHA-1 digest leave the process.
//! The service answers with every known suffix for that prefix, one
//! `SUFFIX:COUNT` pair per line, and the match happens locally.
use std::time::Duration;

use async_trait::async_trait;
use sha1::{Digest, Sha1};
use tracing::warn;

use crate::config::BreachSettings;
use crate::metrics;

/// Length of the digest prefix sent to the service
pub const PREFIX_LEN: usize = 5;

/// Answers whether a password appears in a public breach corpus.
///
/// Implementations fail open: an unavailable service yields `false`.
#[async_trait]
pub trait BreachCheck: Send + Sync {
    async fn is_breached(&self, password: &str) -> bool;
}

/// Split the upper-case SHA-1 hex digest of `password` into prefix and suffix.
pub fn digest_parts(password: &str) -> (String, String) {
    let digest = hex::encode_upper(Sha1::digest(password.as_bytes()));
    let suffix = digest[PREFIX_LEN..].to_string();
    let mut prefix = digest;
    prefix.truncate(PREFIX_LEN);
    (prefix, suffix)
}

/// Whether a range response body lists `suffix`.
pub fn range_contains(body: &str, suffix: &str) -> bool {
    body.lines()
        .filter_map(|line| line.trim().split(':').next())
        .any(|candidate| candidate.eq_ignore_ascii_case(suffix))
}

/// Client for a Pwned-Passwords compatible range endpoint.
pub struct PwnedPasswordsClient {
    client: reqwest::Client,
    api_url: String,
}

impl PwnedPasswordsClient {
    pub fn new(settings: &BreachSettings) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(settings.timeout_ms))
            .user_agent(concat!("betledger/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            api_url: settings.api_url.clone(),
        })
    }

    async fn fetch_range(&self, prefix: &str) -> reqwest::Result<String> {
        self.client
            .get(format!("{}{}", self.api_url, prefix))
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }
}

#[async_trait]
impl BreachCheck for PwnedPasswordsClient {
    async fn is_breached(&self, password: &str) -> bool {
        let (prefix, suffix) = digest_parts(password);
        match self.fetch_range(&prefix).await {
            Ok(body) => range_contains(&body, &suffix),
            Err(e) => {
                ::metrics::counter!(metrics::BREACH_CHECK_UNAVAILABLE).increment(1);
                warn!(error = %e, "breach check unavailable, treating password as not breached");
                false
            },
        }
    }
}

/// Breach check used when lookups are turned off.
pub struct DisabledBreachCheck;

#[async_trait]
impl BreachCheck for DisabledBreachCheck {
    async fn is_breached(&self, _password: &str) -> bool {
        false
    }
}
