// ============================
// crates/backend-lib/src/config.rs
// ============================
//! Configuration management.
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable prefix, nested keys are separated by `__`
pub const ENV_PREFIX: &str = "BETLEDGER_";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// sqlx connection string
    pub database_url: String,
    /// Log level used when `RUST_LOG` is unset
    pub log_level: String,
    /// Emit JSON log lines
    pub log_json: bool,
    pub session: SessionSettings,
    pub lockout: LockoutSettings,
    pub hashing: HashingSettings,
    pub breach: BreachSettings,
}

/// Session cookie settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub ttl_secs: u64,
    pub cookie_name: String,
    /// Add the `Secure` attribute (HTTPS deployments)
    pub secure_cookie: bool,
}

/// Failed-login lockout settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LockoutSettings {
    pub max_failed_attempts: u32,
    pub duration_secs: u64,
}

/// argon2id cost parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HashingSettings {
    pub time_cost: u32,
    /// Memory cost in KiB
    pub memory_cost: u32,
    pub parallelism: u32,
}

/// Breach-corpus lookup settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BreachSettings {
    pub enabled: bool,
    /// Range endpoint, the hash prefix is appended
    pub api_url: String,
    pub timeout_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3001)),
            database_url: "sqlite://data/betledger.db".to_string(),
            log_level: "info".to_string(),
            log_json: false,
            session: SessionSettings::default(),
            lockout: LockoutSettings::default(),
            hashing: HashingSettings::default(),
            breach: BreachSettings::default(),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            ttl_secs: 60 * 60 * 24, // 24 hours
            cookie_name: "betledger.sid".to_string(),
            secure_cookie: false,
        }
    }
}

impl Default for LockoutSettings {
    fn default() -> Self {
        Self {
            max_failed_attempts: 10,
            duration_secs: 30 * 60,
        }
    }
}

impl Default for HashingSettings {
    fn default() -> Self {
        Self {
            time_cost: 2,
            memory_cost: 65536,
            parallelism: 1,
        }
    }
}

impl Default for BreachSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            api_url: "https://api.pwnedpasswords.com/range/".to_string(),
            timeout_ms: 5000,
        }
    }
}

impl SessionSettings {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Settings {
    fn figment() -> Figment {
        Figment::from(Serialized::defaults(Settings::default()))
    }

    /// Load settings from `config.{toml,yaml,json}` in the working directory and the environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::extract(
            Self::figment()
                .merge(Toml::file("config.toml"))
                .merge(Yaml::file("config.yaml"))
                .merge(Json::file("config.json"))
                .merge(Env::prefixed(ENV_PREFIX).split("__")),
        )
    }

    /// Load settings from an explicit file, format chosen by extension, then the environment
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let figment = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::figment().merge(Yaml::file(path)),
            Some("json") => Self::figment().merge(Json::file(path)),
            _ => Self::figment().merge(Toml::file(path)),
        };
        Self::extract(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let settings: Settings = figment.extract().map_err(Box::new)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the server cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::Invalid(format!(
                "log_level must be one of {LOG_LEVELS:?}, got {:?}",
                self.log_level
            )));
        }
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::Invalid("database_url must not be empty".into()));
        }
        if self.session.ttl_secs == 0 {
            return Err(ConfigError::Invalid("session.ttl_secs must be positive".into()));
        }
        if self.session.cookie_name.is_empty()
            || !self
                .session
                .cookie_name
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b"._-".contains(&b))
        {
            return Err(ConfigError::Invalid(
                "session.cookie_name must be a non-empty token".into(),
            ));
        }
        if self.lockout.max_failed_attempts == 0 {
            return Err(ConfigError::Invalid(
                "lockout.max_failed_attempts must be positive".into(),
            ));
        }
        if self.lockout.duration_secs == 0 || self.lockout.duration_secs > 60 * 60 * 24 * 365 {
            return Err(ConfigError::Invalid(
                "lockout.duration_secs must be between 1 second and 1 year".into(),
            ));
        }
        if self.hashing.time_cost == 0 || self.hashing.parallelism == 0 {
            return Err(ConfigError::Invalid(
                "hashing.time_cost and hashing.parallelism must be positive".into(),
            ));
        }
        if self.hashing.memory_cost < 8 * self.hashing.parallelism {
            return Err(ConfigError::Invalid(
                "hashing.memory_cost must be at least 8 * parallelism KiB".into(),
            ));
        }
        if self.breach.enabled && self.breach.timeout_ms == 0 {
            return Err(ConfigError::Invalid("breach.timeout_ms must be positive".into()));
        }
        Ok(())
    }
}
