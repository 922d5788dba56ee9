//! Process configuration for WiFi QR.
//!
//! Read once from the environment at startup. Any missing or malformed
//! required value is a [`ConfigError`] and the process must not serve.

use std::path::PathBuf;

use zeroize::Zeroizing;

use crate::services::crypto_service::{KEY_LENGTH, PBKDF2_ITERATIONS};
use crate::types::errors::ConfigError;

/// Database file name inside the data directory.
pub const DATABASE_FILE: &str = "wifiqr.db";

/// Minimum length of the session token signing secret, in bytes.
pub const TOKEN_SECRET_MIN_LENGTH: usize = 32;

/// Default session token lifetime: 24 hours.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

/// Longest accepted session token lifetime: 365 days.
pub const MAX_TOKEN_TTL_SECS: i64 = 365 * 24 * 60 * 60;

/// Lowest accepted PBKDF2 iteration count.
pub const MIN_PBKDF2_ITERATIONS: u32 = 1_000;

#[derive(Clone)]
pub struct Config {
    /// AES-256 key, exactly [`KEY_LENGTH`] bytes.
    pub encryption_key: Zeroizing<Vec<u8>>,
    /// HMAC secret for session tokens.
    pub token_secret: Zeroizing<Vec<u8>>,
    pub token_ttl_secs: i64,
    pub data_dir: PathBuf,
    /// Emails granted the admin role when they register. Lower-cased.
    pub admin_emails: Vec<String>,
    pub pbkdf2_iterations: u32,
    /// `tracing_subscriber::EnvFilter` directive.
    pub log_filter: String,
}

impl Config {
    /// Loads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated as absent.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let encryption_key = get("ENCRYPTION_KEY").ok_or(ConfigError::Missing("ENCRYPTION_KEY"))?;
        if encryption_key.len() != KEY_LENGTH {
            return Err(ConfigError::Invalid {
                name: "ENCRYPTION_KEY",
                reason: format!(
                    "must be exactly {} bytes (256 bits) for AES-256, got {}",
                    KEY_LENGTH,
                    encryption_key.len()
                ),
            });
        }

        let token_secret = get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        if token_secret.len() < TOKEN_SECRET_MIN_LENGTH {
            return Err(ConfigError::Invalid {
                name: "JWT_SECRET",
                reason: format!("must be at least {} bytes long", TOKEN_SECRET_MIN_LENGTH),
            });
        }

        let token_ttl_secs = match get("WIFIQR_TOKEN_TTL_SECS") {
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|ttl| (1..=MAX_TOKEN_TTL_SECS).contains(ttl))
                .ok_or_else(|| ConfigError::Invalid {
                    name: "WIFIQR_TOKEN_TTL_SECS",
                    reason: format!(
                        "expected an integer from 1 to {}, got {:?}",
                        MAX_TOKEN_TTL_SECS, raw
                    ),
                })?,
            None => DEFAULT_TOKEN_TTL_SECS,
        };

        let pbkdf2_iterations = match get("WIFIQR_PBKDF2_ITERATIONS") {
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|n| *n >= MIN_PBKDF2_ITERATIONS)
                .ok_or_else(|| ConfigError::Invalid {
                    name: "WIFIQR_PBKDF2_ITERATIONS",
                    reason: format!("expected an integer >= {}, got {:?}", MIN_PBKDF2_ITERATIONS, raw),
                })?,
            None => PBKDF2_ITERATIONS,
        };

        let data_dir = get("WIFIQR_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        let admin_emails = get("WIFIQR_ADMIN_EMAILS")
            .map(|raw| parse_list(&raw))
            .unwrap_or_default();

        let log_filter = get("LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        Ok(Self {
            encryption_key: Zeroizing::new(encryption_key.into_bytes()),
            token_secret: Zeroizing::new(token_secret.into_bytes()),
            token_ttl_secs,
            data_dir,
            admin_emails,
            pbkdf2_iterations,
            log_filter,
        })
    }

    /// Full path of the SQLite database file.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("encryption_key", &"<redacted>")
            .field("token_secret", &"<redacted>")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("data_dir", &self.data_dir)
            .field("admin_emails", &self.admin_emails)
            .field("pbkdf2_iterations", &self.pbkdf2_iterations)
            .field("log_filter", &self.log_filter)
            .finish()
    }
}

/// Splits a comma-separated list, trimming and lower-casing entries and
/// dropping empty ones.
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|item| item.trim().to_lowercase())
        .filter(|item| !item.is_empty())
        .collect()
}
