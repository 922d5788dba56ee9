//! Unit tests for environment configuration loading.

use std::collections::HashMap;
use std::path::PathBuf;

use rstest::rstest;

use wifiqr::config::{Config, DEFAULT_TOKEN_TTL_SECS, MAX_TOKEN_TTL_SECS};
use wifiqr::types::errors::ConfigError;

const KEY: &str = "0123456789abcdef0123456789abcdef";
const SECRET: &str = "a-token-signing-secret-of-32-bytes!!";

fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_lookup(|key| map.get(key).cloned())
}

#[test]
fn test_minimal_config_uses_defaults() {
    let config = load(&[("ENCRYPTION_KEY", KEY), ("JWT_SECRET", SECRET)]).unwrap();
    assert_eq!(config.encryption_key.as_slice(), KEY.as_bytes());
    assert_eq!(config.token_ttl_secs, DEFAULT_TOKEN_TTL_SECS);
    assert_eq!(config.pbkdf2_iterations, 100_000);
    assert_eq!(config.data_dir, PathBuf::from("."));
    assert_eq!(config.database_path(), PathBuf::from(".").join("wifiqr.db"));
    assert!(config.admin_emails.is_empty());
    assert_eq!(config.log_filter, "info");
}

#[test]
fn test_full_config() {
    let config = load(&[
        ("ENCRYPTION_KEY", KEY),
        ("JWT_SECRET", SECRET),
        ("WIFIQR_DATA_DIR", "/var/lib/wifiqr"),
        ("WIFIQR_TOKEN_TTL_SECS", "600"),
        ("WIFIQR_ADMIN_EMAILS", "Root@Example.com, ops@example.com"),
        ("WIFIQR_PBKDF2_ITERATIONS", "2000"),
        ("LOG_LEVEL", "debug"),
    ])
    .unwrap();
    assert_eq!(config.database_path(), PathBuf::from("/var/lib/wifiqr/wifiqr.db"));
    assert_eq!(config.token_ttl_secs, 600);
    assert_eq!(config.admin_emails, vec!["root@example.com", "ops@example.com"]);
    assert_eq!(config.pbkdf2_iterations, 2000);
    assert_eq!(config.log_filter, "debug");
}

#[rstest]
#[case::missing_key(&[("JWT_SECRET", SECRET)], "ENCRYPTION_KEY")]
#[case::empty_key(&[("ENCRYPTION_KEY", ""), ("JWT_SECRET", SECRET)], "ENCRYPTION_KEY")]
#[case::missing_secret(&[("ENCRYPTION_KEY", KEY)], "JWT_SECRET")]
fn test_missing_required_variable(#[case] vars: &[(&str, &str)], #[case] expected: &str) {
    match load(vars) {
        Err(ConfigError::Missing(name)) => assert_eq!(name, expected),
        other => panic!("expected Missing({}), got {:?}", expected, other),
    }
}

#[rstest]
#[case::short_key(&[("ENCRYPTION_KEY", "too-short"), ("JWT_SECRET", SECRET)], "ENCRYPTION_KEY")]
#[case::long_key(&[("ENCRYPTION_KEY", "0123456789abcdef0123456789abcdefX"), ("JWT_SECRET", SECRET)], "ENCRYPTION_KEY")]
#[case::short_secret(&[("ENCRYPTION_KEY", KEY), ("JWT_SECRET", "short")], "JWT_SECRET")]
#[case::zero_ttl(&[("ENCRYPTION_KEY", KEY), ("JWT_SECRET", SECRET), ("WIFIQR_TOKEN_TTL_SECS", "0")], "WIFIQR_TOKEN_TTL_SECS")]
#[case::ttl_over_a_year(&[("ENCRYPTION_KEY", KEY), ("JWT_SECRET", SECRET), ("WIFIQR_TOKEN_TTL_SECS", "31536001")], "WIFIQR_TOKEN_TTL_SECS")]
#[case::ttl_i64_max(&[("ENCRYPTION_KEY", KEY), ("JWT_SECRET", SECRET), ("WIFIQR_TOKEN_TTL_SECS", "9223372036854775807")], "WIFIQR_TOKEN_TTL_SECS")]
#[case::bad_ttl(&[("ENCRYPTION_KEY", KEY), ("JWT_SECRET", SECRET), ("WIFIQR_TOKEN_TTL_SECS", "soon")], "WIFIQR_TOKEN_TTL_SECS")]
#[case::low_iterations(&[("ENCRYPTION_KEY", KEY), ("JWT_SECRET", SECRET), ("WIFIQR_PBKDF2_ITERATIONS", "10")], "WIFIQR_PBKDF2_ITERATIONS")]
fn test_invalid_variable(#[case] vars: &[(&str, &str)], #[case] expected: &str) {
    match load(vars) {
        Err(ConfigError::Invalid { name, .. }) => assert_eq!(name, expected),
        other => panic!("expected Invalid({}), got {:?}", expected, other),
    }
}

#[test]
fn test_ttl_upper_bound_is_accepted() {
    let max = MAX_TOKEN_TTL_SECS.to_string();
    let config = load(&[
        ("ENCRYPTION_KEY", KEY),
        ("JWT_SECRET", SECRET),
        ("WIFIQR_TOKEN_TTL_SECS", max.as_str()),
    ])
    .unwrap();
    assert_eq!(config.token_ttl_secs, MAX_TOKEN_TTL_SECS);
}

#[test]
fn test_debug_output_redacts_secrets() {
    let config = load(&[("ENCRYPTION_KEY", KEY), ("JWT_SECRET", SECRET)]).unwrap();
    let rendered = format!("{:?}", config);
    assert!(!rendered.contains(KEY));
    assert!(!rendered.contains(SECRET));
}
