use wifiqr::types::errors::*;

// === CryptoError Tests ===

#[test]
fn crypto_error_display_variants() {
    assert_eq!(
        CryptoError::Configuration("Key must be 32 bytes, got 16".to_string()).to_string(),
        "Cipher configuration error: Key must be 32 bytes, got 16"
    );
    assert_eq!(
        CryptoError::Integrity("ciphertext too short: 3 bytes".to_string()).to_string(),
        "Integrity check failed: ciphertext too short: 3 bytes"
    );
    assert_eq!(
        CryptoError::RandomGeneration("no entropy".to_string()).to_string(),
        "Random generation failed: no entropy"
    );
    assert_eq!(
        CryptoError::Encryption("seal failed".to_string()).to_string(),
        "Encryption failed: seal failed"
    );
}

#[test]
fn crypto_error_implements_error_trait() {
    let err: Box<dyn std::error::Error> = Box::new(CryptoError::Integrity("x".to_string()));
    assert!(err.source().is_none());
}

// === QrCodeError Tests ===

#[test]
fn qr_code_error_display() {
    assert_eq!(
        QrCodeError::Encoding("data too long".to_string()).to_string(),
        "QR encoding failed: data too long"
    );
}

// === CredentialError Tests ===

#[test]
fn credential_error_display_variants() {
    assert_eq!(
        CredentialError::Validation("ssid must be 1 to 32 bytes".to_string()).to_string(),
        "Validation failed: ssid must be 1 to 32 bytes"
    );
    assert_eq!(
        CredentialError::NotFound("c-1".to_string()).to_string(),
        "WiFi credential not found: c-1"
    );
    assert_eq!(
        CredentialError::Unauthorized("c-2".to_string()).to_string(),
        "Unauthorized access to WiFi credential: c-2"
    );
    assert_eq!(
        CredentialError::Storage("disk I/O error".to_string()).to_string(),
        "Credential storage error: disk I/O error"
    );
}

#[test]
fn credential_error_wraps_crypto_transparently() {
    let err: CredentialError = CryptoError::Integrity("bad tag".to_string()).into();
    assert!(matches!(err, CredentialError::Crypto(CryptoError::Integrity(_))));
    assert_eq!(err.to_string(), "Integrity check failed: bad tag");
}

#[test]
fn credential_error_wraps_qr_transparently() {
    let err: CredentialError = QrCodeError::Encoding("too long".to_string()).into();
    assert!(matches!(err, CredentialError::QrCode(_)));
    assert_eq!(err.to_string(), "QR encoding failed: too long");
}

// === AuthError Tests ===

#[test]
fn auth_error_display_variants() {
    assert_eq!(
        AuthError::EmailTaken("a@example.com".to_string()).to_string(),
        "Email already registered: a@example.com"
    );
    assert_eq!(AuthError::InvalidCredentials.to_string(), "Invalid email or password");
    assert_eq!(AuthError::InvalidToken.to_string(), "Invalid or expired token");
    assert_eq!(
        AuthError::Storage("locked".to_string()).to_string(),
        "User storage error: locked"
    );
}

#[test]
fn auth_error_from_user_error() {
    let taken: AuthError = UserError::EmailTaken("a@example.com".to_string()).into();
    assert!(matches!(taken, AuthError::EmailTaken(ref e) if e == "a@example.com"));

    let db: AuthError = UserError::DatabaseError("boom".to_string()).into();
    assert!(matches!(db, AuthError::Storage(ref m) if m == "boom"));
}

// === AdminError Tests ===

#[test]
fn admin_error_display_variants() {
    assert_eq!(AdminError::Forbidden.to_string(), "Admin access required");
    assert_eq!(AdminError::NotFound("u-9".to_string()).to_string(), "User not found: u-9");
    assert_eq!(
        AdminError::Storage("boom".to_string()).to_string(),
        "Admin storage error: boom"
    );
}

#[test]
fn admin_error_from_credential_error_is_storage() {
    let err: AdminError = CredentialError::Storage("boom".to_string()).into();
    assert!(matches!(err, AdminError::Storage(ref m) if m == "Credential storage error: boom"));
}

// === ConfigError Tests ===

#[test]
fn config_error_display_variants() {
    assert_eq!(
        ConfigError::Missing("ENCRYPTION_KEY").to_string(),
        "ENCRYPTION_KEY environment variable is required"
    );
    assert_eq!(
        ConfigError::Invalid {
            name: "JWT_SECRET",
            reason: "too short".to_string()
        }
        .to_string(),
        "Invalid value for JWT_SECRET: too short"
    );
}

// === UserError Tests ===

#[test]
fn user_error_display_variants() {
    assert_eq!(
        UserError::DatabaseError("locked".to_string()).to_string(),
        "User database error: locked"
    );
}
