use thiserror::Error;

// === CryptoError ===

/// Errors raised by the credential cipher.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The cipher was constructed with an unusable key. Fatal at startup.
    #[error("Cipher configuration error: {0}")]
    Configuration(String),
    /// Ciphertext failed authentication: tampered data or the wrong key.
    #[error("Integrity check failed: {0}")]
    Integrity(String),
    /// The system random source could not produce a nonce or salt.
    #[error("Random generation failed: {0}")]
    RandomGeneration(String),
    /// Sealing the plaintext failed.
    #[error("Encryption failed: {0}")]
    Encryption(String),
}

// === QrCodeError ===

/// Errors raised while building a QR payload.
#[derive(Debug, Error)]
pub enum QrCodeError {
    /// The bitmap could not be generated or serialized for the given input.
    #[error("QR encoding failed: {0}")]
    Encoding(String),
}

// === CredentialError ===

/// Errors returned by the credential access service and its store.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// Caller-supplied data violates a stated constraint.
    #[error("Validation failed: {0}")]
    Validation(String),
    /// No credential exists with the given id.
    #[error("WiFi credential not found: {0}")]
    NotFound(String),
    /// The caller may not access an existing credential.
    #[error("Unauthorized access to WiFi credential: {0}")]
    Unauthorized(String),
    /// The persistence layer failed.
    #[error("Credential storage error: {0}")]
    Storage(String),
    #[error(transparent)]
    Crypto(#[from] CryptoError),
    #[error(transparent)]
    QrCode(#[from] QrCodeError),
}

// === AuthError ===

/// Errors related to registration, login and session tokens.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email or password does not satisfy the registration rules.
    #[error("Validation failed: {0}")]
    Validation(String),
    /// A user with this email already exists.
    #[error("Email already registered: {0}")]
    EmailTaken(String),
    /// Unknown email or wrong password. Deliberately indistinguishable.
    #[error("Invalid email or password")]
    InvalidCredentials,
    /// The session token is malformed, forged or expired.
    #[error("Invalid or expired token")]
    InvalidToken,
    /// The persistence layer failed.
    #[error("User storage error: {0}")]
    Storage(String),
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

// === AdminError ===

/// Errors related to administrator-only operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// The caller is not an administrator.
    #[error("Admin access required")]
    Forbidden,
    /// The referenced user does not exist.
    #[error("User not found: {0}")]
    NotFound(String),
    /// The persistence layer failed.
    #[error("Admin storage error: {0}")]
    Storage(String),
}

// === ConfigError ===

/// Errors raised while loading process configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is absent or empty.
    #[error("{0} environment variable is required")]
    Missing(&'static str),
    /// A variable is present but unusable.
    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

// === UserError ===

/// Errors raised by the user store.
#[derive(Debug, Error)]
pub enum UserError {
    /// The unique email index rejected the insert.
    #[error("Email already registered: {0}")]
    EmailTaken(String),
    /// Database operation failed.
    #[error("User database error: {0}")]
    DatabaseError(String),
}

impl From<UserError> for AuthError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::EmailTaken(email) => AuthError::EmailTaken(email),
            UserError::DatabaseError(msg) => AuthError::Storage(msg),
        }
    }
}

impl From<UserError> for AdminError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::EmailTaken(email) => {
                AdminError::Storage(format!("unexpected duplicate email: {}", email))
            }
            UserError::DatabaseError(msg) => AdminError::Storage(msg),
        }
    }
}

impl From<CredentialError> for AdminError {
    fn from(err: CredentialError) -> Self {
        AdminError::Storage(err.to_string())
    }
}
