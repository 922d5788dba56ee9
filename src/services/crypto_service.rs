use std::fmt;
use std::num::NonZeroU32;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use ring::aead::{self, Aad, BoundKey, Nonce, NonceSequence, UnboundKey, AES_256_GCM};
use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::types::errors::CryptoError;

/// AES-256-GCM key length in bytes.
pub const KEY_LENGTH: usize = 32;

/// AES-256-GCM nonce length in bytes.
pub const NONCE_LENGTH: usize = 12;

/// AES-256-GCM authentication tag length in bytes.
pub const TAG_LENGTH: usize = 16;

/// Default PBKDF2 iteration count for login password verifiers.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Salt length in bytes for PBKDF2.
const SALT_LENGTH: usize = 16;

/// PBKDF2-HMAC-SHA256 output length in bytes.
const HASH_LENGTH: usize = 32;

const VERIFIER_SCHEME: &str = "pbkdf2-sha256";

/// Authenticated encryption of a single credential secret.
pub trait CredentialCipherTrait {
    /// Seals `plaintext` under a fresh random nonce and returns
    /// base64(nonce || ciphertext || tag). Empty input yields an empty blob.
    fn encrypt(&self, plaintext: &str) -> Result<String, CryptoError>;

    /// Opens a blob produced by [`CredentialCipherTrait::encrypt`].
    /// Empty input yields an empty string.
    fn decrypt(&self, blob: &str) -> Result<String, CryptoError>;
}

/// A nonce sequence that yields exactly one nonce.
/// Used for one-shot sealing/opening operations.
struct SingleNonce {
    nonce: Option<[u8; NONCE_LENGTH]>,
}

impl SingleNonce {
    fn new(nonce_bytes: [u8; NONCE_LENGTH]) -> Self {
        Self {
            nonce: Some(nonce_bytes),
        }
    }
}

impl NonceSequence for SingleNonce {
    fn advance(&mut self) -> Result<Nonce, ring::error::Unspecified> {
        self.nonce
            .take()
            .map(Nonce::assume_unique_for_key)
            .ok_or(ring::error::Unspecified)
    }
}

/// AES-256-GCM cipher bound to one process-wide key.
///
/// The key is immutable after construction and wiped on drop, so a shared
/// reference can serve any number of concurrent readers.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct CredentialCipher {
    key: [u8; KEY_LENGTH],
    #[zeroize(skip)]
    rng: SystemRandom,
}

impl CredentialCipher {
    /// Creates a cipher from raw key bytes.
    ///
    /// # Errors
    /// Returns `CryptoError::Configuration` unless `key` is exactly 32 bytes.
    pub fn new(key: &[u8]) -> Result<Self, CryptoError> {
        if key.len() != KEY_LENGTH {
            return Err(CryptoError::Configuration(format!(
                "Key must be {} bytes, got {}",
                KEY_LENGTH,
                key.len()
            )));
        }

        let mut key_bytes = [0u8; KEY_LENGTH];
        key_bytes.copy_from_slice(key);

        Ok(Self {
            key: key_bytes,
            rng: SystemRandom::new(),
        })
    }

    fn unbound_key(&self) -> Result<UnboundKey, ring::error::Unspecified> {
        UnboundKey::new(&AES_256_GCM, &self.key)
    }
}

impl fmt::Debug for CredentialCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialCipher")
            .field("key", &"<redacted>")
            .finish()
    }
}

impl CredentialCipherTrait for CredentialCipher {
    fn encrypt(&self, plaintext: &str) -> Result<String, CryptoError> {
        if plaintext.is_empty() {
            return Ok(String::new());
        }

        let mut nonce_bytes = [0u8; NONCE_LENGTH];
        self.rng
            .fill(&mut nonce_bytes)
            .map_err(|_| CryptoError::RandomGeneration("Failed to generate nonce".to_string()))?;

        let unbound_key = self
            .unbound_key()
            .map_err(|_| CryptoError::Encryption("Failed to create encryption key".to_string()))?;
        let mut sealing_key = aead::SealingKey::new(unbound_key, SingleNonce::new(nonce_bytes));

        let mut in_out = plaintext.as_bytes().to_vec();
        sealing_key
            .seal_in_place_append_tag(Aad::empty(), &mut in_out)
            .map_err(|_| CryptoError::Encryption("Encryption operation failed".to_string()))?;

        let mut blob = Vec::with_capacity(NONCE_LENGTH + in_out.len());
        blob.extend_from_slice(&nonce_bytes);
        blob.extend_from_slice(&in_out);
        in_out.zeroize();

        Ok(BASE64.encode(blob))
    }

    fn decrypt(&self, blob: &str) -> Result<String, CryptoError> {
        if blob.is_empty() {
            return Ok(String::new());
        }

        let raw = BASE64
            .decode(blob)
            .map_err(|e| CryptoError::Integrity(format!("invalid ciphertext encoding: {}", e)))?;

        if raw.len() < NONCE_LENGTH {
            return Err(CryptoError::Integrity(format!(
                "ciphertext too short: {} bytes",
                raw.len()
            )));
        }

        let (nonce, sealed) = raw.split_at(NONCE_LENGTH);
        let mut nonce_bytes = [0u8; NONCE_LENGTH];
        nonce_bytes.copy_from_slice(nonce);

        let unbound_key = self
            .unbound_key()
            .map_err(|_| CryptoError::Integrity("Failed to create decryption key".to_string()))?;
        let mut opening_key = aead::OpeningKey::new(unbound_key, SingleNonce::new(nonce_bytes));

        let mut in_out = sealed.to_vec();
        let plaintext = opening_key
            .open_in_place(Aad::empty(), &mut in_out)
            .map_err(|_| {
                CryptoError::Integrity("invalid key or corrupted data".to_string())
            })?
            .to_vec();
        in_out.zeroize();

        String::from_utf8(plaintext)
            .map_err(|_| CryptoError::Integrity("plaintext is not valid UTF-8".to_string()))
    }
}

/// PBKDF2-HMAC-SHA256 password verifiers for account login.
///
/// Verifiers are encoded as `pbkdf2-sha256$<iterations>$<salt>$<hash>` with
/// base64 salt and hash, so the iteration count can change without
/// invalidating existing accounts.
pub struct PasswordHasher {
    iterations: NonZeroU32,
    rng: SystemRandom,
}

impl PasswordHasher {
    /// Creates a hasher using [`PBKDF2_ITERATIONS`].
    pub fn new() -> Self {
        Self::with_iterations(PBKDF2_ITERATIONS)
    }

    /// Creates a hasher with a custom iteration count (clamped to at least 1).
    pub fn with_iterations(iterations: u32) -> Self {
        Self {
            iterations: NonZeroU32::new(iterations).unwrap_or(NonZeroU32::MIN),
            rng: SystemRandom::new(),
        }
    }

    /// Derives a fresh verifier for `password` under a random salt.
    pub fn hash(&self, password: &str) -> Result<String, CryptoError> {
        let mut salt = [0u8; SALT_LENGTH];
        self.rng
            .fill(&mut salt)
            .map_err(|_| CryptoError::RandomGeneration("Failed to generate salt".to_string()))?;

        let mut hash = [0u8; HASH_LENGTH];
        pbkdf2::derive(
            pbkdf2::PBKDF2_HMAC_SHA256,
            self.iterations,
            &salt,
            password.as_bytes(),
            &mut hash,
        );

        Ok(format!(
            "{}${}${}${}",
            VERIFIER_SCHEME,
            self.iterations,
            BASE64.encode(salt),
            BASE64.encode(hash)
        ))
    }

    /// Checks `password` against an encoded verifier in constant time.
    ///
    /// Malformed verifiers never match.
    pub fn verify(&self, password: &str, verifier: &str) -> bool {
        let mut parts = verifier.split('$');
        let (Some(scheme), Some(iterations), Some(salt), Some(hash), None) = (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) else {
            return false;
        };

        if scheme != VERIFIER_SCHEME {
            return false;
        }
        let Some(iterations) = iterations.parse::<u32>().ok().and_then(NonZeroU32::new) else {
            return false;
        };
        let (Ok(salt), Ok(hash)) = (BASE64.decode(salt), BASE64.decode(hash)) else {
            return false;
        };

        pbkdf2::verify(
            pbkdf2::PBKDF2_HMAC_SHA256,
            iterations,
            &salt,
            password.as_bytes(),
            &hash,
        )
        .is_ok()
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
