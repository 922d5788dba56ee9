//! Authentication for WiFi QR.
//!
//! Registration and login against the user store, plus HMAC-SHA256 signed
//! session tokens of the form `base64url(claims).base64url(tag)`.

use std::time::{SystemTime, UNIX_EPOCH};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD as B64URL, Engine as _};
use ring::hmac;
use tracing::{info, warn};
use uuid::Uuid;

use crate::managers::user_store::UserStoreTrait;
use crate::services::crypto_service::PasswordHasher;
use crate::types::credential::Caller;
use crate::types::errors::AuthError;
use crate::types::user::{AuthResponse, Claims, Role, User};

/// Maximum accepted email length in bytes.
pub const EMAIL_MAX_LENGTH: usize = 255;

/// Accepted account password length range, in characters.
pub const PASSWORD_MIN_LENGTH: usize = 8;
pub const PASSWORD_MAX_LENGTH: usize = 128;

fn now_ts() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

/// Issues and verifies signed session tokens.
pub struct TokenSigner {
    key: hmac::Key,
    ttl_secs: i64,
}

impl TokenSigner {
    pub fn new(secret: &[u8], ttl_secs: i64) -> Self {
        Self {
            key: hmac::Key::new(hmac::HMAC_SHA256, secret),
            ttl_secs,
        }
    }

    /// Signs a token for `user` valid from `now` for the configured lifetime.
    pub fn issue(&self, user: &User, now: i64) -> Result<String, AuthError> {
        let claims = Claims {
            sub: user.id.clone(),
            email: user.email.clone(),
            role: user.role,
            iat: now,
            exp: now.saturating_add(self.ttl_secs),
        };
        let payload = serde_json::to_vec(&claims)
            .map_err(|e| AuthError::Validation(format!("failed to encode claims: {}", e)))?;
        let payload = B64URL.encode(payload);
        let tag = hmac::sign(&self.key, payload.as_bytes());
        Ok(format!("{}.{}", payload, B64URL.encode(tag.as_ref())))
    }

    /// Checks the signature and expiry of `token` and returns its claims.
    pub fn verify(&self, token: &str, now: i64) -> Result<Claims, AuthError> {
        let (payload, tag) = token.split_once('.').ok_or(AuthError::InvalidToken)?;
        let tag = B64URL.decode(tag).map_err(|_| AuthError::InvalidToken)?;
        hmac::verify(&self.key, payload.as_bytes(), &tag).map_err(|_| AuthError::InvalidToken)?;

        let raw = B64URL.decode(payload).map_err(|_| AuthError::InvalidToken)?;
        let claims: Claims = serde_json::from_slice(&raw).map_err(|_| AuthError::InvalidToken)?;
        if claims.exp <= now {
            return Err(AuthError::InvalidToken);
        }
        Ok(claims)
    }
}

/// Trait defining authentication operations.
pub trait AuthServiceTrait {
    fn register(&self, email: &str, password: &str) -> Result<AuthResponse, AuthError>;
    fn login(&self, email: &str, password: &str) -> Result<AuthResponse, AuthError>;
    /// Resolves a session token to the caller it represents. The role is
    /// re-read from the store so demotions and deletions apply immediately.
    fn authenticate(&self, token: &str) -> Result<Caller, AuthError>;
}

/// Authentication service over any user store.
pub struct AuthService<'a, S: UserStoreTrait> {
    store: S,
    hasher: &'a PasswordHasher,
    signer: &'a TokenSigner,
    admin_emails: &'a [String],
}

impl<'a, S: UserStoreTrait> AuthService<'a, S> {
    pub fn new(
        store: S,
        hasher: &'a PasswordHasher,
        signer: &'a TokenSigner,
        admin_emails: &'a [String],
    ) -> Self {
        Self {
            store,
            hasher,
            signer,
            admin_emails,
        }
    }

    fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }

    fn validate_email(email: &str) -> Result<(), AuthError> {
        if email.len() > EMAIL_MAX_LENGTH {
            return Err(AuthError::Validation(format!(
                "email must be at most {} bytes",
                EMAIL_MAX_LENGTH
            )));
        }
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
                Ok(())
            }
            _ => Err(AuthError::Validation("invalid email address".to_string())),
        }
    }

    fn validate_password(password: &str) -> Result<(), AuthError> {
        let len = password.chars().count();
        if !(PASSWORD_MIN_LENGTH..=PASSWORD_MAX_LENGTH).contains(&len) {
            return Err(AuthError::Validation(format!(
                "password must be {} to {} characters",
                PASSWORD_MIN_LENGTH, PASSWORD_MAX_LENGTH
            )));
        }
        Ok(())
    }

    fn respond(&self, user: &User) -> Result<AuthResponse, AuthError> {
        Ok(AuthResponse {
            token: self.signer.issue(user, now_ts())?,
            user: user.to_public(),
        })
    }
}

impl<'a, S: UserStoreTrait> AuthServiceTrait for AuthService<'a, S> {
    fn register(&self, email: &str, password: &str) -> Result<AuthResponse, AuthError> {
        let email = Self::normalize_email(email);
        Self::validate_email(&email)?;
        Self::validate_password(password)?;

        if self.store.find_by_email(&email)?.is_some() {
            return Err(AuthError::EmailTaken(email));
        }

        let role = if self.admin_emails.iter().any(|e| e == &email) {
            Role::Admin
        } else {
            Role::User
        };

        let now = now_ts();
        let user = User {
            id: Uuid::new_v4().to_string(),
            email,
            password_hash: self.hasher.hash(password)?,
            role,
            created_at: now,
            updated_at: now,
        };
        self.store.insert(&user)?;
        info!(user_id = %user.id, role = %user.role, "user registered");

        self.respond(&user)
    }

    fn login(&self, email: &str, password: &str) -> Result<AuthResponse, AuthError> {
        let email = Self::normalize_email(email);
        let user = match self.store.find_by_email(&email)? {
            Some(user) if self.hasher.verify(password, &user.password_hash) => user,
            _ => {
                warn!("login rejected");
                return Err(AuthError::InvalidCredentials);
            }
        };
        self.respond(&user)
    }

    fn authenticate(&self, token: &str) -> Result<Caller, AuthError> {
        let claims = self.signer.verify(token, now_ts())?;
        let user = self
            .store
            .find_by_id(&claims.sub)?
            .ok_or(AuthError::InvalidToken)?;
        Ok(Caller {
            user_id: user.id.clone(),
            is_admin: user.is_admin(),
        })
    }
}
