//! Credential Access Service for WiFi QR.
//!
//! The only gate between callers and stored credentials. Creation runs
//! validate -> encrypt -> encode -> persist; every read or delete of a single
//! record goes through the same existence check followed by [`can_access`].

use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{info, warn};
use uuid::Uuid;

use crate::managers::credential_store::CredentialStoreTrait;
use crate::services::crypto_service::{CredentialCipher, CredentialCipherTrait};
use crate::services::qr_encoder::{QrEncoder, QrEncoderTrait};
use crate::types::credential::{
    Caller, Credential, NewCredential, SecurityType, PASSWORD_MAX_LENGTH, SSID_MAX_LENGTH,
};
use crate::types::errors::CredentialError;

/// Returns true if `caller` may read or delete `record`: administrators may
/// access anything, everyone else only what they own.
pub fn can_access(record: &Credential, caller: &Caller) -> bool {
    caller.is_admin || record.owner_id == caller.user_id
}

/// Checks the request against the data model constraints and returns the
/// parsed security type.
fn validate_request(request: &NewCredential) -> Result<SecurityType, CredentialError> {
    let security: SecurityType = request.security_type.parse()?;

    if request.ssid.is_empty() || request.ssid.len() > SSID_MAX_LENGTH {
        return Err(CredentialError::Validation(format!(
            "ssid must be 1 to {} bytes",
            SSID_MAX_LENGTH
        )));
    }
    if request.password.len() > PASSWORD_MAX_LENGTH {
        return Err(CredentialError::Validation(format!(
            "password must be at most {} bytes",
            PASSWORD_MAX_LENGTH
        )));
    }
    if !security.is_open() && request.password.is_empty() {
        return Err(CredentialError::Validation(
            "password required for secured networks".to_string(),
        ));
    }

    Ok(security)
}

/// Trait defining credential access operations.
pub trait CredentialServiceTrait {
    fn create(&self, owner_id: &str, request: &NewCredential) -> Result<Credential, CredentialError>;
    fn get_by_id(&self, id: &str, caller: &Caller) -> Result<Credential, CredentialError>;
    fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Credential>, CredentialError>;
    fn count_by_owner(&self, owner_id: &str) -> Result<i64, CredentialError>;
    fn delete(&self, id: &str, caller: &Caller) -> Result<(), CredentialError>;
    /// Explicit decryption of a stored password. Never called implicitly.
    fn reveal_password(&self, id: &str, caller: &Caller) -> Result<String, CredentialError>;
}

/// Credential service over any credential store.
pub struct CredentialService<'a, S: CredentialStoreTrait> {
    store: S,
    cipher: &'a CredentialCipher,
    encoder: &'a QrEncoder,
}

impl<'a, S: CredentialStoreTrait> CredentialService<'a, S> {
    pub fn new(store: S, cipher: &'a CredentialCipher, encoder: &'a QrEncoder) -> Self {
        Self {
            store,
            cipher,
            encoder,
        }
    }

    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    /// Loads a record and applies the access predicate.
    ///
    /// Missing ids yield `NotFound` before authorization is considered, so a
    /// foreign id and a missing id are distinguishable by error kind.
    fn load_authorized(&self, id: &str, caller: &Caller) -> Result<Credential, CredentialError> {
        let record = self
            .store
            .find_by_id(id)?
            .ok_or_else(|| CredentialError::NotFound(id.to_string()))?;

        if !can_access(&record, caller) {
            warn!(credential_id = %id, caller_id = %caller.user_id, "credential access denied");
            return Err(CredentialError::Unauthorized(id.to_string()));
        }

        Ok(record)
    }
}

impl<'a, S: CredentialStoreTrait> CredentialServiceTrait for CredentialService<'a, S> {
    fn create(&self, owner_id: &str, request: &NewCredential) -> Result<Credential, CredentialError> {
        let security = validate_request(request)?;

        // Open networks store nothing, whatever was supplied.
        let password = if security.is_open() {
            ""
        } else {
            request.password.as_str()
        };

        let encrypted_password = self.cipher.encrypt(password)?;
        let qr_code_data = self
            .encoder
            .generate(&request.ssid, password, security, request.is_hidden)?;

        let now = Self::now();
        let credential = Credential {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            ssid: request.ssid.clone(),
            encrypted_password,
            security_type: security,
            is_hidden: request.is_hidden,
            qr_code_data,
            created_at: now,
            updated_at: now,
        };

        self.store.insert(&credential)?;
        info!(credential_id = %credential.id, owner_id = %owner_id, security = %security, "wifi credential created");

        Ok(credential)
    }

    fn get_by_id(&self, id: &str, caller: &Caller) -> Result<Credential, CredentialError> {
        self.load_authorized(id, caller)
    }

    fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Credential>, CredentialError> {
        self.store.find_by_owner(owner_id)
    }

    fn count_by_owner(&self, owner_id: &str) -> Result<i64, CredentialError> {
        self.store.count_by_owner(owner_id)
    }

    fn delete(&self, id: &str, caller: &Caller) -> Result<(), CredentialError> {
        self.load_authorized(id, caller)?;

        // A concurrent delete may have won the race since the lookup.
        if !self.store.delete(id)? {
            return Err(CredentialError::NotFound(id.to_string()));
        }
        info!(credential_id = %id, caller_id = %caller.user_id, "wifi credential deleted");
        Ok(())
    }

    fn reveal_password(&self, id: &str, caller: &Caller) -> Result<String, CredentialError> {
        let record = self.load_authorized(id, caller)?;
        Ok(self.cipher.decrypt(&record.encrypted_password)?)
    }
}
