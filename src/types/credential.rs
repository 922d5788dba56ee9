use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::errors::CredentialError;

/// Maximum SSID length in bytes.
pub const SSID_MAX_LENGTH: usize = 32;

/// Maximum WiFi passphrase length in bytes.
pub const PASSWORD_MAX_LENGTH: usize = 63;

/// Declared security class of a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SecurityType {
    #[serde(rename = "WPA")]
    Wpa,
    #[serde(rename = "WPA2")]
    Wpa2,
    #[serde(rename = "WEP")]
    Wep,
    /// Open network, no password.
    #[serde(rename = "nopass")]
    NoPass,
}

impl SecurityType {
    /// Token used both on the wire and inside the WiFi QR string.
    pub fn as_str(&self) -> &'static str {
        match self {
            SecurityType::Wpa => "WPA",
            SecurityType::Wpa2 => "WPA2",
            SecurityType::Wep => "WEP",
            SecurityType::NoPass => "nopass",
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, SecurityType::NoPass)
    }
}

impl fmt::Display for SecurityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SecurityType {
    type Err = CredentialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WPA" => Ok(SecurityType::Wpa),
            "WPA2" => Ok(SecurityType::Wpa2),
            "WEP" => Ok(SecurityType::Wep),
            "nopass" => Ok(SecurityType::NoPass),
            other => Err(CredentialError::Validation(format!(
                "invalid security type: {}",
                other
            ))),
        }
    }
}

/// A stored WiFi credential, including its encrypted secret.
///
/// Only ever leaves the crate through [`Credential::to_public`].
#[derive(Debug, Clone)]
pub struct Credential {
    pub id: String,
    pub owner_id: String,
    pub ssid: String,
    /// base64(nonce || ciphertext || tag), or empty for open networks.
    pub encrypted_password: String,
    pub security_type: SecurityType,
    pub is_hidden: bool,
    /// base64-encoded PNG of the QR code.
    pub qr_code_data: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Credential {
    pub fn to_public(&self) -> PublicCredential {
        PublicCredential {
            id: self.id.clone(),
            user_id: self.owner_id.clone(),
            ssid: self.ssid.clone(),
            security_type: self.security_type,
            is_hidden: self.is_hidden,
            qr_code_data: self.qr_code_data.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Externally visible credential representation. Has no secret field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicCredential {
    pub id: String,
    pub user_id: String,
    pub ssid: String,
    pub security_type: SecurityType,
    pub is_hidden: bool,
    pub qr_code_data: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Input for creating a credential. `security_type` is parsed during validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCredential {
    pub ssid: String,
    #[serde(default)]
    pub password: String,
    pub security_type: String,
    #[serde(default)]
    pub is_hidden: bool,
}

/// Admin listing row: a credential joined with its owner's email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialWithOwner {
    pub id: String,
    pub user_id: String,
    pub user_email: String,
    pub ssid: String,
    pub security_type: SecurityType,
    pub is_hidden: bool,
    pub created_at: i64,
}

/// The authenticated identity on whose behalf an operation runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: String,
    pub is_admin: bool,
}

impl Caller {
    pub fn user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            is_admin: false,
        }
    }

    pub fn admin(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            is_admin: true,
        }
    }
}
