//! RPC method handler for the WiFi QR JSON-RPC protocol.
//!
//! Extracted from `rpc_server.rs` so it can be unit-tested independently.
//! The `handle_method` function dispatches JSON-RPC method calls to the
//! services built by the `App` struct. Only public projections are ever
//! serialized into a result.

use std::sync::Mutex;

use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::app::App;
use crate::services::admin_service::AdminServiceTrait;
use crate::services::auth_service::AuthServiceTrait;
use crate::services::credential_service::CredentialServiceTrait;
use crate::types::credential::{Caller, NewCredential, PublicCredential};
use crate::types::errors::{AdminError, AuthError, CredentialError, CryptoError, QrCodeError};
use crate::types::user::Role;

/// Error payload returned to RPC clients.
///
/// `code` is one of a fixed set of machine-readable strings; `message` is
/// the human-readable description and never contains secrets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{code}: {message}")]
pub struct RpcError {
    pub code: &'static str,
    pub message: String,
}

impl RpcError {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new("validation", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("internal", message)
    }

    pub fn unknown_method(method: &str) -> Self {
        Self::new("unknown_method", format!("unknown method: {}", method))
    }
}

impl From<CryptoError> for RpcError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::Integrity(_) => Self::new("integrity", err.to_string()),
            CryptoError::Configuration(_)
            | CryptoError::RandomGeneration(_)
            | CryptoError::Encryption(_) => Self::internal(err.to_string()),
        }
    }
}

impl From<QrCodeError> for RpcError {
    fn from(err: QrCodeError) -> Self {
        Self::new("encoding", err.to_string())
    }
}

impl From<CredentialError> for RpcError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::Validation(_) => Self::validation(err.to_string()),
            CredentialError::NotFound(_) => Self::new("not_found", err.to_string()),
            CredentialError::Unauthorized(_) => Self::new("forbidden", err.to_string()),
            CredentialError::Storage(_) => Self::new("storage", err.to_string()),
            CredentialError::Crypto(inner) => inner.into(),
            CredentialError::QrCode(inner) => inner.into(),
        }
    }
}

impl From<AuthError> for RpcError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation(_) => Self::validation(err.to_string()),
            AuthError::EmailTaken(_) => Self::new("conflict", err.to_string()),
            AuthError::InvalidCredentials | AuthError::InvalidToken => {
                Self::new("unauthorized", err.to_string())
            }
            AuthError::Storage(_) => Self::new("storage", err.to_string()),
            AuthError::Crypto(inner) => inner.into(),
        }
    }
}

impl From<AdminError> for RpcError {
    fn from(err: AdminError) -> Self {
        match err {
            AdminError::Forbidden => Self::new("forbidden", err.to_string()),
            AdminError::NotFound(_) => Self::new("not_found", err.to_string()),
            AdminError::Storage(_) => Self::new("storage", err.to_string()),
        }
    }
}

fn str_param<'p>(params: &'p Value, key: &str) -> Result<&'p str, RpcError> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| RpcError::validation(format!("missing {}", key)))
}

fn to_value<T: Serialize>(value: T) -> Result<Value, RpcError> {
    serde_json::to_value(value).map_err(|e| RpcError::internal(e.to_string()))
}

/// Resolves the `token` parameter to the calling user.
fn authenticate(app: &App, params: &Value) -> Result<Caller, RpcError> {
    let token = params
        .get("token")
        .and_then(|v| v.as_str())
        .ok_or_else(|| RpcError::new("unauthorized", "missing token"))?;
    Ok(app.auth_service().authenticate(token)?)
}

/// Dispatch a JSON-RPC method call to the appropriate handler.
///
/// Returns `Ok(Value)` on success or `Err(RpcError)` with a stable code.
pub fn handle_method(app: &Mutex<App>, method: &str, params: &Value) -> Result<Value, RpcError> {
    let a = app.lock().map_err(|e| RpcError::internal(e.to_string()))?;

    match method {
        "ping" => Ok(json!({"pong": true})),
        "health" => {
            a.db
                .connection()
                .query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
                .map_err(|e| RpcError::new("storage", e.to_string()))?;
            Ok(json!({"status": "ok", "version": env!("CARGO_PKG_VERSION")}))
        }

        // ─── Auth ───
        "auth.register" => {
            let email = str_param(params, "email")?;
            let password = str_param(params, "password")?;
            to_value(a.auth_service().register(email, password)?)
        }
        "auth.login" => {
            let email = str_param(params, "email")?;
            let password = str_param(params, "password")?;
            to_value(a.auth_service().login(email, password)?)
        }

        // ─── WiFi credentials ───
        "wifi.create" => {
            let caller = authenticate(&a, params)?;
            let request: NewCredential = serde_json::from_value(params.clone())
                .map_err(|e| RpcError::validation(format!("invalid params: {}", e)))?;
            let credential = a.credential_service().create(&caller.user_id, &request)?;
            to_value(credential.to_public())
        }
        "wifi.list" => {
            let caller = authenticate(&a, params)?;
            let list: Vec<PublicCredential> = a
                .credential_service()
                .list_by_owner(&caller.user_id)?
                .iter()
                .map(|c| c.to_public())
                .collect();
            to_value(list)
        }
        "wifi.get" => {
            let caller = authenticate(&a, params)?;
            let id = str_param(params, "id")?;
            to_value(a.credential_service().get_by_id(id, &caller)?.to_public())
        }
        "wifi.delete" => {
            let caller = authenticate(&a, params)?;
            let id = str_param(params, "id")?;
            a.credential_service().delete(id, &caller)?;
            Ok(json!({"ok": true}))
        }

        // ─── Admin ───
        "admin.users" => {
            let caller = authenticate(&a, params)?;
            to_value(a.admin_service().list_users(&caller)?)
        }
        "admin.credentials" => {
            let caller = authenticate(&a, params)?;
            to_value(a.admin_service().list_credentials(&caller)?)
        }
        "admin.stats" => {
            let caller = authenticate(&a, params)?;
            to_value(a.admin_service().stats(&caller)?)
        }
        "admin.set_role" => {
            let caller = authenticate(&a, params)?;
            let user_id = str_param(params, "user_id")?;
            let role: Role = str_param(params, "role")?
                .parse()
                .map_err(RpcError::validation)?;
            a.admin_service().set_role(&caller, user_id, role)?;
            Ok(json!({"ok": true}))
        }
        "admin.delete_user" => {
            let caller = authenticate(&a, params)?;
            let user_id = str_param(params, "user_id")?;
            a.admin_service().delete_user(&caller, user_id)?;
            Ok(json!({"ok": true}))
        }

        _ => Err(RpcError::unknown_method(method)),
    }
}
