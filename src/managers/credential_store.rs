//! Credential Store for WiFi QR.
//!
//! Implements `CredentialStoreTrait`: persistence of WiFi credentials,
//! backed by SQLite via `rusqlite`. No authorization happens here; the
//! credential service is the only gate in front of it.

use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};

use crate::types::credential::{Credential, CredentialWithOwner, SecurityType};
use crate::types::errors::CredentialError;

/// Trait defining credential persistence operations.
pub trait CredentialStoreTrait {
    fn insert(&self, credential: &Credential) -> Result<(), CredentialError>;
    fn find_by_id(&self, id: &str) -> Result<Option<Credential>, CredentialError>;
    /// Credentials owned by `owner_id`, newest first.
    fn find_by_owner(&self, owner_id: &str) -> Result<Vec<Credential>, CredentialError>;
    /// Every credential joined with its owner's email, newest first.
    fn list_all_with_owner(&self) -> Result<Vec<CredentialWithOwner>, CredentialError>;
    /// Removes a credential. Returns `false` if no row matched.
    fn delete(&self, id: &str) -> Result<bool, CredentialError>;
    fn count(&self) -> Result<i64, CredentialError>;
    fn count_by_owner(&self, owner_id: &str) -> Result<i64, CredentialError>;
}

const CREDENTIAL_COLUMNS: &str = "id, owner_id, ssid, encrypted_password, security_type, is_hidden, qr_code_data, created_at, updated_at";

/// Credential store backed by a SQLite connection.
pub struct CredentialStore<'a> {
    conn: &'a Connection,
}

impl<'a> CredentialStore<'a> {
    /// Creates a new `CredentialStore` using the provided database connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn parse_security(idx: usize, raw: String) -> rusqlite::Result<SecurityType> {
        raw.parse::<SecurityType>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    }

    /// Reads a single `Credential` row into a struct.
    fn row_to_credential(row: &rusqlite::Row) -> rusqlite::Result<Credential> {
        Ok(Credential {
            id: row.get(0)?,
            owner_id: row.get(1)?,
            ssid: row.get(2)?,
            encrypted_password: row.get(3)?,
            security_type: Self::parse_security(4, row.get(4)?)?,
            is_hidden: row.get(5)?,
            qr_code_data: row.get(6)?,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }

    fn db_err(e: rusqlite::Error) -> CredentialError {
        CredentialError::Storage(e.to_string())
    }
}

impl<'a> CredentialStoreTrait for CredentialStore<'a> {
    fn insert(&self, credential: &Credential) -> Result<(), CredentialError> {
        self.conn
            .execute(
                "INSERT INTO wifi_credentials (id, owner_id, ssid, encrypted_password, security_type, is_hidden, qr_code_data, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    credential.id,
                    credential.owner_id,
                    credential.ssid,
                    credential.encrypted_password,
                    credential.security_type.as_str(),
                    credential.is_hidden,
                    credential.qr_code_data,
                    credential.created_at,
                    credential.updated_at,
                ],
            )
            .map_err(Self::db_err)?;
        Ok(())
    }

    fn find_by_id(&self, id: &str) -> Result<Option<Credential>, CredentialError> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM wifi_credentials WHERE id = ?1", CREDENTIAL_COLUMNS),
                params![id],
                Self::row_to_credential,
            )
            .optional()
            .map_err(Self::db_err)
    }

    fn find_by_owner(&self, owner_id: &str) -> Result<Vec<Credential>, CredentialError> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {} FROM wifi_credentials WHERE owner_id = ?1 ORDER BY created_at DESC, rowid DESC",
                CREDENTIAL_COLUMNS
            ))
            .map_err(Self::db_err)?;

        let rows = stmt
            .query_map(params![owner_id], Self::row_to_credential)
            .map_err(Self::db_err)?;

        let mut credentials = Vec::new();
        for row in rows {
            credentials.push(row.map_err(Self::db_err)?);
        }
        Ok(credentials)
    }

    fn list_all_with_owner(&self) -> Result<Vec<CredentialWithOwner>, CredentialError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT c.id, c.owner_id, COALESCE(u.email, ''), c.ssid, c.security_type, c.is_hidden, c.created_at
                 FROM wifi_credentials c
                 LEFT JOIN users u ON u.id = c.owner_id
                 ORDER BY c.created_at DESC, c.rowid DESC",
            )
            .map_err(Self::db_err)?;

        let rows = stmt
            .query_map([], |row| {
                Ok(CredentialWithOwner {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    user_email: row.get(2)?,
                    ssid: row.get(3)?,
                    security_type: Self::parse_security(4, row.get(4)?)?,
                    is_hidden: row.get(5)?,
                    created_at: row.get(6)?,
                })
            })
            .map_err(Self::db_err)?;

        let mut credentials = Vec::new();
        for row in rows {
            credentials.push(row.map_err(Self::db_err)?);
        }
        Ok(credentials)
    }

    fn delete(&self, id: &str) -> Result<bool, CredentialError> {
        let affected = self
            .conn
            .execute("DELETE FROM wifi_credentials WHERE id = ?1", params![id])
            .map_err(Self::db_err)?;
        Ok(affected > 0)
    }

    fn count(&self) -> Result<i64, CredentialError> {
        self.conn
            .query_row("SELECT COUNT(*) FROM wifi_credentials", [], |row| row.get(0))
            .map_err(Self::db_err)
    }

    fn count_by_owner(&self, owner_id: &str) -> Result<i64, CredentialError> {
        self.conn
            .query_row(
                "SELECT COUNT(*) FROM wifi_credentials WHERE owner_id = ?1",
                params![owner_id],
                |row| row.get(0),
            )
            .map_err(Self::db_err)
    }
}
