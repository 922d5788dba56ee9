//! User Store for WiFi QR.
//!
//! Implements `UserStoreTrait`: account persistence backed by SQLite.
//! Deleting a user cascades to their credentials through the foreign key.

use rusqlite::types::Type;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};

use crate::types::errors::UserError;
use crate::types::user::{Role, User};

/// Trait defining user persistence operations.
pub trait UserStoreTrait {
    fn insert(&self, user: &User) -> Result<(), UserError>;
    fn find_by_id(&self, id: &str) -> Result<Option<User>, UserError>;
    fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;
    /// All users, newest first.
    fn list_all(&self) -> Result<Vec<User>, UserError>;
    fn count(&self) -> Result<i64, UserError>;
    fn set_role(&self, id: &str, role: Role, updated_at: i64) -> Result<bool, UserError>;
    /// Removes a user and, via cascade, their credentials.
    fn delete(&self, id: &str) -> Result<bool, UserError>;
}

const USER_COLUMNS: &str = "id, email, password_hash, role, created_at, updated_at";

/// User store backed by a SQLite connection.
pub struct UserStore<'a> {
    conn: &'a Connection,
}

impl<'a> UserStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
        let role: String = row.get(3)?;
        Ok(User {
            id: row.get(0)?,
            email: row.get(1)?,
            password_hash: row.get(2)?,
            role: role.parse::<Role>().map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(3, Type::Text, e.into())
            })?,
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }

    fn db_err(e: rusqlite::Error) -> UserError {
        UserError::DatabaseError(e.to_string())
    }
}

impl<'a> UserStoreTrait for UserStore<'a> {
    fn insert(&self, user: &User) -> Result<(), UserError> {
        self.conn
            .execute(
                "INSERT INTO users (id, email, password_hash, role, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    user.id,
                    user.email,
                    user.password_hash,
                    user.role.as_str(),
                    user.created_at,
                    user.updated_at,
                ],
            )
            .map_err(|e| match e {
                // Only the email index is UNIQUE; primary key, NOT NULL and
                // CHECK failures carry other extended codes.
                rusqlite::Error::SqliteFailure(ref err, _)
                    if err.code == ErrorCode::ConstraintViolation
                        && err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
                {
                    UserError::EmailTaken(user.email.clone())
                }
                other => Self::db_err(other),
            })?;
        Ok(())
    }

    fn find_by_id(&self, id: &str) -> Result<Option<User>, UserError> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS),
                params![id],
                Self::row_to_user,
            )
            .optional()
            .map_err(Self::db_err)
    }

    fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM users WHERE email = ?1", USER_COLUMNS),
                params![email],
                Self::row_to_user,
            )
            .optional()
            .map_err(Self::db_err)
    }

    fn list_all(&self) -> Result<Vec<User>, UserError> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {} FROM users ORDER BY created_at DESC, rowid DESC",
                USER_COLUMNS
            ))
            .map_err(Self::db_err)?;

        let rows = stmt.query_map([], Self::row_to_user).map_err(Self::db_err)?;

        let mut users = Vec::new();
        for row in rows {
            users.push(row.map_err(Self::db_err)?);
        }
        Ok(users)
    }

    fn count(&self) -> Result<i64, UserError> {
        self.conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .map_err(Self::db_err)
    }

    fn set_role(&self, id: &str, role: Role, updated_at: i64) -> Result<bool, UserError> {
        let affected = self
            .conn
            .execute(
                "UPDATE users SET role = ?1, updated_at = ?2 WHERE id = ?3",
                params![role.as_str(), updated_at, id],
            )
            .map_err(Self::db_err)?;
        Ok(affected > 0)
    }

    fn delete(&self, id: &str) -> Result<bool, UserError> {
        let affected = self
            .conn
            .execute("DELETE FROM users WHERE id = ?1", params![id])
            .map_err(Self::db_err)?;
        Ok(affected > 0)
    }
}
