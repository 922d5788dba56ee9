//! Unit tests for the WiFi QR database layer (connection + migrations).

use rusqlite::params;
use tempfile::TempDir;

use wifiqr::database::migrations::{get_schema_version, CURRENT_SCHEMA_VERSION};
use wifiqr::database::Database;

fn insert_user(db: &Database, id: &str, email: &str) {
    db.connection()
        .execute(
            "INSERT INTO users (id, email, password_hash, role, created_at, updated_at) VALUES (?1, ?2, 'x', 'user', 0, 0)",
            params![id, email],
        )
        .expect("insert user");
}

fn insert_credential(db: &Database, id: &str, owner: &str) -> rusqlite::Result<usize> {
    db.connection().execute(
        "INSERT INTO wifi_credentials (id, owner_id, ssid, encrypted_password, security_type, is_hidden, qr_code_data, created_at, updated_at)
         VALUES (?1, ?2, 'Home', '', 'nopass', 0, '', 0, 0)",
        params![id, owner],
    )
}

#[test]
fn test_open_in_memory_succeeds() {
    let db = Database::open_in_memory();
    assert!(db.is_ok(), "open_in_memory should succeed");
}

#[test]
fn test_migrations_create_all_tables() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let conn = db.connection();

    for table in &["users", "wifi_credentials", "schema_version"] {
        let exists: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name=?1",
                [table],
                |row| row.get(0),
            )
            .unwrap_or(false);
        assert!(exists, "Table '{}' should exist after migrations", table);
    }
}

#[test]
fn test_migrations_create_indexes() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    for index in &["idx_wifi_credentials_owner", "idx_wifi_credentials_created"] {
        let exists: bool = db
            .connection()
            .query_row(
                "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='index' AND name=?1",
                [index],
                |row| row.get(0),
            )
            .unwrap();
        assert!(exists, "Index '{}' should exist", index);
    }
}

#[test]
fn test_schema_version_recorded() {
    let db = Database::open_in_memory().unwrap();
    assert_eq!(get_schema_version(db.connection()), CURRENT_SCHEMA_VERSION);
}

#[test]
fn test_reopen_does_not_rerun_migrations() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("wifiqr.db");

    {
        let db = Database::open(&path).unwrap();
        insert_user(&db, "u1", "a@example.com");
    }

    let db = Database::open(&path).unwrap();
    let versions: i64 = db
        .connection()
        .query_row("SELECT COUNT(*) FROM schema_version", [], |r| r.get(0))
        .unwrap();
    assert_eq!(versions, 1);

    let users: i64 = db
        .connection()
        .query_row("SELECT COUNT(*) FROM users", [], |r| r.get(0))
        .unwrap();
    assert_eq!(users, 1, "data must survive reopening");
}

#[test]
fn test_email_is_unique() {
    let db = Database::open_in_memory().unwrap();
    insert_user(&db, "u1", "a@example.com");
    let dup = db.connection().execute(
        "INSERT INTO users (id, email, password_hash, role, created_at, updated_at) VALUES ('u2', 'a@example.com', 'x', 'user', 0, 0)",
        [],
    );
    assert!(dup.is_err());
}

#[test]
fn test_foreign_key_rejects_unknown_owner() {
    let db = Database::open_in_memory().unwrap();
    assert!(insert_credential(&db, "c1", "ghost").is_err());
}

#[test]
fn test_deleting_user_cascades_to_credentials() {
    let db = Database::open_in_memory().unwrap();
    insert_user(&db, "u1", "a@example.com");
    insert_credential(&db, "c1", "u1").unwrap();
    insert_credential(&db, "c2", "u1").unwrap();

    db.connection().execute("DELETE FROM users WHERE id = 'u1'", []).unwrap();

    let remaining: i64 = db
        .connection()
        .query_row("SELECT COUNT(*) FROM wifi_credentials", [], |r| r.get(0))
        .unwrap();
    assert_eq!(remaining, 0);
}
