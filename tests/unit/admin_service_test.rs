//! Unit tests for the administrator views: user listing, the credential
//! join projection, statistics, role changes and user deletion.

use wifiqr::database::Database;
use wifiqr::managers::credential_store::CredentialStore;
use wifiqr::managers::user_store::{UserStore, UserStoreTrait};
use wifiqr::services::admin_service::{AdminService, AdminServiceTrait};
use wifiqr::services::credential_service::{CredentialService, CredentialServiceTrait};
use wifiqr::services::crypto_service::CredentialCipher;
use wifiqr::services::qr_encoder::QrEncoder;
use wifiqr::types::credential::{Caller, NewCredential};
use wifiqr::types::errors::AdminError;
use wifiqr::types::user::{Role, User};

fn setup() -> Database {
    let db = Database::open_in_memory().expect("open db");
    let users = UserStore::new(db.connection());
    for (i, id) in ["alice", "bob"].iter().enumerate() {
        users
            .insert(&User {
                id: id.to_string(),
                email: format!("{}@example.com", id),
                password_hash: "x".to_string(),
                role: Role::User,
                created_at: i as i64,
                updated_at: i as i64,
            })
            .unwrap();
    }
    db
}

fn admin(db: &Database) -> AdminService<UserStore<'_>, CredentialStore<'_>> {
    AdminService::new(UserStore::new(db.connection()), CredentialStore::new(db.connection()))
}

fn add_credential(db: &Database, owner: &str, ssid: &str) -> String {
    let cipher = CredentialCipher::new(&[1u8; 32]).unwrap();
    let encoder = QrEncoder::new();
    let svc = CredentialService::new(CredentialStore::new(db.connection()), &cipher, &encoder);
    svc.create(
        owner,
        &NewCredential {
            ssid: ssid.to_string(),
            password: "password".to_string(),
            security_type: "WPA2".to_string(),
            is_hidden: false,
        },
    )
    .unwrap()
    .id
}

#[test]
fn test_non_admin_is_forbidden_everywhere() {
    let db = setup();
    let svc = admin(&db);
    let caller = Caller::user("alice");

    assert!(matches!(svc.list_users(&caller), Err(AdminError::Forbidden)));
    assert!(matches!(svc.list_credentials(&caller), Err(AdminError::Forbidden)));
    assert!(matches!(svc.stats(&caller), Err(AdminError::Forbidden)));
    assert!(matches!(svc.set_role(&caller, "bob", Role::Admin), Err(AdminError::Forbidden)));
    assert!(matches!(svc.delete_user(&caller, "bob"), Err(AdminError::Forbidden)));
}

#[test]
fn test_list_users_newest_first() {
    let db = setup();
    let users = admin(&db).list_users(&Caller::admin("root")).unwrap();
    let emails: Vec<&str> = users.iter().map(|u| u.email.as_str()).collect();
    assert_eq!(emails, vec!["bob@example.com", "alice@example.com"]);
}

#[test]
fn test_list_credentials_joins_owner_email() {
    let db = setup();
    let id = add_credential(&db, "alice", "Home");

    let rows = admin(&db).list_credentials(&Caller::admin("root")).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, id);
    assert_eq!(rows[0].user_id, "alice");
    assert_eq!(rows[0].user_email, "alice@example.com");
    assert_eq!(rows[0].ssid, "Home");

    let json = serde_json::to_value(&rows[0]).unwrap();
    assert!(json.get("encrypted_password").is_none());
    assert!(json.get("qr_code_data").is_none());
}

#[test]
fn test_stats_counts() {
    let db = setup();
    add_credential(&db, "alice", "One");
    add_credential(&db, "alice", "Two");
    add_credential(&db, "bob", "Three");

    let stats = admin(&db).stats(&Caller::admin("root")).unwrap();
    assert_eq!(stats.total_users, 2);
    assert_eq!(stats.total_credentials, 3);
}

#[test]
fn test_set_role() {
    let db = setup();
    let root = Caller::admin("root");
    admin(&db).set_role(&root, "bob", Role::Admin).unwrap();

    let bob = UserStore::new(db.connection()).find_by_id("bob").unwrap().unwrap();
    assert_eq!(bob.role, Role::Admin);

    assert!(matches!(
        admin(&db).set_role(&root, "ghost", Role::Admin),
        Err(AdminError::NotFound(_))
    ));
}

#[test]
fn test_delete_user_cascades() {
    let db = setup();
    add_credential(&db, "alice", "One");
    add_credential(&db, "bob", "Two");

    let root = Caller::admin("root");
    admin(&db).delete_user(&root, "alice").unwrap();

    let stats = admin(&db).stats(&root).unwrap();
    assert_eq!(stats.total_users, 1);
    assert_eq!(stats.total_credentials, 1);

    assert!(matches!(
        admin(&db).delete_user(&root, "alice"),
        Err(AdminError::NotFound(_))
    ));
}
