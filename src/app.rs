//! App Core for WiFi QR.
//!
//! Central struct holding the database, the process-wide cipher and the
//! other long-lived collaborators the services borrow.

use std::sync::Arc;

use crate::config::Config;
use crate::database::connection::Database;
use crate::managers::credential_store::CredentialStore;
use crate::managers::user_store::UserStore;
use crate::services::admin_service::AdminService;
use crate::services::auth_service::{AuthService, TokenSigner};
use crate::services::credential_service::CredentialService;
use crate::services::crypto_service::{CredentialCipher, PasswordHasher};
use crate::services::qr_encoder::QrEncoder;

/// Central application struct.
///
/// Stores and services borrow `db.connection()` with a lifetime, so they are
/// built on demand through the accessor methods instead of being kept here.
pub struct App {
    pub db: Arc<Database>,
    pub cipher: CredentialCipher,
    pub qr_encoder: QrEncoder,
    pub hasher: PasswordHasher,
    pub signer: TokenSigner,
    pub admin_emails: Vec<String>,
}

impl App {
    /// Opens the database at `config.database_path()` and builds the app.
    ///
    /// Fails when the database cannot be opened or the key is rejected.
    pub fn new(config: &Config) -> Result<Self, Box<dyn std::error::Error>> {
        let db = Database::open(config.database_path())?;
        Self::with_database(db, config)
    }

    /// Builds the app around an already opened database.
    pub fn with_database(db: Database, config: &Config) -> Result<Self, Box<dyn std::error::Error>> {
        let cipher = CredentialCipher::new(&config.encryption_key)?;

        Ok(Self {
            db: Arc::new(db),
            cipher,
            qr_encoder: QrEncoder::new(),
            hasher: PasswordHasher::with_iterations(config.pbkdf2_iterations),
            signer: TokenSigner::new(&config.token_secret, config.token_ttl_secs),
            admin_emails: config.admin_emails.clone(),
        })
    }

    pub fn credential_service(&self) -> CredentialService<'_, CredentialStore<'_>> {
        CredentialService::new(
            CredentialStore::new(self.db.connection()),
            &self.cipher,
            &self.qr_encoder,
        )
    }

    pub fn auth_service(&self) -> AuthService<'_, UserStore<'_>> {
        AuthService::new(
            UserStore::new(self.db.connection()),
            &self.hasher,
            &self.signer,
            &self.admin_emails,
        )
    }

    pub fn admin_service(&self) -> AdminService<UserStore<'_>, CredentialStore<'_>> {
        AdminService::new(
            UserStore::new(self.db.connection()),
            CredentialStore::new(self.db.connection()),
        )
    }
}
