//! Administrator-only views over users and credentials.

use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{info, warn};

use crate::managers::credential_store::CredentialStoreTrait;
use crate::managers::user_store::UserStoreTrait;
use crate::types::credential::{Caller, CredentialWithOwner};
use crate::types::errors::AdminError;
use crate::types::user::{PublicUser, Role, Stats};

/// Trait defining admin operations. Every method requires an admin caller.
pub trait AdminServiceTrait {
    fn list_users(&self, caller: &Caller) -> Result<Vec<PublicUser>, AdminError>;
    fn list_credentials(&self, caller: &Caller) -> Result<Vec<CredentialWithOwner>, AdminError>;
    fn stats(&self, caller: &Caller) -> Result<Stats, AdminError>;
    fn set_role(&self, caller: &Caller, user_id: &str, role: Role) -> Result<(), AdminError>;
    fn delete_user(&self, caller: &Caller, user_id: &str) -> Result<(), AdminError>;
}

pub struct AdminService<U: UserStoreTrait, C: CredentialStoreTrait> {
    users: U,
    credentials: C,
}

impl<U: UserStoreTrait, C: CredentialStoreTrait> AdminService<U, C> {
    pub fn new(users: U, credentials: C) -> Self {
        Self { users, credentials }
    }

    fn require_admin(caller: &Caller) -> Result<(), AdminError> {
        if caller.is_admin {
            Ok(())
        } else {
            warn!(caller_id = %caller.user_id, "admin operation refused");
            Err(AdminError::Forbidden)
        }
    }
}

impl<U: UserStoreTrait, C: CredentialStoreTrait> AdminServiceTrait for AdminService<U, C> {
    fn list_users(&self, caller: &Caller) -> Result<Vec<PublicUser>, AdminError> {
        Self::require_admin(caller)?;
        let users = self.users.list_all()?;
        Ok(users.iter().map(|u| u.to_public()).collect())
    }

    fn list_credentials(&self, caller: &Caller) -> Result<Vec<CredentialWithOwner>, AdminError> {
        Self::require_admin(caller)?;
        Ok(self.credentials.list_all_with_owner()?)
    }

    fn stats(&self, caller: &Caller) -> Result<Stats, AdminError> {
        Self::require_admin(caller)?;
        Ok(Stats {
            total_users: self.users.count()?,
            total_credentials: self.credentials.count()?,
        })
    }

    fn set_role(&self, caller: &Caller, user_id: &str, role: Role) -> Result<(), AdminError> {
        Self::require_admin(caller)?;
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64;
        if !self.users.set_role(user_id, role, now)? {
            return Err(AdminError::NotFound(user_id.to_string()));
        }
        info!(user_id = %user_id, role = %role, caller_id = %caller.user_id, "user role changed");
        Ok(())
    }

    fn delete_user(&self, caller: &Caller, user_id: &str) -> Result<(), AdminError> {
        Self::require_admin(caller)?;
        if !self.users.delete(user_id)? {
            return Err(AdminError::NotFound(user_id.to_string()));
        }
        info!(user_id = %user_id, caller_id = %caller.user_id, "user deleted with their credentials");
        Ok(())
    }
}
