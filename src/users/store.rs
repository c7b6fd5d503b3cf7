use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::auth::password::verify_password;
use crate::users::types::{OAuthIdentity, ProfileChanges, User, UserChanges};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("email already registered")]
    DuplicateEmail,
    #[error("username already taken")]
    DuplicateUsername,
    #[error("user not found")]
    NotFound,
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        Self::Backend(anyhow::Error::new(e))
    }
}

/// Capability interface over the users table. Implemented by the relational
/// store and by a map-backed double with identical contract.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
    async fn find_by_external_id(&self, external_id: &str) -> Result<Option<User>, StoreError>;

    /// Create a password-backed user. Profile fields start unset.
    async fn create_local(
        &self,
        email: &str,
        username: Option<&str>,
        password_hash: &str,
    ) -> Result<User, StoreError>;

    /// Create or link a federated identity:
    /// an existing record with the same email and no external id gets the
    /// id linked; an existing record with the external id is returned as-is;
    /// otherwise a fresh record is created with `email_verified` set.
    async fn create_or_link_oauth(&self, identity: &OAuthIdentity) -> Result<User, StoreError>;

    async fn update_user(&self, id: Uuid, changes: &UserChanges) -> Result<User, StoreError>;
    async fn update_profile(&self, id: Uuid, changes: &ProfileChanges)
        -> Result<User, StoreError>;
    async fn link_external_account(
        &self,
        id: Uuid,
        external_id: &str,
    ) -> Result<User, StoreError>;

    /// Check email + password. `None` when the email is unknown, the account
    /// has no password (federated-only), or the password does not match.
    async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, StoreError> {
        let Some(user) = self.find_by_email(email).await? else {
            return Ok(None);
        };
        let Some(hash) = user.password_hash.as_deref() else {
            return Ok(None);
        };
        match verify_password(password, hash) {
            Ok(true) => Ok(Some(user)),
            Ok(false) => Ok(None),
            Err(e) => {
                warn!(error = %e, email = %email, "stored password hash unreadable");
                Ok(None)
            }
        }
    }
}
