use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::users::store::{StoreError, UserStore};
use crate::users::types::{OAuthIdentity, ProfileChanges, User, UserChanges};

/// Map-backed user store. Satisfies the same contract as the relational
/// store; used as a test double and for running without a database.
pub struct InMemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }

    fn get_by<F>(&self, pred: F) -> Option<User>
    where
        F: Fn(&User) -> bool,
    {
        self.users
            .read()
            .expect("user store lock poisoned")
            .values()
            .find(|u| pred(u))
            .cloned()
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.get_by(|u| u.id == id))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.get_by(|u| u.email == email))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self.get_by(|u| u.username.as_deref() == Some(username)))
    }

    async fn find_by_external_id(&self, external_id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.get_by(|u| u.external_id.as_deref() == Some(external_id)))
    }

    async fn create_local(
        &self,
        email: &str,
        username: Option<&str>,
        password_hash: &str,
    ) -> Result<User, StoreError> {
        let mut users = self.users.write().expect("user store lock poisoned");
        if users.values().any(|u| u.email == email) {
            return Err(StoreError::DuplicateEmail);
        }
        if let Some(username) = username {
            if users.values().any(|u| u.username.as_deref() == Some(username)) {
                return Err(StoreError::DuplicateUsername);
            }
        }

        let now = OffsetDateTime::now_utc();
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            username: username.map(String::from),
            password_hash: Some(password_hash.to_string()),
            external_id: None,
            email_verified: false,
            name: None,
            avatar_url: None,
            age: None,
            date_of_birth: None,
            bio: None,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn create_or_link_oauth(&self, identity: &OAuthIdentity) -> Result<User, StoreError> {
        let mut users = self.users.write().expect("user store lock poisoned");

        let by_email = users
            .values()
            .find(|u| u.email == identity.email)
            .map(|u| (u.id, u.external_id.is_none()));
        if let Some((id, unlinked)) = by_email {
            if unlinked {
                let user = users.get_mut(&id).expect("id just looked up");
                user.external_id = Some(identity.external_id.clone());
                user.email_verified = true;
                user.updated_at = OffsetDateTime::now_utc();
                return Ok(user.clone());
            }
        }

        if let Some(existing) = users
            .values()
            .find(|u| u.external_id.as_deref() == Some(identity.external_id.as_str()))
        {
            return Ok(existing.clone());
        }

        let now = OffsetDateTime::now_utc();
        let user = User {
            id: Uuid::new_v4(),
            email: identity.email.clone(),
            username: None,
            password_hash: None,
            external_id: Some(identity.external_id.clone()),
            email_verified: true,
            name: identity.name.clone(),
            avatar_url: identity.avatar_url.clone(),
            age: None,
            date_of_birth: None,
            bio: None,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_user(&self, id: Uuid, changes: &UserChanges) -> Result<User, StoreError> {
        let mut users = self.users.write().expect("user store lock poisoned");
        let user = users.get_mut(&id).ok_or(StoreError::NotFound)?;
        if let Some(email) = &changes.email {
            user.email = email.clone();
        }
        if let Some(username) = &changes.username {
            user.username = Some(username.clone());
        }
        if let Some(verified) = changes.email_verified {
            user.email_verified = verified;
        }
        user.updated_at = OffsetDateTime::now_utc();
        Ok(user.clone())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        changes: &ProfileChanges,
    ) -> Result<User, StoreError> {
        let mut users = self.users.write().expect("user store lock poisoned");
        let user = users.get_mut(&id).ok_or(StoreError::NotFound)?;
        if let Some(name) = &changes.name {
            user.name = Some(name.clone());
        }
        if let Some(avatar_url) = &changes.avatar_url {
            user.avatar_url = Some(avatar_url.clone());
        }
        if let Some(age) = changes.age {
            user.age = Some(age);
        }
        if let Some(dob) = changes.date_of_birth {
            user.date_of_birth = Some(dob);
        }
        if let Some(bio) = &changes.bio {
            user.bio = Some(bio.clone());
        }
        user.updated_at = OffsetDateTime::now_utc();
        Ok(user.clone())
    }

    async fn link_external_account(
        &self,
        id: Uuid,
        external_id: &str,
    ) -> Result<User, StoreError> {
        let mut users = self.users.write().expect("user store lock poisoned");
        let user = users.get_mut(&id).ok_or(StoreError::NotFound)?;
        user.external_id = Some(external_id.to_string());
        user.email_verified = true;
        user.updated_at = OffsetDateTime::now_utc();
        Ok(user.clone())
    }
}

#[cfg(test)]
mod store_tests {
    use super::*;
    use crate::auth::password::hash_password;

    fn identity(external_id: &str, email: &str) -> OAuthIdentity {
        OAuthIdentity {
            external_id: external_id.into(),
            email: email.into(),
            name: Some("Jamie".into()),
            avatar_url: None,
        }
    }

    #[tokio::test]
    async fn create_local_rejects_duplicate_email() {
        let store = InMemoryUserStore::new();
        store
            .create_local("a@example.com", Some("alpha"), "hash")
            .await
            .unwrap();

        let err = store
            .create_local("a@example.com", Some("other"), "hash2")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));
    }

    #[tokio::test]
    async fn create_local_rejects_duplicate_username() {
        let store = InMemoryUserStore::new();
        store
            .create_local("a@example.com", Some("alpha"), "hash")
            .await
            .unwrap();

        let err = store
            .create_local("b@example.com", Some("alpha"), "hash2")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateUsername));
    }

    #[tokio::test]
    async fn create_local_starts_with_unset_profile() {
        let store = InMemoryUserStore::new();
        let user = store
            .create_local("a@example.com", None, "hash")
            .await
            .unwrap();
        assert!(user.name.is_none());
        assert!(user.bio.is_none());
        assert!(!user.email_verified);
        assert_eq!(user.password_hash.as_deref(), Some("hash"));
    }

    #[tokio::test]
    async fn verify_credentials_matrix() {
        let store = InMemoryUserStore::new();
        let hash = hash_password("hunter2hunter2").unwrap();
        store
            .create_local("a@example.com", None, &hash)
            .await
            .unwrap();
        store.create_or_link_oauth(&identity("sub-1", "oauth@example.com")).await.unwrap();

        let ok = store
            .verify_credentials("a@example.com", "hunter2hunter2")
            .await
            .unwrap();
        assert!(ok.is_some());

        let wrong = store
            .verify_credentials("a@example.com", "wrong-password")
            .await
            .unwrap();
        assert!(wrong.is_none());

        let unknown = store
            .verify_credentials("nobody@example.com", "hunter2hunter2")
            .await
            .unwrap();
        assert!(unknown.is_none());

        // federated-only account never matches a password
        let oauth_only = store
            .verify_credentials("oauth@example.com", "hunter2hunter2")
            .await
            .unwrap();
        assert!(oauth_only.is_none());
    }

    #[tokio::test]
    async fn oauth_create_then_link_is_idempotent() {
        let store = InMemoryUserStore::new();
        let first = store
            .create_or_link_oauth(&identity("sub-42", "c@example.com"))
            .await
            .unwrap();
        assert!(first.email_verified);
        assert_eq!(first.external_id.as_deref(), Some("sub-42"));

        let second = store
            .create_or_link_oauth(&identity("sub-42", "c@example.com"))
            .await
            .unwrap();
        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    async fn oauth_links_to_existing_local_account() {
        let store = InMemoryUserStore::new();
        let local = store
            .create_local("d@example.com", Some("dee"), "hash")
            .await
            .unwrap();
        assert!(local.external_id.is_none());

        let linked = store
            .create_or_link_oauth(&identity("sub-77", "d@example.com"))
            .await
            .unwrap();
        assert_eq!(linked.id, local.id);
        assert_eq!(linked.external_id.as_deref(), Some("sub-77"));
        assert!(linked.email_verified);
        // password survives linking
        assert_eq!(linked.password_hash.as_deref(), Some("hash"));
    }

    #[tokio::test]
    async fn update_profile_touches_only_given_fields() {
        let store = InMemoryUserStore::new();
        let user = store
            .create_local("e@example.com", None, "hash")
            .await
            .unwrap();

        let changed = store
            .update_profile(
                user.id,
                &ProfileChanges {
                    name: Some("Eve".into()),
                    bio: Some("hello".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(changed.name.as_deref(), Some("Eve"));
        assert_eq!(changed.bio.as_deref(), Some("hello"));
        assert!(changed.avatar_url.is_none());

        let missing = store
            .update_profile(Uuid::new_v4(), &ProfileChanges::default())
            .await;
        assert!(matches!(missing, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn update_user_changes_account_fields() {
        let store = InMemoryUserStore::new();
        let user = store
            .create_local("g@example.com", Some("gee"), "hash")
            .await
            .unwrap();

        let changed = store
            .update_user(
                user.id,
                &UserChanges {
                    username: Some("gee2".into()),
                    email_verified: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(changed.username.as_deref(), Some("gee2"));
        assert!(changed.email_verified);
        assert_eq!(changed.email, "g@example.com");
    }

    #[tokio::test]
    async fn link_external_account_sets_subject() {
        let store = InMemoryUserStore::new();
        let user = store
            .create_local("f@example.com", None, "hash")
            .await
            .unwrap();

        let linked = store.link_external_account(user.id, "sub-99").await.unwrap();
        assert_eq!(linked.external_id.as_deref(), Some("sub-99"));

        let found = store.find_by_external_id("sub-99").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));
    }
}
