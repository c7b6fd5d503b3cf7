use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::users::store::{StoreError, UserStore};
use crate::users::types::{OAuthIdentity, ProfileChanges, User, UserChanges};

const USER_COLUMNS: &str = "id, email, username, password_hash, external_id, email_verified, \
                            name, avatar_url, age, date_of_birth, bio, created_at, updated_at";

pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email.to_string())
            .fetch_optional(&self.db)
            .await?;
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username.to_string())
            .fetch_optional(&self.db)
            .await?;
        Ok(user)
    }

    async fn find_by_external_id(&self, external_id: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE external_id = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(external_id.to_string())
            .fetch_optional(&self.db)
            .await?;
        Ok(user)
    }

    async fn create_local(
        &self,
        email: &str,
        username: Option<&str>,
        password_hash: &str,
    ) -> Result<User, StoreError> {
        if self.find_by_email(email).await?.is_some() {
            return Err(StoreError::DuplicateEmail);
        }
        if let Some(username) = username {
            if self.find_by_username(username).await?.is_some() {
                return Err(StoreError::DuplicateUsername);
            }
        }

        let sql = format!(
            "INSERT INTO users (email, username, password_hash) \
             VALUES ($1, $2, $3) RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email.to_string())
            .bind(username.map(String::from))
            .bind(password_hash.to_string())
            .fetch_one(&self.db)
            .await?;
        Ok(user)
    }

    async fn create_or_link_oauth(&self, identity: &OAuthIdentity) -> Result<User, StoreError> {
        if let Some(existing) = self.find_by_email(&identity.email).await? {
            if existing.external_id.is_none() {
                return self
                    .link_external_account(existing.id, &identity.external_id)
                    .await;
            }
        }
        if let Some(existing) = self.find_by_external_id(&identity.external_id).await? {
            return Ok(existing);
        }

        let sql = format!(
            "INSERT INTO users (email, external_id, email_verified, name, avatar_url) \
             VALUES ($1, $2, TRUE, $3, $4) RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(identity.email.clone())
            .bind(identity.external_id.clone())
            .bind(identity.name.clone())
            .bind(identity.avatar_url.clone())
            .fetch_one(&self.db)
            .await?;
        Ok(user)
    }

    async fn update_user(&self, id: Uuid, changes: &UserChanges) -> Result<User, StoreError> {
        let sql = format!(
            "UPDATE users SET \
                email = COALESCE($2, email), \
                username = COALESCE($3, username), \
                email_verified = COALESCE($4, email_verified), \
                updated_at = now() \
             WHERE id = $1 RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(changes.email.clone())
            .bind(changes.username.clone())
            .bind(changes.email_verified)
            .fetch_optional(&self.db)
            .await?;
        user.ok_or(StoreError::NotFound)
    }

    async fn update_profile(
        &self,
        id: Uuid,
        changes: &ProfileChanges,
    ) -> Result<User, StoreError> {
        let sql = format!(
            "UPDATE users SET \
                name = COALESCE($2, name), \
                avatar_url = COALESCE($3, avatar_url), \
                age = COALESCE($4, age), \
                date_of_birth = COALESCE($5, date_of_birth), \
                bio = COALESCE($6, bio), \
                updated_at = now() \
             WHERE id = $1 RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(changes.name.clone())
            .bind(changes.avatar_url.clone())
            .bind(changes.age)
            .bind(changes.date_of_birth)
            .bind(changes.bio.clone())
            .fetch_optional(&self.db)
            .await?;
        user.ok_or(StoreError::NotFound)
    }

    async fn link_external_account(
        &self,
        id: Uuid,
        external_id: &str,
    ) -> Result<User, StoreError> {
        let sql = format!(
            "UPDATE users SET external_id = $2, email_verified = TRUE, updated_at = now() \
             WHERE id = $1 RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(external_id.to_string())
            .fetch_optional(&self.db)
            .await?;
        user.ok_or(StoreError::NotFound)
    }
}
