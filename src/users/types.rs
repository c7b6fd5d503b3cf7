use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// User record in the database. A user always carries at least one
/// authentication method: a password hash or a federated identity.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: Option<String>,
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,
    #[serde(skip_serializing, default)]
    pub external_id: Option<String>,
    pub email_verified: bool,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub age: Option<i32>,
    pub date_of_birth: Option<Date>,
    pub bio: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Projection of a user that is safe to hand to clients and to carry
/// through a session: everything except the password hash and the
/// federated subject id.
#[derive(Debug, Clone, Serialize)]
pub struct SafeUser {
    pub id: Uuid,
    pub email: String,
    pub username: Option<String>,
    pub email_verified: bool,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub age: Option<i32>,
    pub date_of_birth: Option<Date>,
    pub bio: Option<String>,
    pub created_at: OffsetDateTime,
}

impl From<User> for SafeUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            username: u.username,
            email_verified: u.email_verified,
            name: u.name,
            avatar_url: u.avatar_url,
            age: u.age,
            date_of_birth: u.date_of_birth,
            bio: u.bio,
            created_at: u.created_at,
        }
    }
}

/// Identity returned by the OAuth provider's userinfo endpoint.
#[derive(Debug, Clone)]
pub struct OAuthIdentity {
    pub external_id: String,
    pub email: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
}

/// Partial update of account fields. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub username: Option<String>,
    pub email_verified: Option<bool>,
}

/// Partial update of profile fields. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub age: Option<i32>,
    pub date_of_birth: Option<Date>,
    pub bio: Option<String>,
}

#[cfg(test)]
mod projection_tests {
    use super::*;

    fn sample_user(password_hash: Option<&str>, external_id: Option<&str>) -> User {
        User {
            id: Uuid::new_v4(),
            email: "user@example.com".into(),
            username: Some("user".into()),
            password_hash: password_hash.map(String::from),
            external_id: external_id.map(String::from),
            email_verified: external_id.is_some(),
            name: Some("Test User".into()),
            avatar_url: None,
            age: Some(30),
            date_of_birth: None,
            bio: Some("hi".into()),
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn safe_projection_never_exposes_secrets() {
        // local, federated and mixed account shapes
        for user in [
            sample_user(Some("$argon2id$stub"), None),
            sample_user(None, Some("provider-sub-1")),
            sample_user(Some("$argon2id$stub"), Some("provider-sub-2")),
        ] {
            let safe = SafeUser::from(user.clone());
            let json = serde_json::to_string(&safe).unwrap();
            assert!(!json.contains("password_hash"));
            assert!(!json.contains("external_id"));
            assert!(!json.contains("provider-sub"));
            assert!(!json.contains("argon2id"));
            assert_eq!(safe.id, user.id);
            assert_eq!(safe.email, user.email);
        }
    }

    #[test]
    fn user_serialization_skips_credentials() {
        let user = sample_user(Some("$argon2id$stub"), Some("provider-sub-3"));
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("provider-sub-3"));
        assert!(json.contains("user@example.com"));
    }
}
