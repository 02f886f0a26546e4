use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub profile_picture: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A `users` row after an update, alongside the picture it replaced.
#[derive(Debug, Clone, FromRow)]
pub struct UserUpdate {
    #[sqlx(flatten)]
    pub user: User,
    pub previous_picture: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Columns an update may touch. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub profile_picture: Option<String>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub profile_picture: Option<String>,
}

impl From<User> for Profile {
    fn from(user: User) -> Self {
        Self {
            name: user.name,
            email: user.email,
            created_at: user.created_at,
            profile_picture: user.profile_picture,
        }
    }
}

/// Identity returned by a successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginIdentity {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<User> for LoginIdentity {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            name: user.name,
            email: user.email,
        }
    }
}
