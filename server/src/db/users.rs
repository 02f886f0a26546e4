use async_trait::async_trait;
use sqlx::PgPool;

use super::UserRepository;
use crate::models::{NewUser, ProfileChanges, User, UserUpdate};
use crate::utils::error::AppResult;

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: NewUser) -> AppResult<User> {
        let row = sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email, password_hash) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(user.name)
        .bind(user.email)
        .bind(user.password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn update(&self, email: &str, changes: ProfileChanges) -> AppResult<Option<UserUpdate>> {
        // The locked subselect reads the row as it was before the update.
        let row = sqlx::query_as::<_, UserUpdate>(
            "UPDATE users AS u SET
                 name = COALESCE($2, u.name),
                 email = COALESCE($3, u.email),
                 password_hash = COALESCE($4, u.password_hash),
                 profile_picture = COALESCE($5, u.profile_picture)
             FROM (SELECT user_id, profile_picture FROM users WHERE email = $1 FOR UPDATE) AS previous
             WHERE u.user_id = previous.user_id
             RETURNING u.user_id, u.name, u.email, u.password_hash, u.profile_picture,
                       u.created_at, previous.profile_picture AS previous_picture",
        )
        .bind(email)
        .bind(changes.name)
        .bind(changes.email)
        .bind(changes.password_hash)
        .bind(changes.profile_picture)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}
