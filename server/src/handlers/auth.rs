use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::extractors::JsonBody;
use crate::models::{LoginIdentity, NewUser, User};
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};
use crate::utils::password::{hash_password, verify_password};
use crate::utils::response::created;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct RegisteredUser {
    pub user: User,
}

pub async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    let name = payload.name.trim();
    let email = payload.email.trim();
    if name.is_empty() || email.is_empty() || payload.password.is_empty() {
        return Err(AppError::ValidationError(
            "name, email and password are required".to_string(),
        ));
    }

    let password_hash = hash_password(payload.password, state.config.bcrypt_cost).await?;
    let user = state
        .users
        .create(NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password_hash,
        })
        .await?;

    tracing::info!(user_id = %user.user_id, email = %user.email, "User registered");

    Ok(created(RegisteredUser { user }))
}

/// Unknown email and wrong password answer identically.
pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> AppResult<Json<LoginIdentity>> {
    let Some(user) = state.users.find_by_email(payload.email.trim()).await? else {
        return Err(AppError::ValidationError(INVALID_CREDENTIALS.to_string()));
    };

    if !verify_password(payload.password, user.password_hash.clone()).await? {
        return Err(AppError::ValidationError(INVALID_CREDENTIALS.to_string()));
    }

    tracing::info!(user_id = %user.user_id, email = %user.email, "User logged in");

    Ok(Json(LoginIdentity::from(user)))
}
