use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::extractors::JsonBody;
use crate::models::{Profile, ProfileChanges, User};
use crate::state::AppState;
use crate::storage::{ProfilePictureField, Upload};
use crate::utils::error::{AppError, AppResult};
use crate::utils::password::hash_password;

/// Every field is optional and replaces only its own column. The profile
/// picture is not writable here; it changes only through an upload, so a
/// `profilePicture` key in the body is ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub new_name: Option<String>,
    pub new_email: Option<String>,
    pub new_password: Option<String>,
}

#[derive(Serialize)]
pub struct ProfilePictureResponse {
    pub success: bool,
    pub message: String,
    pub user: User,
}

pub async fn get_profile(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> AppResult<Json<Profile>> {
    let user = state
        .users
        .find_by_email(&email)
        .await?
        .ok_or_else(|| user_not_found(&email))?;

    Ok(Json(Profile::from(user)))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Path(email): Path<String>,
    JsonBody(payload): JsonBody<UpdateProfileRequest>,
) -> AppResult<Json<User>> {
    let password_hash = match payload.new_password.filter(|p| !p.is_empty()) {
        Some(password) => Some(hash_password(password, state.config.bcrypt_cost).await?),
        None => None,
    };

    let changes = ProfileChanges {
        name: trimmed(payload.new_name),
        email: trimmed(payload.new_email),
        password_hash,
        ..ProfileChanges::default()
    };
    if changes.is_empty() {
        return Err(AppError::ValidationError(
            "No updatable fields supplied".to_string(),
        ));
    }

    let updated = state
        .users
        .update(&email, changes)
        .await?
        .ok_or_else(|| user_not_found(&email))?;

    tracing::info!(user_id = %updated.user.user_id, email = %updated.user.email, "User profile updated");

    Ok(Json(updated.user))
}

pub async fn upload_profile_picture(
    State(state): State<AppState>,
    Path(email): Path<String>,
    Upload { mut form, .. }: Upload<ProfilePictureField>,
) -> AppResult<Json<ProfilePictureResponse>> {
    let Some(file) = form.file().cloned() else {
        return Err(AppError::ValidationError("No file uploaded".to_string()));
    };

    let changes = ProfileChanges {
        profile_picture: Some(file.filename.clone()),
        ..ProfileChanges::default()
    };
    let updated = match state.users.update(&email, changes).await {
        Ok(Some(updated)) => updated,
        Ok(None) => {
            form.discard(&state.uploads).await;
            return Err(user_not_found(&email));
        }
        Err(e) => {
            form.discard(&state.uploads).await;
            return Err(e);
        }
    };

    if let Some(previous) = updated
        .previous_picture
        .filter(|p| *p != file.filename)
    {
        state.uploads.remove(&previous).await;
    }

    tracing::info!(user_id = %updated.user.user_id, filename = %file.filename, "Profile picture uploaded");

    Ok(Json(ProfilePictureResponse {
        success: true,
        message: "Profile picture updated successfully".to_string(),
        user: updated.user,
    }))
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn user_not_found(email: &str) -> AppError {
    AppError::NotFound(format!("User '{email}' not found"))
}
