use axum::response::IntoResponse;
use serde::Serialize;

use crate::storage::{ImageField, Upload};
use crate::utils::error::{AppError, AppResult};
use crate::utils::response::created;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    pub image_url: String,
}

/// Stores a standalone image and returns its `/uploads/...` path.
pub async fn upload_image(Upload { form, .. }: Upload<ImageField>) -> AppResult<impl IntoResponse> {
    let file = form
        .file()
        .ok_or_else(|| AppError::ValidationError("No file uploaded".to_string()))?;

    Ok(created(UploadedImage {
        image_url: file.public_path(),
    }))
}
