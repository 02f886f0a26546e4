use async_trait::async_trait;
use axum::extract::{FromRequest, Multipart, Request};
use std::collections::HashMap;
use std::marker::PhantomData;

use super::{StoredFile, UploadStore};
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};

/// Names the single multipart field a route accepts a file in.
pub trait FileField: Send + Sync + 'static {
    const NAME: &'static str;
}

pub struct ImageField;

impl FileField for ImageField {
    const NAME: &'static str = "image";
}

pub struct ProfilePictureField;

impl FileField for ProfilePictureField {
    const NAME: &'static str = "profilePicture";
}

/// Text fields of a multipart form plus the file stored from it, if any.
#[derive(Debug, Default)]
pub struct UploadForm {
    fields: HashMap<String, String>,
    file: Option<StoredFile>,
}

impl UploadForm {
    /// Drain `multipart`, writing the file in `file_field` to `store`.
    /// A file stored before a later part fails is removed again.
    pub async fn read(
        mut multipart: Multipart,
        store: &UploadStore,
        file_field: &str,
    ) -> AppResult<Self> {
        let mut form = Self::default();
        match form.read_parts(&mut multipart, store, file_field).await {
            Ok(()) => Ok(form),
            Err(e) => {
                form.discard(store).await;
                Err(e)
            }
        }
    }

    async fn read_parts(
        &mut self,
        multipart: &mut Multipart,
        store: &UploadStore,
        file_field: &str,
    ) -> AppResult<()> {
        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            let Some(original_name) = field.file_name().map(str::to_string) else {
                let value = field.text().await?;
                self.fields.insert(name, value);
                continue;
            };

            let bytes = field.bytes().await?;
            // Browsers submit an empty part for an untouched file input.
            if bytes.is_empty() && original_name.is_empty() {
                continue;
            }
            if name != file_field {
                return Err(AppError::ValidationError(format!(
                    "Unexpected file field '{name}'"
                )));
            }
            if self.file.is_some() {
                return Err(AppError::ValidationError(format!(
                    "Only one file may be uploaded in '{name}'"
                )));
            }

            self.file = Some(store.save(Some(&original_name), &bytes).await?);
        }

        Ok(())
    }

    /// Trimmed value of a text field; blank counts as absent.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Whether the form carried the text field at all, blank or not.
    pub fn has(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn require(&self, name: &str) -> AppResult<&str> {
        self.text(name)
            .ok_or_else(|| AppError::ValidationError(format!("Missing required field '{name}'")))
    }

    pub fn file(&self) -> Option<&StoredFile> {
        self.file.as_ref()
    }

    /// Remove the stored file, e.g. when the request fails after upload.
    pub async fn discard(&mut self, store: &UploadStore) {
        if let Some(file) = self.file.take() {
            store.remove(&file.filename).await;
        }
    }
}

/// Multipart extractor that persists the `F` file before the handler runs.
pub struct Upload<F> {
    pub form: UploadForm,
    _field: PhantomData<F>,
}

#[async_trait]
impl<F: FileField> FromRequest<AppState> for Upload<F> {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let multipart = Multipart::from_request(req, state).await?;
        let form = UploadForm::read(multipart, &state.uploads, F::NAME).await?;

        Ok(Self {
            form,
            _field: PhantomData,
        })
    }
}
