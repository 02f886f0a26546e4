//! Local storage for uploaded files, served back under `/uploads`.

use chrono::Utc;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

mod form;

pub use form::{FileField, ImageField, ProfilePictureField, Upload, UploadForm};

/// URL prefix the upload directory is mounted under.
pub const PUBLIC_PREFIX: &str = "/uploads";

const MAX_EXTENSION_LEN: usize = 10;

/// A file written to the upload directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub filename: String,
}

impl StoredFile {
    /// Canonical reference stored in the database, e.g. `/uploads/<file>`.
    pub fn public_path(&self) -> String {
        format!("{PUBLIC_PREFIX}/{}", self.filename)
    }
}

#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn ensure_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.dir).await
    }

    /// Persist `bytes` under a fresh `<millis>-<uuid><.ext>` name. The
    /// client's filename only contributes its extension.
    pub async fn save(&self, original_name: Option<&str>, bytes: &[u8]) -> io::Result<StoredFile> {
        let filename = generate_filename(original_name);
        fs::write(self.dir.join(&filename), bytes).await?;
        tracing::debug!(filename = %filename, size = bytes.len(), "Stored upload");
        Ok(StoredFile { filename })
    }

    /// Map a stored reference (`/uploads/<file>` or a bare filename) to its
    /// path on disk. `None` for anything that would escape the directory.
    pub fn resolve(&self, reference: &str) -> Option<PathBuf> {
        let name = reference
            .strip_prefix(PUBLIC_PREFIX)
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(reference);

        is_bare_filename(name).then(|| self.dir.join(name))
    }

    /// Remove the file behind `reference`. Failures are logged and
    /// swallowed: a stale file never fails the request that replaced it.
    pub async fn remove(&self, reference: &str) {
        let Some(path) = self.resolve(reference) else {
            tracing::warn!(reference = %reference, "Refusing to remove file outside upload dir");
            return;
        };

        match fs::remove_file(&path).await {
            Ok(()) => tracing::info!(path = %path.display(), "Removed upload"),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "Failed to remove upload"),
        }
    }
}

/// True for a plain file name with no directory components.
pub fn is_bare_filename(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && !name.contains('\0')
}

fn generate_filename(original_name: Option<&str>) -> String {
    let stem = format!("{}-{}", Utc::now().timestamp_millis(), Uuid::new_v4().simple());

    let extension = original_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| ext.len() <= MAX_EXTENSION_LEN && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(str::to_ascii_lowercase);

    match extension {
        Some(ext) => format!("{stem}.{ext}"),
        None => stem,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_names_keep_safe_extension_only() {
        let name = generate_filename(Some("../../etc/Poster.PNG"));
        assert!(name.ends_with(".png"));
        assert!(is_bare_filename(&name));

        let name = generate_filename(Some("archive.tar.gz; rm -rf"));
        assert!(!name.contains(' '));
        assert!(!name.contains('.'));

        assert_ne!(generate_filename(None), generate_filename(None));
    }

    #[test]
    fn resolve_accepts_public_path_and_bare_name() {
        let store = UploadStore::new("/srv/uploads");
        assert_eq!(
            store.resolve("/uploads/a.png"),
            Some(PathBuf::from("/srv/uploads/a.png"))
        );
        assert_eq!(store.resolve("a.png"), Some(PathBuf::from("/srv/uploads/a.png")));
    }

    #[test]
    fn resolve_rejects_traversal() {
        let store = UploadStore::new("/srv/uploads");
        assert_eq!(store.resolve("/uploads/../secret"), None);
        assert_eq!(store.resolve("../secret"), None);
        assert_eq!(store.resolve("/uploads/"), None);
        assert_eq!(store.resolve("http://host/uploads/a.png"), None);
    }

    #[tokio::test]
    async fn save_then_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path());

        let stored = store.save(Some("poster.jpg"), b"jpeg").await.unwrap();
        let path = store.resolve(&stored.public_path()).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"jpeg");

        store.remove(&stored.public_path()).await;
        assert!(!path.exists());

        // Removing again only logs.
        store.remove(&stored.public_path()).await;
    }
}
