//! On-disk storage for catalog images.
//!
//! A new image is written before the database row that references it. The
//! returned [`StagedImage`] deletes the file again when dropped, unless
//! [`StagedImage::commit`] was called after the row was saved. A failed
//! insert or update therefore never leaves an orphaned file behind.

use std::path::{Path, PathBuf};

use anyhow::Context;
use axum::body::Bytes;
use uuid::Uuid;

use crate::error::{AppError, Result};

/// URL prefix under which the uploads directory is served.
pub const PUBLIC_PREFIX: &str = "/uploads";

const ALLOWED_TYPES: &[(&str, &str)] = &[
    ("image/jpeg", "jpg"),
    ("image/jpg", "jpg"),
    ("image/png", "png"),
];

/// An image received from a client, already checked against the allowed
/// MIME types.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    extension: &'static str,
    bytes: Bytes,
}

impl ImageUpload {
    pub fn new(content_type: Option<&str>, bytes: Bytes) -> Result<Self> {
        let content_type = content_type.unwrap_or_default().to_ascii_lowercase();
        let extension = ALLOWED_TYPES
            .iter()
            .find(|(mime, _)| *mime == content_type)
            .map(|(_, ext)| *ext)
            .ok_or_else(|| {
                AppError::BadRequest(
                    "Invalid file type. Only JPEG, PNG, and JPG are allowed.".into(),
                )
            })?;

        if bytes.is_empty() {
            return Err(AppError::BadRequest("Uploaded image is empty".into()));
        }

        Ok(Self { extension, bytes })
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

    pub async fn ensure_dir(&self) -> anyhow::Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create upload dir {}", self.dir.display()))
    }

    pub fn public_url(file_name: &str) -> String {
        format!("{}/{}", PUBLIC_PREFIX, file_name)
    }

    /// Write `image` under a fresh server-generated name.
    pub async fn stage(&self, image: &ImageUpload) -> Result<StagedImage> {
        let file_name = format!("{}.{}", Uuid::new_v4(), image.extension);
        let path = self.dir.join(&file_name);

        tokio::fs::write(&path, &image.bytes)
            .await
            .with_context(|| format!("Failed to write upload {}", path.display()))?;

        tracing::info!("Stored image {} ({} bytes)", file_name, image.bytes.len());
        Ok(StagedImage {
            path,
            file_name,
            committed: false,
        })
    }

    /// Best-effort removal of a stored image. Never fails: a file that is
    /// already gone is fine, anything else is logged.
    pub async fn remove(&self, file_name: &str) {
        // Only ever touch direct children of the uploads dir.
        let Some(name) = Path::new(file_name).file_name() else {
            tracing::warn!("Refusing to remove suspicious upload path {:?}", file_name);
            return;
        };
        let path = self.dir.join(name);

        match tokio::fs::remove_file(&path).await {
            Ok(()) => tracing::info!("Removed image {}", path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("Image {} already absent", path.display())
            }
            Err(e) => tracing::warn!("Failed to remove image {}: {}", path.display(), e),
        }
    }
}

/// A written image that is not yet referenced by a committed row.
#[derive(Debug)]
pub struct StagedImage {
    path: PathBuf,
    file_name: String,
    committed: bool,
}

impl StagedImage {
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    #[cfg(test)]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Keep the file: the row referencing it has been saved.
    pub fn commit(mut self) -> String {
        self.committed = true;
        std::mem::take(&mut self.file_name)
    }
}

impl Drop for StagedImage {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        // Blocking, but a single unlink of a file this process just wrote.
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::info!("Discarded uncommitted image {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                "Failed to discard uncommitted image {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}
