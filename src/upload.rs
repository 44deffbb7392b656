//! Upload receiver: persists uploaded binaries to a directory on local disk.
//!
//! The receiver consumes a multipart body, looks for the single file field
//! named `image`, and writes its bytes under the client-supplied original
//! filename verbatim. There is no sanitization and no collision handling: a
//! second upload with the same original filename silently overwrites the
//! first, and concurrent uploads race on last-writer-wins. Files on disk
//! are a shared mutable resource with no locking.

use std::path::{Path, PathBuf};

use axum::extract::Multipart;
use bytes::Bytes;
use tracing::debug;

use crate::error::UploadError;

/// Name of the multipart field carrying the uploaded file.
pub const UPLOAD_FIELD: &str = "image";

/// Filename metadata for a persisted upload.
///
/// `filename` is the name the binary was stored under; `originalname` is
/// the name the client supplied. The two are identical in this system.
#[derive(Debug, Clone)]
pub struct StoredUpload {
    pub filename: String,
    pub originalname: String,
}

/// Writes uploaded files into a fixed directory.
#[derive(Debug, Clone)]
pub struct UploadReceiver {
    dir: PathBuf,
}

impl UploadReceiver {
    /// Create a receiver targeting the given directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory uploads are written to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the upload directory if it does not exist yet.
    ///
    /// Called once at startup, before the server begins listening.
    pub async fn ensure_dir(&self) -> Result<(), UploadError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Consume a multipart body and persist its `image` field.
    ///
    /// The file is written synchronously with respect to the request: the
    /// returned metadata refers to bytes already on disk.
    pub async fn receive(&self, mut multipart: Multipart) -> Result<StoredUpload, UploadError> {
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| UploadError::Multipart(e.to_string()))?
        {
            if field.name() != Some(UPLOAD_FIELD) {
                continue;
            }

            let originalname = field
                .file_name()
                .ok_or(UploadError::MissingFilename)?
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| UploadError::Multipart(e.to_string()))?;

            self.store_file(&originalname, &data).await?;

            return Ok(StoredUpload {
                filename: originalname.clone(),
                originalname,
            });
        }

        Err(UploadError::MissingField)
    }

    /// Write `data` under `filename` in the upload directory.
    ///
    /// The client filename is used verbatim; an existing file with the same
    /// name is overwritten.
    async fn store_file(&self, filename: &str, data: &Bytes) -> Result<(), UploadError> {
        let path = self.dir.join(filename);
        tokio::fs::write(&path, data).await?;
        debug!(filename = filename, bytes = data.len(), "stored upload");
        Ok(())
    }
}
