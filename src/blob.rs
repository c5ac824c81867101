//! Blob storage for uploaded images and legal documents.
//!
//! Files are written under `<entity>/<millis>_<file name>` and the store hands
//! back a durable download URL which the owning document keeps.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use rocket::fs::TempFile;
use thiserror::Error;
use tokio::io::AsyncReadExt;

pub type SharedBlobs = Arc<dyn BlobStore>;

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("failed to write blob `{path}`: {source}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to read uploaded file: {0}")]
    Read(#[from] io::Error),
}

/// A file received from a form, fully buffered.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, content_type: Option<&str>, bytes: Vec<u8>) -> Self {
        Upload {
            file_name: file_name.into(),
            content_type: content_type.map(str::to_string),
            bytes,
        }
    }

    /// Buffers a multipart file. Returns `None` for an empty or missing part.
    pub async fn from_temp_file(file: &TempFile<'_>, fallback_name: &str) -> Result<Option<Self>, BlobError> {
        if file.len() == 0 {
            return Ok(None);
        }

        let stem = file.name().unwrap_or(fallback_name);
        let file_name = match file.content_type().and_then(|ct| ct.extension()) {
            Some(extension) => format!("{stem}.{extension}"),
            None => stem.to_string(),
        };

        let reader = file.open().await?;
        tokio::pin!(reader);
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;

        Ok(Some(Upload {
            file_name,
            content_type: file.content_type().map(|ct| ct.to_string()),
            bytes,
        }))
    }
}

#[rocket::async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores `upload` at `path` and returns its download URL.
    async fn put(&self, path: &str, upload: &Upload) -> Result<String, BlobError>;
}

/// Storage path for a new upload of the given entity type.
pub fn blob_path(prefix: &str, file_name: &str) -> String {
    format!("{prefix}/{}_{}", Utc::now().timestamp_millis(), sanitize_file_name(file_name))
}

fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Writes blobs below a local directory that the server exposes at `/files`.
pub struct LocalBlobStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        LocalBlobStore {
            root: root.into(),
            public_base_url: public_base_url.into(),
        }
    }
}

#[rocket::async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(&self, path: &str, upload: &Upload) -> Result<String, BlobError> {
        let target = self.root.join(path);
        let write_err = |source| BlobError::Write {
            path: path.to_string(),
            source,
        };

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
        }
        tokio::fs::write(&target, &upload.bytes).await.map_err(write_err)?;

        tracing::debug!(path, bytes = upload.bytes.len(), "stored upload");
        Ok(format!(
            "{}/files/{}",
            self.public_base_url.trim_end_matches('/'),
            path
        ))
    }
}
