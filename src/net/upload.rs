//! Image files staged for the multipart create request.

#[cfg(test)]
#[path = "upload_test.rs"]
mod upload_test;

use std::path::Path;

/// Errors produced while loading an image from disk.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is empty")]
    Empty { path: String },
}

/// A picked image file, held in memory until the create request is sent.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ImageUpload {
    /// Build an upload from in-memory bytes, inferring the MIME type from
    /// the file name.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::Empty`] when `bytes` is empty.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, UploadError> {
        let file_name = file_name.into();
        if bytes.is_empty() {
            return Err(UploadError::Empty { path: file_name });
        }
        let mime = mime_for(&file_name);
        Ok(Self { file_name, mime, bytes })
    }

    /// Read an image file without blocking the runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is empty.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, UploadError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| UploadError::Read { path: display.clone(), source })?;
        if bytes.is_empty() {
            return Err(UploadError::Empty { path: display });
        }
        let file_name = path
            .file_name()
            .map_or_else(|| display.clone(), |name| name.to_string_lossy().into_owned());
        Self::new(file_name, bytes)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// MIME type guessed from the file extension; unknown or missing
/// extensions are sent as `application/octet-stream` for the server to sniff.
#[must_use]
pub fn mime_for(file_name: &str) -> String {
    mime_guess::from_path(file_name).first_or_octet_stream().to_string()
}
