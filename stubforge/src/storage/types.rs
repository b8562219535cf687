//! Core types for disks and uploads

use super::disk::DiskAlias;
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    /// I/O error during a storage operation
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Path escapes the disk root or is otherwise unusable
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// No disk is registered for this alias
    #[error("Disk not configured: {0}")]
    DiskNotConfigured(DiskAlias),

    /// The disk cannot perform this operation
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// Image decoding, transformation or encoding failed
    #[error("Image processing failed: {0}")]
    Processing(String),

    /// Generic storage error
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A file received with a request, not yet stored
///
/// # Examples
///
/// ```rust
/// use stubforge::storage::UploadedFile;
///
/// let file = UploadedFile::new("avatar.PNG", "image/png", vec![1, 2, 3]);
/// assert_eq!(file.size(), 3);
/// assert_eq!(file.extension().as_deref(), Some("png"));
/// assert!(file.is_valid());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Client-side file name
    pub filename: String,

    /// MIME type reported by the client
    pub content_type: String,

    /// File contents
    pub data: Vec<u8>,
}

impl UploadedFile {
    /// Creates a new uploaded file
    #[must_use]
    pub fn new(filename: impl Into<String>, content_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            data,
        }
    }

    /// Size in bytes
    #[must_use]
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// Lower-cased extension of the client file name
    #[must_use]
    pub fn extension(&self) -> Option<String> {
        self.filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
    }

    /// Whether the upload completed with content
    ///
    /// An empty body is what browsers send for a file input left blank.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.data.is_empty() && !self.filename.trim().is_empty()
    }

    /// Whether the content is an image, judged by its magic bytes
    #[must_use]
    pub fn is_image(&self) -> bool {
        infer::is_image(&self.data)
    }
}

/// Files of one request, keyed by form field
#[derive(Debug, Clone, Default)]
pub struct UploadedFiles {
    files: HashMap<String, UploadedFile>,
}

impl UploadedFiles {
    /// Creates an empty set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file under `field`, replacing any previous one
    pub fn insert(&mut self, field: impl Into<String>, file: UploadedFile) {
        self.files.insert(field.into(), file);
    }

    /// Builder form of [`insert`](Self::insert)
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, file: UploadedFile) -> Self {
        self.insert(field, file);
        self
    }

    /// File submitted under `field`
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&UploadedFile> {
        self.files.get(field)
    }

    /// File submitted under `field`, if it carries content
    #[must_use]
    pub fn valid(&self, field: &str) -> Option<&UploadedFile> {
        self.get(field).filter(|file| file.is_valid())
    }

    /// Whether no files were submitted
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
