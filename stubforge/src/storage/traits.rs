//! Disk trait definition

use super::types::{StorageResult, UploadedFile};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// A storage backend addressed by slash-separated keys
///
/// Keys are relative to the disk root (`images/posts/a1b2.webp`). Remote
/// backends are registered by the host application through
/// [`DiskManager::with_disk`](super::DiskManager::with_disk); the crate ships
/// [`LocalDisk`](super::LocalDisk) for everything on the local filesystem.
///
/// # Examples
///
/// ```rust,no_run
/// use stubforge::storage::{Disk, LocalDisk, UploadedFile};
///
/// # async fn example() -> anyhow::Result<()> {
/// let disk = LocalDisk::new("storage/app/public", "/storage")?;
///
/// let file = UploadedFile::new("photo.jpg", "image/jpeg", vec![/* ... */]);
/// let key = disk.put_as("images", &file, "a1b2.jpg").await?;
/// assert!(disk.exists(&key).await?);
/// if let Some(url) = disk.url(&key) {
///     println!("{url}");
/// }
///
/// disk.delete(&[key]).await?;
/// # Ok(())
/// # }
/// ```
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Disk: Send + Sync {
    /// Whether a file exists at `path`
    async fn exists(&self, path: &str) -> StorageResult<bool>;

    /// Write `data` to `path`, creating parent directories
    async fn put(&self, path: &str, data: Vec<u8>) -> StorageResult<()>;

    /// Store `file` in directory `dir` under `name` and return its key
    async fn put_as(&self, dir: &str, file: &UploadedFile, name: &str) -> StorageResult<String>;

    /// Delete every path; missing files are not an error
    async fn delete(&self, paths: &[String]) -> StorageResult<()>;

    /// Public URL of `path`, or `None` when the disk is not publicly served
    fn url(&self, path: &str) -> Option<String>;

    /// URL of `path` that stops working at `expires`
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unsupported`](super::StorageError::Unsupported)
    /// when the disk cannot issue time-limited URLs.
    fn temporary_url(&self, path: &str, expires: DateTime<Utc>) -> StorageResult<String>;
}
