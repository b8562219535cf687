//! Local filesystem disk

use super::disk::join_key;
use super::traits::Disk;
use super::types::{StorageError, StorageResult, UploadedFile};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Disk rooted at a local directory
///
/// Keys map directly onto paths below the root:
///
/// ```text
/// storage/app/public/
/// └── images/
///     └── posts/
///         └── 0f8c2e7a9b1d4c3e8f6a5b4c3d2e1f0a.webp
/// ```
///
/// A disk built with [`LocalDisk::private`] is not served over HTTP and has
/// no public URL. Temporary URLs are signed with a shared secret when one is
/// configured: `<url>?expires=<unix>&signature=<hex sha256>`, where a private
/// disk signs the bare key for the host to route.
#[derive(Debug, Clone)]
pub struct LocalDisk {
    root: PathBuf,
    base_url: Option<String>,
    signing_key: Option<String>,
}

impl LocalDisk {
    /// Create a disk rooted at `root`, served under `base_url`
    ///
    /// The root is created on first write.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidPath`] if `root` exists and is not a
    /// directory.
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> StorageResult<Self> {
        Self::build(root.into(), Some(base_url.into()))
    }

    /// Create a disk rooted at `root` that is not publicly served
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidPath`] if `root` exists and is not a
    /// directory.
    pub fn private(root: impl Into<PathBuf>) -> StorageResult<Self> {
        Self::build(root.into(), None)
    }

    fn build(root: PathBuf, base_url: Option<String>) -> StorageResult<Self> {
        if root.exists() && !root.is_dir() {
            return Err(StorageError::InvalidPath(format!(
                "{} is not a directory",
                root.display()
            )));
        }

        Ok(Self {
            root,
            base_url,
            signing_key: None,
        })
    }

    /// Enable signed temporary URLs
    #[must_use]
    pub fn with_signing_key(mut self, key: impl Into<String>) -> Self {
        self.signing_key = Some(key.into());
        self
    }

    /// Disk root
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem path of a key, rejecting keys that leave the root
    pub fn key_to_path(&self, key: &str) -> StorageResult<PathBuf> {
        let relative = Path::new(key.trim_start_matches('/'));
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if key.trim().is_empty() || escapes {
            return Err(StorageError::InvalidPath(key.to_string()));
        }
        Ok(self.root.join(relative))
    }

    /// Check a signature produced by [`Disk::temporary_url`]
    #[must_use]
    pub fn verify_signature(&self, path: &str, expires: i64, signature: &str, now: DateTime<Utc>) -> bool {
        let Some(secret) = &self.signing_key else {
            return false;
        };
        now.timestamp() <= expires && sign(secret, path, expires) == signature
    }
}

fn sign(secret: &str, path: &str, expires: i64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(path.trim_start_matches('/').as_bytes());
    hasher.update(b"|");
    hasher.update(expires.to_string().as_bytes());
    hasher.update(b"|");
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl Disk for LocalDisk {
    async fn exists(&self, path: &str) -> StorageResult<bool> {
        let path = self.key_to_path(path)?;
        Ok(fs::try_exists(&path).await? && fs::metadata(&path).await?.is_file())
    }

    async fn put(&self, path: &str, data: Vec<u8>) -> StorageResult<()> {
        let file_path = self.key_to_path(path)?;
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut f = fs::File::create(&file_path).await?;
        f.write_all(&data).await?;
        f.flush().await?;

        tracing::debug!(path = %file_path.display(), size_bytes = data.len(), "wrote file");
        Ok(())
    }

    async fn put_as(&self, dir: &str, file: &UploadedFile, name: &str) -> StorageResult<String> {
        if name.contains('/') || name.contains('\\') {
            return Err(StorageError::InvalidPath(name.to_string()));
        }
        let key = join_key(dir, name);
        self.put(&key, file.data.clone()).await?;
        Ok(key)
    }

    async fn delete(&self, paths: &[String]) -> StorageResult<()> {
        for key in paths {
            let path = self.key_to_path(key)?;
            match fs::remove_file(&path).await {
                Ok(()) => tracing::debug!(path = %path.display(), "deleted file"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    fn url(&self, path: &str) -> Option<String> {
        let base = self.base_url.as_deref()?;
        Some(format!(
            "{}/{}",
            base.trim_end_matches('/'),
            path.trim_start_matches('/')
        ))
    }

    fn temporary_url(&self, path: &str, expires: DateTime<Utc>) -> StorageResult<String> {
        let secret = self.signing_key.as_deref().ok_or_else(|| {
            StorageError::Unsupported(format!(
                "temporary URLs need a signing key ({})",
                self.root.display()
            ))
        })?;
        let expires = expires.timestamp();
        let target = self
            .url(path)
            .unwrap_or_else(|| path.trim_start_matches('/').to_string());
        Ok(format!(
            "{target}?expires={expires}&signature={}",
            sign(secret, path, expires)
        ))
    }
}
