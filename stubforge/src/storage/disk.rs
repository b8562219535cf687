//! Disk aliases and the disk registry
//!
//! Callers name disks with free-form tokens. The token table is closed:
//!
//! | token                       | alias        |
//! |-----------------------------|--------------|
//! | `s3`                        | `S3`         |
//! | `local`, `storage.local`    | `Local`      |
//! | `public`, `storage.public`  | `Public`     |
//! | anything else               | `PublicPath` |
//!
//! `PublicPath` is the web root itself, served without a storage prefix.

use super::local::LocalDisk;
use super::traits::Disk;
use super::types::{StorageError, StorageResult};
use crate::config::UploadSettings;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A resolved disk name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiskAlias {
    /// Remote object storage
    S3,
    /// Private application storage
    Local,
    /// Publicly served application storage
    Public,
    /// Files directly under the web root
    PublicPath,
}

impl DiskAlias {
    /// Every alias
    pub const ALL: [Self; 4] = [Self::S3, Self::Local, Self::Public, Self::PublicPath];

    /// Resolve a token; total over all strings
    ///
    /// # Examples
    ///
    /// ```
    /// # use stubforge::storage::DiskAlias;
    /// assert_eq!(DiskAlias::resolve("storage.local"), DiskAlias::Local);
    /// assert_eq!(DiskAlias::resolve("public"), DiskAlias::Public);
    /// assert_eq!(DiskAlias::resolve("azure"), DiskAlias::PublicPath);
    /// ```
    #[must_use]
    pub fn resolve(token: &str) -> Self {
        match token {
            "s3" => Self::S3,
            "local" | "storage.local" => Self::Local,
            "public" | "storage.public" => Self::Public,
            _ => Self::PublicPath,
        }
    }

    /// Canonical name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::S3 => "s3",
            Self::Local => "local",
            Self::Public => "public",
            Self::PublicPath => "public_path",
        }
    }
}

impl fmt::Display for DiskAlias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Join a directory and a file name into a disk key
///
/// ```
/// # use stubforge::storage::disk::join_key;
/// assert_eq!(join_key("images/posts/", "a.png"), "images/posts/a.png");
/// assert_eq!(join_key("", "a.png"), "a.png");
/// assert_eq!(join_key("/uploads", "/a.png"), "uploads/a.png");
/// ```
#[must_use]
pub fn join_key(dir: &str, name: &str) -> String {
    let dir = dir.trim_matches('/');
    let name = name.trim_start_matches('/');
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{dir}/{name}")
    }
}

/// Disks by alias
#[derive(Clone, Default)]
pub struct DiskManager {
    disks: HashMap<DiskAlias, Arc<dyn Disk>>,
}

impl fmt::Debug for DiskManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut aliases: Vec<_> = self.disks.keys().map(|alias| alias.as_str()).collect();
        aliases.sort_unstable();
        f.debug_struct("DiskManager").field("disks", &aliases).finish()
    }
}

impl DiskManager {
    /// An empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the local disks described by `settings`
    ///
    /// `s3` is left unregistered; add it with [`with_disk`](Self::with_disk).
    pub fn from_settings(settings: &UploadSettings) -> StorageResult<Self> {
        let local = |root: &std::path::Path, url: Option<&str>| -> StorageResult<Arc<dyn Disk>> {
            let disk = match url {
                Some(url) => LocalDisk::new(root, url)?,
                None => LocalDisk::private(root)?,
            };
            let disk = match &settings.signing_key {
                Some(key) => disk.with_signing_key(key),
                None => disk,
            };
            Ok(Arc::new(disk))
        };

        Ok(Self::new()
            .with_disk(DiskAlias::Local, local(settings.local_root.as_path(), None)?)
            .with_disk(
                DiskAlias::Public,
                local(settings.public_disk_root.as_path(), Some(&settings.public_disk_url))?,
            )
            .with_disk(
                DiskAlias::PublicPath,
                local(settings.public_root.as_path(), Some(&settings.public_url))?,
            ))
    }

    /// Register (or replace) the disk behind `alias`
    #[must_use]
    pub fn with_disk(mut self, alias: DiskAlias, disk: Arc<dyn Disk>) -> Self {
        self.disks.insert(alias, disk);
        self
    }

    /// Disk registered for `alias`
    pub fn disk(&self, alias: DiskAlias) -> StorageResult<Arc<dyn Disk>> {
        self.disks
            .get(&alias)
            .cloned()
            .ok_or(StorageError::DiskNotConfigured(alias))
    }

    /// Resolve a token and return its disk
    pub fn resolve(&self, token: &str) -> StorageResult<(DiskAlias, Arc<dyn Disk>)> {
        let alias = DiskAlias::resolve(token);
        tracing::trace!(token, alias = %alias, "resolved disk alias");
        Ok((alias, self.disk(alias)?))
    }

    /// Whether `alias` has a disk
    #[must_use]
    pub fn has_disk(&self, alias: DiskAlias) -> bool {
        self.disks.contains_key(&alias)
    }
}
