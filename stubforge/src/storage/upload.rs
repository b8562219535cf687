//! Upload coordinator
//!
//! Resolves, stores, replaces and deletes the single image a record points
//! at. The record keeps only the file name; the directory and disk come from
//! the caller on every call.
//!
//! A missing upload falls back to the existing image, and deletes never fail
//! the caller.

use super::disk::{join_key, DiskManager};
use super::pipeline::{pipeline_for, ImagePipeline};
use super::processing::ImageOperation;
use super::types::{StorageResult, UploadedFiles};
use crate::config::UploadSettings;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Disk token used when none is given
pub const DEFAULT_DISK: &str = "public";

/// Parameters of one upload call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOptions {
    /// Form field carrying the file
    pub source_field: String,
    /// Directory on the disk
    pub destination_path: String,
    /// Name currently stored on the record, possibly with a query string
    pub existing_file_name: Option<String>,
    /// Disk token, resolved through [`DiskAlias::resolve`](super::DiskAlias::resolve)
    pub disk: String,
    /// Width bound
    pub width: Option<u32>,
    /// Height bound
    pub height: Option<u32>,
    /// Apply the size bounds
    pub crop: bool,
    /// Keep the aspect ratio when applying bounds
    pub preserve_aspect_ratio: bool,
}

impl UploadOptions {
    /// Options for `source_field` stored under `destination_path` on the public disk
    #[must_use]
    pub fn new(source_field: impl Into<String>, destination_path: impl Into<String>) -> Self {
        Self {
            source_field: source_field.into(),
            destination_path: destination_path.into(),
            existing_file_name: None,
            disk: DEFAULT_DISK.to_string(),
            width: None,
            height: None,
            crop: false,
            preserve_aspect_ratio: true,
        }
    }

    /// Name of the image being replaced
    #[must_use]
    pub fn with_existing(mut self, name: impl Into<String>) -> Self {
        self.existing_file_name = Some(name.into());
        self
    }

    /// Store on another disk
    #[must_use]
    pub fn on_disk(mut self, disk: impl Into<String>) -> Self {
        self.disk = disk.into();
        self
    }

    /// Bound the stored image and enable cropping
    #[must_use]
    pub const fn crop_to(mut self, width: Option<u32>, height: Option<u32>) -> Self {
        self.width = width;
        self.height = height;
        self.crop = true;
        self
    }

    /// Keep or ignore the aspect ratio when cropping
    #[must_use]
    pub const fn preserve_aspect_ratio(mut self, preserve: bool) -> Self {
        self.preserve_aspect_ratio = preserve;
        self
    }

    /// Processing step implied by the crop flags
    ///
    /// ```
    /// # use stubforge::storage::UploadOptions;
    /// # use stubforge::storage::processing::ImageOperation;
    /// let options = UploadOptions::new("avatar", "avatars");
    /// assert_eq!(options.operation(), ImageOperation::Encode);
    ///
    /// let options = options.crop_to(Some(100), Some(100)).preserve_aspect_ratio(false);
    /// assert_eq!(
    ///     options.operation(),
    ///     ImageOperation::ResizeDown { width: Some(100), height: Some(100) }
    /// );
    /// ```
    #[must_use]
    pub const fn operation(&self) -> ImageOperation {
        match (self.crop, self.preserve_aspect_ratio) {
            (true, true) => ImageOperation::ScaleDown {
                width: self.width,
                height: self.height,
            },
            (true, false) => ImageOperation::ResizeDown {
                width: self.width,
                height: self.height,
            },
            (false, _) => ImageOperation::Encode,
        }
    }
}

/// Strip a query string from a stored name
fn clean_name(name: &str) -> Option<&str> {
    let clean = name.split('?').next().unwrap_or_default().trim();
    (!clean.is_empty()).then_some(clean)
}

/// Image upload, replacement and deletion over the registered disks
#[derive(Clone)]
pub struct UploadCoordinator {
    disks: DiskManager,
    pipeline: Arc<dyn ImagePipeline>,
}

impl fmt::Debug for UploadCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadCoordinator")
            .field("disks", &self.disks)
            .field("pipeline", &self.pipeline.name())
            .finish()
    }
}

impl UploadCoordinator {
    /// Coordinator over `disks` using `pipeline` for every upload
    #[must_use]
    pub fn new(disks: DiskManager, pipeline: Arc<dyn ImagePipeline>) -> Self {
        Self { disks, pipeline }
    }

    /// Local disks and pipeline as configured
    pub fn from_settings(settings: &UploadSettings) -> StorageResult<Self> {
        Ok(Self::new(
            DiskManager::from_settings(settings)?,
            pipeline_for(settings),
        ))
    }

    /// Registered disks
    #[must_use]
    pub const fn disks(&self) -> &DiskManager {
        &self.disks
    }

    /// Clean name of an existing image, or `None` when it is not on the disk
    ///
    /// A query-string suffix (`a.webp?v=3`) is stripped before the lookup.
    /// Lookup errors and unconfigured disks count as "not found".
    pub async fn actual_image_name(&self, name: Option<&str>, path: &str, disk: &str) -> Option<String> {
        let name = clean_name(name?)?;
        let (alias, disk) = match self.disks.resolve(disk) {
            Ok(resolved) => resolved,
            Err(e) => {
                tracing::warn!(error = %e, "cannot resolve image disk");
                return None;
            }
        };

        let key = join_key(path, name);
        match disk.exists(&key).await {
            Ok(true) => Some(name.to_string()),
            Ok(false) => {
                tracing::debug!(%key, disk = %alias, "image not found");
                None
            }
            Err(e) => {
                tracing::debug!(%key, disk = %alias, error = %e, "image lookup failed");
                None
            }
        }
    }

    /// Store the file submitted under `options.source_field`
    ///
    /// Without a valid file this resolves `options.existing_file_name`
    /// instead. After a successful store the previous image is deleted.
    /// Returns the stored file name.
    ///
    /// # Errors
    ///
    /// Returns an error if the disk is not configured, the pipeline rejects
    /// the file, or the write fails. Nothing is deleted in that case.
    pub async fn upload(
        &self,
        files: &UploadedFiles,
        options: &UploadOptions,
    ) -> StorageResult<Option<String>> {
        let existing = options.existing_file_name.as_deref();

        let Some(file) = files.valid(&options.source_field) else {
            tracing::debug!(field = %options.source_field, "no upload, keeping existing image");
            return Ok(self
                .actual_image_name(existing, &options.destination_path, &options.disk)
                .await);
        };

        let (alias, disk) = self.disks.resolve(&options.disk)?;
        let prepared = self.pipeline.prepare(file, options)?;

        let extension = prepared.extension().unwrap_or_else(|| "bin".to_string());
        let name = format!("{}.{extension}", Uuid::new_v4().simple());
        let key = disk.put_as(&options.destination_path, &prepared, &name).await?;

        tracing::info!(
            %key,
            disk = %alias,
            pipeline = self.pipeline.name(),
            size_bytes = prepared.size(),
            "stored upload"
        );

        if existing.and_then(clean_name).is_some() {
            self.delete(existing, &options.destination_path, &options.disk).await;
        }

        Ok(Some(name))
    }

    /// Delete a stored image; returns whether a file was deleted
    ///
    /// Never fails: errors are logged at `warn`.
    pub async fn delete(&self, name: Option<&str>, path: &str, disk: &str) -> bool {
        let Some(actual) = self.actual_image_name(name, path, disk).await else {
            return false;
        };
        let Ok((alias, disk)) = self.disks.resolve(disk) else {
            return false;
        };

        let key = join_key(path, &actual);
        match disk.delete(std::slice::from_ref(&key)).await {
            Ok(()) => {
                tracing::info!(%key, disk = %alias, "deleted image");
                true
            }
            Err(e) => {
                tracing::warn!(%key, disk = %alias, error = %e, "failed to delete image");
                false
            }
        }
    }

    /// Public URL of a stored image
    ///
    /// `None` when the image is missing or its disk is not publicly served;
    /// use [`temporary_image_url`](Self::temporary_image_url) for those.
    pub async fn image_url(&self, name: Option<&str>, path: &str, disk: &str) -> Option<String> {
        let actual = self.actual_image_name(name, path, disk).await?;
        let (_, disk) = self.disks.resolve(disk).ok()?;
        disk.url(&join_key(path, &actual))
    }

    /// Time-limited URL of a stored image
    ///
    /// # Errors
    ///
    /// Returns an error when the disk cannot issue temporary URLs.
    pub async fn temporary_image_url(
        &self,
        name: Option<&str>,
        path: &str,
        disk: &str,
        expires: DateTime<Utc>,
    ) -> StorageResult<Option<String>> {
        let Some(actual) = self.actual_image_name(name, path, disk).await else {
            return Ok(None);
        };
        let (_, disk) = self.disks.resolve(disk)?;
        disk.temporary_url(&join_key(path, &actual), expires).map(Some)
    }
}
