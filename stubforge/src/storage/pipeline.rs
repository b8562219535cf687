//! Upload pipelines
//!
//! A pipeline turns the incoming file into the file that gets stored. The
//! choice between storing raw bytes and transforming images is made once,
//! when the coordinator is built.

use super::processing::ImageProcessor;
use super::types::{StorageError, StorageResult, UploadedFile};
use super::upload::UploadOptions;
use crate::config::{ImageTarget, UploadSettings};
use std::sync::Arc;

/// Prepares an upload for storage
pub trait ImagePipeline: Send + Sync {
    /// Produce the file to store
    fn prepare(&self, file: &UploadedFile, options: &UploadOptions) -> StorageResult<UploadedFile>;

    /// Short name for logs
    fn name(&self) -> &'static str;
}

/// Stores bytes exactly as received
#[derive(Debug, Clone, Copy, Default)]
pub struct RawStore;

impl ImagePipeline for RawStore {
    fn prepare(&self, file: &UploadedFile, _options: &UploadOptions) -> StorageResult<UploadedFile> {
        Ok(file.clone())
    }

    fn name(&self) -> &'static str {
        "raw"
    }
}

/// Applies the crop rules and re-encodes to a fixed format
#[derive(Debug, Clone)]
pub struct TransformStore {
    processor: ImageProcessor,
    target: ImageTarget,
}

impl TransformStore {
    /// Encode to `target` with the default processor
    #[must_use]
    pub const fn new(target: ImageTarget) -> Self {
        Self {
            processor: ImageProcessor::new(),
            target,
        }
    }
}

impl ImagePipeline for TransformStore {
    fn prepare(&self, file: &UploadedFile, options: &UploadOptions) -> StorageResult<UploadedFile> {
        if !file.is_image() {
            return Err(StorageError::Processing(format!(
                "{} is not an image",
                file.filename
            )));
        }
        self.processor.process(file, options.operation(), self.target)
    }

    fn name(&self) -> &'static str {
        "transform"
    }
}

/// Pipeline selected by `process_images`
#[must_use]
pub fn pipeline_for(settings: &UploadSettings) -> Arc<dyn ImagePipeline> {
    if settings.process_images {
        Arc::new(TransformStore::new(settings.target_format))
    } else {
        Arc::new(RawStore)
    }
}
