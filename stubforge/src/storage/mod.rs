//! Image upload storage
//!
//! - [`Disk`]: async storage backend trait, with [`LocalDisk`] for the local
//!   filesystem
//! - [`DiskAlias`] / [`DiskManager`]: the closed alias table and the disks
//!   registered behind it
//! - [`ImagePipeline`]: raw or transforming preparation of uploads, picked
//!   when the coordinator is built
//! - [`UploadCoordinator`]: resolve, store, replace and delete images
//!
//! # Example
//!
//! ```rust,no_run
//! use stubforge::config::UploadSettings;
//! use stubforge::storage::{UploadCoordinator, UploadOptions, UploadedFile, UploadedFiles};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let uploads = UploadCoordinator::from_settings(&UploadSettings::default())?;
//!
//! let files = UploadedFiles::new()
//!     .with("cover", UploadedFile::new("cover.jpg", "image/jpeg", vec![/* ... */]));
//! let options = UploadOptions::new("cover", "images/posts")
//!     .with_existing("3f2a.webp?v=2")
//!     .crop_to(Some(1200), Some(630));
//!
//! let stored = uploads.upload(&files, &options).await?;
//! # Ok(())
//! # }
//! ```

pub mod disk;
pub mod local;
pub mod pipeline;
pub mod processing;
pub mod traits;
pub mod types;
pub mod upload;

pub use disk::{DiskAlias, DiskManager};
pub use local::LocalDisk;
pub use pipeline::{pipeline_for, ImagePipeline, RawStore, TransformStore};
pub use traits::Disk;
pub use types::{StorageError, StorageResult, UploadedFile, UploadedFiles};
pub use upload::{UploadCoordinator, UploadOptions};
