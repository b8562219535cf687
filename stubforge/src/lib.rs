//! stubforge: CRUD scaffolding engine for Laravel-style applications
//!
//! The crate has two independent halves:
//! - **scaffold**: turns an ordered list of field specifications into generated
//!   model and migration source by compiling cast maps and relation bodies and
//!   rendering them through named stubs
//! - **storage**: a runtime image-upload helper that resolves disk aliases,
//!   optionally re-encodes images, and replaces or deletes previously stored files
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use stubforge::prelude::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = StubforgeConfig::load()?;
//! let fields = vec![
//!     FieldSpec::parse("title:string")?,
//!     FieldSpec::parse("published_at:dateTime:datetime-local")?,
//!     FieldSpec::parse("user_id:foreignId:select:users")?,
//! ];
//!
//! let generator = ModelGenerator::new(&config)?;
//! let file = generator.generate("Blog/Post", &fields)?;
//! println!("{}", file.path.display());
//! # Ok(())
//! # }
//! ```

#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod error;
pub mod observability;
pub mod scaffold;
pub mod storage;

pub mod prelude {
    //! Convenience re-exports for common types and traits

    pub use crate::config::{DateFormats, ScaffoldSettings, StubforgeConfig, UploadSettings};
    pub use crate::error::StubforgeError;
    pub use crate::scaffold::{
        CastRule, ColumnType, FieldSpec, GeneratedFile, InputType, MigrationGenerator,
        ModelGenerator, ModelSpec, ScaffoldError, StubError, StubRenderer,
    };
    pub use crate::storage::{
        Disk, DiskAlias, DiskManager, ImagePipeline, LocalDisk, StorageError, UploadCoordinator,
        UploadOptions, UploadedFile, UploadedFiles,
    };
}
