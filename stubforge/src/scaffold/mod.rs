//! CRUD scaffold generator implementation
//!
//! This module turns field specifications into generated model and migration
//! source. The pieces are layered bottom-up:
//! - [`field_type`]: column and input type enumerations plus field parsing
//! - [`casts`]: the `(column, input) → cast` table and the compiler that
//!   produces fillable, hidden, cast and relation fragments
//! - [`templates`]: the stub renderer (built-in stubs plus overrides)
//! - [`generator`]: model and migration generators that glue it together

pub mod casts;
pub mod field_type;
pub mod generator;
pub mod helpers;
pub mod stubs;
pub mod templates;

pub use casts::{cast_for, CastCompiler, CastRule, CompiledModel, Relation};
pub use field_type::{ColumnType, FieldSpec, InputType, ModelSpec};
pub use generator::{GeneratedFile, MigrationGenerator, ModelGenerator, ModelTarget};
pub use helpers::TemplateHelpers;
pub use templates::{RenderContext, StubError, StubRenderer};

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while parsing fields or generating files
#[derive(Debug, Error)]
pub enum ScaffoldError {
    /// A field token or record could not be parsed
    #[error("Invalid field definition '{input}': {reason}")]
    InvalidField {
        /// The offending input
        input: String,
        /// What was wrong with it
        reason: String,
    },

    /// Unknown column type name
    #[error("Unknown column type: '{0}'")]
    UnknownColumnType(String),

    /// Unknown input type name
    #[error("Unknown input type: '{0}'")]
    UnknownInputType(String),

    /// Model name is empty or contains invalid segments
    #[error("Invalid model name: '{0}'")]
    InvalidModelName(String),

    /// No fields were supplied
    #[error("At least one field must be specified")]
    NoFields,

    /// Parallel field arrays differ in length
    #[error("Field list '{list}' has {actual} entries, expected {expected}")]
    LengthMismatch {
        /// Name of the offending list
        list: &'static str,
        /// Number of field names
        expected: usize,
        /// Number of entries in the offending list
        actual: usize,
    },

    /// A column constraint does not fit its column type
    #[error("Invalid constraint '{constraint}' for field '{field}': {reason}")]
    InvalidConstraint {
        /// Field name
        field: String,
        /// The constraint as given
        constraint: String,
        /// What was wrong with it
        reason: String,
    },

    /// A model specification file could not be read or parsed
    #[error("Invalid model spec {path}: {reason}")]
    InvalidSpec {
        /// Path of the spec file
        path: PathBuf,
        /// Parser message
        reason: String,
    },

    /// Stub rendering failed
    #[error(transparent)]
    Stub(#[from] StubError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
