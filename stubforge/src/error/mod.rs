//! Error types and error handling
//!
//! Each module owns a `thiserror` enum; [`StubforgeError`] gathers them for
//! callers that drive both halves of the crate.

use thiserror::Error;

pub use crate::config::ConfigError;
pub use crate::scaffold::{ScaffoldError, StubError};
pub use crate::storage::StorageError;

/// Crate-level error type
#[derive(Debug, Error)]
pub enum StubforgeError {
    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Field parsing or generation error
    #[error(transparent)]
    Scaffold(#[from] ScaffoldError),

    /// Stub lookup or rendering error
    #[error(transparent)]
    Stub(#[from] StubError),

    /// Disk or image processing error
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wraps_stub_error_transparently() {
        let err: StubforgeError = StubError::UnknownStub("controller".to_string()).into();
        assert_eq!(err.to_string(), "Unknown stub: controller");
    }

    #[test]
    fn test_wraps_storage_error() {
        let err: StubforgeError = StorageError::Processing("bad header".to_string()).into();
        assert_eq!(err.to_string(), "Image processing failed: bad header");
        assert!(matches!(err, StubforgeError::Storage(StorageError::Processing(_))));
    }
}
