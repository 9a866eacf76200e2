//! Error Types
//!
//! Engine-level errors. Store-boundary failures carry their own
//! [`StoreError`](crate::store::StoreError) and are wrapped here when they
//! cross into engine operations that report errors at all. Most reconciler
//! paths deliberately swallow failures into the tracing sink and the event
//! stream instead, leaving the data model well-defined.

use thiserror::Error;

use crate::store::StoreError;

/// Errors surfaced by engine operations.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The remote store rejected or failed an operation
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Operation requires a signed-in user
    #[error("not signed in")]
    NotSignedIn,
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, ChatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_conversion() {
        let store_err = StoreError::Query("index missing".to_string());
        let err: ChatError = store_err.into();
        let display = format!("{}", err);
        assert!(display.contains("store error"));
        assert!(display.contains("index missing"));
    }

    #[test]
    fn test_not_signed_in_display() {
        assert_eq!(format!("{}", ChatError::NotSignedIn), "not signed in");
    }
}
