//! # Store Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  CoreError (rule refused the change)    missing record / duplicate id  │
//! │       │                                        │                        │
//! │       └──────────────┬─────────────────────────┘                        │
//! │                      ▼                                                  │
//! │  StoreError (this module)                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (in the back-office app) ← code + message for the screen     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use nas_core::{CoreError, ValidationError};
use thiserror::Error;

/// Store operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Entity not found.
    ///
    /// ## When This Occurs
    /// - Unknown id on get / update / delete
    /// - A reference (table, room, menu item) points nowhere
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A record with the same id already exists.
    #[error("Duplicate {entity}: '{id}' already exists")]
    Duplicate { entity: String, id: String },

    /// A business rule refused the operation.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Internal store error.
    #[error("Internal store error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a Duplicate error.
    pub fn duplicate(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::Duplicate {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(err: ValidationError) -> Self {
        StoreError::Core(CoreError::Validation(err))
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            StoreError::not_found("Table", "t99").to_string(),
            "Table not found: t99"
        );
        assert_eq!(
            StoreError::from(CoreError::NothingToExport).to_string(),
            "Nothing to export"
        );
        assert!(matches!(
            StoreError::from(ValidationError::required("name")),
            StoreError::Core(CoreError::Validation(_))
        ));
    }
}
