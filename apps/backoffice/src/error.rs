//! # API Error Type
//!
//! Unified error type for back-office commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in NAS Connect                            │
//! │                                                                         │
//! │  nas-backoffice assign-table r5 t4                                      │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Route hidden for role? ─── FORBIDDEN_ROUTE ───────┐            │  │
//! │  │         │                                          │            │  │
//! │  │         ▼                                          ▼            │  │
//! │  │  Store refused? ─── StoreError / CoreError ──── ApiError ──────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  stderr: error [CONFLICT]: Table t4 is already taken at 19:00 by ...    │
//! │  --json: { "code": "CONFLICT", "message": "Table t4 is ..." }          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use std::fmt;

use nas_core::{CoreError, ValidationError};
use nas_store::StoreError;

use crate::state::ConfigError;

/// API error returned from commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Table not found: t99"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Unknown record
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Slot, room or id already taken
    Conflict,

    /// A business rule refused the operation
    BusinessLogic,

    /// The current role does not display this screen
    ForbiddenRoute,

    /// Configuration could not be loaded or saved
    ConfigError,

    /// Internal error
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::BusinessLogic => "BUSINESS_LOGIC",
            ErrorCode::ForbiddenRoute => "FORBIDDEN_ROUTE",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// The role cannot display `route`.
    pub fn forbidden_route(role: &str, route: &str) -> Self {
        ApiError::new(
            ErrorCode::ForbiddenRoute,
            format!("Screen {} is not available for role {}", route, role),
        )
    }
}

/// Converts store errors to API errors.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            StoreError::Duplicate { .. } => ApiError::new(ErrorCode::Conflict, err.to_string()),
            StoreError::Core(e) => ApiError::from(e),
            StoreError::Internal(e) => {
                tracing::error!("Internal store error: {}", e);
                ApiError::internal("Store operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::TableSlotConflict { .. } | CoreError::RoomUnavailable { .. } => {
                ErrorCode::Conflict
            }
            CoreError::Validation(e) => return ApiError::validation(e.to_string()),
            CoreError::RoomInMaintenance(_)
            | CoreError::InvalidTransition { .. }
            | CoreError::InvalidOrderState { .. }
            | CoreError::WrongReservationKind { .. }
            | CoreError::InsufficientStock { .. }
            | CoreError::MenuItemUnavailable(_)
            | CoreError::NotEligibleForNoShow(_)
            | CoreError::NothingToExport => ErrorCode::BusinessLogic,
        };
        ApiError::new(code, err.to_string())
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::internal(format!("Serialization failed: {}", err))
    }
}

impl From<rustyline::error::ReadlineError> for ApiError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        ApiError::internal(format!("Terminal I/O failed: {}", err))
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_map_to_codes() {
        let err = ApiError::from(StoreError::not_found("Table", "t99"));
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Table not found: t99");

        let err = ApiError::from(StoreError::duplicate("Client", "c1"));
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[test]
    fn test_core_errors_map_to_codes() {
        let conflict = CoreError::TableSlotConflict {
            table_id: "t4".to_string(),
            slot: "19:00".to_string(),
            holder_id: "r3".to_string(),
        };
        assert_eq!(ApiError::from(conflict).code, ErrorCode::Conflict);
        assert_eq!(ApiError::from(CoreError::NothingToExport).code, ErrorCode::BusinessLogic);

        let invalid = CoreError::Validation(ValidationError::Required {
            field: "name".to_string(),
        });
        assert_eq!(ApiError::from(invalid).code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_terminal_errors_are_internal() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "tty gone");
        let err = ApiError::from(rustyline::error::ReadlineError::Io(io));
        assert_eq!(err.code, ErrorCode::Internal);
        assert!(err.message.contains("tty gone"));
    }

    #[test]
    fn test_serialized_shape() {
        let err = ApiError::forbidden_route("waiter", "/finance");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "FORBIDDEN_ROUTE");
        assert_eq!(
            err.to_string(),
            "[FORBIDDEN_ROUTE] Screen /finance is not available for role waiter"
        );
    }
}
