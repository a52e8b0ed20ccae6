//! # Client Error Type
//!
//! The single error type every state container and command returns.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Bookit Client                      │
//! │                                                                         │
//! │  ValidationError ─── bad form input, caught before any request ──┐     │
//! │  CoreError ───────── order not cancellable, not signed in ───────┤     │
//! │  ApiError ────────── classified backend failure ─────────────────┼──► ClientError
//! │  DbError ─────────── local store failure ────────────────────────┘     │
//! │                                                                         │
//! │  UI:                                                                    │
//! │    catch (e) {                                                          │
//! │      // e.code    = "CONFLICT"                                          │
//! │      // e.message = "This time slot is already booked"                  │
//! │    }                                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Business failures keep the server's (or validator's) message. Everything
//! else is logged with its details and reaches the user as the generic
//! message.

use bookit_api::{ApiError, ApiErrorKind, GENERIC_ERROR_MESSAGE};
use bookit_core::{CoreError, ValidationError};
use bookit_store::DbError;
use serde::Serialize;
use thiserror::Error;

/// Error returned to the UI.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Order not found"
/// }
/// ```
#[derive(Debug, Clone, Error, Serialize)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct ClientError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Text safe to show the user
    pub message: String,
}

/// Error codes the UI switches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input rejected locally or by the server (400/422)
    ValidationError,

    /// Token missing, expired or revoked (401)
    Unauthorized,

    /// Signed in but not allowed (403)
    Forbidden,

    /// Resource does not exist (404)
    NotFound,

    /// Conflicts with existing state (409)
    Conflict,

    /// Too many requests (429)
    RateLimited,

    /// Operation requires a signed-in user
    NotAuthenticated,

    /// A domain rule forbids the operation (e.g. cancelling a completed order)
    BusinessLogic,

    /// The backend could not be reached
    NetworkError,

    /// The backend failed or answered with something unreadable
    ServerError,

    /// Local store failure
    StorageError,

    /// Anything else
    Internal,
}

impl ClientError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ClientError {
            code,
            message: message.into(),
        }
    }

    pub fn not_authenticated() -> Self {
        ClientError::from(CoreError::NotAuthenticated)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        tracing::error!(message = %message.into(), "Internal client error");
        ClientError::new(ErrorCode::Internal, GENERIC_ERROR_MESSAGE)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.code == ErrorCode::Unauthorized
    }
}

/// Converts classified API failures.
impl From<ApiError> for ClientError {
    fn from(err: ApiError) -> Self {
        let code = match err.kind {
            ApiErrorKind::Validation => ErrorCode::ValidationError,
            ApiErrorKind::Unauthorized => ErrorCode::Unauthorized,
            ApiErrorKind::Forbidden => ErrorCode::Forbidden,
            ApiErrorKind::NotFound => ErrorCode::NotFound,
            ApiErrorKind::Conflict => ErrorCode::Conflict,
            ApiErrorKind::RateLimited => ErrorCode::RateLimited,
            ApiErrorKind::Network => ErrorCode::NetworkError,
            ApiErrorKind::Server | ApiErrorKind::Decode | ApiErrorKind::Http => {
                ErrorCode::ServerError
            }
            ApiErrorKind::Config => ErrorCode::Internal,
        };

        if !err.is_expected() {
            tracing::error!(
                kind = %err.kind,
                status = ?err.status,
                message = %err.message,
                "Unexpected API failure"
            );
        }

        ClientError::new(code, err.user_message())
    }
}

/// Converts local store errors. Details stay in the log.
impl From<DbError> for ClientError {
    fn from(err: DbError) -> Self {
        tracing::error!(error = %err, "Local store failure");
        match err {
            DbError::NotFound { entity, id } => {
                ClientError::new(ErrorCode::NotFound, format!("{entity} not found: {id}"))
            }
            _ => ClientError::new(ErrorCode::StorageError, GENERIC_ERROR_MESSAGE),
        }
    }
}

/// Converts domain rule violations.
impl From<CoreError> for ClientError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => ClientError::from(e),
            CoreError::NotAuthenticated => {
                ClientError::new(ErrorCode::NotAuthenticated, err.to_string())
            }
            CoreError::InvalidOrderStatus { .. } => {
                ClientError::new(ErrorCode::BusinessLogic, err.to_string())
            }
            CoreError::InconsistentQuote { .. } => {
                tracing::error!(error = %err, "Server sent an inconsistent quote");
                ClientError::new(ErrorCode::ServerError, GENERIC_ERROR_MESSAGE)
            }
        }
    }
}

impl From<ValidationError> for ClientError {
    fn from(err: ValidationError) -> Self {
        ClientError::new(ErrorCode::ValidationError, err.to_string())
    }
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_api_error_keeps_message() {
        let api = ApiError::from_response(409, r#"{"message":"Slot already booked"}"#);
        let err = ClientError::from(api);
        assert_eq!(err.code, ErrorCode::Conflict);
        assert_eq!(err.message, "Slot already booked");
    }

    #[test]
    fn test_unexpected_api_error_is_generic() {
        let err = ClientError::from(ApiError::from_response(500, r#"{"message":"stack trace"}"#));
        assert_eq!(err.code, ErrorCode::ServerError);
        assert_eq!(err.message, GENERIC_ERROR_MESSAGE);

        let err = ClientError::from(ApiError::network("connection refused"));
        assert_eq!(err.code, ErrorCode::NetworkError);
        assert_eq!(err.message, GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn test_storage_error_is_generic() {
        let err = ClientError::from(DbError::QueryFailed("disk I/O error".to_string()));
        assert_eq!(err.code, ErrorCode::StorageError);
        assert_eq!(err.message, GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn test_core_errors() {
        let err = ClientError::from(CoreError::InvalidOrderStatus {
            order_id: "o-1".to_string(),
            status: "completed".to_string(),
            action: "cancel".to_string(),
        });
        assert_eq!(err.code, ErrorCode::BusinessLogic);
        assert_eq!(err.message, "Order o-1 is completed, cannot cancel");

        assert_eq!(ClientError::not_authenticated().code, ErrorCode::NotAuthenticated);
    }

    #[test]
    fn test_serialized_shape() {
        let err = ClientError::new(ErrorCode::NotFound, "Order not found");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Order not found");
    }
}
