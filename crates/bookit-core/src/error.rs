//! # Error Types
//!
//! Domain-specific error types for bookit-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  bookit-core errors (this file)                                        │
//! │  ├── CoreError        - Domain rule violations                         │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  bookit-store errors (separate crate)                                  │
//! │  └── DbError          - Local storage failures                         │
//! │                                                                         │
//! │  bookit-api errors (separate crate)                                    │
//! │  └── ApiError         - Classified backend failures                    │
//! │                                                                         │
//! │  apps/client errors                                                    │
//! │  └── ClientError      - What the UI sees (serialized)                  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError ─┐                                  │
//! │        DbError ─────────────────────┼──► ClientError → UI alert        │
//! │        ApiError ────────────────────┘                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Domain rule violations.
///
/// These are raised before any request leaves the device, so the UI can show
/// them inline without a round trip.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Order is not in a state that allows the requested operation.
    ///
    /// ## When This Occurs
    /// - Cancelling a completed or already cancelled order
    /// - Accepting a quote on an order that has no pending quote
    /// - Paying an order that is not confirmed
    #[error("Order {order_id} is {status}, cannot {action}")]
    InvalidOrderStatus {
        order_id: String,
        status: String,
        action: String,
    },

    /// Quote totals don't add up to its line items.
    #[error("Quote {quote_id} is inconsistent: expected total {expected}, got {actual}")]
    InconsistentQuote {
        quote_id: String,
        expected: i64,
        actual: i64,
    },

    /// Caller is not signed in.
    #[error("Not signed in")]
    NotAuthenticated,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., invalid email, invalid card number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is in the past (e.g., expired card, booking date).
    #[error("{field} is in the past")]
    InThePast { field: String },

    /// Two fields that must match don't.
    #[error("{field} does not match")]
    Mismatch { field: String },
}

impl ValidationError {
    /// Name of the offending field, for highlighting it in a form.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooShort { field, .. }
            | ValidationError::TooLong { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::InThePast { field }
            | ValidationError::Mismatch { field } => field,
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
