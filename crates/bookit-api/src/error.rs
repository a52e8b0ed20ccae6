//! # API Errors
//!
//! Every failed call is classified once, here, by HTTP status or by how it
//! failed to produce one.
//!
//! ## Classification
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Response / failure              Kind            Expected?             │
//! │  ──────────────────              ────            ─────────             │
//! │  400, 422                        Validation      yes                   │
//! │  401                             Unauthorized    yes                   │
//! │  403                             Forbidden       yes                   │
//! │  404                             NotFound        yes                   │
//! │  409                             Conflict        yes                   │
//! │  429                             RateLimited     yes                   │
//! │  other 4xx, 3xx                  Http            no                    │
//! │  5xx                             Server          no                    │
//! │  no response (DNS, refused, TLS, timeout)                              │
//! │                                  Network         no                    │
//! │  2xx with unreadable body        Decode          no                    │
//! │  bad base URL / config file      Config          no                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Expected errors are business outcomes: the server's message is meant for
//! the user. Unexpected ones get a generic message in the UI and the details
//! go to the log.

use bookit_core::ValidationError;
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// Message shown for every unexpected failure.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// Broad category of an API failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    Validation,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    RateLimited,
    /// A non-success status with no specific meaning to the client.
    Http,
    Server,
    Network,
    Decode,
    Config,
}

impl ApiErrorKind {
    /// Kind for a non-success HTTP status.
    pub fn from_status(status: u16) -> Self {
        match status {
            400 | 422 => ApiErrorKind::Validation,
            401 => ApiErrorKind::Unauthorized,
            403 => ApiErrorKind::Forbidden,
            404 => ApiErrorKind::NotFound,
            409 => ApiErrorKind::Conflict,
            429 => ApiErrorKind::RateLimited,
            500..=599 => ApiErrorKind::Server,
            _ => ApiErrorKind::Http,
        }
    }

    /// Stable snake_case name, used as the error code shown to the UI.
    pub fn as_str(self) -> &'static str {
        match self {
            ApiErrorKind::Validation => "validation",
            ApiErrorKind::Unauthorized => "unauthorized",
            ApiErrorKind::Forbidden => "forbidden",
            ApiErrorKind::NotFound => "not_found",
            ApiErrorKind::Conflict => "conflict",
            ApiErrorKind::RateLimited => "rate_limited",
            ApiErrorKind::Http => "http",
            ApiErrorKind::Server => "server",
            ApiErrorKind::Network => "network",
            ApiErrorKind::Decode => "decode",
            ApiErrorKind::Config => "config",
        }
    }

    fn default_message(self) -> &'static str {
        match self {
            ApiErrorKind::Validation => "The request was invalid",
            ApiErrorKind::Unauthorized => "Please sign in again",
            ApiErrorKind::Forbidden => "You don't have access to this",
            ApiErrorKind::NotFound => "Not found",
            ApiErrorKind::Conflict => "This conflicts with an existing item",
            ApiErrorKind::RateLimited => "Too many requests, slow down",
            _ => GENERIC_ERROR_MESSAGE,
        }
    }
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified API failure.
#[derive(Debug, Clone, Error)]
#[error("{kind} error{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
    /// HTTP status, when a response was received.
    pub status: Option<u16>,
    /// Machine-readable code from the error body, if the server sent one.
    pub code: Option<String>,
}

/// Error body shape: `{ "message": ..., "code": ... }`, with `error` accepted
/// in place of `message`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default, alias = "error")]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        ApiError {
            kind,
            message: message.into(),
            status: None,
            code: None,
        }
    }

    /// Builds an error from a non-success response's status and raw body.
    ///
    /// The body's `message`/`error` and `code` are used when it is JSON;
    /// otherwise a short plain-text body becomes the message.
    pub fn from_response(status: u16, body: &str) -> Self {
        let kind = ApiErrorKind::from_status(status);
        let parsed: Option<ErrorBody> = serde_json::from_str(body).ok();

        let (message, code) = match parsed {
            Some(ErrorBody { message, code }) => (message, code),
            None => {
                let text = body.trim();
                let usable = !text.is_empty() && text.len() <= 200 && !text.starts_with('<');
                (usable.then(|| text.to_string()), None)
            }
        };

        ApiError {
            kind,
            message: message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| kind.default_message().to_string()),
            status: Some(status),
            code,
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Network, message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Decode, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Config, message)
    }

    /// A business outcome the user should see as-is.
    pub fn is_expected(&self) -> bool {
        matches!(
            self.kind,
            ApiErrorKind::Validation
                | ApiErrorKind::Unauthorized
                | ApiErrorKind::Forbidden
                | ApiErrorKind::NotFound
                | ApiErrorKind::Conflict
                | ApiErrorKind::RateLimited
        )
    }

    pub fn is_conflict(&self) -> bool {
        self.kind == ApiErrorKind::Conflict
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ApiErrorKind::NotFound
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind == ApiErrorKind::Unauthorized
    }

    pub fn is_network(&self) -> bool {
        self.kind == ApiErrorKind::Network
    }

    /// Text for an alert or inline error.
    pub fn user_message(&self) -> String {
        if self.is_expected() {
            self.message.clone()
        } else {
            GENERIC_ERROR_MESSAGE.to_string()
        }
    }
}

/// Transport failures: anything that did not yield a readable response.
impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return ApiError::decode(err.to_string());
        }
        if err.is_builder() {
            return ApiError::config(err.to_string());
        }
        match err.status() {
            Some(status) => ApiError::from_response(status.as_u16(), ""),
            None => ApiError::network(err.to_string()),
        }
    }
}

/// Local validation failures surface as the same kind a 400/422 would.
impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError {
            kind: ApiErrorKind::Validation,
            message: err.to_string(),
            status: None,
            code: Some(format!("invalid_{}", err.field().replace(' ', "_"))),
        }
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        ApiError::config(format!("Invalid URL: {err}"))
    }
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        let cases = [
            (400, ApiErrorKind::Validation),
            (422, ApiErrorKind::Validation),
            (401, ApiErrorKind::Unauthorized),
            (403, ApiErrorKind::Forbidden),
            (404, ApiErrorKind::NotFound),
            (409, ApiErrorKind::Conflict),
            (429, ApiErrorKind::RateLimited),
            (500, ApiErrorKind::Server),
            (503, ApiErrorKind::Server),
            (418, ApiErrorKind::Http),
            (302, ApiErrorKind::Http),
        ];
        for (status, kind) in cases {
            assert_eq!(ApiErrorKind::from_status(status), kind, "status {status}");
        }
    }

    #[test]
    fn test_json_error_body() {
        let err = ApiError::from_response(422, r#"{"message":"Email taken","code":"EMAIL_TAKEN"}"#);
        assert_eq!(err.kind, ApiErrorKind::Validation);
        assert_eq!(err.message, "Email taken");
        assert_eq!(err.code.as_deref(), Some("EMAIL_TAKEN"));
        assert_eq!(err.status, Some(422));
    }

    #[test]
    fn test_error_alias() {
        let err = ApiError::from_response(409, r#"{"error":"Already a favorite"}"#);
        assert!(err.is_conflict());
        assert_eq!(err.message, "Already a favorite");
    }

    #[test]
    fn test_plain_and_html_bodies() {
        let err = ApiError::from_response(404, "no such order");
        assert_eq!(err.message, "no such order");

        let err = ApiError::from_response(502, "<html><body>Bad Gateway</body></html>");
        assert_eq!(err.message, GENERIC_ERROR_MESSAGE);

        let err = ApiError::from_response(403, "");
        assert_eq!(err.message, "You don't have access to this");
    }

    #[test]
    fn test_expected_vs_unexpected() {
        assert!(ApiError::from_response(400, "").is_expected());
        assert!(ApiError::from_response(429, "").is_expected());
        assert!(!ApiError::from_response(500, "").is_expected());
        assert!(!ApiError::network("connection refused").is_expected());
        assert!(!ApiError::decode("eof").is_expected());
        assert!(!ApiError::config("bad url").is_expected());
    }

    #[test]
    fn test_user_message() {
        let business = ApiError::from_response(422, r#"{"message":"Pick a future date"}"#);
        assert_eq!(business.user_message(), "Pick a future date");

        let server = ApiError::from_response(500, r#"{"message":"NullPointerException at line 42"}"#);
        assert_eq!(server.user_message(), GENERIC_ERROR_MESSAGE);

        let network = ApiError::network("dns error: no such host");
        assert_eq!(network.user_message(), GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn test_local_validation_is_expected() {
        let err: ApiError = ValidationError::Required {
            field: "card number".to_string(),
        }
        .into();
        assert_eq!(err.kind, ApiErrorKind::Validation);
        assert_eq!(err.code.as_deref(), Some("invalid_card_number"));
        assert_eq!(err.user_message(), "card number is required");
    }

    #[test]
    fn test_display() {
        let err = ApiError::from_response(404, r#"{"message":"Order not found"}"#);
        assert_eq!(err.to_string(), "not_found error (404): Order not found");
        assert_eq!(
            ApiError::network("timed out").to_string(),
            "network error: timed out"
        );
    }
}
