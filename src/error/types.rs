//! Core error types for the assessment client.

use thiserror::Error;

/// Errors produced by the assessment client.
///
/// Variants carry owned strings rather than source errors so that errors stay
/// `Clone` (the retry layer records the last error across attempts).
#[derive(Error, Debug, Clone)]
pub enum AssessError {
    /// HTTP transport error that could not be classified further
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Error returned by the assessment service with an HTTP status code
    #[error("API error {code}: {message}")]
    ApiError {
        /// HTTP status code
        code: u16,
        /// Error message
        message: String,
        /// Structured error details when the body was JSON
        details: Option<serde_json::Value>,
    },

    /// Authentication failed (missing or rejected API key)
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimitError(String),

    /// Account quota exhausted
    #[error("Quota exceeded: {0}")]
    QuotaExceededError(String),

    /// Resource not found (unknown scheme version, expired report, ...)
    #[error("Not found: {0}")]
    NotFound(String),

    /// The request was rejected as invalid by the service or by local validation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A single parameter was out of range or malformed
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The response body could not be parsed, even after repair
    #[error("Parse error: {0}")]
    ParseError(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    JsonError(String),

    /// The request timed out client-side
    #[error("Timeout: {0}")]
    TimeoutError(String),

    /// The connection could not be established
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The client was misconfigured
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Service-level error with an optional machine-readable code
    #[error("Service error: {message}")]
    ServiceError {
        /// Error message from the service
        message: String,
        /// Machine-readable error code when present
        error_code: Option<String>,
    },

    /// Local I/O error (reading a document from disk)
    #[error("I/O error: {0}")]
    IoError(String),

    /// The operation is not supported by this client or service
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Internal invariant violation
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Coarse error category used for classification and presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Authentication and authorization failures
    Authentication,
    /// Rate limiting
    RateLimit,
    /// 4xx-style client errors
    Client,
    /// 5xx-style server errors
    Server,
    /// Transport-level failures (timeouts, connection resets)
    Network,
    /// Response parsing failures
    Parsing,
    /// Local input validation failures
    Validation,
    /// Client misconfiguration
    Configuration,
    /// Unsupported operations
    Unsupported,
    /// Everything else
    Unknown,
}

impl AssessError {
    /// Create an API error without structured details.
    pub fn api_error(code: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Create an API error with structured details.
    pub fn api_error_with_details(
        code: u16,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self::ApiError {
            code,
            message: message.into(),
            details: Some(details),
        }
    }

    /// Get the error category for this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::AuthenticationError(_) => ErrorCategory::Authentication,
            Self::RateLimitError(_) => ErrorCategory::RateLimit,
            Self::QuotaExceededError(_) => ErrorCategory::Client,
            Self::NotFound(_) => ErrorCategory::Client,
            Self::InvalidInput(_) | Self::InvalidParameter(_) => ErrorCategory::Validation,
            Self::ParseError(_) | Self::JsonError(_) => ErrorCategory::Parsing,
            Self::TimeoutError(_) | Self::ConnectionError(_) | Self::HttpError(_) => {
                ErrorCategory::Network
            }
            Self::ConfigurationError(_) => ErrorCategory::Configuration,
            Self::UnsupportedOperation(_) => ErrorCategory::Unsupported,
            Self::ApiError { code, .. } => {
                if (500..=599).contains(code) {
                    ErrorCategory::Server
                } else {
                    ErrorCategory::Client
                }
            }
            Self::ServiceError { .. } => ErrorCategory::Server,
            Self::IoError(_) => ErrorCategory::Unknown,
            Self::InternalError(_) => ErrorCategory::Unknown,
        }
    }

    /// Whether a retry may succeed for this error.
    ///
    /// Rate limits and transient transport failures are retryable; validation,
    /// authentication, and parse failures are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimitError(_) => true,
            Self::TimeoutError(_) | Self::ConnectionError(_) => true,
            Self::ApiError { code, .. } => *code == 429 || (500..=599).contains(code),
            Self::ServiceError { .. } => true,
            _ => false,
        }
    }

    /// Whether this is an authentication failure.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::AuthenticationError(_))
            || matches!(self, Self::ApiError { code: 401 | 403, .. })
    }

    /// The HTTP status code associated with this error, when known.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::ApiError { code, .. } => Some(*code),
            Self::AuthenticationError(_) => Some(401),
            Self::RateLimitError(_) => Some(429),
            Self::QuotaExceededError(_) => Some(403),
            Self::NotFound(_) => Some(404),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_mapping() {
        assert_eq!(
            AssessError::api_error(404, "missing").category(),
            ErrorCategory::Client
        );
        assert_eq!(
            AssessError::api_error(502, "bad gateway").category(),
            ErrorCategory::Server
        );
        assert_eq!(
            AssessError::AuthenticationError("bad key".into()).category(),
            ErrorCategory::Authentication
        );
        assert_eq!(
            AssessError::ParseError("garbage".into()).category(),
            ErrorCategory::Parsing
        );
    }

    #[test]
    fn retryability() {
        assert!(AssessError::api_error(500, "server").is_retryable());
        assert!(AssessError::api_error(429, "slow down").is_retryable());
        assert!(AssessError::TimeoutError("deadline".into()).is_retryable());
        assert!(!AssessError::api_error(400, "bad").is_retryable());
        assert!(!AssessError::AuthenticationError("no".into()).is_retryable());
        assert!(!AssessError::InvalidInput("empty".into()).is_retryable());
    }

    #[test]
    fn status_codes() {
        assert_eq!(AssessError::api_error(418, "teapot").status_code(), Some(418));
        assert_eq!(
            AssessError::RateLimitError("slow".into()).status_code(),
            Some(429)
        );
        assert_eq!(AssessError::ParseError("x".into()).status_code(), None);
    }
}
