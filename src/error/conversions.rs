//! Type Conversions for AssessError
//!
//! From trait implementations for converting common error types into
//! `AssessError`, with transport errors mapped to the most specific variant.

use super::types::AssessError;

impl From<reqwest::Error> for AssessError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::TimeoutError(err.to_string())
        } else if err.is_connect() {
            Self::ConnectionError(err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AssessError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError(err.to_string())
    }
}

impl From<std::io::Error> for AssessError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}
