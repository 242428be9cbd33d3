//! High-level error helper utilities for user-facing error handling.
//!
//! This module provides structured error summaries and friendly suggestions
//! suitable for CLI/UI rendering, keeping the classification logic
//! library-first.

use super::types::{AssessError, ErrorCategory};

/// Error kind for presentation (coarse-grained)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Auth,
    RateLimit,
    Quota,
    Client,
    Server,
    Network,
    Parsing,
    Validation,
    Configuration,
    Unsupported,
    Unknown,
}

/// Optional diagnosis information (kept separate from the raw message)
#[derive(Debug, Clone, Default)]
pub struct Diagnosis {
    /// Short note that explains our classification or likely cause
    pub note: Option<String>,
}

/// Structured error summary for CLI/UI consumption (raw-first design)
#[derive(Debug, Clone)]
pub struct ErrorSummary {
    pub kind: ErrorKind,
    pub status: Option<u16>,
    /// Original service message when available; otherwise best-effort
    pub message: String,
    /// Optional diagnosis (our interpretation), separate from the raw message
    pub diagnosis: Diagnosis,
    pub suggestions: Vec<String>,
    /// Structured service error body when available
    pub details: Option<serde_json::Value>,
}

/// Summarize an `AssessError` with friendly suggestions for rendering.
pub fn summarize_error(err: &AssessError) -> ErrorSummary {
    ErrorSummary {
        kind: map_error_kind(err),
        status: err.status_code(),
        message: extract_raw_message(err),
        diagnosis: Diagnosis {
            note: diagnosis_note(err),
        },
        suggestions: suggest_fixes(err),
        details: extract_details(err),
    }
}

/// Map `AssessError` to a presentation `ErrorKind`.
pub fn map_error_kind(err: &AssessError) -> ErrorKind {
    if matches!(err, AssessError::QuotaExceededError(_)) {
        return ErrorKind::Quota;
    }
    match err.category() {
        ErrorCategory::Authentication => ErrorKind::Auth,
        ErrorCategory::RateLimit => ErrorKind::RateLimit,
        ErrorCategory::Client => {
            if err.status_code() == Some(403) {
                ErrorKind::Quota
            } else {
                ErrorKind::Client
            }
        }
        ErrorCategory::Server => ErrorKind::Server,
        ErrorCategory::Network => ErrorKind::Network,
        ErrorCategory::Parsing => ErrorKind::Parsing,
        ErrorCategory::Validation => ErrorKind::Validation,
        ErrorCategory::Configuration => ErrorKind::Configuration,
        ErrorCategory::Unsupported => ErrorKind::Unsupported,
        ErrorCategory::Unknown => ErrorKind::Unknown,
    }
}

/// Extract the raw service/client message from an error.
fn extract_raw_message(err: &AssessError) -> String {
    match err {
        AssessError::ApiError { message, .. } => message.clone(),
        AssessError::ServiceError { message, .. } => message.clone(),
        AssessError::AuthenticationError(msg)
        | AssessError::RateLimitError(msg)
        | AssessError::QuotaExceededError(msg)
        | AssessError::TimeoutError(msg)
        | AssessError::ConnectionError(msg)
        | AssessError::ParseError(msg)
        | AssessError::InvalidParameter(msg)
        | AssessError::InvalidInput(msg) => msg.clone(),
        _ => err.to_string(),
    }
}

/// Suggest fixes based on the error category.
pub fn suggest_fixes(err: &AssessError) -> Vec<String> {
    let mut tips = Vec::new();
    match err.category() {
        ErrorCategory::Authentication => {
            tips.push("Verify the API key".to_string());
            tips.push("If the key was rotated, update the client configuration".to_string());
        }
        ErrorCategory::RateLimit => {
            tips.push("Reduce request rate or wait and retry (Retry-After if present)".to_string());
        }
        ErrorCategory::Client => {
            tips.push("Check scheme version, criterion ids and required fields".to_string());
        }
        ErrorCategory::Server => {
            tips.push("Retry with backoff; check the service status page".to_string());
        }
        ErrorCategory::Parsing => {
            tips.push(
                "The service returned an unexpected payload; retry or report the raw body"
                    .to_string(),
            );
        }
        ErrorCategory::Validation => {
            tips.push("Validate document sizes and criterion selections".to_string());
        }
        ErrorCategory::Configuration => {
            tips.push("Check base URL and client configuration".to_string());
        }
        ErrorCategory::Network => {
            tips.push("Check connectivity and proxy settings; consider a longer timeout".to_string());
        }
        _ => {}
    }
    tips
}

fn extract_details(err: &AssessError) -> Option<serde_json::Value> {
    match err {
        AssessError::ApiError { details, .. } => details.clone(),
        _ => None,
    }
}

fn diagnosis_note(err: &AssessError) -> Option<String> {
    match map_error_kind(err) {
        ErrorKind::Auth => Some("Authentication failed; check the API key".to_string()),
        ErrorKind::RateLimit => Some("Rate limited; respect Retry-After or backoff".to_string()),
        ErrorKind::Quota => Some("Quota/permission issue (403); check plan/billing".to_string()),
        ErrorKind::Server => Some("Service error; retry with backoff".to_string()),
        ErrorKind::Client => Some("Client-side request error; verify parameters".to_string()),
        ErrorKind::Parsing => Some("Malformed assessment payload survived repair".to_string()),
        _ => None,
    }
}

/// Render a CLI-friendly string for an `ErrorSummary`.
pub fn format_summary(summary: &ErrorSummary, verbose: bool) -> String {
    use std::fmt::Write as _;

    let mut out = String::new();
    if let Some(code) = summary.status {
        let _ = writeln!(out, "Status: {code}");
    }
    let _ = writeln!(out, "Message: {}", summary.message);
    if let Some(note) = &summary.diagnosis.note {
        let _ = writeln!(out, "Diagnosis: {note}");
    }
    if !summary.suggestions.is_empty() {
        let _ = writeln!(out, "Suggestions:");
        for s in &summary.suggestions {
            let _ = writeln!(out, "  - {s}");
        }
    }
    if verbose {
        if let Some(d) = &summary.details {
            let _ = writeln!(out, "Details: {d}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_mapping_basic() {
        let e = AssessError::api_error(429, "too many requests");
        assert_eq!(map_error_kind(&e), ErrorKind::RateLimit);
        let e = AssessError::AuthenticationError("missing".into());
        assert_eq!(map_error_kind(&e), ErrorKind::Auth);
        let e = AssessError::QuotaExceededError("plan exhausted".into());
        assert_eq!(map_error_kind(&e), ErrorKind::Quota);
    }

    #[test]
    fn summary_includes_suggestions() {
        let e = AssessError::api_error(401, "unauthorized");
        let s = summarize_error(&e);
        assert!(!s.suggestions.is_empty());
        assert_eq!(s.status, Some(401));
    }

    #[test]
    fn format_summary_renders_status_and_message() {
        let e = AssessError::api_error(503, "maintenance");
        let rendered = format_summary(&summarize_error(&e), false);
        assert!(rendered.contains("Status: 503"));
        assert!(rendered.contains("maintenance"));
    }
}
