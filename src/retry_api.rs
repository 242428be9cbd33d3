//! Public Retry API Facade
//!
//! This module provides a unified, recommended retry API.
//!
//! - Simple defaults: `retry` uses the backoff-based executor
//! - Opt-in control: use `RetryOptions` to select backend and configuration
//! - Builder integration: `RetryOptions` can be attached to the client via
//!   `ClientBuilder::retry_options(...)`
//!
//! It also hosts the HTTP error classifier that maps raw service responses
//! into typed [`AssessError`]s.

use reqwest::header::HeaderMap;
use serde_json::Value;

use crate::error::AssessError;

// Re-export core types for convenience
pub use crate::retry::BackoffRetryExecutor;
pub use crate::retry::RetryPolicy;

/// Retry backend selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetryBackend {
    /// Backoff crate-based executor (recommended default)
    #[default]
    Backoff,
    /// Simple policy-based executor (`retry/policy.rs`)
    Policy,
}

/// Unified retry options
#[derive(Debug, Clone)]
pub struct RetryOptions {
    pub backend: RetryBackend,
    /// Optional backoff executor override (Backoff backend only).
    pub backoff_executor: Option<BackoffRetryExecutor>,
    /// Policy-based options
    pub policy: Option<RetryPolicy>,
    /// Whether to retry 401 Unauthorized errors once (key refresh scenarios)
    pub retry_401: bool,
    /// Whether the wrapped request is idempotent (safe to re-send).
    ///
    /// Catalog and report fetches are always idempotent and retried
    /// regardless of this flag. Assessment submissions are not idempotent
    /// server-side and are only retried when this is explicitly enabled.
    pub idempotent: bool,
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            backend: RetryBackend::Backoff,
            backoff_executor: None,
            policy: None,
            retry_401: false,
            idempotent: false,
        }
    }
}

impl RetryOptions {
    /// Use the default backoff backend
    pub fn backoff() -> Self {
        Self::default()
    }

    /// Use the backoff backend with a custom executor.
    pub fn with_backoff_executor(mut self, executor: BackoffRetryExecutor) -> Self {
        self.backoff_executor = Some(executor);
        self
    }

    /// Use the policy-based backend with the default policy
    pub fn policy_default() -> Self {
        Self {
            backend: RetryBackend::Policy,
            policy: Some(RetryPolicy::default()),
            ..Default::default()
        }
    }

    /// Set max attempts for the policy backend
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        if let Some(policy) = self.policy.take() {
            self.policy = Some(policy.with_max_attempts(attempts));
        }
        self
    }

    /// Set whether to retry 401 errors
    pub fn with_retry_401(mut self, retry_401: bool) -> Self {
        self.retry_401 = retry_401;
        self
    }

    /// Set whether the request is idempotent
    pub fn with_idempotent(mut self, idempotent: bool) -> Self {
        self.idempotent = idempotent;
        self
    }
}

/// Recommended default retry (backoff-based)
pub async fn retry<F, Fut, T>(operation: F) -> Result<T, AssessError>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: std::future::Future<Output = Result<T, AssessError>> + Send,
    T: Send,
{
    crate::retry::retry_with_backoff(operation).await
}

/// Retry with explicit options (backend selection)
pub async fn retry_with<F, Fut, T>(operation: F, options: RetryOptions) -> Result<T, AssessError>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: std::future::Future<Output = Result<T, AssessError>> + Send,
    T: Send,
{
    match options.backend {
        RetryBackend::Backoff => {
            if let Some(executor) = options.backoff_executor.as_ref() {
                executor.execute(operation).await
            } else {
                crate::retry::retry_with_backoff(operation).await
            }
        }
        RetryBackend::Policy => {
            let policy = options.policy.unwrap_or_default();
            let executor = crate::retry::RetryExecutor::new(policy);
            executor.execute(operation).await
        }
    }
}

/// Retry only when options are provided.
///
/// This is a small helper to keep call sites consistent when retry is optional
/// (e.g. per-client or per-request policy injection).
pub async fn maybe_retry<F, Fut, T>(
    options: Option<RetryOptions>,
    operation: F,
) -> Result<T, AssessError>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: std::future::Future<Output = Result<T, AssessError>> + Send,
    T: Send,
{
    if let Some(opts) = options {
        retry_with(operation, opts).await
    } else {
        operation().await
    }
}

/// Classify a service error envelope, when present.
///
/// The assessment service reports errors as
/// `{ "error": { "message": "...", "type": "...", "code": "..." } }`.
/// Returns `None` when the body doesn't match the envelope so callers can fall
/// back to the generic classifier.
pub fn classify_service_error(status: u16, body_text: &str) -> Option<AssessError> {
    let json: Value = serde_json::from_str(body_text).ok()?;
    let error_obj = json.get("error")?;

    let message = error_obj
        .get("message")
        .and_then(|v| v.as_str())
        .unwrap_or("Unknown error");
    let error_type = error_obj.get("type").and_then(|v| v.as_str());
    let error_code = error_obj.get("code").and_then(|v| match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    });

    // Prefer the structured `type`, otherwise fall back to the status mapping.
    let mapped = match error_type.unwrap_or("") {
        "authentication_error" => AssessError::AuthenticationError(message.to_string()),
        "rate_limit_error" => AssessError::RateLimitError(message.to_string()),
        "insufficient_quota" => AssessError::QuotaExceededError(message.to_string()),
        "invalid_request_error" => AssessError::InvalidInput(message.to_string()),
        "not_found_error" => AssessError::NotFound(message.to_string()),
        "" => {
            return Some(classify_http_error(
                status,
                body_text,
                &HeaderMap::new(),
                Some(message),
            ));
        }
        other => AssessError::ServiceError {
            message: format!("{other}: {message}"),
            error_code,
        },
    };

    Some(mapped)
}

/// Classify an HTTP failure into a more specific error type with retry hints.
///
/// Inspects the HTTP status code, response body and headers to derive a
/// better-typed error (e.g. `RateLimitError` / `QuotaExceededError`) rather
/// than a generic `ApiError`.
pub fn classify_http_error(
    status: u16,
    body_text: &str,
    headers: &HeaderMap,
    fallback_message: Option<&str>,
) -> AssessError {
    let lower = body_text.to_lowercase();

    // Extract request/trace identifiers to aid debugging (best-effort)
    fn header_val(headers: &HeaderMap, name: &str) -> Option<String> {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
    }
    let id_keys = ["x-request-id", "x-trace-id", "x-correlation-id"];
    let request_ids: Vec<String> = id_keys
        .iter()
        .filter_map(|k| header_val(headers, k).map(|v| format!("{k}={v}")))
        .collect();
    let ids_suffix = if request_ids.is_empty() {
        String::new()
    } else {
        format!(" ids=[{}]", request_ids.join(","))
    };
    // Limit body sample size to avoid noisy logs
    let body_sample = body_text.chars().take(200).collect::<String>();

    // 429 Too Many Requests -> RateLimit with optional Retry-After hint
    if status == 429 {
        let retry_after = headers
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        return AssessError::RateLimitError(format!(
            "http=429 retry_after={retry_after}{ids_suffix} body_sample={body_sample}"
        ));
    }

    if status == 401 {
        return AssessError::AuthenticationError(format!(
            "unauthorized{ids_suffix} body_sample={body_sample}"
        ));
    }

    if status == 404 {
        return AssessError::NotFound(format!("http=404{ids_suffix} body_sample={body_sample}"));
    }

    // 413/415 are common for document upload endpoints
    if status == 413 {
        return AssessError::InvalidInput(format!(
            "http=413 payload too large{ids_suffix} body_sample={body_sample}"
        ));
    }
    if status == 415 {
        return AssessError::InvalidInput(format!(
            "http=415 unsupported media type{ids_suffix} body_sample={body_sample}"
        ));
    }

    // 403/400 with quota/rate patterns -> QuotaExceeded or RateLimit
    if status == 403 || status == 400 {
        let quota_like = lower.contains("quota") || lower.contains("exceed");
        let rate_like = lower.contains("rate limit")
            || lower.contains("ratelimit")
            || lower.contains("rate_limit_exceeded");
        if quota_like {
            return AssessError::QuotaExceededError(format!(
                "quota exceeded body_sample={body_sample}"
            ));
        }
        if rate_like {
            return AssessError::RateLimitError(format!("rate limited body_sample={body_sample}"));
        }
    }

    if status == 403 {
        return AssessError::AuthenticationError(format!(
            "forbidden{ids_suffix} body_sample={body_sample}"
        ));
    }
    if status == 400 {
        return AssessError::InvalidInput(format!(
            "bad request{ids_suffix} body_sample={body_sample}"
        ));
    }

    // 5xx -> server error (retryable via is_retryable())
    if (500..=599).contains(&status) {
        return AssessError::api_error(status, fallback_message.unwrap_or("server error"));
    }

    // Fallback to ApiError with original status and body snippet
    let msg = if let Some(fallback) = fallback_message {
        fallback.to_string()
    } else if body_text.trim().is_empty() {
        "api error".to_string()
    } else {
        body_sample.clone()
    };
    let details = match serde_json::from_str::<Value>(body_text) {
        Ok(json) => serde_json::json!({
            "status": status,
            "response": json,
            "request_ids": request_ids,
        }),
        Err(_) => serde_json::json!({
            "status": status,
            "raw": body_text,
            "request_ids": request_ids,
        }),
    };
    AssessError::api_error_with_details(status, msg, details)
}
