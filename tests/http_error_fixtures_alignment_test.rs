//! HTTP error fixture alignment tests.
//!
//! Each fixture reproduces an error body observed from the service; the
//! client must map it onto the expected `AssessError` variant.

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use certassess::prelude::*;

async fn submit_against(template: ResponseTemplate) -> AssessError {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/assessments"))
        .respond_with(template)
        .mount(&mock_server)
        .await;

    let client = CertAssessClient::builder()
        .base_url(mock_server.uri())
        .api_key("test-api-key")
        .build()
        .unwrap();

    client
        .submit(AssessmentRequest::new("dgnb-2023").with_criteria(["ENV1.1-01"]))
        .await
        .unwrap_err()
}

#[tokio::test]
async fn envelope_authentication_error() {
    let err = submit_against(ResponseTemplate::new(401).set_body_json(json!({
        "error": {"message": "invalid api key", "type": "authentication_error"}
    })))
    .await;
    match err {
        AssessError::AuthenticationError(msg) => assert_eq!(msg, "invalid api key"),
        other => panic!("unexpected error variant: {other:?}"),
    }
}

#[tokio::test]
async fn envelope_rate_limit_error() {
    let err = submit_against(ResponseTemplate::new(429).set_body_json(json!({
        "error": {"message": "too many submissions", "type": "rate_limit_error"}
    })))
    .await;
    assert!(matches!(err, AssessError::RateLimitError(_)));
}

#[tokio::test]
async fn envelope_invalid_request_error() {
    let err = submit_against(ResponseTemplate::new(400).set_body_json(json!({
        "error": {"message": "unknown criterion id", "type": "invalid_request_error"}
    })))
    .await;
    match err {
        AssessError::InvalidInput(msg) => assert_eq!(msg, "unknown criterion id"),
        other => panic!("unexpected error variant: {other:?}"),
    }
}

#[tokio::test]
async fn envelope_insufficient_quota() {
    let err = submit_against(ResponseTemplate::new(429).set_body_json(json!({
        "error": {"message": "monthly assessment quota used up", "type": "insufficient_quota"}
    })))
    .await;
    assert!(matches!(err, AssessError::QuotaExceededError(_)));
}

#[tokio::test]
async fn envelope_unknown_type_becomes_service_error() {
    let err = submit_against(ResponseTemplate::new(410).set_body_json(json!({
        "error": {"message": "scheme version retired", "type": "scheme_retired", "code": "SR-7"}
    })))
    .await;
    match err {
        AssessError::ServiceError {
            message,
            error_code,
        } => {
            assert!(message.contains("scheme version retired"));
            assert_eq!(error_code.as_deref(), Some("SR-7"));
        }
        other => panic!("unexpected error variant: {other:?}"),
    }
}

#[tokio::test]
async fn bare_429_with_retry_after() {
    let err = submit_against(
        ResponseTemplate::new(429)
            .insert_header("retry-after", "17")
            .set_body_string("slow down"),
    )
    .await;
    match err {
        AssessError::RateLimitError(msg) => assert!(msg.contains("retry_after=17")),
        other => panic!("unexpected error variant: {other:?}"),
    }
}

#[tokio::test]
async fn bare_404_is_not_found() {
    let err = submit_against(ResponseTemplate::new(404).set_body_string("no such endpoint")).await;
    assert!(matches!(err, AssessError::NotFound(_)));
}

#[tokio::test]
async fn bare_413_is_invalid_input() {
    let err = submit_against(ResponseTemplate::new(413).set_body_string("payload too large")).await;
    assert!(matches!(err, AssessError::InvalidInput(_)));
}

#[tokio::test]
async fn html_error_page_becomes_api_error() {
    let err = submit_against(
        ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"),
    )
    .await;
    match err {
        AssessError::ApiError { code, .. } => assert_eq!(code, 502),
        other => panic!("unexpected error variant: {other:?}"),
    }
}

#[tokio::test]
async fn quota_message_on_403_is_sniffed() {
    let err = submit_against(
        ResponseTemplate::new(403).set_body_string(r#"{"message":"plan quota exceeded"}"#),
    )
    .await;
    assert!(matches!(err, AssessError::QuotaExceededError(_)));
}
