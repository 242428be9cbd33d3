//! Retry behavior against a mock service.
//!
//! Covers the idempotency rules: catalog fetches retry on transient errors,
//! submissions do not unless explicitly opted in, and the 401-retry fires at
//! most once.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use certassess::prelude::*;
use certassess::retry_api::{RetryBackend, RetryOptions, RetryPolicy};

fn fast_retry_options(max_attempts: u32) -> RetryOptions {
    RetryOptions {
        backend: RetryBackend::Policy,
        policy: Some(
            RetryPolicy::new()
                .with_max_attempts(max_attempts)
                .with_initial_delay(Duration::from_millis(1))
                .with_jitter(false),
        ),
        ..Default::default()
    }
}

fn client_for(server: &MockServer, options: RetryOptions) -> CertAssessClient {
    CertAssessClient::builder()
        .base_url(server.uri())
        .api_key("test-api-key")
        .retry_options(options)
        .build()
        .unwrap()
}

#[tokio::test]
async fn catalog_fetch_retries_transient_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/schemes"))
        .respond_with(ResponseTemplate::new(503).set_body_string("warming up"))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/schemes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "dgnb-2023", "label": "DGNB 2023", "categories": []}
        ])))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, fast_retry_options(3));
    let versions = client.scheme_versions().await.unwrap();
    assert_eq!(versions.len(), 1);

    let received = mock_server.received_requests().await.unwrap();
    assert_eq!(received.len(), 2);
}

#[tokio::test]
async fn submit_is_not_retried_by_default() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/assessments"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, fast_retry_options(3));
    let err = client
        .submit(AssessmentRequest::new("dgnb-2023").with_criteria(["ENV1.1-01"]))
        .await
        .unwrap_err();
    assert!(matches!(err, AssessError::ApiError { code: 500, .. }));
}

#[tokio::test]
async fn submit_retries_when_marked_idempotent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/assessments"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/assessments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .mount(&mock_server)
        .await;

    let options = fast_retry_options(3).with_idempotent(true);
    let client = client_for(&mock_server, options);
    let result = client
        .submit(AssessmentRequest::new("dgnb-2023").with_criteria(["ENV1.1-01"]))
        .await
        .unwrap();
    assert!(result.criteria.is_empty());

    let received = mock_server.received_requests().await.unwrap();
    assert_eq!(received.len(), 2);
}

#[tokio::test]
async fn submit_retries_once_after_401_when_enabled() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/assessments"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"message": "key rotated", "type": "authentication_error"}
        })))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/assessments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .mount(&mock_server)
        .await;

    let options = fast_retry_options(1).with_retry_401(true);
    let client = client_for(&mock_server, options);
    let result = client
        .submit(AssessmentRequest::new("dgnb-2023").with_criteria(["ENV1.1-01"]))
        .await;
    assert!(result.is_ok());

    let received = mock_server.received_requests().await.unwrap();
    assert_eq!(received.len(), 2);
}

#[tokio::test]
async fn auth_error_is_not_retried_without_opt_in() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/assessments"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"message": "bad key", "type": "authentication_error"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, fast_retry_options(3));
    let err = client
        .submit(AssessmentRequest::new("dgnb-2023").with_criteria(["ENV1.1-01"]))
        .await
        .unwrap_err();
    assert!(matches!(err, AssessError::AuthenticationError(_)));
}
