//! Builder and HTTP configuration behavior.

use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use certassess::prelude::*;

#[tokio::test]
async fn custom_headers_and_user_agent_are_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/schemes"))
        .and(header("x-tenant", "acme-buildings"))
        .and(header("user-agent", "acme-portal/2.4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = CertAssessClient::builder()
        .base_url(mock_server.uri())
        .api_key("test-api-key")
        .header("x-tenant", "acme-buildings")
        .user_agent("acme-portal/2.4")
        .build()
        .unwrap();

    let versions = client.scheme_versions().await.unwrap();
    assert!(versions.is_empty());
}

#[tokio::test]
async fn bearer_auth_is_always_attached() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/schemes"))
        .and(header("authorization", "Bearer sk-test-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = CertAssessClient::builder()
        .base_url(mock_server.uri())
        .api_key("sk-test-123")
        .build()
        .unwrap();

    client.scheme_versions().await.unwrap();
}

#[tokio::test]
async fn base_url_path_prefix_is_preserved() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tenant/acme/v1/schemes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = CertAssessClient::builder()
        .base_url(format!("{}/tenant/acme", mock_server.uri()))
        .api_key("test-api-key")
        .build()
        .unwrap();

    client.scheme_versions().await.unwrap();
}

#[tokio::test]
async fn request_timeout_is_enforced() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/schemes"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(std::time::Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let client = CertAssessClient::builder()
        .base_url(mock_server.uri())
        .api_key("test-api-key")
        .timeout(std::time::Duration::from_millis(100))
        .build()
        .unwrap();

    let err = client.scheme_versions().await.unwrap_err();
    assert!(matches!(err, AssessError::TimeoutError(_)));
}
