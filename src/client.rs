//! Assessment service client.
//!
//! `CertAssessClient` owns the HTTP connection to the assessment service and
//! implements the capability traits: catalog navigation, submission, and
//! report download. Every response goes through the same pipeline: error
//! classification on failure statuses, lenient JSON parsing, and wire
//! normalization into the stable result types.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::Url;
use reqwest::multipart::{Form, Part};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::Instrument;

use crate::builder::ClientBuilder;
use crate::catalog::CatalogCache;
use crate::error::AssessError;
use crate::json::parse_lenient;
use crate::retry_api::{RetryOptions, classify_http_error, classify_service_error, maybe_retry};
use crate::traits::{AssessmentCapability, CatalogCapability, ReportCapability};
use crate::types::{
    AssessmentRequest, AssessmentResult, HttpConfig, ReportLink, ResponseMetadata, SchemeVersion,
};
use crate::wire::normalize::normalize_assessment;
use crate::wire::{WireAssessment, WireSchemeList};

/// Client for a building-certification assessment service.
pub struct CertAssessClient {
    pub(crate) http: reqwest::Client,
    pub(crate) base_url: Url,
    pub(crate) api_key: SecretString,
    pub(crate) http_config: HttpConfig,
    pub(crate) retry_options: Option<RetryOptions>,
    pub(crate) http_debug: bool,
    pub(crate) max_document_bytes: usize,
    pub(crate) max_documents: usize,
    pub(crate) catalog_cache: CatalogCache,
}

/// JSON metadata part of a submission (multipart) or the full body (inline).
#[derive(Debug, Serialize)]
struct SubmitBody<'a> {
    scheme_version: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    topic: Option<&'a str>,
    criterion_ids: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    project: Option<&'a crate::types::ProjectInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    documents: Option<Vec<InlineDocument<'a>>>,
}

/// Base64 document encoding for the inline JSON fallback.
#[derive(Debug, Serialize)]
struct InlineDocument<'a> {
    file_name: &'a str,
    mime_type: &'a str,
    content_base64: String,
}

impl CertAssessClient {
    /// Start building a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Drop all cached scheme versions, forcing fresh fetches.
    pub fn clear_catalog_cache(&self) {
        self.catalog_cache.clear();
    }

    fn endpoint(&self, path: &str) -> Result<Url, AssessError> {
        self.base_url
            .join(&format!("{}/{path}", crate::defaults::api::VERSION_PREFIX))
            .map_err(|e| AssessError::ConfigurationError(format!("invalid endpoint path: {e}")))
    }

    fn log_response(&self, op: &str, status: u16, body: &str) {
        if self.http_debug {
            let sample = body.chars().take(500).collect::<String>();
            tracing::debug!(op, status, body_sample = %sample, "assessment service response");
        }
    }

    /// Read a response, classifying failure statuses into typed errors.
    async fn read_body(&self, op: &str, response: reqwest::Response) -> Result<(String, ResponseMetadata), AssessError> {
        let status = response.status();
        let headers = response.headers().clone();
        let request_id = headers
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let body = response.text().await?;
        self.log_response(op, status.as_u16(), &body);

        if !status.is_success() {
            let err = classify_service_error(status.as_u16(), &body).unwrap_or_else(|| {
                classify_http_error(status.as_u16(), &body, &headers, None)
            });
            return Err(err);
        }

        let metadata = ResponseMetadata::from_headers(&headers, request_id);
        Ok((body, metadata))
    }

    fn parse_assessment(
        &self,
        body: &str,
        metadata: ResponseMetadata,
    ) -> Result<AssessmentResult, AssessError> {
        let wire: WireAssessment = parse_lenient(body)
            .map_err(|e| AssessError::ParseError(format!("assessment payload: {e}")))?;
        let mut result = normalize_assessment(wire, Some(&self.base_url));
        result.metadata = Some(metadata);
        Ok(result)
    }

    fn submit_body<'a>(&self, request: &'a AssessmentRequest, inline: bool) -> SubmitBody<'a> {
        let documents = inline.then(|| {
            request
                .documents
                .iter()
                .map(|doc| InlineDocument {
                    file_name: &doc.file_name,
                    mime_type: &doc.mime_type,
                    content_base64: BASE64.encode(&doc.content),
                })
                .collect()
        });
        SubmitBody {
            scheme_version: &request.scheme_version,
            category: request.category.as_deref(),
            topic: request.topic.as_deref(),
            criterion_ids: &request.criterion_ids,
            project: request.project.as_ref(),
            documents,
        }
    }

    fn build_form(&self, request: &AssessmentRequest) -> Result<Form, AssessError> {
        let metadata = serde_json::to_string(&self.submit_body(request, false))?;
        let mut form = Form::new().part(
            "request",
            Part::text(metadata)
                .mime_str("application/json")
                .map_err(|e| AssessError::InternalError(format!("request part: {e}")))?,
        );
        for doc in &request.documents {
            let part = Part::bytes(doc.content.clone())
                .file_name(doc.file_name.clone())
                .mime_str(&doc.mime_type)
                .map_err(|e| {
                    AssessError::InvalidInput(format!(
                        "document '{}' has invalid MIME type '{}': {e}",
                        doc.file_name, doc.mime_type
                    ))
                })?;
            form = form.part("documents", part);
        }
        Ok(form)
    }

    fn apply_common_headers(&self, mut req: reqwest::RequestBuilder, request_id: &str) -> reqwest::RequestBuilder {
        req = req
            .bearer_auth(self.api_key.expose_secret())
            .header("x-request-id", request_id);
        for (name, value) in &self.http_config.headers {
            req = req.header(name, value);
        }
        req
    }

    /// Run an operation with retry, honoring idempotency and the 401-retry
    /// toggle from the configured [`RetryOptions`].
    async fn with_retry<F, Fut, T>(&self, idempotent: bool, operation: F) -> Result<T, AssessError>
    where
        F: Fn() -> Fut + Send + Sync,
        Fut: std::future::Future<Output = Result<T, AssessError>> + Send,
        T: Send,
    {
        let options = self
            .retry_options
            .clone()
            .filter(|opts| idempotent || opts.idempotent);
        // An auth failure means the request was never processed, so the
        // 401-retry applies even to non-idempotent submissions.
        let retry_401 = self
            .retry_options
            .as_ref()
            .map(|o| o.retry_401)
            .unwrap_or(false);

        match maybe_retry(options, &operation).await {
            // At most one extra attempt after an auth failure; key refresh is
            // expected to happen out-of-band (e.g. a proxy swapping keys).
            Err(err) if retry_401 && err.is_auth_error() => {
                tracing::debug!("retrying once after authentication failure");
                operation().await
            }
            other => other,
        }
    }

    async fn fetch_scheme_versions(&self) -> Result<Vec<SchemeVersion>, AssessError> {
        let url = self.endpoint("schemes")?;
        let request_id = uuid::Uuid::new_v4().to_string();
        let response = self
            .apply_common_headers(self.http.get(url), &request_id)
            .send()
            .await?;
        let (body, _) = self.read_body("scheme_versions", response).await?;

        if let Ok(list) = parse_lenient::<Vec<SchemeVersion>>(&body) {
            return Ok(list);
        }
        let wrapped: WireSchemeList = parse_lenient(&body)
            .map_err(|e| AssessError::ParseError(format!("scheme list payload: {e}")))?;
        Ok(wrapped.schemes)
    }

    async fn fetch_scheme_version(&self, id: &str) -> Result<SchemeVersion, AssessError> {
        let encoded = urlencoding::encode(id);
        let url = self.endpoint(&format!("schemes/{encoded}"))?;
        let request_id = uuid::Uuid::new_v4().to_string();
        let response = self
            .apply_common_headers(self.http.get(url), &request_id)
            .send()
            .await?;
        let (body, _) = self.read_body("scheme_version", response).await?;
        parse_lenient(&body)
            .map_err(|e| AssessError::ParseError(format!("scheme version payload: {e}")))
    }

    async fn submit_via_form(
        &self,
        request: &AssessmentRequest,
    ) -> Result<AssessmentResult, AssessError> {
        let url = self.endpoint("assessments")?;
        let request_id = uuid::Uuid::new_v4().to_string();
        let form = self.build_form(request)?;
        if self.http_debug {
            tracing::debug!(
                %url,
                criteria = request.criterion_ids.len(),
                documents = request.documents.len(),
                "submitting assessment"
            );
        }
        let response = self
            .apply_common_headers(self.http.post(url), &request_id)
            .multipart(form)
            .send()
            .await?;
        let (body, metadata) = self.read_body("submit", response).await?;
        self.parse_assessment(&body, metadata)
    }

    /// Submit with documents inlined as base64 in a JSON body.
    ///
    /// Fallback for deployments whose ingress rejects multipart uploads. The
    /// multipart path in [`submit`](AssessmentCapability::submit) is preferred.
    pub async fn submit_inline(
        &self,
        request: AssessmentRequest,
    ) -> Result<AssessmentResult, AssessError> {
        request.validate(self.max_document_bytes, self.max_documents)?;
        let span = tracing::info_span!("submit_inline", scheme = %request.scheme_version);

        self.with_retry(false, || async {
            let url = self.endpoint("assessments")?;
            let request_id = uuid::Uuid::new_v4().to_string();
            let response = self
                .apply_common_headers(self.http.post(url), &request_id)
                .json(&self.submit_body(&request, true))
                .send()
                .await?;
            let (body, metadata) = self.read_body("submit_inline", response).await?;
            self.parse_assessment(&body, metadata)
        })
        .instrument(span)
        .await
    }
}

impl std::fmt::Debug for CertAssessClient {
    // API key is deliberately absent.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CertAssessClient")
            .field("base_url", &self.base_url.as_str())
            .field("retry_options", &self.retry_options)
            .field("http_debug", &self.http_debug)
            .finish()
    }
}

#[async_trait::async_trait]
impl CatalogCapability for CertAssessClient {
    async fn scheme_versions(&self) -> Result<Vec<SchemeVersion>, AssessError> {
        self.with_retry(true, || self.fetch_scheme_versions()).await
    }

    async fn scheme_version(&self, id: &str) -> Result<SchemeVersion, AssessError> {
        if let Some(cached) = self.catalog_cache.get(id) {
            tracing::debug!(id, "scheme version served from cache");
            return Ok(cached);
        }
        let version = self
            .with_retry(true, || self.fetch_scheme_version(id))
            .await?;
        self.catalog_cache.put(version.clone());
        Ok(version)
    }
}

#[async_trait::async_trait]
impl AssessmentCapability for CertAssessClient {
    async fn submit(&self, request: AssessmentRequest) -> Result<AssessmentResult, AssessError> {
        request.validate(self.max_document_bytes, self.max_documents)?;
        let span = tracing::info_span!("submit", scheme = %request.scheme_version);

        self.with_retry(false, || self.submit_via_form(&request))
            .instrument(span)
            .await
    }
}

#[async_trait::async_trait]
impl ReportCapability for CertAssessClient {
    async fn download_report(&self, link: &ReportLink) -> Result<Vec<u8>, AssessError> {
        if let Some(expires_at) = link.expires_at {
            if expires_at < chrono::Utc::now() {
                return Err(AssessError::NotFound(format!(
                    "report link expired at {expires_at}"
                )));
            }
        }
        let url = Url::parse(&link.url)
            .map_err(|e| AssessError::InvalidParameter(format!("report url: {e}")))?;

        self.with_retry(true, || async {
            let request_id = uuid::Uuid::new_v4().to_string();
            let response = self
                .apply_common_headers(self.http.get(url.clone()), &request_id)
                .send()
                .await?;
            let status = response.status();
            if !status.is_success() {
                let headers = response.headers().clone();
                let body = response.text().await.unwrap_or_default();
                return Err(classify_http_error(status.as_u16(), &body, &headers, None));
            }
            let bytes = response.bytes().await?;
            if bytes.is_empty() {
                return Err(AssessError::ParseError("empty report body".to_string()));
            }
            Ok(bytes.to_vec())
        })
        .await
    }
}
