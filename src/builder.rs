//! Client builder.
//!
//! Constructs a [`CertAssessClient`] from configuration, validating it and
//! assembling the underlying `reqwest` client. The API key can come from the
//! builder or from the `CERTASSESS_API_KEY` environment variable.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::Url;
use secrecy::SecretString;

use crate::catalog::CatalogCache;
use crate::client::CertAssessClient;
use crate::defaults;
use crate::error::AssessError;
use crate::retry_api::RetryOptions;
use crate::types::HttpConfig;

/// Environment variable consulted when no API key is set on the builder.
pub const API_KEY_ENV: &str = "CERTASSESS_API_KEY";

/// Builder for [`CertAssessClient`].
#[derive(Default)]
pub struct ClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    user_agent: Option<String>,
    headers: HashMap<String, String>,
    proxy: Option<String>,
    http_client: Option<reqwest::Client>,
    retry_options: Option<RetryOptions>,
    http_debug: bool,
    max_document_bytes: Option<usize>,
    max_documents: Option<usize>,
    catalog_cache_size: Option<usize>,
}

impl ClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API key. Falls back to `CERTASSESS_API_KEY` when unset.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the service base URL (required).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Add a header sent with every request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Add multiple headers sent with every request.
    pub fn headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Route requests through a proxy.
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Use a custom `reqwest` client.
    ///
    /// Takes precedence over timeout, proxy, and user-agent settings, which
    /// are properties of the client being replaced.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Attach retry options applied to client operations.
    pub fn retry_options(mut self, options: RetryOptions) -> Self {
        self.retry_options = Some(options);
        self
    }

    /// Log request/response summaries at debug level.
    pub fn http_debug(mut self, enabled: bool) -> Self {
        self.http_debug = enabled;
        self
    }

    /// Override the per-document upload size limit.
    pub fn max_document_bytes(mut self, limit: usize) -> Self {
        self.max_document_bytes = Some(limit);
        self
    }

    /// Override the per-submission document count limit.
    pub fn max_documents(mut self, limit: usize) -> Self {
        self.max_documents = Some(limit);
        self
    }

    /// Override the scheme-version cache capacity.
    pub fn catalog_cache_size(mut self, size: usize) -> Self {
        self.catalog_cache_size = Some(size);
        self
    }

    /// Validate the configuration and build the client.
    pub fn build(self) -> Result<CertAssessClient, AssessError> {
        let api_key = self
            .api_key
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                AssessError::ConfigurationError(format!(
                    "API key missing; set it on the builder or via {API_KEY_ENV}"
                ))
            })?;

        let base_url = self.base_url.ok_or_else(|| {
            AssessError::ConfigurationError("base URL is required".to_string())
        })?;
        // A trailing slash keeps Url::join from eating the last path segment.
        let normalized = if base_url.ends_with('/') {
            base_url
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalized)
            .map_err(|e| AssessError::ConfigurationError(format!("invalid base URL: {e}")))?;

        let http_config = HttpConfig {
            timeout: self.timeout.or(Some(defaults::http::REQUEST_TIMEOUT)),
            connect_timeout: self
                .connect_timeout
                .or(Some(defaults::http::CONNECT_TIMEOUT)),
            headers: self.headers,
            proxy: self.proxy,
            user_agent: Some(
                self.user_agent
                    .unwrap_or_else(|| defaults::http::USER_AGENT.to_string()),
            ),
        };

        let http = match self.http_client {
            Some(client) => client,
            None => build_http_client(&http_config)?,
        };

        Ok(CertAssessClient {
            http,
            base_url,
            api_key: SecretString::from(api_key),
            http_config,
            retry_options: self.retry_options,
            http_debug: self.http_debug,
            max_document_bytes: self
                .max_document_bytes
                .unwrap_or(defaults::upload::MAX_DOCUMENT_BYTES),
            max_documents: self.max_documents.unwrap_or(defaults::upload::MAX_DOCUMENTS),
            catalog_cache: CatalogCache::new(
                self.catalog_cache_size
                    .unwrap_or(defaults::catalog::CACHE_SIZE),
            ),
        })
    }
}

fn build_http_client(config: &HttpConfig) -> Result<reqwest::Client, AssessError> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }
    if let Some(connect_timeout) = config.connect_timeout {
        builder = builder.connect_timeout(connect_timeout);
    }
    if let Some(user_agent) = &config.user_agent {
        builder = builder.user_agent(user_agent.clone());
    }
    if let Some(proxy) = &config.proxy {
        let proxy = reqwest::Proxy::all(proxy)
            .map_err(|e| AssessError::ConfigurationError(format!("invalid proxy: {e}")))?;
        builder = builder.proxy(proxy);
    }
    builder
        .build()
        .map_err(|e| AssessError::ConfigurationError(format!("failed to build HTTP client: {e}")))
}
