//! Capability traits for the assessment client.
//!
//! These are the seams between the HTTP client and anything that consumes it:
//! UIs depend on the traits, tests substitute in-memory fakes.

use async_trait::async_trait;

use crate::error::AssessError;
use crate::types::{AssessmentRequest, AssessmentResult, ReportLink, SchemeVersion};

/// Catalog navigation: scheme versions and their criteria.
#[async_trait]
pub trait CatalogCapability: Send + Sync {
    /// List all scheme versions offered by the service.
    async fn scheme_versions(&self) -> Result<Vec<SchemeVersion>, AssessError>;

    /// Fetch a single scheme version with its full category/topic/criterion tree.
    async fn scheme_version(&self, id: &str) -> Result<SchemeVersion, AssessError>;
}

/// Submitting assessments.
#[async_trait]
pub trait AssessmentCapability: Send + Sync {
    /// Submit criteria and supporting documents for assessment.
    async fn submit(&self, request: AssessmentRequest) -> Result<AssessmentResult, AssessError>;
}

/// Downloading generated reports.
#[async_trait]
pub trait ReportCapability: Send + Sync {
    /// Download the report behind a link produced by a previous assessment.
    async fn download_report(&self, link: &ReportLink) -> Result<Vec<u8>, AssessError>;
}
