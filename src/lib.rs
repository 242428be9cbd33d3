//! certassess
//!
//! An async client for building-certification assessment services.
//!
//! The library covers the full submission flow: navigating the scheme catalog
//! (versions, categories, topics, criteria), assembling a submission from
//! selected criteria and supporting documents, sending it to the remote
//! assessment service, and normalizing the loosely-typed response into a
//! stable, typed [`AssessmentResult`](types::AssessmentResult).
//!
//! # Example
//!
//! ```rust,ignore
//! use certassess::prelude::*;
//!
//! # async fn example() -> Result<(), AssessError> {
//! let client = CertAssessClient::builder()
//!     .base_url("https://assess.example.com")
//!     .api_key("sk-...")
//!     .build()?;
//!
//! let request = AssessmentRequest::new("dgnb-2023")
//!     .with_criteria(["ENV1.1", "ENV1.2"])
//!     .with_document(Document::from_bytes("report.pdf", pdf_bytes)?);
//!
//! let result = client.submit(request).await?;
//! println!("{} / {} points", result.summary.achieved, result.summary.max);
//! # Ok(())
//! # }
//! ```
#![deny(unsafe_code)]

pub mod builder;
pub mod catalog;
pub mod client;
pub mod defaults;
pub mod error;
pub mod json;
pub mod retry;
pub mod retry_api;
pub mod traits;
pub mod types;
pub mod utils;
pub mod wire;

pub use error::AssessError;

/// Commonly used types, re-exported for convenience.
pub mod prelude {
    pub use crate::builder::ClientBuilder;
    pub use crate::client::CertAssessClient;
    pub use crate::error::{AssessError, ErrorCategory};
    pub use crate::retry_api::RetryOptions;
    pub use crate::traits::{AssessmentCapability, CatalogCapability, ReportCapability};
    pub use crate::types::{
        AssessmentRequest, AssessmentResult, Criterion, CriterionAssessment, CriterionStatus,
        Document, EvidenceRef, PointsSummary, ProjectInfo, ReportLink, SchemeVersion,
    };
}
