//! Assessment request and result types.
//!
//! `AssessmentRequest` is what the caller assembles; `AssessmentResult` is the
//! stable shape produced by normalizing the service's loose wire contract
//! (see `wire::normalize`).

use serde::{Deserialize, Serialize};

use crate::error::AssessError;
use crate::types::common::ResponseMetadata;
use crate::types::document::Document;

/// Optional project metadata attached to a submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectInfo {
    /// Project name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Project location (free-form)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Short project description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A submission to the assessment service.
#[derive(Debug, Clone)]
pub struct AssessmentRequest {
    /// Scheme version id, e.g. `dgnb-2023`
    pub scheme_version: String,
    /// Selected category id, when the submission targets one category
    pub category: Option<String>,
    /// Selected topic id, when the submission targets one topic
    pub topic: Option<String>,
    /// Criterion ids to assess
    pub criterion_ids: Vec<String>,
    /// Supporting documents
    pub documents: Vec<Document>,
    /// Optional project metadata
    pub project: Option<ProjectInfo>,
}

impl AssessmentRequest {
    /// Start a request for a scheme version.
    pub fn new(scheme_version: impl Into<String>) -> Self {
        Self {
            scheme_version: scheme_version.into(),
            category: None,
            topic: None,
            criterion_ids: Vec::new(),
            documents: Vec::new(),
            project: None,
        }
    }

    /// Scope the request to a category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Scope the request to a topic.
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    /// Add criterion ids to assess.
    pub fn with_criteria<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.criterion_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Attach a supporting document.
    pub fn with_document(mut self, document: Document) -> Self {
        self.documents.push(document);
        self
    }

    /// Attach project metadata.
    pub fn with_project(mut self, project: ProjectInfo) -> Self {
        self.project = Some(project);
        self
    }

    /// Validate the request against upload limits before sending.
    pub fn validate(&self, max_document_bytes: usize, max_documents: usize) -> Result<(), AssessError> {
        if self.scheme_version.trim().is_empty() {
            return Err(AssessError::InvalidParameter(
                "scheme_version must not be empty".to_string(),
            ));
        }
        if self.criterion_ids.is_empty() {
            return Err(AssessError::InvalidInput(
                "no criteria selected".to_string(),
            ));
        }
        if self.documents.len() > max_documents {
            return Err(AssessError::InvalidInput(format!(
                "{} documents attached, limit is {max_documents}",
                self.documents.len()
            )));
        }
        for doc in &self.documents {
            doc.validate(max_document_bytes)?;
        }
        Ok(())
    }
}

/// Assessment outcome for a single criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionStatus {
    /// Criterion fully met
    Fulfilled,
    /// Criterion partially met
    PartiallyFulfilled,
    /// Criterion not met
    NotFulfilled,
    /// Criterion does not apply to this project
    NotApplicable,
    /// The service returned no recognizable status
    Unknown,
}

impl CriterionStatus {
    /// Stable string form used in serialized output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fulfilled => "fulfilled",
            Self::PartiallyFulfilled => "partially_fulfilled",
            Self::NotFulfilled => "not_fulfilled",
            Self::NotApplicable => "not_applicable",
            Self::Unknown => "unknown",
        }
    }

    /// Whether this status contributes awarded points.
    pub fn is_scoring(&self) -> bool {
        matches!(self, Self::Fulfilled | Self::PartiallyFulfilled)
    }
}

/// A reference to evidence supporting a criterion assessment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvidenceRef {
    /// File name of the referenced document, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
    /// Page number within the document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Quoted passage or description of the evidence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<String>,
}

/// Normalized assessment of a single criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionAssessment {
    /// Criterion id as submitted
    pub criterion_id: String,
    /// Normalized status
    pub status: CriterionStatus,
    /// Points awarded by the service, when stated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub awarded_points: Option<f64>,
    /// Maximum points for the criterion, when stated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_points: Option<f64>,
    /// Assessor justification text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub justification: Option<String>,
    /// Evidence references
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub evidence: Vec<EvidenceRef>,
}

/// Aggregated points over all assessed criteria.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointsSummary {
    /// Total points achieved
    pub achieved: f64,
    /// Total achievable points
    pub max: f64,
    /// Achieved share in percent (0.0 when `max` is 0)
    pub percentage: f64,
}

impl PointsSummary {
    /// Build a summary from per-criterion assessments.
    pub fn from_criteria(criteria: &[CriterionAssessment]) -> Self {
        let achieved: f64 = criteria.iter().filter_map(|c| c.awarded_points).sum();
        let max: f64 = criteria.iter().filter_map(|c| c.max_points).sum();
        Self::from_totals(achieved, max)
    }

    /// Build a summary from raw totals, recomputing the percentage.
    pub fn from_totals(achieved: f64, max: f64) -> Self {
        let percentage = if max > 0.0 {
            (achieved / max) * 100.0
        } else {
            0.0
        };
        Self {
            achieved,
            max,
            percentage,
        }
    }
}

/// Link to a downloadable assessment report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportLink {
    /// Absolute download URL
    pub url: String,
    /// Report format (e.g. `pdf`), when stated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Link expiry, when stated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Normalized result of an assessment submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentResult {
    /// Assessment id assigned by the service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Scheme version the service assessed against
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme_version: Option<String>,
    /// Per-criterion assessments
    pub criteria: Vec<CriterionAssessment>,
    /// Aggregated points
    pub summary: PointsSummary,
    /// Downloadable report, when offered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ReportLink>,
    /// HTTP response metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ResponseMetadata>,
}

impl AssessmentResult {
    /// Look up the assessment for a criterion id.
    pub fn criterion(&self, id: &str) -> Option<&CriterionAssessment> {
        self.criteria.iter().find(|c| c.criterion_id == id)
    }

    /// Count criteria with the given status.
    pub fn count_with_status(&self, status: CriterionStatus) -> usize {
        self.criteria.iter().filter(|c| c.status == status).count()
    }
}
