//! Wire-level types for the assessment service.
//!
//! The remote contract is loose: key casing varies between releases, statuses
//! come in several vocabularies, points arrive as numbers or strings, and the
//! evidence and summary blocks have no fixed shape. Every field here is
//! therefore optional, with `serde` aliases for the known casing variants and
//! `serde_json::Value` catch-alls where the shape itself varies. The
//! [`normalize`] pass turns this into the stable public types.

pub mod normalize;

use serde::Deserialize;
use serde_json::Value;

/// Raw assessment response as received from the service.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireAssessment {
    /// Assessment id
    #[serde(default, alias = "assessmentId", alias = "assessment_id")]
    pub id: Option<String>,
    /// Scheme version echoed by the service
    #[serde(
        default,
        alias = "schemeVersion",
        alias = "scheme_version",
        alias = "version"
    )]
    pub scheme_version: Option<String>,
    /// Per-criterion results
    #[serde(
        default,
        alias = "results",
        alias = "criterionResults",
        alias = "criterion_results",
        alias = "assessments"
    )]
    pub criteria: Option<Vec<WireCriterion>>,
    /// Points summary block (shape varies)
    #[serde(
        default,
        alias = "points",
        alias = "pointsSummary",
        alias = "points_summary",
        alias = "totals"
    )]
    pub summary: Option<Value>,
    /// Report link (string URL or object)
    #[serde(
        default,
        alias = "reportUrl",
        alias = "report_url",
        alias = "reportLink",
        alias = "report_link",
        alias = "downloadUrl",
        alias = "download_url"
    )]
    pub report: Option<Value>,
}

/// Scheme list envelope. Some service releases return a bare array, others
/// wrap it; the client tries both.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireSchemeList {
    /// Scheme versions
    #[serde(default, alias = "versions", alias = "schemeVersions", alias = "scheme_versions")]
    pub schemes: Vec<crate::types::SchemeVersion>,
}

/// Raw per-criterion result.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireCriterion {
    /// Criterion id
    #[serde(
        default,
        alias = "criterionId",
        alias = "criterion_id",
        alias = "criterion"
    )]
    pub id: Option<String>,
    /// Status (string or boolean)
    #[serde(default, alias = "result", alias = "outcome", alias = "state")]
    pub status: Option<Value>,
    /// Awarded points (number or numeric string)
    #[serde(
        default,
        alias = "awardedPoints",
        alias = "awarded_points",
        alias = "achieved",
        alias = "score"
    )]
    pub points: Option<Value>,
    /// Maximum points (number or numeric string)
    #[serde(
        default,
        alias = "maxPoints",
        alias = "max_points",
        alias = "possiblePoints",
        alias = "possible_points"
    )]
    pub max: Option<Value>,
    /// Justification text
    #[serde(
        default,
        alias = "reasoning",
        alias = "explanation",
        alias = "comment"
    )]
    pub justification: Option<String>,
    /// Evidence references (string, object, or array)
    #[serde(
        default,
        alias = "evidenceRefs",
        alias = "evidence_refs",
        alias = "references",
        alias = "sources"
    )]
    pub evidence: Option<Value>,
}
