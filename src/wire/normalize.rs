//! Normalization of wire-level responses into stable types.
//!
//! Invariant: normalization never fails. Unknown statuses map to
//! [`CriterionStatus::Unknown`], unparsable numbers to `None`, and a broken
//! report link to no link; the caller always gets a usable result for whatever
//! the service managed to produce.

use reqwest::Url;
use serde_json::Value;

use super::{WireAssessment, WireCriterion};
use crate::types::{
    AssessmentResult, CriterionAssessment, CriterionStatus, EvidenceRef, PointsSummary, ReportLink,
};

/// Normalize a wire assessment into the stable result shape.
///
/// `base_url` is used to resolve relative report URLs.
pub fn normalize_assessment(wire: WireAssessment, base_url: Option<&Url>) -> AssessmentResult {
    let criteria: Vec<CriterionAssessment> = wire
        .criteria
        .unwrap_or_default()
        .into_iter()
        .filter_map(normalize_criterion)
        .collect();

    let summary = normalize_summary(wire.summary.as_ref(), &criteria);
    let report = wire
        .report
        .as_ref()
        .and_then(|v| normalize_report(v, base_url));

    AssessmentResult {
        id: wire.id,
        scheme_version: wire.scheme_version,
        criteria,
        summary,
        report,
        metadata: None,
    }
}

fn normalize_criterion(wire: WireCriterion) -> Option<CriterionAssessment> {
    let Some(id) = wire.id.filter(|id| !id.trim().is_empty()) else {
        tracing::warn!("dropping criterion result without id");
        return None;
    };

    Some(CriterionAssessment {
        criterion_id: id,
        status: wire
            .status
            .as_ref()
            .map(parse_status)
            .unwrap_or(CriterionStatus::Unknown),
        awarded_points: wire.points.as_ref().and_then(coerce_points),
        max_points: wire.max.as_ref().and_then(coerce_points),
        justification: wire.justification.filter(|j| !j.trim().is_empty()),
        evidence: wire
            .evidence
            .as_ref()
            .map(normalize_evidence)
            .unwrap_or_default(),
    })
}

/// Map a wire status value onto the normalized vocabulary.
///
/// Handles booleans and the status-string families observed in service
/// responses, including German scheme terminology. Checks negated families
/// before positive ones so "nicht erfüllt" never matches the "erfüllt" family.
pub fn parse_status(value: &Value) -> CriterionStatus {
    let s = match value {
        Value::Bool(true) => return CriterionStatus::Fulfilled,
        Value::Bool(false) => return CriterionStatus::NotFulfilled,
        Value::String(s) => s,
        _ => return CriterionStatus::Unknown,
    };
    let norm = s.trim().to_lowercase().replace(['_', '-'], " ");

    if norm.is_empty() {
        return CriterionStatus::Unknown;
    }
    if norm.contains("partial") || norm.contains("teilweise") {
        return CriterionStatus::PartiallyFulfilled;
    }
    if norm == "n/a"
        || norm == "na"
        || norm.contains("not applicable")
        || norm.contains("nicht anwendbar")
    {
        return CriterionStatus::NotApplicable;
    }
    if norm.starts_with("not ")
        || norm.starts_with("non ")
        || norm.contains("nicht erfüllt")
        || norm.contains("fail")
        || norm == "no"
    {
        return CriterionStatus::NotFulfilled;
    }
    if norm.contains("fulfilled")
        || norm.contains("erfüllt")
        || norm.contains("pass")
        || norm.contains("compliant")
        || norm == "met"
        || norm == "ok"
        || norm == "yes"
    {
        return CriterionStatus::Fulfilled;
    }
    CriterionStatus::Unknown
}

/// Coerce a wire points value into a float.
///
/// Accepts numbers and numeric strings, including the decimal-comma form.
pub fn coerce_points(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<f64>()
                .ok()
                .or_else(|| trimmed.replace(',', ".").parse::<f64>().ok())
        }
        _ => None,
    }
}

/// Normalize the evidence block: a bare string, a single object, or an array
/// of either.
pub fn normalize_evidence(value: &Value) -> Vec<EvidenceRef> {
    match value {
        Value::Array(items) => items.iter().flat_map(normalize_evidence).collect(),
        Value::String(s) if !s.trim().is_empty() => vec![EvidenceRef {
            document: None,
            page: None,
            quote: Some(s.trim().to_string()),
        }],
        Value::Object(obj) => {
            let document = ["document", "file", "fileName", "file_name", "source"]
                .iter()
                .find_map(|k| obj.get(*k))
                .and_then(|v| v.as_str())
                .map(|s| s.to_string());
            let page = ["page", "pageNumber", "page_number"]
                .iter()
                .find_map(|k| obj.get(*k))
                .and_then(coerce_points)
                .map(|p| p as u32);
            let quote = ["quote", "text", "excerpt", "passage"]
                .iter()
                .find_map(|k| obj.get(*k))
                .and_then(|v| v.as_str())
                .map(|s| s.to_string());
            if document.is_none() && page.is_none() && quote.is_none() {
                return Vec::new();
            }
            vec![EvidenceRef {
                document,
                page,
                quote,
            }]
        }
        _ => Vec::new(),
    }
}

/// Normalize the summary block, recomputing from criteria when the service
/// totals are absent or internally inconsistent.
fn normalize_summary(summary: Option<&Value>, criteria: &[CriterionAssessment]) -> PointsSummary {
    if let Some(Value::Object(obj)) = summary {
        let achieved = ["achieved", "totalAchieved", "total_achieved", "points", "score"]
            .iter()
            .find_map(|k| obj.get(*k))
            .and_then(coerce_points);
        let max = ["max", "totalMax", "total_max", "possible", "maxPoints", "max_points"]
            .iter()
            .find_map(|k| obj.get(*k))
            .and_then(coerce_points);
        if let (Some(achieved), Some(max)) = (achieved, max) {
            if max > 0.0 && achieved >= 0.0 && achieved <= max {
                return PointsSummary::from_totals(achieved, max);
            }
            tracing::warn!(
                achieved,
                max,
                "service summary inconsistent, recomputing from criteria"
            );
        }
    }
    PointsSummary::from_criteria(criteria)
}

/// Normalize the report link: a bare URL string or an object.
///
/// Relative URLs resolve against the client base URL; an unresolvable link
/// yields `None` rather than an error.
fn normalize_report(value: &Value, base_url: Option<&Url>) -> Option<ReportLink> {
    let (raw_url, format, expires_at) = match value {
        Value::String(s) => (s.clone(), None, None),
        Value::Object(obj) => {
            let url = ["url", "href", "link", "downloadUrl", "download_url"]
                .iter()
                .find_map(|k| obj.get(*k))
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())?;
            let format = ["format", "type"]
                .iter()
                .find_map(|k| obj.get(*k))
                .and_then(|v| v.as_str())
                .map(|s| s.to_lowercase());
            let expires_at = ["expiresAt", "expires_at", "expires"]
                .iter()
                .find_map(|k| obj.get(*k))
                .and_then(|v| v.as_str())
                .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
                .map(|dt| dt.with_timezone(&chrono::Utc));
            (url, format, expires_at)
        }
        _ => return None,
    };

    let absolute = match Url::parse(&raw_url) {
        Ok(url) => url,
        Err(_) => match base_url.and_then(|base| base.join(&raw_url).ok()) {
            Some(url) => url,
            None => {
                tracing::warn!(url = %raw_url, "discarding unresolvable report link");
                return None;
            }
        },
    };

    Some(ReportLink {
        url: absolute.to_string(),
        format,
        expires_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn wire(json: serde_json::Value) -> WireAssessment {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn status_vocabularies() {
        assert_eq!(parse_status(&json!("fulfilled")), CriterionStatus::Fulfilled);
        assert_eq!(parse_status(&json!("FULFILLED")), CriterionStatus::Fulfilled);
        assert_eq!(parse_status(&json!("passed")), CriterionStatus::Fulfilled);
        assert_eq!(parse_status(&json!("erfüllt")), CriterionStatus::Fulfilled);
        assert_eq!(
            parse_status(&json!("partially_fulfilled")),
            CriterionStatus::PartiallyFulfilled
        );
        assert_eq!(
            parse_status(&json!("teilweise erfüllt")),
            CriterionStatus::PartiallyFulfilled
        );
        assert_eq!(
            parse_status(&json!("not_fulfilled")),
            CriterionStatus::NotFulfilled
        );
        assert_eq!(
            parse_status(&json!("nicht erfüllt")),
            CriterionStatus::NotFulfilled
        );
        assert_eq!(
            parse_status(&json!("non-compliant")),
            CriterionStatus::NotFulfilled
        );
        assert_eq!(
            parse_status(&json!("n/a")),
            CriterionStatus::NotApplicable
        );
        assert_eq!(
            parse_status(&json!("not applicable")),
            CriterionStatus::NotApplicable
        );
        assert_eq!(parse_status(&json!(true)), CriterionStatus::Fulfilled);
        assert_eq!(parse_status(&json!(false)), CriterionStatus::NotFulfilled);
        assert_eq!(parse_status(&json!("tbd")), CriterionStatus::Unknown);
        assert_eq!(parse_status(&json!(42)), CriterionStatus::Unknown);
    }

    #[test]
    fn point_coercion() {
        assert_eq!(coerce_points(&json!(7.5)), Some(7.5));
        assert_eq!(coerce_points(&json!("7.5")), Some(7.5));
        assert_eq!(coerce_points(&json!(" 7,5 ")), Some(7.5));
        assert_eq!(coerce_points(&json!("seven")), None);
        assert_eq!(coerce_points(&json!(null)), None);
    }

    #[test]
    fn evidence_shapes() {
        assert_eq!(
            normalize_evidence(&json!("see energy report p. 4")),
            vec![EvidenceRef {
                document: None,
                page: None,
                quote: Some("see energy report p. 4".into()),
            }]
        );
        assert_eq!(
            normalize_evidence(&json!({"document": "lca.pdf", "page": "12", "quote": "GWP total"})),
            vec![EvidenceRef {
                document: Some("lca.pdf".into()),
                page: Some(12),
                quote: Some("GWP total".into()),
            }]
        );
        let refs = normalize_evidence(&json!([
            {"fileName": "lca.pdf", "pageNumber": 3},
            "cover letter"
        ]));
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].document.as_deref(), Some("lca.pdf"));
        assert_eq!(refs[0].page, Some(3));
        assert_eq!(refs[1].quote.as_deref(), Some("cover letter"));
        assert!(normalize_evidence(&json!({})).is_empty());
        assert!(normalize_evidence(&json!(null)).is_empty());
    }

    #[test]
    fn criteria_without_id_are_dropped() {
        let result = normalize_assessment(
            wire(json!({
                "criteria": [
                    {"status": "fulfilled"},
                    {"criterionId": "ENV1.1-01", "status": "fulfilled"}
                ]
            })),
            None,
        );
        assert_eq!(result.criteria.len(), 1);
        assert_eq!(result.criteria[0].criterion_id, "ENV1.1-01");
    }

    #[test]
    fn summary_taken_from_service_when_consistent() {
        let result = normalize_assessment(
            wire(json!({
                "criteria": [],
                "summary": {"achieved": "30", "max": 40}
            })),
            None,
        );
        assert_eq!(result.summary.achieved, 30.0);
        assert_eq!(result.summary.max, 40.0);
        assert_eq!(result.summary.percentage, 75.0);
    }

    #[tracing_test::traced_test]
    #[test]
    fn inconsistent_summary_logs_a_warning() {
        normalize_assessment(
            wire(json!({
                "criteria": [],
                "summary": {"achieved": 99, "max": 10}
            })),
            None,
        );
        assert!(logs_contain("recomputing from criteria"));
    }

    #[test]
    fn inconsistent_summary_recomputed_from_criteria() {
        let result = normalize_assessment(
            wire(json!({
                "criteria": [
                    {"criterion_id": "a", "status": "fulfilled", "points": 5, "max_points": 10}
                ],
                "summary": {"achieved": 99, "max": 10}
            })),
            None,
        );
        assert_eq!(result.summary.achieved, 5.0);
        assert_eq!(result.summary.max, 10.0);
        assert_eq!(result.summary.percentage, 50.0);
    }

    #[test]
    fn missing_summary_recomputed() {
        let result = normalize_assessment(
            wire(json!({
                "results": [
                    {"criterionId": "a", "result": "passed", "score": "4", "maxPoints": "8"}
                ]
            })),
            None,
        );
        assert_eq!(result.summary.achieved, 4.0);
        assert_eq!(result.summary.percentage, 50.0);
    }

    #[test]
    fn relative_report_url_resolves_against_base() {
        let base = Url::parse("https://assess.example.com/v1/").unwrap();
        let result = normalize_assessment(
            wire(json!({"report": "/reports/abc.pdf"})),
            Some(&base),
        );
        assert_eq!(
            result.report.unwrap().url,
            "https://assess.example.com/reports/abc.pdf"
        );
    }

    #[test]
    fn absolute_report_url_kept() {
        let result = normalize_assessment(
            wire(json!({"reportUrl": "https://cdn.example.com/r/abc.pdf"})),
            None,
        );
        assert_eq!(result.report.unwrap().url, "https://cdn.example.com/r/abc.pdf");
    }

    #[test]
    fn report_object_with_format_and_expiry() {
        let result = normalize_assessment(
            wire(json!({
                "report": {
                    "href": "https://cdn.example.com/r/abc.pdf",
                    "type": "PDF",
                    "expiresAt": "2026-09-01T12:00:00Z"
                }
            })),
            None,
        );
        let report = result.report.unwrap();
        assert_eq!(report.format.as_deref(), Some("pdf"));
        assert!(report.expires_at.is_some());
    }

    #[test]
    fn unresolvable_relative_url_discarded() {
        let result = normalize_assessment(wire(json!({"report": "/reports/abc.pdf"})), None);
        assert!(result.report.is_none());
    }
}
