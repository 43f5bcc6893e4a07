//! JSON reporter for machine-readable output

use super::HtmlReporter;
use crate::assessment::AggregateStats;
use crate::Report;
use serde::{Deserialize, Serialize};

/// Response body of `POST /submit`: the rendered HTML fragment plus the raw
/// category scores in report order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub html: String,
    pub category_scores: [f64; 5],
}

impl SubmitResponse {
    pub fn from_report(report: &Report, html: &HtmlReporter) -> Self {
        Self {
            html: html.report(report),
            category_scores: report.category_scores.to_array(),
        }
    }
}

/// Reporter for JSON output
pub struct JsonReporter {
    /// Whether to pretty-print JSON
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Enable pretty-printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    fn render<T: Serialize + ?Sized>(&self, value: &T, fallback: &str) -> String {
        let out = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        out.unwrap_or_else(|_| fallback.to_string())
    }

    /// Report a single structured report as JSON
    pub fn report(&self, report: &Report) -> String {
        self.render(report, "{}")
    }

    /// Report the exact `/submit` response body
    pub fn submit_response(&self, report: &Report) -> String {
        self.render(&SubmitResponse::from_report(report, &HtmlReporter::new()), "{}")
    }

    /// Report multiple reports as a JSON array
    pub fn report_many(&self, reports: &[Report]) -> String {
        self.render(reports, "[]")
    }

    /// Report with summary
    pub fn report_with_summary(&self, reports: &[Report], stats: &AggregateStats) -> String {
        let output = JsonOutput {
            reports,
            summary: JsonSummary {
                submissions_assessed: stats.submissions_assessed,
                average_score: stats.average_score,
                strong: stats.strong,
                moderate: stats.moderate,
                needs_improvement: stats.needs_improvement,
                total_gaps: stats.total_gaps,
            },
        };
        self.render(&output, "{}")
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonOutput<'a> {
    reports: &'a [Report],
    summary: JsonSummary,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonSummary {
    submissions_assessed: usize,
    average_score: f64,
    strong: usize,
    moderate: usize,
    needs_improvement: usize,
    total_gaps: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AssessmentEngine, Responses, Submission};

    fn make_report(name: &str, value: f64) -> Report {
        AssessmentEngine::new().assess(&Submission {
            business_name: name.to_string(),
            email: "ops@acme.io".to_string(),
            responses: Responses::uniform(value),
        })
    }

    #[test]
    fn test_json_report_has_expected_keys() {
        let json = JsonReporter::new().report(&make_report("Acme", 1.0));
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["client"]["businessName"], "Acme");
        assert!(parsed["client"].get("submittedAt").is_some());
        assert!(parsed["client"].get("generatedAt").is_some());
        assert_eq!(parsed["categoryScores"]["processingIntegrity"], 1.0);
        assert_eq!(parsed["maturity"], "needs-improvement");
        assert_eq!(parsed["gaps"].as_array().unwrap().len(), 5);
        assert_eq!(parsed["gaps"][0]["kind"], "gap");
        assert_eq!(parsed["gaps"][0]["category"], "security");
        assert_eq!(parsed["riskMatrix"]["rows"][0]["likelihood"], "High");
        assert!(parsed["conclusion"]["nextSteps"]
            .as_str()
            .unwrap()
            .starts_with("Engage a SOC 2 auditor"));
    }

    #[test]
    fn test_report_round_trips() {
        let report = make_report("Acme", 3.0);
        let json = JsonReporter::new().report(&report);
        let parsed: Report = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.category_scores, report.category_scores);
        assert_eq!(parsed.strengths, report.strengths);
        assert_eq!(parsed.client.submitted_at, report.client.submitted_at);
    }

    #[test]
    fn test_submit_response_shape() {
        let json = JsonReporter::new().submit_response(&make_report("Acme", 4.0));
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        let obj = parsed.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert!(obj["html"].as_str().unwrap().contains("<h2>Risk Matrix</h2>"));
        assert_eq!(
            obj["categoryScores"],
            serde_json::json!([4.0, 4.0, 4.0, 4.0, 4.0])
        );
    }

    #[test]
    fn test_json_pretty_output() {
        let json = JsonReporter::new().pretty().report(&make_report("Acme", 2.0));
        assert!(json.contains('\n'), "pretty JSON should have newlines");
        assert!(json.contains("  "), "pretty JSON should have indentation");
    }

    #[test]
    fn test_json_report_many() {
        let reports = vec![make_report("A", 4.0), make_report("B", 0.0)];
        let json = JsonReporter::new().report_many(&reports);
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        let arr = parsed.as_array().unwrap();
        assert_eq!(arr.len(), 2);
        assert_eq!(arr[0]["client"]["businessName"], "A");
        assert_eq!(arr[1]["client"]["businessName"], "B");
    }

    #[test]
    fn test_json_report_with_summary() {
        let reports = vec![make_report("A", 4.0), make_report("B", 0.0)];
        let stats = AssessmentEngine::aggregate_stats(&reports);
        let json = JsonReporter::new().report_with_summary(&reports, &stats);
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        let summary = &parsed["summary"];
        assert_eq!(summary["submissionsAssessed"], 2);
        assert_eq!(summary["averageScore"], 2.0);
        assert_eq!(summary["strong"], 1);
        assert_eq!(summary["needsImprovement"], 1);
        assert_eq!(summary["totalGaps"], 5);
        assert_eq!(parsed["reports"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_json_report_many_empty() {
        let json = JsonReporter::new().report_many(&[]);
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(parsed.as_array().unwrap().is_empty());
    }
}
