//! Assessment engine - turns a submission into a report

use super::findings::FindingClassifier;
use super::narrative;
use super::risk::RiskMatrixBuilder;
use super::ScoreCalculator;
use crate::{AssessmentError, ClientInformation, Report, Submission};
use chrono::{DateTime, Local};

/// Aggregate statistics over several reports
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateStats {
    pub submissions_assessed: usize,
    /// Mean of the per-report overall scores
    pub average_score: f64,
    pub strong: usize,
    pub moderate: usize,
    pub needs_improvement: usize,
    pub total_gaps: usize,
}

/// Main engine that runs scoring, classification and report assembly.
///
/// Holds no state between calls; one engine can serve any number of
/// concurrent requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssessmentEngine;

impl AssessmentEngine {
    /// Create a new assessment engine
    pub fn new() -> Self {
        Self
    }

    /// Assess a validated submission, stamping it with the current local time
    pub fn assess(&self, submission: &Submission) -> Report {
        let submitted_at = Local::now();
        self.assess_at(submission, submitted_at, Local::now())
    }

    /// Validate a JSON body and assess it
    pub fn assess_json(&self, body: &[u8]) -> Result<Report, AssessmentError> {
        let submission = Submission::from_json(body).inspect_err(|e| {
            log::debug!("rejected submission: {}", e);
        })?;
        Ok(self.assess(&submission))
    }

    /// Assess with explicit timestamps
    pub fn assess_at(
        &self,
        submission: &Submission,
        submitted_at: DateTime<Local>,
        generated_at: DateTime<Local>,
    ) -> Report {
        let category_scores = ScoreCalculator::calculate(&submission.responses);
        let overall_score = ScoreCalculator::overall(&category_scores);
        let maturity = ScoreCalculator::maturity(&category_scores);

        let findings = FindingClassifier::classify(&category_scores);
        let risk_matrix = RiskMatrixBuilder::build(&findings.gaps, &category_scores);
        let recommendations = narrative::recommendations(&findings.gaps);
        let conclusion = narrative::conclusion(&findings.strengths, &findings.gaps);

        log::debug!(
            "assessed submission: scores={:?} overall={:.2} maturity={} strengths={} gaps={}",
            category_scores.to_array(),
            overall_score,
            maturity,
            findings.strengths.len(),
            findings.gaps.len()
        );

        Report {
            client: ClientInformation {
                business_name: submission.business_name.clone(),
                email: submission.email.clone(),
                submitted_at,
                generated_at,
            },
            category_scores,
            overall_score,
            maturity,
            strengths: findings.strengths,
            gaps: findings.gaps,
            recommendations,
            risk_matrix,
            conclusion,
        }
    }

    /// Calculate aggregate statistics from multiple reports
    pub fn aggregate_stats(reports: &[Report]) -> AggregateStats {
        use crate::Maturity;

        let count = reports.len();
        let average_score = if count == 0 {
            0.0
        } else {
            reports.iter().map(|r| r.overall_score).sum::<f64>() / count as f64
        };
        let band = |m: Maturity| reports.iter().filter(|r| r.maturity == m).count();

        AggregateStats {
            submissions_assessed: count,
            average_score,
            strong: band(Maturity::Strong),
            moderate: band(Maturity::Moderate),
            needs_improvement: band(Maturity::NeedsImprovement),
            total_gaps: reports.iter().map(|r| r.gaps.len()).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Category, Likelihood, Maturity, Responses};

    fn submission(responses: Responses) -> Submission {
        Submission {
            business_name: "Acme".to_string(),
            email: "ops@acme.io".to_string(),
            responses,
        }
    }

    fn mixed() -> Responses {
        let mut values = [2.5; 18];
        for v in values.iter_mut().take(5) {
            *v = 4.0;
        }
        for v in values.iter_mut().skip(5).take(3) {
            *v = 1.0;
        }
        Responses::from_array(values)
    }

    #[test]
    fn test_all_fours() {
        let report = AssessmentEngine::new().assess(&submission(Responses::uniform(4.0)));
        assert_eq!(report.category_scores.to_array(), [4.0; 5]);
        assert_eq!(report.strengths.len(), 5);
        assert!(report.gaps.is_empty());
        assert_eq!(report.maturity, Maturity::Strong);
        assert!(report.risk_matrix.is_empty());
    }

    #[test]
    fn test_all_zeros() {
        let report = AssessmentEngine::new().assess(&submission(Responses::uniform(0.0)));
        assert_eq!(report.category_scores.to_array(), [0.0; 5]);
        assert!(report.strengths.is_empty());
        assert_eq!(report.gaps.len(), 5);
        assert_eq!(report.maturity, Maturity::NeedsImprovement);
        assert_eq!(report.risk_matrix.rows.len(), 5);
    }

    #[test]
    fn test_mixed_example() {
        let report = AssessmentEngine::new().assess(&submission(mixed()));
        assert_eq!(report.category_scores.to_array(), [4.0, 1.0, 2.5, 2.5, 2.5]);
        let strengths: Vec<_> = report.strengths.iter().map(|f| f.category).collect();
        let gaps: Vec<_> = report.gaps.iter().map(|f| f.category).collect();
        assert_eq!(strengths, vec![Category::Security]);
        assert_eq!(gaps, vec![Category::Availability]);
        assert_eq!(report.risk_matrix.rows.len(), 1);
        assert_eq!(report.risk_matrix.rows[0].likelihood, Likelihood::High);
        // (4 + 1 + 2.5 * 3) / 5 = 2.5
        assert_eq!(report.maturity, Maturity::Moderate);
    }

    #[test]
    fn test_assess_at_is_deterministic() {
        let engine = AssessmentEngine::new();
        let now = Local::now();
        let a = engine.assess_at(&submission(mixed()), now, now);
        let b = engine.assess_at(&submission(mixed()), now, now);
        assert_eq!(a, b);
    }

    #[test]
    fn test_assess_json_rejects_invalid() {
        let err = AssessmentEngine::new()
            .assess_json(br#"{"businessName":"Acme"}"#)
            .unwrap_err();
        assert!(matches!(err, AssessmentError::InvalidSubmission { .. }));
    }

    #[test]
    fn test_client_information_copied() {
        let report = AssessmentEngine::new().assess(&submission(mixed()));
        assert_eq!(report.client.business_name, "Acme");
        assert_eq!(report.client.email, "ops@acme.io");
        assert!(report.client.generated_at >= report.client.submitted_at);
    }

    #[test]
    fn test_aggregate_stats() {
        let engine = AssessmentEngine::new();
        let reports = vec![
            engine.assess(&submission(Responses::uniform(4.0))),
            engine.assess(&submission(Responses::uniform(0.0))),
            engine.assess(&submission(mixed())),
        ];
        let stats = AssessmentEngine::aggregate_stats(&reports);
        assert_eq!(stats.submissions_assessed, 3);
        assert!((stats.average_score - (4.0 + 0.0 + 2.5) / 3.0).abs() < 1e-9);
        assert_eq!(stats.strong, 1);
        assert_eq!(stats.moderate, 1);
        assert_eq!(stats.needs_improvement, 1);
        assert_eq!(stats.total_gaps, 6);
    }

    #[test]
    fn test_aggregate_stats_empty() {
        let stats = AssessmentEngine::aggregate_stats(&[]);
        assert_eq!(stats.submissions_assessed, 0);
        assert_eq!(stats.average_score, 0.0);
    }
}
