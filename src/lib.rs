//! Posture: SOC 2 readiness questionnaire scoring and reporting
//!
//! This library turns an 18-question readiness questionnaire into five
//! Trust Services Criteria maturity scores, classifies strengths and gaps,
//! builds a risk matrix and renders the result as a report.

pub mod assessment;
pub mod config;
pub mod reporter;
pub mod submission;

pub use assessment::AssessmentEngine;
pub use submission::{Responses, Submission, SubmissionRequest};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use thiserror::Error;

/// Lowest accepted answer on the maturity scale
pub const RATING_MIN: f64 = 0.0;
/// Highest accepted answer on the maturity scale
pub const RATING_MAX: f64 = 4.0;

/// Errors raised while turning raw input into a [`Submission`].
///
/// Everything after validation is infallible.
#[derive(Debug, Error)]
pub enum AssessmentError {
    /// Body was not JSON of the expected shape
    #[error("malformed submission body: {0}")]
    MalformedBody(#[from] serde_json::Error),

    /// Body parsed but one or more fields are missing or out of range
    #[error("invalid submission: {}", .problems.join("; "))]
    InvalidSubmission { problems: Vec<String> },
}

impl AssessmentError {
    /// Individual problems, suitable for listing to the caller
    pub fn problems(&self) -> Vec<String> {
        match self {
            AssessmentError::MalformedBody(e) => vec![e.to_string()],
            AssessmentError::InvalidSubmission { problems } => problems.clone(),
        }
    }
}

/// SOC 2 Trust Services Criteria category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Security,
    Availability,
    ProcessingIntegrity,
    Confidentiality,
    Privacy,
}

impl Category {
    /// All categories in report order
    pub const ALL: [Category; 5] = [
        Category::Security,
        Category::Availability,
        Category::ProcessingIntegrity,
        Category::Confidentiality,
        Category::Privacy,
    ];

    /// Question numbers (1-indexed) averaged into this category
    pub fn questions(self) -> RangeInclusive<usize> {
        match self {
            Category::Security => 1..=5,
            Category::Availability => 6..=8,
            Category::ProcessingIntegrity => 9..=11,
            Category::Confidentiality => 12..=14,
            Category::Privacy => 15..=18,
        }
    }

    /// Human-readable name used in reports
    pub fn name(self) -> &'static str {
        match self {
            Category::Security => "Security",
            Category::Availability => "Availability",
            Category::ProcessingIntegrity => "Processing Integrity",
            Category::Confidentiality => "Confidentiality",
            Category::Privacy => "Privacy",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Mean maturity per category (each 0.0-4.0, unrounded)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScores {
    pub security: f64,
    pub availability: f64,
    pub processing_integrity: f64,
    pub confidentiality: f64,
    pub privacy: f64,
}

impl CategoryScores {
    /// Score for a single category
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Security => self.security,
            Category::Availability => self.availability,
            Category::ProcessingIntegrity => self.processing_integrity,
            Category::Confidentiality => self.confidentiality,
            Category::Privacy => self.privacy,
        }
    }

    /// Scores in fixed report order: Security, Availability, Processing
    /// Integrity, Confidentiality, Privacy
    pub fn to_array(&self) -> [f64; 5] {
        Category::ALL.map(|c| self.get(c))
    }

    /// (category, score) pairs in report order
    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        Category::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    /// True when any category scores strictly below `threshold`
    pub fn any_below(&self, threshold: f64) -> bool {
        self.iter().any(|(_, score)| score < threshold)
    }
}

/// Overall maturity band derived from the mean of all category scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Maturity {
    Strong,
    Moderate,
    NeedsImprovement,
}

impl Maturity {
    pub fn from_score(mean: f64) -> Self {
        if mean >= 3.0 {
            Maturity::Strong
        } else if mean >= 2.0 {
            Maturity::Moderate
        } else {
            Maturity::NeedsImprovement
        }
    }
}

impl std::fmt::Display for Maturity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Maturity::Strong => write!(f, "strong"),
            Maturity::Moderate => write!(f, "moderate"),
            Maturity::NeedsImprovement => write!(f, "needs improvement"),
        }
    }
}

/// Kind of qualitative finding for a category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingKind {
    Strength,
    Gap,
}

/// A strength or gap derived from one category score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    /// Category the finding was derived from
    pub category: Category,
    pub kind: FindingKind,
    /// Fixed per-category wording
    pub message: String,
}

/// Report-wide likelihood shared by every risk row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Likelihood {
    High,
    Medium,
}

impl std::fmt::Display for Likelihood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Likelihood::High => write!(f, "High"),
            Likelihood::Medium => write!(f, "Medium"),
        }
    }
}

/// Report-wide impact shared by every risk row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Impact {
    High,
    Moderate,
}

impl std::fmt::Display for Impact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Impact::High => write!(f, "High"),
            Impact::Moderate => write!(f, "Moderate"),
        }
    }
}

/// One row of the risk matrix, derived from a gap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskRow {
    pub category: Category,
    /// The gap message this row was built from
    pub risk: String,
    pub likelihood: Likelihood,
    pub impact: Impact,
    pub mitigation: String,
}

/// Risk table: one row per gap, in gap order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskMatrix {
    pub rows: Vec<RiskRow>,
}

impl RiskMatrix {
    /// Column headers in display order
    pub const HEADERS: [&'static str; 4] = ["Risk", "Likelihood", "Impact", "Mitigation"];

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Who the report was generated for, and when
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInformation {
    pub business_name: String,
    pub email: String,
    pub submitted_at: DateTime<Local>,
    pub generated_at: DateTime<Local>,
}

/// The complete assessment result.
///
/// Every section is kept as typed data; reporters in [`reporter`] decide how
/// it is presented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub client: ClientInformation,
    /// Mean per category, unrounded
    pub category_scores: CategoryScores,
    /// Mean of the five category scores
    pub overall_score: f64,
    pub maturity: Maturity,
    pub strengths: Vec<Finding>,
    pub gaps: Vec<Finding>,
    pub recommendations: Vec<String>,
    pub risk_matrix: RiskMatrix,
    pub conclusion: Conclusion,
}

/// Summary conclusion: the synthesis paragraph plus closing guidance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conclusion {
    pub summary: String,
    pub next_steps: String,
}

/// Format a score to one decimal, rounding exact ties up (`2.25` shows as `2.3`).
///
/// `{:.1}` alone rounds ties to even. A tie at one decimal is only exactly
/// representable at quarter values, so those are rounded explicitly and every
/// other value keeps the correctly rounded `{:.1}` output.
pub fn format_score(score: f64) -> String {
    let quarters = score * 4.0;
    if quarters.fract() == 0.0 && quarters.rem_euclid(2.0) == 1.0 {
        return format!("{:.1}", (score * 10.0 + 0.5).floor() / 10.0);
    }
    format!("{:.1}", score)
}

/// Format a timestamp the way the report shows it (e.g. `3/7/2026, 4:05:09 PM`)
pub fn format_timestamp(ts: &DateTime<Local>) -> String {
    ts.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}
