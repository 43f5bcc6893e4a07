//! Risk matrix built from identified gaps

use super::findings::GAP_THRESHOLD;
use crate::{CategoryScores, Finding, Impact, Likelihood, RiskMatrix, RiskRow};

/// Mitigation text shared by every risk row
pub const DEFAULT_MITIGATION: &str = "Implement controls and training";

/// Builds the risk matrix for a report
pub struct RiskMatrixBuilder;

impl RiskMatrixBuilder {
    /// Likelihood and impact are decided once per report: both are High when
    /// any category is a gap, otherwise Medium / Moderate.
    pub fn rating(scores: &CategoryScores) -> (Likelihood, Impact) {
        if scores.any_below(GAP_THRESHOLD) {
            (Likelihood::High, Impact::High)
        } else {
            (Likelihood::Medium, Impact::Moderate)
        }
    }

    /// One row per gap, in gap order
    pub fn build(gaps: &[Finding], scores: &CategoryScores) -> RiskMatrix {
        let (likelihood, impact) = Self::rating(scores);
        let rows = gaps
            .iter()
            .map(|gap| RiskRow {
                category: gap.category,
                risk: gap.message.clone(),
                likelihood,
                impact,
                mitigation: DEFAULT_MITIGATION.to_string(),
            })
            .collect();
        RiskMatrix { rows }
    }
}
