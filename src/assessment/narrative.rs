//! Recommendation and conclusion wording

use crate::{Conclusion, Finding};

/// Recommendations appended to every report
pub const STANDARD_RECOMMENDATIONS: [&str; 3] = [
    "Conduct a gap analysis and mock audit to prepare for SOC 2 Type I/II.",
    "Enhance employee training on security and privacy practices.",
    "Regularly review vendor compliance and update risk assessments.",
];

/// Used instead of per-gap recommendations when there are no gaps
pub const MAINTAIN_RECOMMENDATION: &str =
    "Maintain current controls and pursue continuous improvement.";

pub const NEXT_STEPS: &str = "Engage a SOC 2 auditor, implement recommended controls, and schedule a follow-up assessment within 3-6 months.";

fn join_messages(findings: &[Finding]) -> String {
    findings
        .iter()
        .map(|f| f.message.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Strategic recommendations: one per gap (or the maintain line), followed
/// by the standard recommendations.
pub fn recommendations(gaps: &[Finding]) -> Vec<String> {
    let mut recs: Vec<String> = if gaps.is_empty() {
        vec![MAINTAIN_RECOMMENDATION.to_string()]
    } else {
        gaps.iter()
            .map(|gap| {
                format!(
                    "Address {} by implementing specific controls (e.g., MFA, encryption, DRP testing).",
                    gap.message.to_lowercase()
                )
            })
            .collect()
    };
    recs.extend(STANDARD_RECOMMENDATIONS.iter().map(|r| r.to_string()));
    recs
}

/// Summary conclusion referencing the strengths and gaps
pub fn conclusion(strengths: &[Finding], gaps: &[Finding]) -> Conclusion {
    let posture = if strengths.is_empty() {
        "areas needing significant improvement".to_string()
    } else {
        format!("notable strengths in {}", join_messages(strengths))
    };
    let focus = if gaps.is_empty() {
        "none".to_string()
    } else {
        join_messages(gaps)
    };

    Conclusion {
        summary: format!(
            "Your SOC 2 compliance posture reflects {}. Identified gaps pose risks to data security and regulatory compliance, potentially impacting customer trust and business operations. Prioritizing remediation in low-scoring areas (e.g., {}) will strengthen your posture.",
            posture, focus
        ),
        next_steps: NEXT_STEPS.to_string(),
    }
}
