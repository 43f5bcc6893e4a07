//! Strength and gap classification

use crate::{Category, CategoryScores, Finding, FindingKind};

/// Minimum category score (inclusive) reported as a strength
pub const STRENGTH_THRESHOLD: f64 = 3.0;
/// Category scores strictly below this are reported as gaps
pub const GAP_THRESHOLD: f64 = 2.0;

/// Strengths and gaps, each in category order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Findings {
    pub strengths: Vec<Finding>,
    pub gaps: Vec<Finding>,
}

/// Classifies each category score into strength, gap or neither
pub struct FindingClassifier;

impl FindingClassifier {
    /// Fixed wording for a category strength
    pub fn strength_message(category: Category) -> &'static str {
        match category {
            Category::Security => "Strong governance and access controls in Security.",
            Category::Availability => "Robust disaster recovery and availability monitoring.",
            Category::ProcessingIntegrity => "Effective data processing and integrity checks.",
            Category::Confidentiality => "Strong confidentiality protections for sensitive data.",
            Category::Privacy => "Mature privacy policies and data subject rights processes.",
        }
    }

    /// Fixed wording for a category gap
    pub fn gap_message(category: Category) -> &'static str {
        match category {
            Category::Security => "Weak security controls, including governance and monitoring.",
            Category::Availability => {
                "Inadequate disaster recovery and system availability processes."
            }
            Category::ProcessingIntegrity => "Lack of robust data input/output validation.",
            Category::Confidentiality => {
                "Insufficient encryption or access controls for confidential data."
            }
            Category::Privacy => "Non-compliant privacy practices or lack of consent mechanisms.",
        }
    }

    /// Classify every category. The strength and gap checks are independent.
    pub fn classify(scores: &CategoryScores) -> Findings {
        let mut findings = Findings::default();

        for (category, score) in scores.iter() {
            if score >= STRENGTH_THRESHOLD {
                findings.strengths.push(Finding {
                    category,
                    kind: FindingKind::Strength,
                    message: Self::strength_message(category).to_string(),
                });
            }
            if score < GAP_THRESHOLD {
                findings.gaps.push(Finding {
                    category,
                    kind: FindingKind::Gap,
                    message: Self::gap_message(category).to_string(),
                });
            }
        }

        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(values: [f64; 5]) -> CategoryScores {
        let [security, availability, processing_integrity, confidentiality, privacy] = values;
        CategoryScores {
            security,
            availability,
            processing_integrity,
            confidentiality,
            privacy,
        }
    }

    fn categories(findings: &[Finding]) -> Vec<Category> {
        findings.iter().map(|f| f.category).collect()
    }

    #[test]
    fn test_all_strong() {
        let findings = FindingClassifier::classify(&scores([4.0; 5]));
        assert_eq!(categories(&findings.strengths), Category::ALL.to_vec());
        assert!(findings.gaps.is_empty());
    }

    #[test]
    fn test_all_weak() {
        let findings = FindingClassifier::classify(&scores([0.0; 5]));
        assert!(findings.strengths.is_empty());
        assert_eq!(categories(&findings.gaps), Category::ALL.to_vec());
        assert!(findings.gaps.iter().all(|g| g.kind == FindingKind::Gap));
    }

    #[test]
    fn test_exactly_three_is_strength() {
        let findings = FindingClassifier::classify(&scores([3.0, 2.5, 2.5, 2.5, 2.5]));
        assert_eq!(categories(&findings.strengths), vec![Category::Security]);
        assert!(findings.gaps.is_empty());
    }

    #[test]
    fn test_exactly_two_is_neither() {
        let findings = FindingClassifier::classify(&scores([2.0; 5]));
        assert!(findings.strengths.is_empty());
        assert!(findings.gaps.is_empty());
    }

    #[test]
    fn test_just_below_thresholds() {
        let findings = FindingClassifier::classify(&scores([2.999, 1.999, 2.0, 2.0, 2.0]));
        assert!(findings.strengths.is_empty());
        assert_eq!(categories(&findings.gaps), vec![Category::Availability]);
    }

    #[test]
    fn test_order_follows_categories() {
        let findings = FindingClassifier::classify(&scores([1.0, 4.0, 0.0, 3.5, 1.5]));
        assert_eq!(
            categories(&findings.strengths),
            vec![Category::Availability, Category::Confidentiality]
        );
        assert_eq!(
            categories(&findings.gaps),
            vec![
                Category::Security,
                Category::ProcessingIntegrity,
                Category::Privacy
            ]
        );
    }

    #[test]
    fn test_messages_use_fixed_wording() {
        let findings = FindingClassifier::classify(&scores([4.0, 1.0, 2.5, 2.5, 2.5]));
        assert_eq!(
            findings.strengths[0].message,
            "Strong governance and access controls in Security."
        );
        assert_eq!(
            findings.gaps[0].message,
            "Inadequate disaster recovery and system availability processes."
        );
    }
}
