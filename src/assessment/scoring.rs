//! Score calculation for questionnaire responses

use crate::{Category, CategoryScores, Maturity, Responses};

/// Calculator for category maturity scores
pub struct ScoreCalculator;

impl ScoreCalculator {
    /// Arithmetic mean of the answers belonging to one category
    pub fn category_score(responses: &Responses, category: Category) -> f64 {
        let answers = responses.as_array();
        let range = category.questions();
        let count = range.clone().count() as f64;
        let sum: f64 = range.map(|q| answers[q - 1]).sum();
        sum / count
    }

    /// Calculate all five category scores in report order
    pub fn calculate(responses: &Responses) -> CategoryScores {
        CategoryScores {
            security: Self::category_score(responses, Category::Security),
            availability: Self::category_score(responses, Category::Availability),
            processing_integrity: Self::category_score(responses, Category::ProcessingIntegrity),
            confidentiality: Self::category_score(responses, Category::Confidentiality),
            privacy: Self::category_score(responses, Category::Privacy),
        }
    }

    /// Mean of the five category scores (each category weighs the same,
    /// regardless of how many questions it has)
    pub fn overall(scores: &CategoryScores) -> f64 {
        let values = scores.to_array();
        values.iter().sum::<f64>() / values.len() as f64
    }

    /// Overall maturity band for a set of category scores
    pub fn maturity(scores: &CategoryScores) -> Maturity {
        Maturity::from_score(Self::overall(scores))
    }

    /// Get a description of the maturity band
    pub fn maturity_description(maturity: Maturity) -> &'static str {
        match maturity {
            Maturity::Strong => "Controls are established and consistently operated",
            Maturity::Moderate => "Core controls exist but coverage is uneven",
            Maturity::NeedsImprovement => "Significant control gaps before an audit",
        }
    }
}
