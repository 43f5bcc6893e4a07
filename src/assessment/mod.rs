//! Assessment module - scoring, classification and report assembly

pub mod engine;
pub mod findings;
pub mod narrative;
pub mod risk;
pub mod scoring;

pub use engine::{AggregateStats, AssessmentEngine};
pub use findings::{FindingClassifier, Findings};
pub use risk::RiskMatrixBuilder;
pub use scoring::ScoreCalculator;
