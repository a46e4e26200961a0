//! # oracle-scoring
//!
//! Turns simulated outcomes into a decision: risk-benefit scores, a ranked
//! recommendation, and a sensitivity analysis of that ranking.

pub mod ranking;
pub mod scorer;
pub mod sensitivity;

pub use ranking::{build_ranked, outranks, rank, rank_order};
pub use scorer::{benefit_score, confidence, risk_score, score, BenefitScorer, FactorScorer, RiskScorer};
pub use sensitivity::SensitivityAnalyzer;
