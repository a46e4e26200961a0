//! Risk-benefit scorers.
//!
//! Each factor scorer produces a normalized [0.0, 1.0] score. Suitability
//! combines them with the simulated robustness of the candidate.

use oracle_core::constants::CONFIDENCE_WEIGHTS;
use oracle_core::models::{AggregateOutcome, CandidateTreatment, RiskBenefitScore};

/// Scores one side of a candidate's declared factors.
pub trait FactorScorer: Send + Sync {
    /// Score a candidate. Returns [0.0, 1.0].
    fn score(&self, candidate: &CandidateTreatment) -> f64;

    /// Human-readable name of this scorer.
    fn name(&self) -> &'static str;
}

/// Benefit scorer: Timeframe-weighted mean of `magnitude × certainty`.
///
/// Immediate benefits count fully, long-term ones least.
pub struct BenefitScorer;

impl FactorScorer for BenefitScorer {
    fn score(&self, candidate: &CandidateTreatment) -> f64 {
        let (weighted, total) = candidate.benefits.iter().fold((0.0, 0.0), |(acc, total), b| {
            let w = b.timeframe.weight();
            (acc + b.magnitude * b.certainty * w, total + w)
        });
        if total <= 0.0 {
            return 0.0;
        }
        (weighted / total).clamp(0.0, 1.0)
    }

    fn name(&self) -> &'static str { "benefit" }
}

/// Risk scorer: Mean of `severity × probability`.
pub struct RiskScorer;

impl FactorScorer for RiskScorer {
    fn score(&self, candidate: &CandidateTreatment) -> f64 {
        if candidate.risks.is_empty() {
            return 0.0;
        }
        let sum: f64 = candidate.risks.iter().map(|r| r.severity * r.probability).sum();
        (sum / candidate.risks.len() as f64).clamp(0.0, 1.0)
    }

    fn name(&self) -> &'static str { "risk" }
}

pub fn benefit_score(candidate: &CandidateTreatment) -> f64 {
    BenefitScorer.score(candidate)
}

pub fn risk_score(candidate: &CandidateTreatment) -> f64 {
    RiskScorer.score(candidate)
}

/// Score a candidate against its simulated outcome.
///
/// `suitability = benefit × (1 − risk) × robustness`. Pure: same inputs,
/// same score.
pub fn score(candidate: &CandidateTreatment, aggregate: &AggregateOutcome) -> RiskBenefitScore {
    let benefit = benefit_score(candidate);
    let risk = risk_score(candidate);
    let robustness = aggregate.robustness_score.clamp(0.0, 1.0);
    RiskBenefitScore {
        benefit_score: benefit,
        risk_score: risk,
        suitability_score: benefit * (1.0 - risk) * robustness,
    }
}

/// Confidence in a recommendation, 0–100.
pub fn confidence(aggregate: &AggregateOutcome, evidence_strength: f64) -> f64 {
    let (w_opp, w_robust, w_evidence) = CONFIDENCE_WEIGHTS;
    let raw = w_opp * aggregate.optimal_path_probability.clamp(0.0, 1.0)
        + w_robust * aggregate.robustness_score.clamp(0.0, 1.0)
        + w_evidence * evidence_strength.clamp(0.0, 1.0);
    (100.0 * raw).clamp(0.0, 100.0)
}
