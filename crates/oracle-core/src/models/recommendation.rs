//! Ranked recommendation returned by a simulation run.

use serde::{Deserialize, Serialize};

use super::{AggregateOutcome, CandidateTreatment};

/// Risk, benefit and suitability scores for one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskBenefitScore {
    pub benefit_score: f64,
    pub risk_score: f64,
    pub suitability_score: f64,
}

/// A candidate together with its scores and simulated outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedTreatment {
    pub candidate: CandidateTreatment,
    pub scores: RiskBenefitScore,
    /// 0–100.
    pub confidence: f64,
    pub evidence_strength: f64,
    pub aggregate: AggregateOutcome,
}

impl RankedTreatment {
    pub fn name(&self) -> &str {
        &self.candidate.name
    }

    pub fn suitability_score(&self) -> f64 {
        self.scores.suitability_score
    }
}

/// Run metadata shown next to a recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub query_id: String,
    /// Seed actually used; replaying with it reproduces the run.
    pub seed: u64,
    pub universe_count: usize,
    pub horizon_months: i64,
    pub candidates_evaluated: usize,
    pub elapsed_ms: u64,
    /// True when every candidate's run converged.
    pub converged: bool,
}

/// Primary treatment plus ranked alternatives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub primary: RankedTreatment,
    /// Sorted best first.
    pub alternatives: Vec<RankedTreatment>,
    pub report: SimulationReport,
}

impl Recommendation {
    /// The best alternative, if any.
    pub fn runner_up(&self) -> Option<&RankedTreatment> {
        self.alternatives.first()
    }
}
