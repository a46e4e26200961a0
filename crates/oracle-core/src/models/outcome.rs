//! Aggregated outcome statistics per candidate.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Distribution summary of one outcome field across universes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldSummary {
    pub mean: f64,
    pub std_dev: f64,
    /// 10th percentile.
    pub p10: f64,
    /// 50th percentile (median).
    pub p50: f64,
    /// 90th percentile.
    pub p90: f64,
}

impl FieldSummary {
    /// Validate the ordering invariant: p10 <= p50 <= p90.
    pub fn is_ordered(&self) -> bool {
        self.p10 <= self.p50 && self.p50 <= self.p90
    }
}

/// Monte Carlo convergence diagnostic for mean overall survival.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceDiagnostic {
    pub standard_error: f64,
    pub relative_standard_error: f64,
    pub converged: bool,
}

/// Summary statistics of all universes simulated for one candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateOutcome {
    pub candidate: String,
    pub universe_count: usize,
    pub overall_survival: FieldSummary,
    pub progression_free_survival: FieldSummary,
    pub quality_adjusted_life_years: FieldSummary,
    pub treatment_burden: FieldSummary,
    pub patient_satisfaction: FieldSummary,
    /// Fraction of universes meeting the acceptable-outcome threshold.
    pub optimal_path_probability: f64,
    /// 1 − clamp(CV of overall survival).
    pub robustness_score: f64,
    /// Mean overall survival of the worst decile of universes.
    pub tail_risk: f64,
    /// Side effect → fraction of universes in which it occurred.
    pub side_effect_incidence: BTreeMap<String, f64>,
    pub convergence: ConvergenceDiagnostic,
}
