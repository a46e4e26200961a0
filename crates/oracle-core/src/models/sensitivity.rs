//! Sensitivity analysis report.

use serde::{Deserialize, Serialize};

/// Effect of one uncertain factor on the decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorSensitivity {
    pub factor: String,
    pub declared_level: f64,
    /// |Δ suitability of primary| normalized to [0, 1] across factors.
    pub impact_magnitude: f64,
    /// Smallest shift at which the runner-up outranks the primary.
    pub critical_threshold: Option<f64>,
    /// True when the threshold lies within the declared level.
    pub within_declared_range: bool,
}

/// Which factors move the ranking, and whether the decision is robust.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityReport {
    pub primary: String,
    pub compared_with: Option<String>,
    /// Sorted by impact, largest first.
    pub factors: Vec<FactorSensitivity>,
    pub robust_decision: bool,
    /// Universes per re-simulation after capping.
    pub universes_per_run: usize,
}
