use serde::{Deserialize, Serialize};

use super::defaults;

/// Sensitivity analyzer configuration.
///
/// Every factor costs a full re-simulation per bisection step, so the
/// universe count is capped here at the expense of statistical precision.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SensitivityConfig {
    /// Maximum universes per re-simulation.
    pub max_universes: usize,
    /// Bisection steps when searching a critical threshold.
    pub bisection_iterations: u32,
    /// `factors × universes` above which a cost warning is logged.
    pub work_warning_threshold: usize,
}

impl Default for SensitivityConfig {
    fn default() -> Self {
        Self {
            max_universes: defaults::DEFAULT_SENSITIVITY_MAX_UNIVERSES,
            bisection_iterations: defaults::DEFAULT_BISECTION_ITERATIONS,
            work_warning_threshold: defaults::DEFAULT_WORK_WARNING_THRESHOLD,
        }
    }
}
