use serde::{Deserialize, Serialize};

use super::defaults;

/// Sampler / evaluator / aggregator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Rayon worker threads for universe fan-out. 0 = one per core.
    pub worker_threads: usize,
    /// Seed used when a model carries none. `None` = fresh seed per run.
    pub seed: Option<u64>,
    /// Universe count for models built from config.
    pub default_universe_count: usize,
    /// Horizon for models built from config.
    pub default_horizon_months: i64,
    /// Minimum overall survival (months) for an acceptable outcome.
    pub min_overall_survival_months: f64,
    /// Minimum quality-adjusted life years for an acceptable outcome.
    pub min_quality_adjusted_life_years: f64,
    /// Relative standard error of mean survival below which a run counts as converged.
    pub convergence_rse: f64,
    /// Below this many universes the evaluator runs sequentially.
    pub parallel_threshold: usize,
    /// Default deadline for async jobs in ms. 0 = none.
    pub job_deadline_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            worker_threads: defaults::DEFAULT_WORKER_THREADS,
            seed: None,
            default_universe_count: defaults::DEFAULT_UNIVERSE_COUNT,
            default_horizon_months: defaults::DEFAULT_HORIZON_MONTHS,
            min_overall_survival_months: defaults::DEFAULT_MIN_OVERALL_SURVIVAL_MONTHS,
            min_quality_adjusted_life_years: defaults::DEFAULT_MIN_QALY,
            convergence_rse: defaults::DEFAULT_CONVERGENCE_RSE,
            parallel_threshold: defaults::DEFAULT_PARALLEL_THRESHOLD,
            job_deadline_ms: defaults::DEFAULT_JOB_DEADLINE_MS,
        }
    }
}
