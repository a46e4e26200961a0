//! Top-level oracle configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ConsensusConfig, ObservabilityConfig, SensitivityConfig, SimulationConfig};
use crate::constants::{MAX_HORIZON_MONTHS, MAX_UNIVERSE_COUNT};
use crate::errors::ConfigError;

/// Project-level config file looked up in the working directory.
pub const CONFIG_FILENAME: &str = "oracle.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`ORACLE_*`)
/// 2. Config file (explicit path, or `oracle.toml` in the working directory)
/// 3. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OracleConfig {
    pub simulation: SimulationConfig,
    pub sensitivity: SensitivityConfig,
    pub consensus: ConsensusConfig,
    pub observability: ObservabilityConfig,
}

impl OracleConfig {
    /// Load configuration with layered resolution.
    ///
    /// An explicit `path` must exist; the implicit `oracle.toml` is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => {
                let implicit = Path::new(CONFIG_FILENAME);
                if implicit.exists() {
                    Self::from_file(implicit)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        let config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        debug!(path = %path.display(), "loaded oracle config");
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sim = &self.simulation;
        if !(1..=MAX_UNIVERSE_COUNT).contains(&sim.default_universe_count) {
            return Err(invalid(
                "simulation.default_universe_count",
                &format!("must be between 1 and {MAX_UNIVERSE_COUNT}"),
            ));
        }
        if !(1..=MAX_HORIZON_MONTHS).contains(&sim.default_horizon_months) {
            return Err(invalid(
                "simulation.default_horizon_months",
                &format!("must be between 1 and {MAX_HORIZON_MONTHS}"),
            ));
        }
        if !sim.min_overall_survival_months.is_finite() || sim.min_overall_survival_months < 0.0 {
            return Err(invalid(
                "simulation.min_overall_survival_months",
                "must be a non-negative number",
            ));
        }
        if !sim.min_quality_adjusted_life_years.is_finite()
            || sim.min_quality_adjusted_life_years < 0.0
        {
            return Err(invalid(
                "simulation.min_quality_adjusted_life_years",
                "must be a non-negative number",
            ));
        }
        if !(sim.convergence_rse > 0.0 && sim.convergence_rse <= 1.0) {
            return Err(invalid("simulation.convergence_rse", "must be in (0.0, 1.0]"));
        }
        if self.sensitivity.max_universes == 0 {
            return Err(invalid("sensitivity.max_universes", "must be greater than 0"));
        }
        if self.sensitivity.bisection_iterations == 0 || self.sensitivity.bisection_iterations > 64 {
            return Err(invalid("sensitivity.bisection_iterations", "must be between 1 and 64"));
        }
        Ok(())
    }

    /// Apply environment variable overrides.
    /// Pattern: `ORACLE_SIM_THREADS`, `ORACLE_SIM_SEED`, etc. Unparseable values are ignored.
    fn apply_env_overrides(&mut self) {
        if let Some(v) = env_parse::<usize>("ORACLE_SIM_THREADS") {
            self.simulation.worker_threads = v;
        }
        if let Some(v) = env_parse::<u64>("ORACLE_SIM_SEED") {
            self.simulation.seed = Some(v);
        }
        if let Some(v) = env_parse::<usize>("ORACLE_SIM_UNIVERSES") {
            self.simulation.default_universe_count = v;
        }
        if let Some(v) = env_parse::<u64>("ORACLE_JOB_DEADLINE_MS") {
            self.simulation.job_deadline_ms = v;
        }
        if let Some(v) = env_parse::<usize>("ORACLE_SENSITIVITY_MAX_UNIVERSES") {
            self.sensitivity.max_universes = v;
        }
        if let Some(v) = env_parse::<bool>("ORACLE_JSON_LOGS") {
            self.observability.json_logs = v;
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.to_string(),
        message: message.to_string(),
    }
}
