//! Uncertainty model supplied per simulation request.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::SimulationConfig;
use crate::constants::{MAX_HORIZON_MONTHS, MAX_UNIVERSE_COUNT};
use crate::errors::SimulationError;

/// Threshold a universe's final outcome must meet to count as acceptable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AcceptableOutcome {
    pub min_overall_survival_months: f64,
    pub min_quality_adjusted_life_years: f64,
}

impl AcceptableOutcome {
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            min_overall_survival_months: config.min_overall_survival_months,
            min_quality_adjusted_life_years: config.min_quality_adjusted_life_years,
        }
    }

    /// True when `outcome` meets both thresholds.
    pub fn accepts(&self, outcome: &super::FinalOutcome) -> bool {
        outcome.overall_survival >= self.min_overall_survival_months
            && outcome.quality_adjusted_life_years >= self.min_quality_adjusted_life_years
    }
}

impl Default for AcceptableOutcome {
    fn default() -> Self {
        Self::from_config(&SimulationConfig::default())
    }
}

/// Named uncertain factors plus the size and horizon of the universe set.
///
/// `BTreeMap`s keep factor iteration order stable, which the sampler relies
/// on for reproducible draws.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UncertaintyModel {
    /// Factor name → uncertainty level in [0, 1].
    pub uncertainty_levels: BTreeMap<String, f64>,
    pub universe_count: usize,
    pub horizon_months: i64,
    /// Explicit seed; `None` draws a fresh one per run.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub acceptable_outcome: AcceptableOutcome,
    /// Factor name → adverse shift in [0, 1]. Empty for ordinary runs.
    #[serde(default)]
    pub factor_shifts: BTreeMap<String, f64>,
}

impl UncertaintyModel {
    /// Model with no uncertain factors.
    pub fn new(universe_count: usize, horizon_months: i64) -> Self {
        Self {
            uncertainty_levels: BTreeMap::new(),
            universe_count,
            horizon_months,
            seed: None,
            acceptable_outcome: AcceptableOutcome::default(),
            factor_shifts: BTreeMap::new(),
        }
    }

    /// Model sized from config defaults.
    pub fn from_config(config: &SimulationConfig) -> Self {
        let mut model = Self::new(config.default_universe_count, config.default_horizon_months);
        model.seed = config.seed;
        model.acceptable_outcome = AcceptableOutcome::from_config(config);
        model
    }

    /// Builder: declare an uncertain factor.
    pub fn with_factor(mut self, name: impl Into<String>, level: f64) -> Self {
        self.uncertainty_levels.insert(name.into(), level);
        self
    }

    /// Builder: set an explicit seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builder: set the acceptable-outcome threshold.
    pub fn with_acceptable_outcome(mut self, acceptable: AcceptableOutcome) -> Self {
        self.acceptable_outcome = acceptable;
        self
    }

    /// Uncertainty level of `factor`, 0 when undeclared.
    pub fn level(&self, factor: &str) -> f64 {
        self.uncertainty_levels.get(factor).copied().unwrap_or(0.0)
    }

    /// Adverse shift of `factor`, 0 when unshifted.
    pub fn shift(&self, factor: &str) -> f64 {
        self.factor_shifts.get(factor).copied().unwrap_or(0.0)
    }

    /// Copy with `factor` shifted by `shift` and every other shift kept.
    pub fn with_shift(&self, factor: &str, shift: f64) -> Self {
        let mut model = self.clone();
        model.factor_shifts.insert(factor.to_string(), shift);
        model
    }

    /// Copy with the universe count capped at `max`.
    pub fn capped(&self, max: usize) -> Self {
        let mut model = self.clone();
        model.universe_count = model.universe_count.min(max.max(1));
        model
    }

    /// Validate eagerly; no sampling happens on a malformed model.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if !(1..=MAX_HORIZON_MONTHS).contains(&self.horizon_months) {
            return Err(SimulationError::InvalidHorizon {
                horizon_months: self.horizon_months,
            });
        }
        if !(1..=MAX_UNIVERSE_COUNT).contains(&self.universe_count) {
            return Err(invalid_model(&format!(
                "universe_count must be between 1 and {MAX_UNIVERSE_COUNT}, got {}",
                self.universe_count
            )));
        }
        for (name, level) in &self.uncertainty_levels {
            if !level.is_finite() || !(0.0..=1.0).contains(level) {
                return Err(invalid_model(&format!(
                    "uncertainty level for {name} must be in [0, 1], got {level}"
                )));
            }
        }
        for (name, shift) in &self.factor_shifts {
            if !shift.is_finite() || !(0.0..=1.0).contains(shift) {
                return Err(invalid_model(&format!(
                    "shift for {name} must be in [0, 1], got {shift}"
                )));
            }
        }
        let acceptable = &self.acceptable_outcome;
        if !acceptable.min_overall_survival_months.is_finite()
            || !acceptable.min_quality_adjusted_life_years.is_finite()
        {
            return Err(invalid_model("acceptable outcome thresholds must be finite"));
        }
        Ok(())
    }
}

fn invalid_model(reason: &str) -> SimulationError {
    SimulationError::InvalidModel {
        reason: reason.to_string(),
    }
}
