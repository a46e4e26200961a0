//! Sampled universes and their trajectories.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Disease status at one time step, ordered worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiseaseStatus {
    Progressive,
    Stable,
    Responding,
}

impl DiseaseStatus {
    /// One step better, saturating at `Responding`.
    pub fn improved(self) -> Self {
        match self {
            Self::Progressive => Self::Stable,
            Self::Stable | Self::Responding => Self::Responding,
        }
    }

    /// One step worse, saturating at `Progressive`.
    pub fn worsened(self) -> Self {
        match self {
            Self::Responding => Self::Stable,
            Self::Stable | Self::Progressive => Self::Progressive,
        }
    }
}

/// Initial conditions drawn for one universe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitialConditions {
    pub baseline_quality_of_life: f64,
    pub baseline_response: f64,
    /// Multiplier on the improvement probability.
    pub response_modifier: f64,
    /// Multiplier on every side-effect probability.
    pub toxicity_modifier: f64,
    /// Multiplier on the progression hazard.
    pub progression_modifier: f64,
    /// Quality-of-life recovery capacity in [0, 1].
    pub resilience: f64,
    /// Per-factor deviations for factors named after candidate risks/benefits.
    pub factor_deviations: BTreeMap<String, f64>,
}

impl InitialConditions {
    /// Deviation for a candidate-named factor, 0 when not sampled.
    pub fn deviation(&self, factor: &str) -> f64 {
        self.factor_deviations.get(factor).copied().unwrap_or(0.0)
    }
}

/// The sampler's output for one universe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniverseSeed {
    pub index: usize,
    /// Seed of this universe's private trajectory stream.
    pub rng_seed: u64,
    pub initial: InitialConditions,
}

/// State at the end of one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeStep {
    pub t: u32,
    pub disease_status: DiseaseStatus,
    pub quality_of_life: f64,
    pub treatment_response: f64,
    pub side_effects: BTreeSet<String>,
    pub interventions: BTreeSet<String>,
}

/// Outcome computed at the horizon from the full step sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinalOutcome {
    /// Months.
    pub overall_survival: f64,
    /// Months until the first progressive step.
    pub progression_free_survival: f64,
    pub quality_adjusted_life_years: f64,
    /// 0–1.
    pub treatment_burden: f64,
    /// 0–100.
    pub patient_satisfaction: f64,
}

/// One evaluated trajectory for one candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Universe {
    pub index: usize,
    pub candidate: String,
    pub steps: Vec<TimeStep>,
    pub final_outcome: FinalOutcome,
}

impl Universe {
    /// Every side effect that occurred at any step.
    pub fn side_effects(&self) -> BTreeSet<&str> {
        self.steps
            .iter()
            .flat_map(|s| s.side_effects.iter().map(String::as_str))
            .collect()
    }
}
