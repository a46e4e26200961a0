//! Sensitivity analyzer: Which uncertain factors can flip the decision.
//!
//! Every perturbed run reuses the same seed, so primary and runner-up are
//! compared on common random numbers and the only thing that changes
//! between runs is the shift of the factor under study.

use std::cmp::Ordering;

use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};

use oracle_core::config::{SensitivityConfig, SimulationConfig};
use oracle_core::errors::SimulationError;
use oracle_core::models::{
    CandidateTreatment, ClinicalQuery, FactorSensitivity, RankedTreatment, SensitivityReport,
    UncertaintyModel,
};
use oracle_simulation::run_candidates;

use crate::ranking::{build_ranked, outranks};

/// Primary and runner-up scored under one model.
struct Matchup {
    primary: RankedTreatment,
    runner_up: Option<RankedTreatment>,
}

impl Matchup {
    fn flipped(&self) -> bool {
        self.runner_up
            .as_ref()
            .is_some_and(|r| outranks(r, &self.primary))
    }
}

/// Re-runs the pipeline with one factor shifted at a time.
#[derive(Debug, Clone, Default)]
pub struct SensitivityAnalyzer {
    simulation: SimulationConfig,
    sensitivity: SensitivityConfig,
}

impl SensitivityAnalyzer {
    pub fn new(simulation: SimulationConfig, sensitivity: SensitivityConfig) -> Self {
        Self {
            simulation,
            sensitivity,
        }
    }

    /// Analyze every factor in `model.uncertainty_levels`.
    ///
    /// `alternatives` are expected in rank order; the first is the one the
    /// primary is compared against. With no alternatives every threshold is
    /// `None` and the decision is robust.
    #[instrument(skip_all, fields(query = %query.id, primary = %primary.name, seed = seed))]
    pub fn analyze(
        &self,
        query: &ClinicalQuery,
        primary: &CandidateTreatment,
        alternatives: &[CandidateTreatment],
        model: &UncertaintyModel,
        seed: u64,
    ) -> Result<SensitivityReport, SimulationError> {
        model.validate()?;
        let runner_up = alternatives.first();
        let reduced = model.capped(self.sensitivity.max_universes);
        let universes_per_run = reduced.universe_count;

        if universes_per_run < model.universe_count {
            warn!(
                requested = model.universe_count,
                universes_per_run, "sensitivity runs use a reduced universe count"
            );
        }
        let factors: Vec<(&String, f64)> = model
            .uncertainty_levels
            .iter()
            .map(|(name, level)| (name, *level))
            .collect();
        let work = factors.len() * universes_per_run;
        if work > self.sensitivity.work_warning_threshold {
            warn!(
                factors = factors.len(),
                universes_per_run,
                work,
                threshold = self.sensitivity.work_warning_threshold,
                "sensitivity analysis is expensive"
            );
        }

        let baseline = self.matchup(query, primary, runner_up, &reduced, seed)?;

        let mut results = factors
            .par_iter()
            .map(|(factor, level)| {
                self.analyze_factor(query, primary, runner_up, &reduced, seed, factor, *level, &baseline)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let max_impact = results
            .iter()
            .map(|r| r.impact_magnitude)
            .fold(0.0_f64, f64::max);
        for r in &mut results {
            r.impact_magnitude = if max_impact > 0.0 {
                r.impact_magnitude / max_impact
            } else {
                0.0
            };
        }
        results.sort_by(|a, b| {
            b.impact_magnitude
                .partial_cmp(&a.impact_magnitude)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.factor.cmp(&b.factor))
        });

        let robust_decision = !results.iter().any(|r| r.within_declared_range);
        info!(
            factors = results.len(),
            robust_decision,
            universes_per_run,
            "sensitivity analysis complete"
        );

        Ok(SensitivityReport {
            primary: primary.name.clone(),
            compared_with: runner_up.map(|c| c.name.clone()),
            factors: results,
            robust_decision,
            universes_per_run,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn analyze_factor(
        &self,
        query: &ClinicalQuery,
        primary: &CandidateTreatment,
        runner_up: Option<&CandidateTreatment>,
        model: &UncertaintyModel,
        seed: u64,
        factor: &str,
        level: f64,
        baseline: &Matchup,
    ) -> Result<FactorSensitivity, SimulationError> {
        let at = |shift: f64| {
            self.matchup(query, primary, runner_up, &model.with_shift(factor, shift), seed)
        };

        let pushed = at(level)?;
        let impact = (pushed.primary.suitability_score() - baseline.primary.suitability_score()).abs();

        let critical_threshold = if runner_up.is_none() {
            None
        } else if at(0.0)?.flipped() {
            Some(0.0)
        } else if !at(1.0)?.flipped() {
            None
        } else {
            let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
            for _ in 0..self.sensitivity.bisection_iterations {
                let mid = 0.5 * (lo + hi);
                if at(mid)?.flipped() {
                    hi = mid;
                } else {
                    lo = mid;
                }
            }
            Some(hi)
        };
        let within_declared_range = critical_threshold.is_some_and(|t| t <= level);

        debug!(
            factor,
            level,
            impact,
            threshold = ?critical_threshold,
            within_declared_range,
            "factor analyzed"
        );
        Ok(FactorSensitivity {
            factor: factor.to_string(),
            declared_level: level,
            impact_magnitude: impact,
            critical_threshold,
            within_declared_range,
        })
    }

    fn matchup(
        &self,
        query: &ClinicalQuery,
        primary: &CandidateTreatment,
        runner_up: Option<&CandidateTreatment>,
        model: &UncertaintyModel,
        seed: u64,
    ) -> Result<Matchup, SimulationError> {
        let mut candidates = vec![primary.clone()];
        candidates.extend(runner_up.cloned());
        let mut runs = run_candidates(query, &candidates, model, seed, &self.simulation, None)?
            .into_iter()
            .map(build_ranked);
        let primary = runs.next().ok_or_else(|| SimulationError::EmptyInput {
            context: "sensitivity run produced no primary".to_string(),
        })?;
        Ok(Matchup {
            primary,
            runner_up: runs.next(),
        })
    }
}
