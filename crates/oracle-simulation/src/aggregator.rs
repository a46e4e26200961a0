//! Outcome aggregator: reduces every universe of one candidate into an
//! [`AggregateOutcome`].
//!
//! Runs only after all universes for the candidate have been evaluated.

use std::collections::BTreeMap;

use oracle_core::config::defaults::DEFAULT_CONVERGENCE_RSE;
use oracle_core::constants::TAIL_FRACTION;
use oracle_core::errors::SimulationError;
use oracle_core::models::{
    AcceptableOutcome, AggregateOutcome, ConvergenceDiagnostic, FinalOutcome, Universe,
};

use crate::stats;

/// Aggregate with the default convergence threshold.
pub fn aggregate(
    universes: &[Universe],
    acceptable: &AcceptableOutcome,
) -> Result<AggregateOutcome, SimulationError> {
    aggregate_with(universes, acceptable, DEFAULT_CONVERGENCE_RSE)
}

/// Aggregate, flagging convergence when the relative standard error of mean
/// overall survival is at or below `convergence_rse`.
pub fn aggregate_with(
    universes: &[Universe],
    acceptable: &AcceptableOutcome,
    convergence_rse: f64,
) -> Result<AggregateOutcome, SimulationError> {
    let first = universes.first().ok_or_else(|| SimulationError::EmptyInput {
        context: "aggregate requires at least one universe".to_string(),
    })?;
    let n = universes.len();

    let survival = field(universes, |o| o.overall_survival);
    let pfs = field(universes, |o| o.progression_free_survival);
    let qaly = field(universes, |o| o.quality_adjusted_life_years);
    let burden = field(universes, |o| o.treatment_burden);
    let satisfaction = field(universes, |o| o.patient_satisfaction);

    let acceptable_count = universes
        .iter()
        .filter(|u| acceptable.accepts(&u.final_outcome))
        .count();

    let robustness_score = stats::coefficient_of_variation(&survival)
        .map(|cv| 1.0 - cv.clamp(0.0, 1.0))
        .unwrap_or(0.0);

    let sorted_survival = stats::sorted(&survival);
    let tail_len = ((n as f64 * TAIL_FRACTION).ceil() as usize).clamp(1, n);
    let tail_risk = stats::mean(&sorted_survival[..tail_len]);

    let mut occurrences: BTreeMap<String, usize> = BTreeMap::new();
    for u in universes {
        for effect in u.side_effects() {
            *occurrences.entry(effect.to_string()).or_default() += 1;
        }
    }
    let side_effect_incidence = occurrences
        .into_iter()
        .map(|(k, c)| (k, c as f64 / n as f64))
        .collect();

    let overall_survival = stats::summarize(&survival);
    let standard_error = overall_survival.std_dev / (n as f64).sqrt();
    let relative_standard_error = if overall_survival.mean.abs() < f64::EPSILON {
        if standard_error == 0.0 { 0.0 } else { f64::INFINITY }
    } else {
        standard_error / overall_survival.mean.abs()
    };

    Ok(AggregateOutcome {
        candidate: first.candidate.clone(),
        universe_count: n,
        overall_survival,
        progression_free_survival: stats::summarize(&pfs),
        quality_adjusted_life_years: stats::summarize(&qaly),
        treatment_burden: stats::summarize(&burden),
        patient_satisfaction: stats::summarize(&satisfaction),
        optimal_path_probability: acceptable_count as f64 / n as f64,
        robustness_score,
        tail_risk,
        side_effect_incidence,
        convergence: ConvergenceDiagnostic {
            standard_error,
            relative_standard_error,
            converged: relative_standard_error <= convergence_rse,
        },
    })
}

fn field(universes: &[Universe], f: impl Fn(&FinalOutcome) -> f64) -> Vec<f64> {
    universes.iter().map(|u| f(&u.final_outcome)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use oracle_core::models::{DiseaseStatus, TimeStep};
    use std::collections::BTreeSet;

    fn universe(index: usize, os: f64, qaly: f64, effects: &[&str]) -> Universe {
        Universe {
            index,
            candidate: "chemo".to_string(),
            steps: vec![TimeStep {
                t: 1,
                disease_status: DiseaseStatus::Stable,
                quality_of_life: 70.0,
                treatment_response: 50.0,
                side_effects: effects.iter().map(|s| s.to_string()).collect(),
                interventions: BTreeSet::new(),
            }],
            final_outcome: FinalOutcome {
                overall_survival: os,
                progression_free_survival: os / 2.0,
                quality_adjusted_life_years: qaly,
                treatment_burden: 0.2,
                patient_satisfaction: 60.0,
            },
        }
    }

    fn acceptable() -> AcceptableOutcome {
        AcceptableOutcome {
            min_overall_survival_months: 10.0,
            min_quality_adjusted_life_years: 0.5,
        }
    }

    #[test]
    fn empty_input_is_an_error() {
        let err = aggregate(&[], &acceptable()).unwrap_err();
        assert!(matches!(err, SimulationError::EmptyInput { .. }));
    }

    #[test]
    fn identical_universes_are_fully_robust() {
        let us: Vec<_> = (0..10).map(|i| universe(i, 12.0, 0.8, &[])).collect();
        let agg = aggregate(&us, &acceptable()).unwrap();
        assert_eq!(agg.robustness_score, 1.0);
        assert_eq!(agg.optimal_path_probability, 1.0);
        assert_eq!(agg.overall_survival.std_dev, 0.0);
        assert!(agg.convergence.converged);
        assert_eq!(agg.universe_count, 10);
    }

    #[test]
    fn zero_mean_survival_has_zero_robustness() {
        let us: Vec<_> = (0..4).map(|i| universe(i, 0.0, 0.0, &[])).collect();
        let agg = aggregate(&us, &acceptable()).unwrap();
        assert_eq!(agg.robustness_score, 0.0);
        assert_eq!(agg.optimal_path_probability, 0.0);
    }

    #[test]
    fn acceptable_needs_both_thresholds() {
        let us = vec![
            universe(0, 12.0, 0.8, &[]),
            universe(1, 12.0, 0.1, &[]),
            universe(2, 6.0, 0.8, &[]),
            universe(3, 10.0, 0.5, &[]),
        ];
        let agg = aggregate(&us, &acceptable()).unwrap();
        assert_eq!(agg.optimal_path_probability, 0.5);
    }

    #[test]
    fn tail_risk_and_incidence() {
        let us: Vec<_> = (0..20)
            .map(|i| {
                let effects: &[&str] = if i % 4 == 0 { &["nausea"] } else { &[] };
                universe(i, i as f64 + 1.0, 0.8, effects)
            })
            .collect();
        let agg = aggregate(&us, &acceptable()).unwrap();
        // Worst two of twenty: 1 and 2.
        assert_eq!(agg.tail_risk, 1.5);
        assert_eq!(agg.side_effect_incidence.get("nausea"), Some(&0.25));
        assert!(agg.overall_survival.is_ordered());
        assert!(agg.robustness_score >= 0.0 && agg.robustness_score <= 1.0);
    }
}
