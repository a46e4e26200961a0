//! Scenario sampler: Independent initial conditions per universe.
//!
//! For a factor with uncertainty level `u` and adverse shift `s`, each
//! universe's deviation is `s + N(0, (u · FACTOR_SPREAD)²)`. Every factor
//! consumes the same number of draws whatever its level, so changing one
//! level or shift never reshuffles the draws of another factor.

use std::collections::{BTreeMap, BTreeSet};

use rayon::prelude::*;
use tracing::{debug, instrument};

use oracle_core::constants::{
    FACTOR_DISEASE_PROGRESSION, FACTOR_PATIENT_RESILIENCE, FACTOR_SPREAD, FACTOR_TOXICITY,
    FACTOR_TREATMENT_RESPONSE,
};
use oracle_core::errors::SimulationError;
use oracle_core::models::{ClinicalQuery, InitialConditions, UncertaintyModel, UniverseSeed};

use crate::draws::{derive_seed, DrawSource, RngDraws};

const WELL_KNOWN: [&str; 4] = [
    FACTOR_TREATMENT_RESPONSE,
    FACTOR_TOXICITY,
    FACTOR_DISEASE_PROGRESSION,
    FACTOR_PATIENT_RESILIENCE,
];

/// Draw `model.universe_count` universes for `query`.
///
/// Validates the query and model before any sampling work. The same
/// `master_seed` always yields the same universes.
#[instrument(skip(query, model), fields(query = %query.id, universes = model.universe_count))]
pub fn sample(
    query: &ClinicalQuery,
    model: &UncertaintyModel,
    master_seed: u64,
) -> Result<Vec<UniverseSeed>, SimulationError> {
    query.validate()?;
    model.validate()?;

    let named: Vec<&str> = model
        .uncertainty_levels
        .keys()
        .chain(model.factor_shifts.keys())
        .map(String::as_str)
        .filter(|f| !WELL_KNOWN.contains(f))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let seeds: Vec<UniverseSeed> = (0..model.universe_count)
        .into_par_iter()
        .map(|index| UniverseSeed {
            index,
            rng_seed: derive_seed(master_seed, index as u64),
            initial: draw_initial(query, model, &named, master_seed, index),
        })
        .collect();

    debug!(count = seeds.len(), named_factors = named.len(), "universes sampled");
    Ok(seeds)
}

fn draw_initial(
    query: &ClinicalQuery,
    model: &UncertaintyModel,
    named: &[&str],
    master_seed: u64,
    index: usize,
) -> InitialConditions {
    let mut draws = RngDraws::for_stream(master_seed, index as u64);

    let baseline_quality_of_life =
        (query.baseline_quality_of_life() + draws.next_normal(0.0, 5.0)).clamp(0.0, 100.0);
    let baseline_response = (50.0 + draws.next_normal(0.0, 5.0)).clamp(0.0, 100.0);

    let response = deviation(&mut draws, model, FACTOR_TREATMENT_RESPONSE);
    let toxicity = deviation(&mut draws, model, FACTOR_TOXICITY);
    let progression = deviation(&mut draws, model, FACTOR_DISEASE_PROGRESSION);
    let resilience = deviation(&mut draws, model, FACTOR_PATIENT_RESILIENCE);

    let factor_deviations: BTreeMap<String, f64> = named
        .iter()
        .map(|name| (name.to_string(), deviation(&mut draws, model, name)))
        .collect();

    InitialConditions {
        baseline_quality_of_life,
        baseline_response,
        response_modifier: (1.0 - response).clamp(0.1, 2.0),
        toxicity_modifier: (1.0 + toxicity).clamp(0.1, 3.0),
        progression_modifier: (1.0 + progression).clamp(0.1, 3.0),
        resilience: (query.resilience() * (1.0 - resilience)).clamp(0.0, 1.0),
        factor_deviations,
    }
}

fn deviation<D: DrawSource>(draws: &mut D, model: &UncertaintyModel, factor: &str) -> f64 {
    draws.next_normal(model.shift(factor), model.level(factor) * FACTOR_SPREAD)
}

#[cfg(test)]
mod tests {
    use super::*;
    use oracle_core::models::PatientFactors;

    fn query() -> ClinicalQuery {
        ClinicalQuery {
            id: "q1".to_string(),
            cancer_type: "nsclc".to_string(),
            stage: "III".to_string(),
            prior_treatments: vec![],
            comorbidities: vec!["diabetes".to_string()],
            genetic_markers: vec!["EGFR".to_string()],
            current_symptoms: vec![],
            urgency: 40,
            patient: PatientFactors {
                age: 64,
                performance_status: 1,
                goals: vec![],
                preferences: vec![],
            },
        }
    }

    #[test]
    fn returns_exactly_universe_count() {
        let model = UncertaintyModel::new(37, 6).with_factor("toxicity", 0.4);
        let seeds = sample(&query(), &model, 11).unwrap();
        assert_eq!(seeds.len(), 37);
        for (i, s) in seeds.iter().enumerate() {
            assert_eq!(s.index, i);
        }
    }

    #[test]
    fn zero_uncertainty_collapses_to_point_estimate() {
        let model = UncertaintyModel::new(20, 6)
            .with_factor("toxicity", 0.0)
            .with_factor("neuropathy", 0.0);
        let seeds = sample(&query(), &model, 5).unwrap();
        for s in &seeds {
            assert_eq!(s.initial.toxicity_modifier, 1.0);
            assert_eq!(s.initial.deviation("neuropathy"), 0.0);
        }
    }

    #[test]
    fn rejects_bad_models_before_sampling() {
        let zero = UncertaintyModel::new(0, 6);
        assert!(matches!(
            sample(&query(), &zero, 1),
            Err(SimulationError::InvalidModel { .. })
        ));

        let out_of_range = UncertaintyModel::new(10, 6).with_factor("toxicity", 1.5);
        assert!(matches!(
            sample(&query(), &out_of_range, 1),
            Err(SimulationError::InvalidModel { .. })
        ));

        let no_horizon = UncertaintyModel::new(10, 0);
        assert!(matches!(
            sample(&query(), &no_horizon, 1),
            Err(SimulationError::InvalidHorizon { horizon_months: 0 })
        ));
    }

    #[test]
    fn shift_moves_the_mean_only() {
        let base = UncertaintyModel::new(50, 6).with_factor("toxicity", 0.5);
        let shifted = base.with_shift("toxicity", 0.2);
        let a = sample(&query(), &base, 3).unwrap();
        let b = sample(&query(), &shifted, 3).unwrap();
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.initial.baseline_quality_of_life, y.initial.baseline_quality_of_life);
            assert_eq!(x.rng_seed, y.rng_seed);
        }
    }
}
