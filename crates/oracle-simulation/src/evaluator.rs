//! Trajectory evaluator: Walks one universe month by month for one candidate.
//!
//! Every step consumes a fixed number of draws (one per risk factor, one for
//! the status transition, two normals for response and quality of life), so
//! a given draw sequence always reproduces the same universe.

use std::collections::BTreeSet;

use oracle_core::constants::{
    IMPROVE_STEP_SCALE, INTERVENTION_REASSESS, MARKER_MATCH_BOOST, MAX_HORIZON_MONTHS,
    MAX_QOL_STEP, MAX_RESPONSE_STEP, RISK_STEP_SCALE, SEVERE_SIDE_EFFECT, SIDE_EFFECT_QOL_PENALTY,
};
use oracle_core::errors::SimulationError;
use oracle_core::models::{
    CandidateTreatment, ClinicalQuery, DiseaseStatus, FinalOutcome, InitialConditions, TimeStep,
    Universe, UniverseSeed,
};

use crate::draws::DrawSource;

/// Per-step side-effect hazard for one risk factor in this universe.
struct StepRisk<'a> {
    name: &'a str,
    severity: f64,
    step_probability: f64,
    intervention: Option<String>,
    qol_penalty: f64,
}

/// Evaluate `candidate` in the universe described by `seed`.
pub fn evaluate<D: DrawSource>(
    seed: &UniverseSeed,
    candidate: &CandidateTreatment,
    query: &ClinicalQuery,
    horizon_months: i64,
    draws: &mut D,
) -> Result<Universe, SimulationError> {
    let months = u32::try_from(horizon_months)
        .ok()
        .filter(|m| (1..=MAX_HORIZON_MONTHS).contains(&i64::from(*m)))
        .ok_or(SimulationError::InvalidHorizon { horizon_months })?;
    let initial = &seed.initial;

    let risks = step_risks(candidate, initial);
    let drive = benefit_drive(candidate, query, initial);
    let improve_p = (drive * IMPROVE_STEP_SCALE).clamp(0.0, 0.9);
    let base_hazard = query.baseline_progression_hazard()
        * initial.progression_modifier
        * (1.0 - 0.5 * drive.min(1.0));

    let mut status = DiseaseStatus::Stable;
    let mut response = initial.baseline_response;
    let mut qol = initial.baseline_quality_of_life;
    let mut steps = Vec::with_capacity(months as usize);

    for t in 1..=months {
        let mut side_effects = BTreeSet::new();
        let mut interventions = BTreeSet::new();
        let mut qol_penalty = 0.0;
        let mut pressure = 0.0;

        for risk in &risks {
            if draws.chance(risk.step_probability) {
                side_effects.insert(risk.name.to_string());
                qol_penalty += risk.qol_penalty;
                if let Some(intervention) = &risk.intervention {
                    interventions.insert(intervention.clone());
                    // Severe toxicity interrupts treatment for the month.
                    pressure += 0.05 * risk.severity;
                }
            }
        }

        let hazard = (base_hazard + pressure).clamp(0.0, 0.95);
        let u = draws.next_unit();
        let next = if u < improve_p {
            status.improved()
        } else if u < improve_p + hazard {
            status.worsened()
        } else {
            status
        };
        if next == DiseaseStatus::Progressive && status != DiseaseStatus::Progressive {
            interventions.insert(INTERVENTION_REASSESS.to_string());
        }
        status = next;

        let drift = match status {
            DiseaseStatus::Responding => 4.0,
            DiseaseStatus::Stable => 0.5,
            DiseaseStatus::Progressive => -5.0,
        } + 2.0 * drive;
        let delta_response =
            (drift + draws.next_normal(0.0, 3.0)).clamp(-MAX_RESPONSE_STEP, MAX_RESPONSE_STEP);
        response = (response + delta_response).clamp(0.0, 100.0);

        let recovery = initial.resilience * (initial.baseline_quality_of_life - qol) * 0.2;
        let status_effect = match status {
            DiseaseStatus::Responding => 1.0,
            DiseaseStatus::Stable => 0.0,
            DiseaseStatus::Progressive => -4.0,
        };
        let delta_qol = (recovery + status_effect - qol_penalty + draws.next_normal(0.0, 2.0))
            .clamp(-MAX_QOL_STEP, MAX_QOL_STEP);
        qol = (qol + delta_qol).clamp(0.0, 100.0);

        steps.push(TimeStep {
            t,
            disease_status: status,
            quality_of_life: qol,
            treatment_response: response,
            side_effects,
            interventions,
        });
    }

    let final_outcome = final_outcome(&steps, horizon_months, query);
    Ok(Universe {
        index: seed.index,
        candidate: candidate.name.clone(),
        steps,
        final_outcome,
    })
}

fn step_risks<'a>(candidate: &'a CandidateTreatment, initial: &InitialConditions) -> Vec<StepRisk<'a>> {
    candidate
        .risks
        .iter()
        .map(|r| {
            let probability = ((r.probability + initial.deviation(&r.name)).clamp(0.0, 1.0)
                * initial.toxicity_modifier)
                .clamp(0.0, 1.0);
            let mitigated = !r.mitigation.trim().is_empty();
            let intervention = (r.severity >= SEVERE_SIDE_EFFECT).then(|| {
                if mitigated {
                    format!("manage: {}", r.mitigation.trim())
                } else {
                    format!("manage: {}", r.name)
                }
            });
            StepRisk {
                name: &r.name,
                severity: r.severity,
                step_probability: (probability * r.severity * RISK_STEP_SCALE).clamp(0.0, 1.0),
                intervention,
                qol_penalty: r.severity
                    * SIDE_EFFECT_QOL_PENALTY
                    * if mitigated { 0.5 } else { 1.0 },
            }
        })
        .collect()
}

/// Certainty-weighted benefit, scaled by this universe's response and any
/// genomic match. Roughly in [0, 1.5].
fn benefit_drive(
    candidate: &CandidateTreatment,
    query: &ClinicalQuery,
    initial: &InitialConditions,
) -> f64 {
    let (weighted, total) = candidate
        .benefits
        .iter()
        .fold((0.0, 0.0), |(acc, total), b| {
            let certainty = (b.certainty - initial.deviation(&b.name)).clamp(0.0, 1.0);
            let w = b.timeframe.weight();
            (acc + b.magnitude * certainty * w, total + w)
        });
    if total <= 0.0 {
        return 0.0;
    }
    let boost = if candidate.marker_match(query) {
        MARKER_MATCH_BOOST
    } else {
        1.0
    };
    (weighted / total * initial.response_modifier * boost).clamp(0.0, 1.5)
}

/// Deterministic summary of a finished trajectory.
///
/// Overall survival grows with the fraction of non-progressive months.
pub fn final_outcome(steps: &[TimeStep], horizon_months: i64, query: &ClinicalQuery) -> FinalOutcome {
    let horizon = horizon_months as f64;
    if steps.is_empty() {
        return FinalOutcome {
            overall_survival: 0.0,
            progression_free_survival: 0.0,
            quality_adjusted_life_years: 0.0,
            treatment_burden: 0.0,
            patient_satisfaction: 0.0,
        };
    }
    let n = steps.len() as f64;

    let non_progressive = steps
        .iter()
        .filter(|s| s.disease_status != DiseaseStatus::Progressive)
        .count() as f64
        / n;
    let mean_response = steps.iter().map(|s| s.treatment_response).sum::<f64>() / n;
    let mean_qol = steps.iter().map(|s| s.quality_of_life).sum::<f64>() / n;

    let overall_survival = horizon * (0.4 + 0.6 * non_progressive) * (1.0 + mean_response / 200.0);
    let progression_free_survival = steps
        .iter()
        .position(|s| s.disease_status == DiseaseStatus::Progressive)
        .map(|i| i as f64)
        .unwrap_or(horizon);
    let quality_adjusted_life_years = steps.iter().map(|s| s.quality_of_life / 100.0).sum::<f64>() / 12.0;

    let events: usize = steps
        .iter()
        .map(|s| s.side_effects.len() * 3 + s.interventions.len() * 2)
        .sum();
    let treatment_burden = (events as f64 / (5.0 * n)).clamp(0.0, 1.0);

    let qol_weight = if query.patient.prioritises_quality_of_life() {
        0.75
    } else {
        0.6
    };
    let patient_satisfaction = (qol_weight * mean_qol + (1.0 - qol_weight) * mean_response
        - 20.0 * treatment_burden)
        .clamp(0.0, 100.0);

    FinalOutcome {
        overall_survival,
        progression_free_survival,
        quality_adjusted_life_years,
        treatment_burden,
        patient_satisfaction,
    }
}
