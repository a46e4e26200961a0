//! Sampler → evaluator → aggregator pipeline.
//!
//! Universes are sampled once per run and shared by every candidate, so
//! candidates are compared on common random numbers. Within a candidate,
//! universes fan out over rayon and fan back in at the aggregator.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info, instrument};

use oracle_core::config::SimulationConfig;
use oracle_core::errors::SimulationError;
use oracle_core::models::{
    AggregateOutcome, CandidateTreatment, ClinicalQuery, UncertaintyModel, UniverseSeed,
};

use crate::aggregator::aggregate_with;
use crate::draws::RngDraws;
use crate::evaluator::evaluate;
use crate::sampler::sample;

/// Cooperative cancellation flag, checked once per universe.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// One candidate's simulated result.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRun {
    /// The candidate as declared by the caller.
    pub candidate: CandidateTreatment,
    /// The candidate with the model's factor shifts folded in. This is what
    /// the scorer sees.
    pub effective: CandidateTreatment,
    pub aggregate: AggregateOutcome,
}

/// Fold every shift in `model` into `candidate`.
pub fn effective_candidate(
    candidate: &CandidateTreatment,
    model: &UncertaintyModel,
) -> CandidateTreatment {
    model
        .factor_shifts
        .iter()
        .fold(candidate.clone(), |c, (factor, shift)| c.with_shift(factor, *shift))
}

/// Evaluate `candidate` across the pre-sampled `seeds` and aggregate.
///
/// Each universe replays its own ChaCha stream, so the result is identical
/// whether universes run sequentially or in parallel.
pub fn simulate_candidate(
    query: &ClinicalQuery,
    candidate: &CandidateTreatment,
    model: &UncertaintyModel,
    seeds: &[UniverseSeed],
    config: &SimulationConfig,
    cancel: Option<&CancelToken>,
) -> Result<CandidateRun, SimulationError> {
    candidate.validate()?;
    let horizon = model.horizon_months;

    let run_one = |seed: &UniverseSeed| {
        if cancel.is_some_and(CancelToken::is_cancelled) {
            return Err(SimulationError::Cancelled);
        }
        let mut draws = RngDraws::from_seed(seed.rng_seed);
        evaluate(seed, candidate, query, horizon, &mut draws)
    };

    let universes = if seeds.len() >= config.parallel_threshold {
        seeds.par_iter().map(run_one).collect::<Result<Vec<_>, _>>()?
    } else {
        seeds.iter().map(run_one).collect::<Result<Vec<_>, _>>()?
    };

    let aggregate = aggregate_with(
        &universes,
        &model.acceptable_outcome,
        config.convergence_rse,
    )?;
    debug!(
        candidate = %candidate.name,
        universes = universes.len(),
        mean_survival = aggregate.overall_survival.mean,
        optimal_path_probability = aggregate.optimal_path_probability,
        "candidate aggregated"
    );

    Ok(CandidateRun {
        candidate: candidate.clone(),
        effective: effective_candidate(candidate, model),
        aggregate,
    })
}

/// Sample once, then simulate every candidate in declaration order.
#[instrument(skip_all, fields(query = %query.id, candidates = candidates.len(), seed = seed))]
pub fn run_candidates(
    query: &ClinicalQuery,
    candidates: &[CandidateTreatment],
    model: &UncertaintyModel,
    seed: u64,
    config: &SimulationConfig,
    cancel: Option<&CancelToken>,
) -> Result<Vec<CandidateRun>, SimulationError> {
    if candidates.is_empty() {
        return Err(SimulationError::NoCandidates);
    }
    for c in candidates {
        c.validate()?;
    }
    let seeds = sample(query, model, seed)?;

    let runs = candidates
        .iter()
        .map(|c| simulate_candidate(query, c, model, &seeds, config, cancel))
        .collect::<Result<Vec<_>, _>>()?;

    info!(
        universes = seeds.len(),
        horizon_months = model.horizon_months,
        "candidates simulated"
    );
    Ok(runs)
}
