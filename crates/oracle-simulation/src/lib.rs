//! # oracle-simulation
//!
//! Monte Carlo core of the treatment oracle: draws independent universes,
//! walks each through monthly steps for a candidate treatment, and reduces
//! the resulting outcomes into per-candidate statistics.
//!
//! ## Modules
//!
//! - [`draws`]: `DrawSource` injection seam, ChaCha-backed and scripted sources
//! - [`sampler`]: Per-universe initial conditions from the uncertainty model
//! - [`evaluator`]: Month-by-month trajectory and final outcome
//! - [`stats`]: Mean, dispersion and percentile helpers
//! - [`aggregator`]: Reduction of universes into an `AggregateOutcome`
//! - [`pipeline`]: Sampler → evaluator → aggregator fan-out/fan-in per candidate

pub mod aggregator;
pub mod draws;
pub mod evaluator;
pub mod pipeline;
pub mod sampler;
pub mod stats;

pub use aggregator::{aggregate, aggregate_with};
pub use draws::{DrawSource, RngDraws, ScriptedDraws};
pub use evaluator::evaluate;
pub use pipeline::{
    effective_candidate, run_candidates, simulate_candidate, CancelToken, CandidateRun,
};
pub use sampler::sample;
