//! Simulation, aggregation and scoring errors.

use super::error_code::{self, OracleErrorCode};

/// Errors raised by the sampler, evaluator, aggregator and scorer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimulationError {
    /// The uncertainty model is malformed.
    #[error("invalid uncertainty model: {reason}")]
    InvalidModel { reason: String },

    /// The time horizon is not positive or exceeds the supported maximum.
    #[error(
        "invalid horizon: {horizon_months} months (must be between 1 and {max})",
        max = crate::constants::MAX_HORIZON_MONTHS
    )]
    InvalidHorizon { horizon_months: i64 },

    /// A clinical query field is out of range.
    #[error("invalid query field {field}: {reason}")]
    InvalidQuery { field: String, reason: String },

    /// A candidate treatment declares an out-of-range factor.
    #[error("invalid candidate {name}: {reason}")]
    InvalidCandidate { name: String, reason: String },

    /// No candidate treatments were supplied.
    #[error("no candidate treatments supplied")]
    NoCandidates,

    /// Aggregation or scoring was asked to work over an empty set.
    #[error("empty input: {context}")]
    EmptyInput { context: String },

    /// A caller-imposed deadline expired before the run completed.
    #[error("simulation timed out after {deadline_ms} ms")]
    SimulationTimeout { deadline_ms: u64 },

    /// The caller abandoned the run.
    #[error("simulation cancelled")]
    Cancelled,

    /// No job with this id is known.
    #[error("simulation job not found: {0}")]
    JobNotFound(String),
}

impl OracleErrorCode for SimulationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidModel { .. } => error_code::INVALID_MODEL,
            Self::InvalidHorizon { .. } => error_code::INVALID_HORIZON,
            Self::InvalidQuery { .. } => error_code::INVALID_QUERY,
            Self::InvalidCandidate { .. } => error_code::INVALID_CANDIDATE,
            Self::NoCandidates => error_code::NO_CANDIDATES,
            Self::EmptyInput { .. } => error_code::EMPTY_INPUT,
            Self::SimulationTimeout { .. } => error_code::SIMULATION_TIMEOUT,
            Self::Cancelled => error_code::CANCELLED,
            Self::JobNotFound(_) => error_code::JOB_NOT_FOUND,
        }
    }
}
