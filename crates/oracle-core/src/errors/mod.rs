//! Error taxonomy for the oracle engine.
//!
//! Each subsystem owns a `thiserror` enum; [`OracleError`] wraps them so the
//! engine facade can return a single [`OracleResult`].

pub mod config_error;
pub mod consensus_error;
pub mod error_code;
pub mod simulation_error;

pub use config_error::ConfigError;
pub use consensus_error::ConsensusError;
pub use error_code::OracleErrorCode;
pub use simulation_error::SimulationError;

/// Top-level error returned by the engine facade.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OracleError {
    #[error(transparent)]
    Simulation(#[from] SimulationError),

    #[error(transparent)]
    Consensus(#[from] ConsensusError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl OracleErrorCode for OracleError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Simulation(e) => e.error_code(),
            Self::Consensus(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
        }
    }
}

/// Result alias used across the workspace.
pub type OracleResult<T> = Result<T, OracleError>;
