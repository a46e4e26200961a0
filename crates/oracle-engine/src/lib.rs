//! # oracle-engine
//!
//! The [`TreatmentOracle`] facade over simulation, scoring, sensitivity
//! analysis and consensus, plus an async job surface for long runs.
//!
//! ```no_run
//! use oracle_core::config::OracleConfig;
//! use oracle_engine::TreatmentOracle;
//!
//! oracle_core::tracing_setup::init_tracing();
//! let oracle = TreatmentOracle::new(OracleConfig::load(None)?)?;
//! # Ok::<(), oracle_core::OracleError>(())
//! ```

pub mod engine;
pub mod jobs;

pub use engine::TreatmentOracle;
pub use jobs::JobStatus;
pub use oracle_consensus::{ConsensusSession, Reconciliation, SessionState};
