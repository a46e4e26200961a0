//! # oracle-core
//!
//! Foundation crate for the treatment oracle engine.
//! Defines the clinical data model, errors, config, constants and tracing setup.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod tracing_setup;

// Re-export the most commonly used types at the crate root.
pub use config::OracleConfig;
pub use errors::{OracleError, OracleResult};
pub use models::{
    AcceptableOutcome, AggregateOutcome, BenefitFactor, CandidateTreatment, ClinicalQuery,
    ConsensusResult, DiseaseStatus, FinalOutcome, PatientFactors, Recommendation,
    ReviewerPosition, RiskFactor, SensitivityReport, UncertaintyModel, Universe,
};
