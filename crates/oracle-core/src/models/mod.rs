//! Plain data records exchanged with callers.

pub mod consensus;
pub mod outcome;
pub mod query;
pub mod recommendation;
pub mod sensitivity;
pub mod treatment;
pub mod uncertainty;
pub mod universe;

pub use consensus::{
    ConsensusResult, DiscrepancySide, FinalConsensus, MajorDiscrepancy, ReviewerPosition,
};
pub use outcome::{AggregateOutcome, ConvergenceDiagnostic, FieldSummary};
pub use query::{ClinicalQuery, PatientFactors};
pub use recommendation::{RankedTreatment, Recommendation, RiskBenefitScore, SimulationReport};
pub use sensitivity::{FactorSensitivity, SensitivityReport};
pub use treatment::{BenefitFactor, CandidateTreatment, RiskFactor, Timeframe};
pub use uncertainty::{AcceptableOutcome, UncertaintyModel};
pub use universe::{DiseaseStatus, FinalOutcome, InitialConditions, TimeStep, Universe, UniverseSeed};
