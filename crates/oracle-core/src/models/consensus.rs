//! Reviewer positions and consensus results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One specialist's independent position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewerPosition {
    pub reviewer_id: String,
    #[serde(default)]
    pub specialty: String,
    pub recommendation: String,
    /// 0–100.
    pub confidence_level: f64,
    pub reasoning: String,
    #[serde(default)]
    pub critical_concerns: Vec<String>,
}

/// One side of a discrepancy: everyone who backed one recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscrepancySide {
    pub recommendation: String,
    pub reviewers: Vec<String>,
    /// Each reviewer's reasoning, verbatim.
    pub reasoning: Vec<String>,
    pub critical_concerns: Vec<String>,
}

/// A split between the plurality and one minority recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MajorDiscrepancy {
    pub issue: String,
    pub sides: Vec<DiscrepancySide>,
    /// Filled in by the caller; never resolved automatically.
    pub resolution_path: Option<String>,
}

/// The endorsed decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalConsensus {
    pub recommendation: String,
    /// Agreeing reviewers ÷ total reviewers.
    pub support_level: f64,
    /// Reviewer ids whose recommendation differs from the final choice.
    pub dissenting: Vec<String>,
    pub compromises: Vec<String>,
    /// True when the caller overrode the plurality.
    pub overridden: bool,
}

/// Frozen outcome of a consensus session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusResult {
    pub session_id: String,
    /// Percentage of reviewers matching the plurality, 0–100.
    pub agreement_level: f64,
    pub major_discrepancies: Vec<MajorDiscrepancy>,
    pub final_consensus: FinalConsensus,
    pub finalized_at: DateTime<Utc>,
}

impl ConsensusResult {
    /// `agreement_level` as a fraction in [0, 1].
    pub fn agreement_fraction(&self) -> f64 {
        self.agreement_level / 100.0
    }
}
