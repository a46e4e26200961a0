//! Consensus session errors.

use super::error_code::{self, OracleErrorCode};

/// Errors raised by the consensus session state machine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConsensusError {
    /// The session is frozen; no further mutation is allowed.
    #[error("consensus session {session_id} is finalized")]
    SessionFinalized { session_id: String },

    /// No session with this id exists.
    #[error("consensus session not found: {0}")]
    SessionNotFound(String),

    /// Reconcile or finalize was called before any position was submitted.
    #[error("consensus session {session_id} has no submitted positions")]
    NoPositions { session_id: String },

    /// The requested transition is not valid from the current state.
    #[error("invalid transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// A submitted position carries out-of-range or missing fields.
    #[error("invalid position from {reviewer_id}: {reason}")]
    InvalidPosition { reviewer_id: String, reason: String },

    /// A discrepancy annotation referenced an unknown index.
    #[error("discrepancy {index} not found ({count} recorded)")]
    DiscrepancyNotFound { index: usize, count: usize },
}

impl OracleErrorCode for ConsensusError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::SessionFinalized { .. } => error_code::SESSION_FINALIZED,
            Self::SessionNotFound(_) => error_code::SESSION_NOT_FOUND,
            Self::NoPositions { .. } => error_code::NO_POSITIONS,
            Self::InvalidTransition { .. } => error_code::INVALID_TRANSITION,
            Self::InvalidPosition { .. } => error_code::INVALID_POSITION,
            Self::DiscrepancyNotFound { .. } => error_code::DISCREPANCY_NOT_FOUND,
        }
    }
}
