//! ConsensusSession: One bounded review of a recommendation.
//!
//! State machine: `Collecting → Reconciling → Finalized`. A finalized
//! session is frozen and rejects every operation.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use oracle_core::errors::ConsensusError;
use oracle_core::models::{ConsensusResult, FinalConsensus, ReviewerPosition};

use crate::reconcile::{self, normalize, Reconciliation};

/// Lifecycle state of a consensus session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Collecting,
    Reconciling,
    Finalized,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Collecting => "collecting",
            Self::Reconciling => "reconciling",
            Self::Finalized => "finalized",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusSession {
    pub id: String,
    /// Name of the recommended treatment under review, if known.
    pub subject: Option<String>,
    pub opened_at: DateTime<Utc>,
    state: SessionState,
    positions: Vec<ReviewerPosition>,
    reconciliation: Option<Reconciliation>,
    result: Option<ConsensusResult>,
}

impl ConsensusSession {
    pub fn new(id: impl Into<String>, subject: Option<String>) -> Self {
        Self {
            id: id.into(),
            subject,
            opened_at: Utc::now(),
            state: SessionState::Collecting,
            positions: Vec::new(),
            reconciliation: None,
            result: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn positions(&self) -> &[ReviewerPosition] {
        &self.positions
    }

    pub fn reconciliation(&self) -> Option<&Reconciliation> {
        self.reconciliation.as_ref()
    }

    pub fn result(&self) -> Option<&ConsensusResult> {
        self.result.as_ref()
    }

    fn finalized_error(&self) -> ConsensusError {
        ConsensusError::SessionFinalized {
            session_id: self.id.clone(),
        }
    }

    /// Add or replace a reviewer's position. Only valid while collecting.
    ///
    /// Rejects an empty reviewer id and a confidence outside `0..=100`.
    pub fn submit(&mut self, position: ReviewerPosition) -> Result<(), ConsensusError> {
        if self.state != SessionState::Collecting {
            return Err(self.finalized_error());
        }
        validate_position(&position)?;
        match self
            .positions
            .iter()
            .position(|p| p.reviewer_id == position.reviewer_id)
        {
            Some(i) => self.positions[i] = position,
            None => self.positions.push(position),
        }
        Ok(())
    }

    /// Move to `Reconciling` and compute the plurality and discrepancies.
    ///
    /// Repeated calls while reconciling return the stored reconciliation,
    /// annotations included.
    pub fn reconcile(&mut self) -> Result<Reconciliation, ConsensusError> {
        match self.state {
            SessionState::Finalized => Err(self.finalized_error()),
            SessionState::Reconciling => self
                .reconciliation
                .clone()
                .ok_or_else(|| self.no_positions()),
            SessionState::Collecting => {
                let reconciliation =
                    reconcile::reconcile(&self.positions).ok_or_else(|| self.no_positions())?;
                self.state = SessionState::Reconciling;
                self.reconciliation = Some(reconciliation.clone());
                Ok(reconciliation)
            }
        }
    }

    fn no_positions(&self) -> ConsensusError {
        ConsensusError::NoPositions {
            session_id: self.id.clone(),
        }
    }

    /// Record a caller-chosen resolution path for discrepancy `index`.
    pub fn annotate_discrepancy(
        &mut self,
        index: usize,
        resolution_path: impl Into<String>,
    ) -> Result<(), ConsensusError> {
        match self.state {
            SessionState::Finalized => return Err(self.finalized_error()),
            SessionState::Collecting => {
                return Err(ConsensusError::InvalidTransition {
                    from: SessionState::Collecting.to_string(),
                    to: "annotated".to_string(),
                })
            }
            SessionState::Reconciling => {}
        }
        let Some(reconciliation) = self.reconciliation.as_mut() else {
            return Err(ConsensusError::NoPositions {
                session_id: self.id.clone(),
            });
        };
        let count = reconciliation.major_discrepancies.len();
        let discrepancy = reconciliation
            .major_discrepancies
            .get_mut(index)
            .ok_or(ConsensusError::DiscrepancyNotFound { index, count })?;
        discrepancy.resolution_path = Some(resolution_path.into());
        Ok(())
    }

    /// Freeze the session.
    ///
    /// `resolution` overrides the plurality recommendation when given.
    pub fn finalize(&mut self, resolution: Option<&str>) -> Result<ConsensusResult, ConsensusError> {
        match self.state {
            SessionState::Finalized => return Err(self.finalized_error()),
            SessionState::Collecting if self.positions.is_empty() => {
                return Err(self.no_positions())
            }
            SessionState::Collecting => {
                return Err(ConsensusError::InvalidTransition {
                    from: SessionState::Collecting.to_string(),
                    to: SessionState::Finalized.to_string(),
                })
            }
            SessionState::Reconciling => {}
        }
        let reconciliation = self.reconciliation.clone().ok_or_else(|| self.no_positions())?;

        let chosen = resolution
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(&reconciliation.plurality)
            .to_string();
        let chosen_key = normalize(&chosen);
        let overridden = chosen_key != normalize(&reconciliation.plurality);

        let (agreeing, dissenting): (Vec<&ReviewerPosition>, Vec<&ReviewerPosition>) = self
            .positions
            .iter()
            .partition(|p| normalize(&p.recommendation) == chosen_key);

        let mut compromises: Vec<String> = reconciliation
            .major_discrepancies
            .iter()
            .filter_map(|d| d.resolution_path.clone())
            .collect();
        if overridden {
            compromises.push(format!(
                "plurality recommendation \"{}\" overridden by \"{}\"",
                reconciliation.plurality, chosen
            ));
        }

        let result = ConsensusResult {
            session_id: self.id.clone(),
            agreement_level: reconciliation.agreement_level,
            major_discrepancies: reconciliation.major_discrepancies,
            final_consensus: FinalConsensus {
                recommendation: chosen,
                support_level: agreeing.len() as f64 / self.positions.len() as f64,
                dissenting: dissenting.iter().map(|p| p.reviewer_id.clone()).collect(),
                compromises,
                overridden,
            },
            finalized_at: Utc::now(),
        };
        self.state = SessionState::Finalized;
        self.result = Some(result.clone());
        Ok(result)
    }
}

fn validate_position(position: &ReviewerPosition) -> Result<(), ConsensusError> {
    let invalid = |reason: String| ConsensusError::InvalidPosition {
        reviewer_id: position.reviewer_id.clone(),
        reason,
    };
    if position.reviewer_id.trim().is_empty() {
        return Err(invalid("reviewer_id is empty".to_string()));
    }
    let confidence = position.confidence_level;
    // NaN fails the range check too.
    if !(0.0..=100.0).contains(&confidence) {
        return Err(invalid(format!(
            "confidence_level must be between 0 and 100, got {confidence}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(id: &str, rec: &str) -> ReviewerPosition {
        ReviewerPosition {
            reviewer_id: id.to_string(),
            specialty: String::new(),
            recommendation: rec.to_string(),
            confidence_level: 70.0,
            reasoning: format!("because {id}"),
            critical_concerns: vec![],
        }
    }

    fn session_with(recs: &[(&str, &str)]) -> ConsensusSession {
        let mut s = ConsensusSession::new("s1", None);
        for (id, rec) in recs {
            s.submit(position(id, rec)).unwrap();
        }
        s
    }

    #[test]
    fn resubmission_replaces_earlier_position() {
        let mut s = session_with(&[("r1", "A"), ("r2", "B")]);
        s.submit(position("r2", "A")).unwrap();
        assert_eq!(s.positions().len(), 2);
        assert_eq!(s.reconcile().unwrap().agreement_level, 100.0);
    }

    #[test]
    fn out_of_range_confidence_is_rejected() {
        use oracle_core::errors::{error_code, OracleErrorCode};

        let mut s = session_with(&[("r1", "A")]);
        for bad in [120.0, -1.0, f64::NAN, f64::INFINITY] {
            let mut p = position("r2", "B");
            p.confidence_level = bad;
            let err = s.submit(p).unwrap_err();
            assert!(matches!(err, ConsensusError::InvalidPosition { .. }), "{bad}");
            assert_eq!(err.error_code(), error_code::INVALID_POSITION);
        }
        let mut blank = position("  ", "B");
        blank.confidence_level = 50.0;
        assert!(matches!(
            s.submit(blank),
            Err(ConsensusError::InvalidPosition { .. })
        ));
        assert_eq!(s.positions().len(), 1);

        // Bounds are inclusive.
        for (id, ok) in [("r3", 0.0), ("r4", 100.0)] {
            let mut p = position(id, "B");
            p.confidence_level = ok;
            s.submit(p).unwrap();
        }
        assert_eq!(s.positions().len(), 3);
    }

    #[test]
    fn finalize_from_collecting_is_invalid() {
        let mut s = session_with(&[("r1", "A")]);
        assert!(matches!(
            s.finalize(None),
            Err(ConsensusError::InvalidTransition { .. })
        ));
        let mut empty = ConsensusSession::new("s2", None);
        assert!(matches!(
            empty.finalize(None),
            Err(ConsensusError::NoPositions { .. })
        ));
        assert!(matches!(
            empty.reconcile(),
            Err(ConsensusError::NoPositions { .. })
        ));
        assert_eq!(empty.state(), SessionState::Collecting);
    }

    #[test]
    fn reconcile_is_idempotent_and_keeps_annotations() {
        let mut s = session_with(&[("r1", "A"), ("r2", "A"), ("r3", "B")]);
        let first = s.reconcile().unwrap();
        s.annotate_discrepancy(0, "second opinion from radiology").unwrap();
        let again = s.reconcile().unwrap();
        assert_eq!(first.plurality, again.plurality);
        assert_eq!(
            again.major_discrepancies[0].resolution_path.as_deref(),
            Some("second opinion from radiology")
        );
    }

    #[test]
    fn annotate_checks_state_and_index() {
        let mut s = session_with(&[("r1", "A"), ("r2", "B")]);
        assert!(matches!(
            s.annotate_discrepancy(0, "x"),
            Err(ConsensusError::InvalidTransition { .. })
        ));
        s.reconcile().unwrap();
        assert_eq!(
            s.annotate_discrepancy(3, "x"),
            Err(ConsensusError::DiscrepancyNotFound { index: 3, count: 1 })
        );
    }

    #[test]
    fn no_submissions_after_reconcile() {
        let mut s = session_with(&[("r1", "A")]);
        s.reconcile().unwrap();
        assert!(matches!(
            s.submit(position("r2", "B")),
            Err(ConsensusError::SessionFinalized { .. })
        ));
    }

    #[test]
    fn override_is_recorded() {
        let mut s = session_with(&[("r1", "A"), ("r2", "A"), ("r3", "B")]);
        s.reconcile().unwrap();
        s.annotate_discrepancy(0, "trial enrolment").unwrap();
        let result = s.finalize(Some("B")).unwrap();
        let fc = &result.final_consensus;
        assert_eq!(fc.recommendation, "B");
        assert!(fc.overridden);
        assert_eq!(fc.dissenting, ["r1", "r2"]);
        assert!((fc.support_level - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(fc.compromises.len(), 2);
        assert_eq!(fc.compromises[0], "trial enrolment");
    }

    #[test]
    fn finalized_session_is_frozen() {
        let mut s = session_with(&[("r1", "A")]);
        s.reconcile().unwrap();
        let result = s.finalize(None).unwrap();
        assert_eq!(s.result(), Some(&result));
        assert!(matches!(s.submit(position("r9", "A")), Err(ConsensusError::SessionFinalized { .. })));
        assert!(matches!(s.reconcile(), Err(ConsensusError::SessionFinalized { .. })));
        assert!(matches!(
            s.annotate_discrepancy(0, "x"),
            Err(ConsensusError::SessionFinalized { .. })
        ));
        assert!(matches!(s.finalize(None), Err(ConsensusError::SessionFinalized { .. })));
    }
}
