//! ConsensusManager: Concurrent session table via DashMap.
//!
//! Mutations take the entry's write lock through `get_mut`, so concurrent
//! submissions to one session are serialized while other sessions proceed.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use oracle_core::config::ConsensusConfig;
use oracle_core::errors::ConsensusError;
use oracle_core::models::{ConsensusResult, ReviewerPosition};

use crate::reconcile::Reconciliation;
use crate::session::{ConsensusSession, SessionState};

/// Thread-safe consensus session manager.
#[derive(Clone)]
pub struct ConsensusManager {
    sessions: Arc<DashMap<String, ConsensusSession>>,
    config: ConsensusConfig,
}

impl ConsensusManager {
    pub fn new(config: ConsensusConfig) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            config,
        }
    }

    /// Open a session and return its id.
    pub fn open_session(&self, subject: Option<String>) -> String {
        let id = Uuid::new_v4().to_string();
        debug!(session_id = %id, subject = ?subject, "consensus session opened");
        self.sessions
            .insert(id.clone(), ConsensusSession::new(id.clone(), subject));
        id
    }

    fn with_session<T>(
        &self,
        session_id: &str,
        f: impl FnOnce(&mut ConsensusSession) -> Result<T, ConsensusError>,
    ) -> Result<T, ConsensusError> {
        let mut entry = self
            .sessions
            .get_mut(session_id)
            .ok_or_else(|| ConsensusError::SessionNotFound(session_id.to_string()))?;
        f(entry.value_mut())
    }

    #[instrument(skip(self, position), fields(reviewer = %position.reviewer_id))]
    pub fn submit_position(
        &self,
        session_id: &str,
        position: ReviewerPosition,
    ) -> Result<(), ConsensusError> {
        self.with_session(session_id, |s| s.submit(position))?;
        debug!("position recorded");
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn reconcile(&self, session_id: &str) -> Result<Reconciliation, ConsensusError> {
        let min_reviewers = self.config.min_reviewers;
        let reconciliation = self.with_session(session_id, |s| s.reconcile())?;
        if reconciliation.reviewer_count < min_reviewers {
            warn!(
                reviewers = reconciliation.reviewer_count,
                min_reviewers, "reconciled with fewer reviewers than configured"
            );
        }
        info!(
            agreement_level = reconciliation.agreement_level,
            discrepancies = reconciliation.major_discrepancies.len(),
            "session reconciled"
        );
        Ok(reconciliation)
    }

    pub fn annotate_discrepancy(
        &self,
        session_id: &str,
        index: usize,
        resolution_path: impl Into<String>,
    ) -> Result<(), ConsensusError> {
        self.with_session(session_id, |s| s.annotate_discrepancy(index, resolution_path))
    }

    #[instrument(skip(self))]
    pub fn finalize(
        &self,
        session_id: &str,
        resolution: Option<&str>,
    ) -> Result<ConsensusResult, ConsensusError> {
        let result = self.with_session(session_id, |s| s.finalize(resolution))?;
        info!(
            recommendation = %result.final_consensus.recommendation,
            support_level = result.final_consensus.support_level,
            overridden = result.final_consensus.overridden,
            "session finalized"
        );
        Ok(result)
    }

    pub fn session_state(&self, session_id: &str) -> Result<SessionState, ConsensusError> {
        self.sessions
            .get(session_id)
            .map(|s| s.state())
            .ok_or_else(|| ConsensusError::SessionNotFound(session_id.to_string()))
    }

    /// Cloned snapshot of a session.
    pub fn session(&self, session_id: &str) -> Option<ConsensusSession> {
        self.sessions.get(session_id).map(|r| r.clone())
    }

    /// Drop a session from the table and hand back its final snapshot.
    ///
    /// Sessions are never evicted on their own; callers remove them once
    /// the result has been read.
    pub fn remove_session(&self, session_id: &str) -> Result<ConsensusSession, ConsensusError> {
        let (_, session) = self
            .sessions
            .remove(session_id)
            .ok_or_else(|| ConsensusError::SessionNotFound(session_id.to_string()))?;
        debug!(session_id, state = %session.state(), "consensus session removed");
        Ok(session)
    }

    /// Number of open or finalized sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

impl Default for ConsensusManager {
    fn default() -> Self {
        Self::new(ConsensusConfig::default())
    }
}
