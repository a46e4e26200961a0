//! Async simulation jobs: submit, poll, cancel, and deadline-bounded runs.
//!
//! The simulation itself is CPU-bound and runs on tokio's blocking pool
//! (and from there on rayon). Cancellation flips the job's [`CancelToken`],
//! which the pipeline checks once per universe; a cancelled job never
//! yields a recommendation.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};
use uuid::Uuid;

use oracle_core::errors::{OracleError, OracleResult, SimulationError};
use oracle_core::models::{CandidateTreatment, ClinicalQuery, Recommendation, UncertaintyModel};
use oracle_simulation::CancelToken;

use crate::engine::TreatmentOracle;

/// Observable state of a submitted job.
#[derive(Debug, Clone, PartialEq)]
pub enum JobStatus {
    Running,
    Completed(Box<Recommendation>),
    Failed(OracleError),
    Cancelled,
}

impl JobStatus {
    pub fn is_finished(&self) -> bool {
        !matches!(self, Self::Running)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed(_) => "completed",
            Self::Failed(_) => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug)]
pub(crate) struct JobEntry {
    status: JobStatus,
    cancel: CancelToken,
}

impl TreatmentOracle {
    /// Start a simulation in the background and return its job id.
    ///
    /// Must be called from within a tokio runtime. A non-zero
    /// `simulation.job_deadline_ms` bounds the job.
    ///
    /// Finished jobs are not evicted: the record, recommendation included,
    /// stays pollable until [`forget_job`](Self::forget_job) drops it.
    pub fn submit_simulation(
        self: &Arc<Self>,
        query: ClinicalQuery,
        candidates: Vec<CandidateTreatment>,
        model: UncertaintyModel,
    ) -> String {
        let job_id = Uuid::new_v4().to_string();
        let cancel = CancelToken::new();
        self.jobs.insert(
            job_id.clone(),
            JobEntry {
                status: JobStatus::Running,
                cancel: cancel.clone(),
            },
        );

        let deadline = match self.config().simulation.job_deadline_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        };
        let oracle = Arc::clone(self);
        let token = cancel.clone();
        let handle = tokio::task::spawn_blocking(move || {
            oracle.simulate(&query, &candidates, &model, Some(&token))
        });

        let jobs = Arc::clone(&self.jobs);
        let id = job_id.clone();
        tokio::spawn(async move {
            let joined = match deadline {
                Some(d) => match tokio::time::timeout(d, handle).await {
                    Ok(joined) => joined,
                    Err(_) => {
                        cancel.cancel();
                        Ok(Err(SimulationError::SimulationTimeout {
                            deadline_ms: d.as_millis() as u64,
                        }))
                    }
                },
                None => handle.await,
            };
            let status = match joined {
                Ok(Ok(recommendation)) => JobStatus::Completed(Box::new(recommendation)),
                Ok(Err(SimulationError::Cancelled)) => JobStatus::Cancelled,
                Ok(Err(e)) => JobStatus::Failed(e.into()),
                Err(e) => {
                    warn!(job_id = %id, error = %e, "simulation task aborted");
                    JobStatus::Cancelled
                }
            };
            if let Some(mut entry) = jobs.get_mut(&id) {
                // A caller cancellation wins over a late result.
                if entry.status == JobStatus::Running {
                    debug!(job_id = %id, status = status.label(), "job finished");
                    entry.status = status;
                }
            }
        });

        info!(job_id = %job_id, deadline_ms = ?deadline.map(|d| d.as_millis()), "simulation job submitted");
        job_id
    }

    /// Current status of a job.
    pub fn poll_simulation(&self, job_id: &str) -> OracleResult<JobStatus> {
        self.jobs
            .get(job_id)
            .map(|e| e.status.clone())
            .ok_or_else(|| SimulationError::JobNotFound(job_id.to_string()).into())
    }

    /// Abandon a job. Finished jobs keep their status.
    pub fn cancel_job(&self, job_id: &str) -> OracleResult<()> {
        let mut entry = self
            .jobs
            .get_mut(job_id)
            .ok_or_else(|| SimulationError::JobNotFound(job_id.to_string()))?;
        entry.cancel.cancel();
        if entry.status == JobStatus::Running {
            entry.status = JobStatus::Cancelled;
            info!(job_id, "simulation job cancelled");
        }
        Ok(())
    }

    /// Drop a job's record, returning its last status.
    ///
    /// A job still running is cancelled first.
    pub fn forget_job(&self, job_id: &str) -> Option<JobStatus> {
        self.jobs.remove(job_id).map(|(_, e)| {
            e.cancel.cancel();
            debug!(job_id, status = e.status.label(), "job forgotten");
            e.status
        })
    }

    /// Number of job records held, finished ones included.
    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    /// Run a simulation, failing with `SimulationTimeout` if it does not
    /// finish within `deadline`. The abandoned run is cancelled.
    pub async fn run_simulation_with_deadline(
        self: &Arc<Self>,
        query: ClinicalQuery,
        candidates: Vec<CandidateTreatment>,
        model: UncertaintyModel,
        deadline: Duration,
    ) -> OracleResult<Recommendation> {
        let cancel = CancelToken::new();
        let token = cancel.clone();
        let oracle = Arc::clone(self);
        let handle = tokio::task::spawn_blocking(move || {
            oracle.simulate(&query, &candidates, &model, Some(&token))
        });

        match tokio::time::timeout(deadline, handle).await {
            Ok(Ok(result)) => Ok(result?),
            Ok(Err(_)) => Err(SimulationError::Cancelled.into()),
            Err(_) => {
                cancel.cancel();
                let deadline_ms = deadline.as_millis() as u64;
                warn!(deadline_ms, "simulation exceeded its deadline");
                Err(SimulationError::SimulationTimeout { deadline_ms }.into())
            }
        }
    }
}
