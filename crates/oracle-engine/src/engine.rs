//! TreatmentOracle: The single entry point callers hold.
//!
//! Owns the resolved config, an optional dedicated rayon pool, the consensus
//! session table and the async job table.

use std::sync::Arc;
use std::time::Instant;

use dashmap::DashMap;
use tracing::{info, instrument};

use oracle_consensus::{ConsensusManager, ConsensusSession, Reconciliation, SessionState};
use oracle_core::config::OracleConfig;
use oracle_core::errors::{ConfigError, OracleResult, SimulationError};
use oracle_core::models::{
    CandidateTreatment, ClinicalQuery, ConsensusResult, Recommendation, ReviewerPosition,
    SensitivityReport, SimulationReport, UncertaintyModel,
};
use oracle_scoring::{build_ranked, rank, SensitivityAnalyzer};
use oracle_simulation::{run_candidates, CancelToken};

use crate::jobs::JobEntry;

pub struct TreatmentOracle {
    config: OracleConfig,
    pool: Option<rayon::ThreadPool>,
    consensus: ConsensusManager,
    pub(crate) jobs: Arc<DashMap<String, JobEntry>>,
}

impl TreatmentOracle {
    /// Build an oracle from a validated config.
    ///
    /// `simulation.worker_threads > 0` gets a dedicated pool; 0 shares the
    /// global rayon pool.
    pub fn new(config: OracleConfig) -> OracleResult<Self> {
        config.validate()?;
        let pool = match config.simulation.worker_threads {
            0 => None,
            n => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .thread_name(|i| format!("oracle-sim-{i}"))
                    .build()
                    .map_err(|e| ConfigError::ValidationFailed {
                        field: "simulation.worker_threads".to_string(),
                        message: e.to_string(),
                    })?,
            ),
        };
        Ok(Self {
            consensus: ConsensusManager::new(config.consensus.clone()),
            config,
            pool,
            jobs: Arc::new(DashMap::new()),
        })
    }

    pub fn config(&self) -> &OracleConfig {
        &self.config
    }

    fn install<T: Send>(&self, f: impl FnOnce() -> T + Send) -> T {
        match &self.pool {
            Some(pool) => pool.install(f),
            None => f(),
        }
    }

    /// Seed for a run: the model's, else the configured one, else fresh.
    fn resolve_seed(&self, model: &UncertaintyModel) -> u64 {
        model
            .seed
            .or(self.config.simulation.seed)
            .unwrap_or_else(rand::random)
    }

    /// Simulate every candidate and rank them.
    ///
    /// Either returns a complete recommendation or fails without partial
    /// results.
    pub fn run_simulation(
        &self,
        query: &ClinicalQuery,
        candidates: &[CandidateTreatment],
        model: &UncertaintyModel,
    ) -> OracleResult<Recommendation> {
        Ok(self.simulate(query, candidates, model, None)?)
    }

    #[instrument(skip_all, fields(query = %query.id, candidates = candidates.len()))]
    pub(crate) fn simulate(
        &self,
        query: &ClinicalQuery,
        candidates: &[CandidateTreatment],
        model: &UncertaintyModel,
        cancel: Option<&CancelToken>,
    ) -> Result<Recommendation, SimulationError> {
        if candidates.is_empty() {
            return Err(SimulationError::NoCandidates);
        }
        let seed = self.resolve_seed(model);
        let start = Instant::now();

        let runs = self.install(|| {
            run_candidates(query, candidates, model, seed, &self.config.simulation, cancel)
        })?;
        let converged = runs.iter().all(|r| r.aggregate.convergence.converged);
        let ranked = runs.into_iter().map(build_ranked).collect();

        let report = SimulationReport {
            query_id: query.id.clone(),
            seed,
            universe_count: model.universe_count,
            horizon_months: model.horizon_months,
            candidates_evaluated: candidates.len(),
            elapsed_ms: start.elapsed().as_millis() as u64,
            converged,
        };
        let recommendation = rank(ranked, report)?;

        info!(
            seed,
            primary = %recommendation.primary.name(),
            suitability = recommendation.primary.suitability_score(),
            confidence = recommendation.primary.confidence,
            elapsed_ms = recommendation.report.elapsed_ms,
            converged,
            "simulation complete"
        );
        Ok(recommendation)
    }

    /// Which uncertain factors could flip `recommendation`.
    ///
    /// Replays with the recommendation's seed so the baseline matches the
    /// original run.
    pub fn run_sensitivity(
        &self,
        query: &ClinicalQuery,
        recommendation: &Recommendation,
        model: &UncertaintyModel,
    ) -> OracleResult<SensitivityReport> {
        let analyzer = SensitivityAnalyzer::new(
            self.config.simulation.clone(),
            self.config.sensitivity.clone(),
        );
        let alternatives: Vec<CandidateTreatment> = recommendation
            .alternatives
            .iter()
            .map(|r| r.candidate.clone())
            .collect();
        let report = self.install(|| {
            analyzer.analyze(
                query,
                &recommendation.primary.candidate,
                &alternatives,
                model,
                recommendation.report.seed,
            )
        })?;
        Ok(report)
    }

    // --- Consensus ---

    /// Open a review session for `recommendation`'s primary treatment.
    pub fn open_consensus_session(&self, recommendation: &Recommendation) -> String {
        self.consensus
            .open_session(Some(recommendation.primary.name().to_string()))
    }

    pub fn submit_position(&self, session_id: &str, position: ReviewerPosition) -> OracleResult<()> {
        Ok(self.consensus.submit_position(session_id, position)?)
    }

    pub fn reconcile(&self, session_id: &str) -> OracleResult<Reconciliation> {
        Ok(self.consensus.reconcile(session_id)?)
    }

    pub fn annotate_discrepancy(
        &self,
        session_id: &str,
        index: usize,
        resolution_path: impl Into<String>,
    ) -> OracleResult<()> {
        Ok(self
            .consensus
            .annotate_discrepancy(session_id, index, resolution_path)?)
    }

    pub fn finalize(&self, session_id: &str, resolution: Option<&str>) -> OracleResult<ConsensusResult> {
        Ok(self.consensus.finalize(session_id, resolution)?)
    }

    pub fn session_state(&self, session_id: &str) -> OracleResult<SessionState> {
        Ok(self.consensus.session_state(session_id)?)
    }

    /// Close a session, returning its last snapshot.
    pub fn close_consensus_session(&self, session_id: &str) -> OracleResult<ConsensusSession> {
        Ok(self.consensus.remove_session(session_id)?)
    }

    pub fn session_count(&self) -> usize {
        self.consensus.session_count()
    }
}
