//! Async job surface on the tokio runtime.

use std::sync::Arc;
use std::time::Duration;

use oracle_core::config::OracleConfig;
use oracle_core::errors::{OracleError, OracleErrorCode, SimulationError};
use oracle_core::models::UncertaintyModel;
use oracle_engine::{JobStatus, TreatmentOracle};

fn oracle_with(config: OracleConfig) -> Arc<TreatmentOracle> {
    Arc::new(TreatmentOracle::new(config).unwrap())
}

/// Enough work that no run finishes within a few milliseconds.
fn heavy_model() -> UncertaintyModel {
    UncertaintyModel::new(50_000, 120)
        .with_factor("toxicity", 0.5)
        .with_seed(3)
}

async fn wait_until_finished(oracle: &TreatmentOracle, job_id: &str) -> JobStatus {
    for _ in 0..3_000 {
        let status = oracle.poll_simulation(job_id).unwrap();
        if status.is_finished() {
            return status;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job {job_id} did not finish");
}

#[tokio::test]
async fn submitted_job_completes() {
    let oracle = oracle_with(OracleConfig::default());
    let query = test_fixtures::query("her2_breast_stage2");
    let candidates = test_fixtures::candidates("her2_breast");
    let model = UncertaintyModel::new(100, 12).with_seed(8);

    let job = oracle.submit_simulation(query.clone(), candidates.clone(), model.clone());
    let status = wait_until_finished(&oracle, &job).await;
    let JobStatus::Completed(rec) = status else {
        panic!("expected completion, got {status:?}");
    };

    let direct = oracle.run_simulation(&query, &candidates, &model).unwrap();
    assert_eq!(rec.primary.name(), direct.primary.name());
    assert_eq!(rec.primary.aggregate, direct.primary.aggregate);
}

#[tokio::test]
async fn invalid_job_fails() {
    let oracle = oracle_with(OracleConfig::default());
    let query = test_fixtures::query("her2_breast_stage2");
    let job = oracle.submit_simulation(query, vec![], UncertaintyModel::new(10, 12));
    let status = wait_until_finished(&oracle, &job).await;
    assert_eq!(
        status,
        JobStatus::Failed(OracleError::Simulation(SimulationError::NoCandidates))
    );
}

#[tokio::test]
async fn cancelled_job_reports_cancelled() {
    let oracle = oracle_with(OracleConfig::default());
    let query = test_fixtures::query("nsclc_stage4");
    let candidates = test_fixtures::candidates("nsclc_egfr");

    let job = oracle.submit_simulation(query, candidates, heavy_model());
    oracle.cancel_job(&job).unwrap();
    assert_eq!(oracle.poll_simulation(&job).unwrap(), JobStatus::Cancelled);

    // The background task must not overwrite the cancellation.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(oracle.poll_simulation(&job).unwrap(), JobStatus::Cancelled);
    assert_eq!(oracle.forget_job(&job), Some(JobStatus::Cancelled));
}

#[tokio::test]
async fn finished_jobs_are_kept_until_forgotten() {
    let oracle = oracle_with(OracleConfig::default());
    let query = test_fixtures::query("her2_breast_stage2");
    let candidates = test_fixtures::candidates("her2_breast");
    let job = oracle.submit_simulation(query, candidates, UncertaintyModel::new(20, 6).with_seed(4));
    let finished = wait_until_finished(&oracle, &job).await;
    assert!(matches!(finished, JobStatus::Completed(_)));

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(oracle.poll_simulation(&job).unwrap(), finished);
    assert_eq!(oracle.job_count(), 1);

    assert_eq!(oracle.forget_job(&job), Some(finished));
    assert_eq!(oracle.job_count(), 0);
    let err = oracle.poll_simulation(&job).unwrap_err();
    assert_eq!(err.error_code(), "JOB_NOT_FOUND");
    assert_eq!(oracle.forget_job(&job), None);
}

#[tokio::test]
async fn unknown_job_is_reported() {
    let oracle = oracle_with(OracleConfig::default());
    let err = oracle.poll_simulation("nope").unwrap_err();
    assert_eq!(err.error_code(), "JOB_NOT_FOUND");
    assert!(oracle.cancel_job("nope").is_err());
}

#[tokio::test]
async fn deadline_expiry_is_a_timeout() {
    let oracle = oracle_with(OracleConfig::default());
    let query = test_fixtures::query("nsclc_stage4");
    let candidates = test_fixtures::candidates("nsclc_egfr");

    let err = oracle
        .run_simulation_with_deadline(query, candidates, heavy_model(), Duration::from_millis(5))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        OracleError::Simulation(SimulationError::SimulationTimeout { deadline_ms: 5 })
    );
}

#[tokio::test]
async fn generous_deadline_returns_recommendation() {
    let oracle = oracle_with(OracleConfig::default());
    let query = test_fixtures::query("her2_breast_stage2");
    let candidates = test_fixtures::candidates("her2_breast");
    let rec = oracle
        .run_simulation_with_deadline(
            query,
            candidates,
            UncertaintyModel::new(50, 6).with_seed(2),
            Duration::from_secs(60),
        )
        .await
        .unwrap();
    assert_eq!(rec.report.universe_count, 50);
}

#[tokio::test]
async fn configured_job_deadline_fails_the_job() {
    let mut config = OracleConfig::default();
    config.simulation.job_deadline_ms = 5;
    let oracle = oracle_with(config);
    let query = test_fixtures::query("nsclc_stage4");
    let candidates = test_fixtures::candidates("nsclc_egfr");

    let job = oracle.submit_simulation(query, candidates, heavy_model());
    let status = wait_until_finished(&oracle, &job).await;
    assert_eq!(
        status,
        JobStatus::Failed(OracleError::Simulation(SimulationError::SimulationTimeout {
            deadline_ms: 5
        }))
    );
}
