use criterion::{criterion_group, criterion_main, Criterion};

use oracle_core::config::SimulationConfig;
use oracle_simulation::{run_candidates, sample};

fn bench_sample_1k(c: &mut Criterion) {
    let query = test_fixtures::query("her2_breast_stage2");
    let model = test_fixtures::model("standard_1000");

    c.bench_function("sample_1000_universes", |b| {
        b.iter(|| sample(&query, &model, 42).unwrap());
    });
}

fn bench_two_candidates_1k(c: &mut Criterion) {
    let query = test_fixtures::query("her2_breast_stage2");
    let candidates = test_fixtures::candidates("her2_breast");
    let model = test_fixtures::model("standard_1000");
    let config = SimulationConfig::default();

    c.bench_function("two_candidates_1000_universes_12_months", |b| {
        b.iter(|| run_candidates(&query, &candidates, &model, 42, &config, None).unwrap());
    });
}

criterion_group!(benches, bench_sample_1k, bench_two_candidates_1k);
criterion_main!(benches);
