/// Profiler friendly version of a Rogers-Young density ramp (the most
/// expensive catalogue entry: the consistency loop re-solves the whole ramp
/// at every bisection step).

use criterion::{criterion_group, criterion_main, Criterion};

use oz_solver::{solve, SolverConfig};

fn run() {
    let mut cfg = SolverConfig::default();
    cfg.nodes = 2048;
    cfg.r_max = 80.0;
    cfg.nrho = 50;
    cfg.potential_id = 13;
    cfg.closure_name = "RY".to_string();
    cfg.phi = 0.35;
    cfg.num_threads = 4;
    solve(cfg).unwrap();
}

fn my_benchmark(c: &mut Criterion) {
    c.bench_function("hertzian_ry_consistency_ramp", |b| b.iter(|| run()));
}

criterion_group!{
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = my_benchmark
}
criterion_main!(benches);
