/// Profiler friendly version of the hard-sphere PY solve.

use criterion::{criterion_group, criterion_main, Criterion};

use oz_solver::{solve, SolverConfig};

fn run() {
    let mut cfg = SolverConfig::default();
    cfg.nodes = 4096;
    cfg.r_max = 160.0;
    cfg.nrho = 100;
    cfg.potential_id = 7;
    cfg.closure_name = "PY".to_string();
    cfg.phi = 0.4;
    cfg.num_threads = 4;
    solve(cfg).unwrap();
}

fn my_benchmark(c: &mut Criterion) {
    c.bench_function("hard_sphere_py_full_ramp", |b| b.iter(|| run()));
}

criterion_group!{
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = my_benchmark
}
criterion_main!(benches);
