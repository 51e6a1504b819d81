//! Oracle benchmarks.
//!
//! These benchmarks replay symbolic-execution-like workloads: many path
//! conditions sharing long prefixes, queried over and over.
//!
//! Run with:
//! ```bash
//! cargo bench --bench oracle
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use satexpr::backend::{Backend, BackendKind};
use satexpr::config::Config;
use satexpr::formula::Formula;

// ============================================================================
// Helper: random branch conditions
// ============================================================================

/// Random 2-literal clauses over fresh inputs.
fn random_conditions(oracle: &mut Backend, num_vars: usize, depth: usize, seed: u64) -> Vec<Formula> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let inputs: Vec<Formula> = (0..num_vars).map(|_| oracle.new_var()).collect();
    let mut conditions = Vec::with_capacity(depth);
    for _ in 0..depth {
        let mut lits = [inputs[0]; 2];
        for lit in lits.iter_mut() {
            let v = inputs[rng.gen_range(0..num_vars)];
            *lit = if rng.gen_bool(0.5) { oracle.not(v) } else { v };
        }
        conditions.push(oracle.or(lits[0], lits[1]));
    }
    conditions
}

/// Depth-first exploration, pruning infeasible prefixes. Returns the number of feasible leaves.
fn explore(oracle: &mut Backend, conditions: &[Formula], pc: Formula) -> usize {
    if !oracle.is_sat(pc).unwrap() {
        return 0;
    }
    let Some((&cond, rest)) = conditions.split_first() else {
        return 1;
    };
    let taken = oracle.and(pc, cond);
    let not_cond = oracle.not(cond);
    let skipped = oracle.and(pc, not_cond);
    explore(oracle, rest, taken) + explore(oracle, rest, skipped)
}

// ============================================================================
// Benchmark: path exploration
// ============================================================================

fn bench_path_exploration(c: &mut Criterion) {
    let mut group = c.benchmark_group("oracle/path_exploration");

    let num_vars = 12;
    let depth = 10;
    let seed = 42;

    for kind in BackendKind::ALL {
        for precheck in [false, true] {
            let config = Config::default().with_backend(kind).with_fraig_precheck(precheck);
            group.bench_with_input(
                BenchmarkId::new(kind.name(), if precheck { "precheck" } else { "exact" }),
                &config,
                |b, config| {
                    b.iter(|| {
                        let mut oracle = Backend::from_config(config).unwrap();
                        let conditions = random_conditions(&mut oracle, num_vars, depth, seed);
                        let root = oracle.const_true();
                        explore(&mut oracle, &conditions, root)
                    });
                },
            );
        }
    }

    group.finish();
}

// ============================================================================
// Benchmark: repeated queries (cache effectiveness)
// ============================================================================

fn bench_repeated_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("oracle/repeated_queries");

    for kind in BackendKind::ALL {
        let mut oracle = Backend::configure(kind).unwrap();
        let conditions = random_conditions(&mut oracle, 20, 30, 7);
        let pc = oracle.and_many(conditions);
        oracle.is_sat(pc).unwrap();

        group.bench_function(BenchmarkId::new(kind.name(), "cached"), |b| {
            b.iter(|| oracle.is_sat(pc).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_path_exploration, bench_repeated_queries);

criterion_main!(benches);
