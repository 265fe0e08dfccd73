use std::sync::Arc;

use myrmex_optimizer::solver::{
    aco::{AcoSearch, SearchResult},
    solver_params::{AcoParams, DepositPolicy, Threads},
};

use crate::test_utils;

fn run(seed: u64, threads: Threads, policy: DepositPolicy) -> SearchResult {
    let problem = Arc::new(test_utils::random_problem(11, 25));
    let params = AcoParams {
        n_ants: 12,
        n_iterations: 15,
        seed,
        threads,
        deposit_policy: policy,
        ..AcoParams::default()
    };

    AcoSearch::new(params, problem).unwrap().run().unwrap()
}

fn assert_same_run(a: &SearchResult, b: &SearchResult) {
    assert_eq!(
        serde_json::to_string(&a.best.solution).unwrap(),
        serde_json::to_string(&b.best.solution).unwrap()
    );
    assert_eq!(a.best.total_distance, b.best.total_distance);
    assert_eq!(a.best.iteration, b.best.iteration);
    assert_eq!(a.best.ant, b.best.ant);
    assert_eq!(a.history.distances(), b.history.distances());
}

#[test]
fn test_same_seed_reproduces_run() {
    let first = run(7, Threads::Multi(4), DepositPolicy::AllAnts);
    let second = run(7, Threads::Multi(4), DepositPolicy::AllAnts);

    assert_same_run(&first, &second);
}

#[test]
fn test_thread_count_does_not_change_result() {
    for policy in [
        DepositPolicy::AllAnts,
        DepositPolicy::IterationBest,
        DepositPolicy::GlobalBest,
    ] {
        let single = run(2427121, Threads::Single, policy);
        let multi = run(2427121, Threads::Multi(3), policy);

        assert_same_run(&single, &multi);
    }
}

#[test]
fn test_history_rows_follow_iterations() {
    let result = run(1, Threads::Multi(2), DepositPolicy::IterationBest);

    let iterations: Vec<usize> = result
        .history
        .distances()
        .iter()
        .map(|(iteration, _, _)| *iteration)
        .collect();
    assert_eq!(iterations, (0..15).collect::<Vec<_>>());
}
