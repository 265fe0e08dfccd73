use std::sync::Arc;

use myrmex_optimizer::solver::{
    aco::AcoSearch,
    construction::{ant::Ant, heuristic::HeuristicCache},
    evaluation::SolutionEvaluator,
    pheromone::{pheromone_matrix::PheromoneMatrix, pheromone_updater::PheromoneUpdater},
    solver_params::{AcoParams, DepositPolicy, Threads},
};
use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::test_utils;

#[test]
fn test_every_solution_is_feasible() {
    let mut rng = SmallRng::seed_from_u64(2427121);

    for seed in 0..30 {
        let num_customers = rng.random_range(1..30);
        let problem = Arc::new(test_utils::random_problem(seed, num_customers));
        let params = AcoParams {
            n_ants: 5,
            n_iterations: 5,
            alpha: rng.random_range(0.0..3.0),
            beta: rng.random_range(0.0..5.0),
            exploitation: rng.random_range(0.0..1.0),
            threads: Threads::Multi(2),
            seed,
            ..AcoParams::default()
        };

        let result = AcoSearch::new(params, Arc::clone(&problem))
            .unwrap()
            .run()
            .unwrap();

        test_utils::assert_feasible(&problem, &result.best.solution);
        let recomputed: f64 = result
            .best
            .solution
            .routes()
            .iter()
            .map(|route| test_utils::route_distance(&problem, route.customers()))
            .sum();
        assert!((recomputed - result.best.total_distance).abs() < 1e-9);
    }
}

#[test]
fn test_pheromone_stays_within_bounds() {
    let mut rng = SmallRng::seed_from_u64(5);

    for seed in 0..10 {
        let problem = test_utils::random_problem(seed, 12);
        let params = AcoParams {
            tau_min: 0.05,
            tau_max: 2.0,
            tau_initial: rng.random_range(0.05..=2.0),
            evaporation_rate: rng.random_range(0.01..0.99),
            deposit_constant: rng.random_range(1.0..10_000.0),
            deposit_policy: DepositPolicy::AllAnts,
            ..AcoParams::default()
        };
        params.validate().unwrap();

        let heuristic = HeuristicCache::new(&problem, params.beta);
        let evaluator = SolutionEvaluator::new(&problem);
        let updater = PheromoneUpdater::new(&params);
        let mut pheromone = PheromoneMatrix::new(
            problem.num_locations(),
            params.tau_initial,
            params.tau_min,
            params.tau_max,
        );

        for iteration in 0..20 {
            let accepted = (0..4)
                .map(|ant| {
                    let solution =
                        Ant::new(&problem, &pheromone, &heuristic, &params, rng.random())
                            .construct()
                            .unwrap();
                    evaluator.evaluate(solution, iteration, ant).unwrap()
                })
                .collect::<Vec<_>>();

            updater.update(&mut pheromone, &accepted, 0, &accepted[0]);

            for (_, _, trail) in pheromone.iter() {
                assert!((params.tau_min..=params.tau_max).contains(&trail));
            }
        }
    }
}

#[test]
fn test_evaporation_converges_to_tau_min() {
    let mut pheromone = PheromoneMatrix::new(6, 4.0, 0.01, 4.0);
    let mut previous: Vec<f64> = pheromone.iter().map(|(_, _, trail)| trail).collect();

    for _ in 0..200 {
        pheromone.evaporate(0.1);
        pheromone.commit();

        let current: Vec<f64> = pheromone.iter().map(|(_, _, trail)| trail).collect();
        for (before, after) in previous.iter().zip(&current) {
            assert!(after <= before);
            assert!(*after >= 0.01);
        }
        previous = current;
    }

    assert!(pheromone.iter().all(|(_, _, trail)| trail == 0.01));
}

#[test]
fn test_overflowing_pheromone_scores_still_construct() {
    let problem = Arc::new(test_utils::random_problem(11, 15));
    let params = AcoParams {
        n_ants: 6,
        n_iterations: 5,
        alpha: 2.0,
        tau_min: 1.0,
        tau_max: 1e300,
        tau_initial: 1e200,
        exploitation: 0.3,
        threads: Threads::Multi(2),
        ..AcoParams::default()
    };

    let result = AcoSearch::new(params, Arc::clone(&problem))
        .unwrap()
        .run()
        .unwrap();

    test_utils::assert_feasible(&problem, &result.best.solution);
}
