use std::path::PathBuf;

use myrmex_optimizer::{
    parsers::{
        cvrplib::{CvrpLibParser, parse_solution_file},
        json::JsonParser,
        parser::DatasetParser,
    },
    problem::{
        capacity::{CapacityDimension, VehicleCapacity},
        cvrp_problem::{CvrpProblemBuilder, ProblemError},
        demand::Demand,
        location::{Location, LocationIdx},
        travel_cost_matrix::FnDistance,
    },
    solver::{
        aco::{AcoSearch, StopReason},
        error::SolverError,
        solver::{Solver, solve},
        solver_params::{AcoParams, Threads},
    },
};

use crate::test_utils;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("data")
        .join(name)
}

#[test]
fn test_scenario_a_respects_capacity_and_finds_optimum() {
    let problem = test_utils::scenario_a_builder().build().unwrap();
    let optimum = test_utils::brute_force_optimum(&problem);

    // 6 pallets in total, a single route can never carry everything
    assert!(!problem.capacity().holds(&problem.total_demand()));

    let result = Solver::new(problem, AcoParams::default())
        .unwrap()
        .solve()
        .unwrap();

    let best = &result.best;
    assert_eq!(best.total_distance, optimum);
    assert_eq!(best.total_distance, 83.0);
    assert_eq!(best.num_routes(), 2);

    let far_route = best
        .solution
        .routes()
        .iter()
        .find(|route| route.customers().contains(&LocationIdx::new(3)))
        .unwrap();
    assert_eq!(far_route.customers(), &[LocationIdx::new(3)]);
}

#[test]
fn test_scenario_a_from_json_document() {
    let problem = JsonParser.parse(fixture("scenario_a.json")).unwrap();

    let result = Solver::new(problem, AcoParams::default())
        .unwrap()
        .solve()
        .unwrap();

    assert_eq!(result.best.total_distance, 83.0);
}

#[test]
fn test_scenario_b_pallet_overflow_is_fatal() {
    let mut builder = test_utils::scenario_a_builder();
    builder.add_customer(Location::new("customer-4", Demand::new(6, 100.0)));
    builder.set_distance_provider(FnDistance::new(5, |_, _| 1.0));

    let error = solve(builder, AcoParams::default()).unwrap_err();

    assert!(matches!(
        error,
        SolverError::Problem(ProblemError::DemandExceedsCapacity {
            dimension: CapacityDimension::Pallets,
            ..
        })
    ));
    assert!(error.is_configuration_error());
}

#[test]
fn test_scenario_b_weight_overflow_is_fatal() {
    let mut builder = test_utils::scenario_a_builder();
    builder.add_customer(Location::new("customer-4", Demand::new(1, 3000.5)));
    builder.set_distance_provider(FnDistance::new(5, |_, _| 1.0));

    assert_eq!(
        builder.build().err(),
        Some(ProblemError::DemandExceedsCapacity {
            customer: LocationIdx::new(4),
            dimension: CapacityDimension::Weight,
        })
    );
}

#[test]
fn test_scenario_c_single_greedy_ant() {
    let params = AcoParams {
        n_ants: 1,
        n_iterations: 1,
        alpha: 0.0,
        exploitation: 1.0,
        ..AcoParams::default()
    };

    for seed in 0..20 {
        let problem = test_utils::random_problem(seed, 15);
        let expected = test_utils::greedy_routes(&problem);

        let result = Solver::new(problem, params.clone())
            .unwrap()
            .solve()
            .unwrap();

        let routes: Vec<Vec<LocationIdx>> = result
            .best
            .solution
            .routes()
            .iter()
            .map(|route| route.customers().to_vec())
            .collect();

        assert_eq!(routes, expected, "seed {seed}");
        assert_eq!(result.iterations, 1);
        assert_eq!(result.history.len(), 1);
    }
}

#[test]
fn test_problem_without_customers() {
    let mut builder = CvrpProblemBuilder::default();
    builder
        .set_depot(Location::depot("depot"))
        .set_capacity(VehicleCapacity::new(1, 1.0))
        .set_distance_provider(FnDistance::new(1, |_, _| 0.0));

    let result = solve(
        builder,
        AcoParams {
            n_iterations: 3,
            ..AcoParams::default()
        },
    )
    .unwrap();

    assert!(result.best.solution.is_empty());
    assert_eq!(result.best.total_distance, 0.0);
    assert_eq!(result.stop_reason, StopReason::IterationBudget);
}

#[test]
fn test_cvrplib_sample_is_solved_feasibly() {
    let problem = CvrpLibParser.parse(fixture("sample-n9-k3.vrp")).unwrap();
    let reference = parse_solution_file(fixture("sample-n9-k3.sol")).unwrap();

    let search = AcoSearch::new(
        AcoParams {
            n_iterations: 100,
            threads: Threads::Multi(2),
            ..AcoParams::default()
        },
        std::sync::Arc::new(problem),
    )
    .unwrap();
    let result = search.run().unwrap();

    test_utils::assert_feasible(search.problem(), &result.best.solution);
    assert!(result.best.num_routes() >= search.problem().minimum_routes());
    assert_eq!(reference, 379.0);
    assert!(result.best.total_distance > 0.0);
}
