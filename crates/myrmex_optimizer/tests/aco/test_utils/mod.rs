use myrmex_optimizer::{
    problem::{
        capacity::{VehicleCapacity, fits},
        cvrp_problem::{CvrpProblem, CvrpProblemBuilder},
        demand::Demand,
        distance_method::DistanceMethod,
        location::{DEPOT, Location, LocationIdx},
        travel_cost_matrix::DistanceMatrix,
    },
    solver::solution::working_solution::WorkingSolution,
};
use rand::{Rng, SeedableRng, rngs::SmallRng};

/// Customers 1 and 2 are next to each other, customer 3 is far away.
/// Demands as (pallets, weight): (2, 1000), (3, 1500), (1, 500).
pub fn scenario_a_builder() -> CvrpProblemBuilder {
    let mut builder = CvrpProblemBuilder::default();
    builder
        .set_id("scenario-a")
        .set_depot(Location::depot("depot"))
        .set_customers(vec![
            Location::new("customer-1", Demand::new(2, 1000.0)),
            Location::new("customer-2", Demand::new(3, 1500.0)),
            Location::new("customer-3", Demand::new(1, 500.0)),
        ])
        .set_capacity(VehicleCapacity::new(5, 3000.0))
        .set_distance_provider(
            DistanceMatrix::new(vec![
                vec![0.0, 10.0, 11.0, 30.0],
                vec![10.0, 0.0, 2.0, 35.0],
                vec![11.0, 2.0, 0.0, 34.0],
                vec![30.0, 35.0, 34.0, 0.0],
            ])
            .unwrap(),
        );

    builder
}

/// Random instance on a 100 x 100 square. Every demand fits an empty vehicle.
pub fn random_problem(seed: u64, num_customers: usize) -> CvrpProblem {
    let mut rng = SmallRng::seed_from_u64(seed);
    let capacity = VehicleCapacity::new(
        rng.random_range(4..=12),
        rng.random_range(1000.0..5000.0),
    );

    let mut builder = CvrpProblemBuilder::default();
    builder.set_depot(
        Location::depot("depot")
            .with_cartesian(rng.random_range(0.0..100.0), rng.random_range(0.0..100.0)),
    );

    for index in 0..num_customers {
        let demand = Demand::new(
            rng.random_range(0..=capacity.pallet_limit),
            rng.random_range(0.0..=capacity.weight_limit),
        );
        builder.add_customer(
            Location::new(format!("c{index}"), demand)
                .with_cartesian(rng.random_range(0.0..100.0), rng.random_range(0.0..100.0)),
        );
    }

    builder
        .set_capacity(capacity)
        .set_distance_method(DistanceMethod::Euclidean);

    builder.build().unwrap()
}

/// Serves every customer exactly once within capacity.
pub fn assert_feasible(problem: &CvrpProblem, solution: &WorkingSolution) {
    let mut visits = vec![0; problem.num_locations()];

    for route in solution.routes() {
        assert!(!route.is_empty());

        let mut load = Demand::ZERO;
        for &customer in route.customers() {
            assert_ne!(customer, DEPOT);
            assert!(fits(&load, problem.demand(customer), problem.capacity()));
            load += problem.demand(customer);
            visits[customer.get()] += 1;
        }
    }

    for customer in problem.customers_iter() {
        assert_eq!(visits[customer.get()], 1, "customer {customer}");
    }
}

/// Independent nearest-neighbour walk: always go to the closest unvisited
/// customer that still fits (lowest index on ties), otherwise return to the
/// depot and start a new route.
pub fn greedy_routes(problem: &CvrpProblem) -> Vec<Vec<LocationIdx>> {
    let mut unvisited: Vec<LocationIdx> = problem.customers_iter().collect();
    let mut routes = Vec::new();

    while !unvisited.is_empty() {
        let mut route = Vec::new();
        let mut load = Demand::ZERO;
        let mut position = DEPOT;

        loop {
            let mut nearest: Option<(usize, f64)> = None;
            for (slot, &customer) in unvisited.iter().enumerate() {
                if !fits(&load, problem.demand(customer), problem.capacity()) {
                    continue;
                }

                let distance = problem.distance(position, customer);
                if nearest.is_none_or(|(_, best)| distance < best) {
                    nearest = Some((slot, distance));
                }
            }

            let Some((slot, _)) = nearest else {
                break;
            };

            let customer = unvisited.remove(slot);
            load += problem.demand(customer);
            position = customer;
            route.push(customer);
        }

        assert!(!route.is_empty(), "greedy walk starved");
        routes.push(route);
    }

    routes
}

/// Exhaustive optimum over every ordered split of the customers into
/// capacity feasible routes. Only usable for a handful of customers.
pub fn brute_force_optimum(problem: &CvrpProblem) -> f64 {
    let customers: Vec<LocationIdx> = problem.customers_iter().collect();
    let mut best = f64::INFINITY;

    for permutation in permutations(&customers) {
        let splits = permutation.len().saturating_sub(1);
        for mask in 0..(1usize << splits) {
            let mut routes: Vec<Vec<LocationIdx>> = vec![Vec::new()];
            for (position, &customer) in permutation.iter().enumerate() {
                if position > 0 && mask & (1 << (position - 1)) != 0 {
                    routes.push(Vec::new());
                }
                if let Some(route) = routes.last_mut() {
                    route.push(customer);
                }
            }

            let feasible = routes.iter().all(|route| {
                let load: Demand = route
                    .iter()
                    .map(|&customer| *problem.demand(customer))
                    .sum();
                problem.capacity().holds(&load)
            });

            if feasible {
                let distance: f64 = routes
                    .iter()
                    .map(|route| route_distance(problem, route))
                    .sum();
                best = best.min(distance);
            }
        }
    }

    best
}

pub fn route_distance(problem: &CvrpProblem, route: &[LocationIdx]) -> f64 {
    let mut stops = vec![DEPOT];
    stops.extend_from_slice(route);
    stops.push(DEPOT);

    stops
        .windows(2)
        .map(|leg| problem.distance(leg[0], leg[1]))
        .sum()
}

fn permutations(items: &[LocationIdx]) -> Vec<Vec<LocationIdx>> {
    if items.len() <= 1 {
        return vec![items.to_vec()];
    }

    let mut result = Vec::new();
    for (index, &item) in items.iter().enumerate() {
        let mut rest = items.to_vec();
        rest.remove(index);
        for mut permutation in permutations(&rest) {
            permutation.insert(0, item);
            result.push(permutation);
        }
    }

    result
}
