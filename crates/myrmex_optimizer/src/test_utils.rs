use std::{path::PathBuf, sync::Arc};

use crate::problem::{
    capacity::VehicleCapacity,
    cvrp_problem::{CvrpProblem, CvrpProblemBuilder},
    demand::Demand,
    distance_method::DistanceMethod,
    location::{Location, LocationIdx},
    travel_cost_matrix::FnDistance,
};

pub fn data_fixture_path(fixture: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("data")
        .join(fixture)
}

fn line_distance(
    num_locations: usize,
) -> FnDistance<impl Fn(LocationIdx, LocationIdx) -> f64 + Send + Sync> {
    FnDistance::new(num_locations, |from: LocationIdx, to: LocationIdx| {
        (from.get() as f64 - to.get() as f64).abs()
    })
}

/// Depot at 0 and `num_customers` customers at 1, 2, ... on a line, each
/// demanding 2 pallets and 100 weight.
pub fn line_problem(num_customers: usize, pallet_limit: u32, weight_limit: f64) -> CvrpProblem {
    let mut builder = CvrpProblemBuilder::default();
    builder
        .set_depot(Location::depot("depot"))
        .set_customers(
            (1..=num_customers)
                .map(|index| Location::new(format!("c{index}"), Demand::new(2, 100.0)))
                .collect(),
        )
        .set_capacity(VehicleCapacity::new(pallet_limit, weight_limit))
        .set_distance_provider(line_distance(num_customers + 1));

    builder.build().unwrap()
}

pub fn create_location_grid(num_locations: usize) -> Vec<(f64, f64)> {
    let cols = (num_locations as f64).sqrt().ceil().max(1.0) as usize;
    (0..num_locations)
        .map(|index| ((index % cols) as f64, (index / cols) as f64))
        .collect()
}

/// Depot at the grid origin and customers on the remaining grid points with
/// demands cycling through 1..=3 pallets and 500..=1250 weight.
pub fn grid_problem(num_customers: usize, capacity: VehicleCapacity) -> CvrpProblem {
    let points = create_location_grid(num_customers + 1);

    let mut builder = CvrpProblemBuilder::default();
    builder.set_depot(Location::depot("depot").with_cartesian(points[0].0, points[0].1));
    for (index, &(x, y)) in points.iter().enumerate().skip(1) {
        let demand = Demand::new(1 + (index % 3) as u32, 500.0 + 250.0 * (index % 4) as f64);
        builder.add_customer(Location::new(format!("c{index}"), demand).with_cartesian(x, y));
    }
    builder
        .set_capacity(capacity)
        .set_distance_method(DistanceMethod::Euclidean);

    builder.build().unwrap()
}

/// Line problem with arbitrary demands that skips validation.
pub fn unchecked_problem(demands: Vec<Demand>, capacity: VehicleCapacity) -> CvrpProblem {
    let mut locations = vec![Location::depot("depot")];
    locations.extend(
        demands
            .into_iter()
            .enumerate()
            .map(|(index, demand)| Location::new(format!("c{}", index + 1), demand)),
    );

    let num_locations = locations.len();
    CvrpProblem::new_unchecked(locations, capacity, Arc::new(line_distance(num_locations)))
}
