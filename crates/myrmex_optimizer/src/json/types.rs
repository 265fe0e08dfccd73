use anyhow::anyhow;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    problem::{
        capacity::VehicleCapacity,
        cvrp_problem::{CvrpProblem, CvrpProblemBuilder},
        demand::Demand,
        distance_method::DistanceMethod,
        location::Location,
        travel_cost_matrix::DistanceMatrix,
    },
    solver::aco::{SearchResult, StopReason},
};

pub trait FromProblem<T> {
    fn from_problem(value: T, problem: &CvrpProblem) -> Self;
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "CvrpProblem")]
pub struct JsonCvrpProblem {
    pub id: Option<String>,
    pub depot: JsonDepot,
    pub customers: Vec<JsonCustomer>,
    pub capacity: JsonCapacity,
    pub distances: JsonDistances,
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "Depot")]
pub struct JsonDepot {
    pub id: String,
    /// `[x, y]`, or `[longitude, latitude]` with the haversine method.
    pub coordinates: Option<[f64; 2]>,
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "Customer")]
pub struct JsonCustomer {
    pub id: String,
    pub pallets: u32,
    #[serde(default)]
    pub weight: f64,
    pub coordinates: Option<[f64; 2]>,
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "Capacity")]
pub struct JsonCapacity {
    pub pallets: u32,
    pub weight: f64,
}

/// Where travel distances come from: computed from coordinates or given as a
/// square matrix ordered depot first, then customers.
#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case", rename = "Distances")]
pub enum JsonDistances {
    Method(DistanceMethod),
    Matrix(Vec<Vec<f64>>),
}

fn with_coordinates(location: Location, coordinates: Option<[f64; 2]>) -> Location {
    match coordinates {
        Some([x, y]) => location.with_cartesian(x, y),
        None => location,
    }
}

impl JsonCvrpProblem {
    pub fn build_problem(self) -> Result<CvrpProblem, anyhow::Error> {
        let mut builder = CvrpProblemBuilder::default();

        if let Some(id) = self.id {
            builder.set_id(id);
        }

        builder
            .set_depot(with_coordinates(
                Location::depot(self.depot.id),
                self.depot.coordinates,
            ))
            .set_customers(
                self.customers
                    .into_iter()
                    .map(|customer| {
                        with_coordinates(
                            Location::new(
                                customer.id,
                                Demand::new(customer.pallets, customer.weight),
                            ),
                            customer.coordinates,
                        )
                    })
                    .collect(),
            )
            .set_capacity(VehicleCapacity::new(
                self.capacity.pallets,
                self.capacity.weight,
            ));

        match self.distances {
            JsonDistances::Method(method) => {
                builder.set_distance_method(method);
            }
            JsonDistances::Matrix(rows) => {
                let matrix = DistanceMatrix::new(rows)
                    .ok_or_else(|| anyhow!("Distance matrix must be square"))?;
                builder.set_distance_provider(matrix);
            }
        }

        Ok(builder.build()?)
    }
}

#[derive(Serialize, JsonSchema)]
#[serde(rename = "Solution")]
pub struct JsonSolution {
    pub problem_id: Option<String>,
    pub total_distance: f64,
    pub iterations: usize,
    pub stop_reason: String,
    pub found_at_iteration: usize,
    pub tractors: Vec<JsonTractor>,
}

#[derive(Serialize, JsonSchema)]
#[serde(rename = "Tractor")]
pub struct JsonTractor {
    pub tractor: String,
    pub distance: f64,
    pub total_pallets: u32,
    pub total_weight: f64,
    pub stops: Vec<JsonStop>,
}

#[derive(Serialize, JsonSchema)]
#[serde(rename = "Stop")]
pub struct JsonStop {
    pub sequence: usize,
    pub id: String,
    pub pallets: u32,
    pub weight: f64,
}

fn stop_reason_name(reason: StopReason) -> &'static str {
    match reason {
        StopReason::IterationBudget => "iteration_budget",
        StopReason::Stagnation => "stagnation",
        StopReason::TimeLimit => "time_limit",
        StopReason::Cancelled => "cancelled",
    }
}

impl FromProblem<&SearchResult> for JsonSolution {
    fn from_problem(value: &SearchResult, problem: &CvrpProblem) -> Self {
        let tractors = value
            .best
            .tractor_routes(problem)
            .into_iter()
            .map(|route| JsonTractor {
                tractor: route.tractor,
                distance: route.distance,
                total_pallets: route.total_pallets,
                total_weight: route.total_weight,
                stops: route
                    .stops
                    .into_iter()
                    .map(|stop| JsonStop {
                        sequence: stop.sequence,
                        id: stop.external_id,
                        pallets: stop.pallets,
                        weight: stop.weight,
                    })
                    .collect(),
            })
            .collect();

        JsonSolution {
            problem_id: problem.id().map(str::to_owned),
            total_distance: value.best.total_distance,
            iterations: value.iterations,
            stop_reason: stop_reason_name(value.stop_reason).to_owned(),
            found_at_iteration: value.best.iteration,
            tractors,
        }
    }
}
