use serde::Serialize;

use crate::problem::{cvrp_problem::CvrpProblem, demand::Demand, location::LocationIdx};

use super::solution::working_solution::WorkingSolution;

/// A solution that passed evaluation, with where it was found.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AcceptedSolution {
    pub solution: WorkingSolution,
    pub total_distance: f64,
    pub iteration: usize,
    pub ant: usize,
}

/// One route as reported to users: a numbered tractor with its stops.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TractorRoute {
    pub tractor: String,
    pub stops: Vec<TractorStop>,
    pub total_pallets: u32,
    pub total_weight: f64,
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TractorStop {
    pub sequence: usize,
    pub location: LocationIdx,
    pub external_id: String,
    pub pallets: u32,
    pub weight: f64,
}

impl AcceptedSolution {
    pub fn num_routes(&self) -> usize {
        self.solution.num_routes()
    }

    pub fn tractor_routes(&self, problem: &CvrpProblem) -> Vec<TractorRoute> {
        self.solution
            .routes()
            .iter()
            .enumerate()
            .map(|(index, route)| {
                let stops = route
                    .customers()
                    .iter()
                    .enumerate()
                    .map(|(sequence, &customer)| {
                        let Demand { pallets, weight } = *problem.demand(customer);
                        TractorStop {
                            sequence: sequence + 1,
                            location: customer,
                            external_id: problem.location(customer).external_id().to_owned(),
                            pallets,
                            weight,
                        }
                    })
                    .collect();

                TractorRoute {
                    tractor: format!("Tractor_{}", index + 1),
                    stops,
                    total_pallets: route.load().pallets,
                    total_weight: route.load().weight,
                    distance: route.distance(problem),
                }
            })
            .collect()
    }
}
