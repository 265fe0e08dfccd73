use serde::Serialize;

use crate::problem::{cvrp_problem::CvrpProblem, location::LocationIdx, travel_cost_matrix::Distance};

use super::route::Route;

/// Routes produced by one ant.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WorkingSolution {
    routes: Vec<Route>,
}

impl WorkingSolution {
    pub fn new(routes: Vec<Route>) -> Self {
        WorkingSolution { routes }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn num_routes(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn customers_iter(&self) -> impl Iterator<Item = LocationIdx> + '_ {
        self.routes
            .iter()
            .flat_map(|route| route.customers().iter().copied())
    }

    pub fn total_distance(&self, problem: &CvrpProblem) -> Distance {
        self.routes.iter().map(|route| route.distance(problem)).sum()
    }
}
