use serde::Serialize;

use crate::problem::{
    cvrp_problem::CvrpProblem,
    demand::Demand,
    location::{DEPOT, LocationIdx},
    travel_cost_matrix::Distance,
};

/// Ordered customers served by one vehicle. The depot is implicit at both
/// ends and never stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Route {
    customers: Vec<LocationIdx>,
    load: Demand,
}

impl Route {
    pub fn new() -> Self {
        Route::default()
    }

    pub fn push(&mut self, customer: LocationIdx, demand: &Demand) {
        self.customers.push(customer);
        self.load += demand;
    }

    pub fn customers(&self) -> &[LocationIdx] {
        &self.customers
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    /// Cumulative demand of the customers on the route.
    pub fn load(&self) -> &Demand {
        &self.load
    }

    /// Location visited at `position`, where 0 and `len() + 1` are the depot.
    #[inline]
    fn stop(&self, position: usize) -> LocationIdx {
        if position == 0 || position > self.customers.len() {
            DEPOT
        } else {
            self.customers[position - 1]
        }
    }

    /// Traversed directed edges, depot legs included. An empty route has none.
    pub fn edges(&self) -> impl Iterator<Item = (LocationIdx, LocationIdx)> + '_ {
        let num_edges = if self.customers.is_empty() {
            0
        } else {
            self.customers.len() + 1
        };

        (0..num_edges).map(move |position| (self.stop(position), self.stop(position + 1)))
    }

    pub fn distance(&self, problem: &CvrpProblem) -> Distance {
        self.edges()
            .map(|(from, to)| problem.distance(from, to))
            .sum()
    }
}
