use fxhash::FxHashSet;
use thiserror::Error;

use crate::problem::{
    capacity::CapacityDimension, cvrp_problem::CvrpProblem, demand::Demand,
    location::LocationIdx,
};

use super::{accepted_solution::AcceptedSolution, solution::working_solution::WorkingSolution};

/// A constructed solution breaks the CVRP rules. Always a solver defect, never
/// an input problem.
#[derive(Debug, Error, PartialEq)]
pub enum InvariantViolation {
    #[error("Customer {0} is not served by any route")]
    MissingCustomer(LocationIdx),

    #[error("Customer {0} is served more than once")]
    DuplicateCustomer(LocationIdx),

    #[error("Route {route} visits {location} which is not a customer")]
    NotACustomer { route: usize, location: LocationIdx },

    #[error("Route {0} is empty")]
    EmptyRoute(usize),

    #[error("Route {route} exceeds its {dimension} capacity at customer {customer}")]
    OverCapacity {
        route: usize,
        customer: LocationIdx,
        dimension: CapacityDimension,
    },

    #[error("Route {route} reports a load that does not match its customers")]
    LoadMismatch { route: usize },
}

pub struct SolutionEvaluator<'a> {
    problem: &'a CvrpProblem,
}

impl<'a> SolutionEvaluator<'a> {
    pub fn new(problem: &'a CvrpProblem) -> Self {
        SolutionEvaluator { problem }
    }

    /// Checks that every customer is served exactly once within capacity and
    /// attaches the total distance.
    pub fn evaluate(
        &self,
        solution: WorkingSolution,
        iteration: usize,
        ant: usize,
    ) -> Result<AcceptedSolution, InvariantViolation> {
        self.verify(&solution)?;

        Ok(AcceptedSolution {
            total_distance: solution.total_distance(self.problem),
            solution,
            iteration,
            ant,
        })
    }

    pub fn verify(&self, solution: &WorkingSolution) -> Result<(), InvariantViolation> {
        let capacity = self.problem.capacity();
        let mut served = FxHashSet::default();

        for (route_index, route) in solution.routes().iter().enumerate() {
            if route.is_empty() {
                return Err(InvariantViolation::EmptyRoute(route_index));
            }

            let mut load = Demand::ZERO;
            for &customer in route.customers() {
                if !self.problem.is_customer(customer) {
                    return Err(InvariantViolation::NotACustomer {
                        route: route_index,
                        location: customer,
                    });
                }

                if !served.insert(customer) {
                    return Err(InvariantViolation::DuplicateCustomer(customer));
                }

                load += self.problem.demand(customer);
                if let Some(dimension) = capacity.exceeded_dimension(&load) {
                    return Err(InvariantViolation::OverCapacity {
                        route: route_index,
                        customer,
                        dimension,
                    });
                }
            }

            if load != *route.load() {
                return Err(InvariantViolation::LoadMismatch { route: route_index });
            }
        }

        if let Some(missing) = self
            .problem
            .customers_iter()
            .find(|customer| !served.contains(customer))
        {
            return Err(InvariantViolation::MissingCustomer(missing));
        }

        Ok(())
    }
}
