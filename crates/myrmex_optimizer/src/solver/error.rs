use thiserror::Error;

use crate::problem::{cvrp_problem::ProblemError, location::LocationIdx};

use super::{evaluation::InvariantViolation, solver_params::ParamsError};

#[derive(Debug, Error)]
pub enum SolverError {
    #[error("Invalid problem: {0}")]
    Problem(#[from] ProblemError),

    #[error(transparent)]
    Params(#[from] ParamsError),

    #[error("Customer {customer} does not fit into an empty vehicle")]
    InfeasibleInput { customer: LocationIdx },

    #[error("Internal invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),

    #[error("Failed to build ant thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl SolverError {
    /// Whether the error comes from the input rather than from a defect in
    /// the solver itself.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            SolverError::Problem(_) | SolverError::Params(_) | SolverError::InfeasibleInput { .. }
        )
    }
}
