use std::sync::Arc;

use jiff::Timestamp;
use parking_lot::{MappedRwLockReadGuard, RwLock};
use schemars::JsonSchema;
use serde::Serialize;

use crate::problem::cvrp_problem::{CvrpProblem, CvrpProblemBuilder};

use super::{
    accepted_solution::AcceptedSolution,
    aco::{AcoSearch, SearchResult},
    error::SolverError,
    solver_params::AcoParams,
    statistics::IterationTrace,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, JsonSchema)]
pub enum SolverStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

pub struct Solver {
    search: AcoSearch,
    status: RwLock<SolverStatus>,
    created_at: Timestamp,
}

impl Solver {
    pub fn new(problem: CvrpProblem, params: AcoParams) -> Result<Self, SolverError> {
        let search = AcoSearch::new(params, Arc::new(problem))?;

        Ok(Solver {
            status: RwLock::new(SolverStatus::Pending),
            search,
            created_at: Timestamp::now(),
        })
    }

    pub fn on_best_solution<F>(&mut self, callback: F)
    where
        F: FnMut(&AcceptedSolution) + Send + Sync + 'static,
    {
        self.search.on_best_solution(callback);
    }

    pub fn on_iteration<F>(&mut self, callback: F)
    where
        F: FnMut(&IterationTrace) + Send + Sync + 'static,
    {
        self.search.on_iteration(callback);
    }

    pub fn solve(&self) -> Result<SearchResult, SolverError> {
        *self.status.write() = SolverStatus::Running;
        let result = self.search.run();
        *self.status.write() = match result {
            Ok(_) => SolverStatus::Completed,
            Err(_) => SolverStatus::Failed,
        };

        result
    }

    pub fn stop(&self) {
        self.search.stop();
    }

    pub fn status(&self) -> SolverStatus {
        *self.status.read()
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn problem(&self) -> &CvrpProblem {
        self.search.problem()
    }

    pub fn current_best_solution(&self) -> Option<MappedRwLockReadGuard<'_, AcceptedSolution>> {
        self.search.best_solution()
    }
}

/// Validates the problem and the parameters, then runs the search to
/// completion. Input errors surface before any ant is spawned.
pub fn solve(builder: CvrpProblemBuilder, params: AcoParams) -> Result<SearchResult, SolverError> {
    let problem = builder.build()?;
    Solver::new(problem, params)?.solve()
}
