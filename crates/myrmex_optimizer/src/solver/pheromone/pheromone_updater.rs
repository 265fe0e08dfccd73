use tracing::trace;

use crate::solver::{
    accepted_solution::AcceptedSolution,
    solver_params::{AcoParams, DepositPolicy},
};

use super::pheromone_matrix::PheromoneMatrix;

/// Applies evaporation, deposit and clamping once per iteration.
#[derive(Debug, Clone)]
pub struct PheromoneUpdater {
    evaporation_rate: f64,
    deposit_constant: f64,
    policy: DepositPolicy,
}

impl PheromoneUpdater {
    pub fn new(params: &AcoParams) -> Self {
        PheromoneUpdater {
            evaporation_rate: params.evaporation_rate,
            deposit_constant: params.deposit_constant,
            policy: params.deposit_policy,
        }
    }

    /// `iteration_solutions` are in ant order and `iteration_best` indexes
    /// into them. `global_best` already accounts for this iteration.
    pub fn update(
        &self,
        matrix: &mut PheromoneMatrix,
        iteration_solutions: &[AcceptedSolution],
        iteration_best: usize,
        global_best: &AcceptedSolution,
    ) {
        matrix.evaporate(self.evaporation_rate);

        match self.policy {
            DepositPolicy::AllAnts => {
                for solution in iteration_solutions {
                    self.deposit(matrix, solution);
                }
            }
            DepositPolicy::IterationBest => {
                if let Some(solution) = iteration_solutions.get(iteration_best) {
                    self.deposit(matrix, solution);
                }
            }
            DepositPolicy::GlobalBest => self.deposit(matrix, global_best),
        }

        matrix.commit();

        trace!(
            version = matrix.version(),
            policy = ?self.policy,
            "Pheromone matrix updated"
        );
    }

    fn deposit(&self, matrix: &mut PheromoneMatrix, solution: &AcceptedSolution) {
        // A solution without customers has no edge to reinforce
        if solution.total_distance <= 0.0 {
            return;
        }

        let amount = self.deposit_constant / solution.total_distance;
        for route in solution.solution.routes() {
            for (from, to) in route.edges() {
                matrix.deposit(from, to, amount);
            }
        }
    }
}
