use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use jiff::{SignedDuration, Timestamp};
use parking_lot::{MappedRwLockReadGuard, Mutex, RwLock, RwLockReadGuard};
use rand::{Rng, SeedableRng, rngs::SmallRng};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, trace};

use crate::{problem::cvrp_problem::CvrpProblem, timer_debug};

use super::{
    accepted_solution::AcceptedSolution,
    construction::{ant::Ant, heuristic::HeuristicCache},
    error::SolverError,
    evaluation::SolutionEvaluator,
    pheromone::{pheromone_matrix::PheromoneMatrix, pheromone_updater::PheromoneUpdater},
    solution::working_solution::WorkingSolution,
    solver_params::{AcoParams, Termination},
    statistics::{ConvergenceHistory, IterationTrace},
};

type BestSolutionHandler = Arc<Mutex<dyn FnMut(&AcceptedSolution) + Send + Sync + 'static>>;
type IterationHandler = Arc<Mutex<dyn FnMut(&IterationTrace) + Send + Sync + 'static>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StopReason {
    IterationBudget,
    Stagnation,
    TimeLimit,
    Cancelled,
}

impl From<&Termination> for StopReason {
    fn from(termination: &Termination) -> Self {
        match termination {
            Termination::Iterations(_) => StopReason::IterationBudget,
            Termination::IterationsWithoutImprovement(_) => StopReason::Stagnation,
            Termination::Duration(_) => StopReason::TimeLimit,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub best: AcceptedSolution,
    pub history: ConvergenceHistory,
    pub iterations: usize,
    pub stop_reason: StopReason,
    pub duration: SignedDuration,
}

struct SearchState {
    start: Timestamp,
    iteration: usize,
    iterations_without_improvement: usize,
    global_best: Option<AcceptedSolution>,
    history: ConvergenceHistory,
}

/// Ant colony search loop.
///
/// Every iteration has two phases. CONSTRUCT runs the ants in parallel
/// against a shared `&PheromoneMatrix`; UPDATE takes the matrix by `&mut`
/// once all of them are collected, so no ant can observe a half-applied
/// update.
pub struct AcoSearch {
    problem: Arc<CvrpProblem>,
    params: AcoParams,
    best_solution: Arc<RwLock<Option<AcceptedSolution>>>,
    on_best_solution_handler: Option<BestSolutionHandler>,
    on_iteration_handler: Option<IterationHandler>,
    is_stopped: Arc<AtomicBool>,
}

impl AcoSearch {
    pub fn new(params: AcoParams, problem: Arc<CvrpProblem>) -> Result<Self, SolverError> {
        params.validate()?;

        Ok(AcoSearch {
            problem,
            params,
            best_solution: Arc::new(RwLock::new(None)),
            on_best_solution_handler: None,
            on_iteration_handler: None,
            is_stopped: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn problem(&self) -> &CvrpProblem {
        &self.problem
    }

    pub fn params(&self) -> &AcoParams {
        &self.params
    }

    pub fn on_best_solution<F>(&mut self, callback: F)
    where
        F: FnMut(&AcceptedSolution) + Send + Sync + 'static,
    {
        self.on_best_solution_handler = Some(Arc::new(Mutex::new(callback)));
    }

    pub fn on_iteration<F>(&mut self, callback: F)
    where
        F: FnMut(&IterationTrace) + Send + Sync + 'static,
    {
        self.on_iteration_handler = Some(Arc::new(Mutex::new(callback)));
    }

    pub fn best_solution(&self) -> Option<MappedRwLockReadGuard<'_, AcceptedSolution>> {
        RwLockReadGuard::try_map(self.best_solution.read(), |solution| solution.as_ref()).ok()
    }

    /// Requests the search to stop once the running iteration is fully applied.
    pub fn stop(&self) {
        self.is_stopped.store(true, Ordering::Relaxed);
    }

    /// Shared flag flipped by [`AcoSearch::stop`], for callers that need to
    /// cancel from another thread or from a callback.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.is_stopped)
    }

    fn create_thread_pool(&self) -> Result<rayon::ThreadPool, SolverError> {
        Ok(rayon::ThreadPoolBuilder::new()
            .num_threads(self.params.threads.number_of_threads())
            .build()?)
    }

    pub fn run(&self) -> Result<SearchResult, SolverError> {
        self.is_stopped.store(false, Ordering::Relaxed);
        *self.best_solution.write() = None;

        let thread_pool = self.create_thread_pool()?;
        let terminations = self.params.terminations();

        let mut rng = SmallRng::seed_from_u64(self.params.seed);
        let heuristic = timer_debug!(
            "Heuristic cache",
            HeuristicCache::new(&self.problem, self.params.beta)
        );
        let mut pheromone = PheromoneMatrix::new(
            self.problem.num_locations(),
            self.params.tau_initial,
            self.params.tau_min,
            self.params.tau_max,
        );
        let updater = PheromoneUpdater::new(&self.params);
        let evaluator = SolutionEvaluator::new(&self.problem);

        let mut state = SearchState {
            start: Timestamp::now(),
            iteration: 0,
            iterations_without_improvement: 0,
            global_best: None,
            history: ConvergenceHistory::with_capacity(self.params.n_iterations),
        };

        info!(
            customers = self.problem.num_customers(),
            ants = self.params.n_ants,
            iterations = self.params.n_iterations,
            threads = thread_pool.current_num_threads(),
            policy = ?self.params.deposit_policy,
            "Starting ant colony search"
        );

        let stop_reason = loop {
            // CONSTRUCT
            let seeds: Vec<u64> = (0..self.params.n_ants).map(|_| rng.random()).collect();
            let solutions = thread_pool.install(|| {
                seeds
                    .par_iter()
                    .map(|&seed| {
                        Ant::new(&self.problem, &pheromone, &heuristic, &self.params, seed)
                            .construct()
                    })
                    .collect::<Result<Vec<WorkingSolution>, SolverError>>()
            })?;

            let accepted = solutions
                .into_iter()
                .enumerate()
                .map(|(ant, solution)| evaluator.evaluate(solution, state.iteration, ant))
                .collect::<Result<Vec<_>, _>>()?;

            // UPDATE
            let trace = self.apply_iteration(&mut state, &mut pheromone, &updater, &accepted);

            if let Some(callback) = &self.on_iteration_handler {
                callback.lock()(&trace);
            }
            state.history.push(trace);
            state.iteration += 1;

            if self.is_stopped.load(Ordering::Relaxed) {
                debug!(iteration = state.iteration, "Search cancelled");
                break StopReason::Cancelled;
            }

            if let Some(reason) = self.should_terminate(&state, &terminations) {
                break reason;
            }
        };

        let Some(best) = state.global_best else {
            unreachable!("every iteration evaluates at least one ant");
        };

        let duration = Timestamp::now().duration_since(state.start);
        info!(
            distance = best.total_distance,
            routes = best.num_routes(),
            iterations = state.iteration,
            ?stop_reason,
            ?duration,
            "Ant colony search finished"
        );

        Ok(SearchResult {
            best,
            history: state.history,
            iterations: state.iteration,
            stop_reason,
            duration,
        })
    }

    fn apply_iteration(
        &self,
        state: &mut SearchState,
        pheromone: &mut PheromoneMatrix,
        updater: &PheromoneUpdater,
        accepted: &[AcceptedSolution],
    ) -> IterationTrace {
        // min_by keeps the first of equal elements, i.e. the lowest ant index
        let (iteration_best_index, iteration_best) = accepted
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.total_distance.total_cmp(&b.total_distance))
            .expect("n_ants is validated to be at least one");

        let improved = state
            .global_best
            .as_ref()
            .is_none_or(|best| iteration_best.total_distance < best.total_distance);

        if improved {
            debug!(
                iteration = state.iteration,
                ant = iteration_best.ant,
                distance = iteration_best.total_distance,
                routes = iteration_best.num_routes(),
                "New best solution"
            );

            state.global_best = Some(iteration_best.clone());
            state.iterations_without_improvement = 0;
            *self.best_solution.write() = Some(iteration_best.clone());

            if let Some(callback) = &self.on_best_solution_handler {
                callback.lock()(iteration_best);
            }
        } else {
            state.iterations_without_improvement += 1;
        }

        let global_best = state.global_best.as_ref().unwrap_or(iteration_best);
        updater.update(pheromone, accepted, iteration_best_index, global_best);

        let trace = IterationTrace {
            iteration: state.iteration,
            iteration_best_distance: iteration_best.total_distance,
            global_best_distance: global_best.total_distance,
            improved,
            pheromone_version: pheromone.version(),
            timestamp: Timestamp::now(),
        };

        trace!(
            iteration = trace.iteration,
            iteration_best = trace.iteration_best_distance,
            global_best = trace.global_best_distance,
            "Iteration done"
        );

        trace
    }

    fn check_termination(&self, state: &SearchState, termination: &Termination) -> bool {
        match *termination {
            Termination::Iterations(max_iterations) => state.iteration >= max_iterations,
            Termination::Duration(max_duration) => {
                Timestamp::now().duration_since(state.start) >= max_duration
            }
            Termination::IterationsWithoutImprovement(max_iterations_without_improvement) => {
                state.iterations_without_improvement >= max_iterations_without_improvement
            }
        }
    }

    fn should_terminate(
        &self,
        state: &SearchState,
        terminations: &[Termination],
    ) -> Option<StopReason> {
        terminations
            .iter()
            .find(|termination| self.check_termination(state, termination))
            .map(|termination| {
                debug!(
                    "Termination condition met: {:?} at iteration {}",
                    termination, state.iteration
                );
                StopReason::from(termination)
            })
    }
}
