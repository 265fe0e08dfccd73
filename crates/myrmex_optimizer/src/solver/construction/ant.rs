use fixedbitset::FixedBitSet;
use rand::{Rng, SeedableRng, rngs::SmallRng, seq::IndexedRandom};
use tracing::warn;

use crate::{
    problem::{
        capacity::fits,
        cvrp_problem::CvrpProblem,
        location::{DEPOT, LocationIdx},
    },
    solver::{
        error::SolverError,
        pheromone::pheromone_matrix::PheromoneMatrix,
        solution::{route::Route, working_solution::WorkingSolution},
        solver_params::AcoParams,
    },
};

use super::heuristic::{HeuristicCache, pow};

/// Outcome of a single [`Ant::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AntStep {
    /// The ant moved to this customer on the current route.
    Moved(LocationIdx),
    /// No remaining customer fits the current route: it was closed and a new
    /// empty one opened at the depot.
    RouteSplit,
    /// Every customer is served, the last route was closed.
    Finished,
}

/// One probabilistic construction run.
///
/// Reads the pheromone matrix, never writes it. All randomness comes from the
/// ant's own [`SmallRng`] so a given seed always yields the same walk.
pub struct Ant<'a> {
    problem: &'a CvrpProblem,
    pheromone: &'a PheromoneMatrix,
    heuristic: &'a HeuristicCache,
    alpha: f64,
    exploitation: f64,
    rng: SmallRng,

    position: LocationIdx,
    unvisited: FixedBitSet,
    remaining: usize,
    current_route: Route,
    completed_routes: Vec<Route>,
    candidates: Vec<(LocationIdx, f64)>,
}

impl<'a> Ant<'a> {
    pub fn new(
        problem: &'a CvrpProblem,
        pheromone: &'a PheromoneMatrix,
        heuristic: &'a HeuristicCache,
        params: &AcoParams,
        seed: u64,
    ) -> Self {
        let mut unvisited = FixedBitSet::with_capacity(problem.num_locations());
        for customer in problem.customers_iter() {
            unvisited.insert(customer.get());
        }

        Ant {
            problem,
            pheromone,
            heuristic,
            alpha: params.alpha,
            exploitation: params.exploitation,
            rng: SmallRng::seed_from_u64(seed),
            position: DEPOT,
            remaining: problem.num_customers(),
            unvisited,
            current_route: Route::new(),
            completed_routes: Vec::new(),
            candidates: Vec::with_capacity(problem.num_customers()),
        }
    }

    pub fn position(&self) -> LocationIdx {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }

    pub fn current_route(&self) -> &Route {
        &self.current_route
    }

    /// Walks until every customer is served.
    pub fn construct(mut self) -> Result<WorkingSolution, SolverError> {
        while self.step()? != AntStep::Finished {}

        Ok(WorkingSolution::new(self.completed_routes))
    }

    pub fn step(&mut self) -> Result<AntStep, SolverError> {
        if self.remaining == 0 {
            self.close_route();
            return Ok(AntStep::Finished);
        }

        self.collect_candidates();

        if self.candidates.is_empty() {
            if self.current_route.is_empty() {
                // Nothing fits an empty vehicle, splitting again would loop forever
                let customer = self
                    .unvisited
                    .ones()
                    .next()
                    .map(LocationIdx::new)
                    .unwrap_or(DEPOT);
                return Err(SolverError::InfeasibleInput { customer });
            }

            self.close_route();
            return Ok(AntStep::RouteSplit);
        }

        let next = select_candidate(&self.candidates, self.exploitation, &mut self.rng);
        self.move_to(next);

        Ok(AntStep::Moved(next))
    }

    /// Unvisited customers that fit the current route, with their score
    /// τ^α · η^β, in ascending index order.
    fn collect_candidates(&mut self) {
        let load = self.current_route.load();
        let capacity = self.problem.capacity();

        self.candidates.clear();
        for index in self.unvisited.ones() {
            let customer = LocationIdx::new(index);
            if !fits(load, self.problem.demand(customer), capacity) {
                continue;
            }

            let score = pow(self.pheromone.get(self.position, customer), self.alpha)
                * self.heuristic.get(self.position, customer);
            self.candidates.push((customer, score));
        }
    }

    fn move_to(&mut self, customer: LocationIdx) {
        self.current_route
            .push(customer, self.problem.demand(customer));
        self.unvisited.set(customer.get(), false);
        self.remaining -= 1;
        self.position = customer;
    }

    /// current route -> closed, new empty route -> opened at the depot.
    fn close_route(&mut self) {
        if !self.current_route.is_empty() {
            self.completed_routes
                .push(std::mem::take(&mut self.current_route));
        }

        self.position = DEPOT;
    }
}

/// Pseudo-random-proportional rule: with probability `exploitation` the best
/// scoring candidate is taken (lowest index on ties), otherwise one is drawn
/// by roulette wheel. `candidates` must not be empty.
///
/// Scores may overflow to `+inf` for extreme parameters. The wheel only ever
/// sees weights in `[0, 1]`: when some scores are infinite the draw is
/// restricted to those, otherwise every score is divided by the largest one.
pub fn select_candidate<R>(
    candidates: &[(LocationIdx, f64)],
    exploitation: f64,
    rng: &mut R,
) -> LocationIdx
where
    R: Rng,
{
    if exploitation > 0.0
        && rng.random::<f64>() < exploitation
        && let Some(best) = best_candidate(candidates)
    {
        return best;
    }

    let scale = roulette_scale(candidates);
    match candidates.choose_weighted(rng, |(_, score)| roulette_weight(*score, scale)) {
        Ok((customer, _)) => *customer,
        Err(error) => {
            warn!(
                candidates = candidates.len(),
                "Degenerate candidate scores ({error}), sampling uniformly"
            );
            candidates
                .choose(rng)
                .map(|(customer, _)| *customer)
                .unwrap_or(DEPOT)
        }
    }
}

/// Largest usable score, `+inf` when any candidate overflowed.
fn roulette_scale(candidates: &[(LocationIdx, f64)]) -> f64 {
    candidates
        .iter()
        .map(|(_, score)| *score)
        .filter(|score| *score > 0.0)
        .fold(0.0, f64::max)
}

fn roulette_weight(score: f64, scale: f64) -> f64 {
    if !(score > 0.0) {
        // NaN and non-positive scores never win the wheel
        0.0
    } else if scale == f64::INFINITY {
        if score == f64::INFINITY { 1.0 } else { 0.0 }
    } else {
        score / scale
    }
}

fn best_candidate(candidates: &[(LocationIdx, f64)]) -> Option<LocationIdx> {
    let mut best: Option<(LocationIdx, f64)> = None;
    for &(customer, score) in candidates {
        if score.is_nan() {
            continue;
        }

        match best {
            Some((_, best_score)) if best_score >= score => {}
            _ => best = Some((customer, score)),
        }
    }

    best.map(|(customer, _)| customer)
}
