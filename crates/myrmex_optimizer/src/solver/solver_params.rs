use jiff::SignedDuration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_SEED: u64 = 2427121;

#[derive(Debug, Error, PartialEq)]
#[error("Invalid parameter `{parameter}`: {reason}")]
pub struct ParamsError {
    pub parameter: &'static str,
    pub reason: String,
}

impl ParamsError {
    fn new(parameter: &'static str, reason: impl Into<String>) -> Self {
        ParamsError {
            parameter,
            reason: reason.into(),
        }
    }
}

/// Which solutions reinforce their edges after evaporation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepositPolicy {
    /// Every ant of the iteration deposits (Ant System).
    #[default]
    AllAnts,
    /// Only the best ant of the iteration deposits.
    IterationBest,
    /// Only the best solution found so far deposits.
    GlobalBest,
}

impl DepositPolicy {
    pub fn from_elitist(elitist: bool) -> Self {
        if elitist {
            DepositPolicy::IterationBest
        } else {
            DepositPolicy::AllAnts
        }
    }

    pub fn is_elitist(&self) -> bool {
        !matches!(self, DepositPolicy::AllAnts)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Termination {
    Duration(SignedDuration),
    Iterations(usize),
    IterationsWithoutImprovement(usize),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Threads {
    Single,
    Auto,
    Multi(usize),
}

impl Threads {
    pub fn number_of_threads(&self) -> usize {
        match self {
            Threads::Single => 1,
            Threads::Multi(num) => *num,
            Threads::Auto => std::thread::available_parallelism().map_or(1, |n| n.get()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcoParams {
    /// Ants constructing a solution in every iteration.
    pub n_ants: usize,
    /// Iteration budget.
    pub n_iterations: usize,
    /// Pheromone influence exponent.
    pub alpha: f64,
    /// Heuristic (1 / distance) influence exponent.
    pub beta: f64,
    /// ρ, share of every trail removed per iteration.
    pub evaporation_rate: f64,
    /// Q, a solution of length L deposits Q / L on each traversed edge.
    pub deposit_constant: f64,
    pub tau_min: f64,
    pub tau_max: f64,
    /// Uniform trail intensity the matrix starts with.
    pub tau_initial: f64,
    /// q0, probability of taking the best scoring candidate instead of
    /// sampling the roulette wheel.
    pub exploitation: f64,
    pub deposit_policy: DepositPolicy,
    /// Stop after that many iterations without global-best improvement.
    pub stagnation_limit: Option<usize>,
    pub time_limit: Option<SignedDuration>,
    pub threads: Threads,
    pub seed: u64,
}

impl Default for AcoParams {
    fn default() -> Self {
        AcoParams {
            n_ants: 30,
            n_iterations: 50,
            alpha: 1.0,
            beta: 1.0,
            evaporation_rate: 0.5,
            deposit_constant: 1.0,
            tau_min: 1e-4,
            tau_max: 10.0,
            tau_initial: 1.0,
            exploitation: 0.0,
            deposit_policy: DepositPolicy::AllAnts,
            stagnation_limit: None,
            time_limit: None,
            threads: Threads::Auto,
            seed: DEFAULT_SEED,
        }
    }
}

fn non_negative(parameter: &'static str, value: f64) -> Result<(), ParamsError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ParamsError::new(
            parameter,
            format!("must be a finite number >= 0, got {value}"),
        ))
    }
}

fn positive(parameter: &'static str, value: f64) -> Result<(), ParamsError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ParamsError::new(
            parameter,
            format!("must be a finite number > 0, got {value}"),
        ))
    }
}

impl AcoParams {
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.n_ants == 0 {
            return Err(ParamsError::new("n_ants", "at least one ant is required"));
        }

        if self.n_iterations == 0 {
            return Err(ParamsError::new(
                "n_iterations",
                "at least one iteration is required",
            ));
        }

        non_negative("alpha", self.alpha)?;
        non_negative("beta", self.beta)?;

        if !(self.evaporation_rate > 0.0 && self.evaporation_rate < 1.0) {
            return Err(ParamsError::new(
                "evaporation_rate",
                format!("must lie in (0, 1), got {}", self.evaporation_rate),
            ));
        }

        positive("deposit_constant", self.deposit_constant)?;
        positive("tau_min", self.tau_min)?;
        positive("tau_max", self.tau_max)?;

        if self.tau_min >= self.tau_max {
            return Err(ParamsError::new(
                "tau_max",
                format!(
                    "must be greater than tau_min ({} >= {})",
                    self.tau_min, self.tau_max
                ),
            ));
        }

        if !(self.tau_initial >= self.tau_min && self.tau_initial <= self.tau_max) {
            return Err(ParamsError::new(
                "tau_initial",
                format!(
                    "must lie in [{}, {}], got {}",
                    self.tau_min, self.tau_max, self.tau_initial
                ),
            ));
        }

        if !(0.0..=1.0).contains(&self.exploitation) {
            return Err(ParamsError::new(
                "exploitation",
                format!("must lie in [0, 1], got {}", self.exploitation),
            ));
        }

        if self.stagnation_limit == Some(0) {
            return Err(ParamsError::new(
                "stagnation_limit",
                "must be at least one iteration",
            ));
        }

        if let Some(time_limit) = self.time_limit
            && !time_limit.is_positive()
        {
            return Err(ParamsError::new(
                "time_limit",
                format!("must be positive, got {time_limit}"),
            ));
        }

        if self.threads == Threads::Multi(0) {
            return Err(ParamsError::new("threads", "must be at least one thread"));
        }

        Ok(())
    }

    /// Stopping rules derived from the budget fields. The search ends as soon
    /// as one of them is met.
    pub fn terminations(&self) -> Vec<Termination> {
        let mut terminations = vec![Termination::Iterations(self.n_iterations)];

        if let Some(limit) = self.stagnation_limit {
            terminations.push(Termination::IterationsWithoutImprovement(limit));
        }

        if let Some(time_limit) = self.time_limit {
            terminations.push(Termination::Duration(time_limit));
        }

        terminations
    }
}
