use jiff::Timestamp;
use serde::Serialize;

/// Convergence data for one iteration.
#[derive(Debug, Clone, Serialize)]
pub struct IterationTrace {
    pub iteration: usize,
    pub iteration_best_distance: f64,
    pub global_best_distance: f64,
    pub improved: bool,
    pub pheromone_version: u64,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ConvergenceHistory {
    traces: Vec<IterationTrace>,
}

impl ConvergenceHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        ConvergenceHistory {
            traces: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, trace: IterationTrace) {
        self.traces.push(trace);
    }

    pub fn traces(&self) -> &[IterationTrace] {
        &self.traces
    }

    pub fn len(&self) -> usize {
        self.traces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }

    /// `(iteration, iteration best, global best)` rows.
    pub fn distances(&self) -> Vec<(usize, f64, f64)> {
        self.traces
            .iter()
            .map(|trace| {
                (
                    trace.iteration,
                    trace.iteration_best_distance,
                    trace.global_best_distance,
                )
            })
            .collect()
    }

    /// Iterations in which the global best improved.
    pub fn improvements(&self) -> impl Iterator<Item = &IterationTrace> {
        self.traces.iter().filter(|trace| trace.improved)
    }
}
