use crate::problem::{cvrp_problem::CvrpProblem, location::LocationIdx};

/// η(i, j)^β with η = 1 / distance, computed once per run.
///
/// Each row is scaled by its shortest distance so the nearest location scores
/// 1 and long distances with a large β do not underflow. Every candidate of a
/// step leaves from the same row, so selection probabilities are unchanged.
#[derive(Debug, Clone)]
pub struct HeuristicCache {
    values: Vec<f64>,
    num_locations: usize,
}

impl HeuristicCache {
    pub fn new(problem: &CvrpProblem, beta: f64) -> Self {
        let num_locations = problem.num_locations();
        let mut values = vec![0.0; num_locations * num_locations];

        for from in 0..num_locations {
            let row = |to: usize| problem.distance(LocationIdx::new(from), LocationIdx::new(to));
            let nearest = (0..num_locations)
                .filter(|&to| to != from)
                .map(row)
                .filter(|distance| *distance > 0.0)
                .fold(f64::INFINITY, f64::min);
            let scale = if nearest.is_finite() { nearest } else { 1.0 };

            for to in 0..num_locations {
                if from == to {
                    continue;
                }

                values[from * num_locations + to] = pow(scale / row(to), beta);
            }
        }

        HeuristicCache {
            values,
            num_locations,
        }
    }

    #[inline]
    pub fn get(&self, from: LocationIdx, to: LocationIdx) -> f64 {
        self.values[from.get() * self.num_locations + to.get()]
    }
}

/// `base^exponent` without calling into `powf` for the common exponents.
#[inline]
pub fn pow(base: f64, exponent: f64) -> f64 {
    if exponent == 0.0 {
        1.0
    } else if exponent == 1.0 {
        base
    } else if exponent == 2.0 {
        base * base
    } else {
        base.powf(exponent)
    }
}
