pub mod accepted_solution;
pub mod aco;
pub mod construction;
pub mod error;
pub mod evaluation;
pub mod pheromone;
pub mod solution;
pub mod solver;
pub mod solver_params;
pub mod statistics;
