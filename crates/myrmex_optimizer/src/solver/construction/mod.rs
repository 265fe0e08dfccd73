pub mod ant;
pub mod heuristic;
