pub mod pheromone_matrix;
pub mod pheromone_updater;
