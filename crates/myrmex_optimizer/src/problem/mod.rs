pub mod capacity;
pub mod cvrp_problem;
pub mod demand;
pub mod distance_method;
pub mod location;
pub mod travel_cost_matrix;
