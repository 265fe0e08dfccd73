use std::path::Path;

use crate::problem::cvrp_problem::CvrpProblem;

pub trait DatasetParser {
    fn parse<P: AsRef<Path>>(&self, file: P) -> Result<CvrpProblem, anyhow::Error>;
}
