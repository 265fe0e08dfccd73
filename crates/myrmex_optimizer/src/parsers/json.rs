use std::{fs::File, io::BufReader, path::Path};

use anyhow::Context;

use crate::{
    json::types::JsonCvrpProblem, parsers::parser::DatasetParser,
    problem::cvrp_problem::CvrpProblem,
};

/// Reads the JSON problem document described by the generated schema.
pub struct JsonParser;

impl DatasetParser for JsonParser {
    fn parse<P: AsRef<Path>>(&self, file: P) -> Result<CvrpProblem, anyhow::Error> {
        let path = file.as_ref();
        let reader = BufReader::new(
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?,
        );

        let input: JsonCvrpProblem = serde_json::from_reader(reader)
            .with_context(|| format!("Invalid problem document {}", path.display()))?;

        input.build_problem()
    }
}
