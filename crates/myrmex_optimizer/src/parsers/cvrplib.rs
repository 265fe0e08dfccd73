use std::path::Path;

use anyhow::{Context, anyhow, bail};
use tracing::debug;

use crate::{
    parsers::parser::DatasetParser,
    problem::{
        capacity::VehicleCapacity,
        cvrp_problem::{CvrpProblem, CvrpProblemBuilder},
        demand::Demand,
        distance_method::DistanceMethod,
        location::Location,
    },
};

/// Reads CVRPLIB `.vrp` instances. The single demand dimension is loaded as
/// pallets and weight is left unconstrained.
pub struct CvrpLibParser;

impl DatasetParser for CvrpLibParser {
    fn parse<P: AsRef<Path>>(&self, file: P) -> Result<CvrpProblem, anyhow::Error> {
        let path = file.as_ref();
        let file_content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let instance = parse(&file_content)?;

        debug!(
            name = instance.name.as_deref().unwrap_or("unnamed"),
            dimension = instance.dimension,
            capacity = instance.capacity,
            "Parsed CVRPLIB instance"
        );

        instance.into_builder()?.build().map_err(anyhow::Error::from)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CvrpInstance {
    pub name: Option<String>,
    pub dimension: usize,
    pub capacity: u32,
    pub edge_weight_type: String,
    pub coords: Vec<geo::Coord<f64>>,
    pub demands: Vec<u32>,
    pub depot: usize,
}

impl CvrpInstance {
    fn distance_method(&self) -> Result<DistanceMethod, anyhow::Error> {
        match self.edge_weight_type.as_str() {
            "EUC_2D" => Ok(DistanceMethod::RoundedEuclidean),
            "EXACT_2D" | "FLOAT_2D" => Ok(DistanceMethod::Euclidean),
            other => bail!("Unsupported EDGE_WEIGHT_TYPE: {other}"),
        }
    }

    /// Depot first, then every other node in file order. External ids are
    /// the 1-based CVRPLIB node numbers.
    pub fn into_builder(self) -> Result<CvrpProblemBuilder, anyhow::Error> {
        let distance_method = self.distance_method()?;
        let depot_coord = self
            .coords
            .get(self.depot)
            .ok_or_else(|| anyhow!("Depot node {} has no coordinates", self.depot + 1))?;

        let mut builder = CvrpProblemBuilder::default();
        if let Some(name) = &self.name {
            builder.set_id(name.clone());
        }

        builder
            .set_depot(
                Location::depot(format!("{}", self.depot + 1))
                    .with_cartesian(depot_coord.x, depot_coord.y),
            )
            .set_capacity(VehicleCapacity::new(self.capacity, f64::MAX))
            .set_distance_method(distance_method);

        for (node, coord) in self.coords.iter().enumerate() {
            if node == self.depot {
                continue;
            }

            let pallets = *self
                .demands
                .get(node)
                .ok_or_else(|| anyhow!("Node {} has no demand", node + 1))?;

            builder.add_customer(
                Location::new(format!("{}", node + 1), Demand::new(pallets, 0.0))
                    .with_cartesian(coord.x, coord.y),
            );
        }

        Ok(builder)
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Section {
    Header,
    NodeCoords,
    Demands,
    Depots,
}

fn parse_field<T: std::str::FromStr>(value: &str, what: &str) -> Result<T, anyhow::Error> {
    value
        .parse()
        .map_err(|_| anyhow!("Invalid {what}: {value}"))
}

/// Nodes in sections are indexed from 1, the result is 0-based.
fn node_index(value: &str) -> Result<usize, anyhow::Error> {
    match parse_field::<usize>(value, "node index")? {
        0 => bail!("Node indices start at 1"),
        index => Ok(index - 1),
    }
}

pub fn parse(text: &str) -> Result<CvrpInstance, anyhow::Error> {
    let mut name = None;
    let mut dimension: Option<usize> = None;
    let mut capacity: Option<u32> = None;
    let mut edge_weight_type = String::from("EUC_2D");
    let mut coords = Vec::new();
    let mut demands = Vec::new();
    let mut depots = Vec::new();

    let mut section = Section::Header;

    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            continue;
        }

        if line == "EOF" {
            break;
        }

        match line {
            "NODE_COORD_SECTION" => {
                section = Section::NodeCoords;
                continue;
            }
            "DEMAND_SECTION" => {
                section = Section::Demands;
                continue;
            }
            "DEPOT_SECTION" => {
                section = Section::Depots;
                continue;
            }
            _ => {}
        }

        if let Some((key, value)) = line.split_once(':') {
            let value = value.trim();
            match key.trim().to_uppercase().as_str() {
                "NAME" => name = Some(value.to_owned()),
                "DIMENSION" => dimension = Some(parse_field(value, "dimension")?),
                "CAPACITY" => capacity = Some(parse_field(value, "capacity")?),
                "EDGE_WEIGHT_TYPE" => edge_weight_type = value.to_uppercase(),
                _ => {}
            }
            section = Section::Header;
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        match section {
            Section::Header => {}
            Section::NodeCoords => {
                let [node, x, y, ..] = parts[..] else {
                    bail!("Invalid coordinate line: {line}");
                };
                if node_index(node)? != coords.len() {
                    bail!("Coordinates are not listed in node order at node {node}");
                }
                coords.push(geo::Coord {
                    x: parse_field(x, "x coordinate")?,
                    y: parse_field(y, "y coordinate")?,
                });
            }
            Section::Demands => {
                let [node, demand, ..] = parts[..] else {
                    bail!("Invalid demand line: {line}");
                };
                if node_index(node)? != demands.len() {
                    bail!("Demands are not listed in node order at node {node}");
                }
                demands.push(parse_field(demand, "demand")?);
            }
            Section::Depots => {
                for part in parts {
                    if part == "-1" {
                        break;
                    }
                    depots.push(node_index(part)?);
                }
            }
        }
    }

    let dimension = dimension.ok_or_else(|| anyhow!("Missing DIMENSION"))?;
    let capacity = capacity.ok_or_else(|| anyhow!("Missing CAPACITY"))?;

    if coords.len() != dimension {
        bail!(
            "NODE_COORD_SECTION lists {} nodes, DIMENSION is {dimension}",
            coords.len()
        );
    }

    if demands.len() != dimension {
        bail!(
            "DEMAND_SECTION lists {} nodes, DIMENSION is {dimension}",
            demands.len()
        );
    }

    let depot = match depots.as_slice() {
        [] => 0,
        [depot] => *depot,
        _ => bail!("Multiple depots are not supported"),
    };

    Ok(CvrpInstance {
        name,
        dimension,
        capacity,
        edge_weight_type,
        coords,
        demands,
        depot,
    })
}

/// Best known solution shipped next to an instance as a `.sol` file.
#[derive(Debug, Clone, PartialEq)]
pub struct CvrpLibSolution {
    /// Customer node numbers per route, as written in the file.
    pub routes: Vec<Vec<usize>>,
    pub cost: Option<f64>,
}

pub fn parse_solution(text: &str) -> Result<CvrpLibSolution, anyhow::Error> {
    let mut routes = Vec::new();
    let mut cost = None;

    for line in text.lines().map(str::trim) {
        if let Some(value) = line.strip_prefix("Cost") {
            cost = Some(parse_field(value.trim(), "cost")?);
        } else if line.starts_with("Route")
            && let Some((_, stops)) = line.split_once(':')
        {
            routes.push(
                stops
                    .split_whitespace()
                    .map(|stop| parse_field(stop, "route stop"))
                    .collect::<Result<Vec<usize>, _>>()?,
            );
        }
    }

    Ok(CvrpLibSolution { routes, cost })
}

/// Reference cost of the `.sol` file at `path`, if there is a readable one.
pub fn parse_solution_file<P: AsRef<Path>>(path: P) -> Option<f64> {
    let content = std::fs::read_to_string(path).ok()?;
    parse_solution(&content).ok()?.cost
}
