use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMethod {
    Haversine,
    Euclidean,
    /// Euclidean distance rounded to the nearest integer, as used by CVRPLIB.
    RoundedEuclidean,
}
