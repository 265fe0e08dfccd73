use geo::{Distance, Euclidean, Haversine};
use serde::Serialize;

use crate::define_index_newtype;

use super::demand::Demand;

define_index_newtype!(LocationIdx, Location);

/// Index of the depot. Every problem reserves slot 0 for it.
pub const DEPOT: LocationIdx = LocationIdx::new(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LocationRole {
    Depot,
    Customer,
}

/// A stop of the problem: the depot or a customer with its two-dimensional demand.
#[derive(Debug, Clone, Serialize)]
pub struct Location {
    external_id: String,
    demand: Demand,
    #[serde(skip)]
    point: Option<geo::Point>,
}

impl Location {
    pub fn new(external_id: impl Into<String>, demand: Demand) -> Self {
        Self {
            external_id: external_id.into(),
            demand,
            point: None,
        }
    }

    pub fn depot(external_id: impl Into<String>) -> Self {
        Self::new(external_id, Demand::ZERO)
    }

    pub fn with_cartesian(mut self, x: f64, y: f64) -> Self {
        self.point = Some(geo::Point::new(x, y));
        self
    }

    pub fn with_lat_lon(mut self, lat: f64, lon: f64) -> Self {
        self.point = Some(geo::Point::new(lon, lat));
        self
    }

    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn demand(&self) -> &Demand {
        &self.demand
    }

    pub fn point(&self) -> Option<geo::Point> {
        self.point
    }

    pub fn has_coordinates(&self) -> bool {
        self.point.is_some()
    }

    /// Straight-line distance in coordinate units, `None` if either side has no coordinates.
    pub fn euclidean_distance(&self, to: &Location) -> Option<f64> {
        let euclidean = Euclidean;
        match (&self.point, &to.point) {
            (Some(from), Some(to)) => Some(euclidean.distance(from, to)),
            _ => None,
        }
    }

    /// Great-circle distance in meters for lat/lon locations.
    pub fn haversine_distance(&self, to: &Location) -> Option<f64> {
        let haversine = Haversine;
        match (self.point, to.point) {
            (Some(from), Some(to)) => Some(haversine.distance(from, to)),
            _ => None,
        }
    }
}

pub fn role_of(location_id: LocationIdx) -> LocationRole {
    if location_id == DEPOT {
        LocationRole::Depot
    } else {
        LocationRole::Customer
    }
}
