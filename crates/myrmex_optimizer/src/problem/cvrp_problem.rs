use std::{fmt, sync::Arc};

use thiserror::Error;
use tracing::debug;

use super::{
    capacity::{CapacityDimension, VehicleCapacity},
    demand::Demand,
    distance_method::DistanceMethod,
    location::{DEPOT, Location, LocationIdx},
    travel_cost_matrix::{Distance, DistanceMatrix, DistanceProvider},
};

#[derive(Debug, Error, PartialEq)]
pub enum ProblemError {
    #[error("Problem has no depot")]
    MissingDepot,

    #[error("Problem has no vehicle capacity")]
    MissingCapacity,

    #[error("Vehicle capacity must be strictly positive in {0}")]
    NonPositiveCapacity(CapacityDimension),

    #[error("Depot must not carry any demand")]
    DepotHasDemand,

    #[error("Customer {customer} has an invalid weight demand: {weight}")]
    InvalidWeight { customer: LocationIdx, weight: f64 },

    #[error("Customer {customer} demands more {dimension} than a vehicle can carry")]
    DemandExceedsCapacity {
        customer: LocationIdx,
        dimension: CapacityDimension,
    },

    #[error("Problem has neither a distance provider nor a distance method")]
    MissingDistances,

    #[error("Location {0} has no coordinates to compute distances from")]
    MissingCoordinates(String),

    #[error("Distance provider covers {actual} locations, expected {expected}")]
    DistanceSizeMismatch { expected: usize, actual: usize },

    #[error("Distance from {from} to {to} is invalid: {distance}")]
    InvalidDistance {
        from: LocationIdx,
        to: LocationIdx,
        distance: Distance,
    },

    #[error("Distance between distinct locations {from} and {to} is zero")]
    DegenerateDistance { from: LocationIdx, to: LocationIdx },
}

/// Immutable description of one CVRP instance.
///
/// Location 0 is the depot, 1..=N are the customers. Every customer fits
/// into an empty vehicle on its own, which is checked by
/// [`CvrpProblemBuilder::build`].
pub struct CvrpProblem {
    id: Option<String>,
    locations: Vec<Location>,
    capacity: VehicleCapacity,
    distances: Arc<dyn DistanceProvider>,
}

impl fmt::Debug for CvrpProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CvrpProblem")
            .field("id", &self.id)
            .field("locations", &self.locations)
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

impl CvrpProblem {
    #[cfg(test)]
    pub(crate) fn new_unchecked(
        locations: Vec<Location>,
        capacity: VehicleCapacity,
        distances: Arc<dyn DistanceProvider>,
    ) -> Self {
        CvrpProblem {
            id: None,
            locations,
            capacity,
            distances,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn location(&self, location_id: LocationIdx) -> &Location {
        &self.locations[location_id]
    }

    pub fn depot(&self) -> &Location {
        &self.locations[DEPOT]
    }

    pub fn num_locations(&self) -> usize {
        self.locations.len()
    }

    pub fn num_customers(&self) -> usize {
        self.locations.len() - 1
    }

    pub fn customers_iter(&self) -> impl Iterator<Item = LocationIdx> + use<> {
        (1..self.locations.len()).map(LocationIdx::new)
    }

    pub fn is_customer(&self, location_id: LocationIdx) -> bool {
        location_id != DEPOT && location_id.get() < self.locations.len()
    }

    pub fn demand(&self, location_id: LocationIdx) -> &Demand {
        self.locations[location_id].demand()
    }

    pub fn capacity(&self) -> &VehicleCapacity {
        &self.capacity
    }

    #[inline]
    pub fn distance(&self, from: LocationIdx, to: LocationIdx) -> Distance {
        self.distances.distance(from, to)
    }

    pub fn distances(&self) -> &dyn DistanceProvider {
        self.distances.as_ref()
    }

    pub fn total_demand(&self) -> Demand {
        self.customers_iter()
            .map(|customer| *self.demand(customer))
            .sum()
    }

    /// Kmin = max(Q_i / D_i) over both capacity dimensions, where Q is the total
    /// demand and D the vehicle capacity.
    pub fn minimum_routes(&self) -> usize {
        let total = self.total_demand();
        let by_pallets =
            (f64::from(total.pallets) / f64::from(self.capacity.pallet_limit)).ceil() as usize;
        let by_weight = (total.weight / self.capacity.weight_limit).ceil() as usize;

        by_pallets.max(by_weight)
    }
}

#[derive(Default)]
pub struct CvrpProblemBuilder {
    id: Option<String>,
    depot: Option<Location>,
    customers: Vec<Location>,
    capacity: Option<VehicleCapacity>,
    distances: Option<Arc<dyn DistanceProvider>>,
    distance_method: Option<DistanceMethod>,
}

impl CvrpProblemBuilder {
    pub fn set_id(&mut self, id: impl Into<String>) -> &mut CvrpProblemBuilder {
        self.id = Some(id.into());
        self
    }

    pub fn set_depot(&mut self, depot: Location) -> &mut CvrpProblemBuilder {
        self.depot = Some(depot);
        self
    }

    pub fn add_customer(&mut self, customer: Location) -> &mut CvrpProblemBuilder {
        self.customers.push(customer);
        self
    }

    pub fn set_customers(&mut self, customers: Vec<Location>) -> &mut CvrpProblemBuilder {
        self.customers = customers;
        self
    }

    pub fn set_capacity(&mut self, capacity: VehicleCapacity) -> &mut CvrpProblemBuilder {
        self.capacity = Some(capacity);
        self
    }

    pub fn set_distance_provider(
        &mut self,
        provider: impl DistanceProvider + 'static,
    ) -> &mut CvrpProblemBuilder {
        self.distances = Some(Arc::new(provider));
        self
    }

    /// Distances will be computed from the location coordinates when no
    /// provider is set.
    pub fn set_distance_method(&mut self, method: DistanceMethod) -> &mut CvrpProblemBuilder {
        self.distance_method = Some(method);
        self
    }

    pub fn build(self) -> Result<CvrpProblem, ProblemError> {
        let depot = self.depot.ok_or(ProblemError::MissingDepot)?;
        let capacity = self.capacity.ok_or(ProblemError::MissingCapacity)?;

        if capacity.pallet_limit == 0 {
            return Err(ProblemError::NonPositiveCapacity(CapacityDimension::Pallets));
        }

        // Written as a negation so that NaN is rejected as well
        if !(capacity.weight_limit > 0.0) {
            return Err(ProblemError::NonPositiveCapacity(CapacityDimension::Weight));
        }

        if !depot.demand().is_zero() {
            return Err(ProblemError::DepotHasDemand);
        }

        let mut locations = Vec::with_capacity(self.customers.len() + 1);
        locations.push(depot);
        locations.extend(self.customers);

        for (index, location) in locations.iter().enumerate().skip(1) {
            let customer = LocationIdx::new(index);
            let demand = location.demand();

            if !demand.weight.is_finite() || demand.weight < 0.0 {
                return Err(ProblemError::InvalidWeight {
                    customer,
                    weight: demand.weight,
                });
            }

            if let Some(dimension) = capacity.exceeded_dimension(demand) {
                return Err(ProblemError::DemandExceedsCapacity {
                    customer,
                    dimension,
                });
            }
        }

        let distances = match (self.distances, self.distance_method) {
            (Some(provider), _) => provider,
            (None, Some(method)) => {
                if let Some(location) = locations.iter().find(|l| !l.has_coordinates()) {
                    return Err(ProblemError::MissingCoordinates(
                        location.external_id().to_owned(),
                    ));
                }

                let matrix = DistanceMatrix::from_locations(&locations, method)
                    .ok_or(ProblemError::MissingDistances)?;
                Arc::new(matrix) as Arc<dyn DistanceProvider>
            }
            (None, None) => return Err(ProblemError::MissingDistances),
        };

        validate_distances(distances.as_ref(), locations.len())?;

        debug!(
            customers = locations.len() - 1,
            "Built problem with capacity {:?}", capacity
        );

        Ok(CvrpProblem {
            id: self.id,
            locations,
            capacity,
            distances,
        })
    }
}

fn validate_distances(
    provider: &dyn DistanceProvider,
    num_locations: usize,
) -> Result<(), ProblemError> {
    if provider.num_locations() != num_locations {
        return Err(ProblemError::DistanceSizeMismatch {
            expected: num_locations,
            actual: provider.num_locations(),
        });
    }

    for from in (0..num_locations).map(LocationIdx::new) {
        for to in (0..num_locations).map(LocationIdx::new) {
            if from == to {
                continue;
            }

            let distance = provider.distance(from, to);
            if !distance.is_finite() || distance < 0.0 {
                return Err(ProblemError::InvalidDistance { from, to, distance });
            }

            if distance == 0.0 {
                return Err(ProblemError::DegenerateDistance { from, to });
            }
        }
    }

    Ok(())
}
