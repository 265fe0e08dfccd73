use std::fmt::Display;

use serde::{Deserialize, Serialize};

use super::demand::Demand;

/// Capacity profile shared by every vehicle of the fleet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleCapacity {
    pub pallet_limit: u32,
    pub weight_limit: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CapacityDimension {
    Pallets,
    Weight,
}

impl Display for CapacityDimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CapacityDimension::Pallets => write!(f, "pallets"),
            CapacityDimension::Weight => write!(f, "weight"),
        }
    }
}

impl VehicleCapacity {
    pub const fn new(pallet_limit: u32, weight_limit: f64) -> Self {
        VehicleCapacity {
            pallet_limit,
            weight_limit,
        }
    }

    /// First dimension in which `load` is over the limit.
    pub fn exceeded_dimension(&self, load: &Demand) -> Option<CapacityDimension> {
        if load.pallets > self.pallet_limit {
            Some(CapacityDimension::Pallets)
        } else if load.weight > self.weight_limit {
            Some(CapacityDimension::Weight)
        } else {
            None
        }
    }

    pub fn holds(&self, load: &Demand) -> bool {
        self.exceeded_dimension(load).is_none()
    }
}

/// Whether `demand` can be added to a route currently carrying `route_load`
/// without exceeding either dimension of `capacity`.
#[inline]
pub fn fits(route_load: &Demand, demand: &Demand, capacity: &VehicleCapacity) -> bool {
    let pallets = u64::from(route_load.pallets) + u64::from(demand.pallets);
    pallets <= u64::from(capacity.pallet_limit)
        && route_load.weight + demand.weight <= capacity.weight_limit
}
