use std::{
    iter::Sum,
    ops::{Add, AddAssign},
};

use serde::{Deserialize, Serialize};

/// Two-dimensional quantity used both for a customer's demand and for the
/// cumulative load of a route.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Demand {
    pub pallets: u32,
    pub weight: f64,
}

impl Demand {
    pub const ZERO: Demand = Demand {
        pallets: 0,
        weight: 0.0,
    };

    pub const fn new(pallets: u32, weight: f64) -> Self {
        Demand { pallets, weight }
    }

    pub fn is_zero(&self) -> bool {
        self.pallets == 0 && self.weight == 0.0
    }
}

impl Add for Demand {
    type Output = Demand;

    fn add(self, other: Demand) -> Demand {
        Demand {
            pallets: self.pallets.saturating_add(other.pallets),
            weight: self.weight + other.weight,
        }
    }
}

impl AddAssign for Demand {
    fn add_assign(&mut self, other: Demand) {
        *self = *self + other;
    }
}

impl<'a> AddAssign<&'a Demand> for Demand {
    fn add_assign(&mut self, other: &'a Demand) {
        *self = *self + *other;
    }
}

impl Sum for Demand {
    fn sum<I: Iterator<Item = Demand>>(iter: I) -> Demand {
        iter.fold(Demand::ZERO, |acc, demand| acc + demand)
    }
}

impl<'a> Sum<&'a Demand> for Demand {
    fn sum<I: Iterator<Item = &'a Demand>>(iter: I) -> Demand {
        iter.fold(Demand::ZERO, |acc, demand| acc + *demand)
    }
}
