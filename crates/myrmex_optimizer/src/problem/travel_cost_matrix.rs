use serde::{Deserialize, Serialize};

use super::{
    distance_method::DistanceMethod,
    location::{Location, LocationIdx},
};

pub type Distance = f64;

/// Source of travel distances between two locations of a problem.
///
/// Implementations are expected to be non-negative, zero on the diagonal and
/// total for every pair of indices below [`DistanceProvider::num_locations`].
pub trait DistanceProvider: Send + Sync {
    fn distance(&self, from: LocationIdx, to: LocationIdx) -> Distance;

    fn num_locations(&self) -> usize;
}

/// This matrix use a flat structure to store distances between locations.
/// To find the index for a pair of locations, use the formula:
/// `index = from * num_locations + to`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistanceMatrix {
    distances: Vec<Distance>,
    num_locations: usize,
    is_symmetric: bool,
}

fn is_flat_matrix_symmetric(matrix: &[f64], num_locations: usize) -> bool {
    for i in 0..num_locations {
        for j in (i + 1)..num_locations {
            if matrix[i * num_locations + j] != matrix[j * num_locations + i] {
                return false;
            }
        }
    }
    true
}

impl DistanceMatrix {
    /// Builds the matrix from square rows. Returns `None` if a row length
    /// does not match the number of rows.
    pub fn new(rows: Vec<Vec<Distance>>) -> Option<Self> {
        let num_locations = rows.len();
        if rows.iter().any(|row| row.len() != num_locations) {
            return None;
        }

        let distances: Vec<Distance> = rows.into_iter().flatten().collect();
        let is_symmetric = is_flat_matrix_symmetric(&distances, num_locations);

        Some(DistanceMatrix {
            distances,
            num_locations,
            is_symmetric,
        })
    }

    /// Samples every pair of another provider once.
    pub fn from_provider(provider: &impl DistanceProvider) -> Self {
        let num_locations = provider.num_locations();
        let mut distances = vec![0.0; num_locations * num_locations];

        for from in 0..num_locations {
            for to in 0..num_locations {
                if from != to {
                    distances[from * num_locations + to] =
                        provider.distance(LocationIdx::new(from), LocationIdx::new(to));
                }
            }
        }

        let is_symmetric = is_flat_matrix_symmetric(&distances, num_locations);
        DistanceMatrix {
            distances,
            num_locations,
            is_symmetric,
        }
    }

    /// Computes all pairwise distances from location coordinates.
    /// Returns `None` if a location has no coordinates.
    pub fn from_locations(locations: &[Location], method: DistanceMethod) -> Option<Self> {
        let num_locations = locations.len();
        let mut distances: Vec<Distance> = vec![0.0; num_locations * num_locations];

        for (i, from) in locations.iter().enumerate() {
            for (j, to) in locations.iter().enumerate() {
                if i == j {
                    continue;
                }

                distances[i * num_locations + j] = match method {
                    DistanceMethod::Euclidean => from.euclidean_distance(to)?,
                    DistanceMethod::RoundedEuclidean => from.euclidean_distance(to)?.round(),
                    DistanceMethod::Haversine => from.haversine_distance(to)?,
                };
            }
        }

        Some(DistanceMatrix {
            distances,
            num_locations,
            is_symmetric: true,
        })
    }

    #[inline(always)]
    fn index(&self, from: LocationIdx, to: LocationIdx) -> usize {
        from.get() * self.num_locations + to.get()
    }

    pub fn is_symmetric(&self) -> bool {
        self.is_symmetric
    }

    pub fn max_distance(&self) -> Distance {
        self.distances.iter().cloned().fold(0.0, f64::max)
    }
}

impl DistanceProvider for DistanceMatrix {
    #[inline(always)]
    fn distance(&self, from: LocationIdx, to: LocationIdx) -> Distance {
        if from == to {
            return 0.0;
        }

        self.distances[self.index(from, to)]
    }

    fn num_locations(&self) -> usize {
        self.num_locations
    }
}

/// Adapts a plain function or closure into a [`DistanceProvider`].
pub struct FnDistance<F> {
    num_locations: usize,
    distance_fn: F,
}

impl<F> FnDistance<F>
where
    F: Fn(LocationIdx, LocationIdx) -> Distance + Send + Sync,
{
    pub fn new(num_locations: usize, distance_fn: F) -> Self {
        FnDistance {
            num_locations,
            distance_fn,
        }
    }
}

impl<F> DistanceProvider for FnDistance<F>
where
    F: Fn(LocationIdx, LocationIdx) -> Distance + Send + Sync,
{
    fn distance(&self, from: LocationIdx, to: LocationIdx) -> Distance {
        if from == to {
            return 0.0;
        }

        (self.distance_fn)(from, to)
    }

    fn num_locations(&self) -> usize {
        self.num_locations
    }
}
