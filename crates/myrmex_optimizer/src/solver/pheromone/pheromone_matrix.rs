use crate::problem::location::LocationIdx;

/// Trail intensities τ(i, j) over every directed pair of locations.
///
/// Storage is flat and row-major (`from * num_locations + to`). The matrix is
/// only read while ants construct and only written by
/// [`PheromoneUpdater`](super::pheromone_updater::PheromoneUpdater), which
/// publishes each completed update by bumping [`PheromoneMatrix::version`].
#[derive(Debug, Clone)]
pub struct PheromoneMatrix {
    trails: Vec<f64>,
    num_locations: usize,
    tau_min: f64,
    tau_max: f64,
    version: u64,
}

impl PheromoneMatrix {
    pub fn new(num_locations: usize, tau_initial: f64, tau_min: f64, tau_max: f64) -> Self {
        PheromoneMatrix {
            trails: vec![tau_initial.clamp(tau_min, tau_max); num_locations * num_locations],
            num_locations,
            tau_min,
            tau_max,
            version: 0,
        }
    }

    #[inline(always)]
    fn index(&self, from: LocationIdx, to: LocationIdx) -> usize {
        from.get() * self.num_locations + to.get()
    }

    #[inline]
    pub fn get(&self, from: LocationIdx, to: LocationIdx) -> f64 {
        self.trails[self.index(from, to)]
    }

    pub fn num_locations(&self) -> usize {
        self.num_locations
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.tau_min, self.tau_max)
    }

    /// Number of completed updates since creation.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Scales every trail by `1 - rate`.
    pub fn evaporate(&mut self, rate: f64) {
        let factor = 1.0 - rate;
        for trail in self.trails.iter_mut() {
            *trail *= factor;
        }
    }

    pub fn deposit(&mut self, from: LocationIdx, to: LocationIdx, amount: f64) {
        let index = self.index(from, to);
        self.trails[index] += amount;
    }

    /// Clamps every trail into `[tau_min, tau_max]` and publishes a new version.
    pub fn commit(&mut self) {
        let (tau_min, tau_max) = (self.tau_min, self.tau_max);
        for trail in self.trails.iter_mut() {
            *trail = trail.clamp(tau_min, tau_max);
        }

        self.version += 1;
    }

    /// Every off-diagonal trail as `(from, to, τ)`.
    pub fn iter(&self) -> impl Iterator<Item = (LocationIdx, LocationIdx, f64)> + '_ {
        let n = self.num_locations;
        self.trails
            .iter()
            .enumerate()
            .filter(move |(index, _)| index / n != index % n)
            .map(move |(index, &trail)| {
                (
                    LocationIdx::new(index / n),
                    LocationIdx::new(index % n),
                    trail,
                )
            })
    }
}
