/***************************************/
/*        3rd party libraries          */
/***************************************/
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/***************************************/
/*           Local modules             */
/***************************************/
use crate::config::SimulationConfig;

/// A passenger arriving in the lobby of `origin`, heading to `destination`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arrival {
    pub origin: u8,
    pub destination: u8,
}

/// Seeded pseudo-random passenger arrivals. At most one arrival per tick;
/// origin and destination are always distinct and inside the building.
/// Deterministic under a fixed seed.
pub struct TrafficGenerator {
    rng: StdRng,
    arrival_probability: f64,
    n_floors: u8,
}

impl TrafficGenerator {
    pub fn new(config: &SimulationConfig, n_floors: u8) -> TrafficGenerator {
        TrafficGenerator {
            rng: StdRng::seed_from_u64(config.seed),
            arrival_probability: config.arrival_probability,
            n_floors,
        }
    }

    pub fn poll(&mut self) -> Option<Arrival> {
        if !self.rng.gen_bool(self.arrival_probability) {
            return None;
        }
        let origin = self.rng.gen_range(0..self.n_floors);
        // Pick from the n-1 other floors so destination != origin.
        let mut destination = self.rng.gen_range(0..self.n_floors - 1);
        if destination >= origin {
            destination += 1;
        }
        Some(Arrival {
            origin,
            destination,
        })
    }
}
