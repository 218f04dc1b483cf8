pub mod traffic;

pub use traffic::Arrival;
pub use traffic::TrafficGenerator;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::building::Building;
use crate::config::Config;
use crate::shared::BuildingSnapshot;

/**
 * Single-threaded cooperative simulation driver.
 *
 * One call to `step()` is one global tick: new passenger arrivals are
 * applied first, then every elevator's state machine advances exactly
 * once. Nothing here blocks or touches wall-clock time; pacing is the
 * binary's concern.
 */

pub struct Simulation {
    building: Building,
    traffic: TrafficGenerator,
    tick: u64,
}

impl Simulation {
    pub fn new(config: &Config) -> Simulation {
        Simulation {
            building: Building::new(&config.building, &config.elevator),
            traffic: TrafficGenerator::new(&config.simulation, config.building.n_floors),
            tick: 0,
        }
    }

    pub fn init(&mut self) {
        self.building.init();
        self.tick = 0;
    }

    /// Advance the simulation by one tick.
    pub fn step(&mut self) {
        if let Some(arrival) = self.traffic.poll() {
            self.building.spawn_person(arrival.origin, arrival.destination);
        }
        self.building.update();
        self.tick += 1;
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn building(&self) -> &Building {
        &self.building
    }

    pub fn building_mut(&mut self) -> &mut Building {
        &mut self.building
    }

    pub fn snapshot(&self) -> BuildingSnapshot {
        self.building.snapshot(self.tick)
    }
}
