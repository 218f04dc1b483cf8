/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::{debug, info, warn};
use std::collections::HashMap;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::building::floor::Floor;
use crate::building::person::{Person, PersonId};
use crate::config::{BuildingConfig, ElevatorConfig};
use crate::elevator::fsm::TransferContext;
use crate::elevator::ElevatorFSM;
use crate::shared::{BuildingSnapshot, PersonCarrier};

/**
 * Owns the floors, the elevators and the person registry, and coordinates
 * passenger dispatch.
 *
 * The building is the validation boundary of the system: requests for
 * floors outside the valid range are rejected here with a warning and
 * never reach an elevator's scheduler. Dispatch is deliberately simple --
 * the elevator with the fewest pending stops wins, lowest index on ties;
 * there is no bank-level optimization.
 */

pub struct Building {
    floors: Vec<Floor>,
    elevators: Vec<ElevatorFSM>,
    people: HashMap<PersonId, Person>,
    next_person_id: PersonId,
    delivered: usize,
    n_floors: u8,
}

impl Building {
    pub fn new(building_config: &BuildingConfig, elevator_config: &ElevatorConfig) -> Building {
        let floors = (0..building_config.n_floors)
            .map(|number| Floor::new(number, building_config.floor_height))
            .collect();
        let elevators = (0..building_config.n_elevators)
            .map(|_| ElevatorFSM::new(elevator_config, building_config.floor_height, 0))
            .collect();
        Building {
            floors,
            elevators,
            people: HashMap::new(),
            next_person_id: 0,
            delivered: 0,
            n_floors: building_config.n_floors,
        }
    }

    /// Reset every floor and elevator to its construction state.
    pub fn init(&mut self) {
        for elevator in self.elevators.iter_mut() {
            elevator.init();
        }
        for floor in self.floors.iter_mut() {
            while floor.pop_waiting().is_some() {}
        }
        self.people.clear();
        self.next_person_id = 0;
        self.delivered = 0;
    }

    /// Register a passenger at `origin` heading to `destination` and
    /// dispatch an elevator for the pickup. Rejects out-of-range and
    /// degenerate requests; the elevator scheduler itself never validates.
    pub fn spawn_person(&mut self, origin: u8, destination: u8) -> Option<PersonId> {
        if origin >= self.n_floors || destination >= self.n_floors {
            warn!(
                "rejecting person with floors outside the building: {} -> {}",
                origin, destination
            );
            return None;
        }
        if origin == destination {
            warn!("rejecting person with origin == destination: {}", origin);
            return None;
        }

        let id = self.next_person_id;
        self.next_person_id += 1;
        self.people.insert(id, Person::new(id, origin, destination));
        self.floors[origin as usize].add_person(id);
        debug!("person {} waiting at floor {} for floor {}", id, origin, destination);

        self.dispatch(origin);
        Some(id)
    }

    /// Send an elevator to `floor`. Returns false for out-of-range floors.
    pub fn dispatch(&mut self, floor: u8) -> bool {
        if floor >= self.n_floors {
            warn!("rejecting dispatch outside the building: floor {}", floor);
            return false;
        }

        let chosen = self.choose_elevator(floor);
        let elevator = &mut self.elevators[chosen];
        if elevator.is_stopped()
            && elevator.get_current_floor() == floor
            && elevator.n_pending_stops() == 0
        {
            // Already resting at the requested floor: cycle the doors
            // instead of scheduling a zero-length journey.
            elevator.begin_transfer();
        } else {
            elevator.go_to_floor(floor);
        }
        true
    }

    /// Advance the whole building by one simulation tick: every elevator
    /// updates exactly once, then unserved pickup floors are re-dispatched
    /// (a full elevator may have left passengers behind).
    pub fn update(&mut self) {
        let mut delivered: Vec<PersonId> = Vec::new();
        for elevator in self.elevators.iter_mut() {
            let mut ctx = TransferContext {
                floors: &mut self.floors,
                people: &self.people,
                delivered: &mut delivered,
            };
            elevator.update(&mut ctx);
        }

        for id in delivered {
            if let Some(person) = self.people.remove(&id) {
                self.delivered += 1;
                info!(
                    "person {} delivered to floor {} ({} total)",
                    id, person.destination, self.delivered
                );
            }
        }

        let unserved: Vec<u8> = self
            .floors
            .iter()
            .filter(|floor| floor.n_waiting() > 0)
            .map(|floor| floor.number())
            .filter(|&number| !self.elevators.iter().any(|e| e.is_serving(number)))
            .collect();
        for floor in unserved {
            self.dispatch(floor);
        }
    }

    pub fn snapshot(&self, tick: u64) -> BuildingSnapshot {
        BuildingSnapshot {
            tick,
            elevators: self.elevators.iter().map(|e| e.snapshot()).collect(),
            waiting_per_floor: self.floors.iter().map(|f| f.n_waiting()).collect(),
            delivered: self.delivered,
        }
    }

    pub fn n_waiting(&self) -> usize {
        self.floors.iter().map(|f| f.n_waiting()).sum()
    }

    pub fn n_riding(&self) -> usize {
        self.elevators.iter().map(|e| e.num_people()).sum()
    }

    pub fn n_delivered(&self) -> usize {
        self.delivered
    }

    /// An idle elevator already resting at `floor` if there is one,
    /// otherwise the elevator with the fewest pending stops (lowest index
    /// on ties).
    fn choose_elevator(&self, floor: u8) -> usize {
        if let Some(index) = self.elevators.iter().position(|elevator| {
            elevator.is_stopped()
                && elevator.n_pending_stops() == 0
                && elevator.get_current_floor() == floor
        }) {
            return index;
        }
        self.elevators
            .iter()
            .enumerate()
            .min_by_key(|(_, elevator)| elevator.n_pending_stops())
            .map(|(index, _)| index)
            .unwrap_or(0)
    }

    #[cfg(test)]
    pub fn test_elevator(&self, index: usize) -> &ElevatorFSM {
        &self.elevators[index]
    }

    #[cfg(test)]
    pub fn test_floor(&self, number: u8) -> &Floor {
        &self.floors[number as usize]
    }
}
