use crate::building::floor::Floor;
use crate::building::person::{Person, PersonId};
use crate::config::ElevatorConfig;
use crate::elevator::kinematics::{self, AccelSegment, VEL_EPSILON};
use crate::shared::{Behaviour, CarrierType, Direction, ElevatorSnapshot, Located, PersonCarrier};
use log::debug;
use std::collections::{HashMap, HashSet, VecDeque};

/**
 * Per-shaft elevator motion and dispatch scheduler.
 *
 * The `ElevatorFSM` owns the cabin's kinematic state, its pending floor and
 * acceleration-segment queues, the door animation, and the set of carried
 * persons. It advances one simulation tick at a time: while the doors are
 * closed it consumes acceleration segments and integrates position and
 * velocity; on reaching a scheduled floor it runs the door-open, passenger
 * transfer and door-close sub-states before resuming the next journey.
 *
 * # Fields
 * - `max_vel`:             Velocity cap, immutable for the instance lifetime.
 * - `max_accel`:           Acceleration cap, immutable.
 * - `max_occupants`:       Capacity cap, immutable.
 * - `stopping_distance`:   Braking distance from `max_vel` at `max_accel`.
 * - `floor_height`:        Vertical distance between adjacent floors,
 *                          supplied by the building at construction.
 * - `y_pos`:               Vertical coordinate of the cabin.
 * - `current_vel`:         Signed velocity, updated every tick.
 * - `current_accel`:       Signed acceleration, updated every tick.
 * - `scheduled_floors`:    Destination floors in FIFO service order.
 * - `scheduled_accels`:    Acceleration segments for the committed journeys.
 * - `door`:                Door sub-state (closed/opening/open/closing).
 * - `door_open_angle`:     Door animation angle, 0 (closed) to 90 (open).
 * - `close_door_timer`:    Ticks the door dwells open after the transfer.
 * - `people_on_counter`:   Ticks left of the boarding animation.
 * - `people_off_counter`:  Ticks left of the exiting animation.
 * - `people_on_off_pos_x`: Horizontal offset of passenger figures, read by
 *                          the observer only.
 * - `riders`:              Identities of the persons currently inside.
 */

pub const DEFAULT_MAX_VEL: f64 = 4.0;
pub const DEFAULT_MAX_ACCEL: f64 = 1.0;
pub const DEFAULT_MAX_OCCUPANTS: usize = 12;
pub const DEFAULT_MAX_ANI_COUNTER: u32 = 30;
pub const DEFAULT_DOOR_CLOSE_DELAY: u32 = 60;

const DOOR_OPEN_ANGLE: f64 = 90.0;
const DOOR_ANGLE_STEP: f64 = 9.0;
const PEOPLE_ANI_STEP: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DoorState {
    Closed,
    Opening,
    Open,
    Closing,
}

/// Mutable collaborators the scheduler needs during one tick: the floors
/// (for boarding queues), the person registry (for destinations), and the
/// sink for persons that stepped off at their destination. Passed in
/// explicitly by the building's update pass.
pub struct TransferContext<'a> {
    pub floors: &'a mut [Floor],
    pub people: &'a HashMap<PersonId, Person>,
    pub delivered: &'a mut Vec<PersonId>,
}

pub struct ElevatorFSM {
    // Immutable limits
    max_vel: f64,
    max_accel: f64,
    max_occupants: usize,
    stopping_distance: f64,
    floor_height: f64,
    home_floor: u8,

    // Kinematic state
    y_pos: f64,
    current_vel: f64,
    current_accel: f64,

    // Scheduling queues
    scheduled_floors: VecDeque<u8>,
    scheduled_accels: VecDeque<AccelSegment>,

    // Door and transfer state
    door: DoorState,
    door_open_angle: f64,
    close_door_timer: u32,
    people_on_animation: bool,
    people_off_animation: bool,
    people_on_counter: u32,
    people_off_counter: u32,
    people_on_off_pos_x: f64,

    // Occupancy
    riders: HashSet<PersonId>,
}

impl ElevatorFSM {
    pub fn new(config: &ElevatorConfig, floor_height: f64, home_floor: u8) -> ElevatorFSM {
        ElevatorFSM {
            max_vel: config.max_vel,
            max_accel: config.max_accel,
            max_occupants: config.max_occupants,
            stopping_distance: kinematics::stopping_distance(config.max_vel, config.max_accel),
            floor_height,
            home_floor,
            y_pos: home_floor as f64 * floor_height,
            current_vel: 0.0,
            current_accel: 0.0,
            scheduled_floors: VecDeque::new(),
            scheduled_accels: VecDeque::new(),
            door: DoorState::Closed,
            door_open_angle: 0.0,
            close_door_timer: 0,
            people_on_animation: false,
            people_off_animation: false,
            people_on_counter: 0,
            people_off_counter: 0,
            people_on_off_pos_x: 0.0,
            riders: HashSet::new(),
        }
    }

    /// Reset all mutable state to construction defaults.
    pub fn init(&mut self) {
        self.y_pos = self.home_floor as f64 * self.floor_height;
        self.current_vel = 0.0;
        self.current_accel = 0.0;
        self.scheduled_floors.clear();
        self.scheduled_accels.clear();
        self.door = DoorState::Closed;
        self.door_open_angle = 0.0;
        self.close_door_timer = 0;
        self.people_on_animation = false;
        self.people_off_animation = false;
        self.people_on_counter = 0;
        self.people_off_counter = 0;
        self.people_on_off_pos_x = 0.0;
        self.riders.clear();
    }

    /// Append `floor` to the service queue and schedule the matching
    /// acceleration segments. Requests only ever queue; a journey in
    /// progress is never preempted. A request for the floor the elevator
    /// already rests at (with nothing queued), or for the floor already at
    /// the tail of the queue, is a no-op.
    pub fn go_to_floor(&mut self, floor: u8) {
        let src_floor = match self.scheduled_floors.back() {
            Some(&tail) => {
                if tail == floor {
                    return;
                }
                tail
            }
            None => {
                let current = self.get_current_floor();
                if current == floor && self.is_stopped() {
                    return;
                }
                current
            }
        };

        self.schedule_accels_to_floor(src_floor, floor);
        self.scheduled_floors.push_back(floor);
        debug!(
            "scheduled floor {} (queue: {:?})",
            floor, self.scheduled_floors
        );
    }

    /// Whether the cabin can still come to rest at (or before) the next
    /// scheduled floor, braking at `max_accel` from the current velocity.
    /// Boundary case: a remaining distance exactly equal to the braking
    /// distance is still feasible.
    pub fn can_stop_at_next_floor(&self) -> bool {
        let Some(&next) = self.scheduled_floors.front() else {
            return true;
        };
        let remaining = (next as f64 * self.floor_height - self.y_pos).abs();
        if remaining + VEL_EPSILON >= self.stopping_distance {
            return true;
        }
        kinematics::braking_distance(self.current_vel, self.max_accel) <= remaining + VEL_EPSILON
    }

    pub fn get_current_floor(&self) -> u8 {
        (self.y_pos / self.floor_height).round() as u8
    }

    pub fn is_stopped(&self) -> bool {
        self.current_vel.abs() < VEL_EPSILON
    }

    pub fn is_full(&self) -> bool {
        self.riders.len() >= self.max_occupants
    }

    /// Number of floors still queued for service.
    pub fn n_pending_stops(&self) -> usize {
        self.scheduled_floors.len()
    }

    /// Whether this elevator will serve `floor` without a new dispatch:
    /// either it is queued, or the doors are open (or cycling) there.
    pub fn is_serving(&self, floor: u8) -> bool {
        self.scheduled_floors.contains(&floor)
            || (self.door != DoorState::Closed && self.get_current_floor() == floor)
    }

    /// Begin a door cycle at the current floor without scheduling motion.
    /// Used by the building when a pickup is requested at the floor the
    /// elevator already rests at. Ignored unless stopped with doors closed.
    pub fn begin_transfer(&mut self) {
        if self.door == DoorState::Closed && self.is_stopped() && self.scheduled_accels.is_empty()
        {
            self.open_doors();
        }
    }

    /// Advance the state machine by one simulation tick.
    pub fn update(&mut self, ctx: &mut TransferContext) {
        match self.door {
            DoorState::Closed => self.motion_tick(),
            DoorState::Opening => {
                self.door_open_angle = (self.door_open_angle + DOOR_ANGLE_STEP).min(DOOR_OPEN_ANGLE);
                if self.door_open_angle >= DOOR_OPEN_ANGLE {
                    self.door = DoorState::Open;
                }
            }
            DoorState::Open => self.transfer_tick(ctx),
            DoorState::Closing => {
                self.door_open_angle = (self.door_open_angle - DOOR_ANGLE_STEP).max(0.0);
                if self.door_open_angle <= 0.0 {
                    self.door = DoorState::Closed;
                }
            }
        }
        self.check_invariants();
    }

    pub fn snapshot(&self) -> ElevatorSnapshot {
        let behaviour = if self.door != DoorState::Closed {
            Behaviour::DoorOpen
        } else if !self.scheduled_accels.is_empty() {
            Behaviour::Moving
        } else {
            Behaviour::Idle
        };
        ElevatorSnapshot {
            behaviour,
            floor: self.get_current_floor(),
            direction: Direction::of(self.current_vel),
            y_pos: self.y_pos,
            current_vel: self.current_vel,
            door_open_angle: self.door_open_angle,
            people_on_animation: self.people_on_animation,
            people_off_animation: self.people_off_animation,
            people_on_off_pos_x: self.people_on_off_pos_x,
            occupants: self.riders.len(),
            scheduled_floors: self.scheduled_floors.iter().copied().collect(),
        }
    }

    /// Generate the acceleration segments for one floor-to-floor journey
    /// and append them to the queue. Called once per accepted `go_to_floor`.
    fn schedule_accels_to_floor(&mut self, src_floor: u8, dest_floor: u8) {
        let src_y = src_floor as f64 * self.floor_height;
        let dest_y = dest_floor as f64 * self.floor_height;
        let profile = kinematics::profile_to(src_y, dest_y, self.max_vel, self.max_accel);
        self.scheduled_accels.extend(profile);
    }

    fn motion_tick(&mut self) {
        if self.scheduled_accels.is_empty() {
            if self.scheduled_floors.front().copied() == Some(self.get_current_floor()) {
                // Zero-length journey head (pickup at the current floor).
                self.finish_journey();
            }
            return;
        }

        self.current_accel = kinematics::advance_tick(
            &mut self.y_pos,
            &mut self.current_vel,
            &mut self.scheduled_accels,
        );
        self.current_vel = self.current_vel.clamp(-self.max_vel, self.max_vel);

        if self.is_stopped() {
            self.finish_journey();
        }
    }

    /// The cabin has come to rest at the head of the floor queue: snap the
    /// position exact, pop the destination and start the door cycle.
    fn finish_journey(&mut self) {
        let Some(floor) = self.scheduled_floors.pop_front() else {
            debug_assert!(false, "journey finished with no scheduled floor");
            return;
        };
        debug_assert_eq!(floor, self.get_current_floor());
        self.y_pos = floor as f64 * self.floor_height;
        self.current_vel = 0.0;
        self.current_accel = 0.0;
        debug!("arrived at floor {}", floor);
        self.open_doors();
    }

    fn open_doors(&mut self) {
        self.door = DoorState::Opening;
        self.people_off_animation = true;
        self.people_off_counter = DEFAULT_MAX_ANI_COUNTER;
        self.people_on_animation = true;
        self.people_on_counter = DEFAULT_MAX_ANI_COUNTER;
        self.people_on_off_pos_x = 0.0;
        self.close_door_timer = DEFAULT_DOOR_CLOSE_DELAY;
    }

    /// One tick of the door-open transfer phase: exiting animation, then
    /// boarding animation, then the close-door dwell.
    fn transfer_tick(&mut self, ctx: &mut TransferContext) {
        if self.people_off_animation {
            self.people_on_off_pos_x += PEOPLE_ANI_STEP;
            if self.people_off_counter > 0 {
                self.people_off_counter -= 1;
            } else {
                self.unload_arrivals(ctx);
                self.people_off_animation = false;
            }
        } else if self.people_on_animation {
            self.people_on_off_pos_x += PEOPLE_ANI_STEP;
            if self.people_on_counter > 0 {
                self.people_on_counter -= 1;
            } else {
                self.board_waiting(ctx);
                self.people_on_animation = false;
            }
        } else if self.close_door_timer > 0 {
            self.close_door_timer -= 1;
        } else {
            self.door = DoorState::Closing;
        }
    }

    fn unload_arrivals(&mut self, ctx: &mut TransferContext) {
        let here = self.get_current_floor();
        let exiting: Vec<PersonId> = self
            .riders
            .iter()
            .filter(|&&id| ctx.people.get(&id).map_or(false, |p| p.destination == here))
            .copied()
            .collect();
        for id in exiting {
            self.remove_person(id);
            ctx.delivered.push(id);
        }
    }

    fn board_waiting(&mut self, ctx: &mut TransferContext) {
        let here = self.get_current_floor() as usize;
        let mut boarded_destinations: Vec<u8> = Vec::new();
        while !self.is_full() {
            let Some(id) = ctx.floors[here].pop_waiting() else {
                break;
            };
            self.add_person(id);
            if let Some(person) = ctx.people.get(&id) {
                boarded_destinations.push(person.destination);
            }
        }
        for destination in boarded_destinations {
            self.go_to_floor(destination);
        }
    }

    fn check_invariants(&self) {
        debug_assert!(self.current_vel.abs() <= self.max_vel + VEL_EPSILON);
        debug_assert!(self.current_accel.abs() <= self.max_accel + VEL_EPSILON);
        debug_assert!(self.riders.len() <= self.max_occupants);
        debug_assert!(self.scheduled_accels.is_empty() || !self.scheduled_floors.is_empty());
        debug_assert!(self.door == DoorState::Closed || self.is_stopped());
        debug_assert!(self.can_stop_at_next_floor());
    }

    #[cfg(test)]
    pub fn test_scheduled_floors(&self) -> &VecDeque<u8> {
        &self.scheduled_floors
    }

    #[cfg(test)]
    pub fn test_scheduled_accels(&self) -> &VecDeque<AccelSegment> {
        &self.scheduled_accels
    }

    #[cfg(test)]
    pub fn test_kinematic_state(&self) -> (f64, f64, f64) {
        (self.y_pos, self.current_vel, self.current_accel)
    }

    #[cfg(test)]
    pub fn test_set_kinematic_state(&mut self, y_pos: f64, vel: f64) {
        self.y_pos = y_pos;
        self.current_vel = vel;
    }

    #[cfg(test)]
    pub fn test_door_open_angle(&self) -> f64 {
        self.door_open_angle
    }

    #[cfg(test)]
    pub fn test_doors_fully_open(&self) -> bool {
        self.door == DoorState::Open
    }

    #[cfg(test)]
    pub fn test_door_closed(&self) -> bool {
        self.door == DoorState::Closed
    }

    #[cfg(test)]
    pub fn test_idle(&self) -> bool {
        self.door == DoorState::Closed
            && self.scheduled_accels.is_empty()
            && self.scheduled_floors.is_empty()
    }
}

impl Located for ElevatorFSM {
    fn y_pos(&self) -> f64 {
        self.y_pos
    }
}

impl PersonCarrier for ElevatorFSM {
    fn carrier_type(&self) -> CarrierType {
        CarrierType::Elevator
    }

    fn add_person(&mut self, id: PersonId) {
        debug_assert!(!self.is_full());
        self.riders.insert(id);
    }

    fn remove_person(&mut self, id: PersonId) -> bool {
        self.riders.remove(&id)
    }

    fn contains_person(&self, id: PersonId) -> bool {
        self.riders.contains(&id)
    }

    fn num_people(&self) -> usize {
        self.riders.len()
    }
}
