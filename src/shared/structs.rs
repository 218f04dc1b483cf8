/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use serde::Serialize;

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behaviour {
    #[serde(rename = "idle")]
    Idle,
    #[serde(rename = "moving")]
    Moving,
    #[serde(rename = "doorOpen")]
    DoorOpen,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Stop,
}

impl Direction {
    /// Direction of a signed vertical displacement or velocity.
    pub fn of(delta: f64) -> Direction {
        if delta > 0.0 {
            Direction::Up
        } else if delta < 0.0 {
            Direction::Down
        } else {
            Direction::Stop
        }
    }
}

/// Read-only view of one elevator, published to the observer thread.
/// The renderer-side collaborator consumes these; it never mutates
/// scheduler state.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ElevatorSnapshot {
    pub behaviour: Behaviour,
    pub floor: u8,
    pub direction: Direction,
    pub y_pos: f64,
    pub current_vel: f64,
    pub door_open_angle: f64,
    pub people_on_animation: bool,
    pub people_off_animation: bool,
    pub people_on_off_pos_x: f64,
    pub occupants: usize,
    pub scheduled_floors: Vec<u8>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BuildingSnapshot {
    pub tick: u64,
    pub elevators: Vec<ElevatorSnapshot>,
    pub waiting_per_floor: Vec<usize>,
    pub delivered: usize,
}
