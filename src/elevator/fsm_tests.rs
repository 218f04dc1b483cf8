/*
 * Unit tests for the elevator state machine
 *
 * The unit tests follows the Arrange, Act, Assert pattern.
 *
 * Tests:
 * - test_fsm_initial_state
 * - test_go_to_floor_queues_concatenated_profiles
 * - test_go_to_floor_same_floor_is_noop
 * - test_go_to_floor_duplicate_tail_is_noop
 * - test_journey_arrives_and_opens_doors
 * - test_velocity_and_acceleration_stay_bounded
 * - test_doors_open_only_when_stopped
 * - test_can_stop_at_next_floor_boundary
 * - test_boarding_respects_capacity
 * - test_boarding_admits_nobody_when_full
 * - test_riders_exit_at_destination
 * - test_chained_journeys_stop_at_each_floor
 * - test_begin_transfer_ignored_while_moving
 * - test_elevator_is_a_person_carrier
 */

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod fsm_tests {
    use crate::building::floor::Floor;
    use crate::building::person::{Person, PersonId};
    use crate::config::ElevatorConfig;
    use crate::elevator::fsm::{ElevatorFSM, TransferContext};
    use crate::elevator::kinematics::profile_to;
    use crate::shared::{CarrierType, Located, PersonCarrier};
    use std::collections::HashMap;

    const FLOOR_HEIGHT: f64 = 4.0;
    const N_FLOORS: u8 = 12;
    const MAX_VEL: f64 = 4.0;
    const MAX_ACCEL: f64 = 1.0;

    // Generous bound for one stop's door cycle plus travel.
    const TICK_BUDGET: u32 = 500;

    fn setup_fsm(max_occupants: usize) -> ElevatorFSM {
        let config = ElevatorConfig {
            max_vel: MAX_VEL,
            max_accel: MAX_ACCEL,
            max_occupants,
        };
        ElevatorFSM::new(&config, FLOOR_HEIGHT, 0)
    }

    fn setup_floors() -> Vec<Floor> {
        (0..N_FLOORS)
            .map(|number| Floor::new(number, FLOOR_HEIGHT))
            .collect()
    }

    fn tick(
        fsm: &mut ElevatorFSM,
        floors: &mut [Floor],
        people: &HashMap<PersonId, Person>,
        delivered: &mut Vec<PersonId>,
    ) {
        let mut ctx = TransferContext {
            floors,
            people,
            delivered,
        };
        fsm.update(&mut ctx);
    }

    #[test]
    fn test_fsm_initial_state() {
        // Arrange / Act
        let fsm = setup_fsm(12);

        // Assert
        assert_eq!(fsm.get_current_floor(), 0);
        assert!(fsm.is_stopped());
        assert!(!fsm.is_full());
        assert!(fsm.test_idle());
        assert_eq!(fsm.num_people(), 0);
        assert!(fsm.can_stop_at_next_floor());
    }

    #[test]
    fn test_go_to_floor_queues_concatenated_profiles() {
        // Arrange
        let mut fsm = setup_fsm(12);

        // Act: two dispatches while resting at floor 0.
        fsm.go_to_floor(5);
        fsm.go_to_floor(8);

        // Assert: floors in FIFO order, segments are the concatenation of
        // the two independently generated profiles.
        assert_eq!(fsm.test_scheduled_floors(), &[5, 8]);
        let expected: Vec<_> = profile_to(0.0, 5.0 * FLOOR_HEIGHT, MAX_VEL, MAX_ACCEL)
            .into_iter()
            .chain(profile_to(
                5.0 * FLOOR_HEIGHT,
                8.0 * FLOOR_HEIGHT,
                MAX_VEL,
                MAX_ACCEL,
            ))
            .collect();
        let actual: Vec<_> = fsm.test_scheduled_accels().iter().copied().collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_go_to_floor_same_floor_is_noop() {
        // Arrange
        let mut fsm = setup_fsm(12);
        let before = fsm.test_kinematic_state();

        // Act
        fsm.go_to_floor(0);

        // Assert: no motion segments, no scheduled floor, state unchanged.
        assert!(fsm.test_scheduled_floors().is_empty());
        assert!(fsm.test_scheduled_accels().is_empty());
        assert_eq!(fsm.test_kinematic_state(), before);
    }

    #[test]
    fn test_go_to_floor_duplicate_tail_is_noop() {
        // Arrange
        let mut fsm = setup_fsm(12);
        fsm.go_to_floor(5);
        let n_segments = fsm.test_scheduled_accels().len();

        // Act
        fsm.go_to_floor(5);

        // Assert
        assert_eq!(fsm.test_scheduled_floors(), &[5]);
        assert_eq!(fsm.test_scheduled_accels().len(), n_segments);
    }

    #[test]
    fn test_journey_arrives_and_opens_doors() {
        // Arrange
        let mut fsm = setup_fsm(12);
        let mut floors = setup_floors();
        let people = HashMap::new();
        let mut delivered = Vec::new();
        fsm.go_to_floor(5);

        // Act: run until the doors are fully open.
        let mut ticks = 0;
        while !fsm.test_doors_fully_open() {
            tick(&mut fsm, &mut floors, &people, &mut delivered);
            ticks += 1;
            assert!(ticks < TICK_BUDGET, "doors never opened");
        }

        // Assert: resting exactly on floor 5 with the queue drained.
        let (y_pos, vel, accel) = fsm.test_kinematic_state();
        assert_eq!(y_pos, 5.0 * FLOOR_HEIGHT);
        assert_eq!(vel, 0.0);
        assert_eq!(accel, 0.0);
        assert_eq!(fsm.get_current_floor(), 5);
        assert!(fsm.test_scheduled_floors().is_empty());
        assert!(fsm.test_scheduled_accels().is_empty());
    }

    #[test]
    fn test_velocity_and_acceleration_stay_bounded() {
        // Arrange
        let mut fsm = setup_fsm(12);
        let mut floors = setup_floors();
        let people = HashMap::new();
        let mut delivered = Vec::new();
        fsm.go_to_floor(10);

        // Act / Assert: the caps hold after every tick of a full journey.
        for _ in 0..TICK_BUDGET {
            tick(&mut fsm, &mut floors, &people, &mut delivered);
            let (_, vel, accel) = fsm.test_kinematic_state();
            assert!(vel.abs() <= MAX_VEL + 1e-9, "velocity {} over cap", vel);
            assert!(accel.abs() <= MAX_ACCEL + 1e-9, "acceleration {} over cap", accel);
        }
    }

    #[test]
    fn test_doors_open_only_when_stopped() {
        // Arrange
        let mut fsm = setup_fsm(12);
        let mut floors = setup_floors();
        let people = HashMap::new();
        let mut delivered = Vec::new();
        fsm.go_to_floor(3);

        // Act / Assert: a nonzero door angle implies standstill, through a
        // full journey and door cycle.
        for _ in 0..TICK_BUDGET {
            tick(&mut fsm, &mut floors, &people, &mut delivered);
            if fsm.test_door_open_angle() != 0.0 {
                assert!(fsm.is_stopped());
            }
        }
    }

    #[test]
    fn test_can_stop_at_next_floor_boundary() {
        // Remaining distance exactly equal to the braking distance is
        // still feasible.
        let mut fsm = setup_fsm(12);
        fsm.go_to_floor(2); // 8.0 units away
        fsm.test_set_kinematic_state(0.0, MAX_VEL); // braking needs 8.0
        assert!(fsm.can_stop_at_next_floor());

        // Strictly closer than the braking distance is not.
        let mut fsm = setup_fsm(12);
        fsm.go_to_floor(1); // 4.0 units away
        fsm.test_set_kinematic_state(0.0, MAX_VEL);
        assert!(!fsm.can_stop_at_next_floor());

        // A slower cabin brakes shorter.
        let mut fsm = setup_fsm(12);
        fsm.go_to_floor(1);
        fsm.test_set_kinematic_state(0.0, 2.0); // braking needs 2.0
        assert!(fsm.can_stop_at_next_floor());

        // No scheduled floor: trivially feasible.
        let fsm = setup_fsm(12);
        assert!(fsm.can_stop_at_next_floor());
    }

    #[test]
    fn test_boarding_respects_capacity() {
        // Arrange: three passengers waiting at floor 0, capacity two.
        let mut fsm = setup_fsm(2);
        let mut floors = setup_floors();
        let mut people = HashMap::new();
        for id in 0..3u64 {
            people.insert(id, Person::new(id, 0, 6));
            floors[0].add_person(id);
        }
        let mut delivered = Vec::new();
        fsm.begin_transfer();

        // Act: run the door cycle to completion, but not the departure.
        let mut ticks = 0;
        tick(&mut fsm, &mut floors, &people, &mut delivered);
        while !fsm.test_door_closed() {
            tick(&mut fsm, &mut floors, &people, &mut delivered);
            ticks += 1;
            assert!(ticks < TICK_BUDGET, "door cycle never finished");
        }

        // Assert: two boarded, one left behind, destination scheduled.
        assert_eq!(fsm.num_people(), 2);
        assert!(fsm.is_full());
        assert_eq!(floors[0].n_waiting(), 1);
        assert!(fsm.test_scheduled_floors().contains(&6));
    }

    #[test]
    fn test_boarding_admits_nobody_when_full() {
        // Arrange: cabin already at capacity, two more waiting outside.
        let mut fsm = setup_fsm(2);
        let mut floors = setup_floors();
        let mut people = HashMap::new();
        for id in 0..2u64 {
            people.insert(id, Person::new(id, 3, 7));
            fsm.add_person(id);
        }
        for id in 2..4u64 {
            people.insert(id, Person::new(id, 0, 5));
            floors[0].add_person(id);
        }
        let mut delivered = Vec::new();
        fsm.begin_transfer();

        // Act
        for _ in 0..TICK_BUDGET {
            tick(&mut fsm, &mut floors, &people, &mut delivered);
        }

        // Assert
        assert_eq!(fsm.num_people(), 2);
        assert!(fsm.is_full());
        assert_eq!(floors[0].n_waiting(), 2);
    }

    #[test]
    fn test_riders_exit_at_destination() {
        // Arrange: one rider destined for the floor the cabin rests at.
        let mut fsm = setup_fsm(12);
        let mut floors = setup_floors();
        let mut people = HashMap::new();
        people.insert(7, Person::new(7, 5, 0));
        fsm.add_person(7);
        let mut delivered = Vec::new();
        fsm.begin_transfer();

        // Act
        for _ in 0..TICK_BUDGET {
            tick(&mut fsm, &mut floors, &people, &mut delivered);
        }

        // Assert
        assert_eq!(fsm.num_people(), 0);
        assert_eq!(delivered, vec![7]);
        assert!(fsm.test_idle());
    }

    #[test]
    fn test_chained_journeys_stop_at_each_floor() {
        // Arrange
        let mut fsm = setup_fsm(12);
        let mut floors = setup_floors();
        let people = HashMap::new();
        let mut delivered = Vec::new();
        fsm.go_to_floor(5);
        fsm.go_to_floor(8);

        // Act: first stop.
        let mut ticks = 0;
        while !fsm.test_doors_fully_open() {
            tick(&mut fsm, &mut floors, &people, &mut delivered);
            ticks += 1;
            assert!(ticks < TICK_BUDGET, "first stop never reached");
        }

        // Assert: stopped at 5 with the second journey still queued.
        assert_eq!(fsm.get_current_floor(), 5);
        assert_eq!(fsm.test_scheduled_floors(), &[8]);
        assert!(!fsm.test_scheduled_accels().is_empty());

        // Act: ride out the door cycle and the second journey.
        let mut ticks = 0;
        while !fsm.test_idle() {
            tick(&mut fsm, &mut floors, &people, &mut delivered);
            ticks += 1;
            assert!(ticks < 2 * TICK_BUDGET, "second stop never reached");
        }

        // Assert
        assert_eq!(fsm.get_current_floor(), 8);
        assert!(fsm.is_stopped());
    }

    #[test]
    fn test_begin_transfer_ignored_while_moving() {
        // Arrange
        let mut fsm = setup_fsm(12);
        let mut floors = setup_floors();
        let people = HashMap::new();
        let mut delivered = Vec::new();
        fsm.go_to_floor(6);
        for _ in 0..3 {
            tick(&mut fsm, &mut floors, &people, &mut delivered);
        }
        assert!(!fsm.is_stopped());

        // Act
        fsm.begin_transfer();

        // Assert: doors stay shut mid-flight.
        assert_eq!(fsm.test_door_open_angle(), 0.0);
    }

    #[test]
    fn test_elevator_is_a_person_carrier() {
        // Arrange
        let mut fsm = setup_fsm(2);

        // Act / Assert
        assert_eq!(fsm.carrier_type(), CarrierType::Elevator);
        assert_eq!(fsm.y_pos(), 0.0);
        fsm.add_person(9);
        assert!(fsm.contains_person(9));
        assert!(!fsm.is_full());
        fsm.add_person(4);
        assert!(fsm.is_full());
        assert!(fsm.remove_person(9));
        assert!(!fsm.contains_person(9));
        assert_eq!(fsm.num_people(), 1);
    }
}
