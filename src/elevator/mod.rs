pub mod fsm;
pub mod fsm_tests;
pub mod kinematics;

pub use fsm::ElevatorFSM;
pub use fsm::TransferContext;
pub use kinematics::AccelSegment;
