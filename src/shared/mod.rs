pub mod macros;
pub mod structs;
pub mod traits;

pub use structs::Behaviour;
pub use structs::BuildingSnapshot;
pub use structs::Direction;
pub use structs::ElevatorSnapshot;
pub use traits::CarrierType;
pub use traits::Located;
pub use traits::PersonCarrier;
