//! UseCase 層
//!
//! Room Coordinator（Room ごとの唯一の書き手）と、それを取り巻くユースケース。

pub mod connection_gate;
pub mod coordinator;
pub mod create_room;
pub mod end_room;
pub mod error;
pub mod get_rooms;
pub mod registry;

pub use connection_gate::{Admission, ConnectionGate};
pub use coordinator::{RoomCoordinator, RoomOverview};
pub use create_room::CreateRoomUseCase;
pub use end_room::EndRoomUseCase;
pub use error::{
    AdmissionError, CoordinatorError, CreateRoomError, EndRoomError, GetRoomDetailError,
    RegistryError,
};
pub use get_rooms::{GetRoomDetailUseCase, GetRoomsUseCase, RoomDetail};
pub use registry::RoomRegistry;
