//! UseCase layer: application operations composed from the domain
//! collaborators and the hub.

mod create_room;
mod error;
mod join_room;
mod list_rooms;
mod post_message;
mod room_history;

pub use create_room::CreateRoomUseCase;
pub use error::{CreateRoomError, GetRoomHistoryError, JoinRoomError, PostMessageError};
pub use join_room::JoinRoomUseCase;
pub use list_rooms::ListRoomsUseCase;
pub use post_message::PostMessageUseCase;
pub use room_history::GetRoomHistoryUseCase;
