//! Domain layer for the chat relay.
//!
//! This module contains business logic that is independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod renderer;
pub mod store;
pub mod value_object;

pub use entity::{Room, StoredMessage};
pub use error::{RenderError, StorageError, ValueObjectError};
pub use renderer::MessageRenderer;
pub use store::MessageStore;
pub use value_object::{Author, MessageBody, MessageId, RoomId, RoomName, Timestamp};
