//! Domain layer for the chat room server.
//!
//! This module contains the room model, its invariants and the interfaces
//! of the collaborators the coordinator depends on.

pub mod auth;
pub mod entity;
pub mod error;
pub mod event;
pub mod history;
pub mod message_pusher;
pub mod presence;
pub mod repository;
pub mod value_object;

pub use auth::CredentialVerifier;
pub use entity::{ChatMessage, Member, Room, RoomListing, RoomStatus};
pub use error::{AuthError, MessagePushError, RepositoryError, RoomError, ValueObjectError};
pub use event::RoomEvent;
pub use history::MessageHistory;
pub use message_pusher::{MessagePusher, PusherChannel};
pub use presence::PresenceSnapshot;
pub use repository::RoomRepository;
pub use value_object::{
    ConnectionId, MessageContent, RoomId, RoomIdFactory, RoomName, SequenceNumber, Timestamp,
    Username,
};

#[cfg(test)]
pub use auth::MockCredentialVerifier;
#[cfg(test)]
pub use repository::MockRoomRepository;
