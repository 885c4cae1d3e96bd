//! Conversion logic from domain entities to DTOs.

use crate::domain::{ChatMessage, PresenceSnapshot, RoomEvent, RoomListing};
use crate::infrastructure::dto::{
    http::RoomSummaryDto,
    websocket::{ChatMessageDto, ConnectionUpdateDto, MessageHistoryDto, OutboundEnvelope},
};

impl From<&ChatMessage> for ChatMessageDto {
    fn from(message: &ChatMessage) -> Self {
        Self {
            user: message.author.as_str().to_string(),
            contents: message.content.as_str().to_string(),
            sequence: message.sequence.value(),
            sent_at: message.created_at.value(),
        }
    }
}

impl From<&PresenceSnapshot> for ConnectionUpdateDto {
    fn from(snapshot: &PresenceSnapshot) -> Self {
        Self {
            connection_count: snapshot.connection_count,
            online_users: snapshot
                .online_users
                .iter()
                .map(|u| u.as_str().to_string())
                .collect(),
        }
    }
}

impl From<&RoomEvent> for OutboundEnvelope {
    fn from(event: &RoomEvent) -> Self {
        match event {
            RoomEvent::MessageHistory(messages) => Self::MessageHistory(MessageHistoryDto {
                history: messages.iter().map(ChatMessageDto::from).collect(),
            }),
            RoomEvent::NewMessage(message) => Self::NewMessage(message.into()),
            RoomEvent::ConnectionUpdate(snapshot) => Self::ConnectionUpdate(snapshot.into()),
            RoomEvent::ChatroomEnded => Self::ChatroomEnded,
        }
    }
}

impl From<&RoomListing> for RoomSummaryDto {
    fn from(listing: &RoomListing) -> Self {
        Self {
            id: listing.id.as_str().to_string(),
            name: listing.name.as_str().to_string(),
        }
    }
}
