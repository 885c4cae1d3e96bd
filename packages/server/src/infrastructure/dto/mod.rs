//! Data Transfer Objects (DTOs) for the chat room server.
//!
//! DTOs are organized by protocol:
//! - `websocket`: WebSocket envelopes (outbound events and inbound client frames)
//! - `http`: HTTP API request/response DTOs

pub mod conversion;
pub mod http;
pub mod websocket;
