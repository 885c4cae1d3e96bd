//! Infrastructure layer: concrete implementations of the domain interfaces
//! and the wire representations.

pub mod auth;
pub mod dto;
pub mod message_pusher;
pub mod repository;
