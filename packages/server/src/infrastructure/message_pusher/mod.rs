//! メッセージ送信（通知）の実装
//!
//! - `websocket`: WebSocket フレームにエンコードして各メンバーの送信キューに積む実装

pub mod websocket;

pub use websocket::WebSocketMessagePusher;
