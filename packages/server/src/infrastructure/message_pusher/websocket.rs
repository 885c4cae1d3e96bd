//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - RoomEvent を WebSocket のテキストフレーム（JSON）にエンコード
//! - 各メンバーの有界な送信キューへの、待機しない書き込み（`try_send`）
//!
//! ## 設計ノート
//!
//! 送信キューを読み出して実際に WebSocket に書き込むのは、接続ごとの書き込みタスク
//! （`src/ui/handler/websocket.rs` の `pusher_loop`）です。
//! キューが満杯・クローズ済みの場合は待たずに失敗を返し、そのメンバーの退出は
//! Coordinator が判断します。1 つの遅い接続が他のメンバーへの配信を止めることはありません。

use tokio::sync::mpsc::error::TrySendError;

use crate::{
    domain::{ConnectionId, Member, MessagePushError, MessagePusher, RoomEvent},
    infrastructure::dto::websocket::OutboundEnvelope,
};

/// WebSocket を使った MessagePusher 実装（状態を持たない）
#[derive(Debug, Default, Clone, Copy)]
pub struct WebSocketMessagePusher;

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self
    }

    fn encode(event: &RoomEvent) -> Result<String, MessagePushError> {
        serde_json::to_string(&OutboundEnvelope::from(event))
            .map_err(|e| MessagePushError::EncodeFailed(e.to_string()))
    }

    fn enqueue(member: &Member, frame: String) -> Result<(), MessagePushError> {
        member.channel().try_send(frame).map_err(|e| match e {
            TrySendError::Full(_) => MessagePushError::QueueFull,
            TrySendError::Closed(_) => MessagePushError::ChannelClosed,
        })
    }
}

impl MessagePusher for WebSocketMessagePusher {
    fn push_to(&self, member: &Member, event: &RoomEvent) -> Result<(), MessagePushError> {
        let frame = Self::encode(event)?;
        Self::enqueue(member, frame)?;
        tracing::debug!(
            "Pushed {} to connection '{}'",
            event.kind(),
            member.connection_id
        );
        Ok(())
    }

    fn broadcast(
        &self,
        members: &[Member],
        event: &RoomEvent,
    ) -> Vec<(ConnectionId, MessagePushError)> {
        let frame = match Self::encode(event) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!("Failed to encode {}: {}", event.kind(), e);
                return Vec::new();
            }
        };

        let mut failures = Vec::new();
        for member in members {
            match Self::enqueue(member, frame.clone()) {
                Ok(()) => tracing::debug!(
                    "Broadcasted {} to connection '{}'",
                    event.kind(),
                    member.connection_id
                ),
                Err(e) => failures.push((member.connection_id, e)),
            }
        }
        failures
    }
}
