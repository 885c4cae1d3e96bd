//! WebSocket の DTO
//!
//! 全てのフレームは `{ "message_type": ..., "message": ... }` の形式。

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::domain::MessageContent;

/// チャットメッセージ（`NewMessage` のペイロード、履歴の要素）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessageDto {
    pub user: String,
    pub contents: String,
    /// Coordinator が割り当てた連番
    #[serde(default)]
    pub sequence: u64,
    /// 受理時刻（Unix ミリ秒）
    #[serde(default)]
    pub sent_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionUpdateDto {
    pub connection_count: usize,
    pub online_users: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageHistoryDto {
    pub history: Vec<ChatMessageDto>,
}

/// サーバーからクライアントへのフレーム
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "message_type", content = "message")]
pub enum OutboundEnvelope {
    NewMessage(ChatMessageDto),
    ConnectionUpdate(ConnectionUpdateDto),
    ChatroomEnded,
    MessageHistory(MessageHistoryDto),
}

/// クライアントが送る `NewMessage` のペイロード
///
/// `user` は参考値。サーバーは接続時に認証したユーザー名を使う。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientMessageDto {
    #[serde(default)]
    pub user: String,
    pub contents: String,
}

/// クライアントからサーバーへのフレーム
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "message_type", content = "message")]
pub enum ClientFrame {
    NewMessage(ClientMessageDto),
}

/// デコード済みの受信フレーム
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundFrame {
    SendMessage {
        contents: MessageContent,
        claimed_user: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameDecodeError {
    #[error("frame is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("NewMessage payload is invalid: {0}")]
    InvalidPayload(String),
}

/// 受信したテキストフレームをデコードする
///
/// * `Ok(Some(_))` - 処理対象のフレーム
/// * `Ok(None)` - 未知の `message_type` など、無視してよいフレーム
/// * `Err(_)` - 壊れたフレーム（破棄してログに残す）
pub fn decode_inbound_frame(text: &str) -> Result<Option<InboundFrame>, FrameDecodeError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| FrameDecodeError::InvalidJson(e.to_string()))?;

    if value.get("message_type").and_then(Value::as_str) != Some("NewMessage") {
        return Ok(None);
    }

    let payload = value.get("message").cloned().unwrap_or(Value::Null);
    let message: ClientMessageDto = serde_json::from_value(payload)
        .map_err(|e| FrameDecodeError::InvalidPayload(e.to_string()))?;
    let contents = MessageContent::new(message.contents)
        .map_err(|e| FrameDecodeError::InvalidPayload(e.to_string()))?;
    let claimed_user = Some(message.user).filter(|u| !u.is_empty());

    Ok(Some(InboundFrame::SendMessage {
        contents,
        claimed_user,
    }))
}
