//! Coordinator が接続へ配信するイベント

use super::{entity::ChatMessage, presence::PresenceSnapshot};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomEvent {
    /// 参加直後に、参加した接続にだけ送る履歴
    MessageHistory(Vec<ChatMessage>),
    /// 新しいメッセージ（全メンバーへ）
    NewMessage(ChatMessage),
    /// 在室状況の更新（全メンバーへ）
    ConnectionUpdate(PresenceSnapshot),
    /// Room の終了（全メンバーへ、1 回だけ）
    ChatroomEnded,
}

impl RoomEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MessageHistory(_) => "MessageHistory",
            Self::NewMessage(_) => "NewMessage",
            Self::ConnectionUpdate(_) => "ConnectionUpdate",
            Self::ChatroomEnded => "ChatroomEnded",
        }
    }
}
