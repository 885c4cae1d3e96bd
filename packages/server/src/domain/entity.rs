//! エンティティ

use super::{
    error::RoomError,
    history::MessageHistory,
    message_pusher::PusherChannel,
    presence::PresenceSnapshot,
    value_object::{
        ConnectionId, MessageContent, RoomId, RoomName, SequenceNumber, Timestamp, Username,
    },
};

/// 受理済みのメッセージ（不変）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub sequence: SequenceNumber,
    pub author: Username,
    pub content: MessageContent,
    pub created_at: Timestamp,
}

/// Room に参加している 1 つの接続
///
/// 送信キュー（`channel`）は Coordinator だけが保持する。
/// Member が破棄されるとキューが閉じ、その接続の書き込みタスクも終了する。
#[derive(Debug, Clone)]
pub struct Member {
    pub connection_id: ConnectionId,
    pub username: Username,
    pub joined_at: Timestamp,
    channel: PusherChannel,
}

impl Member {
    pub fn new(
        connection_id: ConnectionId,
        username: Username,
        joined_at: Timestamp,
        channel: PusherChannel,
    ) -> Self {
        Self {
            connection_id,
            username,
            joined_at,
            channel,
        }
    }

    pub fn channel(&self) -> &PusherChannel {
        &self.channel
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomStatus {
    Active,
    Ended,
}

/// Room 一覧用のメタデータ（メタデータストアに永続化される）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomListing {
    pub id: RoomId,
    pub name: RoomName,
    pub created_by: Username,
    pub created_at: Timestamp,
}

/// チャットルーム
///
/// メンバーシップと履歴を所有する。変更は `RoomCoordinator` からのみ行われる。
#[derive(Debug)]
pub struct Room {
    pub id: RoomId,
    pub name: RoomName,
    pub created_at: Timestamp,
    status: RoomStatus,
    members: Vec<Member>,
    history: MessageHistory,
    next_sequence: SequenceNumber,
}

impl Room {
    pub fn new(id: RoomId, name: RoomName, created_at: Timestamp, history_capacity: usize) -> Self {
        Self {
            id,
            name,
            created_at,
            status: RoomStatus::Active,
            members: Vec::new(),
            history: MessageHistory::new(history_capacity),
            next_sequence: SequenceNumber::FIRST,
        }
    }

    pub fn status(&self) -> RoomStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == RoomStatus::Active
    }

    /// 参加順のメンバー一覧
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn member(&self, connection_id: &ConnectionId) -> Option<&Member> {
        self.members
            .iter()
            .find(|m| &m.connection_id == connection_id)
    }

    pub fn history(&self) -> &MessageHistory {
        &self.history
    }

    pub fn presence(&self) -> PresenceSnapshot {
        PresenceSnapshot::from_members(&self.members)
    }

    pub fn add_member(&mut self, member: Member) -> Result<(), RoomError> {
        if !self.is_active() {
            return Err(RoomError::Ended);
        }
        if self.member(&member.connection_id).is_some() {
            return Err(RoomError::DuplicateConnection(
                member.connection_id.to_string(),
            ));
        }
        self.members.push(member);
        Ok(())
    }

    /// 接続に対応するメンバーを削除する。存在しなければ `None`
    pub fn remove_member(&mut self, connection_id: &ConnectionId) -> Option<Member> {
        let index = self
            .members
            .iter()
            .position(|m| &m.connection_id == connection_id)?;
        Some(self.members.remove(index))
    }

    /// 次の連番を割り当ててメッセージを履歴に追加する
    pub fn accept_message(
        &mut self,
        author: Username,
        content: MessageContent,
        created_at: Timestamp,
    ) -> Result<ChatMessage, RoomError> {
        if !self.is_active() {
            return Err(RoomError::Ended);
        }
        let message = ChatMessage {
            sequence: self.next_sequence,
            author,
            content,
            created_at,
        };
        self.next_sequence = self.next_sequence.next();
        self.history.append(message.clone());
        Ok(message)
    }

    /// Ended に遷移し、全メンバーを取り出す
    ///
    /// 既に Ended の場合は空の Vec を返す。
    pub fn end(&mut self) -> Vec<Member> {
        self.status = RoomStatus::Ended;
        std::mem::take(&mut self.members)
    }
}
