//! Domain logic for client-side operations.
//!
//! This module contains pure functions that implement business logic
//! without side effects, making them easy to test.

use hiroba_server::infrastructure::dto::websocket::{ChatMessageDto, OutboundEnvelope};

use crate::error::ClientError;

/// 受信したイベントから組み立てるクライアント側の表示状態
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatView {
    pub messages: Vec<ChatMessageDto>,
    pub connection_count: usize,
    pub online_users: Vec<String>,
    pub ended: bool,
}

/// `ChatView::apply` による変化
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewChange {
    /// 履歴で置き換えた（件数）
    HistoryReplaced(usize),
    MessageAppended,
    PresenceChanged,
    Ended,
}

impl ChatView {
    pub fn new() -> Self {
        Self::default()
    }

    /// イベントを 1 つ反映する
    pub fn apply(&mut self, envelope: &OutboundEnvelope) -> ViewChange {
        match envelope {
            OutboundEnvelope::MessageHistory(history) => {
                self.messages = history.history.clone();
                ViewChange::HistoryReplaced(self.messages.len())
            }
            OutboundEnvelope::NewMessage(message) => {
                self.messages.push(message.clone());
                ViewChange::MessageAppended
            }
            OutboundEnvelope::ConnectionUpdate(update) => {
                self.connection_count = update.connection_count;
                self.online_users = update.online_users.clone();
                ViewChange::PresenceChanged
            }
            OutboundEnvelope::ChatroomEnded => {
                self.ended = true;
                ViewChange::Ended
            }
        }
    }

    pub fn last_message(&self) -> Option<&ChatMessageDto> {
        self.messages.last()
    }
}

/// Check if the client should exit immediately based on the error type.
///
/// 認証エラー・Room が使えない・Room の終了は、再接続しても結果が変わらない。
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(
        error,
        ClientError::Unauthenticated | ClientError::RoomUnavailable(_) | ClientError::RoomEnded
    )
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `current_attempt` - The current reconnection attempt count (0-indexed)
/// * `max_attempts` - The maximum number of reconnection attempts allowed
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    // Don't reconnect if the error requires immediate exit
    if should_exit_immediately(error) {
        return false;
    }

    current_attempt < max_attempts
}

#[cfg(test)]
mod tests {
    use super::*;
    use hiroba_server::infrastructure::dto::websocket::{ConnectionUpdateDto, MessageHistoryDto};

    fn message(user: &str, contents: &str, sequence: u64) -> ChatMessageDto {
        ChatMessageDto {
            user: user.to_string(),
            contents: contents.to_string(),
            sequence,
            sent_at: 1672498800000,
        }
    }

    #[test]
    fn test_apply_history_replaces_messages() {
        // テスト項目: 履歴を受け取ると、それまでのメッセージは置き換えられる
        // given (前提条件):
        let mut view = ChatView::new();
        view.apply(&OutboundEnvelope::NewMessage(message("alice", "stale", 1)));
        let history = OutboundEnvelope::MessageHistory(MessageHistoryDto {
            history: vec![message("alice", "one", 1), message("bob", "two", 2)],
        });

        // when (操作):
        let change = view.apply(&history);

        // then (期待する結果):
        assert_eq!(change, ViewChange::HistoryReplaced(2));
        assert_eq!(view.messages.len(), 2);
        assert_eq!(view.last_message().map(|m| m.contents.as_str()), Some("two"));
    }

    #[test]
    fn test_apply_new_message_appends() {
        // テスト項目: NewMessage は末尾に追加される
        // given (前提条件):
        let mut view = ChatView::new();

        // when (操作):
        let change = view.apply(&OutboundEnvelope::NewMessage(message("alice", "hi", 1)));

        // then (期待する結果):
        assert_eq!(change, ViewChange::MessageAppended);
        assert_eq!(view.messages, vec![message("alice", "hi", 1)]);
    }

    #[test]
    fn test_apply_connection_update_replaces_presence() {
        // テスト項目: ConnectionUpdate で在室状況が置き換えられる
        // given (前提条件):
        let mut view = ChatView::new();
        let update = OutboundEnvelope::ConnectionUpdate(ConnectionUpdateDto {
            connection_count: 3,
            online_users: vec!["alice".to_string(), "bob".to_string()],
        });

        // when (操作):
        let change = view.apply(&update);

        // then (期待する結果):
        assert_eq!(change, ViewChange::PresenceChanged);
        assert_eq!(view.connection_count, 3);
        assert_eq!(view.online_users, vec!["alice", "bob"]);
    }

    #[test]
    fn test_apply_chatroom_ended() {
        // テスト項目: ChatroomEnded で終了フラグが立ち、メッセージは残る
        // given (前提条件):
        let mut view = ChatView::new();
        view.apply(&OutboundEnvelope::NewMessage(message("alice", "bye", 1)));

        // when (操作):
        let change = view.apply(&OutboundEnvelope::ChatroomEnded);

        // then (期待する結果):
        assert_eq!(change, ViewChange::Ended);
        assert!(view.ended);
        assert_eq!(view.messages.len(), 1);
    }

    #[test]
    fn test_should_exit_immediately() {
        // テスト項目: 認証エラー・Room 不在・Room 終了では即座に終了し、接続エラーでは終了しない
        // given (前提条件):
        let fatal = [
            ClientError::Unauthenticated,
            ClientError::RoomUnavailable("lobby".to_string()),
            ClientError::RoomEnded,
        ];
        let transient = ClientError::ConnectionError("network error".to_string());

        // when (操作):
        // then (期待する結果):
        for error in &fatal {
            assert!(should_exit_immediately(error), "{:?}", error);
        }
        assert!(!should_exit_immediately(&transient));
    }

    #[test]
    fn test_should_attempt_reconnect_with_fatal_error() {
        // テスト項目: 認証エラーの場合、再接続すべきではないと判定される
        // given (前提条件):
        let error = ClientError::Unauthenticated;

        // when (操作):
        let result = should_attempt_reconnect(&error, 0, 5);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_should_attempt_reconnect_within_limit() {
        // テスト項目: 再接続回数が上限未満の場合、再接続すべきと判定される
        // given (前提条件):
        let error = ClientError::ConnectionError("network error".to_string());

        // when (操作):
        let first = should_attempt_reconnect(&error, 0, 5);
        let last = should_attempt_reconnect(&error, 4, 5);

        // then (期待する結果):
        assert!(first);
        assert!(last);
    }

    #[test]
    fn test_should_attempt_reconnect_at_limit() {
        // テスト項目: 再接続回数が上限に達した場合、再接続すべきではないと判定される
        // given (前提条件):
        let error = ClientError::ConnectionError("network error".to_string());

        // when (操作):
        let result = should_attempt_reconnect(&error, 5, 5);

        // then (期待する結果):
        assert!(!result);
    }
}
