//! Message History Store
//!
//! 受理済みメッセージの有界ログ。連番の割り当ては Coordinator の責務で、
//! ここでは保持件数の上限（古いものから破棄）だけを管理します。

use std::collections::VecDeque;

use super::{entity::ChatMessage, value_object::SequenceNumber};

/// 保持件数に上限のある、追記専用のメッセージ履歴
#[derive(Debug, Clone)]
pub struct MessageHistory {
    capacity: usize,
    entries: VecDeque<ChatMessage>,
}

impl MessageHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity.min(1024)),
        }
    }

    /// メッセージを末尾に追加し、上限を超えた分を先頭から破棄する
    ///
    /// 連番は直前のエントリより大きくなければならない。
    pub fn append(&mut self, message: ChatMessage) -> SequenceNumber {
        debug_assert!(
            self.entries
                .back()
                .is_none_or(|last| last.sequence < message.sequence),
            "sequence numbers must be strictly increasing"
        );

        let sequence = message.sequence;
        self.entries.push_back(message);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        sequence
    }

    /// 保持している履歴を古い順に返す
    pub fn snapshot(&self) -> Vec<ChatMessage> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MessageContent, Timestamp, Username};

    fn message(sequence: u64) -> ChatMessage {
        ChatMessage {
            sequence: SequenceNumber::new(sequence),
            author: Username::new("alice".to_string()).unwrap(),
            content: MessageContent::new(format!("message {}", sequence)).unwrap(),
            created_at: Timestamp::new(1_000 + sequence as i64),
        }
    }

    fn sequences(history: &MessageHistory) -> Vec<u64> {
        history
            .snapshot()
            .iter()
            .map(|m| m.sequence.value())
            .collect()
    }

    #[test]
    fn test_append_within_capacity() {
        // テスト項目: 上限以内であれば全てのメッセージが古い順に保持される
        // given (前提条件):
        let mut history = MessageHistory::new(3);

        // when (操作):
        let returned: Vec<u64> = (1..=3).map(|i| history.append(message(i)).value()).collect();

        // then (期待する結果):
        assert_eq!(returned, vec![1, 2, 3]);
        assert_eq!(sequences(&history), vec![1, 2, 3]);
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_append_evicts_oldest_first() {
        // テスト項目: 上限を超えると最も古いメッセージから破棄される
        // given (前提条件):
        let mut history = MessageHistory::new(2);

        // when (操作):
        for i in 1..=5 {
            history.append(message(i));
        }

        // then (期待する結果):
        assert_eq!(sequences(&history), vec![4, 5]);
        assert_eq!(history.capacity(), 2);
    }

    #[test]
    fn test_empty_history_snapshot() {
        // テスト項目: 空の履歴のスナップショットは空
        // given (前提条件):
        let history = MessageHistory::new(10);

        // when (操作):
        let snapshot = history.snapshot();

        // then (期待する結果):
        assert!(snapshot.is_empty());
        assert!(history.is_empty());
    }

    #[test]
    fn test_zero_capacity_retains_nothing() {
        // テスト項目: 上限 0 の場合は追加しても何も保持しない（append は失敗しない）
        // given (前提条件):
        let mut history = MessageHistory::new(0);

        // when (操作):
        let sequence = history.append(message(1));

        // then (期待する結果):
        assert_eq!(sequence.value(), 1);
        assert!(history.is_empty());
    }
}
