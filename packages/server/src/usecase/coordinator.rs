//! Room Coordinator
//!
//! Room ごとに 1 つ存在する、メンバーシップと履歴の唯一の書き手。
//!
//! ## 順序保証
//!
//! `join` / `send` / `leave` / `end` はいずれも Room のロックを取得してから、
//! 状態の変更とブロードキャストのキューイングまでをロックを保持したまま行う。
//! ロック取得後に await は存在しないため、操作は受理された順に 1 つずつ適用され、
//! 全メンバーが同じ順序でイベントを受け取る（送信キューは FIFO）。
//!
//! ## 障害の分離
//!
//! 送信キューへの書き込みは待機しない。満杯・切断済みのメンバーはその場で
//! 退出扱いとなり、残りのメンバーに在室状況が再送される。

use std::sync::Arc;

use hiroba_shared::time::Clock;
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, Member, MessageContent, MessagePusher, PresenceSnapshot, PusherChannel, Room,
    RoomEvent, RoomId, RoomStatus, SequenceNumber, Timestamp, Username,
};

use super::error::CoordinatorError;

/// Room の現在の状態（読み取り専用のスナップショット）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomOverview {
    pub status: RoomStatus,
    pub presence: PresenceSnapshot,
    pub history_length: usize,
}

pub struct RoomCoordinator {
    room_id: RoomId,
    room: Mutex<Room>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl RoomCoordinator {
    pub fn new(room: Room, message_pusher: Arc<dyn MessagePusher>, clock: Arc<dyn Clock>) -> Self {
        Self {
            room_id: room.id.clone(),
            room: Mutex::new(room),
            message_pusher,
            clock,
        }
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    pub async fn is_active(&self) -> bool {
        self.room.lock().await.is_active()
    }

    pub async fn overview(&self) -> RoomOverview {
        let room = self.room.lock().await;
        RoomOverview {
            status: room.status(),
            presence: room.presence(),
            history_length: room.history().len(),
        }
    }

    /// 接続をメンバーとして迎え入れる
    ///
    /// 参加した接続にだけ履歴を送り、その後で全メンバーに在室状況を送る。
    /// 履歴を送れなかった場合はメンバーにせず `TransportFailure` を返す。
    pub async fn join(
        &self,
        connection_id: ConnectionId,
        username: Username,
        channel: PusherChannel,
    ) -> Result<(), CoordinatorError> {
        let mut room = self.room.lock().await;
        if !room.is_active() {
            return Err(CoordinatorError::RoomUnavailable);
        }
        if room.member(&connection_id).is_some() {
            return Err(CoordinatorError::DuplicateConnection(
                connection_id.to_string(),
            ));
        }

        let joined_at = Timestamp::new(self.clock.now_millis());
        let member = Member::new(connection_id, username, joined_at, channel);

        let history = RoomEvent::MessageHistory(room.history().snapshot());
        if let Err(e) = self.message_pusher.push_to(&member, &history) {
            tracing::warn!(
                "Failed to send history to '{}' ({}) in room '{}': {}",
                member.username,
                connection_id,
                self.room_id,
                e
            );
            return Err(e.into());
        }

        tracing::info!(
            "'{}' ({}) joined room '{}'",
            member.username,
            connection_id,
            self.room_id
        );
        room.add_member(member)?;

        let presence = RoomEvent::ConnectionUpdate(room.presence());
        self.broadcast_locked(&mut room, presence);
        Ok(())
    }

    /// メッセージを受理して全メンバーにブロードキャストする
    ///
    /// 既に退出した接続からの送信は黙って捨て、`Ok(None)` を返す。
    pub async fn send(
        &self,
        connection_id: &ConnectionId,
        content: MessageContent,
    ) -> Result<Option<SequenceNumber>, CoordinatorError> {
        let mut room = self.room.lock().await;
        if !room.is_active() {
            return Err(CoordinatorError::RoomUnavailable);
        }
        let Some(author) = room.member(connection_id).map(|m| m.username.clone()) else {
            tracing::debug!(
                "Dropping message from departed connection '{}' in room '{}'",
                connection_id,
                self.room_id
            );
            return Ok(None);
        };

        let created_at = Timestamp::new(self.clock.now_millis());
        let message = room.accept_message(author, content, created_at)?;
        let sequence = message.sequence;
        tracing::debug!(
            "Accepted message #{} from '{}' in room '{}'",
            sequence.value(),
            message.author,
            self.room_id
        );

        self.broadcast_locked(&mut room, RoomEvent::NewMessage(message));
        Ok(Some(sequence))
    }

    /// 接続をメンバーから外す（冪等）
    ///
    /// 実際に外した場合だけ残りのメンバーへ在室状況を送り、`true` を返す。
    pub async fn leave(&self, connection_id: &ConnectionId) -> bool {
        let mut room = self.room.lock().await;
        let Some(member) = room.remove_member(connection_id) else {
            return false;
        };
        tracing::info!(
            "'{}' ({}) left room '{}'",
            member.username,
            connection_id,
            self.room_id
        );

        let presence = RoomEvent::ConnectionUpdate(room.presence());
        self.broadcast_locked(&mut room, presence);
        true
    }

    /// Room を終了する
    ///
    /// 全メンバーに `ChatroomEnded` を 1 度だけ送ってから全員を外す。
    /// 外されたメンバーの送信キューは閉じ、各接続は送信済みのフレームを流した後に切断される。
    /// 戻り値は外したメンバーの数（既に Ended なら 0）。
    pub async fn end(&self) -> usize {
        let mut room = self.room.lock().await;
        if !room.is_active() {
            return 0;
        }

        for (connection_id, e) in self
            .message_pusher
            .broadcast(room.members(), &RoomEvent::ChatroomEnded)
        {
            tracing::warn!(
                "Failed to notify '{}' that room '{}' ended: {}",
                connection_id,
                self.room_id,
                e
            );
        }

        let evicted = room.end();
        tracing::info!(
            "Room '{}' ended, evicted {} connection(s)",
            self.room_id,
            evicted.len()
        );
        evicted.len()
    }

    /// 全メンバーにイベントを送る
    ///
    /// 送れなかったメンバーを外し、外したメンバーがいれば在室状況を送り直す。
    /// メンバーは減る一方なので必ず停止する。
    fn broadcast_locked(&self, room: &mut Room, event: RoomEvent) {
        let mut event = event;
        loop {
            let failures = self.message_pusher.broadcast(room.members(), &event);
            if failures.is_empty() {
                return;
            }

            for (connection_id, e) in failures {
                if let Some(member) = room.remove_member(&connection_id) {
                    tracing::warn!(
                        "Evicting '{}' ({}) from room '{}': {}",
                        member.username,
                        connection_id,
                        self.room_id,
                        e
                    );
                }
            }
            event = RoomEvent::ConnectionUpdate(room.presence());
        }
    }
}
