//! MessagePusher trait 定義
//!
//! メンバーの送信キューへイベントを積むためのインターフェース。
//! Coordinator はロックを保持したまま呼び出すため、実装は待機してはならない。
//! 遅い・応答しない接続は失敗として返し、他のメンバーへの配信を妨げない。

use tokio::sync::mpsc;

use super::{ConnectionId, Member, MessagePushError, RoomEvent};

/// メンバーごとの有界な送信キュー（エンコード済みフレーム）
pub type PusherChannel = mpsc::Sender<String>;

pub trait MessagePusher: Send + Sync {
    /// 1 メンバーにだけイベントを送る
    fn push_to(&self, member: &Member, event: &RoomEvent) -> Result<(), MessagePushError>;

    /// 全メンバーにイベントを送り、送れなかった接続を返す
    fn broadcast(
        &self,
        members: &[Member],
        event: &RoomEvent,
    ) -> Vec<(ConnectionId, MessagePushError)>;
}
