//! ドメイン層のエラー型

use thiserror::Error;

/// 値オブジェクトの生成に失敗した
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{field} is too long ({actual} > {max} characters)")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
}

/// Room エンティティに対する操作の失敗
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    /// Ended 状態の Room には参加・送信できない
    #[error("room has ended")]
    Ended,

    #[error("connection '{0}' is already a member")]
    DuplicateConnection(String),
}

/// 資格情報の検証失敗
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("credential is missing")]
    MissingCredential,

    #[error("credential is invalid: {0}")]
    InvalidCredential(String),

    #[error("failed to issue credential: {0}")]
    IssueFailed(String),
}

/// メンバーの送信キューへの書き込み失敗
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    /// 送信キューが満杯（遅いクライアント）
    #[error("outbound queue is full")]
    QueueFull,

    /// 送信キューの受信側が既に閉じている
    #[error("outbound queue is closed")]
    ChannelClosed,

    #[error("failed to encode event: {0}")]
    EncodeFailed(String),
}

/// メタデータストアの操作失敗
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("room '{0}' not found")]
    RoomNotFound(String),

    #[error("room '{0}' already exists")]
    DuplicateRoom(String),
}
