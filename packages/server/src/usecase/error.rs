//! UseCase 層のエラー型

use thiserror::Error;

use crate::domain::{MessagePushError, RepositoryError, RoomError, ValueObjectError};

/// Room Coordinator の操作失敗
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinatorError {
    /// Room が Ended（参加・送信不可）
    #[error("room is unavailable")]
    RoomUnavailable,

    #[error("connection '{0}' is already a member")]
    DuplicateConnection(String),

    /// 参加した接続自身への送信に失敗した
    #[error("transport failure: {0}")]
    TransportFailure(#[from] MessagePushError),
}

impl From<RoomError> for CoordinatorError {
    fn from(error: RoomError) -> Self {
        match error {
            RoomError::Ended => Self::RoomUnavailable,
            RoomError::DuplicateConnection(id) => Self::DuplicateConnection(id),
        }
    }
}

/// Room レジストリの操作失敗
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("room '{0}' not found")]
    RoomNotFound(String),

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Connection Gate による接続拒否
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AdmissionError {
    /// 資格情報がない・不正・検証できない
    #[error("unauthenticated")]
    Unauthenticated,

    /// 未知の Room、または Ended の Room
    #[error("room unavailable")]
    RoomUnavailable,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateRoomError {
    #[error("unauthenticated")]
    Unauthenticated,

    #[error("invalid room name: {0}")]
    InvalidName(#[from] ValueObjectError),

    #[error("failed to create room: {0}")]
    Registry(#[from] RegistryError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EndRoomError {
    #[error("unauthenticated")]
    Unauthenticated,

    /// Room を作成したユーザー以外は終了できない
    #[error("only the creator of room '{0}' can end it")]
    Forbidden(String),

    #[error("room '{0}' not found")]
    RoomNotFound(String),

    #[error("failed to end room: {0}")]
    Registry(RegistryError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomDetailError {
    #[error("room not found")]
    RoomNotFound,
}
