//! Error types for the chat client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// トークンが拒否された（401）
    #[error("Token was rejected by the server")]
    Unauthenticated,

    /// Room が存在しない、または終了している（404）
    #[error("Room '{0}' is not available")]
    RoomUnavailable(String),

    /// 接続中に Room が終了した
    #[error("Room has ended")]
    RoomEnded,

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),
}
