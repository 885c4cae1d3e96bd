//! サーバー設定
//!
//! コマンドライン引数・環境変数から組み立てた値を検証して `ServerConfig` にする。

use std::fmt;

use thiserror::Error;

use crate::domain::{RoomName, ValueObjectError};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;
pub const DEFAULT_OUTBOUND_QUEUE_CAPACITY: usize = 256;
pub const DEFAULT_ROOM_LIST_LIMIT: usize = 10;

/// 参加時の履歴と在室状況の 2 フレームが入る大きさ
pub const MIN_OUTBOUND_QUEUE_CAPACITY: usize = 2;
pub const MIN_JWT_SECRET_LEN: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("history capacity must be at least 1")]
    HistoryCapacity,

    #[error("outbound queue capacity must be at least 2, got {0}")]
    OutboundQueueCapacity(usize),

    #[error("room list limit must be at least 1")]
    RoomListLimit,

    #[error("JWT secret must be at least 16 bytes, got {0}")]
    JwtSecretTooShort(usize),

    #[error("invalid default room name: {0}")]
    DefaultRoomName(ValueObjectError),
}

#[derive(Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Room ごとに保持するメッセージの件数
    pub history_capacity: usize,
    /// 接続ごとの送信キューの長さ
    pub outbound_queue_capacity: usize,
    /// GET /api/rooms で limit 未指定時に返す件数
    pub room_list_limit: usize,
    pub jwt_secret: String,
    /// 起動時に作成する Room の名前
    pub default_room: Option<String>,
}

impl ServerConfig {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            outbound_queue_capacity: DEFAULT_OUTBOUND_QUEUE_CAPACITY,
            room_list_limit: DEFAULT_ROOM_LIST_LIMIT,
            jwt_secret: jwt_secret.into(),
            default_room: None,
        }
    }

    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.history_capacity == 0 {
            return Err(ConfigError::HistoryCapacity);
        }
        if self.outbound_queue_capacity < MIN_OUTBOUND_QUEUE_CAPACITY {
            return Err(ConfigError::OutboundQueueCapacity(
                self.outbound_queue_capacity,
            ));
        }
        if self.room_list_limit == 0 {
            return Err(ConfigError::RoomListLimit);
        }
        if self.jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigError::JwtSecretTooShort(self.jwt_secret.len()));
        }
        if let Some(name) = &self.default_room {
            RoomName::new(name.clone()).map_err(ConfigError::DefaultRoomName)?;
        }
        Ok(self)
    }
}

// jwt_secret をログに出さない
impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("history_capacity", &self.history_capacity)
            .field("outbound_queue_capacity", &self.outbound_queue_capacity)
            .field("room_list_limit", &self.room_list_limit)
            .field("jwt_secret", &"<redacted>")
            .field("default_room", &self.default_room)
            .finish()
    }
}
